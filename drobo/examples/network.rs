//! Show network configuration
//!
//! ```text
//! DROBO_HOST=192.168.1.50 RUST_LOG=drobo=debug cargo run --example network
//! ```

use drobo::{ClientConfig, CommandChannel, IpConfigType, StatusChannel};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env()?;
    let esa_id = StatusChannel::connect(&config).await?.into_status().await.esa_id;

    let mut channel = CommandChannel::connect(&config, esa_id).await?;
    let network = channel.network_config().await?;
    channel.disconnect().await?;

    println!("Name: {}", network.nas_name);
    println!("Workgroup: {}", network.workgroup);
    println!("MAC Address: {}", network.mac_address);
    println!("Port Speed: {} Mbps", network.port_speed);
    println!("Port Duplex: {}", network.port_duplex);
    println!();

    let ip_type = match network.ip.config_type {
        IpConfigType::Static => "Static",
        IpConfigType::Dhcp => "DHCP",
    };
    println!("Type: {}", ip_type);
    println!("IP Address: {}", network.ip.ip);
    println!("Subnet: {}", network.ip.subnet);
    println!("Gateway: {}", network.ip.gateway);
    println!("DNS1: {}", network.ip.dns1);
    println!("DNS2: {}", network.ip.dns2);
    println!();

    let jumbo = if network.jumbo_frames.enabled {
        "Enabled"
    } else {
        "Disabled"
    };
    println!("Jumbo Frames: {}", jumbo);
    println!("MTU Size: {}", network.jumbo_frames.mtu_size);

    Ok(())
}
