//! List configured shares
//!
//! ```text
//! DROBO_HOST=192.168.1.50 cargo run --example shares
//! ```

use drobo::{ClientConfig, CommandChannel, StatusChannel};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env()?;

    // The command handshake needs the ESA id from the status port
    let esa_id = StatusChannel::connect(&config).await?.into_status().await.esa_id;

    let mut channel = CommandChannel::connect(&config, esa_id).await?;
    let shares = channel.shares().await?;
    channel.disconnect().await?;

    println!("{:<24} TimeMachine", "Name");
    for share in shares {
        println!("{:<24} {}", share.name, share.time_machine_enabled);
    }

    Ok(())
}
