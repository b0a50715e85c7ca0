//! Print device status and the disk table
//!
//! ```text
//! DROBO_HOST=192.168.1.50 cargo run --example status
//! ```

use drobo::{ClientConfig, StatusChannel};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ClientConfig::from_env()?;
    let status = StatusChannel::connect(&config).await?.into_status().await;

    println!("status: {:?}", status.status.state());
    if status.status.is_full() {
        println!("  (capacity full)");
    }
    println!("ESA ID: {}", status.esa_id);
    println!("has apps: {}", status.apps_enabled);
    println!("disk pack status: {}", status.disk_pack_status);
    println!("drobo model: {}", status.model);
    println!("drobo name: {}", status.name);
    println!("drobo version: {}", status.firmware_version);
    println!(
        "protected capacity: {}/{}",
        to_size(status.used_capacity_protected),
        to_size(status.total_capacity_protected)
    );
    println!();

    println!(
        "{:>2}  {:<16} {:>6}  {:<10} {:<10} {:<10} {:<16} {:>6}",
        "#", "Status", "Errors", "Type", "Make", "Firmware", "Serial", "Size"
    );
    for (index, slot) in status.slots.iter().enumerate() {
        println!(
            "{:>2}  {:<16} {:>6}  {:<10} {:<10} {:<10} {:<16} {:>6}",
            index + 1,
            format!("{:?}", slot.status()),
            slot.error_count,
            format!("{:?}", slot.disk_type()),
            slot.make,
            slot.firmware_revision,
            slot.serial,
            to_size(slot.physical_capacity),
        );
    }

    Ok(())
}

/// Decimal size with a unit suffix, truncated ("3 TB")
fn to_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 5] = ["", "K", "M", "G", "T"];

    if bytes == 0 {
        return String::new();
    }

    let mut size = bytes as f64;
    let mut n = 0;
    while size > 1000.0 && n < SUFFIXES.len() - 1 {
        size /= 1000.0;
        n += 1;
    }

    format!("{} {}B", size as u64, SUFFIXES[n])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_size() {
        assert_eq!(to_size(0), "");
        assert_eq!(to_size(999), "999 B");
        assert_eq!(to_size(1_000_001), "1 MB");
        assert_eq!(to_size(1_999_999), "1 MB");
        assert_eq!(to_size(3_000_592_982_016), "3 TB");
    }
}
