//! Client configuration
//!
//! Values can be set in code with the `with_*` builders or loaded from the
//! environment:
//!
//! | variable             | default |
//! |----------------------|---------|
//! | `DROBO_HOST`         | required |
//! | `DROBO_STATUS_PORT`  | 5000    |
//! | `DROBO_COMMAND_PORT` | 5001    |
//! | `DROBO_TIMEOUT_SECS` | read 30 / write 10; `0` disables deadlines |

use std::str::FromStr;
use std::time::Duration;

use drobo_core::constants::{
    COMMAND_PORT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_PAYLOAD_LEN, DEFAULT_READ_TIMEOUT,
    DEFAULT_WRITE_TIMEOUT, STATUS_PORT,
};
use drobo_transport::TcpTransport;

use crate::error::{Error, Result};

/// Connection settings shared by the status and command channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub status_port: u16,
    pub command_port: u16,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,

    /// Largest reply payload or status block accepted
    pub max_payload_len: usize,
}

impl ClientConfig {
    /// Default ports and deadlines for `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            status_port: STATUS_PORT,
            command_port: COMMAND_PORT,
            connect_timeout: Some(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT)),
            read_timeout: Some(Duration::from_secs(DEFAULT_READ_TIMEOUT)),
            write_timeout: Some(Duration::from_secs(DEFAULT_WRITE_TIMEOUT)),
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }

    /// Load configuration from `DROBO_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("DROBO_HOST")
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| Error::Config("DROBO_HOST is not set".into()))?;

        let mut config = Self::new(host.trim());

        if let Some(port) = parse_var(&lookup, "DROBO_STATUS_PORT")? {
            config.status_port = port;
        }
        if let Some(port) = parse_var(&lookup, "DROBO_COMMAND_PORT")? {
            config.command_port = port;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DROBO_TIMEOUT_SECS")? {
            let timeout = (secs > 0).then(|| Duration::from_secs(secs));
            config = config.with_timeout(timeout);
        }

        Ok(config)
    }

    pub fn with_status_port(mut self, port: u16) -> Self {
        self.status_port = port;
        self
    }

    pub fn with_command_port(mut self, port: u16) -> Self {
        self.command_port = port;
        self
    }

    /// Set both read and write timeouts
    pub fn with_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        let timeout = timeout.into();
        self.read_timeout = timeout;
        self.write_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.connect_timeout = timeout.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.read_timeout = timeout.into();
        self
    }

    pub fn with_write_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.write_timeout = timeout.into();
        self
    }

    /// Set the largest accepted reply payload or status block
    pub fn with_max_payload_len(mut self, len: usize) -> Self {
        self.max_payload_len = len;
        self
    }

    pub(crate) fn status_transport(&self) -> TcpTransport {
        self.transport(self.status_port)
    }

    pub(crate) fn command_transport(&self) -> TcpTransport {
        self.transport(self.command_port)
    }

    fn transport(&self, port: u16) -> TcpTransport {
        TcpTransport::new(self.host.clone(), port)
            .with_connect_timeout(self.connect_timeout)
            .with_read_timeout(self.read_timeout)
            .with_write_timeout(self.write_timeout)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} has invalid value {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("drobo.local");
        assert_eq!(config.status_port, 5000);
        assert_eq!(config.command_port, 5001);
        assert_eq!(config.read_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.max_payload_len, 16 * 1024 * 1024);
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DROBO_HOST", " 10.0.0.5 "),
            ("DROBO_COMMAND_PORT", "15001"),
            ("DROBO_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.status_port, 5000);
        assert_eq!(config.command_port, 15001);
        assert_eq!(config.read_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.write_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_timeout_disables_deadlines() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("DROBO_HOST", "nas"),
            ("DROBO_TIMEOUT_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.read_timeout, None);
        assert_eq!(config.write_timeout, None);
    }

    #[test]
    fn test_missing_host() {
        let result = ClientConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_port() {
        let result = ClientConfig::from_lookup(lookup(&[
            ("DROBO_HOST", "nas"),
            ("DROBO_STATUS_PORT", "70000"),
        ]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
