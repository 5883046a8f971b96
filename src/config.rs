// src/config.rs
use anyhow::{Context, Result};
use log::{info, warn};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "data/financial_data.csv";
pub const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_file = lookup("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .with_context(|| format!("BIND_ADDR must be an IP address, got '{}'", raw))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        info!("Using data file {} on port {}", data_file.display(), port);
        Ok(AppConfig { data_file, bind_addr, port })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(cfg.socket_addr().to_string(), "0.0.0.0:3030");
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATA_FILE", "/tmp/q.csv"),
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
        ]))
        .unwrap();
        assert_eq!(cfg.data_file, PathBuf::from("/tmp/q.csv"));
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
    }
}
