use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_FAILING_RATIO: f64 = 0.3;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub listen: Option<String>,
    // Directory holding data-all.json and data-users.json.
    // Relative paths resolve against the process working directory. Defaults to `data`.
    pub data_dir: Option<String>,
    // Probability that /pipeline-health reports failing. Defaults to 0.3.
    pub failing_ratio: Option<f64>,
    // Seed for the health mock. If not set, the generator is seeded from entropy.
    pub health_seed: Option<u64>,
    // Base URL the dashboard client talks to. Defaults to http://localhost:4000.
    pub base_url: Option<String>,
    // Seconds between pipeline health polls. Defaults to 15.
    pub poll_interval_secs: Option<u64>,
    // Client request timeout in seconds.
    // If not set, requests never time out and a hung request keeps its flow loading.
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Read a TOML config file. A missing file yields the defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(s) => Ok(toml::from_str(&s)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve the listen address, letting `port` (usually `$PORT`) override
    /// whatever port the configured address carries.
    pub fn listen_addr(&self, port: Option<&str>) -> anyhow::Result<SocketAddr> {
        let listen = self
            .listen
            .clone()
            .unwrap_or_else(|| format!("0.0.0.0:{}", DEFAULT_PORT));
        let mut addr: SocketAddr = listen
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address '{}': {}", listen, e))?;
        if let Some(p) = port.map(str::trim).filter(|p| !p.is_empty()) {
            let p: u16 = p
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid port '{}': {}", p, e))?;
            addr.set_port(p);
        }
        Ok(addr)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("data"))
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", DEFAULT_PORT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_port_4000() {
        let cfg = Config::default();
        let addr = cfg.listen_addr(None).expect("default addr");
        assert_eq!(addr.port(), 4000);
        assert_eq!(cfg.data_dir(), PathBuf::from("data"));
        assert_eq!(cfg.base_url(), "http://localhost:4000");
    }

    #[test]
    fn port_env_overrides_listen_port() {
        let cfg = Config {
            listen: Some("127.0.0.1:8080".to_string()),
            ..Default::default()
        };
        let addr = cfg.listen_addr(Some("5005")).expect("addr");
        assert_eq!(addr.to_string(), "127.0.0.1:5005");

        // blank PORT is ignored
        let addr = cfg.listen_addr(Some("  ")).expect("addr");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::default()
            .listen_addr(Some("not-a-port"))
            .expect_err("should fail");
        assert!(err.to_string().contains("Invalid port"), "{}", err);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let cfg = Config::load_or_default(path.to_str().unwrap()).expect("defaults");
        assert!(cfg.listen.is_none());
        assert!(cfg.failing_ratio.is_none());
    }

    #[test]
    fn parse_example_config() {
        let s = fs::read_to_string("config.toml.example").expect("read example config");
        let cfg: Config = toml::from_str(&s).expect("parse example toml");
        assert_eq!(cfg.failing_ratio, Some(DEFAULT_FAILING_RATIO));
        assert_eq!(cfg.poll_interval_secs, Some(DEFAULT_POLL_INTERVAL_SECS));
        assert!(cfg.listen_addr(None).is_ok());
    }
}
