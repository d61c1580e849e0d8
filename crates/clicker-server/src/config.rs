use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    /// Only changes the default log filter; the server binds its port either way.
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("CLICKER_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("CLICKER_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("CLICKER_PORT is not a valid port: {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        let db_path = lookup("CLICKER_DB_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let environment = match lookup("CLICKER_ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        Ok(Self {
            host,
            port,
            db_path,
            environment,
        })
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => {
                "clicker_server=debug,clicker_api=debug,clicker_db=debug,tower_http=debug"
            }
            Environment::Production => {
                "clicker_server=info,clicker_api=info,clicker_db=info,tower_http=info"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert!(config.db_path.is_none());
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("CLICKER_HOST", "127.0.0.1"),
            ("CLICKER_PORT", "8080"),
            ("CLICKER_DB_PATH", "/tmp/clicker.db"),
            ("CLICKER_ENV", "production"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/clicker.db")));
        assert_eq!(config.environment, Environment::Production);
        assert!(config.default_log_filter().contains("clicker_api=info"));
    }

    #[test]
    fn empty_db_path_means_in_memory() {
        let config = config(&[("CLICKER_DB_PATH", "")]).unwrap();
        assert!(config.db_path.is_none());
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("CLICKER_PORT", "not-a-port")]).is_err());
        assert!(config(&[("CLICKER_PORT", "70000")]).is_err());
    }
}
