use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::service::DEFAULT_RECENT_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogBackend {
    Csv,
    Sqlite,
    Memory,
}

impl LogBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogBackend::Csv => "csv",
            LogBackend::Sqlite => "sqlite",
            LogBackend::Memory => "memory",
        }
    }

    fn default_path(&self) -> &'static str {
        match self {
            LogBackend::Csv => "predictions_log.csv",
            LogBackend::Sqlite => "data/predictions.db",
            LogBackend::Memory => "",
        }
    }
}

impl fmt::Display for LogBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(LogBackend::Csv),
            "sqlite" => Ok(LogBackend::Sqlite),
            "memory" => Ok(LogBackend::Memory),
            other => bail!("unknown LOG_BACKEND {other:?} (expected csv, sqlite or memory)"),
        }
    }
}

/// Where the prediction log lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: LogBackend,
    pub path: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match lookup("LOG_BACKEND") {
            Some(raw) => raw.parse()?,
            None => LogBackend::Csv,
        };
        let path = lookup("LOG_PATH").unwrap_or_else(|| backend.default_path().to_string());
        Ok(Self { backend, path })
    }
}

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub store: StoreConfig,
    pub admin_password: String,
    pub recent_limit: usize,
    pub catalog_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PORT must be a number, got {raw:?}"))?,
            None => 3000,
        };
        let recent_limit = match lookup("RECENT_LIMIT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("RECENT_LIMIT must be a number, got {raw:?}"))?,
            None => DEFAULT_RECENT_LIMIT,
        };
        let admin_password = lookup("ADMIN_PASSWORD").unwrap_or_default();
        if admin_password.is_empty() {
            bail!("ADMIN_PASSWORD must be set");
        }

        Ok(Self {
            port,
            store: StoreConfig::from_lookup(&lookup)?,
            admin_password,
            recent_limit,
            catalog_path: lookup("CATALOG_PATH").filter(|p| !p.is_empty()),
        })
    }
}

pub fn config() -> Result<&'static Config> {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    if let Some(conf) = CONFIG.get() {
        return Ok(conf);
    }
    let conf = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| conf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() -> Result<()> {
        let conf = Config::from_lookup(lookup(&[("ADMIN_PASSWORD", "cheers2026")]))?;
        assert_eq!(conf.port, 3000);
        assert_eq!(conf.store.backend, LogBackend::Csv);
        assert_eq!(conf.store.path, "predictions_log.csv");
        assert_eq!(conf.recent_limit, 10);
        assert_eq!(conf.catalog_path, None);
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let conf = Config::from_lookup(lookup(&[
            ("ADMIN_PASSWORD", "cheers2026"),
            ("PORT", "8080"),
            ("LOG_BACKEND", "SQLite"),
            ("RECENT_LIMIT", "25"),
            ("CATALOG_PATH", "catalog.json"),
        ]))?;
        assert_eq!(conf.port, 8080);
        assert_eq!(conf.store.backend, LogBackend::Sqlite);
        assert_eq!(conf.store.path, "data/predictions.db");
        assert_eq!(conf.recent_limit, 25);
        assert_eq!(conf.catalog_path.as_deref(), Some("catalog.json"));
        Ok(())
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("ADMIN_PASSWORD", "x"), ("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("ADMIN_PASSWORD", "x"), ("LOG_BACKEND", "excel")])).is_err());
    }
}
