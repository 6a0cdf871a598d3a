use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin (default: http://localhost:8080)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Titles requested by `load` (default: 10)
    #[serde(default = "default_show_count")]
    pub show_count: u32,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_show_count() -> u32 {
    crate::page::DEFAULT_SHOW_COUNT
}

/// `$PORTFOLIO_HOME`, or `~/.portfolio`.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PORTFOLIO_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".portfolio"))
}

fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    /// Load config from the config dir, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" | "url" => {
                let value = value.trim();
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    bail!("invalid base_url: must start with http:// or https://");
                }
                self.base_url = value.trim_end_matches('/').to_string();
            }
            "show_count" | "count" => {
                self.show_count = value.trim().parse().map_err(|_| {
                    anyhow::anyhow!("invalid show_count: must be a non-negative integer")
                })?;
            }
            _ => bail!("unknown config key: {key}"),
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            show_count: default_show_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{EnvGuard, env_lock};
    use tempfile::TempDir;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.show_count, 10);
    }

    #[test]
    fn config_partial_parse() {
        let content = "show_count = 3\n";
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.show_count, 3);
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn config_rejects_negative_count() {
        let content = "show_count = -1\n";
        assert!(toml::from_str::<Config>(content).is_err());

        let mut config = Config::default();
        assert!(config.set("show_count", "-1").is_err());
        assert_eq!(config.show_count, 10);
    }

    #[test]
    fn config_set_normalizes_url() {
        let mut config = Config::default();
        config.set("url", "https://portfolio.example.com/").unwrap();
        assert_eq!(config.base_url, "https://portfolio.example.com");
        assert!(config.set("base_url", "ftp://nope").is_err());
        assert!(config.set("ttl", "30").is_err());
    }

    #[test]
    fn config_save_and_load_respect_env_dir() {
        let _lock = env_lock();
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested");
        let _guard = EnvGuard::set("PORTFOLIO_HOME", dir.to_str().unwrap());

        assert_eq!(Config::load().unwrap().show_count, 10);

        let mut config = Config::default();
        config.set("show_count", "25").unwrap();
        let path = config.save().unwrap();
        assert_eq!(path, dir.join("config.toml"));

        let loaded = Config::load().unwrap();
        assert_eq!(loaded.show_count, 25);
        assert_eq!(loaded.base_url, "http://localhost:8080");
    }
}
