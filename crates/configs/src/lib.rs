use std::path::PathBuf;

use anyhow::Result;
use anyhow::anyhow;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 5000, worker_threads: Some(4) }
    }
}

/// Which persistence engine backs the storage layer.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Db,
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "" => Ok(Self::File),
            "db" => Ok(Self::Db),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown storage type `{other}` (expected file, db or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub kind: StorageKind,
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { kind: StorageKind::default(), file_path: default_file_path() }
    }
}

fn default_file_path() -> PathBuf { PathBuf::from("data/file.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), fall back to defaults when it is
    /// missing, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) => {
                if let Some(io) = e.downcast_ref::<std::io::Error>() {
                    if io.kind() != std::io::ErrorKind::NotFound {
                        warn!(error = %e, "config file unreadable; using defaults");
                    }
                } else {
                    return Err(e);
                }
                AppConfig::default()
            }
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Override fields from the process environment. `lookup` is injected so
    /// tests do not have to mutate the real environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HBNB_API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("HBNB_API_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("HBNB_API_PORT must be a port number, got `{port}`"))?;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(threads);
        }
        if let Some(kind) = lookup("HBNB_TYPE_STORAGE") {
            self.storage.kind = kind.parse()?;
        }
        if let Some(path) = lookup("HBNB_FILE_PATH") {
            self.storage.file_path = PathBuf::from(path);
        }
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if self.storage.file_path.as_os_str().is_empty() {
            self.storage.file_path = default_file_path();
        }
        if self.storage.kind == StorageKind::Db {
            self.database.validate()?;
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_bind_all_interfaces_on_5000() {
        let mut cfg = AppConfig::default();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.storage.kind, StorageKind::File);
        assert_eq!(cfg.storage.file_path, PathBuf::from("data/file.json"));
    }

    #[test]
    fn env_overrides_host_port_and_storage() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(env(&[
            ("HBNB_API_HOST", "127.0.0.1"),
            ("HBNB_API_PORT", "5050"),
            ("HBNB_TYPE_STORAGE", "db"),
            ("DATABASE_URL", "sqlite::memory:"),
        ]))
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 5050);
        assert_eq!(cfg.storage.kind, StorageKind::Db);
        assert_eq!(cfg.database.url, "sqlite::memory:");
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut cfg = AppConfig::default();
        assert!(cfg.apply_env(env(&[("HBNB_API_PORT", "http")])).is_err());
    }

    #[test]
    fn db_storage_requires_url() {
        let mut cfg = AppConfig::default();
        cfg.storage.kind = StorageKind::Db;
        assert!(cfg.normalize_and_validate().is_err());

        cfg.database.url = "mysql://root@localhost/hbnb".into();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn toml_sections_parse() {
        let cfg = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            worker_threads = 2

            [storage]
            kind = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.storage.kind, StorageKind::Memory);
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn storage_kind_from_str() {
        assert_eq!("DB".parse::<StorageKind>().unwrap(), StorageKind::Db);
        assert!("redis".parse::<StorageKind>().is_err());
    }
}
