use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Value of `general.database_path` that selects the in-process store.
pub const MEMORY_DATABASE: &str = "memory";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,

    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// `sqlite:` URL, or `memory` for a non-persistent store.
    pub database_path: String,

    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/bookings.db".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Whether to set the Secure flag on session cookies.
    /// Set to false for local development without HTTPS.
    pub secure_cookies: bool,

    /// Where session records live. `sqlite` shares the application database
    /// and survives restarts.
    pub session_store: SessionStoreKind,

    pub session_inactivity_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            secure_cookies: false,
            session_store: SessionStoreKind::Memory,
            session_inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    /// Re-hash passwords with the parameters above after a successful login
    pub auto_migrate_password_hashes: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            auto_migrate_password_hashes: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,

    pub loki_labels: HashMap<String, String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        let mut labels = HashMap::new();
        labels.insert("app".to_string(), "bookings".to_string());

        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
            loki_labels: labels,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// When false, messages are dropped instead of queued.
    pub enabled: bool,

    pub from_address: String,

    /// Receives a copy of every new reservation.
    pub owner_address: String,

    pub queue_size: usize,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            from_address: "me@here.com".to_string(),
            owner_address: "me@here.com".to_string(),
            queue_size: 100,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies `BOOKINGS_*`
    /// environment overrides (a `.env` file is read first when present).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("BOOKINGS_DATABASE_URL") {
            self.general.database_path = url;
        }

        if let Some(port) = var("BOOKINGS_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid BOOKINGS_PORT: {port}"))?;
        }

        if let Some(level) = var("BOOKINGS_LOG_LEVEL") {
            self.general.log_level = level;
        }

        Ok(())
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("bookings").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".bookings").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    #[must_use]
    pub fn uses_memory_store(&self) -> bool {
        self.general.database_path == MEMORY_DATABASE
    }

    pub fn validate(&self) -> Result<()> {
        if !self.uses_memory_store() && !self.general.database_path.starts_with("sqlite:") {
            anyhow::bail!(
                "database_path must be a sqlite: URL or \"{MEMORY_DATABASE}\", got {}",
                self.general.database_path
            );
        }

        if self.uses_memory_store() && self.server.session_store == SessionStoreKind::Sqlite {
            anyhow::bail!("session_store = \"sqlite\" requires a sqlite database");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("min_db_connections cannot exceed max_db_connections");
        }

        if self.server.session_inactivity_minutes <= 0 {
            anyhow::bail!("session_inactivity_minutes must be > 0");
        }

        if self.mail.enabled && self.mail.queue_size == 0 {
            anyhow::bail!("Mail queue size must be > 0 when mail is enabled");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database_path, "sqlite:data/bookings.db");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.session_store, SessionStoreKind::Memory);
        assert!(config.mail.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[mail]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [server]
            port = 9000
            session_store = "sqlite"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.session_store, SessionStoreKind::Sqlite);

        assert_eq!(config.security.argon2_time_cost, 3);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| match key {
                "BOOKINGS_DATABASE_URL" => Some("memory".to_string()),
                "BOOKINGS_PORT" => Some("3000".to_string()),
                _ => None,
            })
            .unwrap();

        assert!(config.uses_memory_store());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.general.log_level, "info");

        let err = config.apply_env_overrides(|key| {
            (key == "BOOKINGS_PORT").then(|| "not-a-port".to_string())
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_validate_rejects_inconsistent_settings() {
        let mut config = Config::default();
        config.general.database_path = "postgres://localhost/db".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.database_path = MEMORY_DATABASE.to_string();
        config.server.session_store = SessionStoreKind::Sqlite;
        assert!(config.validate().is_err());
    }
}
