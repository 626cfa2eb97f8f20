//! Configuration module
//!
//! Settings come from a TOML file (default
//! `~/.config/credential-gate/config.toml`) and are then overridden by
//! environment variables, which may be supplied through a `.env` file:
//!
//! | variable          | overrides                |
//! |-------------------|--------------------------|
//! | `DATABASE_URL`    | `database.url`           |
//! | `PORT`            | `server.port`            |
//! | `FRONTEND_ORIGIN` | `cors.frontend_origin`   |
//! | `LOG_LEVEL`       | `logging.level`          |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::infrastructure::database::{DatabaseConfig, PoolConfig};
use crate::shared::ConfigError;

/// Local dev frontends that are always allowed to call the API.
pub const DEV_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:5175",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:5175",
];

const DEFAULT_DATABASE_URL: &str = "sqlite://./credential-gate.db?mode=rwc";

/// Environment variable holding an explicit config file path.
pub const CONFIG_PATH_ENV: &str = "CREDENTIAL_GATE_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for cleanup after a shutdown signal
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub pool: PoolConfig,
}

impl DatabaseSection {
    pub fn connection_url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url().to_string(),
            pool: self.pool.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Deployed frontend, e.g. `https://app.example.com`
    pub frontend_origin: Option<String>,
    pub extra_origins: Vec<String>,
}

impl CorsConfig {
    /// Normalized allowlist: frontend origin, dev origins, then extras.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        let candidates = self
            .frontend_origin
            .iter()
            .map(String::as_str)
            .chain(DEV_ORIGINS)
            .chain(self.extra_origins.iter().map(String::as_str));

        for origin in candidates.filter_map(normalize_origin) {
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }
}

/// Trim whitespace and a single trailing `/`. Empty input yields `None`.
pub fn normalize_origin(origin: &str) -> Option<String> {
    let trimmed = origin.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `credential_gate=debug,tower_http=info`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Read the TOML file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// File, then `.env`, then process environment.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::load_with_lookup(path, |key| std::env::var(key).ok())
    }

    /// File, then overrides from `lookup`. An unreadable or invalid file is
    /// an error; there is no fallback to defaults.
    pub fn load_with_lookup<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load(path)?;
        config.apply_env_overrides(lookup)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = Some(url.trim().to_string());
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {port}")))?;
        }
        if let Some(origin) = get("FRONTEND_ORIGIN") {
            self.cors.frontend_origin = Some(origin);
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pool = &self.database.pool;
        if pool.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.pool.max_connections must be at least 1".into(),
            ));
        }
        if pool.min_connections > pool.max_connections {
            return Err(ConfigError::Invalid(
                "database.pool.min_connections exceeds max_connections".into(),
            ));
        }
        Ok(())
    }

    /// Log settings that are legal but probably not what production wants.
    pub fn warn_on_missing_settings(&self) {
        if self.database.url.is_none() {
            warn!(
                fallback = DEFAULT_DATABASE_URL,
                "DATABASE_URL is not set; using local SQLite"
            );
        }
        if self.cors.frontend_origin.is_none() {
            warn!("FRONTEND_ORIGIN is not set; only local dev origins are allowed");
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `<config dir>/credential-gate/config.toml`, or `./config.toml` if the
/// platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("credential-gate").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
