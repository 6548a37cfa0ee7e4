//! TOML-based configuration for drift.
//!
//! Supports a config file (drift.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [source]
//! server = "db-prod.internal"
//! port = 1433
//! user = "sa"
//! password = "${SOURCE_DB_PASSWORD}"
//! database = "AppDb"
//!
//! [target]
//! server = "localhost"
//! user = "sa"
//! password = "${TARGET_DB_PASSWORD}"
//! database = "AppDb_Staging"
//!
//! [compare]
//! concurrency = 10
//! fetch_timeout_secs = 30
//! pool_size = 10
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Source database connection (the schema to replicate).
    pub source: ConnectionSettings,

    /// Target database connection (the schema to reconcile).
    pub target: ConnectionSettings,

    /// Comparison tuning.
    pub compare: CompareSettings,
}

/// Connection configuration for one database.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Server hostname.
    pub server: String,

    /// TCP port.
    pub port: u16,

    /// Login user.
    pub user: String,

    /// Login password (supports `${ENV_VAR}` expansion).
    pub password: String,

    /// Database name.
    pub database: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 1433,
            user: String::new(),
            password: String::new(),
            database: String::new(),
        }
    }
}

impl ConnectionSettings {
    /// Check that the section is usable; the database name is required.
    pub fn validate(&self, section: &str) -> Result<(), SettingsError> {
        if self.database.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(format!(
                "[{section}] database is required"
            )));
        }
        Ok(())
    }

    pub fn resolved_server(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.server)
    }

    pub fn resolved_user(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.user)
    }

    pub fn resolved_password(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.password)
    }

    pub fn resolved_database(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.database)
    }
}

/// Comparison tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompareSettings {
    /// Maximum number of in-flight comparisons.
    pub concurrency: usize,

    /// Deadline in seconds for a single definition fetch.
    pub fetch_timeout_secs: u64,

    /// Connections opened per database, at most.
    pub pool_size: usize,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            concurrency: 10,
            fetch_timeout_secs: 30,
            pool_size: 10,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. The explicit path, when given
    /// 2. `./drift.toml`
    /// 3. Environment variable `DRIFT_CONFIG`
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let local_config = PathBuf::from("drift.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Ok(path) = env::var("DRIFT_CONFIG") {
            return Self::from_file(&path);
        }

        // Defaults alone never validate (no database names); this surfaces
        // as an InvalidConfig error at startup.
        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' {
            // Check for ${VAR} or $VAR
            if chars.peek() == Some(&'{') {
                chars.next(); // consume '{'
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }
                let value = env::var(&var_name)
                    .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                result.push_str(&value);
            } else {
                // $VAR (ends at non-alphanumeric/underscore)
                let mut var_name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_alphanumeric() || ch == '_' {
                        var_name.push(chars.next().unwrap());
                    } else {
                        break;
                    }
                }
                if var_name.is_empty() {
                    // Just a lone $, keep it
                    result.push('$');
                } else {
                    let value = env::var(&var_name)
                        .map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
                    result.push_str(&value);
                }
            }
        } else {
            result.push(c);
        }
    }

    Ok(result)
}
