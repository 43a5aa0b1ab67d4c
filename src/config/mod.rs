//! TOML-based configuration for the generator drivers.
//!
//! Supports an optional config file (quantgen.toml) with environment
//! variable expansion, plus the `DATABASE_URL` lookup the migration step
//! needs. No process-global state: the loaded [`Settings`] value is passed
//! explicitly into the components that consume it.
//!
//! Example configuration:
//! ```toml
//! [output]
//! dir = "generated"
//!
//! [migration]
//! commands = [
//!     ["python", "manage.py", "makemigrations"],
//!     ["python", "manage.py", "migrate"],
//! ]
//!
//! [migration.env]
//! DJANGO_SETTINGS_MODULE = "quantities.settings"
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "quantgen.toml";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("DATABASE_URL must start with postgres://, got: {0}")]
    InvalidDatabaseUrl(String),
}

/// Generator configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output: OutputSettings,
    pub migration: MigrationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the artifacts are published into.
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MigrationSettings {
    /// Commands run, in order, to apply the relational artifact.
    pub commands: Vec<Vec<String>>,
    /// Extra environment for the migration commands (supports `${VAR}`).
    pub env: BTreeMap<String, String>,
}

impl Default for MigrationSettings {
    fn default() -> Self {
        Self {
            commands: vec![
                vec![
                    "python".to_string(),
                    "manage.py".to_string(),
                    "makemigrations".to_string(),
                ],
                vec![
                    "python".to_string(),
                    "manage.py".to_string(),
                    "migrate".to_string(),
                ],
            ],
            env: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from an explicit file, or from `quantgen.toml` in the
    /// working directory when present, or fall back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        for command in &mut settings.migration.commands {
            for part in command.iter_mut() {
                *part = expand_env_vars(part)?;
            }
        }
        for value in settings.migration.env.values_mut() {
            *value = expand_env_vars(value)?;
        }
        Ok(settings)
    }
}

/// The connection string the migration step hands to the external tool.
/// Must be a `postgres://` URL.
pub fn database_url() -> Result<String, SettingsError> {
    let url = env::var("DATABASE_URL")
        .map_err(|_| SettingsError::MissingEnvVar("DATABASE_URL".to_string()))?;
    if !url.starts_with("postgres://") {
        return Err(SettingsError::InvalidDatabaseUrl(url));
    }
    Ok(url)
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    var_name.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
        }
        if var_name.is_empty() {
            result.push('$');
            continue;
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
