use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::core::DEFAULT_MAX_ATTACHMENT_BYTES;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub uploads: UploadSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub uri: String,
    /// Overrides the database named in `uri`
    pub name: Option<String>,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_file_size_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/shidduchim";

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Built-in defaults
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables prefixed with PROPOSALS_
    ///    (e.g. PROPOSALS__SERVER__PORT -> server.port)
    /// 4. The bare PORT and MONGODB_URI variables
    pub fn load() -> Result<Self, ConfigError> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(prefixed_env());

        apply_plain_env(builder, |key| std::env::var(key).ok())?
            .build()?
            .try_deserialize()
    }
}

fn prefixed_env() -> Environment {
    Environment::with_prefix("PROPOSALS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000_i64)?
        .set_default("database.uri", DEFAULT_MONGODB_URI)?
        .set_default("database.collection", "proposals")?
        .set_default("uploads.max_file_size_bytes", DEFAULT_MAX_ATTACHMENT_BYTES as i64)?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.format", default_log_format())
}

/// Apply the unprefixed PORT and MONGODB_URI variables on top of everything else
fn apply_plain_env<F>(
    builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = builder;

    if let Some(port) = lookup("PORT") {
        let port: u16 = port
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {}", port)))?;
        builder = builder.set_override("server.port", port as i64)?;
    }
    if let Some(uri) = lookup("MONGODB_URI") {
        builder = builder.set_override("database.uri", uri)?;
    }

    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn build(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        apply_plain_env(with_defaults(Config::builder())?, |key| vars.get(key).cloned())?
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults() {
        let settings = build(&[]).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.database.uri, "mongodb://localhost:27017/shidduchim");
        assert_eq!(settings.database.collection, "proposals");
        assert!(settings.database.name.is_none());
        assert_eq!(settings.uploads.max_file_size_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_plain_env_overrides() {
        let settings = build(&[("PORT", "8080"), ("MONGODB_URI", "mongodb://db:27017/prod")]).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.uri, "mongodb://db:27017/prod");
    }

    #[test]
    fn test_bad_port_is_rejected() {
        assert!(build(&[("PORT", "eighty")]).is_err());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
