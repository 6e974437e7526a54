//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `FIRECAST_BIND_ADDR`
pub const ENV_PREFIX: &str = "FIRECAST";

/// Runtime configuration for the prediction server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,
    /// Model artifact (scaler + regressor + schema)
    pub artifact_path: PathBuf,
    /// Maximum log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of text
    pub log_json: bool,
    /// Install the Prometheus recorder and serve `/metrics`
    pub enable_metrics: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            artifact_path: PathBuf::from("models/forest_fires_gbr.json"),
            log_level: "info".to_string(),
            log_json: false,
            enable_metrics: true,
        }
    }
}

/// Load configuration from defaults, an optional TOML file and `FIRECAST_*`
/// environment variables, in increasing precedence.
///
/// Without an explicit path, `firecast.toml` in the working directory is used
/// if present.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, config::ConfigError> {
    let defaults = ServerConfig::default();

    let builder = config::Config::builder()
        .set_default("bind_addr", defaults.bind_addr)?
        .set_default("artifact_path", defaults.artifact_path.display().to_string())?
        .set_default("log_level", defaults.log_level)?
        .set_default("log_json", defaults.log_json)?
        .set_default("enable_metrics", defaults.enable_metrics)?;

    let builder = match path {
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name("firecast").required(false)),
    };

    builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.enable_metrics);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("firecast-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "bind_addr = \"127.0.0.1:9000\"\nartifact_path = \"/srv/model.json\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.artifact_path, PathBuf::from("/srv/model.json"));
        assert_eq!(config.log_level, "debug");
        assert!(!config.log_json);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(load_config(Some(Path::new("/nonexistent/firecast.toml"))).is_err());
    }
}
