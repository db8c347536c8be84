//! Service Configuration
//!
//! Defaults, then an optional TOML file, then `EXOHUNT__SECTION__KEY`
//! environment variables.

use crate::rate_limit::RateLimitConfig;
use config::{Config, ConfigError, Environment, File};
use inference_engine::{
    ArtifactFiles, ArtifactLocation, ArtifactSource, ClassifierFormat,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the config file
pub const CONFIG_PATH_ENV: &str = "EXOHUNT_CONFIG";

/// Config file used when `EXOHUNT_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "exohunt.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Allow any origin (dashboards are served from other hosts)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            cors_permissive: true,
        }
    }
}

/// Where artifacts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Remote,
}

/// Artifact location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub source: SourceKind,
    /// Directory for local artifacts
    pub dir: PathBuf,
    /// Hub endpoint for remote artifacts
    pub endpoint: String,
    pub repo_id: String,
    pub revision: String,
    pub token: Option<String>,
    pub model_file: String,
    pub scaler_file: String,
    pub metadata_file: String,
    /// Classifier format; guessed from `model_file` when unset
    pub classifier_format: Option<ClassifierFormat>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        let files = ArtifactFiles::default();
        Self {
            source: SourceKind::Local,
            dir: PathBuf::from("models/trained"),
            endpoint: inference_engine::DEFAULT_HUB_ENDPOINT.to_string(),
            repo_id: "XcodeAddy/exoplanet-model-advanced".to_string(),
            revision: "main".to_string(),
            token: None,
            model_file: files.model,
            scaler_file: files.scaler,
            metadata_file: files.metadata,
            classifier_format: None,
        }
    }
}

impl ArtifactConfig {
    /// Build the loader's artifact location
    pub fn location(&self) -> ArtifactLocation {
        let source = match self.source {
            SourceKind::Local => ArtifactSource::local(&self.dir),
            SourceKind::Remote => ArtifactSource::Remote {
                endpoint: self.endpoint.clone(),
                repo_id: self.repo_id.clone(),
                revision: self.revision.clone(),
                token: self.token.clone(),
            },
        };

        ArtifactLocation {
            source,
            files: ArtifactFiles {
                model: self.model_file.clone(),
                scaler: self.scaler_file.clone(),
                metadata: self.metadata_file.clone(),
            },
            format: self.classifier_format,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn, error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Load using the file named by `EXOHUNT_CONFIG`, if any
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load with an explicit (optional) config file
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("EXOHUNT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load_from("/nonexistent/exohunt.toml").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.artifacts.source, SourceKind::Local);
        assert_eq!(config.artifacts.model_file, "exoplanet_model_advanced.onnx");
        assert!(config.metrics.enabled);
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exohunt.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[artifacts]
source = "remote"
repo_id = "org/exo"
model_file = "linear.json"
classifier_format = "linear"

[logging]
level = "debug"
json = true
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert!(config.server.cors_permissive);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        let location = config.artifacts.location();
        assert_eq!(
            location.source.url_for("linear.json").unwrap(),
            "https://huggingface.co/org/exo/resolve/main/linear.json"
        );
        assert_eq!(location.format, Some(ClassifierFormat::Linear));
        assert_eq!(location.files.scaler, "scaler_advanced.json");
    }
}
