//! Artifact Sources
//!
//! Artifacts are fetched as raw bytes, either from a local directory or from
//! a model hub speaking the Hugging Face `resolve` URL layout. Parsing is the
//! same for both.

use crate::classifier::ClassifierFormat;
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Default hub endpoint for remote artifacts
pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// File names of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFiles {
    pub model: String,
    pub scaler: String,
    pub metadata: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            model: "exoplanet_model_advanced.onnx".to_string(),
            scaler: "scaler_advanced.json".to_string(),
            metadata: "model_metadata_advanced.json".to_string(),
        }
    }
}

/// Where artifacts are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Directory on local disk
    Local { dir: PathBuf },
    /// Model hub repository
    Remote {
        endpoint: String,
        repo_id: String,
        revision: String,
        token: Option<String>,
    },
}

impl ArtifactSource {
    /// Local directory source
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        ArtifactSource::Local { dir: dir.into() }
    }

    /// Human-readable location for logs
    pub fn describe(&self) -> String {
        match self {
            ArtifactSource::Local { dir } => format!("local:{}", dir.display()),
            ArtifactSource::Remote {
                endpoint,
                repo_id,
                revision,
                ..
            } => format!("{endpoint}/{repo_id}@{revision}"),
        }
    }

    /// Download URL of a file in a remote repository
    pub fn url_for(&self, file: &str) -> Option<String> {
        match self {
            ArtifactSource::Local { .. } => None,
            ArtifactSource::Remote {
                endpoint,
                repo_id,
                revision,
                ..
            } => Some(format!(
                "{}/{}/resolve/{}/{}",
                endpoint.trim_end_matches('/'),
                repo_id,
                revision,
                file
            )),
        }
    }

    /// Read one artifact. `client` is only used by remote sources.
    pub async fn fetch(
        &self,
        client: &reqwest::Client,
        file: &str,
    ) -> Result<Vec<u8>, InferenceError> {
        match self {
            ArtifactSource::Local { dir } => {
                let path = dir.join(file);
                debug!("Reading artifact {}", path.display());
                tokio::fs::read(&path).await.map_err(|e| {
                    InferenceError::ArtifactLoad(format!("{}: {e}", path.display()))
                })
            }
            ArtifactSource::Remote { token, .. } => {
                let url = self.url_for(file).unwrap_or_default();
                info!("Downloading artifact {}", url);

                let mut request = client.get(&url);
                if let Some(token) = token {
                    request = request.bearer_auth(token);
                }
                let response = request
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| InferenceError::ArtifactLoad(format!("{url}: {e}")))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| InferenceError::ArtifactLoad(format!("{url}: {e}")))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Full description of which artifacts to load and how
#[derive(Debug, Clone)]
pub struct ArtifactLocation {
    pub source: ArtifactSource,
    pub files: ArtifactFiles,
    /// Classifier format; guessed from the model file name when unset
    pub format: Option<ClassifierFormat>,
}

impl ArtifactLocation {
    pub fn new(source: ArtifactSource) -> Self {
        Self {
            source,
            files: ArtifactFiles::default(),
            format: None,
        }
    }

    /// Resolve the classifier format
    pub fn classifier_format(&self) -> Result<ClassifierFormat, InferenceError> {
        self.format
            .or_else(|| ClassifierFormat::from_file_name(&self.files.model))
            .ok_or_else(|| {
                InferenceError::ArtifactLoad(format!(
                    "cannot infer classifier format from '{}'",
                    self.files.model
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_url_layout() {
        let source = ArtifactSource::Remote {
            endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            repo_id: "XcodeAddy/exoplanet-model-advanced".to_string(),
            revision: "main".to_string(),
            token: None,
        };
        assert_eq!(
            source.url_for("scaler_advanced.json").unwrap(),
            "https://huggingface.co/XcodeAddy/exoplanet-model-advanced/resolve/main/scaler_advanced.json"
        );
        assert!(ArtifactSource::local("models").url_for("x").is_none());
    }

    #[test]
    fn test_trailing_slash_in_endpoint() {
        let source = ArtifactSource::Remote {
            endpoint: "http://mirror.local/".to_string(),
            repo_id: "org/model".to_string(),
            revision: "v2".to_string(),
            token: None,
        };
        assert_eq!(
            source.url_for("m.onnx").unwrap(),
            "http://mirror.local/org/model/resolve/v2/m.onnx"
        );
    }

    #[test]
    fn test_format_resolution() {
        let mut location = ArtifactLocation::new(ArtifactSource::local("models"));
        assert_eq!(location.classifier_format().unwrap(), ClassifierFormat::Onnx);

        location.files.model = "model.pkl".to_string();
        assert!(location.classifier_format().is_err());

        location.format = Some(ClassifierFormat::Linear);
        assert_eq!(location.classifier_format().unwrap(), ClassifierFormat::Linear);
    }

    #[tokio::test]
    async fn test_local_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = ArtifactSource::local(dir.path());
        assert!(matches!(
            source.fetch(&reqwest::Client::new(), "absent.json").await,
            Err(InferenceError::ArtifactLoad(_))
        ));
    }

    #[tokio::test]
    async fn test_local_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), b"{}").unwrap();
        let bytes = ArtifactSource::local(dir.path())
            .fetch(&reqwest::Client::new(), "a.json")
            .await
            .unwrap();
        assert_eq!(bytes, b"{}");
    }
}
