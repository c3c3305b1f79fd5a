//! Rate document sources.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// A source that yields the raw rate document once at startup.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Get the source name.
    fn name(&self) -> &str;

    /// Fetch the raw document. Any failure to obtain it is
    /// [`FxError::RateLoadFailed`]; the content is validated by the caller.
    async fn fetch(&self) -> FxResult<String>;
}

/// Reads the rate document from a JSON file.
#[derive(Debug, Clone)]
pub struct FileRateSource {
    name: String,
    path: PathBuf,
}

impl FileRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }
}

#[async_trait]
impl RateSource for FileRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> FxResult<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => {
                debug!(path = %self.path.display(), bytes = document.len(), "Read rate document");
                Ok(document)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read rate document");
                Err(FxError::RateLoadFailed {
                    source_name: self.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// In-memory rate document, for tests and demos.
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    name: String,
    document: Option<String>,
}

impl StaticRateSource {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: Some(document.into()),
        }
    }

    /// A source whose fetch always fails.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            document: None,
        }
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> FxResult<String> {
        self.document
            .clone()
            .ok_or_else(|| FxError::RateLoadFailed {
                source_name: self.name.clone(),
                reason: "source unavailable".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rates": {{"USD": 1}}}}"#).unwrap();

        let source = FileRateSource::new(file.path());
        let document = source.fetch().await.unwrap();

        assert_eq!(document, r#"{"rates": {"USD": 1}}"#);
    }

    #[tokio::test]
    async fn test_missing_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileRateSource::new(dir.path().join("rates.json"));

        let result = source.fetch().await;

        assert!(matches!(result, Err(FxError::RateLoadFailed { .. })));
        assert!(result.unwrap_err().is_fatal());
    }

    #[test]
    fn test_unavailable_static_source() {
        let source = StaticRateSource::unavailable("offline");
        let result = tokio_test::block_on(source.fetch());

        assert_eq!(
            result,
            Err(FxError::RateLoadFailed {
                source_name: "offline".to_string(),
                reason: "source unavailable".to_string(),
            })
        );
    }
}
