use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {file_name} to the results directory")]
    Io {
        file_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize {file_name}")]
    Serialize {
        file_name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persists result artifacts under one results directory, created on first
/// use. Artifacts are written once; callers pick unique file names.
///
/// There are two lanes: the `try_export_*` methods return the error, the
/// `export_*` methods downgrade it to a warning. Artifact persistence is
/// best effort and must never change the outcome of a verification that
/// already ran, so the orchestration flow only uses the downgrading lane.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    results_dir: PathBuf,
}

impl ResultExporter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub async fn try_export_text(
        &self,
        file_name: &str,
        content: &str,
    ) -> Result<(), ExportError> {
        self.write(file_name, content.as_bytes()).await
    }

    pub async fn try_export_json(
        &self,
        file_name: &str,
        document: &serde_json::Value,
    ) -> Result<(), ExportError> {
        let rendered =
            serde_json::to_vec_pretty(document).map_err(|source| ExportError::Serialize {
                file_name: file_name.to_string(),
                source,
            })?;
        self.write(file_name, &rendered).await
    }

    pub async fn export_text(&self, file_name: &str, content: &str) {
        if let Err(e) = self.try_export_text(file_name, content).await {
            log::warn!("Failed to store result artifact: {e:?}");
        }
    }

    pub async fn export_json(&self, file_name: &str, document: &serde_json::Value) {
        if let Err(e) = self.try_export_json(file_name, document).await {
            log::warn!("Failed to store result artifact: {e:?}");
        }
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<(), ExportError> {
        let io = async {
            tokio::fs::create_dir_all(&self.results_dir).await?;
            tokio::fs::write(self.results_dir.join(file_name), bytes).await
        };

        io.await.map_err(|source| ExportError::Io {
            file_name: file_name.to_string(),
            source,
        })
    }
}
