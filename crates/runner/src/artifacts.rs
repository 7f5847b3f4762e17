use std::path::{Path, PathBuf};

use payout_config::OutputConfig;
use tracing::{error, info};

use crate::{ArtifactError, StatusDocument};

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), ArtifactError> {
    let io_err = |source: std::io::Error| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, contents).await.map_err(io_err)
}

/// Write `result.txt`, then `computed.json`
///
/// The second write is attempted even if the first one fails; the first
/// error is returned.
pub async fn write_artifacts(
    document: &StatusDocument,
    result_path: &Path,
    computed_path: &Path,
) -> Result<(), ArtifactError> {
    let text = write_file(result_path, document.result_text().as_bytes()).await;

    let computed = match document.to_json() {
        Ok(json) => write_file(computed_path, json.as_bytes()).await,
        Err(e) => Err(ArtifactError::Render(e)),
    };

    for (path, outcome) in [(result_path, &text), (computed_path, &computed)] {
        match outcome {
            Ok(()) => info!(path = %path.display(), "artifact written"),
            Err(e) => error!(path = %path.display(), error = %e, "artifact not written"),
        }
    }

    text.and(computed)
}

/// Locations of the two artifacts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub result: PathBuf,
    pub computed: PathBuf,
}

impl ArtifactPaths {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            result: output.result_path(),
            computed: output.computed_path(),
        }
    }
}
