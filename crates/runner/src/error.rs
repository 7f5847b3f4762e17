use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Stages of a worker run, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ConfidentialTransfer,
    CrossChain,
    ProtectedData,
    Erc20,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::ConfidentialTransfer,
        Stage::CrossChain,
        Stage::ProtectedData,
        Stage::Erc20,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::ConfidentialTransfer => "confidential_transfer",
            Stage::CrossChain => "cross_chain",
            Stage::ProtectedData => "protected_data",
            Stage::Erc20 => "erc20",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stage failure; `message` is what the status document records
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

impl StageError {
    pub fn new(stage: Stage, error: impl fmt::Display) -> Self {
        Self {
            stage,
            message: error.to_string(),
        }
    }
}

/// Failure to write an output artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render status document: {0}")]
    Render(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_displays_message_only() {
        let err = StageError::new(Stage::ConfidentialTransfer, "relay timeout");
        assert_eq!(err.to_string(), "relay timeout");
        assert_eq!(err.stage, Stage::ConfidentialTransfer);
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ALL[0], Stage::ConfidentialTransfer);
        assert_eq!(Stage::ALL[3], Stage::Erc20);
    }
}
