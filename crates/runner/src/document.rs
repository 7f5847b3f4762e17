use std::path::Path;

use payout_types::keys::{DETERMINISTIC_OUTPUT_PATH, ERROR_MESSAGE};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{Stage, StageReport};

/// Recorded when the stage sequence aborts; details only go to the logs
pub const RUN_FAILED_MESSAGE: &str = "Oops something went wrong";

/// Both output artifacts, folded from the stage reports
#[derive(Clone, Debug, PartialEq)]
pub struct StatusDocument {
    entries: Map<String, Value>,
    text: String,
}

impl StatusDocument {
    /// Merge the reports into one document
    ///
    /// The text keeps the report order, except that the protected data block
    /// always closes it.
    pub fn fold(reports: &[StageReport], result_path: &Path, error_message: Option<&str>) -> Self {
        let mut entries = Map::new();

        for report in reports {
            for (key, value) in &report.entries {
                if entries.insert(key.clone(), value.clone()).is_some() {
                    warn!(key = %key, stage = %report.stage, "status key written twice, keeping the last value");
                }
            }
        }

        entries.insert(
            DETERMINISTIC_OUTPUT_PATH.to_string(),
            Value::String(result_path.display().to_string()),
        );
        if let Some(message) = error_message {
            entries.insert(ERROR_MESSAGE.to_string(), Value::String(message.to_string()));
        }

        let (protected, stages): (Vec<&StageReport>, Vec<&StageReport>) = reports
            .iter()
            .partition(|report| report.stage == Stage::ProtectedData);
        let text = stages
            .into_iter()
            .chain(protected)
            .map(|report| report.summary.as_str())
            .collect();

        Self { entries, text }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Contents of `result.txt`
    pub fn result_text(&self) -> &str {
        &self.text
    }

    /// Contents of `computed.json`
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }
}
