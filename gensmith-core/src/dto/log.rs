//! Log-shipping DTOs

use serde::{Deserialize, Serialize};

/// A completion record shipped to the logging sink after a task finishes
///
/// `source_id` is the work-context identifier of the processed task, so
/// log records can be correlated with the scratch directory that produced
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipLogRequest {
    /// Work-context identifier the log belongs to
    pub source_id: String,
    /// Full content of the task's log file
    pub content: String,
    /// When the conductor shipped the record
    pub shipped_at: chrono::DateTime<chrono::Utc>,
}
