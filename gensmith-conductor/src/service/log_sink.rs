//! Log sink service
//!
//! Ships the log file of a finished task to the logging sink, keyed by
//! the work-context identifier. Shipping happens for every terminal
//! outcome; the poller treats sink failures as non-fatal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;

use gensmith_client::QueueClient;
use gensmith_core::dto::log::ShipLogRequest;

/// Service trait for shipping task logs
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Ships the log file of a finished task
    ///
    /// # Arguments
    /// * `source_id` - Work-context identifier the log belongs to
    /// * `log_path` - Path to the log file to ship
    async fn ship(&self, source_id: &str, log_path: &Path) -> Result<()>;
}

/// LogSink implementation backed by the queue service's log endpoint
pub struct RemoteLogSink {
    client: QueueClient,
}

impl RemoteLogSink {
    /// Creates a new remote log sink
    pub fn new(client: QueueClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogSink for RemoteLogSink {
    async fn ship(&self, source_id: &str, log_path: &Path) -> Result<()> {
        let content = tokio::fs::read_to_string(log_path)
            .await
            .with_context(|| format!("Failed to read log file {}", log_path.display()))?;

        self.client
            .ship_log(ShipLogRequest {
                source_id: source_id.to_string(),
                content,
                shipped_at: chrono::Utc::now(),
            })
            .await
            .context("Failed to ship log record")?;

        Ok(())
    }
}
