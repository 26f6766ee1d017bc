//! Log-shipping endpoint

use tracing::debug;

use crate::QueueClient;
use crate::error::Result;
use gensmith_core::dto::log::ShipLogRequest;

impl QueueClient {
    /// Ship a task's log content to the logging sink
    ///
    /// # Arguments
    /// * `req` - Work-context id, log content and ship timestamp
    pub async fn ship_log(&self, req: ShipLogRequest) -> Result<()> {
        let url = format!("{}/v2/logs", self.base_url);
        debug!(
            source_id = %req.source_id,
            bytes = req.content.len(),
            "shipping log record"
        );

        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_empty_response(response).await
    }
}
