//! Task lifecycle endpoints
//!
//! Pull-queue operations the conductor consumes:
//! - Leasing a batch of tasks from a named queue
//! - Acknowledging a task (permanent removal, signals success)
//! - Deleting a task (permanent removal, signals "give up")
//! - Cancelling a lease (makes the task available for redelivery now)

use tracing::debug;

use crate::QueueClient;
use crate::error::Result;
use gensmith_core::domain::task::LeasedTask;
use gensmith_core::dto::task::{PullTasksRequest, PullTasksResponse};

impl QueueClient {
    /// Lease a batch of tasks from a queue
    ///
    /// # Arguments
    /// * `queue_name` - Fully qualified queue name
    /// * `req` - Batch size, response view and lease duration
    ///
    /// # Returns
    /// The leased tasks; an empty batch means no work is available.
    pub async fn pull_tasks(
        &self,
        queue_name: &str,
        req: PullTasksRequest,
    ) -> Result<Vec<LeasedTask>> {
        let url = format!("{}/v2/{}/tasks:pull", self.base_url, queue_name);
        debug!(queue = queue_name, max_tasks = req.max_tasks, "pulling tasks");

        let response = self.client.post(&url).json(&req).send().await?;

        let body: PullTasksResponse = self.handle_response(response).await?;
        Ok(body.tasks)
    }

    /// Acknowledge a task, permanently removing it from the queue
    ///
    /// # Arguments
    /// * `task_name` - Fully qualified task name
    pub async fn acknowledge_task(&self, task_name: &str) -> Result<()> {
        let url = format!("{}/v2/{}:acknowledge", self.base_url, task_name);
        debug!(task = task_name, "acknowledging task");

        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Delete a task, permanently removing it without signalling success
    ///
    /// # Arguments
    /// * `task_name` - Fully qualified task name
    pub async fn delete_task(&self, task_name: &str) -> Result<()> {
        let url = format!("{}/v2/{}", self.base_url, task_name);
        debug!(task = task_name, "deleting task");

        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Cancel the lease on a task so the queue can redeliver it immediately
    ///
    /// The service echoes the task back; the body is ignored.
    ///
    /// # Arguments
    /// * `task_name` - Fully qualified task name
    pub async fn cancel_lease(&self, task_name: &str) -> Result<()> {
        let url = format!("{}/v2/{}:cancelLease", self.base_url, task_name);
        debug!(task = task_name, "cancelling task lease");

        let response = self.client.post(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
