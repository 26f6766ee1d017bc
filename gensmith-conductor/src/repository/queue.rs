//! Queue repository
//!
//! Handles communication with the queue service for task lifecycle
//! operations:
//! - Leasing a batch of available tasks
//! - Acknowledging a task on success
//! - Deleting a task when its retry budget is spent
//! - Cancelling a lease for immediate redelivery

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use gensmith_client::QueueClient;
use gensmith_core::domain::task::{LeasedTask, TaskView};
use gensmith_core::dto::task::PullTasksRequest;

/// Repository trait for task lifecycle operations against the queue
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Leases a batch of available tasks
    ///
    /// An empty batch is a valid result meaning no work is available.
    async fn pull_tasks(&self) -> Result<Vec<LeasedTask>>;

    /// Acknowledges a task, permanently removing it and signalling success
    ///
    /// # Arguments
    /// * `task_name` - Fully qualified name of the task to acknowledge
    async fn acknowledge(&self, task_name: &str) -> Result<()>;

    /// Deletes a task, permanently removing it without success
    ///
    /// # Arguments
    /// * `task_name` - Fully qualified name of the task to delete
    async fn delete(&self, task_name: &str) -> Result<()>;

    /// Cancels the lease on a task so the queue redelivers it immediately
    ///
    /// # Arguments
    /// * `task_name` - Fully qualified name of the leased task
    async fn cancel_lease(&self, task_name: &str) -> Result<()>;
}

/// HTTP implementation of TaskQueue backed by the queue service API
pub struct HttpTaskQueue {
    client: QueueClient,
    queue_name: String,
    max_tasks: u32,
    lease_duration: Duration,
}

impl HttpTaskQueue {
    /// Creates a new HTTP task queue repository
    ///
    /// # Arguments
    /// * `client` - Configured queue service client
    /// * `queue_name` - Fully qualified queue name to pull from
    /// * `max_tasks` - Batch size per pull
    /// * `lease_duration` - How long pulled tasks stay leased
    pub fn new(
        client: QueueClient,
        queue_name: String,
        max_tasks: u32,
        lease_duration: Duration,
    ) -> Self {
        Self {
            client,
            queue_name,
            max_tasks,
            lease_duration,
        }
    }
}

#[async_trait]
impl TaskQueue for HttpTaskQueue {
    async fn pull_tasks(&self) -> Result<Vec<LeasedTask>> {
        let req = PullTasksRequest {
            max_tasks: self.max_tasks,
            response_view: TaskView::Full,
            lease_duration_secs: self.lease_duration.as_secs(),
        };

        self.client
            .pull_tasks(&self.queue_name, req)
            .await
            .context("Failed to pull tasks")
    }

    async fn acknowledge(&self, task_name: &str) -> Result<()> {
        self.client
            .acknowledge_task(task_name)
            .await
            .context("Failed to acknowledge task")
    }

    async fn delete(&self, task_name: &str) -> Result<()> {
        self.client
            .delete_task(task_name)
            .await
            .context("Failed to delete task")
    }

    async fn cancel_lease(&self, task_name: &str) -> Result<()> {
        self.client
            .cancel_lease(task_name)
            .await
            .context("Failed to cancel task lease")
    }
}
