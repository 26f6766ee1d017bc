//! Task poller
//!
//! Polls the queue for leased tasks and processes them strictly
//! sequentially: one task is driven to a terminal state (acknowledged,
//! deleted, or left for redelivery) before the next is considered.
//!
//! Per task the poller prepares an isolated work context, decodes the
//! payload into a command line, dispatches the gensmith CLI, classifies
//! the outcome against the retry budget, and performs exactly one
//! finalization action. Log shipping and context cleanup run for every
//! terminal outcome.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::repository::TaskQueue;
use crate::service::{DispatchService, LogSink, WorkContext, WorkspaceService};
use gensmith_client::ClientError;
use gensmith_core::domain::outcome::ExecutionOutcome;
use gensmith_core::domain::task::LeasedTask;

/// Poller that continuously leases and processes tasks
pub struct TaskPoller {
    config: Config,
    queue: Arc<dyn TaskQueue>,
    workspace: Arc<dyn WorkspaceService>,
    dispatcher: Arc<dyn DispatchService>,
    log_sink: Arc<dyn LogSink>,
}

impl TaskPoller {
    /// Creates a new task poller
    pub fn new(
        config: Config,
        queue: Arc<dyn TaskQueue>,
        workspace: Arc<dyn WorkspaceService>,
        dispatcher: Arc<dyn DispatchService>,
        log_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config,
            queue,
            workspace,
            dispatcher,
            log_sink,
        }
    }

    /// Starts the polling loop
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting task poller (interval: {:?})",
            self.config.poll_interval
        );

        let mut interval = time::interval(self.config.poll_interval);

        loop {
            interval.tick().await;

            debug!("Polling queue for tasks");

            match self.poll_once().await {
                Ok(processed) => {
                    if processed > 0 {
                        info!("Processed {} task(s) this cycle", processed);
                    }
                }
                Err(e) => {
                    error!("Error during poll cycle: {:#}", e);
                }
            }
        }
    }

    /// Performs a single poll cycle
    async fn poll_once(&self) -> Result<usize> {
        let tasks = self
            .queue
            .pull_tasks()
            .await
            .context("Failed to fetch tasks from queue")?;

        if tasks.is_empty() {
            debug!("No tasks available");
            return Ok(0);
        }

        info!("Leased {} task(s)", tasks.len());

        let mut processed = 0;

        // One task is fully finalized before the next is considered.
        for task in &tasks {
            match self.process_task(task).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    error!(task = %task.short_name(), "Failed to process task: {:#}", e);
                }
            }
        }

        Ok(processed)
    }

    /// Drives a single task to a terminal state
    async fn process_task(&self, task: &LeasedTask) -> Result<()> {
        let attempts = task.attempt_count();
        info!(task = %task.short_name(), attempts, "Processing task");

        let ctx = self
            .workspace
            .prepare()
            .context("Failed to prepare work context")?;

        let exhausted = attempts >= self.config.max_attempts;
        let dispatch_succeeded = if exhausted {
            // The retry budget is already spent; this delivery is
            // discarded without invoking the CLI again.
            warn!(
                task = %task.short_name(),
                attempts,
                max_attempts = self.config.max_attempts,
                "Retry budget spent, discarding delivery without dispatch"
            );
            false
        } else {
            match self.dispatch_task(task, &ctx).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(task = %task.short_name(), "Dispatch failed: {:#}", e);
                    false
                }
            }
        };

        let outcome =
            ExecutionOutcome::classify(dispatch_succeeded, attempts, self.config.max_attempts);
        let finalized = self.finalize(task, outcome).await;

        // Log shipping and cleanup run for every terminal outcome, even
        // when finalization itself failed.
        if let Err(e) = self.log_sink.ship(&ctx.id, &ctx.log_path).await {
            warn!(id = %ctx.id, "Failed to ship log: {:#}", e);
        }
        if let Err(e) = self.workspace.cleanup(&ctx) {
            warn!(id = %ctx.id, "Failed to clean up work context: {:#}", e);
        }

        finalized
    }

    /// Decodes the payload and invokes the CLI with the generated user
    /// configuration appended
    async fn dispatch_task(&self, task: &LeasedTask, ctx: &WorkContext) -> Result<()> {
        let mut args = task
            .command_args()
            .context("Failed to decode task payload")?;
        args.push("--user-config".to_string());
        args.push(ctx.user_config_path.display().to_string());

        self.dispatcher.dispatch(&args, &ctx.log_path).await
    }

    /// Performs the single finalization action for the outcome
    async fn finalize(&self, task: &LeasedTask, outcome: ExecutionOutcome) -> Result<()> {
        match outcome {
            ExecutionOutcome::Succeeded => {
                self.remove_task(task, true).await?;
                info!(task = %task.short_name(), "Task acknowledged");
            }
            ExecutionOutcome::FailedExhausted => {
                self.remove_task(task, false).await?;
                warn!(task = %task.short_name(), "Task deleted after exhausting its retry budget");
            }
            ExecutionOutcome::FailedRetryable => {
                if self.config.eager_release {
                    self.queue
                        .cancel_lease(&task.name)
                        .await
                        .context("Failed to release task lease")?;
                    info!(task = %task.short_name(), "Task lease released for redelivery");
                } else {
                    // No action: the lease expires and the queue
                    // redelivers with an incremented attempt count.
                    info!(task = %task.short_name(), "Task left leased, queue will redeliver");
                }
            }
        }

        Ok(())
    }

    /// Removes a task from the queue, acknowledging or deleting it
    ///
    /// A not-found response is tolerated: the lease may have expired and
    /// another conductor finalized the task first, which at-least-once
    /// delivery makes benign.
    async fn remove_task(&self, task: &LeasedTask, acknowledge: bool) -> Result<()> {
        let result = if acknowledge {
            self.queue.acknowledge(&task.name).await
        } else {
            self.queue.delete(&task.name).await
        };

        match result {
            Ok(()) => Ok(()),
            Err(e)
                if e.downcast_ref::<ClientError>()
                    .is_some_and(ClientError::is_not_found) =>
            {
                warn!(task = %task.short_name(), "Task already gone: {:#}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
