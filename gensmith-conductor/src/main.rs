//! Gensmith Conductor
//!
//! A worker daemon that polls a pull-task queue and runs gensmith code
//! generation once per leased task.
//!
//! Architecture:
//! - Configuration: CLI flags with environment fallbacks
//! - Repository: HTTP communication with the queue service
//! - Services: Business logic (workspaces, dispatch, log shipping)
//! - Scheduler: Task polling and lifecycle management
//!
//! Each task's payload decodes to a command line for the gensmith CLI.
//! The conductor runs the CLI in an isolated scratch directory, ships the
//! captured log, and acknowledges, deletes or releases the task depending
//! on outcome and retry budget.

mod config;
mod repository;
mod scheduler;
mod service;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::HttpTaskQueue;
use crate::scheduler::TaskPoller;
use crate::service::{CliDispatchService, RemoteLogSink, ScratchWorkspace};
use gensmith_client::QueueClient;

#[derive(Parser)]
#[command(name = "gensmith-conductor")]
#[command(about = "Polls a pull-task queue and runs gensmith code generation per task", long_about = None)]
struct Cli {
    /// Queue service base URL
    #[arg(
        long,
        env = "GENSMITH_QUEUE_URL",
        default_value = "http://localhost:8080"
    )]
    queue_url: String,

    /// Fully qualified queue name to poll
    #[arg(long, env = "GENSMITH_QUEUE_NAME")]
    queue_name: String,

    /// Seconds between poll cycles
    #[arg(long, env = "GENSMITH_POLL_INTERVAL", default_value_t = 5)]
    poll_interval: u64,

    /// Seconds pulled tasks stay leased to this conductor
    #[arg(long, env = "GENSMITH_LEASE_DURATION", default_value_t = 600)]
    lease_duration: u64,

    /// Maximum tasks to lease per poll cycle
    #[arg(long, env = "GENSMITH_MAX_PULL_TASKS", default_value_t = 1)]
    max_pull_tasks: u32,

    /// Prior delivery attempts after which a task is discarded
    #[arg(long, env = "GENSMITH_MAX_ATTEMPTS", default_value_t = 4)]
    max_attempts: u32,

    /// Root directory for per-task scratch workspaces
    #[arg(
        long,
        env = "GENSMITH_WORKSPACE_ROOT",
        default_value = "/tmp/gensmith"
    )]
    workspace_root: PathBuf,

    /// Path to the gensmith CLI binary
    #[arg(long, env = "GENSMITH_CLI", default_value = "gensmith")]
    cli_path: PathBuf,

    /// Seconds a single dispatch may run before it is killed
    #[arg(long, env = "GENSMITH_DISPATCH_TIMEOUT", default_value_t = 300)]
    dispatch_timeout: u64,

    /// Cancel the lease on retryable failures instead of letting it expire
    #[arg(long, env = "GENSMITH_EAGER_RELEASE")]
    eager_release: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.queue_url, self.queue_name);
        config.poll_interval = Duration::from_secs(self.poll_interval);
        config.lease_duration = Duration::from_secs(self.lease_duration);
        config.max_pull_tasks = self.max_pull_tasks;
        config.max_attempts = self.max_attempts;
        config.workspace_root = self.workspace_root;
        config.cli_path = self.cli_path;
        config.dispatch_timeout = Duration::from_secs(self.dispatch_timeout);
        config.eager_release = self.eager_release;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gensmith_conductor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gensmith Conductor");

    // Load configuration
    let config = Cli::parse().into_config();
    config.validate()?;
    info!(
        "Loaded configuration: conductor_id={}, queue={}, queue_url={}",
        config.conductor_id, config.queue_name, config.queue_url
    );
    info!(
        "Poll interval: {:?}, retry budget: {} attempt(s), workspace root: {}",
        config.poll_interval,
        config.max_attempts,
        config.workspace_root.display()
    );

    // Initialize queue client
    let client = QueueClient::new(config.queue_url.clone());

    info!("Queue client initialized");

    // Initialize repository and services
    let queue = Arc::new(HttpTaskQueue::new(
        client.clone(),
        config.queue_name.clone(),
        config.max_pull_tasks,
        config.lease_duration,
    ));
    let workspace = Arc::new(ScratchWorkspace::new(config.workspace_root.clone()));
    let dispatcher = Arc::new(CliDispatchService::new(
        config.cli_path.clone(),
        config.dispatch_timeout,
    ));
    let log_sink = Arc::new(RemoteLogSink::new(client));

    info!("Services initialized");

    // Create task poller
    let poller = TaskPoller::new(config, queue, workspace, dispatcher, log_sink);

    // Start polling loop
    info!("Starting task polling loop");
    poller.run().await
}
