//! Dispatch service
//!
//! Invokes the gensmith CLI as a subprocess with the argument vector
//! decoded from a task payload. The CLI's stdout and stderr are captured
//! in the task's log file. A watchdog timeout bounds how long a single
//! dispatch may block the conductor.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Service trait for running one code-generation command
///
/// The conductor catches the error at the per-task boundary and turns it
/// into an execution outcome; it is never propagated further.
#[async_trait]
pub trait DispatchService: Send + Sync {
    /// Runs the CLI with the given argument vector
    ///
    /// # Arguments
    /// * `args` - Full argument vector, including the appended
    ///   `--user-config <path>` pair
    /// * `log_path` - File the subprocess output is appended to
    async fn dispatch(&self, args: &[String], log_path: &Path) -> Result<()>;
}

/// Subprocess implementation of DispatchService
pub struct CliDispatchService {
    cli_path: PathBuf,
    timeout: Duration,
}

impl CliDispatchService {
    /// Creates a new CLI dispatch service
    ///
    /// # Arguments
    /// * `cli_path` - Path to the gensmith CLI binary
    /// * `timeout` - Watchdog timeout for a single dispatch
    pub fn new(cli_path: PathBuf, timeout: Duration) -> Self {
        Self { cli_path, timeout }
    }
}

#[async_trait]
impl DispatchService for CliDispatchService {
    async fn dispatch(&self, args: &[String], log_path: &Path) -> Result<()> {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let stderr_file = log_file
            .try_clone()
            .context("Failed to clone log file handle")?;

        debug!(cli = %self.cli_path.display(), ?args, "spawning code generation");

        let mut child = Command::new(&self.cli_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_file))
            .stderr(Stdio::from(stderr_file))
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.cli_path.display()))?;

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status.context("Failed to wait for code generation process")?,
            Err(_) => {
                child
                    .start_kill()
                    .context("Failed to kill timed-out code generation process")?;
                bail!("code generation timed out after {:?}", self.timeout);
            }
        };

        if !status.success() {
            bail!("code generation exited with {}", status);
        }

        Ok(())
    }
}
