//! Conductor configuration
//!
//! Defines all configurable parameters for the conductor including the
//! queue connection, polling cadence, retry budget and workspace layout.

use std::path::PathBuf;
use std::time::Duration;

/// Conductor configuration
///
/// All timeouts and intervals are configurable to allow tuning for
/// different deployment scenarios (dev vs prod, fast vs slow queues).
#[derive(Debug, Clone)]
pub struct Config {
    /// Unique identifier for this conductor instance
    pub conductor_id: String,

    /// Queue service base URL (e.g., "http://localhost:8080")
    pub queue_url: String,

    /// Fully qualified name of the queue to poll
    /// (e.g., "projects/p/locations/l/queues/q")
    pub queue_name: String,

    /// How often to poll the queue for new tasks
    pub poll_interval: Duration,

    /// How long pulled tasks stay leased to this conductor
    pub lease_duration: Duration,

    /// Maximum number of tasks to lease per poll cycle
    pub max_pull_tasks: u32,

    /// Prior delivery attempts after which a task is discarded instead of
    /// retried
    pub max_attempts: u32,

    /// Root directory for per-task scratch workspaces
    pub workspace_root: PathBuf,

    /// Path to the gensmith CLI binary invoked per task
    pub cli_path: PathBuf,

    /// Maximum time a single dispatch may run before it is killed
    pub dispatch_timeout: Duration,

    /// Cancel the lease on retryable failures instead of letting it
    /// expire naturally
    pub eager_release: bool,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(queue_url: String, queue_name: String) -> Self {
        Self {
            conductor_id: uuid::Uuid::new_v4().to_string(),
            queue_url,
            queue_name,
            poll_interval: Duration::from_secs(5),
            lease_duration: Duration::from_secs(600),
            max_pull_tasks: 1,
            max_attempts: 4,
            workspace_root: PathBuf::from("/tmp/gensmith"),
            cli_path: PathBuf::from("gensmith"),
            dispatch_timeout: Duration::from_secs(300), // 5 minutes
            eager_release: false,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.conductor_id.is_empty() {
            anyhow::bail!("conductor_id cannot be empty");
        }

        if self.queue_name.is_empty() {
            anyhow::bail!("queue_name cannot be empty");
        }

        if !self.queue_url.starts_with("http://") && !self.queue_url.starts_with("https://") {
            anyhow::bail!("queue_url must start with http:// or https://");
        }

        if self.poll_interval.as_secs() == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_pull_tasks == 0 {
            anyhow::bail!("max_pull_tasks must be greater than 0");
        }

        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be greater than 0");
        }

        if self.dispatch_timeout.as_secs() == 0 {
            anyhow::bail!("dispatch_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            "http://localhost:8080".to_string(),
            "projects/local/locations/dev/queues/codegen".to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.max_pull_tasks, 1);
        assert_eq!(config.workspace_root, PathBuf::from("/tmp/gensmith"));
        assert!(!config.eager_release);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Empty queue name should fail
        config.queue_name = String::new();
        assert!(config.validate().is_err());

        config.queue_name = "projects/p/locations/l/queues/q".to_string();

        // Invalid URL should fail
        config.queue_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.queue_url = "http://localhost:8080".to_string();
        assert!(config.validate().is_ok());

        // Zero retry budget should fail
        config.max_attempts = 0;
        assert!(config.validate().is_err());
    }
}
