//! Gensmith Queue Client
//!
//! A simple, type-safe HTTP client for the pull-task-queue service the
//! conductor consumes.
//!
//! This crate provides a unified interface for the queue operations the
//! conductor needs: leasing a batch of tasks, acknowledging or deleting a
//! finished task, cancelling a lease, and shipping log records.
//!
//! # Example
//!
//! ```no_run
//! use gensmith_client::QueueClient;
//! use gensmith_core::dto::task::PullTasksRequest;
//! use gensmith_core::domain::task::TaskView;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = QueueClient::new("http://localhost:8080");
//!
//!     let tasks = client
//!         .pull_tasks(
//!             "projects/foo/locations/bar/queues/baz",
//!             PullTasksRequest {
//!                 max_tasks: 1,
//!                 response_view: TaskView::Full,
//!                 lease_duration_secs: 600,
//!             },
//!         )
//!         .await?;
//!
//!     println!("Leased {} task(s)", tasks.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod logs;
mod tasks;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the task-queue service API
///
/// Task and queue names are fully qualified resource paths
/// (e.g. "projects/p/locations/l/queues/q"), appended verbatim to the
/// base URL the way the service expects.
#[derive(Debug, Clone)]
pub struct QueueClient {
    /// Base URL of the queue service (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl QueueClient {
    /// Create a new queue client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the queue service API
    ///
    /// # Example
    /// ```
    /// use gensmith_client::QueueClient;
    ///
    /// let client = QueueClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new queue client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use gensmith_client::QueueClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = QueueClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the queue service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the
    /// request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is ignored (acknowledge, delete,
    /// cancel-lease, log shipping)
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = QueueClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = QueueClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = QueueClient::with_client("http://localhost:8080", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
