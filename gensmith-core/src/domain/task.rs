//! Leased task domain types
//!
//! Wire representation of tasks as delivered by the queue service. Field
//! names follow the queue API's camelCase JSON convention. The conductor
//! only ever holds a transient, leased reference to a task; the queue
//! service owns the record.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a task payload into a command line
#[derive(Debug, Error)]
pub enum PayloadError {
    /// Payload bytes are not valid base64
    #[error("payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// Decoded payload is not valid UTF-8
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Payload decoded to an empty command line
    #[error("payload decodes to an empty command line")]
    Empty,
}

/// A task leased from the queue service
///
/// The payload carries a base64-encoded, whitespace-delimited command line
/// for the gensmith CLI. The attempt count tracks prior deliveries and
/// bounds retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasedTask {
    /// Fully qualified task name,
    /// e.g. "projects/p/locations/l/queues/q/tasks/t"
    pub name: String,

    /// Pull delivery target carrying the encoded command line
    pub pull_target: PullTarget,

    /// Delivery bookkeeping maintained by the queue service
    #[serde(default)]
    pub task_status: TaskStatus,

    /// Scheduled delivery time, empty when unset
    #[serde(default)]
    pub schedule_time: String,

    /// Level of detail the task was fetched with
    #[serde(default)]
    pub view: TaskView,
}

/// Pull target of a leased task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullTarget {
    /// Base64-encoded command-line payload
    pub payload: String,
}

/// Delivery status of a leased task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// Number of prior delivery attempts, carried as a string on the wire
    #[serde(default)]
    pub attempt_dispatch_count: String,
}

/// Level of detail in a task representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskView {
    Basic,
    #[default]
    Full,
}

impl LeasedTask {
    /// Number of prior delivery attempts
    ///
    /// The queue service serializes the counter as a string. Absent or
    /// malformed values count as zero.
    pub fn attempt_count(&self) -> u32 {
        self.task_status
            .attempt_dispatch_count
            .parse()
            .unwrap_or(0)
    }

    /// Decodes the payload into a command-line argument vector
    ///
    /// The payload is base64 over a UTF-8, whitespace-delimited argument
    /// list.
    pub fn command_args(&self) -> Result<Vec<String>, PayloadError> {
        let bytes = BASE64.decode(&self.pull_target.payload)?;
        let line = String::from_utf8(bytes)?;
        let args: Vec<String> = line.split_whitespace().map(str::to_string).collect();

        if args.is_empty() {
            return Err(PayloadError::Empty);
        }

        Ok(args)
    }

    /// Last path segment of the task name, for log readability
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with(payload: &str, attempts: &str) -> LeasedTask {
        LeasedTask {
            name: "projects/foo/locations/bar/queues/baz/tasks/fake".to_string(),
            pull_target: PullTarget {
                payload: payload.to_string(),
            },
            task_status: TaskStatus {
                attempt_dispatch_count: attempts.to_string(),
            },
            schedule_time: String::new(),
            view: TaskView::Full,
        }
    }

    #[test]
    fn test_command_args_decodes_payload() {
        // Decoded string is "--api pubsub --lang python"
        let task = task_with("LS1hcGkgcHVic3ViIC0tbGFuZyBweXRob24=", "0");

        let args = task.command_args().unwrap();
        assert_eq!(args, vec!["--api", "pubsub", "--lang", "python"]);
    }

    #[test]
    fn test_command_args_rejects_invalid_base64() {
        let task = task_with("not base64!!!", "0");
        assert!(matches!(
            task.command_args(),
            Err(PayloadError::Encoding(_))
        ));
    }

    #[test]
    fn test_command_args_rejects_empty_command_line() {
        // "   " encoded
        let task = task_with("ICAg", "0");
        assert!(matches!(task.command_args(), Err(PayloadError::Empty)));
    }

    #[test]
    fn test_attempt_count_parses_wire_string() {
        assert_eq!(task_with("", "4").attempt_count(), 4);
        assert_eq!(task_with("", "0").attempt_count(), 0);
    }

    #[test]
    fn test_attempt_count_defaults_to_zero_on_garbage() {
        assert_eq!(task_with("", "").attempt_count(), 0);
        assert_eq!(task_with("", "many").attempt_count(), 0);
    }

    #[test]
    fn test_short_name() {
        let task = task_with("", "0");
        assert_eq!(task.short_name(), "fake");
    }

    #[test]
    fn test_deserializes_queue_wire_format() {
        let json = r#"{
            "name": "projects/foo/locations/bar/queues/baz/tasks/fake",
            "pullTarget": {
                "payload": "LS1hcGkgcHVic3ViIC0tbGFuZyBweXRob24="
            },
            "taskStatus": {
                "attemptDispatchCount": "4"
            },
            "scheduleTime": "",
            "view": "FULL"
        }"#;

        let task: LeasedTask = serde_json::from_str(json).unwrap();
        assert_eq!(
            task.name,
            "projects/foo/locations/bar/queues/baz/tasks/fake"
        );
        assert_eq!(task.attempt_count(), 4);
        assert_eq!(task.view, TaskView::Full);
        assert_eq!(task.schedule_time, "");
    }

    #[test]
    fn test_deserializes_without_optional_fields() {
        let json = r#"{
            "name": "projects/foo/locations/bar/queues/baz/tasks/bare",
            "pullTarget": { "payload": "" }
        }"#;

        let task: LeasedTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.attempt_count(), 0);
        assert_eq!(task.view, TaskView::Full);
    }
}
