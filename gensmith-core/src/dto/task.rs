//! Task DTOs for the queue service API

use serde::{Deserialize, Serialize};

use crate::domain::task::{LeasedTask, TaskView};

/// Request body for pulling a batch of tasks from a queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullTasksRequest {
    /// Maximum number of tasks to lease in one call
    pub max_tasks: u32,
    /// Level of detail requested for the returned tasks
    pub response_view: TaskView,
    /// How long the returned tasks stay leased to this worker
    pub lease_duration_secs: u64,
}

/// Response body of a pull call
///
/// An absent or empty task list is a valid, non-error result: no work is
/// currently available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullTasksResponse {
    #[serde(default)]
    pub tasks: Vec<LeasedTask>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_request_serializes_camel_case() {
        let req = PullTasksRequest {
            max_tasks: 1,
            response_view: TaskView::Full,
            lease_duration_secs: 600,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["maxTasks"], 1);
        assert_eq!(json["responseView"], "FULL");
        assert_eq!(json["leaseDurationSecs"], 600);
    }

    #[test]
    fn test_empty_pull_response_is_valid() {
        let resp: PullTasksResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.tasks.is_empty());
    }
}
