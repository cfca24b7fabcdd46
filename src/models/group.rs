// Task group models
// Path: /task-groups/{id}/ - counts are computed by the API, never locally

use serde::{Deserialize, Serialize};

use super::id::ResourceId;
use crate::error::{ClientError, Result};

/// A named collection of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Number of tasks in the group (API supplied)
    #[serde(default)]
    pub total_tasks: u64,
    /// Number of completed tasks in the group (API supplied)
    #[serde(default)]
    pub completed_tasks: u64,
}

impl Group {
    /// Share of completed tasks, 0.0 for an empty group
    pub fn progress_percent(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        self.completed_tasks as f64 / self.total_tasks as f64 * 100.0
    }
}

/// Request body for POST /task-groups/ and PUT /task-groups/{id}/
#[derive(Debug, Clone, Serialize)]
pub struct GroupRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GroupRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Invalid("Name is required".to_string()));
        }
        Ok(())
    }
}
