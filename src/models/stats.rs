// Aggregate statistics served by the API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::task::Task;

/// GET /tasks/stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub total_done: u64,
    #[serde(default)]
    pub total_pending: u64,
}

/// GET /task-groups/{id}/group_stats
///
/// Only the counters are typed; anything else the API adds is passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    #[serde(default)]
    pub total_tasks: u64,
    #[serde(default)]
    pub completed_tasks: u64,
    #[serde(default)]
    pub pending_tasks: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dashboard summary: overall counts plus what is due today
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub stats: TaskStats,
    pub due_today: Vec<Task>,
}
