// Task and group API
// Endpoints: /tasks, /tasks/{id}/, /tasks/stats, /tasks/due_today,
// /task-groups, /task-groups/{id}/, /task-groups/{id}/group_stats

use serde_json::json;
use std::sync::Arc;

use super::client::SessionClient;
use crate::error::Result;
use crate::models::{
    CreateTaskRequest, Dashboard, Group, GroupRequest, GroupStats, ResourceId, Task, TaskStats,
    UpdateTaskRequest,
};

fn task_path(id: &ResourceId) -> String {
    format!("/tasks/{}/", urlencoding::encode(&id.to_string()))
}

fn group_path(id: &ResourceId) -> String {
    format!("/task-groups/{}/", urlencoding::encode(&id.to_string()))
}

#[derive(Clone)]
pub struct TaskApi {
    client: Arc<SessionClient>,
}

impl TaskApi {
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self { client }
    }

    // =========================================================================
    // TASKS
    // =========================================================================

    /// GET /tasks - every task of the current user
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self.client.get_json("/tasks").await?;
        tracing::info!("Retrieved {} tasks", tasks.len());
        Ok(tasks)
    }

    /// GET /tasks/?group={id} - filtered by the API
    pub async fn list_tasks_by_group(&self, group_id: &ResourceId) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self
            .client
            .get_json_with_query("/tasks/", &[("group", group_id.to_string())])
            .await?;
        tracing::info!("Retrieved {} tasks for group {}", tasks.len(), group_id);
        Ok(tasks)
    }

    /// POST /tasks/
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task> {
        request.validate()?;
        tracing::info!(
            "Creating task '{}' with priority={}, group={:?}",
            request.title,
            request.priority,
            request.group
        );
        self.client.post_json("/tasks/", request).await
    }

    /// PUT /tasks/{id}/ - partial update
    pub async fn update_task(&self, id: &ResourceId, request: &UpdateTaskRequest) -> Result<Task> {
        request.validate()?;
        tracing::info!("Updating task {}", id);
        self.client.put_json(&task_path(id), request).await
    }

    /// Mark a task done or not done. The API wants the title alongside.
    pub async fn set_complete(&self, task: &Task, done: bool) -> Result<Task> {
        tracing::info!("Setting task {} is_complete={}", task.id, done);
        let body = json!({ "is_complete": done, "title": task.title });
        self.client.put_json(&task_path(&task.id), &body).await
    }

    /// DELETE /tasks/{id}/
    pub async fn delete_task(&self, id: &ResourceId) -> Result<()> {
        tracing::info!("Deleting task {}", id);
        self.client.delete(&task_path(id)).await
    }

    /// Fetch a single task by scanning the list; the API has no detail route
    pub async fn find_task(&self, id: &ResourceId) -> Result<Option<Task>> {
        let tasks = self.list_tasks().await?;
        Ok(tasks.into_iter().find(|t| &t.id == id))
    }

    /// GET /tasks/stats
    pub async fn task_stats(&self) -> Result<TaskStats> {
        self.client.get_json("/tasks/stats").await
    }

    /// GET /tasks/due_today
    pub async fn tasks_due_today(&self) -> Result<Vec<Task>> {
        self.client.get_json("/tasks/due_today").await
    }

    /// Stats and today's tasks, fetched concurrently
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let (stats, due_today) = futures::try_join!(self.task_stats(), self.tasks_due_today())?;
        Ok(Dashboard { stats, due_today })
    }

    // =========================================================================
    // GROUPS
    // =========================================================================

    /// GET /task-groups
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let groups: Vec<Group> = self.client.get_json("/task-groups").await?;
        tracing::info!("Retrieved {} groups", groups.len());
        Ok(groups)
    }

    /// POST /task-groups/
    pub async fn create_group(&self, request: &GroupRequest) -> Result<Group> {
        request.validate()?;
        tracing::info!("Creating group '{}'", request.name);
        self.client.post_json("/task-groups/", request).await
    }

    /// PUT /task-groups/{id}/
    pub async fn update_group(&self, id: &ResourceId, request: &GroupRequest) -> Result<Group> {
        request.validate()?;
        tracing::info!("Updating group {}", id);
        self.client.put_json(&group_path(id), request).await
    }

    /// DELETE /task-groups/{id}/
    pub async fn delete_group(&self, id: &ResourceId) -> Result<()> {
        tracing::info!("Deleting group {}", id);
        self.client.delete(&group_path(id)).await
    }

    /// GET /task-groups/{id}/group_stats
    pub async fn group_stats(&self, id: &ResourceId) -> Result<GroupStats> {
        let path = format!(
            "/task-groups/{}/group_stats",
            urlencoding::encode(&id.to_string())
        );
        self.client.get_json(&path).await
    }
}
