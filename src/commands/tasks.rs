use chrono::NaiveDate;

use super::AppContext;
use crate::error::{ClientError, Result};
use crate::filter::{
    apply_filters, DateRange, DueDateFilter, FilterCriteria, PriorityFilter, SortBy, StatusFilter,
};
use crate::models::{CreateTaskRequest, Group, Priority, ResourceId, Task, UpdateTaskRequest};
use crate::output::{self, Format};

/// Raw `tasks list` flags
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub sort: Option<SortBy>,
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    pub due: Option<DueDateFilter>,
    pub groups: Vec<ResourceId>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ListOptions {
    /// A half-open `--from`/`--to` pair is ignored
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            sort_by: self.sort.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            priority: self.priority.clone().unwrap_or_default(),
            due_date: self.due.unwrap_or_default(),
            selected_groups: self.groups.iter().cloned().collect(),
            search_query: self.search.clone().unwrap_or_default(),
            date_range: DateRange::from_bounds(self.from, self.to),
        }
    }
}

/// Edit flag pair for a clearable field: a value sets it, `clear` sends null
pub fn field_update<T>(value: Option<T>, clear: bool) -> Option<Option<T>> {
    if clear {
        Some(None)
    } else {
        value.map(Some)
    }
}

/// Group names are only needed for pretty output
async fn groups_for_display(ctx: &AppContext) -> Result<Vec<Group>> {
    match ctx.format {
        Format::Json => Ok(Vec::new()),
        Format::Pretty => ctx.tasks.list_groups().await,
    }
}

async fn require_task(ctx: &AppContext, id: &ResourceId) -> Result<Task> {
    ctx.tasks
        .find_task(id)
        .await?
        .ok_or_else(|| ClientError::Invalid(format!("task {} not found", id)))
}

pub async fn list(ctx: &AppContext, options: &ListOptions) -> Result<()> {
    let (tasks, groups) = futures::try_join!(ctx.tasks.list_tasks(), groups_for_display(ctx))?;
    let today = ctx.today();
    let visible = apply_filters(&tasks, &options.criteria(), today);
    tracing::info!("Showing {} of {} tasks", visible.len(), tasks.len());
    output::print_tasks(&visible, &groups, today, ctx.format)
}

pub async fn today(ctx: &AppContext) -> Result<()> {
    let tasks = ctx.tasks.tasks_due_today().await?;
    output::print_tasks(&tasks, &[], ctx.today(), ctx.format)
}

pub async fn add(
    ctx: &AppContext,
    title: String,
    description: Option<String>,
    priority: Option<Priority>,
    group: Option<ResourceId>,
    due: Option<NaiveDate>,
) -> Result<()> {
    let mut request = CreateTaskRequest::new(title);
    request.description = description;
    request.priority = priority.unwrap_or_default();
    request.group = group;
    request.due_date = due;

    let task = ctx.tasks.create_task(&request).await?;
    output::print_task(&task, &[], ctx.today(), ctx.format)
}

pub async fn edit(ctx: &AppContext, id: &ResourceId, changes: UpdateTaskRequest) -> Result<()> {
    if changes.is_empty() {
        return Err(ClientError::Invalid("nothing to update".to_string()));
    }
    let task = ctx.tasks.update_task(id, &changes).await?;
    output::print_task(&task, &[], ctx.today(), ctx.format)
}

pub async fn set_done(ctx: &AppContext, id: &ResourceId, done: bool) -> Result<()> {
    let task = require_task(ctx, id).await?;
    let updated = ctx.tasks.set_complete(&task, done).await?;
    output::print_task(&updated, &[], ctx.today(), ctx.format)
}

pub async fn remove(ctx: &AppContext, id: &ResourceId) -> Result<()> {
    ctx.tasks.delete_task(id).await?;
    output::print_message(&format!("Deleted task {}.", id), ctx.format)
}
