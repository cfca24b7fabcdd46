use super::AppContext;
use crate::error::Result;
use crate::filter::filter_groups;
use crate::models::{GroupRequest, ResourceId};
use crate::output;

/// All groups, narrowed locally when `search` is given
pub async fn list(ctx: &AppContext, search: Option<&str>) -> Result<()> {
    let groups = ctx.tasks.list_groups().await?;
    let visible = match search {
        Some(query) => filter_groups(&groups, query),
        None => groups,
    };
    output::print_groups(&visible, ctx.format)
}

pub async fn add(ctx: &AppContext, name: String, description: Option<String>) -> Result<()> {
    let group = ctx
        .tasks
        .create_group(&GroupRequest { name, description })
        .await?;
    output::print_group(&group, ctx.format)
}

/// PUT replaces the whole group, so the name is always required
pub async fn edit(
    ctx: &AppContext,
    id: &ResourceId,
    name: String,
    description: Option<String>,
) -> Result<()> {
    let group = ctx
        .tasks
        .update_group(id, &GroupRequest { name, description })
        .await?;
    output::print_group(&group, ctx.format)
}

pub async fn remove(ctx: &AppContext, id: &ResourceId) -> Result<()> {
    ctx.tasks.delete_group(id).await?;
    output::print_message(&format!("Deleted group {}.", id), ctx.format)
}

/// Tasks of one group, filtered by the API rather than locally
pub async fn tasks(ctx: &AppContext, id: &ResourceId) -> Result<()> {
    let tasks = ctx.tasks.list_tasks_by_group(id).await?;
    output::print_tasks(&tasks, &[], ctx.today(), ctx.format)
}

pub async fn stats(ctx: &AppContext, id: &ResourceId) -> Result<()> {
    let stats = ctx.tasks.group_stats(id).await?;
    output::print_group_stats(&stats, ctx.format)
}
