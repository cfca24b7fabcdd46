use super::AppContext;
use crate::error::Result;
use crate::output;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let dashboard = ctx.tasks.dashboard().await?;
    output::print_dashboard(&dashboard, ctx.today(), ctx.format)
}
