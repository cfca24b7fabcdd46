use super::AppContext;
use crate::error::Result;
use crate::models::{LoginRequest, RegisterRequest};
use crate::output::{self, Format};

pub async fn login(ctx: &AppContext, email: String, password: String) -> Result<()> {
    let user = ctx.auth.login(&LoginRequest { email, password }).await?;
    output::print_user(&user, ctx.format)
}

pub async fn register(
    ctx: &AppContext,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<()> {
    let request = RegisterRequest {
        email,
        password,
        first_name,
        last_name,
    };
    let created = ctx.auth.register(&request).await?;
    match ctx.format {
        Format::Json => output::print_json(&created),
        Format::Pretty => output::print_message(
            &format!(
                "Registered {}. Run `taskhub login` to sign in.",
                request.email
            ),
            Format::Pretty,
        ),
    }
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout().await?;
    output::print_message("Logged out.", ctx.format)
}

/// Prints the current user, or a notice when no session is accepted
pub async fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.auth.check_auth().await? {
        Some(user) => output::print_user(&user, ctx.format),
        None => output::print_message("Not logged in.", ctx.format),
    }
}
