//! Login, registration, logout and session status.

use domotic_core::{Accounts, SignUp};
use serde::Serialize;

use super::{Context, util};
use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::error::CliError;
use crate::output;

fn accounts(ctx: &Context) -> Accounts {
    Accounts::new(ctx.client.clone(), ctx.session.clone())
}

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let email = util::text_or_prompt(args.email, "Email")?;
    let password = util::secret_or_prompt(args.password, "Password")?;

    let user = accounts(ctx).login(&email, password, args.remember).await?;

    let who = user.username.as_deref().unwrap_or(&email);
    if args.remember {
        output::success(global, &format!("Logged in as {who} (remembered)"));
    } else {
        output::success(global, &format!("Logged in as {who} for this session"));
    }
    Ok(())
}

pub async fn register(
    ctx: &Context,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = util::text_or_prompt(args.username, "Username")?;
    let email = util::text_or_prompt(args.email, "Email")?;
    let (password, confirm_password) = match args.password {
        Some(p) => (p.clone().into(), p.into()),
        None => (
            util::secret_or_prompt(None, "Password")?,
            util::secret_or_prompt(None, "Confirm password")?,
        ),
    };

    accounts(ctx)
        .register(&SignUp {
            username,
            email: email.clone(),
            password,
            confirm_password,
        })
        .await?;

    output::success(
        global,
        &format!("Account created. Log in with: domotic login --email {email}"),
    );
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) {
    accounts(ctx).logout();
    output::success(global, "Logged out");
}

#[derive(Serialize)]
struct Status {
    authenticated: bool,
    remembered: bool,
    base_url: String,
    selected_home_id: Option<i64>,
    widgets: usize,
}

pub fn status(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let session = ctx.session.session();
    let status = Status {
        authenticated: session.is_authenticated(),
        remembered: session.durable && session.is_authenticated(),
        base_url: ctx.client.base_url().to_owned(),
        selected_home_id: ctx.session.selected_home_id(),
        widgets: ctx.widgets().widgets().len(),
    };

    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            let state = match (s.authenticated, s.remembered) {
                (false, _) => "not logged in",
                (true, true) => "logged in (remembered)",
                (true, false) => "logged in (this session)",
            };
            [
                format!("Session:  {state}"),
                format!("Server:   {}", s.base_url),
                format!(
                    "Home:     {}",
                    s.selected_home_id
                        .map_or_else(|| "-".into(), |id| id.to_string())
                ),
                format!("Widgets:  {}", s.widgets),
            ]
            .join("\n")
        },
        |s| s.authenticated.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
