//! ESP32 controller command handlers.

use domotic_api::Gateway;
use domotic_core::GatewaysDashboard;
use tabled::Tabled;

use super::{Context, util};
use crate::cli::{Esp32Args, Esp32Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

const TOKEN_PREVIEW: usize = 8;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Token")]
    token: String,
}

impl From<&Gateway> for GatewayRow {
    fn from(g: &Gateway) -> Self {
        Self {
            id: g.id.to_string(),
            title: g.title_or_default().to_owned(),
            token: token_preview(g.token.as_deref()),
        }
    }
}

fn token_preview(token: Option<&str>) -> String {
    match token {
        Some(t) if t.chars().count() > TOKEN_PREVIEW => {
            format!("{}…", t.chars().take(TOKEN_PREVIEW).collect::<String>())
        }
        other => util::or_dash(other).to_owned(),
    }
}

fn detail(g: &Gateway) -> String {
    [
        format!("ID:     {}", g.id),
        format!("Title:  {}", util::or_dash(g.title.as_deref())),
        format!("Token:  {}", util::or_dash(g.token.as_deref())),
    ]
    .join("\n")
}

fn show(gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, gateway, detail, |g| {
        g.token.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: Esp32Args, global: &GlobalOpts) -> Result<(), CliError> {
    let mut view = GatewaysDashboard::new(ctx.client.clone());

    match args.command {
        Esp32Command::List { list } => {
            view.fetch().await?;
            let gateways =
                util::filtered(view.gateways(), list.filter.as_deref(), |t| view.filter(t));
            let out = output::render_list(
                &global.output,
                &gateways,
                |g| GatewayRow::from(*g),
                |g| g.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        Esp32Command::Get { id } => show(&ctx.client.gateways().get(id).await?, global),

        Esp32Command::Create { title } => {
            let gateway = view.create(&title).await?;
            output::success(global, &format!("ESP32 controller created (id {})", gateway.id));
            show(&gateway, global)
        }

        Esp32Command::Rename { id, title } => {
            let gateway = view.rename(id, &title).await?;
            output::success(
                global,
                &format!("ESP32 controller renamed to '{}'", gateway.title_or_default()),
            );
            Ok(())
        }

        Esp32Command::RotateToken { id } => {
            if !util::confirm(
                &format!("Issue a new token for ESP32 controller {id}? The old one stops working."),
                global.yes,
            )? {
                return Ok(());
            }
            let gateway = view.rotate_token(id).await?;
            output::success(global, "Token rotated; flash the new one to the controller");
            show(&gateway, global)
        }

        Esp32Command::Delete { id } => {
            if !util::confirm(&format!("Delete ESP32 controller {id}?"), global.yes)? {
                return Ok(());
            }
            view.delete(id).await?;
            output::success(global, "ESP32 controller deleted");
            Ok(())
        }
    }
}
