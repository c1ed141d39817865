//! Home command handlers.

use domotic_api::Home;
use domotic_core::{HomeForm, HomesDashboard};
use serde::Serialize;
use tabled::Tabled;

use super::{Context, util};
use crate::cli::{GlobalOpts, HomesArgs, HomesCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct HomeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Home> for HomeRow {
    fn from(h: &Home) -> Self {
        Self {
            id: h.id.to_string(),
            name: h.name.clone(),
            address: h.address.clone(),
        }
    }
}

#[derive(Serialize)]
struct HomeWithRooms<'a> {
    #[serde(flatten)]
    home: &'a Home,
    rooms: usize,
}

#[derive(Tabled)]
struct HomeCountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Rooms")]
    rooms: usize,
}

pub(super) fn detail(h: &Home) -> String {
    [
        format!("ID:       {}", h.id),
        format!("Name:     {}", h.name),
        format!("Address:  {}", h.address),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: HomesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut view = HomesDashboard::new(ctx.client.clone());

    match args.command {
        HomesCommand::List { list, rooms } => {
            view.fetch().await?;
            let homes: Vec<Home> =
                util::filtered(view.homes(), list.filter.as_deref(), |t| view.filter(t))
                    .into_iter()
                    .cloned()
                    .collect();

            let out = if rooms {
                let counts = view.room_counts().await;
                let data: Vec<HomeWithRooms<'_>> = homes
                    .iter()
                    .map(|h| HomeWithRooms {
                        home: h,
                        rooms: counts.get(&h.id).copied().unwrap_or_default(),
                    })
                    .collect();
                output::render_list(
                    &global.output,
                    &data,
                    |d| HomeCountRow {
                        id: d.home.id.to_string(),
                        name: d.home.name.clone(),
                        address: d.home.address.clone(),
                        rooms: d.rooms,
                    },
                    |d| d.home.id.to_string(),
                )?
            } else {
                output::render_list(&global.output, &homes, |h| HomeRow::from(h), |h| {
                    h.id.to_string()
                })?
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HomesCommand::Get { id } => {
            let home = ctx.client.homes().get(id).await?;
            let out = output::render_single(&global.output, &home, detail, |h| h.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HomesCommand::Create { name, address } => {
            let home = view.create(&HomeForm { name, address }).await?;
            output::success(global, &format!("Home '{}' created (id {})", home.name, home.id));
            Ok(())
        }

        HomesCommand::Update { id, name, address } => {
            let current = ctx.client.homes().get(id).await?;
            let form = HomeForm {
                name: name.unwrap_or(current.name),
                address: address.unwrap_or(current.address),
            };
            let home = view.update(id, &form).await?;
            if ctx.session.cached_home().is_some_and(|h| h.id == id) {
                ctx.session.remember_home(&home)?;
            }
            output::success(global, &format!("Home '{}' updated", home.name));
            Ok(())
        }

        HomesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete home {id} and everything in it? This is destructive."),
                global.yes,
            )? {
                return Ok(());
            }
            view.delete(id).await?;
            if ctx.session.selected_home_id() == Some(id) {
                ctx.session.forget_home();
                ctx.session.forget_room();
            }
            output::success(global, "Home deleted");
            Ok(())
        }

        HomesCommand::Select { id } => {
            let home = ctx.client.homes().get(id).await?;
            ctx.session.remember_home(&home)?;
            ctx.session.forget_room();
            output::success(global, &format!("Selected home '{}'", home.name));
            Ok(())
        }
    }
}
