//! Room command handlers.

use domotic_api::{Room, RoomQuery, SortOrder};
use domotic_core::{RoomForm, RoomsDashboard, dashboard::VIEW_PAGE_SIZE};
use tabled::Tabled;

use super::{Context, util};
use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            description: util::or_dash(r.description.as_deref()).to_owned(),
        }
    }
}

fn detail(r: &Room) -> String {
    [
        format!("ID:           {}", r.id),
        format!("Name:         {}", r.name),
        format!(
            "Home:         {}",
            r.home_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Description:  {}", util::or_dash(r.description.as_deref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(ctx: &Context, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List {
            home,
            list,
            sort_by: Some(sort_by),
            order,
        } => {
            // Server-side order is kept as returned.
            let home_id = util::home_id_or_selected(ctx, home)?;
            let query = RoomQuery::page(0, VIEW_PAGE_SIZE)
                .sorted(sort_by, order.unwrap_or(SortOrder::Asc));
            let rooms = ctx
                .client
                .rooms()
                .list_by_home(home_id, &query)
                .await?
                .into_items();
            let term = list.filter.map(|f| f.to_lowercase());
            let rooms: Vec<&Room> = rooms
                .iter()
                .filter(|r| {
                    term.as_deref()
                        .is_none_or(|t| r.name.to_lowercase().contains(t))
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &rooms,
                |r| RoomRow::from(*r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::List { home, list, .. } => {
            let home_id = util::home_id_or_selected(ctx, home)?;
            let mut view = RoomsDashboard::new(ctx.client.clone(), util::home(ctx, home_id).await?);
            view.fetch().await?;
            let rooms = util::filtered(view.rooms(), list.filter.as_deref(), |t| view.filter(t));
            let out = output::render_list(
                &global.output,
                &rooms,
                |r| RoomRow::from(*r),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Get { id } => {
            let room = ctx.client.rooms().get(id).await?;
            let out = output::render_single(&global.output, &room, detail, |r| r.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Create {
            home,
            name,
            description,
        } => {
            let home_id = util::home_id_or_selected(ctx, home)?;
            let mut view = RoomsDashboard::new(ctx.client.clone(), util::home(ctx, home_id).await?);
            let room = view.create(&RoomForm { name, description }).await?;
            output::success(
                global,
                &format!(
                    "Room '{}' created in '{}' (id {})",
                    room.name,
                    view.home().name,
                    room.id
                ),
            );
            Ok(())
        }

        RoomsCommand::Update {
            id,
            name,
            description,
        } => {
            let current = ctx.client.rooms().get(id).await?;
            let home_id = util::home_id_or_selected(ctx, current.home_id)?;
            let mut view = RoomsDashboard::new(ctx.client.clone(), util::home(ctx, home_id).await?);
            let form = RoomForm {
                name: name.unwrap_or(current.name),
                description: description.or(current.description),
            };
            let room = view.update(id, &form).await?;
            if ctx.session.cached_room().is_some_and(|r| r.id == id) {
                ctx.session.remember_room(&room)?;
            }
            output::success(global, &format!("Room '{}' updated", room.name));
            Ok(())
        }

        RoomsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete room {id} and its devices? This is destructive."),
                global.yes,
            )? {
                return Ok(());
            }
            let current = ctx.client.rooms().get(id).await?;
            let home_id = util::home_id_or_selected(ctx, current.home_id)?;
            let mut view = RoomsDashboard::new(ctx.client.clone(), util::home(ctx, home_id).await?);
            view.delete(id).await?;
            if ctx.session.cached_room().is_some_and(|r| r.id == id) {
                ctx.session.forget_room();
            }
            output::success(global, "Room deleted");
            Ok(())
        }
    }
}
