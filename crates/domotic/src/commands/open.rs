//! `open <path>`: show the view a path addresses.
//!
//! The home and room named by the path are restored from the session cache
//! when it matches and fetched otherwise, then the matching list command
//! runs.

use domotic_core::Route;
use domotic_core::navigation::{restore_home, restore_room};

use super::{Context, devices, esp32, homes, rooms};
use crate::cli::{
    DevicesArgs, DevicesCommand, Esp32Args, Esp32Command, GlobalOpts, HomesArgs, HomesCommand,
    ListArgs, RoomsArgs, RoomsCommand,
};
use crate::error::CliError;

fn no_filter() -> ListArgs {
    ListArgs { filter: None }
}

fn breadcrumb(global: &GlobalOpts, parts: &[&str]) {
    if !global.quiet {
        eprintln!("{}", parts.join(" › "));
    }
}

pub async fn handle(ctx: &Context, path: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let route = Route::parse(path);
    tracing::debug!(path, %route, "opening view");

    match route {
        Route::Homes => {
            let args = HomesArgs {
                command: HomesCommand::List {
                    list: no_filter(),
                    rooms: false,
                },
            };
            homes::handle(ctx, args, global).await
        }

        Route::Gateways => {
            let args = Esp32Args {
                command: Esp32Command::List { list: no_filter() },
            };
            esp32::handle(ctx, args, global).await
        }

        Route::Rooms { home_id } => {
            if let Some(home) = restore_home(route, &ctx.session, &ctx.client).await? {
                breadcrumb(global, &[&home.name]);
            }
            let args = RoomsArgs {
                command: RoomsCommand::List {
                    home: Some(home_id),
                    list: no_filter(),
                    sort_by: None,
                    order: None,
                },
            };
            rooms::handle(ctx, args, global).await
        }

        Route::Devices { room_id, .. } => {
            let home = restore_home(route, &ctx.session, &ctx.client).await?;
            let room = restore_room(route, &ctx.session, &ctx.client).await?;
            if let (Some(home), Some(room)) = (&home, &room) {
                breadcrumb(global, &[&home.name, &room.name]);
            }
            let args = DevicesArgs {
                command: DevicesCommand::List {
                    room: room_id,
                    list: no_filter(),
                },
            };
            devices::handle(ctx, args, global).await
        }
    }
}
