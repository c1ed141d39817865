//! Command dispatch: bridges CLI args -> core views -> output formatting.

pub mod account;
pub mod config_cmd;
pub mod devices;
pub mod esp32;
pub mod homes;
pub mod labels;
pub mod open;
pub mod rooms;
pub mod util;
pub mod widgets;

use std::time::Duration;

use domotic_api::ApiClient;
use domotic_core::{SessionStore, WidgetBoard};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Everything an API-bound command needs.
pub struct Context {
    pub client: ApiClient,
    pub session: SessionStore,
    pub courtesy_delay: Duration,
}

impl Context {
    /// The widget board, sharing the session's durable store.
    pub fn widgets(&self) -> WidgetBoard {
        WidgetBoard::load(self.session.durable_store())
    }
}

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => account::login(ctx, args, global).await,
        Command::Register(args) => account::register(ctx, args, global).await,
        Command::Logout => {
            account::logout(ctx, global);
            Ok(())
        }
        Command::Status => account::status(ctx, global),
        Command::Homes(args) => homes::handle(ctx, args, global).await,
        Command::Rooms(args) => rooms::handle(ctx, args, global).await,
        Command::Devices(args) => devices::handle(ctx, args, global).await,
        Command::Esp32(args) => esp32::handle(ctx, args, global).await,
        Command::Widgets(args) => widgets::handle(ctx, args, global).await,
        Command::Open { path } => open::handle(ctx, &path, global).await,
        // Config, Labels and Completions are handled before dispatch
        Command::Config(_) | Command::Labels | Command::Completions(_) => unreachable!(),
    }
}
