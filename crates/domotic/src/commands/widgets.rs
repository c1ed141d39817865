//! Widget board command handlers and the interactive device picker.

use std::io::IsTerminal;

use domotic_api::DeviceId;
use domotic_core::{Control, SelectionWizard, Widget, WidgetSelection, WizardStep};
use tabled::Tabled;
use tracing::warn;

use super::{Context, util};
use crate::cli::{GlobalOpts, WidgetsArgs, WidgetsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WidgetRow {
    #[tabled(rename = "Device")]
    device_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Home")]
    home: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Widget> for WidgetRow {
    fn from(w: &Widget) -> Self {
        Self {
            device_id: w.device_id.to_string(),
            name: w.device.name.clone(),
            home: w.home_name.clone(),
            room: w.room_name.clone(),
            state: Control::for_device(&w.device).to_string(),
        }
    }
}

// ── Picker ──────────────────────────────────────────────────────────

const BACK: &str = "← Back";

fn prompt_for(step: WizardStep) -> &'static str {
    match step {
        WizardStep::SelectingHome => "Home",
        WizardStep::SelectingRoom => "Room",
        WizardStep::SelectingDevice | WizardStep::Cancelled => "Device",
    }
}

/// Walk home, room, device with terminal prompts. `None` when cancelled.
async fn pick(ctx: &Context) -> Result<Option<WidgetSelection>, CliError> {
    let mut wizard = SelectionWizard::new();

    loop {
        let step = wizard.step();
        if step == WizardStep::Cancelled {
            return Ok(None);
        }

        if wizard.load(&ctx.client).await.is_err() {
            let message = wizard.error().unwrap_or("Loading failed").to_owned();
            eprintln!("{message}");
            if !dialoguer::Confirm::new()
                .with_prompt("Retry?")
                .default(true)
                .interact()
                .map_err(CliError::prompt)?
            {
                wizard.cancel();
            }
            continue;
        }

        let choices = wizard.filter("");
        if choices.is_empty() {
            eprintln!("No {}s here", prompt_for(step).to_lowercase());
            wizard.back();
            continue;
        }

        let mut items: Vec<&str> = choices.iter().map(|(_, name)| name.as_str()).collect();
        items.push(BACK);
        let picked = dialoguer::Select::new()
            .with_prompt(prompt_for(step))
            .items(&items)
            .default(0)
            .interact_opt()
            .map_err(CliError::prompt)?;

        let Some(index) = picked else {
            wizard.cancel();
            continue;
        };
        let Some(&(id, _)) = choices.get(index) else {
            wizard.back();
            continue;
        };

        match step {
            WizardStep::SelectingHome => wizard.choose_home(id)?,
            WizardStep::SelectingRoom => wizard.choose_room(id)?,
            WizardStep::SelectingDevice => {
                wizard.choose_device(id)?;
                if wizard.can_confirm() {
                    return Ok(Some(wizard.confirm()?));
                }
            }
            WizardStep::Cancelled => {}
        }
    }
}

/// Build a selection straight from a device id.
async fn selection_for(ctx: &Context, id: DeviceId) -> Result<WidgetSelection, CliError> {
    let (device, room) = util::device_with_room(ctx, id).await?;
    let home_id = room.home_id.ok_or_else(|| CliError::Validation {
        field: "device".into(),
        reason: format!("room {} is not assigned to a home", room.id),
    })?;
    let home = util::home(ctx, home_id).await?;
    Ok(WidgetSelection {
        device,
        room_name: room.name,
        home_name: home.name,
    })
}

fn print_board(widgets: &[Widget], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(&global.output, widgets, |w| WidgetRow::from(w), |w| {
        w.device_id.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: WidgetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut board = ctx.widgets();

    match args.command {
        WidgetsCommand::List => print_board(board.widgets(), global),

        WidgetsCommand::Add { device } => {
            let selection = match device {
                Some(id) => selection_for(ctx, id).await?,
                None if std::io::stdin().is_terminal() => match pick(ctx).await? {
                    Some(selection) => selection,
                    None => {
                        output::notice(global, "Cancelled");
                        return Ok(());
                    }
                },
                None => {
                    return Err(CliError::Validation {
                        field: "device".into(),
                        reason: "pass --device <ID> when not running interactively".into(),
                    });
                }
            };

            let name = selection.device.name.clone();
            if board.add(selection.device, selection.room_name, selection.home_name)? {
                output::success(global, &format!("Pinned '{name}'"));
            } else {
                output::notice(global, &format!("'{name}' is already pinned"));
            }
            Ok(())
        }

        WidgetsCommand::Remove { device } => {
            if board.remove(device)? {
                output::success(global, "Widget removed");
                Ok(())
            } else {
                Err(CliError::NotFound {
                    resource_type: "widget".into(),
                    identifier: device.to_string(),
                    list_command: "widgets list".into(),
                })
            }
        }

        WidgetsCommand::Refresh { device: Some(id) } => {
            board.refresh(&ctx.client, id).await?;
            print_board(board.widgets(), global)
        }

        WidgetsCommand::Refresh { device: None } => {
            let ids: Vec<DeviceId> = board.widgets().iter().map(|w| w.device_id).collect();
            for id in ids {
                if let Err(e) = board.refresh(&ctx.client, id).await {
                    warn!(device_id = id, error = %e, "widget refresh failed");
                    output::notice(global, &format!("Device {id}: {e}"));
                }
            }
            print_board(board.widgets(), global)
        }
    }
}
