//! Device command handlers.

use std::io::IsTerminal;

use domotic_api::{Device, DeviceId, Gateway, GatewayId, Room};
use domotic_core::{Control, ControlCommand, DeviceForm, DevicesDashboard};
use tabled::Tabled;

use super::{Context, util};
use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Control")]
    control: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.name.clone(),
            label: d.label.to_string(),
            control: d.control_type.to_string(),
            state: Control::for_device(d).to_string(),
        }
    }
}

pub(super) fn detail(d: &Device) -> String {
    [
        format!("ID:       {}", d.id),
        format!("Name:     {}", d.name),
        format!(
            "Room:     {}",
            d.room_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Label:    {} ({})", d.label, d.label.group()),
        format!("Control:  {}", d.control_type),
        format!("State:    {}", Control::for_device(d)),
        format!("Raw:      {}", util::or_dash(d.current_value.as_deref())),
        format!(
            "ESP32:    {}",
            d.esp32_device_id
                .map_or_else(|| "-".into(), |id| id.to_string())
        ),
    ]
    .join("\n")
}

fn view(ctx: &Context, room: Room) -> DevicesDashboard {
    DevicesDashboard::new(ctx.client.clone(), room).with_courtesy_delay(ctx.courtesy_delay)
}

/// Let the user pick a controller when none was given and a terminal is
/// attached. Otherwise the form goes out without one and validation decides.
fn pick_gateway(
    chosen: Option<GatewayId>,
    gateways: &[Gateway],
) -> Result<Option<GatewayId>, CliError> {
    if chosen.is_some() || gateways.is_empty() || !std::io::stdin().is_terminal() {
        return Ok(chosen);
    }
    let items: Vec<String> = gateways
        .iter()
        .map(|g| format!("{} (id {})", g.title_or_default(), g.id))
        .collect();
    let index = dialoguer::Select::new()
        .with_prompt("ESP32 controller")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(CliError::prompt)?;
    Ok(index.and_then(|i| gateways.get(i)).map(|g| g.id))
}

/// What to write to a device.
enum Write {
    Command(ControlCommand),
    Raw(String),
}

/// Write through the device's room view, then show the re-read state.
async fn send(ctx: &Context, id: DeviceId, write: Write, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, room) = util::device_with_room(ctx, id).await?;
    let view = view(ctx, room);
    let written = match write {
        Write::Command(command) => view.command(id, command).await?,
        Write::Raw(value) => view.control(id, &value).await?,
    };
    match written {
        Some(device) => {
            let out = output::render_single(&global.output, &device, detail, |d| {
                d.current_value.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
        }
        None => output::notice(
            global,
            &format!("Value sent to device {id}, but its new state could not be read back"),
        ),
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    ctx: &Context,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { room, list } => {
            let view = view(ctx, util::room(ctx, room).await?);
            view.fetch().await?;
            let devices = match list.filter.as_deref() {
                Some(term) => view.filter(term),
                None => view.devices(),
            };
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let device = ctx.client.devices().get(id).await?;
            let out =
                output::render_single(&global.output, &device, detail, |d| d.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Create {
            room,
            name,
            label,
            control_type,
            esp32,
        } => {
            let view = view(ctx, util::room(ctx, room).await?);
            let gateways = view.load_gateways().await;
            let form = DeviceForm {
                name,
                label,
                control_type,
                esp32_device_id: pick_gateway(esp32, &gateways)?,
            };
            let device = view.create(&form).await?;
            output::success(
                global,
                &format!("Device '{}' created (id {})", device.name, device.id),
            );
            Ok(())
        }

        DevicesCommand::Update {
            id,
            name,
            label,
            control_type,
            esp32,
        } => {
            let (current, room) = util::device_with_room(ctx, id).await?;
            let view = view(ctx, room);
            let form = DeviceForm {
                name: name.unwrap_or(current.name),
                label: label.unwrap_or(current.label),
                control_type: control_type.unwrap_or(current.control_type),
                esp32_device_id: esp32.or(current.esp32_device_id),
            };
            let device = view.update(id, &form).await?;
            output::success(global, &format!("Device '{}' updated", device.name));
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete device {id}?"), global.yes)? {
                return Ok(());
            }
            let (_, room) = util::device_with_room(ctx, id).await?;
            view(ctx, room).delete(id).await?;
            let mut board = ctx.widgets();
            if board.remove(id)? {
                output::notice(global, "Its widget was unpinned as well");
            }
            output::success(global, "Device deleted");
            Ok(())
        }

        DevicesCommand::Refresh { id: Some(id), .. } => {
            let (_, room) = util::device_with_room(ctx, id).await?;
            let device = view(ctx, room).refresh_device(id).await?;
            let out =
                output::render_single(&global.output, &device, detail, |d| d.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Refresh { id: None, room } => {
            let room_id = room.ok_or_else(|| CliError::Validation {
                field: "room".into(),
                reason: "pass a device id or --room".into(),
            })?;
            let view = view(ctx, util::room(ctx, room_id).await?);
            let devices = view.refresh_all().await?;
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Control { id, action } => {
            send(ctx, id, Write::Command(action.into()), global).await
        }

        DevicesCommand::Set { id, value } => {
            send(ctx, id, Write::Command(ControlCommand::Set(value)), global).await
        }

        DevicesCommand::Write { id, value } => send(ctx, id, Write::Raw(value), global).await,
    }
}
