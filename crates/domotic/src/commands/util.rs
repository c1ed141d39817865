//! Shared helpers for command handlers.

use std::io::IsTerminal;

use domotic_api::{Device, DeviceId, Home, HomeId, Room, RoomId};
use domotic_core::navigation::{home_by_id, room_by_id};
use secrecy::SecretString;

use super::Context;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(CliError::prompt)
}

/// Use `value` when given, otherwise ask for it.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    match value {
        Some(v) => Ok(v),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(CliError::prompt),
    }
}

/// Use `value` when given, otherwise ask for it without echo.
pub fn secret_or_prompt(value: Option<String>, prompt: &str) -> Result<SecretString, CliError> {
    let raw = match value {
        Some(v) => v,
        None => dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(CliError::prompt)?,
    };
    Ok(SecretString::from(raw))
}

/// The home a command targets: the flag, else the selected home.
pub fn home_id_or_selected(ctx: &Context, home: Option<HomeId>) -> Result<HomeId, CliError> {
    home.or_else(|| ctx.session.selected_home_id())
        .ok_or_else(|| CliError::Validation {
            field: "home".into(),
            reason: "no home selected; pass --home or run `domotic homes select <id>`".into(),
        })
}

pub async fn home(ctx: &Context, id: HomeId) -> Result<Home, CliError> {
    Ok(home_by_id(id, &ctx.session, &ctx.client).await?)
}

pub async fn room(ctx: &Context, id: RoomId) -> Result<Room, CliError> {
    Ok(room_by_id(id, &ctx.session, &ctx.client).await?)
}

/// A device together with the room it belongs to.
pub async fn device_with_room(ctx: &Context, id: DeviceId) -> Result<(Device, Room), CliError> {
    let device = ctx.client.devices().get(id).await?;
    let room_id = device.room_id.ok_or_else(|| CliError::Validation {
        field: "device".into(),
        reason: format!("device {id} is not assigned to a room"),
    })?;
    let room = room(ctx, room_id).await?;
    Ok((device, room))
}

/// Apply a case-insensitive name filter when one was given.
pub fn filtered<'a, T>(
    all: &'a [T],
    filter: Option<&str>,
    by_term: impl FnOnce(&str) -> Vec<&'a T>,
) -> Vec<&'a T> {
    match filter {
        Some(term) => by_term(term),
        None => all.iter().collect(),
    }
}

/// `"-"` for absent optional text.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
