//! Reference data: device labels and control types.

use domotic_api::{ControlType, Label};
use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Entry {
    kind: &'static str,
    value: String,
    group: Option<String>,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Group")]
    group: String,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let labels = Label::iter()
        .filter(|l| *l != Label::Other)
        .map(|l| Entry {
            kind: "label",
            value: l.to_string(),
            group: Some(l.group().to_string()),
        });
    let controls = ControlType::iter()
        .filter(|c| *c != ControlType::Other)
        .map(|c| Entry {
            kind: "control-type",
            value: c.to_string(),
            group: None,
        });
    let entries: Vec<Entry> = labels.chain(controls).collect();

    let out = output::render_list(
        &global.output,
        &entries,
        |e| EntryRow {
            kind: e.kind,
            value: e.value.clone(),
            group: e.group.clone().unwrap_or_default(),
        },
        |e| e.value.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
