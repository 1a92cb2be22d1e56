// ============================================================================
// notesync-cli/src/commands/inspect.rs
// ============================================================================
//
// INSPECT COMMAND: Shows the merged signature of a registered command
//
// For every parameter the report lists its flag, kind, type, default, env var
// and the callables that declared it.

use notesync_core::{DefaultValue, MergedSignature};
use serde::Serialize;

use crate::error::CliResult;
use crate::output;
use crate::registry::Entry;
use crate::render::flag_name;

/// One parameter of a merged signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRow {
    pub name: String,
    pub flag: String,
    pub kind: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub default: String,
    pub env: Option<String>,
    pub declared_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureReport {
    pub command: String,
    pub signature: String,
    pub parameters: Vec<ParameterRow>,
}

fn describe_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Required => "required".to_string(),
        DefaultValue::Unspecified => "unspecified".to_string(),
        DefaultValue::Value(value) => value.to_string(),
    }
}

pub fn report(command: &str, merged: &MergedSignature) -> SignatureReport {
    let parameters = merged
        .signature()
        .iter()
        .map(|param| {
            let declared_by = merged
                .provenance()
                .sources(&param.name)
                .into_iter()
                .flatten()
                .filter_map(|source| merged.source_name(*source))
                .map(str::to_string)
                .collect();

            ParameterRow {
                name: param.name.clone(),
                flag: format!("--{}", flag_name(&param.name)),
                kind: param.kind.to_string(),
                type_name: param
                    .annotation
                    .as_ref()
                    .map_or_else(|| "str".to_string(), ToString::to_string),
                default: describe_default(&param.default),
                env: param.env.clone(),
                declared_by,
            }
        })
        .collect();

    SignatureReport {
        command: command.to_string(),
        signature: merged.signature().to_string(),
        parameters,
    }
}

/// Prints the report for a registered command.
pub fn run(entry: &Entry, json: bool) -> CliResult<()> {
    let report = report(&entry.path.join(" "), entry.command.merged_signature());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
    }
    Ok(())
}
