//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::{Map, Value};

use voglander_api::{AjaxResult, Device};

use crate::cli::{FilterArgs, PayloadArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// `--where` values that parse as JSON keep their type; the rest are strings.
/// Numbers must print back exactly as typed, so long IDs and leading zeros
/// are not rounded or trimmed.
fn field_value(raw: &str) -> Value {
    match serde_json::from_str(raw) {
        Ok(Value::Number(n)) if n.to_string() != raw => Value::String(raw.to_owned()),
        Ok(value) => value,
        Err(_) => Value::String(raw.to_owned()),
    }
}

/// Build the filter entity, or `None` when no filter was given.
pub fn filter_entity(args: &FilterArgs) -> Result<Option<Device>, CliError> {
    if let Some(ref path) = args.from_file {
        return match read_json_file(path)? {
            Value::Object(map) => Ok(Some(Device::from(map))),
            _ => Err(CliError::Validation {
                field: "from-file".into(),
                reason: "filter must be a JSON object".into(),
            }),
        };
    }
    if args.fields.is_empty() {
        return Ok(None);
    }
    let map: Map<String, Value> = args
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), field_value(v)))
        .collect();
    Ok(Some(Device::from(map)))
}

/// Parse `--data` or `--from-file` into JSON.
pub fn payload(args: &PayloadArgs) -> Result<Value, CliError> {
    match (&args.from_file, &args.data) {
        (Some(path), _) => read_json_file(path),
        (None, Some(raw)) => serde_json::from_str(raw).map_err(|e| CliError::Validation {
            field: "data".into(),
            reason: format!("invalid JSON: {e}"),
        }),
        (None, None) => Err(CliError::Validation {
            field: "data".into(),
            reason: "pass --data or --from-file".into(),
        }),
    }
}

/// A single device object from a payload.
pub fn device_payload(args: &PayloadArgs) -> Result<Device, CliError> {
    match payload(args)? {
        Value::Object(map) => Ok(Device::from(map)),
        _ => Err(CliError::Validation {
            field: "data".into(),
            reason: "expected a JSON object".into(),
        }),
    }
}

/// An array of device objects from a payload.
pub fn devices_payload(args: &PayloadArgs) -> Result<Vec<Device>, CliError> {
    match payload(args)? {
        value @ Value::Array(_) => Ok(serde_json::from_value(value)?),
        _ => Err(CliError::Validation {
            field: "data".into(),
            reason: "expected a JSON array of objects".into(),
        }),
    }
}

/// Unwrap the backend envelope, surfacing non-zero codes as errors.
pub fn unwrap_data(payload: Value) -> Result<Value, CliError> {
    let data = AjaxResult::<Value>::from_payload(payload).and_then(AjaxResult::into_data)?;
    Ok(data.unwrap_or(Value::Null))
}
