//! Device command handlers.

use serde_json::Value;
use tabled::Tabled;

use voglander_api::{Device, DeviceId, Page};
use voglander_core::App;

use crate::cli::{DevicesArgs, DevicesCommand, FilterArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device ID")]
    device_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Keepalive")]
    keepalive: String,
}

fn field(d: &Device, key: &str) -> String {
    d.text(key).unwrap_or_default()
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let address = match (d.text("ip"), d.text("port")) {
            (Some(ip), Some(port)) => format!("{ip}:{port}"),
            (Some(ip), None) => ip,
            _ => String::new(),
        };
        Self {
            id: field(d, "id"),
            device_id: field(d, "deviceId"),
            name: field(d, "name"),
            address,
            status: d
                .text("statusName")
                .or_else(|| d.text("status"))
                .unwrap_or_default(),
            keepalive: field(d, "keepaliveTime"),
        }
    }
}

fn device_key(d: &Device) -> String {
    d.id()
        .map(|id| id.to_string())
        .or_else(|| d.text("deviceId"))
        .unwrap_or_default()
}

fn detail(d: &Device) -> String {
    let mut fields: Vec<_> = d.fields().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    fields
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => "-".into(),
                other => other.to_string(),
            };
            format!("{:<width$} {text}", format!("{key}:"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn print_device(global: &GlobalOpts, data: Value, identifier: String) -> Result<(), CliError> {
    if data.is_null() {
        return Err(CliError::NotFound {
            resource_type: "device".into(),
            identifier,
            list_command: "devices list".into(),
        });
    }
    let device: Device = serde_json::from_value(data)?;
    let out = output::render_single(&global.output, &device, detail, device_key);
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_devices(global: &GlobalOpts, devices: &[Device]) {
    let out = output::render_list(&global.output, devices, |d| DeviceRow::from(d), device_key);
    output::print_output(&out, global.quiet);
}

/// Print whatever `data` a write operation returned, if any.
fn print_result(global: &GlobalOpts, data: &Value) {
    if data.is_null() {
        return;
    }
    let out = output::render_single(&global.output, data, value_text, value_text);
    output::print_output(&out, global.quiet);
}

fn required_filter(args: &FilterArgs) -> Result<Device, CliError> {
    util::filter_entity(args)?.ok_or_else(|| CliError::Validation {
        field: "where".into(),
        reason: "at least one --where FIELD=VALUE (or --from-file) is required".into(),
    })
}

fn page_footer(global: &GlobalOpts, current: u64, pages: u64, total: u64) {
    if matches!(global.output, OutputFormat::Table) {
        output::notice(global, &format!("page {current} of {pages} ({total} total)"));
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(app: &App, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let api = app.device_api();

    match args.command {
        DevicesCommand::Get { id } => {
            let payload = api.get_by_id(&DeviceId::from(id.as_str())).await?;
            print_device(global, util::unwrap_data(payload)?, id)
        }

        DevicesCommand::Find(filter) => {
            let entity = util::filter_entity(&filter)?.unwrap_or_default();
            let payload = api.get_by_entity(&entity).await?;
            let identifier = serde_json::to_string(&entity)?;
            print_device(global, util::unwrap_data(payload)?, identifier)
        }

        DevicesCommand::List(filter) => {
            let entity = util::filter_entity(&filter)?;
            let spinner = output::spinner(global, "Loading devices");
            let result = app.load_device_list(entity.as_ref()).await;
            spinner.finish_and_clear();
            print_devices(global, &result?);
            Ok(())
        }

        DevicesCommand::Page { page, size, filter } => {
            let entity = util::filter_entity(&filter)?;
            let spinner = output::spinner(global, "Loading devices");
            match entity {
                None => {
                    let result = app.load_devices(page, size).await;
                    spinner.finish_and_clear();
                    let loaded = result?;
                    print_devices(global, &loaded.devices);
                    page_footer(global, loaded.current, loaded.pages, loaded.total);
                }
                Some(entity) => {
                    let result = api.get_page_list_by_entity(page, size, Some(&entity)).await;
                    spinner.finish_and_clear();
                    let data = util::unwrap_data(result?)?;
                    let loaded: Page<Device> = if data.is_null() {
                        Page {
                            records: Vec::new(),
                            total: 0,
                            size,
                            current: page,
                            pages: 0,
                        }
                    } else {
                        serde_json::from_value(data)?
                    };
                    print_devices(global, &loaded.records);
                    page_footer(global, loaded.current, loaded.pages, loaded.total);
                }
            }
            Ok(())
        }

        DevicesCommand::Count(filter) => {
            let payload = match util::filter_entity(&filter)? {
                Some(entity) => api.get_count_by_entity(&entity).await?,
                None => api.get_count().await?,
            };
            let count = util::unwrap_data(payload)?;
            let out = output::render_single(&global.output, &count, value_text, value_text);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Insert(payload) => {
            let device = util::device_payload(&payload)?;
            let data = util::unwrap_data(api.insert(&device).await?)?;
            output::success(global, "Device created");
            print_result(global, &data);
            Ok(())
        }

        DevicesCommand::InsertBatch(payload) => {
            let devices = util::devices_payload(&payload)?;
            let data = util::unwrap_data(api.insert_batch(&devices).await?)?;
            output::success(global, &format!("{} device(s) created", devices.len()));
            print_result(global, &data);
            Ok(())
        }

        DevicesCommand::Update(payload) => {
            let device = util::device_payload(&payload)?;
            let data = util::unwrap_data(api.update(&device).await?)?;
            output::success(global, "Device updated");
            print_result(global, &data);
            Ok(())
        }

        DevicesCommand::UpdateBatch(payload) => {
            let devices = util::devices_payload(&payload)?;
            let data = util::unwrap_data(api.update_batch(&devices).await?)?;
            output::success(global, &format!("{} device(s) updated", devices.len()));
            print_result(global, &data);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete device {id}?"), global.yes)? {
                return Ok(());
            }
            let data = util::unwrap_data(api.delete_by_id(&DeviceId::from(id.as_str())).await?)?;
            output::success(global, &format!("Device {id} deleted"));
            print_result(global, &data);
            Ok(())
        }

        DevicesCommand::DeleteWhere(filter) => {
            let entity = required_filter(&filter)?;
            let description = serde_json::to_string(&entity)?;
            if !util::confirm(
                &format!("Delete every device matching {description}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let data = util::unwrap_data(api.delete_by_entity(&entity).await?)?;
            output::success(global, "Matching devices deleted");
            print_result(global, &data);
            Ok(())
        }

        DevicesCommand::DeleteBatch { ids } => {
            let ids: Vec<DeviceId> = ids.into_iter().map(DeviceId::from).collect();
            if !util::confirm(&format!("Delete {} device(s)?", ids.len()), global.yes)? {
                return Ok(());
            }
            let data = util::unwrap_data(api.delete_batch(&ids).await?)?;
            output::success(global, &format!("{} device(s) deleted", ids.len()));
            print_result(global, &data);
            Ok(())
        }
    }
}
