use std::fmt::Write as _;

use futures::future::BoxFuture;
use voglander_api::Device;

use super::View;
use crate::app::App;
use crate::error::CoreError;

/// Fields tried, in order, to label a device row.
const LABEL_FIELDS: [&str; 3] = ["name", "deviceName", "deviceId"];

/// Paged device list. Rendering fetches the configured page into the
/// device store.
#[derive(Debug, Clone, Copy)]
pub struct DeviceView {
    pub page: u64,
    pub size: u64,
}

impl Default for DeviceView {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

fn label(device: &Device) -> String {
    LABEL_FIELDS
        .iter()
        .find_map(|key| device.text(key))
        .unwrap_or_else(|| "-".to_owned())
}

impl View for DeviceView {
    fn name(&self) -> &'static str {
        "Device"
    }

    fn render<'a>(&'a self, app: &'a App) -> BoxFuture<'a, Result<String, CoreError>> {
        Box::pin(async move {
            let page = app.load_devices(self.page, self.size).await?;

            let mut out = String::new();
            let _ = write!(
                out,
                "Devices (page {}, {} of {})",
                page.current,
                page.devices.len(),
                page.total
            );
            if page.devices.is_empty() {
                out.push_str("\n  (none)");
            }
            for device in page.devices.iter() {
                let id = device.id().map_or_else(|| "-".to_owned(), |id| id.to_string());
                let _ = write!(out, "\n  {id:>6}  {}", label(device));
            }
            Ok(out)
        })
    }
}
