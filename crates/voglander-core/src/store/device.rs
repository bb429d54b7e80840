// ── Device list store ──

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use voglander_api::Device;

/// Point-in-time device state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSnapshot {
    pub devices: Arc<Vec<Device>>,
    pub selected: Option<Arc<Device>>,
    pub loading: bool,
}

/// Holds the last fetched device list, the current selection and a
/// loading flag. Lists are stored exactly as given.
#[derive(Debug)]
pub struct DeviceStore {
    state: watch::Sender<Arc<DeviceSnapshot>>,
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(DeviceSnapshot::default()));
        Self { state }
    }

    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        self.state.borrow().clone()
    }

    /// The stored list; the same `Arc` that was handed to `set_devices`.
    pub fn devices(&self) -> Arc<Vec<Device>> {
        Arc::clone(&self.state.borrow().devices)
    }

    pub fn selected_device(&self) -> Option<Arc<Device>> {
        self.state.borrow().selected.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Replace the device list. No copy, sort or filter is applied.
    pub fn set_devices(&self, devices: impl Into<Arc<Vec<Device>>>) -> Arc<Vec<Device>> {
        let devices = devices.into();
        debug!(count = devices.len(), "device list replaced");
        self.update(|next| next.devices = Arc::clone(&devices));
        devices
    }

    /// Select a device, or clear the selection with `None`.
    pub fn select_device(&self, device: Option<Device>) {
        self.update(|next| next.selected = device.map(Arc::new));
    }

    pub fn set_loading(&self, loading: bool) {
        self.update(|next| next.loading = loading);
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DeviceSnapshot>> {
        self.state.subscribe()
    }

    fn update(&self, apply: impl FnOnce(&mut DeviceSnapshot)) {
        self.state.send_modify(|state| {
            let mut next = DeviceSnapshot::clone(state);
            apply(&mut next);
            *state = Arc::new(next);
        });
    }
}
