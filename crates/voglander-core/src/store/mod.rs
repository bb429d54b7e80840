// ── Application state stores ──
//
// Each store owns a `watch` channel holding an immutable snapshot.
// Mutations build the next snapshot and swap it in whole, so readers
// never observe a half-applied update.

mod device;
mod user;

pub use device::{DeviceSnapshot, DeviceStore};
pub use user::{UserSnapshot, UserStore};
