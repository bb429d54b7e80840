//! Application layer between `voglander-api` and the CLI.
//!
//! - **[`App`]**: facade owning the shared [`ApiClient`](voglander_api::ApiClient),
//!   the resource APIs, both stores and the route table. Session flows
//!   ([`login`](App::login), [`logout`](App::logout)) and device loading live here.
//!
//! - **Stores** ([`UserStore`], [`DeviceStore`]): explicit containers over a
//!   `tokio::sync::watch` snapshot. Every mutation swaps the whole snapshot.
//!
//! - **[`RouteTable`]**: four fixed routes. `/` and `/about` are built up
//!   front; `/device` and `/api-test` are built on first navigation.
//!
//! - **Views** ([`views`]): text renderings resolved through the route table.

pub mod app;
pub mod config;
pub mod error;
pub mod router;
pub mod store;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use app::{App, LoadedPage};
pub use config::{AppConfig, DEFAULT_TITLE, Mode};
pub use error::CoreError;
pub use router::{Route, RouteTable, RouterError, ViewLoader};
pub use store::{DeviceSnapshot, DeviceStore, UserSnapshot, UserStore};
pub use views::View;

// The client's own fallback origin, used when nothing else is configured.
pub use voglander_api::DEFAULT_BASE_URL;
