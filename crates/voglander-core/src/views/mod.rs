// ── Views ──
//
// Text renderings of the four application screens. A view reads from and
// writes to the `App` it is rendered against; it holds no state of its own
// beyond presentation settings.

mod about;
mod device;
mod home;

use futures::future::BoxFuture;

pub use about::AboutView;
pub use api_test::ApiTestView;
pub use device::DeviceView;
pub use home::HomeView;

use crate::app::App;
use crate::error::CoreError;

/// A screen reachable through the route table.
pub trait View: Send + Sync {
    /// Route name this view is registered under.
    fn name(&self) -> &'static str;

    /// Render the view's current content as text.
    fn render<'a>(&'a self, app: &'a App) -> BoxFuture<'a, Result<String, CoreError>>;
}
