use futures::future::BoxFuture;

use super::View;
use crate::app::App;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default)]
pub struct AboutView;

impl View for AboutView {
    fn name(&self) -> &'static str {
        "About"
    }

    fn render<'a>(&'a self, app: &'a App) -> BoxFuture<'a, Result<String, CoreError>> {
        Box::pin(async move {
            let config = app.config();
            Ok(format!(
                "About {}\nVersion:  {}\nBackend:  {}",
                config.title,
                env!("CARGO_PKG_VERSION"),
                config.env_base_url,
            ))
        })
    }
}
