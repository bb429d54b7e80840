use std::fmt::Write as _;

use futures::future::BoxFuture;

use super::View;
use crate::app::App;
use crate::error::CoreError;

/// Landing screen: title, mode, backend and session status.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeView;

impl View for HomeView {
    fn name(&self) -> &'static str {
        "Home"
    }

    fn render<'a>(&'a self, app: &'a App) -> BoxFuture<'a, Result<String, CoreError>> {
        Box::pin(async move {
            let config = app.config();
            let session = match app.user_store().user() {
                Some(user) => format!("signed in as {}", user.username().unwrap_or("<unnamed>")),
                None => "not signed in".to_owned(),
            };

            let mut out = String::new();
            let _ = writeln!(out, "{}", config.title);
            let _ = writeln!(out, "Mode:     {}", config.mode);
            let _ = writeln!(out, "API base: {}", config.api_base_url);
            let _ = writeln!(out, "Session:  {session}");
            let paths: Vec<&str> = app.routes().routes().iter().map(|r| r.path).collect();
            let _ = write!(out, "Routes:   {}", paths.join(" "));
            Ok(out)
        })
    }
}
