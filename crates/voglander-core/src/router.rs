// ── Route table ──
//
// A fixed mapping from URL path to view. Eager views are built with the
// table; lazy views are built on first resolution and cached for the
// life of the table. No guards, no redirects, no nesting.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::views::{AboutView, ApiTestView, DeviceView, HomeView, View};

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("No route matches {path}")]
    NotFound { path: String },

    #[error("Failed to load view for {path}: {message}")]
    LoadFailed { path: String, message: String },
}

/// Builds a lazily loaded view.
pub type ViewLoader = Box<dyn Fn() -> Result<Arc<dyn View>, RouterError> + Send + Sync>;

enum ViewSlot {
    Eager(Arc<dyn View>),
    Lazy {
        loader: ViewLoader,
        cell: OnceCell<Arc<dyn View>>,
    },
}

/// One entry in the route table.
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    slot: ViewSlot,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("lazy", &self.is_lazy())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl Route {
    pub fn eager(path: &'static str, name: &'static str, view: Arc<dyn View>) -> Self {
        Self {
            path,
            name,
            slot: ViewSlot::Eager(view),
        }
    }

    pub fn lazy(path: &'static str, name: &'static str, loader: ViewLoader) -> Self {
        Self {
            path,
            name,
            slot: ViewSlot::Lazy {
                loader,
                cell: OnceCell::new(),
            },
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.slot, ViewSlot::Lazy { .. })
    }

    /// Eager views are always loaded; lazy ones after first resolution.
    pub fn is_loaded(&self) -> bool {
        match &self.slot {
            ViewSlot::Eager(_) => true,
            ViewSlot::Lazy { cell, .. } => cell.initialized(),
        }
    }

    async fn view(&self) -> Result<Arc<dyn View>, RouterError> {
        match &self.slot {
            ViewSlot::Eager(view) => Ok(Arc::clone(view)),
            ViewSlot::Lazy { loader, cell } => cell
                .get_or_try_init(|| async {
                    debug!(path = self.path, "loading view");
                    loader()
                })
                .await
                .map(Arc::clone),
        }
    }
}

/// The application's route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// `/` and `/about` eager; `/device` and `/api-test` lazy.
    pub fn standard() -> Self {
        Self::new(vec![
            Route::eager("/", "Home", Arc::new(HomeView)),
            Route::eager("/about", "About", Arc::new(AboutView)),
            Route::lazy(
                "/device",
                "Device",
                Box::new(|| Ok(Arc::new(DeviceView::default()) as Arc<dyn View>)),
            ),
            Route::lazy(
                "/api-test",
                "ApiTest",
                Box::new(|| Ok(Arc::new(ApiTestView) as Arc<dyn View>)),
            ),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Exact path match; a trailing slash is ignored.
    pub fn find(&self, path: &str) -> Option<&Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        self.routes.iter().find(|r| r.path == normalized)
    }

    /// Resolve `path` to its view, loading it first if lazy.
    pub async fn resolve(&self, path: &str) -> Result<Arc<dyn View>, RouterError> {
        let route = self.find(path).ok_or_else(|| RouterError::NotFound {
            path: path.to_owned(),
        })?;
        route.view().await
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
