// Full-page navigation hook
//
// The 401 policy forces the user back to the login screen. That is a hard
// navigation owned by the host application, not a route transition, so it
// goes through this trait rather than the route table.

use std::sync::Mutex;

use tracing::warn;

/// Destination of the forced re-authentication navigation.
pub const LOGIN_PATH: &str = "/login";

/// Receives full navigation requests issued by status policies.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that only logs the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        warn!(path, "navigation requested");
    }
}

/// Navigator that remembers every requested path.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All paths requested so far, oldest first.
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Most recently requested path.
    pub fn last(&self) -> Option<String> {
        self.visits.lock().ok().and_then(|v| v.last().cloned())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(path.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_keeps_order() {
        let nav = RecordingNavigator::new();
        assert!(nav.last().is_none());
        nav.navigate("/a");
        nav.navigate(LOGIN_PATH);
        assert_eq!(nav.visits(), vec!["/a".to_string(), "/login".to_string()]);
        assert_eq!(nav.last().as_deref(), Some("/login"));
    }
}
