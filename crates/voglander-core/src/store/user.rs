// ── User session store ──

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use voglander_api::User;

/// Point-in-time session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSnapshot {
    pub user: Option<Arc<User>>,
    pub is_authenticated: bool,
}

/// Holds the signed-in user. Purely local: no network calls.
#[derive(Debug)]
pub struct UserStore {
    state: watch::Sender<Arc<UserSnapshot>>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Arc::new(UserSnapshot::default()));
        Self { state }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<UserSnapshot> {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<Arc<User>> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Alias of [`user`](Self::user).
    pub fn user_info(&self) -> Option<Arc<User>> {
        self.user()
    }

    /// Alias of [`is_authenticated`](Self::is_authenticated).
    pub fn is_logged_in(&self) -> bool {
        self.is_authenticated()
    }

    /// Store `user` and mark the session authenticated.
    pub fn set_user(&self, user: User) {
        debug!(username = ?user.username(), "session user set");
        self.state.send_replace(Arc::new(UserSnapshot {
            user: Some(Arc::new(user)),
            is_authenticated: true,
        }));
    }

    /// Clear the user and the authenticated flag together.
    pub fn logout(&self) {
        debug!("session user cleared");
        self.state.send_replace(Arc::new(UserSnapshot::default()));
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<UserSnapshot>> {
        self.state.subscribe()
    }
}
