// Session token storage
//
// The bearer token lives under a single key, the way a browser keeps it in
// local storage. The request interceptor reads it on every call; only the
// login flow writes it and only the 401 policy (or an explicit logout)
// removes it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::error::Error;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Persistent home for the session token.
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    fn get(&self) -> Result<Option<SecretString>, Error>;

    /// Store `token`, replacing any previous value.
    fn set(&self, token: SecretString) -> Result<(), Error>;

    /// Remove the stored token. Removing an absent token is not an error.
    fn remove(&self) -> Result<(), Error>;
}

// ── In-memory store ─────────────────────────────────────────────────

/// Process-local token store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

fn poisoned() -> Error {
    Error::TokenStore {
        message: "token lock poisoned".into(),
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.token.read().map_err(|_| poisoned())?.clone())
    }

    fn set(&self, token: SecretString) -> Result<(), Error> {
        *self.token.write().map_err(|_| poisoned())? = Some(token);
        Ok(())
    }

    fn remove(&self) -> Result<(), Error> {
        *self.token.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

// ── File-backed store ───────────────────────────────────────────────

/// Token store persisted as a small JSON key/value file.
///
/// The file holds a flat string map (`{"token": "..."}`) so other keys
/// written by future releases survive token updates.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, Error> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(io_error(&self.path, &e)),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| Error::TokenStore {
            message: format!("{} is not a valid storage file: {e}", self.path.display()),
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let body = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, body).map_err(|e| io_error(&self.path, &e))
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> Error {
    Error::TokenStore {
        message: format!("{}: {err}", path.display()),
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<SecretString>, Error> {
        trace!(path = %self.path.display(), "reading session token");
        Ok(self
            .read_map()?
            .remove(TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .map(SecretString::from))
    }

    fn set(&self, token: SecretString) -> Result<(), Error> {
        let mut map = self.read_map()?;
        map.insert(TOKEN_KEY.into(), token.expose_secret().to_owned());
        debug!(path = %self.path.display(), "storing session token");
        self.write_map(&map)
    }

    fn remove(&self) -> Result<(), Error> {
        let mut map = self.read_map()?;
        if map.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "removing session token");
        self.write_map(&map)
    }
}
