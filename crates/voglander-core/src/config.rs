// ── Runtime application configuration ──
//
// These types describe *where* the client talks to and how it presents
// itself. They never touch disk or the process environment; the CLI
// resolves them (see voglander-config) and hands them in.

use std::time::Duration;

use url::Url;

/// Deployment mode, derived from `NODE_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
    /// Unset or any other value.
    #[default]
    Other,
}

impl Mode {
    /// `development` and `production` map to their variants; anything
    /// else (including an empty value) is [`Mode::Other`].
    pub fn from_node_env(value: &str) -> Self {
        match value {
            "development" => Self::Development,
            "production" => Self::Production,
            _ => Self::Other,
        }
    }

    pub fn is_dev(self) -> bool {
        self == Self::Development
    }

    pub fn is_prod(self) -> bool {
        self == Self::Production
    }
}

/// Default application title.
pub const DEFAULT_TITLE: &str = "Voglander 设备管理系统";

/// Everything [`App`](crate::App) needs to start.
///
/// `api_base_url` is what the HTTP client sends requests to;
/// `env_base_url` is the backend origin as resolved from the environment
/// (shown by the About view). They share a source when
/// `VUE_APP_API_BASE_URL` is set but fall back to different defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub mode: Mode,
    pub api_base_url: Url,
    pub env_base_url: Url,
    pub timeout: Duration,
}

impl AppConfig {
    /// Config with default title and mode, pointing both URLs at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            mode: Mode::default(),
            env_base_url: base_url.clone(),
            api_base_url: base_url,
            timeout: voglander_api::DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_env_maps_to_mode() {
        assert_eq!(Mode::from_node_env("development"), Mode::Development);
        assert_eq!(Mode::from_node_env("production"), Mode::Production);
        assert_eq!(Mode::from_node_env("test"), Mode::Other);
        assert_eq!(Mode::from_node_env(""), Mode::Other);
        assert!(Mode::Development.is_dev());
        assert!(!Mode::Development.is_prod());
        assert!(!Mode::Other.is_dev() && !Mode::Other.is_prod());
    }

    #[test]
    fn mode_displays_lowercase() {
        assert_eq!(Mode::Production.to_string(), "production");
        assert_eq!(Mode::Other.as_ref(), "other");
    }
}
