// Build-time style environment: backend origin, title and run mode.
//
// Read through figment from `VUE_APP_API_BASE_URL`, `VUE_APP_TITLE` and
// `NODE_ENV`. Empty values count as unset.

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;
use url::Url;

use voglander_core::{DEFAULT_TITLE, Mode};

use crate::ConfigError;

/// Origin used when `VUE_APP_API_BASE_URL` is unset.
pub const ENV_DEFAULT_BASE_URL: &str = "http://localhost:8087";

const KEYS: [&str; 3] = ["VUE_APP_API_BASE_URL", "VUE_APP_TITLE", "NODE_ENV"];

#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    vue_app_api_base_url: Option<String>,
    vue_app_title: Option<String>,
    node_env: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolved environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Backend origin; [`ENV_DEFAULT_BASE_URL`] unless configured.
    pub api_base_url: Url,
    pub title: String,
    pub mode: Mode,
    configured: bool,
}

impl Environment {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::from(Env::raw().only(&KEYS)))
    }

    /// Resolve from any figment carrying the lowercased keys.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let raw: RawEnv = figment.extract()?;

        let configured_url = non_empty(raw.vue_app_api_base_url);
        let configured = configured_url.is_some();
        let url = configured_url.as_deref().unwrap_or(ENV_DEFAULT_BASE_URL);
        let api_base_url = Url::parse(url).map_err(|e| ConfigError::Validation {
            field: "VUE_APP_API_BASE_URL".into(),
            reason: format!("invalid URL '{url}': {e}"),
        })?;

        Ok(Self {
            api_base_url,
            title: non_empty(raw.vue_app_title).unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
            mode: raw
                .node_env
                .as_deref()
                .map_or(Mode::Other, Mode::from_node_env),
            configured,
        })
    }

    /// The base URL only if it was set explicitly.
    pub fn configured_base_url(&self) -> Option<&Url> {
        self.configured.then_some(&self.api_base_url)
    }

    pub fn is_dev(&self) -> bool {
        self.mode.is_dev()
    }

    pub fn is_prod(&self) -> bool {
        self.mode.is_prod()
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    fn resolve() -> figment::error::Result<Environment> {
        Environment::from_env().map_err(|e| e.to_string().into())
    }

    #[test]
    fn defaults_when_unset() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let env = resolve()?;
            assert_eq!(env.api_base_url.as_str(), "http://localhost:8087/");
            assert_eq!(env.title, "Voglander 设备管理系统");
            assert_eq!(env.mode, Mode::Other);
            assert!(env.configured_base_url().is_none());
            assert!(!env.is_dev() && !env.is_prod());
            Ok(())
        });
    }

    #[test]
    fn reads_configured_values() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("VUE_APP_API_BASE_URL", "http://10.0.0.5:8087");
            jail.set_env("VUE_APP_TITLE", "Lab");
            jail.set_env("NODE_ENV", "production");
            let env = resolve()?;
            assert_eq!(
                env.configured_base_url().map(Url::as_str),
                Some("http://10.0.0.5:8087/")
            );
            assert_eq!(env.title, "Lab");
            assert!(env.is_prod());
            Ok(())
        });
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("VUE_APP_API_BASE_URL", "");
            jail.set_env("NODE_ENV", "development");
            let env = resolve()?;
            assert!(env.configured_base_url().is_none());
            assert!(env.is_dev());
            Ok(())
        });
    }

    #[test]
    fn invalid_url_is_rejected() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("VUE_APP_API_BASE_URL", "not a url");
            assert!(matches!(
                Environment::from_env(),
                Err(ConfigError::Validation { .. })
            ));
            Ok(())
        });
    }
}
