//! CLI configuration: a thin wrapper around `voglander_config`.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `GlobalOpts` flag overrides (--base-url, --timeout, --token-file).

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use voglander_core::AppConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use voglander_config::{
    Config, Environment, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.default_profile_name().to_owned())
}

/// Everything needed to build an `App` for one invocation.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub profile: Option<Profile>,
    pub app: AppConfig,
    pub token_path: PathBuf,
}

/// Combine environment, config file and flags.
///
/// Base URL: `--base-url` > profile > `VUE_APP_API_BASE_URL` > client
/// default. Timeout: `--timeout` > profile > `[defaults]`.
pub fn resolve(global: &GlobalOpts, config: &Config, env: &Environment) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profiles.get(&profile_name).cloned();

    if global.profile.is_some() && profile.is_none() && !config.profiles.is_empty() {
        return Err(CliError::ProfileNotFound {
            available: available_profiles(config),
            name: profile_name,
        });
    }

    let mut app = voglander_config::app_config(env, profile.as_ref(), &config.defaults)?;
    if let Some(raw) = global.base_url.as_deref().filter(|s| !s.is_empty()) {
        app.api_base_url = Url::parse(raw).map_err(|e| CliError::Validation {
            field: "base-url".into(),
            reason: format!("invalid URL '{raw}': {e}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        app.timeout = Duration::from_secs(secs);
    }

    let token_path = global
        .token_file
        .clone()
        .unwrap_or_else(|| voglander_config::token_path(&profile_name, profile.as_ref()));

    Ok(Resolved {
        profile_name,
        profile,
        app,
        token_path,
    })
}

/// Comma-separated profile names, or `(none)`.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        return "(none)".into();
    }
    config
        .profiles
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
