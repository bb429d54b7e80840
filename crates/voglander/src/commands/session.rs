//! Session command handlers: login, register, logout, whoami.

use std::io::IsTerminal;
use std::path::PathBuf;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use voglander_api::{LOGIN_PATH, Navigator, RegisterRequest, User};
use voglander_config::ConfigError;
use voglander_core::App;

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Navigator ───────────────────────────────────────────────────────

/// Reports the forced re-login on stderr. The CLI has no login screen to
/// jump to, so the token removal is all that happens.
pub struct LoginHint {
    token_path: PathBuf,
    quiet: bool,
}

impl LoginHint {
    pub fn new(token_path: PathBuf, quiet: bool) -> Self {
        Self { token_path, quiet }
    }
}

impl Navigator for LoginHint {
    fn navigate(&self, path: &str) {
        debug!(path, "navigation requested");
        if path == LOGIN_PATH && !self.quiet {
            eprintln!(
                "Session expired; removed token at {}",
                self.token_path.display()
            );
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn interactive() -> bool {
    std::io::stdin().is_terminal()
}

fn resolve_username(arg: Option<String>, resolved: &Resolved) -> Result<String, CliError> {
    if let Some(username) = arg.filter(|u| !u.is_empty()) {
        return Ok(username);
    }
    match voglander_config::resolve_username(resolved.profile.as_ref(), &resolved.profile_name) {
        Ok(username) => Ok(username),
        Err(ConfigError::NoCredentials { .. }) if interactive() => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err),
        Err(e) => Err(e.into()),
    }
}

fn resolve_password(resolved: &Resolved) -> Result<SecretString, CliError> {
    match voglander_config::resolve_password(resolved.profile.as_ref(), &resolved.profile_name) {
        Ok(password) => Ok(password),
        Err(ConfigError::NoCredentials { .. }) if interactive() => {
            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            Ok(SecretString::from(password))
        }
        Err(e) => Err(e.into()),
    }
}

/// New-account password: `VOGLANDER_PASSWORD`, else prompted twice.
fn new_password() -> Result<SecretString, CliError> {
    if let Ok(password) = std::env::var("VOGLANDER_PASSWORD") {
        return Ok(SecretString::from(password));
    }
    if !interactive() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "set VOGLANDER_PASSWORD when not running in a terminal".into(),
        });
    }
    let first = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    let second = rpassword::prompt_password("Confirm password: ").map_err(prompt_err)?;
    if first.is_empty() || first != second {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "passwords are empty or do not match".into(),
        });
    }
    Ok(SecretString::from(first))
}

fn display_name(user: &User) -> String {
    match (user.real_name(), user.username()) {
        (Some(real), Some(name)) => format!("{real} ({name})"),
        (Some(real), None) => real.to_owned(),
        (None, Some(name)) => name.to_owned(),
        (None, None) => "(unknown)".into(),
    }
}

fn user_detail(user: &User) -> String {
    let roles = user.roles();
    [
        format!(
            "ID:       {}",
            user.id().map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Username: {}", user.username().unwrap_or("-")),
        format!("Name:     {}", user.real_name().unwrap_or("-")),
        format!(
            "Roles:    {}",
            if roles.is_empty() {
                "-".into()
            } else {
                roles.join(", ")
            }
        ),
    ]
    .join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    app: &App,
    resolved: &Resolved,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = resolve_username(args.username, resolved)?;
    let password = resolve_password(resolved)?;
    if password.expose_secret().is_empty() {
        return Err(CliError::NoCredentials {
            profile: resolved.profile_name.clone(),
        });
    }

    let spinner = output::spinner(global, "Signing in");
    let result = app.login(&username, password).await;
    spinner.finish_and_clear();
    let user = result?;

    output::success(
        global,
        &format!(
            "Signed in as {} (token saved to {})",
            display_name(&user),
            resolved.token_path.display()
        ),
    );
    Ok(())
}

pub async fn register(app: &App, args: RegisterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let request = RegisterRequest {
        username: args.username,
        password: new_password()?,
        real_name: args.real_name,
    };
    let data = app.register(&request).await?;
    output::success(
        global,
        &format!(
            "Account '{}' registered. Sign in with: voglander login -U {}",
            request.username, request.username
        ),
    );
    if let Some(data) = data.filter(|d| !d.is_null()) {
        let out = output::render_single(&global.output, &data, ToString::to_string, |_| {
            request.username.clone()
        });
        output::print_output(&out, global.quiet);
    }
    Ok(())
}

pub fn logout(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    let had_token = app.has_token()?;
    app.logout()?;
    if had_token {
        output::success(global, "Signed out");
    } else {
        output::notice(global, "No session was stored");
    }
    Ok(())
}

pub async fn whoami(app: &App, global: &GlobalOpts) -> Result<(), CliError> {
    if !app.has_token()? {
        return Err(CliError::Unauthorized {
            message: "no session token stored".into(),
        });
    }
    let user = app.refresh_user().await?;
    let out = output::render_single(&global.output, &user, user_detail, |u| {
        u.username().unwrap_or_default().to_owned()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
