//! `voglander config ...`: manage profiles in the TOML config file.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const SETTABLE_KEYS: &str = "base_url, username, token_file, timeout";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Set { key, value } => set(global, &key, value),
        ConfigCommand::Profiles => {
            list_profiles(global);
            Ok(())
        }
        ConfigCommand::Use { name } => use_profile(global, name),
        ConfigCommand::SetPassword { profile } => set_password(global, profile),
    }
}

// ── Subcommands ─────────────────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let path = config::config_path();
    eprintln!("Setting up {}\n", path.display());

    let name: String = Input::new()
        .with_prompt("Profile")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;
    let base_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(voglander_core::DEFAULT_BASE_URL.into())
        .validate_with(|s: &String| check_url(s).map(|_| ()).map_err(|e| e.to_string()))
        .interact_text()
        .map_err(prompt_err)?;
    let username: String = Input::new()
        .with_prompt("Username (blank to skip)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        base_url: Some(base_url),
        ..Profile::default()
    };
    if !username.is_empty() {
        profile.password = ask_password_storage(&name)?;
        profile.username = Some(username);
    }

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(name.clone(), profile);
    cfg.default_profile = Some(name.clone());
    write(&cfg)?;

    eprintln!("\nSaved profile '{name}' as the default.");
    eprintln!("Next: voglander login");
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default().redacted();
    let text = cfg.to_toml()?;
    let out = output::render_single(
        &global.output,
        &cfg,
        |_| text.trim_end().to_owned(),
        |c| c.default_profile_name().to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn set(global: &GlobalOpts, key: &str, value: String) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let name = config::active_profile_name(global, &cfg);
    let profile = cfg.profiles.entry(name.clone()).or_default();

    match key.replace('-', "_").as_str() {
        "base_url" => profile.base_url = Some(check_url(&value)?),
        "username" => profile.username = Some(value),
        "token_file" => profile.token_file = Some(value.into()),
        "timeout" => {
            let secs = value.parse::<u64>().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: format!("'{value}' is not a whole number of seconds"),
            })?;
            profile.timeout = Some(secs);
        }
        _ => {
            return Err(CliError::Validation {
                field: key.into(),
                reason: format!("unknown key; expected one of: {SETTABLE_KEYS}"),
            });
        }
    }

    write(&cfg)?;
    output::success(global, &format!("{name}.{key} updated"));
    Ok(())
}

fn list_profiles(global: &GlobalOpts) {
    let cfg = config::load_config_or_default();
    if cfg.profiles.is_empty() {
        output::notice(global, "No profiles yet. Create one with: voglander config init");
        return;
    }
    let default = cfg.default_profile_name();
    let lines: Vec<String> = cfg
        .profiles
        .keys()
        .map(|name| {
            if name == default {
                format!("{name} (default)")
            } else {
                name.clone()
            }
        })
        .collect();
    output::print_output(&lines.join("\n"), global.quiet);
}

fn use_profile(global: &GlobalOpts, name: String) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    require_profile(&cfg, &name)?;
    cfg.default_profile = Some(name.clone());
    write(&cfg)?;
    output::success(global, &format!("Now using profile '{name}'"));
    Ok(())
}

fn set_password(global: &GlobalOpts, profile: Option<String>) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
    require_profile(&cfg, &name)?;

    let password = read_password()?;
    voglander_config::store_password(&name, &password)?;
    output::success(global, &format!("Keyring entry saved for '{name}'"));
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────

fn write(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn check_url(raw: &str) -> Result<String, CliError> {
    url::Url::parse(raw)
        .map(|_| raw.to_owned())
        .map_err(|e| CliError::Validation {
            field: "base_url".into(),
            reason: format!("'{raw}' is not a URL: {e}"),
        })
}

fn require_profile(cfg: &Config, name: &str) -> Result<(), CliError> {
    if cfg.profiles.contains_key(name) {
        Ok(())
    } else {
        Err(CliError::ProfileNotFound {
            name: name.to_owned(),
            available: config::available_profiles(cfg),
        })
    }
}

fn read_password() -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "empty password".into(),
        });
    }
    Ok(SecretString::from(password))
}

/// Keyring, plaintext in the profile, or nothing. Only the plaintext choice
/// returns a value to write into the config file.
fn ask_password_storage(profile: &str) -> Result<Option<String>, CliError> {
    let choice = Select::new()
        .with_prompt("Password storage")
        .items(&["System keyring", "Config file (plaintext)", "Skip"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    match choice {
        0 => {
            voglander_config::store_password(profile, &read_password()?)?;
            Ok(None)
        }
        1 => Ok(Some(read_password()?.expose_secret().to_owned())),
        _ => Ok(None),
    }
}
