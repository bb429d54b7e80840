//! Clap derive structures for the `voglander` CLI.
//!
//! Command tree and global flags for `voglander`.
//! Only depends on clap + clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// voglander -- command-line client for the Voglander device backend
#[derive(Debug, Parser)]
#[command(
    name = "voglander",
    version,
    about = "Manage Voglander devices from the command line",
    long_about = "Client for the Voglander device-management REST backend.\n\n\
        Every device endpoint is exposed as a `devices` subcommand. Session\n\
        commands keep a bearer token on disk, and `open` renders the\n\
        application views by route path.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "VOGLANDER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile and VUE_APP_API_BASE_URL)
    #[arg(long, short = 'u', env = "VOGLANDER_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Session token file (overrides profile)
    #[arg(long, env = "VOGLANDER_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VOGLANDER_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Colorize status lines on stderr
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print errors only
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Answer yes to delete confirmations
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VOGLANDER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table or detail view
    Table,
    /// Pretty-printed JSON
    Json,
    /// JSON on one line
    JsonCompact,
    /// YAML
    Yaml,
    /// Bare identifiers, one per line
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color when stderr is a terminal
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query and modify devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Log in and store the session token
    Login(LoginArgs),

    /// Register a new account
    Register(RegisterArgs),

    /// Drop the stored session token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Render an application view by route path
    Open {
        /// Route path: /, /about, /device or /api-test
        #[arg(default_value = "/")]
        path: String,
    },

    /// List the application routes
    Routes,

    /// Show the resolved environment
    Env,

    /// Edit profiles in the config file
    Config(ConfigArgs),

    /// Print a shell completion script
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// A device entity used as a filter, built from `--where` pairs or a file.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Match a field (repeatable). Values that parse as JSON are sent typed.
    /// Examples: --where name=gate --where status=1
    #[arg(long = "where", short = 'w', value_name = "FIELD=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Load the filter entity from a JSON file
    #[arg(long, short = 'F', conflicts_with = "fields")]
    pub from_file: Option<PathBuf>,
}

/// A JSON request body, inline or from a file.
#[derive(Debug, Args)]
pub struct PayloadArgs {
    /// JSON payload
    #[arg(long, short = 'd', required_unless_present = "from_file")]
    pub data: Option<String>,

    /// Load the payload from a JSON file
    #[arg(long, short = 'F', conflicts_with = "data")]
    pub from_file: Option<PathBuf>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

// ── Devices ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// Get a device by ID
    Get {
        /// Device ID (numeric or string)
        id: String,
    },

    /// Get the first device matching a filter
    Find(FilterArgs),

    /// List all devices, optionally filtered
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Fetch one page of devices
    Page {
        /// Page number (1-based)
        #[arg(long, short = 'n', default_value = "1")]
        page: u64,

        /// Page size
        #[arg(long, short = 's', default_value = "10")]
        size: u64,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Count devices, optionally filtered
    Count(FilterArgs),

    /// Create a device
    #[command(alias = "add")]
    Insert(PayloadArgs),

    /// Create several devices from a JSON array
    InsertBatch(PayloadArgs),

    /// Update a device (the payload carries its ID)
    Update(PayloadArgs),

    /// Update several devices from a JSON array
    UpdateBatch(PayloadArgs),

    /// Delete a device by ID
    #[command(alias = "rm")]
    Delete {
        /// Device ID (numeric or string)
        id: String,
    },

    /// Delete every device matching a filter
    DeleteWhere(FilterArgs),

    /// Delete several devices by ID
    DeleteBatch {
        /// Device IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

// ── Session ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile or VOGLANDER_USERNAME)
    #[arg(long, short = 'U')]
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account username
    pub username: String,

    /// Display name
    #[arg(long)]
    pub real_name: Option<String>,
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive first-time setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key: base_url, username, token_file or timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// Show profile names, marking the default
    Profiles,

    /// Switch the default profile
    Use {
        /// Existing profile name
        name: String,
    },

    /// Save a profile password in the OS keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("name=a=b"),
            Ok(("name".to_owned(), "a=b".to_owned()))
        );
        assert_eq!(parse_field("status="), Ok(("status".into(), String::new())));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
