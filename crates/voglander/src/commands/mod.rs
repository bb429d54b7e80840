//! Command dispatch: bridges CLI args -> `App` operations -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod session;
pub mod util;
pub mod views;

use voglander_core::App;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    app: &App,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(app, args, global).await,
        Command::Login(args) => session::login(app, resolved, args, global).await,
        Command::Register(args) => session::register(app, args, global).await,
        Command::Logout => session::logout(app, global),
        Command::Whoami => session::whoami(app, global).await,
        Command::Open { path } => views::open(app, path, global).await,
        // Handled in `run` before an `App` is built
        Command::Routes | Command::Env | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
