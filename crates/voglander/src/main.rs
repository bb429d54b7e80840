mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voglander_api::FileTokenStore;
use voglander_core::App;

use crate::cli::{Cli, Command};
use crate::commands::session::LoginHint;
use crate::config::Resolved;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the environment or a client
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "voglander", &mut std::io::stdout());
            Ok(())
        }

        Command::Routes => {
            commands::views::routes(&cli.global);
            Ok(())
        }

        cmd => {
            let cfg = config::load_config_or_default();
            let env = config::Environment::from_env()?;
            let resolved = config::resolve(&cli.global, &cfg, &env)?;

            if matches!(cmd, Command::Env) {
                commands::views::env(&env, &resolved, &cli.global);
                return Ok(());
            }

            let app = build_app(&resolved, cli.global.quiet)?;
            tracing::debug!(
                command = ?cmd,
                base_url = %resolved.app.api_base_url,
                profile = %resolved.profile_name,
                "dispatching command"
            );
            commands::dispatch(cmd, &app, &resolved, &cli.global).await
        }
    }
}

/// Wire an `App` to the profile's token file and the CLI navigator.
fn build_app(resolved: &Resolved, quiet: bool) -> Result<App, CliError> {
    let tokens = Arc::new(FileTokenStore::new(resolved.token_path.clone()));
    let navigator = Arc::new(LoginHint::new(resolved.token_path.clone(), quiet));
    Ok(App::new(resolved.app.clone(), tokens, navigator)?)
}
