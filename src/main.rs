use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

use cli::{Cli, Commands};
use commands::{dispatch, run_shell, session::stdin_is_terminal, Session};
use services::cattle::CattleClient;
use services::credentials::{default_cli_config_path, resolve};
use services::settings::load_settings;

fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = load_settings()?.client;
    if let Some(ms) = cli.poll_interval_ms {
        settings.poll_interval_ms = ms;
    }

    let path = match &cli.credentials {
        Some(p) => p.clone(),
        None => default_cli_config_path()?,
    };
    let creds = resolve(&path)?;
    let client = CattleClient::new(&creds, &settings)?;
    let session = Session { creds, client };

    match &cli.command {
        Commands::Shell => {
            let stdin = std::io::stdin();
            run_shell(&session, stdin.lock(), stdin_is_terminal())
        }
        command => dispatch(&session, cli.json, command),
    }
}
