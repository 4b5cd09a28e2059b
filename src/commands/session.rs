use crate::cli::Cli;
use crate::domain::models::EndpointReport;
use crate::services::cattle::CattleClient;
use crate::services::credentials::Credentials;
use crate::services::output::print_one;
use crate::services::shell::{classify, Line};
use clap::Parser;
use std::io::{BufRead, IsTerminal, Write};

const PROMPT: &str = "rt> ";

/// Resolved credentials plus the client built from them, shared by every
/// command of one process or shell session.
pub struct Session {
    pub creds: Credentials,
    pub client: CattleClient,
}

pub fn handle_config(session: &Session, json: bool) -> anyhow::Result<()> {
    let report = EndpointReport {
        url: session.client.base_url().to_string(),
        source: session.creds.source.to_string(),
        access_key: session.creds.access_key.clone(),
    };
    print_one(json, report, |r| format!("{}\t{}", r.url, r.source))
}

pub fn run_shell(session: &Session, input: impl BufRead, interactive: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    let mut lines = input.lines();
    loop {
        if interactive {
            print!("{}", PROMPT);
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let words = match classify(&line?) {
            Ok(Line::Skip) => continue,
            Ok(Line::Exit) => break,
            Ok(Line::Command(words)) => words,
            Err(e) => {
                eprintln!("error: {}", e);
                continue;
            }
        };
        let cli = match Cli::try_parse_from(std::iter::once("rancher-tools".to_string()).chain(words)) {
            Ok(cli) => cli,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        if let Err(e) = crate::commands::dispatch(session, cli.json, &cli.command) {
            eprintln!("error: {:#}", e);
        }
    }
    Ok(())
}

pub fn stdin_is_terminal() -> bool {
    std::io::stdin().is_terminal()
}
