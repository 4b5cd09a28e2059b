//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `service.rs` — stack/service lookups and lifecycle actions.
//! - `balancer.rs` — load balancer port rule inspection and retargeting.
//! - `session.rs` — `config` and the interactive `shell`.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod balancer;
pub mod service;
pub mod session;

pub use balancer::handle_lb_commands;
pub use service::{handle_service_commands, handle_stack_commands};
pub use session::{handle_config, run_shell, Session};

use crate::cli::Commands;

pub fn dispatch(session: &Session, json: bool, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Config => handle_config(session, json),
        Commands::Stack { command } => handle_stack_commands(session, json, command),
        Commands::Service { command } => handle_service_commands(session, json, command),
        Commands::Lb { command } => handle_lb_commands(session, json, command),
        Commands::Shell => anyhow::bail!("already in a shell session"),
    }
}
