use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rancher-tools",
    version,
    about = "Operator toolkit for the Rancher Cattle v2-beta API"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Rancher CLI credentials file (default: ~/.rancher/cli.json)"
    )]
    pub credentials: Option<PathBuf>,
    #[arg(long, global = true, help = "Override the await-* polling interval")]
    pub poll_interval_ms: Option<u64>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the resolved Cattle endpoint
    Config,
    Stack {
        #[command(subcommand)]
        command: StackCommands,
    },
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },
    /// Load balancer port rule targets
    Lb {
        #[command(subcommand)]
        command: LbCommands,
    },
    /// Interactive session; each line is one of the commands above
    Shell,
}

#[derive(Subcommand, Debug)]
pub enum StackCommands {
    Find { project: String, name: String },
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommands {
    Get {
        project: String,
        service: String,
    },
    /// Look a service up by stack name and service name
    Find {
        project: String,
        stack: String,
        name: String,
    },
    Rename {
        project: String,
        service: String,
        new_name: String,
    },
    AwaitActive {
        project: String,
        service: String,
        #[arg(long, help = "Give up after this many seconds")]
        timeout: Option<u64>,
    },
    AwaitHealthy {
        project: String,
        service: String,
        #[arg(long, help = "Give up after this many seconds")]
        timeout: Option<u64>,
    },
    FinishUpgrade {
        project: String,
        service: String,
    },
    Create {
        project: String,
        stack_id: String,
        name: String,
        image: String,
        #[arg(long, help = "JSON object merged into the service body")]
        config: Option<String>,
        #[arg(long, help = "JSON object merged into the launch config")]
        launch_config: Option<String>,
    },
    #[command(name = "clone")]
    CloneService {
        project: String,
        service: String,
        new_name: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long, help = "JSON object merged into the service body")]
        config: Option<String>,
        #[arg(long, help = "JSON object merged into the launch config")]
        launch_config: Option<String>,
    },
    /// In-service upgrade of the primary and sidekick images
    Upgrade {
        project: String,
        service: String,
        #[arg(long)]
        image: Option<String>,
        #[arg(long = "sidekick", value_name = "NAME=IMAGE")]
        sidekicks: Vec<String>,
    },
    Restart {
        project: String,
        service: String,
        #[arg(long, default_value_t = 1)]
        batch_size: u32,
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum LbCommands {
    /// Show the service a port rule points at
    Target {
        project: String,
        lb_service: String,
        #[arg(long)]
        source_port: u16,
        #[arg(long)]
        path: Option<String>,
    },
    /// Point a port rule at another service
    Retarget {
        project: String,
        lb_service: String,
        #[arg(long)]
        source_port: u16,
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        target: String,
    },
}
