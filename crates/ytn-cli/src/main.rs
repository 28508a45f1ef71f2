use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;
mod host;

#[derive(Parser)]
#[command(name = "ytn")]
#[command(about = "ytn - desktop alerts for YouTrack notifications", long_about = None)]
struct Cli {
    /// Configuration directory (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the tracker until interrupted
    Run,
    /// Run a single poll cycle and exit
    PollOnce,
    /// Store tracker credentials
    Configure {
        /// Permanent API token
        #[arg(long)]
        token: String,
        /// Tracker host, e.g. acme.youtrack.cloud
        #[arg(long)]
        host: String,
    },
    /// Open the issue behind an alert handle
    Open {
        /// Handle string handed back by the alert
        handle: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let app = bootstrap::App::build(cli.config_dir.as_deref()).await?;

    match cli.command {
        Commands::Run => commands::run::execute(app).await?,
        Commands::PollOnce => commands::poll::execute(app).await?,
        Commands::Configure { token, host } => {
            commands::configure::execute(&app, &token, &host).await?
        }
        Commands::Open { handle } => commands::open::execute(&app, &handle).await?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
