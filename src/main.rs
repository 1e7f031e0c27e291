use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use checktree::cli::commands::{Cli, Commands};
use checktree::cli::handlers;

/// Log filter env var, e.g. `CT_LOG=checktree=debug`
const LOG_ENV: &str = "CT_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let project_dir = cli.project_dir.clone().map(PathBuf::from);

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI
            checktree::tui::run(project_dir.as_deref())
        }
        Some(Commands::Init(args)) => {
            // Init is handled before project discovery
            handlers::cmd_init(args)
        }
        Some(_) => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
