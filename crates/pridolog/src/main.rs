mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let root = cli.root.clone();
    let json = cli.json;

    match cli.command {
        Commands::Refs { gid } => commands::refs::run(&root, &gid, json),
        Commands::Definition { file, line } => commands::definition::run(&root, &file, line, json),
        Commands::Tasks { file } => commands::tasks::run(&root, &file, json),
        Commands::Slow { file, min_ms } => {
            let settings = commands::load_settings(cli.settings.as_deref())?;
            commands::slow::run(&root, &file, min_ms, &settings, json)
        }
        Commands::Problems { file } => commands::problems::run(&root, &file, json),
        Commands::Services => commands::services::run(json),
    }
}
