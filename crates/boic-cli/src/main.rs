use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use boic_cli::cli::{Cli, Commands};
use boic_cli::commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so rows stay clean on stdout
    let env_filter = match cli.level_filter() {
        Some(level) => crate_filter(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| crate_filter(LevelFilter::WARN)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let jewel = commands::open_jewel(&cli.jewel)?;

    match cli.command {
        Commands::Execute {
            query,
            depth,
            explain,
            format,
        } => commands::execute::execute(&jewel, query, depth, explain, format)?,

        Commands::List { shard_type, depth } => {
            commands::list::execute(&jewel, shard_type.as_deref(), depth)?
        }

        Commands::Resolve { path } => commands::resolve::execute(&jewel, &path)?,

        Commands::Walk { path, depth } => commands::walk::execute(&jewel, path.as_deref(), depth)?,
    }

    Ok(())
}

fn crate_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::new(format!(
        "boic_cli={level},boic_core={level},boic_query={level}"
    ))
}
