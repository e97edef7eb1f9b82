mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{roofs, search, toggle};

/// Log to stderr; `-v` raises the default level, `RUST_LOG` overrides it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::load_config(&cli)?;
    match &cli.command {
        Commands::Search(args) => search::run(&config, args).await,
        Commands::Roofs(args) => roofs::run(&config, args).await,
        Commands::Toggle(args) => toggle::run(args),
    }
}
