//! Tether CLI entry point.

use clap::Parser;

use tether::cli::{handle_error, Cli, Commands};
use tether::infrastructure::config::ConfigLoader;
use tether::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Lab(args) => tether::cli::commands::lab::execute(args, &config, cli.json).await,
        Commands::Demo(args) => tether::cli::commands::demo::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
