//! jenkins-triage CLI entry point.

use clap::Parser;

use jenkins_triage::cli::{commands, handle_error, load_config, Cli, Commands};
use jenkins_triage::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &config, cli.json).await,
        Commands::Inspect(args) => commands::inspect::execute(args, &config, cli.json).await,
        Commands::Import(args) => commands::import::execute(args, cli.json).await,
        Commands::Config => commands::config::execute(&config, cli.json),
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
