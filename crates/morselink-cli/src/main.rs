//! MorseLink CLI entry point

use clap::Parser;
use tracing::info;

use morselink_cli::{
    app,
    cli::{Cli, Commands},
    config::AppConfig,
    error::Result,
};
use morselink_core::TimingProfile;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = load_configuration(&cli)?;
    if cli.relaxed {
        config.engine.profile = TimingProfile::relaxed();
    }

    match cli.command {
        Commands::Demo {
            message,
            cancel_after_ms,
        } => app::run_demo(config, message, cancel_after_ms).await,
        Commands::Key { pattern } => app::run_key(config, pattern).await,
        Commands::Table => app::print_table(&config),
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(config_path) = &cli.config {
        info!("loading configuration from {config_path}");
        AppConfig::load_from_file(config_path)
    } else {
        Ok(AppConfig::default())
    }
}
