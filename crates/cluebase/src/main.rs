//! # Cluebase CLI
//!
//! Command-line entrypoint for the Cluebase trivia backend.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;
mod logging;

#[derive(Parser)]
#[command(name = "cluebase")]
#[command(version)]
#[command(about = "Trivia clue API server", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Disable permissive CORS
        #[arg(long)]
        no_cors: bool,
    },

    /// Display version and component info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_config = logging::LogConfig::new("cluebase").with_log_level(&cli.log_level);
    let log_config = if cli.json_logs {
        log_config.with_json_logs()
    } else {
        log_config
    };
    logging::init_logging(&log_config);

    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => {
            commands::serve(host, port, !no_cors).await?;
        }

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
        },
    }

    Ok(())
}
