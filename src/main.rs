//! repoman - Audit GitHub organizations for branch protection and CI webhook compliance
//!
//! This is the main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repoman::cli::{self, Cli, Commands};
use repoman::exit_codes;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.log_json);

    let config_path = cli.config.as_deref();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Audit(args) => {
            cli::commands::audit::execute(args, config_path, cli.log_json).await
        }
        Commands::Init(args) => cli::commands::init::execute(args, config_path).await,
    };

    // Handle exit codes for CI integration
    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

fn setup_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so reports on stdout stay parseable
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
