//! Tabtree - tree-driven shell tab completion
//!
//! Binary entry point. Stdout carries completion output only; diagnostics
//! and logs go to stderr.

use tracing_subscriber::EnvFilter;

use tabtree::cli::{CliInterface, LOG_ENV_VAR};
use tabtree::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle the subcommand
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    cli.handle_command()
}

/// Initialize logging system based on verbosity, `TABTREE_LOG` and config
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let env_filter = std::env::var(LOG_ENV_VAR).ok();
    let directive = cli.log_directive(env_filter.as_deref());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter '{directive}': {e}");
        EnvFilter::new(cli.config().logging.level.as_str())
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
