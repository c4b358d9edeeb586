//! Storefront command-line client
//!
//! Browse the catalog, manage a cart persisted under a data directory, and
//! place orders against the configured form endpoint.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod cli;
mod logging;
mod sink;
mod storage;
mod surface;

#[tokio::main]
async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = logging::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Failed to initialise logging: {error}");
        }

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");

            #[expect(clippy::print_stderr, reason = "command failures are reported to the user")]
            {
                eprintln!("{message}");
            }

            ExitCode::FAILURE
        }
    }
}
