//! variant-select CLI entry point
//!
//! Parses arguments, runs the command and prints failures with suggestions.

use anyhow::Result;
use clap::Parser;
use variant_select::cli;
use variant_select::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
