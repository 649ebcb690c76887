//! Command-line interface for variant-select.
//!
//! The binary is a diagnostic front end for the library: it loads a scenario
//! file (see [`scenario`]), opens one resolution session over it and runs a
//! realization or a selection, printing the result or the rendered failure.
//!
//! # Commands
//!
//! - `select` - pick the variant of a component matching `--attribute` pairs
//! - `realize` - print every realized variant of a component
//!
//! # Global Options
//!
//! - `--verbose` - debug logging (`RUST_LOG` still applies when set)
//! - `--quiet` - errors only
//! - `--config <file>` - engine configuration, replacing a scenario's `[config]`
//!
//! ```bash
//! variant-select select --scenario lib.toml --component org.example:lib:1.0 \
//!     --attribute org.gradle.usage=java-api --attribute org.gradle.jvm.version=17
//! variant-select --verbose realize --scenario lib.toml --component org.example:lib:1.0
//! ```

pub mod realize;
pub mod scenario;
pub mod select;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;

/// Output format shared by the commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "variant-select",
    about = "Realize component variants and select the one matching requested attributes",
    version,
    long_about = "Loads component descriptors from a scenario file, realizes their variants \
                  and runs attribute-based variant selection, explaining any failure."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Engine configuration file (TOML).
    ///
    /// Replaces the `[config]` table of the scenario file.
    #[arg(short, long, global = true, env = "VARIANT_SELECT_CONFIG")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select the best matching variant of a component
    Select(select::SelectCommand),
    /// Realize and print every variant of a component
    Realize(realize::RealizeCommand),
}

impl Cli {
    /// Run the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let config = match &self.config {
            Some(path) => Some(EngineConfig::load(path)?),
            None => None,
        };

        match self.command {
            Commands::Select(cmd) => cmd.execute(config).await,
            Commands::Realize(cmd) => cmd.execute(config).await,
        }
    }

    /// Log filter for the chosen verbosity.
    ///
    /// `RUST_LOG` takes precedence; otherwise `--verbose` enables debug output
    /// for this crate and `--quiet` limits output to errors.
    pub fn log_filter(&self) -> EnvFilter {
        if std::env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }
        let directive = if self.verbose {
            "variant_select=debug,realize=debug,selection=debug,config=debug,attributes=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };
        EnvFilter::new(directive)
    }

    /// Install the stderr log subscriber. Repeated calls are ignored.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    }

    /// Whether `--quiet` was given.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
