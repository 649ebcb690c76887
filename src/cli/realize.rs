//! `realize`: print every realized variant of a component.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::OutputFormat;
use super::scenario::Scenario;
use super::select::print_body;
use crate::component::ComponentIdentifier;
use crate::config::EngineConfig;

/// Arguments of the `realize` command.
#[derive(Args, Debug)]
pub struct RealizeCommand {
    /// Scenario file describing the available components
    #[arg(long, value_name = "FILE")]
    pub scenario: PathBuf,

    /// Component to realize, as group:name:version
    #[arg(long, value_name = "GROUP:NAME:VERSION")]
    pub component: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl RealizeCommand {
    /// Realize all variants in declaration order and print them.
    pub async fn execute(self, config: Option<EngineConfig>) -> Result<()> {
        let scenario = Scenario::load(&self.scenario)?;
        let session = scenario.session(config)?;
        let id: ComponentIdentifier = self.component.parse()?;

        let variants = session
            .variants(&id)
            .await
            .with_context(|| format!("Failed to realize variants of {id}"))?;

        match self.format {
            OutputFormat::Text => {
                for (idx, variant) in variants.iter().enumerate() {
                    if idx > 0 {
                        println!();
                    }
                    println!("{}", variant.to_string().bold());
                    print_body(variant);
                }
            }
            OutputFormat::Json => {
                let all: Vec<_> = variants.iter().map(|v| &**v).collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            }
        }

        tracing::debug!(target: "realize", "session stats: {:?}", session.stats());
        Ok(())
    }
}
