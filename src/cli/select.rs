//! `select`: choose the variant of a component that matches requested attributes.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::OutputFormat;
use super::scenario::{Scenario, parse_attribute_args};
use crate::component::ComponentIdentifier;
use crate::config::EngineConfig;
use crate::metadata::ConfigurationMetadata;

/// Arguments of the `select` command.
#[derive(Args, Debug)]
pub struct SelectCommand {
    /// Scenario file describing the available components
    #[arg(long, value_name = "FILE")]
    pub scenario: PathBuf,

    /// Component to select from, as group:name:version
    #[arg(long, value_name = "GROUP:NAME:VERSION")]
    pub component: String,

    /// Requested attribute, repeatable
    #[arg(short = 'a', long = "attribute", value_name = "KEY=VALUE")]
    pub attributes: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SelectCommand {
    /// Run the selection. Selection failures are returned as errors so the
    /// process exits non-zero; JSON output also prints the failure report.
    pub async fn execute(self, config: Option<EngineConfig>) -> Result<()> {
        let scenario = Scenario::load(&self.scenario)?;
        let session = scenario.session(config)?;
        let id: ComponentIdentifier = self.component.parse()?;
        let requested = parse_attribute_args(&self.attributes, session.schema())?;

        match session.select_variant(&id, &requested).await {
            Ok(selected) => {
                match self.format {
                    OutputFormat::Text => print_text(&selected),
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&*selected)?),
                }
                Ok(())
            }
            Err(e) => {
                if self.format == OutputFormat::Json {
                    if let Some(failure) = e.selection_failure() {
                        let report = serde_json::json!({
                            "error": e.to_string(),
                            "failure": failure,
                        });
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                }
                Err(e).with_context(|| format!("Variant selection failed for {id}"))
            }
        }
    }
}

pub(super) fn print_text(metadata: &ConfigurationMetadata) {
    println!("{} {}", "Selected".green().bold(), metadata);
    print_body(metadata);
}

pub(super) fn print_body(metadata: &ConfigurationMetadata) {
    for (name, value) in metadata.attributes().iter() {
        println!("  {name} = {value}");
    }
    for artifact in metadata.artifacts() {
        match &artifact.classifier {
            Some(classifier) => println!("  artifact {}-{}.{}", artifact.name, classifier, artifact.extension),
            None => println!("  artifact {}.{}", artifact.name, artifact.extension),
        }
    }
    for dependency in metadata.dependencies() {
        if dependency.requested_attributes.is_empty() {
            println!("  dependency {dependency}");
        } else {
            println!("  dependency {} {}", dependency, dependency.requested_attributes);
        }
    }
}
