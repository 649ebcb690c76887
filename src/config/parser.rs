//! Generic TOML file loading with file-path context.
//!
//! ```rust,no_run
//! use variant_select::config::{EngineConfig, parse_config};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: EngineConfig = parse_config(Path::new("engine.toml"))?;
//! println!("{} governed key(s)", config.component_governed_keys.len());
//! # Ok(())
//! # }
//! ```
//!
//! Errors name the file and the stage that failed:
//!
//! ```text
//! Failed to parse config file: /path/to/engine.toml
//! Caused by:
//!     unknown variant `newest`, expected one of `prefer`, `highest`, ...
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Read a TOML file and deserialize it into `T`.
///
/// Fails when the file cannot be read or its content does not match `T`; the
/// underlying I/O or TOML error is kept as the cause.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    tracing::debug!(target: "config", "loading {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
