//! Sample attribute sets, descriptors and scenario files.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::attributes::{AttributeSet, AttributeValue};
use crate::component::{ArtifactRef, ComponentDescriptor, ComponentIdentifier, DependencyRef, RawVariant};
use crate::constants::{CATEGORY, JVM_VERSION, STATUS, USAGE, category, usage};

/// Build an attribute set, panicking on a type conflict.
pub fn attrs(entries: &[(&str, AttributeValue)]) -> AttributeSet {
    AttributeSet::from_entries(entries.iter().cloned()).unwrap_or_else(|e| panic!("invalid test attributes: {e}"))
}

/// Build a set of named values.
pub fn named_attrs(entries: &[(&str, &str)]) -> AttributeSet {
    attrs(&entries.iter().map(|(k, v)| (*k, AttributeValue::named(v))).collect::<Vec<_>>())
}

/// A typical JVM library: API and runtime variants for JVM 11 plus a
/// platform variant, with release status at component level.
pub fn java_library(group: &str, name: &str, version: &str) -> ComponentDescriptor {
    let id = ComponentIdentifier::new(group, name, version);
    let jar = ArtifactRef::new(format!("{name}-{version}"), "jar");

    ComponentDescriptor::new(id, named_attrs(&[(STATUS, "release")]))
        .with_variant(
            RawVariant::new(
                "apiElements",
                attrs(&[
                    (USAGE, AttributeValue::named(usage::JAVA_API)),
                    (CATEGORY, AttributeValue::named(category::LIBRARY)),
                    (JVM_VERSION, AttributeValue::Integer(11)),
                ]),
            )
            .with_artifact(jar.clone()),
        )
        .with_variant(
            RawVariant::new(
                "runtimeElements",
                attrs(&[
                    (USAGE, AttributeValue::named(usage::JAVA_RUNTIME)),
                    (CATEGORY, AttributeValue::named(category::LIBRARY)),
                    (JVM_VERSION, AttributeValue::Integer(11)),
                ]),
            )
            .with_artifact(jar)
            .with_dependency(DependencyRef::new("org.slf4j", "slf4j-api", "2.0.9")),
        )
        .with_variant(RawVariant::new(
            "platformElements",
            attrs(&[
                (USAGE, AttributeValue::named(usage::JAVA_API)),
                (CATEGORY, AttributeValue::named(category::PLATFORM)),
            ]),
        ))
}

/// Scenario file content for command-line tests.
#[derive(Clone, Debug)]
pub struct ScenarioFixture {
    /// File name without directory
    pub name: String,
    /// TOML content
    pub content: String,
}

impl ScenarioFixture {
    /// One library with API, runtime and platform variants and a schema that
    /// lets runtime satisfy API requests and orders JVM versions.
    pub fn java_library() -> Self {
        Self {
            name: "java-library.toml".to_string(),
            content: r#"
[config.schema]
precedence = ["org.gradle.usage", "org.gradle.category"]

[config.schema.attributes."org.gradle.usage"]
compatible = { "java-api" = ["java-runtime"] }

[config.schema.attributes."org.gradle.jvm.version"]
type = "integer"
compatibility = "at-most"
disambiguation = "closest"

[[components]]
id = "org.example:lib:1.0"
attributes = { "org.gradle.status" = "release" }

[[components.variants]]
name = "apiElements"
attributes = { "org.gradle.usage" = "java-api", "org.gradle.category" = "library", "org.gradle.jvm.version" = 11 }
artifacts = [{ name = "lib-1.0" }]

[[components.variants]]
name = "runtimeElements"
attributes = { "org.gradle.usage" = "java-runtime", "org.gradle.category" = "library", "org.gradle.jvm.version" = 11 }
artifacts = [{ name = "lib-1.0" }]

[[components.variants.dependencies]]
group = "org.slf4j"
name = "slf4j-api"
version = "2.0.9"

[[components.variants]]
name = "platformElements"
attributes = { "org.gradle.usage" = "java-api", "org.gradle.category" = "platform" }
"#
            .trim()
            .to_string(),
        }
    }

    /// Two variants that differ only in an attribute with no rule.
    pub fn ambiguous() -> Self {
        Self {
            name: "ambiguous.toml".to_string(),
            content: r#"
[[components]]
id = "org.example:lib:1.0"

[[components.variants]]
name = "library"
attributes = { "org.gradle.usage" = "java-api", "org.gradle.category" = "library" }

[[components.variants]]
name = "platform"
attributes = { "org.gradle.usage" = "java-api", "org.gradle.category" = "platform" }
"#
            .trim()
            .to_string(),
        }
    }

    /// Write the scenario into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.name);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}
