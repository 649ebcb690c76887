//! Engine configuration files.

use std::fs;
use tempfile::TempDir;

use variant_select::attributes::{AttributeType, AttributeValue};
use variant_select::config::{DisambiguationKind, EngineConfig};
use variant_select::constants::{CATEGORY, JVM_VERSION, USAGE, usage};
use variant_select::core::VariantError;

#[test]
fn test_load_full_configuration() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("engine.toml");
    fs::write(
        &path,
        r#"
component_governed_keys = ["org.gradle.status"]

[schema]
precedence = ["org.gradle.usage", "org.gradle.category"]

[schema.attributes."org.gradle.usage"]
compatible = { "java-api" = ["java-runtime"] }
prefer = ["java-api", "java-runtime"]

[schema.attributes."org.gradle.category"]
disambiguation = "lowest"
order = ["platform", "library"]

[schema.attributes."org.gradle.jvm.version"]
type = "integer"
mandatory = true
compatibility = "at-most"
disambiguation = "closest"
"#,
    )?;

    let config = EngineConfig::load(&path)?;
    assert_eq!(config.component_governed_keys, vec!["org.gradle.status"]);
    assert_eq!(
        config.schema.attributes[CATEGORY].disambiguation,
        Some(DisambiguationKind::Lowest)
    );

    let schema = config.into_schema()?;
    assert_eq!(schema.value_type(JVM_VERSION), Some(AttributeType::Integer));
    assert!(schema.is_mandatory(JVM_VERSION));
    assert!(schema.is_compatible(
        USAGE,
        &AttributeValue::named(usage::JAVA_API),
        &AttributeValue::named(usage::JAVA_RUNTIME)
    ));
    assert!(!schema.is_compatible(JVM_VERSION, &AttributeValue::Integer(11), &AttributeValue::Integer(17)));
    assert_eq!(schema.precedence()[..2], [USAGE.to_string(), CATEGORY.to_string()]);
    Ok(())
}

#[test]
fn test_empty_file_gives_defaults() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("empty.toml");
    fs::write(&path, "")?;

    let config = EngineConfig::load(&path)?;
    assert_eq!(config, EngineConfig::default());
    Ok(())
}

#[test]
fn test_missing_file_names_the_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.toml");
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("missing.toml"));
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = EngineConfig::from_toml_str("[schema]\nprecidence = []\n").unwrap_err();
    assert!(format!("{err:#}").contains("precidence"));
}

#[test]
fn test_inconsistent_rules_are_config_errors() {
    let cases = [
        r#"
[schema.attributes.label]
type = "string"
compatibility = "at-most"
"#,
        r#"
[schema.attributes.usage]
disambiguation = "prefer"
"#,
        r#"
[schema]
precedence = ["usage", "usage"]
"#,
    ];
    for case in cases {
        let err = match EngineConfig::from_toml_str(case) {
            Ok(_) => panic!("accepted invalid configuration:\n{case}"),
            Err(e) => e,
        };
        let kind = err.chain().find_map(|e| e.downcast_ref::<VariantError>());
        assert!(matches!(kind, Some(VariantError::ConfigError { .. })), "{err:#}");
    }
}
