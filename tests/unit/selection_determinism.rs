//! Selection must not depend on the order candidates are offered in.

use proptest::prelude::*;
use std::sync::Arc;

use variant_select::attributes::{AttributeSet, AttributeValue, AttributesFactory};
use variant_select::component::{ArtifactRef, ComponentIdentifier, RawVariant};
use variant_select::constants::{CATEGORY, JVM_VERSION, USAGE, category, usage};
use variant_select::metadata::ConfigurationMetadata;
use variant_select::schema::{AttributesSchema, CompatibleValues, IntegerAtMost, PreferClosestInteger, PreferValues};
use variant_select::selection::{AttributeMatcher, SelectionFailure};

const USAGES: [&str; 3] = [usage::JAVA_API, usage::JAVA_RUNTIME, "native-link"];
const CATEGORIES: [&str; 2] = [category::LIBRARY, category::PLATFORM];

fn schema() -> AttributesSchema {
    AttributesSchema::new()
        .with_compatibility(USAGE, CompatibleValues::new().allow(usage::JAVA_API, [usage::JAVA_RUNTIME]))
        .with_disambiguation(USAGE, PreferValues::new([usage::JAVA_API, usage::JAVA_RUNTIME]))
        .with_compatibility(JVM_VERSION, IntegerAtMost)
        .with_disambiguation(JVM_VERSION, PreferClosestInteger)
        .with_precedence([USAGE, JVM_VERSION])
}

/// (usage index, category index, optional jvm version)
type Shape = (usize, usize, Option<i64>);

fn shape() -> impl Strategy<Value = Shape> {
    (0..USAGES.len(), 0..CATEGORIES.len(), prop::option::of(8i64..22))
}

fn candidates(shapes: &[Shape]) -> Vec<Arc<ConfigurationMetadata>> {
    let factory = AttributesFactory::new();
    let id = ComponentIdentifier::new("org.example", "lib", "1.0");
    shapes
        .iter()
        .enumerate()
        .map(|(i, (u, c, jvm))| {
            let mut entries = vec![
                (USAGE, AttributeValue::named(USAGES[*u])),
                (CATEGORY, AttributeValue::named(CATEGORIES[*c])),
            ];
            if let Some(jvm) = jvm {
                entries.push((JVM_VERSION, AttributeValue::Integer(*jvm)));
            }
            let raw = RawVariant::new(format!("variant{i}"), AttributeSet::from_entries(entries).unwrap());
            Arc::new(ConfigurationMetadata::realize(id.clone(), &raw, &AttributeSet::empty(), &factory).unwrap())
        })
        .collect()
}

/// Selected metadata, or the error message with its full failure report.
type Outcome = Result<ConfigurationMetadata, (String, Option<SelectionFailure>)>;

fn outcome(schema: &AttributesSchema, requested: &AttributeSet, offered: &[Arc<ConfigurationMetadata>]) -> Outcome {
    AttributeMatcher::new(schema)
        .select(requested, offered)
        .map(|selected| (*selected).clone())
        .map_err(|e| (e.to_string(), e.selection_failure().cloned()))
}

proptest! {
    #[test]
    fn selection_ignores_candidate_order(
        (shapes, order) in prop::collection::vec(shape(), 1..6).prop_flat_map(|shapes| {
            let indices: Vec<usize> = (0..shapes.len()).collect();
            (Just(shapes), Just(indices).prop_shuffle())
        }),
        requested_usage in 0..USAGES.len(),
        requested_jvm in prop::option::of(8i64..22),
    ) {
        let schema = schema();
        let mut entries = vec![(USAGE, AttributeValue::named(USAGES[requested_usage]))];
        if let Some(jvm) = requested_jvm {
            entries.push((JVM_VERSION, AttributeValue::Integer(jvm)));
        }
        let requested = AttributeSet::from_entries(entries).unwrap();

        let offered = candidates(&shapes);
        let shuffled: Vec<_> = order.iter().map(|&i| Arc::clone(&offered[i])).collect();

        prop_assert_eq!(outcome(&schema, &requested, &offered), outcome(&schema, &requested, &shuffled));
    }

    #[test]
    fn selected_variant_is_compatible(
        shapes in prop::collection::vec(shape(), 1..6),
        requested_usage in 0..USAGES.len(),
    ) {
        let schema = schema();
        let matcher = AttributeMatcher::new(&schema);
        let requested =
            AttributeSet::from_entries([(USAGE, AttributeValue::named(USAGES[requested_usage]))]).unwrap();
        let offered = candidates(&shapes);

        if let Ok(selected) = matcher.select(&requested, &offered) {
            prop_assert!(matcher.is_compatible(&requested, &selected));
        }
    }
}

#[test]
fn duplicate_candidates_collapse_before_disambiguation() {
    let schema = AttributesSchema::new();
    let offered = candidates(&[(0, 0, None)]);
    let doubled = vec![Arc::clone(&offered[0]), Arc::new((*offered[0]).clone())];
    let requested = AttributeSet::from_entries([(USAGE, AttributeValue::named(usage::JAVA_API))]).unwrap();

    let selected = AttributeMatcher::new(&schema).select(&requested, &doubled).unwrap();
    assert_eq!(selected.name(), "variant0");
}

#[test]
fn same_named_candidates_report_identically_in_any_order() {
    let factory = AttributesFactory::new();
    let id = ComponentIdentifier::new("org", "lib", "1.0");
    let variant = |value: AttributeValue| {
        let raw = RawVariant::new("v", AttributeSet::from_entries([("k", value)]).unwrap());
        Arc::new(ConfigurationMetadata::realize(id.clone(), &raw, &AttributeSet::empty(), &factory).unwrap())
    };
    let text = variant(AttributeValue::string("x"));
    let named = variant(AttributeValue::named("x"));
    let requested = AttributeSet::from_entries([("k", AttributeValue::named("x"))]).unwrap();
    let schema = AttributesSchema::new();

    let forward = outcome(&schema, &requested, &[Arc::clone(&text), Arc::clone(&named)]);
    let backward = outcome(&schema, &requested, &[named, text]);
    assert_eq!(forward, backward);

    let (message, failure) = forward.unwrap_err();
    assert!(message.starts_with("Cannot choose between 2 variants"), "{message}");
    assert_eq!(failure.unwrap().candidates.len(), 2);
}

#[test]
fn candidates_differing_only_in_artifacts_report_identically_in_any_order() {
    let factory = AttributesFactory::new();
    let id = ComponentIdentifier::new("org", "lib", "1.0");
    let attributes = AttributeSet::from_entries([(USAGE, AttributeValue::named(usage::JAVA_API))]).unwrap();
    let variant = |artifact: &str| {
        let raw = RawVariant::new("v", attributes.clone()).with_artifact(ArtifactRef::new(artifact, "jar"));
        Arc::new(ConfigurationMetadata::realize(id.clone(), &raw, &AttributeSet::empty(), &factory).unwrap())
    };
    let first = variant("lib-a");
    let second = variant("lib-b");
    let schema = AttributesSchema::new();

    let forward = outcome(&schema, &attributes, &[Arc::clone(&first), Arc::clone(&second)]);
    let backward = outcome(&schema, &attributes, &[second, first]);
    assert_eq!(forward, backward);
    assert!(forward.is_err());
}
