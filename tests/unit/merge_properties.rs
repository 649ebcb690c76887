//! Properties of variant-over-component attribute merging.

use proptest::prelude::*;
use std::collections::BTreeMap;

use variant_select::attributes::{AttributeSet, AttributeValue, AttributesFactory};
use variant_select::component::{ComponentIdentifier, RawVariant};
use variant_select::metadata::ConfigurationMetadata;

fn set_from(map: &BTreeMap<String, String>) -> AttributeSet {
    AttributeSet::from_entries(map.iter().map(|(k, v)| (k.as_str(), AttributeValue::named(v)))).unwrap()
}

fn attribute_map() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-f]", "[x-z]{1,2}", 0..6)
}

proptest! {
    #[test]
    fn variant_value_wins_and_other_keys_pass_through(
        variant in attribute_map(),
        component in attribute_map(),
    ) {
        let merged = AttributeSet::concat(&set_from(&variant), &set_from(&component)).unwrap();

        for (key, value) in &variant {
            prop_assert_eq!(merged.get(key), Some(&AttributeValue::named(value)));
        }
        for (key, value) in component.iter().filter(|(k, _)| !variant.contains_key(*k)) {
            prop_assert_eq!(merged.get(key), Some(&AttributeValue::named(value)));
        }

        let mut expected_keys: Vec<&str> = variant.keys().chain(component.keys()).map(String::as_str).collect();
        expected_keys.sort_unstable();
        expected_keys.dedup();
        prop_assert_eq!(merged.keys().collect::<Vec<_>>(), expected_keys);
    }

    #[test]
    fn merge_is_associative(
        a in attribute_map(),
        b in attribute_map(),
        c in attribute_map(),
    ) {
        let (a, b, c) = (set_from(&a), set_from(&b), set_from(&c));
        let left = AttributeSet::concat(&AttributeSet::concat(&a, &b).unwrap(), &c).unwrap();
        let right = AttributeSet::concat(&a, &AttributeSet::concat(&b, &c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    #[test]
    fn empty_side_shares_the_other_input(map in attribute_map()) {
        let set = set_from(&map);
        let empty = AttributeSet::empty();
        prop_assert!(AttributeSet::concat(&empty, &set).unwrap().ptr_eq(&set));
        prop_assert!(AttributeSet::concat(&set, &empty).unwrap().ptr_eq(&set));
    }

    #[test]
    fn merge_leaves_inputs_untouched(
        variant in attribute_map(),
        component in attribute_map(),
    ) {
        let (v, c) = (set_from(&variant), set_from(&component));
        let (v_before, c_before) = (v.clone(), c.clone());
        let _ = AttributeSet::concat(&v, &c).unwrap();
        prop_assert_eq!(v, v_before);
        prop_assert_eq!(c, c_before);
    }

    #[test]
    fn factory_merge_equals_plain_merge(
        variant in attribute_map(),
        component in attribute_map(),
    ) {
        let factory = AttributesFactory::new();
        let (v, c) = (set_from(&variant), set_from(&component));
        let plain = AttributeSet::concat(&v, &c).unwrap();
        let first = factory.concat(&v, &c).unwrap();
        let second = factory.concat(&v.clone(), &c.clone()).unwrap();
        prop_assert_eq!(&plain, &first);
        prop_assert!(first.ptr_eq(&second));
    }

    #[test]
    fn realization_is_pure(
        variant in attribute_map(),
        component in attribute_map(),
    ) {
        let id = ComponentIdentifier::new("org.example", "lib", "1.0");
        let raw = RawVariant::new("v", set_from(&variant));
        let component = set_from(&component);

        let one = ConfigurationMetadata::realize(id.clone(), &raw, &component, &AttributesFactory::new()).unwrap();
        let two = ConfigurationMetadata::realize(id, &raw, &component, &AttributesFactory::new()).unwrap();
        prop_assert_eq!(one, two);
    }
}

#[test]
fn type_conflict_between_levels_fails_the_merge() {
    let variant = AttributeSet::from_entries([("org.gradle.jvm.version", AttributeValue::Integer(11))]).unwrap();
    let component =
        AttributeSet::from_entries([("org.gradle.jvm.version", AttributeValue::string("11"))]).unwrap();
    let err = AttributeSet::concat(&variant, &component).unwrap_err();
    assert!(err.to_string().contains("org.gradle.jvm.version"));
}

#[test]
fn lazy_metadata_skips_component_attributes() {
    let id = ComponentIdentifier::new("org.example", "lib", "1.0");
    let raw = RawVariant::new(
        "apiElements",
        AttributeSet::from_entries([("org.gradle.usage", AttributeValue::named("java-api"))]).unwrap(),
    );
    let component =
        AttributeSet::from_entries([("org.gradle.status", AttributeValue::named("release"))]).unwrap();

    let lazy = ConfigurationMetadata::from_lazy(id.clone(), &raw);
    let realized = ConfigurationMetadata::realize(id, &raw, &component, &AttributesFactory::new()).unwrap();

    assert!(!lazy.is_realized());
    assert!(!lazy.attributes().contains("org.gradle.status"));
    assert!(realized.is_realized());
    assert!(realized.attributes().contains("org.gradle.status"));
    assert_eq!(lazy.name(), realized.name());
}
