//! Many tasks realizing the same and different keys at once.

use anyhow::Result;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Barrier;
use tracing::debug;

use variant_select::attributes::{AttributeSet, AttributeValue};
use variant_select::component::{ComponentDescriptor, ComponentIdentifier, RawVariant};
use variant_select::constants::{USAGE, usage};
use variant_select::core::VariantError;
use variant_select::schema::AttributesSchema;
use variant_select::session::ResolutionSession;
use variant_select::test_utils::{CountingProvider, fixtures, init_test_logging, named_attrs};

const CALLERS: usize = 64;

fn lib_id() -> ComponentIdentifier {
    ComponentIdentifier::new("org.example", "lib", "1.0")
}

fn slow_session(provider: CountingProvider) -> (Arc<CountingProvider>, Arc<ResolutionSession>) {
    let provider = Arc::new(provider.with_delay(Duration::from_millis(50)));
    let session = Arc::new(ResolutionSession::with_schema(provider.clone(), AttributesSchema::new()));
    (provider, session)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_one_key_is_realized_once_for_many_callers() -> Result<()> {
    init_test_logging(None);
    let (provider, session) =
        slow_session(CountingProvider::new().with_descriptor(fixtures::java_library("org.example", "lib", "1.0")));
    let barrier = Arc::new(Barrier::new(CALLERS));

    let start = Instant::now();
    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let session = Arc::clone(&session);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            session.realize(&lib_id(), "apiElements").await
        }));
    }

    let mut results = Vec::with_capacity(CALLERS);
    for handle in handles {
        results.push(handle.await??);
    }
    debug!("{} callers finished in {:?}", CALLERS, start.elapsed());

    let first = &results[0];
    assert!(results.iter().all(|r| Arc::ptr_eq(r, first)));
    assert_eq!(provider.lookups(), 1);

    let stats = session.stats().realization;
    assert_eq!(stats.realizations, 1);
    assert_eq!(stats.failures, 0);
    // Every caller ends with exactly one committed value or cache hit.
    assert_eq!(stats.hits + stats.realizations, CALLERS);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_distinct_keys_do_not_serialize() -> Result<()> {
    init_test_logging(None);
    const COMPONENTS: usize = 16;

    let mut provider = CountingProvider::new();
    let mut ids = Vec::with_capacity(COMPONENTS);
    for i in 0..COMPONENTS {
        let id = ComponentIdentifier::new("org.example", format!("lib{i}"), "1.0");
        provider = provider.with_descriptor(fixtures::java_library("org.example", &format!("lib{i}"), "1.0"));
        ids.push(id);
    }
    let (provider, session) = slow_session(provider);

    let start = Instant::now();
    let mut handles = Vec::new();
    for id in &ids {
        for variant in ["apiElements", "runtimeElements", "platformElements"] {
            for _ in 0..4 {
                let session = Arc::clone(&session);
                let id = id.clone();
                handles.push(tokio::spawn(async move { session.realize(&id, variant).await }));
            }
        }
    }
    for handle in handles {
        handle.await??;
    }
    let elapsed = start.elapsed();
    debug!("{} keys realized in {:?}", COMPONENTS * 3, elapsed);

    assert_eq!(session.stats().realization.realizations, COMPONENTS * 3);
    assert_eq!(provider.lookups(), COMPONENTS * 3);
    assert_eq!(session.engine().cache().len(), COMPONENTS * 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_failures_are_never_cached() -> Result<()> {
    init_test_logging(None);
    let broken = ComponentDescriptor::new(lib_id(), named_attrs(&[(USAGE, usage::JAVA_API)])).with_variant(
        RawVariant::new(
            "apiElements",
            AttributeSet::from_entries([(USAGE, AttributeValue::Integer(1))])?,
        ),
    );
    let (provider, session) = slow_session(CountingProvider::new().with_descriptor(broken));

    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(async move { session.realize(&lib_id(), "apiElements").await }));
    }
    for handle in handles {
        assert!(matches!(handle.await?, Err(VariantError::AttributeTypeMismatch { .. })));
    }
    assert!(session.engine().cache().is_empty());
    assert_eq!(session.stats().realization.realizations, 0);

    provider.registry().register(fixtures::java_library("org.example", "lib", "1.0"));
    let fixed = session.realize(&lib_id(), "apiElements").await?;
    assert!(fixed.is_realized());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_selection_under_concurrency_agrees() -> Result<()> {
    init_test_logging(None);
    let (_provider, session) =
        slow_session(CountingProvider::new().with_descriptor(fixtures::java_library("org.example", "lib", "1.0")));
    let requested = named_attrs(&[(USAGE, usage::JAVA_RUNTIME)]);

    let mut handles = Vec::with_capacity(CALLERS);
    for _ in 0..CALLERS {
        let session = Arc::clone(&session);
        let requested = requested.clone();
        handles.push(tokio::spawn(async move { session.select_variant(&lib_id(), &requested).await }));
    }
    let mut selected = Vec::with_capacity(CALLERS);
    for handle in handles {
        selected.push(handle.await??);
    }

    assert!(selected.iter().all(|s| Arc::ptr_eq(s, &selected[0])));
    assert_eq!(selected[0].name(), "runtimeElements");
    assert_eq!(session.stats().realization.realizations, 3);
    Ok(())
}
