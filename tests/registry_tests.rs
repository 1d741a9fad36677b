//! Property 11 (registry singleton) and the concurrent-first-access
//! guarantee from spec.md §5: repeated `get_*` for the same name return the
//! same instance; `setup_*` replaces it; concurrent first access to an
//! unset name constructs at most once.

use std::sync::Arc;

use nimbus_core::event_bus::EventBusOptions;
use nimbus_core::registry::Registry;
use nimbus_core::router::RouterOptions;

#[tokio::test]
async fn get_router_returns_the_same_instance_on_repeated_access() {
    let registry = Registry::new();
    let first = registry.get_router("orders");
    first.register(
        "orders.create",
        Arc::new(|msg| Box::pin(async move { Ok(msg) })),
        Arc::new(nimbus_core::validator::ObjectSchema::new(["data"])),
    );

    let second = registry.get_router("orders");
    assert_eq!(first.name(), second.name());

    // Both handles share the same handler table: a registration made
    // through `first` is visible through `second`.
    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "1",
        "source": "https://x/api",
        "type": "orders.create",
        "data": {},
    });
    assert!(second.route(input).await.is_ok());
}

#[tokio::test]
async fn setup_router_replaces_the_previously_registered_instance() {
    let registry = Registry::new();
    let original = registry.get_router("billing");
    original.register(
        "billing.charge",
        Arc::new(|msg| Box::pin(async move { Ok(msg) })),
        Arc::new(nimbus_core::validator::ObjectSchema::new(["data"])),
    );

    let replaced = registry.setup_router("billing", RouterOptions::default());
    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "1",
        "source": "https://x/api",
        "type": "billing.charge",
        "data": {},
    });
    // The replacement has no handlers registered yet, even though the
    // original (now orphaned) instance did.
    let err = replaced.route(input).await.unwrap_err();
    assert!(matches!(err, nimbus_core::error::CoreError::NotFound { .. }));
}

#[test]
fn get_event_bus_returns_the_same_instance_on_repeated_access() {
    let registry = Registry::new();
    let first = registry.get_event_bus("notifications");
    let second = registry.get_event_bus("notifications");
    assert_eq!(first.name(), second.name());
}

#[test]
fn setup_event_bus_replaces_the_previously_registered_instance() {
    let registry = Registry::new();
    let _original = registry.get_event_bus("notifications");
    let replaced = registry.setup_event_bus("notifications", EventBusOptions::default());
    assert_eq!(replaced.name(), "notifications");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_first_access_constructs_at_most_once() {
    let registry = Arc::new(Registry::new());
    let mut handles = Vec::new();
    for _ in 0..32 {
        let registry = registry.clone();
        handles.push(tokio::spawn(
            async move { registry.get_router("shared") },
        ));
    }
    let mut routers = Vec::new();
    for handle in handles {
        routers.push(handle.await.unwrap());
    }

    // Every handle ends up pointing at the same underlying table: a
    // registration through any one of them is visible through the
    // registry's canonical `get_router` afterwards.
    routers[0].register(
        "shared.ping",
        Arc::new(|msg| Box::pin(async move { Ok(msg) })),
        Arc::new(nimbus_core::validator::ObjectSchema::new(["data"])),
    );
    let canonical = registry.get_router("shared");
    let input = serde_json::json!({
        "specversion": "1.0",
        "id": "1",
        "source": "https://x/api",
        "type": "shared.ping",
        "data": {},
    });
    assert!(canonical.route(input).await.is_ok());
}

#[test]
fn global_registry_defaults_the_conventional_name() {
    let router = nimbus_core::registry::global().get_router(nimbus_core::registry::DEFAULT_NAME);
    assert_eq!(router.name(), "default");
}
