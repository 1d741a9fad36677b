//! Event bus scenarios S4–S6 and properties 6–9, 12 from the
//! testable-properties section: fan-out, retry exhaustion/success, the size
//! cap, and per-subscription error isolation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use nimbus_core::event_bus::{EventBus, EventBusOptions, RetryPolicy, Subscription};
use nimbus_core::model::{create_event, MessageData, NewEvent, Subject, UriReference};
use nimbus_core::time_provider::MockTimeProvider;

fn sample_event(event_type: &str) -> nimbus_core::model::Event {
    create_event(NewEvent::new(
        UriReference::try_new("https://x/api").unwrap(),
        event_type,
        MessageData::try_from(serde_json::json!({ "aNumber": 1 })).unwrap(),
        Subject::try_new("order-42").unwrap(),
    ))
}

async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}

#[test_log::test(tokio::test)]
async fn fan_out_invokes_every_subscription_exactly_once() {
    let bus = EventBus::new("default");
    let first_count = Arc::new(AtomicU32::new(0));
    let second_count = Arc::new(AtomicU32::new(0));

    for counter in [&first_count, &second_count] {
        let counter = counter.clone();
        bus.subscribe_event(
            "test.event.multi",
            Subscription::new(Arc::new(move |_event| {
                let counter = counter.clone();
                Box::pin(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            })),
        );
    }

    bus.put_event(sample_event("test.event.multi")).await.unwrap();
    settle().await;

    assert_eq!(first_count.load(Ordering::SeqCst), 1);
    assert_eq!(second_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retry_succeeds_on_the_third_attempt() {
    let bus = EventBus::with_options(
        "default",
        EventBusOptions::builder()
            .time_provider(Arc::new(MockTimeProvider))
            .build(),
    );
    let attempts = Arc::new(AtomicU32::new(0));
    let on_error_called = Arc::new(AtomicU32::new(0));

    let attempts_for_handler = attempts.clone();
    let on_error_for_sink = on_error_called.clone();
    bus.subscribe_event(
        "test.event.retry",
        Subscription::new(Arc::new(move |_event| {
            let attempts = attempts_for_handler.clone();
            Box::pin(async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(nimbus_core::error::CoreError::generic_with_details(
                        "boom",
                        serde_json::json!({}),
                    ))
                } else {
                    Ok(())
                }
            })
        }))
        .with_error_sink(Arc::new(move |_err, _event| {
            on_error_for_sink.fetch_add(1, Ordering::SeqCst);
        }))
        .with_retry_policy(RetryPolicy {
            max_retries: 3,
            base_delay_ms: 10,
            max_delay_ms: 100,
            use_jitter: false,
        }),
    );

    bus.put_event(sample_event("test.event.retry")).await.unwrap();
    settle().await;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(on_error_called.load(Ordering::SeqCst), 0);
}

#[test_log::test(tokio::test)]
async fn retry_exhaustion_invokes_the_error_sink_once() {
    let bus = EventBus::with_options(
        "default",
        EventBusOptions::builder()
            .time_provider(Arc::new(MockTimeProvider))
            .default_retry_policy(RetryPolicy {
                max_retries: 2,
                base_delay_ms: 1,
                max_delay_ms: 10,
                use_jitter: false,
            })
            .build(),
    );
    let attempts = Arc::new(AtomicU32::new(0));
    let on_error_called = Arc::new(AtomicU32::new(0));

    let attempts_for_handler = attempts.clone();
    let on_error_for_sink = on_error_called.clone();
    bus.subscribe_event(
        "test.event.always_fails",
        Subscription::new(Arc::new(move |_event| {
            attempts_for_handler.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Err(nimbus_core::error::CoreError::generic_with_details(
                    "boom",
                    serde_json::json!({}),
                ))
            })
        }))
        .with_error_sink(Arc::new(move |_err, _event| {
            on_error_for_sink.fetch_add(1, Ordering::SeqCst);
        })),
    );

    bus.put_event(sample_event("test.event.always_fails"))
        .await
        .unwrap();
    settle().await;

    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(on_error_called.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn subscription_failure_does_not_affect_a_sibling_subscription() {
    let bus = EventBus::with_options(
        "default",
        EventBusOptions::builder()
            .time_provider(Arc::new(MockTimeProvider))
            .default_retry_policy(RetryPolicy {
                max_retries: 0,
                base_delay_ms: 1,
                max_delay_ms: 1,
                use_jitter: false,
            })
            .build(),
    );
    let succeeded = Arc::new(AtomicU32::new(0));
    let failed = Arc::new(AtomicU32::new(0));

    let succeeded_for_handler = succeeded.clone();
    bus.subscribe_event(
        "test.event.isolated",
        Subscription::new(Arc::new(move |_event| {
            let succeeded = succeeded_for_handler.clone();
            Box::pin(async move {
                succeeded.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })),
    );
    let failed_for_handler = failed.clone();
    bus.subscribe_event(
        "test.event.isolated",
        Subscription::new(Arc::new(move |_event| {
            failed_for_handler.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Err(nimbus_core::error::CoreError::generic_with_details(
                    "boom",
                    serde_json::json!({}),
                ))
            })
        })),
    );

    bus.put_event(sample_event("test.event.isolated"))
        .await
        .unwrap();
    settle().await;

    assert_eq!(succeeded.load(Ordering::SeqCst), 1);
    assert_eq!(failed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn oversize_event_is_rejected_before_any_subscriber_runs() {
    let bus = EventBus::new("default");
    let invoked = Arc::new(AtomicU32::new(0));
    let invoked_for_handler = invoked.clone();
    bus.subscribe_event(
        "test.event.oversize",
        Subscription::new(Arc::new(move |_event| {
            invoked_for_handler.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(()) })
        })),
    );

    let big_data = "x".repeat(65 * 1024);
    let event = create_event(NewEvent::new(
        UriReference::try_new("https://x/api").unwrap(),
        "test.event.oversize",
        MessageData::try_from(serde_json::json!({ "bigData": big_data })).unwrap(),
        Subject::try_new("order-42").unwrap(),
    ));

    let err = bus.put_event(event).await.unwrap_err();
    assert_eq!(err.to_string(), "Event size exceeds the limit of 64KB");

    settle().await;
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retry_delay_is_bounded_without_jitter() {
    let policy = RetryPolicy {
        max_retries: 4,
        base_delay_ms: 1_000,
        max_delay_ms: 30_000,
        use_jitter: false,
    };
    for attempt in 1..=4 {
        let delay = policy.base_delay_for_attempt(attempt);
        let expected = (1_000u64 * 2u64.pow(attempt - 1)).min(30_000);
        assert_eq!(delay, expected);
    }
}
