//! Benchmarks the event bus's publish path: size-cap check, span/metric
//! emission, and scheduling fan-out to a varying number of subscribers. The
//! subscriber handlers themselves are trivial, so this isolates the bus's
//! own overhead from handler cost.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nimbus_core::event_bus::{EventBus, Subscription};
use nimbus_core::model::{create_event, MessageData, NewEvent, Subject, UriReference};
use tokio::runtime::Runtime;

fn sample_event() -> nimbus_core::model::Event {
    create_event(NewEvent::new(
        UriReference::try_new("https://bench/api").unwrap(),
        "bench.event",
        MessageData::try_from(serde_json::json!({ "aNumber": 1 })).unwrap(),
        Subject::try_new("bench-subject").unwrap(),
    ))
}

fn put_event_fan_out(c: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime");

    let mut group = c.benchmark_group("eventbus_put_event");
    for subscriber_count in [1, 10, 50].iter() {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscriber_count),
            subscriber_count,
            |b, &subscriber_count| {
                let bus = EventBus::new("bench");
                let delivered = Arc::new(AtomicU64::new(0));
                for _ in 0..subscriber_count {
                    let delivered = delivered.clone();
                    bus.subscribe_event(
                        "bench.event",
                        Subscription::new(Arc::new(move |_event| {
                            let delivered = delivered.clone();
                            Box::pin(async move {
                                delivered.fetch_add(1, Ordering::Relaxed);
                                Ok(())
                            })
                        })),
                    );
                }

                b.to_async(&runtime).iter(|| {
                    let bus = bus.clone();
                    let event = sample_event();
                    async move { black_box(bus.put_event(event).await.unwrap()) }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, put_event_fan_out);
criterion_main!(benches);
