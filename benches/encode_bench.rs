/*Measures the cost of turning one event into wire bytes: field copy, metric
slot selection, single-entity batch wrapping and protobuf encoding. */
use criterion::{
    criterion_group,
    criterion_main,
    Criterion
};
use riemann_client::encoder::{Event, build_event, build_message, serialize};

use std::{
    collections::BTreeMap,
    hint::black_box,
};


fn sample_event() -> Event {
    let mut attributes = BTreeMap::new();
    attributes.insert("region".to_string(), "eu-west".to_string());
    attributes.insert("rack".to_string(), "r12".to_string());

    Event::new()
        .with("time", 1_700_000_000_i64)
        .with("state", "ok")
        .with("service", "api latency")
        .with("host", "web-01")
        .with("description", "p99 request latency")
        .with("tags", vec!["api", "latency"])
        .with("ttl", 60.0)
        .with("attributes", attributes)
        .with("metric", 12.75)
}

fn bench_encode(c: &mut Criterion) {
    let event = sample_event();

    c.bench_function("build_event", |b| {
        b.iter(|| black_box(build_event(black_box(&event))));
    });

    c.bench_function("event_to_bytes", |b| {
        b.iter(|| {
            let message = build_message(vec![build_event(black_box(&event)).into()]);
            black_box(serialize(&message))
        });
    });
}
criterion_group!(benches, bench_encode);
criterion_main!(benches);
