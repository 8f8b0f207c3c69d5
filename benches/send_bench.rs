/*Measures a full send_event round trip through the connection actor: queueing,
encoding, and an in-memory transport that acknowledges immediately. Isolates the
actor's serialization overhead from network latency. */
use criterion::{
    criterion_group,
    criterion_main,
    Criterion
};
use prost::Message;
use riemann_client::{
    ClientConfig, ConnectionActor, Event, Result, Transport,
    encoder::BatchMessage,
};

use std::hint::black_box;

struct AckTransport {
    ack: Vec<u8>,
}

impl Transport for AckTransport {
    type State = ();

    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn disconnect(&mut self, _state: ()) -> Result<()> {
        Ok(())
    }

    fn transmit(&mut self, _bytes: &[u8], state: ()) -> (Result<Vec<u8>>, ()) {
        (Ok(self.ack.clone()), state)
    }
}

fn bench_send(c: &mut Criterion) {
    let ack = BatchMessage {
        ok: Some(true),
        ..Default::default()
    }
    .encode_to_vec();
    let handle = ConnectionActor::spawn(AckTransport { ack }, &ClientConfig::default())
        .expect("in-memory transport always connects");

    let event = Event::new()
        .with("service", "bench")
        .with("host", "localhost")
        .with("metric", 1);

    c.bench_function("actor_send_event_round_trip", |b| {
        b.iter(|| black_box(handle.send_event(black_box(event.clone()))));
    });

    let _ = handle.shutdown();
}
criterion_group!(benches, bench_send);
criterion_main!(benches);
