//! End-to-end: client → TCP → fake collector speaking length-prefixed protobuf.

use std::{
    io::{ErrorKind, Read, Write},
    net::{TcpListener, TcpStream},
    thread,
    time::Duration,
};

use prost::Message;
use riemann_client::{
    ClientConfig, ClientError, Event,
    encoder::wire::BatchMessage,
};

fn read_frame(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut prefix = [0u8; 4];
    stream.read_exact(&mut prefix).ok()?;
    let mut body = vec![0u8; u32::from_be_bytes(prefix) as usize];
    stream.read_exact(&mut body).ok()?;
    Some(body)
}

fn write_frame(stream: &mut TcpStream, message: &BatchMessage) {
    let body = message.encode_to_vec();
    stream.write_all(&(body.len() as u32).to_be_bytes()).unwrap();
    stream.write_all(&body).unwrap();
}

/// Accepts one connection; rejects events whose service is "reject-me",
/// acknowledges the rest. Returns every message received.
fn spawn_collector() -> (u16, thread::JoinHandle<Vec<BatchMessage>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        while let Some(frame) = read_frame(&mut conn) {
            let message = BatchMessage::decode(frame.as_slice()).unwrap();
            let rejected = message
                .events
                .iter()
                .any(|e| e.service.as_deref() == Some("reject-me"));
            let reply = if rejected {
                BatchMessage {
                    ok: Some(false),
                    error: Some("service not allowed".to_string()),
                    ..Default::default()
                }
            } else {
                BatchMessage {
                    ok: Some(true),
                    ..Default::default()
                }
            };
            write_frame(&mut conn, &reply);
            received.push(message);
        }
        received
    });
    (port, handle)
}

/// (metric_f, metric_sint64, metric_d) of the single event in `message`.
fn metric_slots(message: &BatchMessage) -> (Option<f32>, Option<i64>, Option<f64>) {
    let event = &message.events[0];
    (event.metric_f, event.metric_sint64, event.metric_d)
}

#[test]
fn events_round_trip_through_tcp() {
    let (port, collector) = spawn_collector();
    let client = riemann_client::connect(&ClientConfig::new("127.0.0.1", port)).unwrap();

    let base = Event::new()
        .with("time", 1)
        .with("state", "online")
        .with("service", "katja")
        .with("host", "localhost")
        .with("description", "katja test")
        .with("tags", vec!["foo", "bar"]);

    client.send_event(base.clone()).unwrap();
    client.send_event(base.clone().with("metric", 1)).unwrap();
    client.send_event(base.clone().with("metric", 2.0)).unwrap();

    match client.send_event(base.clone().with("service", "reject-me")) {
        Err(ClientError::Rejected(reason)) => assert_eq!(reason, "service not allowed"),
        other => panic!("expected rejection, got {:?}", other),
    }
    // Still usable after a rejected send.
    client.send_event(base).unwrap();

    let stats = client.stats();
    assert_eq!((stats.sent, stats.failed), (4, 1));
    client.shutdown().unwrap();

    let received = collector.join().unwrap();
    assert_eq!(received.len(), 5);
    assert!(received.iter().all(|m| m.events.len() == 1 && m.states.is_empty()));

    let plain = &received[0].events[0];
    assert_eq!(plain.service.as_deref(), Some("katja"));
    assert_eq!(plain.tags, vec!["foo".to_string(), "bar".to_string()]);
    assert_eq!(metric_slots(&received[0]), (Some(0.0), Some(0), None));
    assert_eq!(metric_slots(&received[1]), (Some(1.0), Some(1), None));
    assert_eq!(metric_slots(&received[2]), (Some(2.0), None, Some(2.0)));
}

#[test]
fn unreachable_collector_fails_startup() {
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    match riemann_client::connect(&ClientConfig::new("127.0.0.1", port)) {
        Err(err) => assert!(err.is_fatal(), "unexpected error kind: {}", err),
        Ok(_) => panic!("connect should fail with no listener"),
    }
}

#[test]
fn io_timeout_fails_one_call_and_never_replays_its_reply() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let collector = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut requests = 0;
        while let Some(_frame) = read_frame(&mut conn) {
            requests += 1;
            // Answer only after the client has given up waiting.
            thread::sleep(Duration::from_millis(300));
            let reply = BatchMessage {
                ok: Some(true),
                ..Default::default()
            };
            let body = reply.encode_to_vec();
            if conn.write_all(&(body.len() as u32).to_be_bytes()).is_err()
                || conn.write_all(&body).is_err()
            {
                break;
            }
        }
        requests
    });

    let config = ClientConfig::new("127.0.0.1", port).with_io_timeout(Duration::from_millis(50));
    let client = riemann_client::connect(&config).unwrap();

    match client.send_event(Event::new().with("service", "slow")) {
        Err(ClientError::Transmit(e)) => assert!(
            matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut),
            "unexpected io error kind: {:?}",
            e.kind()
        ),
        other => panic!("expected timeout, got {:?}", other),
    }

    // Actor survives the failure.
    client.ping().unwrap();

    // The late first reply must not be handed to this call.
    thread::sleep(Duration::from_millis(400));
    match client.send_event(Event::new().with("service", "after-timeout")) {
        Err(ClientError::Transmit(e)) => assert_eq!(e.kind(), ErrorKind::NotConnected),
        other => panic!("expected poisoned connection error, got {:?}", other),
    }

    let stats = client.stats();
    assert_eq!((stats.sent, stats.failed), (0, 2));
    client.shutdown().unwrap();

    assert_eq!(collector.join().unwrap(), 1, "only the first request reaches the wire");
}
