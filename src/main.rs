//! # Riemann probe
//! Sends a short run of heartbeat events to a collector and reports how each one fared.
//!
//! ## Flow
//! 1. Load `ClientConfig` from `RIEMANN_*` environment variables (defaults: localhost:5555).
//! 2. Start the connection actor over TCP (startup fails fast if the collector is unreachable).
//! 3. Send `PROBE_COUNT` events (default 5), alternating integer and float metrics.
//! 4. Query the collector once for `service = "probe"`.
//! 5. Shut down and append send statistics to `data/probe_stats.csv`.
//!
//! Log level via `RUST_LOG` (e.g. `RUST_LOG=info`).

use std::{
    collections::BTreeMap,
    env,
    path::Path,
    process,
    thread,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use log::{error, info, warn};

use riemann_client::{
    ClientConfig, Event,
    utils::export::export_stats_csv,
};

const DEFAULT_PROBE_COUNT: usize = 5;
const PROBE_INTERVAL_MS: u64 = 200;
const PROBE_SERVICE: &str = "probe";
const PROBE_TTL_SECS: f64 = 30.0;
const STATS_PATH: &str = "data/probe_stats.csv";

fn main() {
    env_logger::init();
    info!("=== RIEMANN PROBE START ===");

    let config = ClientConfig::from_env();
    let count = env::var("PROBE_COUNT")
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_PROBE_COUNT);

    let client = match riemann_client::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("[Probe] cannot reach collector at {}: {}", config.addr(), e);
            process::exit(1);
        }
    };

    let host = env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
    for seq in 0..count {
        let event = heartbeat(&host, seq);
        match client.send_event(event) {
            Ok(()) => info!("[Probe] event {} accepted", seq),
            Err(e) => warn!("[Probe] event {} failed: {}", seq, e),
        }
        thread::sleep(Duration::from_millis(PROBE_INTERVAL_MS));
    }

    match client.query(format!("service = \"{}\"", PROBE_SERVICE)) {
        Ok(events) => info!("[Probe] collector holds {} probe events", events.len()),
        Err(e) => warn!("[Probe] query failed: {}", e),
    }

    let stats = client.stats();
    if let Err(e) = client.shutdown() {
        warn!("[Probe] disconnect failed: {}", e);
    }

    info!(
        "[Probe] sent={} failed={} avg_latency_us={} max_latency_us={}",
        stats.sent, stats.failed, stats.avg_latency_us, stats.max_latency_us
    );
    if let Err(e) = export_stats_csv(Path::new(STATS_PATH), &[stats]) {
        error!("[Probe] failed to export stats: {}", e);
    }

    info!("=== RIEMANN PROBE FINISHED ===");
}

/// Even sequence numbers carry an integer metric, odd ones a float.
fn heartbeat(host: &str, seq: usize) -> Event {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();

    let mut attributes = BTreeMap::new();
    attributes.insert("seq".to_string(), seq.to_string());

    let event = Event::new()
        .with("time", now)
        .with("host", host)
        .with("service", PROBE_SERVICE)
        .with("state", "ok")
        .with("description", "probe heartbeat")
        .with("tags", vec!["probe", "heartbeat"])
        .with("ttl", PROBE_TTL_SECS)
        .with("attributes", attributes);

    if seq % 2 == 0 {
        event.with("metric", seq as i64)
    } else {
        event.with("metric", seq as f64 + 0.5)
    }
}
