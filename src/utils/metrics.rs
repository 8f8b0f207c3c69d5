//! metrics.rs
//! Send-path counters shared between the connection actor and its handles.
//!
//! Atomics only: the actor bumps counters after every request, handles read
//! snapshots at any time without touching the actor's queue.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use serde::Serialize;

#[derive(Debug, Default)]
pub struct SendStats {
    sent: AtomicU64,
    failed: AtomicU64,
    rejected_closed: AtomicU64,
    last_latency_us: AtomicU64,
    max_latency_us: AtomicU64,
    total_latency_us: AtomicU64,
}

pub type SharedStats = Arc<SendStats>;

/// Point-in-time copy of [`SendStats`], one CSV row on export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub sent: u64,
    pub failed: u64,
    pub rejected_closed: u64,
    pub last_latency_us: u64,
    pub max_latency_us: u64,
    pub avg_latency_us: u64,
}

impl SendStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Round trip finished (either outcome); latency covers build → reply.
    pub fn record_round_trip(&self, latency_us: u64, ok: bool) {
        if ok {
            self.sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.last_latency_us.store(latency_us, Ordering::Relaxed);
        self.max_latency_us.fetch_max(latency_us, Ordering::Relaxed);
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
    }

    /// Request turned away because the actor is closed.
    pub fn record_closed(&self) {
        self.rejected_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let sent = self.sent.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let round_trips = sent + failed;
        let total = self.total_latency_us.load(Ordering::Relaxed);
        StatsSnapshot {
            sent,
            failed,
            rejected_closed: self.rejected_closed.load(Ordering::Relaxed),
            last_latency_us: self.last_latency_us.load(Ordering::Relaxed),
            max_latency_us: self.max_latency_us.load(Ordering::Relaxed),
            avg_latency_us: if round_trips == 0 { 0 } else { total / round_trips },
        }
    }
}
