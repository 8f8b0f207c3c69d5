//! actor.rs
//! Connection actor: one worker thread owns the transport and its connection state.
//!
//! - Requests arrive on a bounded crossbeam channel and are served strictly one at a
//!   time, in arrival order: build → serialize → transmit → decode reply → answer.
//! - Each request carries a oneshot reply channel, so callers may block (`send_event`)
//!   or await (`send_event_async`).
//! - A transmit failure is answered to its caller only; the actor keeps the returned
//!   connection state and serves the next request.
//! - Shutdown runs in queue order: disconnect exactly once, then every request behind
//!   it (and every later one) fails with `Closed`.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Instant,
};

use crossbeam::channel::{Receiver, Sender, bounded};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::connection::transport::Transport;
use crate::encoder::{
    Event, WireEvent, build_event, build_message, build_query, build_state, parse_reply, serialize,
    wire::BatchMessage,
};
use crate::error::{ClientError, Result};
use crate::utils::{
    config::ClientConfig,
    metrics::{SendStats, SharedStats, StatsSnapshot},
};

/// What a send request carries into the actor.
#[derive(Debug, Clone)]
enum Outbound {
    Event(Event),
    State(Event),
    Query(String),
}

impl Outbound {
    fn into_message(self) -> BatchMessage {
        match self {
            Outbound::Event(event) => build_message(vec![build_event(&event).into()]),
            Outbound::State(state) => build_message(vec![build_state(&state).into()]),
            Outbound::Query(query) => build_query(&query),
        }
    }
}

enum Request {
    Send {
        outbound: Outbound,
        reply: oneshot::Sender<Result<BatchMessage>>,
    },
    /// Acknowledged without touching the connection.
    Ping { reply: oneshot::Sender<()> },
    Shutdown { reply: oneshot::Sender<Result<()>> },
}

/// Worker side. Lives only on the actor thread.
pub struct ConnectionActor<T: Transport> {
    transport: T,
    state: Option<T::State>,
    rx: Receiver<Request>,
    stats: SharedStats,
}

impl<T: Transport> ConnectionActor<T> {
    /// Starts the actor thread and connects from it.
    ///
    /// Returns only after `connect` has finished; a connect failure is returned
    /// here and no handle is ever produced.
    pub fn spawn(transport: T, config: &ClientConfig) -> Result<ActorHandle> {
        let (tx, rx) = bounded::<Request>(config.queue_capacity.max(1));
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        let stats: SharedStats = Arc::new(SendStats::new());
        let stats_actor = stats.clone();

        let worker = thread::Builder::new()
            .name("riemann-connection".into())
            .spawn(move || {
                let mut transport = transport;
                let state = match transport.connect() {
                    Ok(state) => state,
                    Err(e) => {
                        error!("[Actor] startup failed: {}", e);
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                let actor = ConnectionActor {
                    transport,
                    state: Some(state),
                    rx,
                    stats: stats_actor,
                };
                actor.run();
            })
            .map_err(|source| ClientError::Connect {
                addr: config.addr(),
                source,
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            // Worker died before reporting (panicked in connect).
            Err(_) => {
                let _ = worker.join();
                return Err(ClientError::Closed);
            }
        }

        info!("[Actor] connected; queue capacity {}", config.queue_capacity.max(1));
        Ok(ActorHandle {
            tx,
            stats,
            worker: Arc::new(Mutex::new(Some(worker))),
        })
    }

    fn run(mut self) {
        while let Ok(request) = self.rx.recv() {
            match request {
                Request::Send { outbound, reply } => {
                    let outcome = self.handle_send(outbound);
                    if reply.send(outcome).is_err() {
                        debug!("[Actor] caller went away before reply");
                    }
                }
                Request::Ping { reply } => {
                    let _ = reply.send(());
                }
                Request::Shutdown { reply } => {
                    let outcome = self.close();
                    let _ = reply.send(outcome);
                    self.reject_pending();
                    return;
                }
            }
        }

        // Every handle dropped without an explicit shutdown.
        if let Err(e) = self.close() {
            warn!("[Actor] disconnect on drop failed: {}", e);
        }
    }

    fn handle_send(&mut self, outbound: Outbound) -> Result<BatchMessage> {
        let started = Instant::now();
        let outcome = self.round_trip(outbound);
        let latency_us = started.elapsed().as_micros() as u64;
        self.stats.record_round_trip(latency_us, outcome.is_ok());
        if let Err(e) = &outcome {
            warn!("[Actor] send failed after {}us: {}", latency_us, e);
        }
        outcome
    }

    fn round_trip(&mut self, outbound: Outbound) -> Result<BatchMessage> {
        let bytes = serialize(&outbound.into_message())?;
        let state = self.state.take().ok_or(ClientError::Closed)?;
        let (outcome, state) = self.transport.transmit(&bytes, state);
        // Keep whatever state came back, success or not.
        self.state = Some(state);
        parse_reply(&outcome?)
    }

    /// Disconnects at most once; later calls are no-ops.
    fn close(&mut self) -> Result<()> {
        match self.state.take() {
            Some(state) => {
                let outcome = self.transport.disconnect(state);
                info!("[Actor] terminated");
                outcome
            }
            None => Ok(()),
        }
    }

    fn reject_pending(&self) {
        for request in self.rx.try_iter() {
            self.stats.record_closed();
            match request {
                Request::Send { reply, .. } => {
                    let _ = reply.send(Err(ClientError::Closed));
                }
                Request::Shutdown { reply } => {
                    let _ = reply.send(Err(ClientError::Closed));
                }
                Request::Ping { .. } => {}
            }
        }
    }
}

/// Caller side. Cheap to clone; every clone feeds the same actor queue.
#[derive(Clone)]
pub struct ActorHandle {
    tx: Sender<Request>,
    stats: SharedStats,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ActorHandle {
    /// Sends one event and blocks until the collector has answered.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`send_event_async`](Self::send_event_async) there.
    pub fn send_event(&self, event: Event) -> Result<()> {
        self.call(Outbound::Event(event)).map(|_| ())
    }

    pub async fn send_event_async(&self, event: Event) -> Result<()> {
        self.call_async(Outbound::Event(event)).await.map(|_| ())
    }

    pub fn send_state(&self, state: Event) -> Result<()> {
        self.call(Outbound::State(state)).map(|_| ())
    }

    /// Runs a collector query and returns the matching events.
    pub fn query(&self, query: impl Into<String>) -> Result<Vec<WireEvent>> {
        self.call(Outbound::Query(query.into())).map(|reply| reply.events)
    }

    /// Round trip through the actor queue without touching the connection.
    pub fn ping(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Ping { reply })?;
        rx.blocking_recv().map_err(|_| ClientError::Closed)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Requests orderly termination and waits for the worker to exit.
    ///
    /// Requests queued ahead of the shutdown complete first; everything behind
    /// it fails with [`ClientError::Closed`]. Calling again returns `Closed`.
    pub fn shutdown(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Shutdown { reply })?;
        let outcome = rx.blocking_recv().map_err(|_| ClientError::Closed)?;
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                error!("[Actor] worker thread panicked");
            }
        }
        outcome
    }

    fn call(&self, outbound: Outbound) -> Result<BatchMessage> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Send { outbound, reply })?;
        self.await_reply(rx.blocking_recv())
    }

    async fn call_async(&self, outbound: Outbound) -> Result<BatchMessage> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Send { outbound, reply })?;
        self.await_reply(rx.await)
    }

    fn await_reply(
        &self,
        received: std::result::Result<Result<BatchMessage>, oneshot::error::RecvError>,
    ) -> Result<BatchMessage> {
        match received {
            Ok(outcome) => outcome,
            // Reply sender dropped unanswered: actor exited with our request queued.
            Err(_) => {
                self.stats.record_closed();
                Err(ClientError::Closed)
            }
        }
    }

    fn submit(&self, request: Request) -> Result<()> {
        self.tx.send(request).map_err(|_| {
            self.stats.record_closed();
            ClientError::Closed
        })
    }
}
