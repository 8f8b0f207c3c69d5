//! # Riemann client
//!
//! Converts monitoring events into the collector's protobuf wire format and sends them
//! one at a time over a single persistent connection.
//!
//! ## Layout
//! - **encoder:** event attribute set → `WireEvent` → single-entity `BatchMessage` → bytes.
//! - **connection:** `Transport` seam (TCP, length-prefixed frames) and the
//!   `ConnectionActor` worker that owns the connection and serializes all callers.
//! - **utils:** configuration, send statistics, CSV export.
//!
//! ## Concurrency
//! - Exactly one request in flight per connection; overlapping callers queue on a
//!   bounded channel and each blocks (or awaits) its own reply.
//! - No timeouts in the core; `ClientConfig::io_timeout` bounds socket I/O only.

pub mod error;
pub mod encoder;
pub mod connection;
pub mod utils;

pub use connection::{ActorHandle, ConnectionActor, TcpTransport, Transport};
pub use encoder::{Event, FieldValue, Metric, WireEvent};
pub use error::{ClientError, Result};
pub use utils::config::ClientConfig;

/// Connects over TCP using `config` and starts the connection actor.
pub fn connect(config: &ClientConfig) -> Result<ActorHandle> {
    ConnectionActor::spawn(TcpTransport::new(config), config)
}
