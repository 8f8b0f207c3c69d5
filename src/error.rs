//! error.rs
//! Failure taxonomy for the client: connect, encode, transmit, reply, lifecycle.
//!
//! - Connect failures are fatal to actor startup.
//! - Every other kind is reported to the one caller whose request hit it; the actor keeps running.

use std::io;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport could not be established (actor never starts).
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Transport release failed during orderly shutdown.
    #[error("failed to disconnect: {0}")]
    Disconnect(#[source] io::Error),

    /// Writing the request or reading the reply failed.
    #[error("transmit failed: {0}")]
    Transmit(#[from] io::Error),

    #[error("encode failed: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("reply decode failed: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Collector answered with `ok = false`.
    #[error("collector rejected message: {0}")]
    Rejected(String),

    #[error("frame of {len} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { len: usize, max: usize },

    /// Actor has shut down (or is shutting down) and no longer accepts requests.
    #[error("connection actor is closed")]
    Closed,
}

impl ClientError {
    /// Only a connect failure leaves the client unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::Connect { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_error_names_address() {
        let err = ClientError::Connect {
            addr: "localhost:5555".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        let display = err.to_string();
        assert!(display.contains("localhost:5555"), "missing addr: {}", display);
        assert!(display.contains("refused"), "missing source: {}", display);
        assert!(err.is_fatal());
    }

    #[test]
    fn transmit_error_is_not_fatal() {
        let err: ClientError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe gone").into();
        assert!(matches!(err, ClientError::Transmit(_)));
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("pipe gone"));
    }

    #[test]
    fn rejected_keeps_reason_verbatim() {
        let err = ClientError::Rejected("parse error: bad ttl".to_string());
        assert!(err.to_string().contains("parse error: bad ttl"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn frame_too_large_includes_sizes() {
        let err = ClientError::FrameTooLarge { len: 2048, max: 1024 };
        let display = err.to_string();
        assert!(display.contains("2048"));
        assert!(display.contains("1024"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
    }
}
