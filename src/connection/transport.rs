//! transport.rs
//! Transport seam of the connection actor: connect, disconnect, transmit.
//!
//! - `transmit` always hands the connection state back, whatever the outcome;
//!   the actor stores it for the next call.
//! - `TcpTransport` frames each message with a 4-byte big-endian length prefix
//!   and reads one framed reply per request. No reconnect, no TLS.
//! - Once a frame exchange has started, any failure poisons the connection: the
//!   stream may hold a partial reply, so it is shut down and every later transmit
//!   fails without touching the socket.

use std::{
    io::{self, Read, Write},
    net::{Shutdown, TcpStream},
    time::Duration,
};
use log::{info, warn};

use crate::error::{ClientError, Result};
use crate::utils::config::ClientConfig;

/// External connection collaborator driven by the actor.
///
/// `State` is owned exclusively by the actor thread and never shared.
pub trait Transport: Send + 'static {
    type State: Send + 'static;

    fn connect(&mut self) -> Result<Self::State>;

    fn disconnect(&mut self, state: Self::State) -> Result<()>;

    /// Sends one encoded message and waits for the raw reply bytes.
    fn transmit(&mut self, bytes: &[u8], state: Self::State) -> (Result<Vec<u8>>, Self::State);
}

pub struct TcpTransport {
    addr: String,
    io_timeout: Option<Duration>,
    max_frame_len: usize,
}

impl TcpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            addr: config.addr(),
            io_timeout: config.io_timeout,
            max_frame_len: config.max_frame_len,
        }
    }

    fn exchange(&self, len: u32, bytes: &[u8], stream: &mut TcpStream) -> Result<Vec<u8>> {
        // 1. Write length prefix + payload
        stream.write_all(&len.to_be_bytes())?;
        stream.write_all(bytes)?;
        stream.flush()?;

        // 2. Read framed reply
        let mut prefix = [0u8; 4];
        stream.read_exact(&mut prefix)?;
        let reply_len = u32::from_be_bytes(prefix) as usize;
        if reply_len > self.max_frame_len {
            return Err(ClientError::FrameTooLarge {
                len: reply_len,
                max: self.max_frame_len,
            });
        }
        let mut reply = vec![0u8; reply_len];
        stream.read_exact(&mut reply)?;
        Ok(reply)
    }
}

/// Connection state owned by the actor between transmits.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    poisoned: bool,
}

impl TcpConnection {
    /// True once a failed exchange has left the stream out of frame sync.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    fn poison(&mut self) {
        self.poisoned = true;
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

impl Transport for TcpTransport {
    type State = TcpConnection;

    fn connect(&mut self) -> Result<TcpConnection> {
        let connect_err = |source: io::Error| ClientError::Connect {
            addr: self.addr.clone(),
            source,
        };
        let stream = TcpStream::connect(&self.addr).map_err(connect_err)?;
        stream.set_nodelay(true).map_err(connect_err)?;
        stream.set_read_timeout(self.io_timeout).map_err(connect_err)?;
        stream.set_write_timeout(self.io_timeout).map_err(connect_err)?;
        info!("[Transport] connected to {}", self.addr);
        Ok(TcpConnection {
            stream,
            poisoned: false,
        })
    }

    fn disconnect(&mut self, conn: TcpConnection) -> Result<()> {
        if conn.poisoned {
            info!("[Transport] released poisoned connection to {}", self.addr);
            return Ok(());
        }
        match conn.stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            // Peer already gone: nothing left to release.
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => return Err(ClientError::Disconnect(e)),
        }
        info!("[Transport] disconnected from {}", self.addr);
        Ok(())
    }

    fn transmit(
        &mut self,
        bytes: &[u8],
        mut conn: TcpConnection,
    ) -> (Result<Vec<u8>>, TcpConnection) {
        if conn.poisoned {
            let err = io::Error::new(
                io::ErrorKind::NotConnected,
                "connection poisoned by earlier failure",
            );
            return (Err(err.into()), conn);
        }

        // Oversized requests are refused before anything reaches the socket.
        let len = match u32::try_from(bytes.len()) {
            Ok(len) => len,
            Err(_) => {
                let err = ClientError::FrameTooLarge {
                    len: bytes.len(),
                    max: u32::MAX as usize,
                };
                return (Err(err), conn);
            }
        };

        let outcome = self.exchange(len, bytes, &mut conn.stream);
        if let Err(e) = &outcome {
            warn!(
                "[Transport] exchange with {} failed, poisoning connection: {}",
                self.addr, e
            );
            conn.poison();
        }
        (outcome, conn)
    }
}
