// Connection side: the transport seam and the single-owner actor driving it.

pub mod transport;
pub mod actor;

pub use actor::{ActorHandle, ConnectionActor};
pub use transport::{TcpTransport, Transport};
