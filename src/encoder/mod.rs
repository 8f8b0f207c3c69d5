// Encoder: event attribute sets → collector wire records → bytes.
// Pure and stateless; the connection actor calls into it for every request.

pub mod event;
pub mod wire;
pub mod builder;

pub use builder::{build_event, build_message, build_query, build_state, parse_reply, serialize};
pub use event::{Event, FieldValue, Metric};
pub use wire::{Attribute, BatchMessage, Entity, Query, WireEvent, WireState};
