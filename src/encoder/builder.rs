//! builder.rs
//! Event/state → wire record → batch message → bytes.
//!
//! Pure transformations; no I/O. Fields outside the vocabulary, and vocabulary
//! fields supplied with the wrong kind, are dropped without error.

use prost::Message;
use log::debug;

use crate::encoder::{
    event::{self as field, Event, FieldValue, Metric},
    wire::{Attribute, BatchMessage, Entity, Query, WireEvent, WireState},
};
use crate::error::{ClientError, Result};

/// Builds the canonical wire record for one event.
///
/// Metric slots are chosen by the kind the metric was supplied as:
/// - absent → `metric_f = 0.0`, `metric_sint64 = 0`
/// - integer V → `metric_f = V`, `metric_sint64 = V`
/// - float V → `metric_f = V`, `metric_d = V`
pub fn build_event(event: &Event) -> WireEvent {
    let mut wire = WireEvent {
        time: int_field(event, field::TIME),
        state: text_field(event, field::STATE),
        service: text_field(event, field::SERVICE),
        host: text_field(event, field::HOST),
        description: text_field(event, field::DESCRIPTION),
        tags: tags_field(event),
        ttl: ttl_field(event),
        attributes: attributes_field(event),
        ..Default::default()
    };

    match event.metric() {
        Metric::Absent => {
            wire.metric_f = Some(0.0);
            wire.metric_sint64 = Some(0);
        }
        Metric::Int(v) => {
            wire.metric_f = Some(v as f32);
            wire.metric_sint64 = Some(v);
        }
        Metric::Float(v) => {
            wire.metric_f = Some(v as f32);
            wire.metric_d = Some(v);
        }
    }

    wire
}

/// Builds a state record from the same field vocabulary plus `once`.
pub fn build_state(state: &Event) -> WireState {
    WireState {
        time: int_field(state, field::TIME),
        state: text_field(state, field::STATE),
        service: text_field(state, field::SERVICE),
        host: text_field(state, field::HOST),
        description: text_field(state, field::DESCRIPTION),
        once: state.get(field::ONCE).and_then(FieldValue::as_bool),
        tags: tags_field(state),
        ttl: ttl_field(state),
    }
}

/// Stable partition of entities into the events and states sequences.
pub fn build_message(entities: Vec<Entity>) -> BatchMessage {
    let mut message = BatchMessage::default();
    for entity in entities {
        match entity {
            Entity::Event(e) => message.events.push(e),
            Entity::State(s) => message.states.push(s),
        }
    }
    message
}

pub fn build_query(query: &str) -> BatchMessage {
    BatchMessage {
        query: Some(Query {
            string: Some(query.to_string()),
        }),
        ..Default::default()
    }
}

/// Encodes a message into one contiguous buffer.
pub fn serialize(message: &BatchMessage) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(message.encoded_len());
    message.encode(&mut buf)?;
    Ok(buf)
}

/// Decodes a collector reply; `ok = false` becomes [`ClientError::Rejected`].
pub fn parse_reply(bytes: &[u8]) -> Result<BatchMessage> {
    let reply = BatchMessage::decode(bytes)?;
    if reply.ok == Some(false) {
        let reason = reply.error.clone().unwrap_or_default();
        return Err(ClientError::Rejected(reason));
    }
    Ok(reply)
}

// ============================================================================
// Field extraction: wrong-kind values read as absent
// ============================================================================

fn int_field(event: &Event, key: &str) -> Option<i64> {
    let value = event.get(key)?;
    let int = value.as_int();
    if int.is_none() {
        debug!("[Encoder] dropping '{}': expected integer, got {:?}", key, value);
    }
    int
}

fn text_field(event: &Event, key: &str) -> Option<String> {
    let value = event.get(key)?;
    match value.as_text() {
        Some(s) => Some(s.to_string()),
        None => {
            debug!("[Encoder] dropping '{}': expected text, got {:?}", key, value);
            None
        }
    }
}

fn tags_field(event: &Event) -> Vec<String> {
    event
        .get(field::TAGS)
        .and_then(FieldValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

fn ttl_field(event: &Event) -> Option<f32> {
    event.get(field::TTL).and_then(FieldValue::as_f64).map(|ttl| ttl as f32)
}

fn attributes_field(event: &Event) -> Vec<Attribute> {
    event
        .get(field::ATTRIBUTES)
        .and_then(FieldValue::as_map)
        .map(|map| {
            map.iter()
                .map(|(key, value)| Attribute {
                    key: key.clone(),
                    value: Some(value.clone()),
                })
                .collect()
        })
        .unwrap_or_default()
}
