//! wire.rs
//! Collector wire schema: protobuf records declared with prost derive.
//!
//! Field tags match the collector's `proto.proto`. Only the fields this client
//! populates or reads back are declared; prost skips unknown tags on decode.

/// Top-level message: one per transmission, one per reply.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchMessage {
    #[prost(bool, optional, tag = "2")]
    pub ok: Option<bool>,
    #[prost(string, optional, tag = "3")]
    pub error: Option<String>,
    #[prost(message, repeated, tag = "4")]
    pub states: Vec<WireState>,
    #[prost(message, optional, tag = "5")]
    pub query: Option<Query>,
    #[prost(message, repeated, tag = "6")]
    pub events: Vec<WireEvent>,
}

/// Canonical event record.
///
/// Metric slots: `metric_f` always mirrors the metric (0.0 when absent);
/// at most one of `metric_sint64` / `metric_d` is set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireEvent {
    #[prost(int64, optional, tag = "1")]
    pub time: Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub state: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub service: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub host: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub description: Option<String>,
    #[prost(string, repeated, tag = "7")]
    pub tags: Vec<String>,
    #[prost(float, optional, tag = "8")]
    pub ttl: Option<f32>,
    #[prost(message, repeated, tag = "9")]
    pub attributes: Vec<Attribute>,
    #[prost(int64, optional, tag = "10")]
    pub time_micros: Option<i64>,
    #[prost(sint64, optional, tag = "13")]
    pub metric_sint64: Option<i64>,
    #[prost(double, optional, tag = "14")]
    pub metric_d: Option<f64>,
    #[prost(float, optional, tag = "15")]
    pub metric_f: Option<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WireState {
    #[prost(int64, optional, tag = "1")]
    pub time: Option<i64>,
    #[prost(string, optional, tag = "2")]
    pub state: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub service: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub host: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub description: Option<String>,
    #[prost(bool, optional, tag = "6")]
    pub once: Option<bool>,
    #[prost(string, repeated, tag = "7")]
    pub tags: Vec<String>,
    #[prost(float, optional, tag = "8")]
    pub ttl: Option<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    #[prost(string, required, tag = "1")]
    pub key: String,
    #[prost(string, optional, tag = "2")]
    pub value: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(string, optional, tag = "1")]
    pub string: Option<String>,
}

/// A wire entity before partitioning into a [`BatchMessage`].
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Event(WireEvent),
    State(WireState),
}

impl From<WireEvent> for Entity {
    fn from(event: WireEvent) -> Self {
        Entity::Event(event)
    }
}

impl From<WireState> for Entity {
    fn from(state: WireState) -> Self {
        Entity::State(state)
    }
}
