//! The `transport` module carries the wire protocol.
//!
//! `frame` defines the JSON frame vocabulary exchanged with the broker;
//! `socket` runs the reconnecting WebSocket worker that owns the stream.

pub mod frame;
pub(crate) mod socket;
