//! The `session` module is the caller-facing pub/sub facade.
//!
//! A [`Session`] manages one logical connection to the quiz broker. The
//! socket itself lives in a background worker (`transport::socket`); this
//! module owns the connection state, the subscription registry, and the
//! lifecycle hooks reported back to the caller.

pub(crate) mod client;
mod state;
pub(crate) mod subscription;

pub use client::{Session, SessionConfig, SessionHooks};
pub use state::ConnectionState;
pub use subscription::Subscription;
