//! # quizwire
//!
//! `quizwire` is the realtime messaging client of the QuizWhiz quiz platform.
//! It maintains one logical session to the quiz message broker over a
//! reconnecting WebSocket, and exposes a small pub/sub facade: connect,
//! disconnect, topic subscription with per-subscription callbacks, and
//! message publish.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `session`: The session facade — connection lifecycle, subscription registry, publish.
//! - `transport`: The wire frame vocabulary and the reconnecting socket worker.
//! - `quiz`: Typed quiz payloads and topic builders used by presenter and player callers.
//! - `auth`: Explicit credentials carried by the session instead of ambient state.
//! - `config`: Handles loading and managing client configuration.
//! - `utils`: Contains shared utilities, such as error handling and logging setup.

pub mod auth;
pub mod config;
pub mod quiz;
pub mod session;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;
