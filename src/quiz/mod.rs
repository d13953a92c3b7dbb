//! The `quiz` module is the caller-side vocabulary of the quiz platform.
//!
//! The session treats every payload as an opaque string; presenter and
//! player code use these types to build topic paths and to encode or decode
//! the payloads that travel over them.

pub mod events;
pub mod leaderboard;
pub mod question;
pub mod topics;

pub use events::{AdminEvent, AnswerSubmission, UserScore};
pub use leaderboard::{Leaderboard, PlayerStanding};
pub use question::PollQuestion;
