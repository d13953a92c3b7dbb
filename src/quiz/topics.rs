//! Topic and destination builders.
//!
//! Broadcast topics follow `/topic/<channel>/<poll-id>`, publish targets
//! follow `/app/<action>/<poll-id>`. The session itself treats both as
//! opaque strings.

/// Broadcast topic carrying presenter-facing events for a poll.
pub fn admin_topic(poll_id: &str) -> String {
    format!("/topic/admin/{poll_id}")
}

/// Destination that asks the broker to start the quiz.
pub fn start_request_destination(poll_id: &str) -> String {
    format!("/app/start_request/{poll_id}")
}

/// Destination that advances the quiz to the next question.
pub fn proceed_destination(poll_id: &str) -> String {
    format!("/app/proceed/{poll_id}")
}

/// Destination a player joins a poll through.
pub fn join_destination(poll_id: &str) -> String {
    format!("/app/join/{poll_id}")
}

/// Destination a player submits answers to.
pub fn answer_destination(poll_id: &str) -> String {
    format!("/app/answer/{poll_id}")
}
