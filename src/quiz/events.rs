use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the scoreboard broadcast on the admin topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserScore {
    pub user_name: String,
    pub score: i64,
}

/// Payload a player submits after answering a question.
///
/// Field names follow the platform wire format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerSubmission {
    #[serde(rename = "playerId")]
    pub player_id: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// Generates a player identity for one game session.
pub fn generate_player_id() -> String {
    format!("player-{}", Uuid::new_v4())
}

/// Events broadcast to the presenter on the admin topic.
///
/// The broker reuses a single topic for all presenter traffic; the payload
/// shape decides the event. An empty payload means the quiz is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminEvent {
    ScoreboardUpdate(Vec<UserScore>),
    QuestionAdvance(u32),
    Finished,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAdminMessage {
    Scoreboard { scoreboard: Vec<UserScore> },
    Question { question_number: u32 },
    Status { status: String },
}

impl AdminEvent {
    /// Decodes an admin topic payload.
    ///
    /// Returns `Ok(None)` for well-formed payloads that carry no presenter
    /// event, such as an unknown status. Empty payloads decode to
    /// [`AdminEvent::Finished`].
    pub fn decode(payload: &str) -> Result<Option<AdminEvent>, serde_json::Error> {
        if payload.trim().is_empty() {
            return Ok(Some(AdminEvent::Finished));
        }

        let raw: RawAdminMessage = serde_json::from_str(payload)?;
        Ok(match raw {
            RawAdminMessage::Scoreboard { scoreboard } => {
                Some(AdminEvent::ScoreboardUpdate(scoreboard))
            }
            RawAdminMessage::Question { question_number } => {
                Some(AdminEvent::QuestionAdvance(question_number))
            }
            RawAdminMessage::Status { status } if status == "finished" => {
                Some(AdminEvent::Finished)
            }
            RawAdminMessage::Status { .. } => None,
        })
    }
}
