use serde::{Deserialize, Serialize};

/// A quiz question as broadcast to players.
///
/// Field names follow the platform wire format, which mixes snake case with
/// one camel case time field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollQuestion {
    pub question_id: String,
    pub question_content: String,
    pub options: Vec<String>,
    #[serde(rename = "timeInSeconds")]
    pub time_in_seconds: u32,
    pub correct_option: usize,
    pub points: u32,
}

impl PollQuestion {
    /// True when `option` is the index of the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}
