use std::collections::HashMap;

use crate::quiz::events::UserScore;

/// One leaderboard row shown on the presenter dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStanding {
    pub id: String,
    pub name: String,
    pub score: i64,
    pub change: i64,
}

/// Presenter-side leaderboard state.
///
/// Each applied scoreboard replaces the standings; `change` carries the
/// delta against the player's previous score so the dashboard can highlight
/// movement between questions.
#[derive(Debug, Default)]
pub struct Leaderboard {
    standings: Vec<PlayerStanding>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standings(&self) -> &[PlayerStanding] {
        &self.standings
    }

    /// Replaces the standings with a fresh scoreboard from the admin topic.
    ///
    /// Players absent from the previous board start from a zero baseline,
    /// so their first delta equals their full score.
    pub fn apply(&mut self, scoreboard: &[UserScore]) {
        let mut previous = HashMap::new();
        for standing in &self.standings {
            previous.insert(standing.name.clone(), standing.score);
        }

        self.standings = scoreboard
            .iter()
            .map(|entry| {
                let old = previous.get(&entry.user_name).copied().unwrap_or(0);
                PlayerStanding {
                    id: entry.user_name.clone(),
                    name: entry.user_name.clone(),
                    score: entry.score,
                    change: entry.score - old,
                }
            })
            .collect();
    }

    /// Clears the per-update deltas. The presenter does this before
    /// advancing the quiz so the next scoreboard starts from a clean slate.
    pub fn reset_changes(&mut self) {
        for standing in &mut self.standings {
            standing.change = 0;
        }
    }
}
