//! Score ledger fed by the end-of-match event.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::LEADERBOARD_CAPACITY;

/// Names of the two contenders of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: String,
    pub loser: String,
}

/// Anything that wants to hear about finished matches.
pub trait ScoreLedger {
    fn record(&mut self, outcome: &MatchOutcome);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

/// In-memory win/loss table, best players first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries ordered by wins (descending), then losses (ascending).
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    fn entry_mut(&mut self, name: &str) -> &mut ScoreEntry {
        let index = match self.entries.iter().position(|e| e.name == name) {
            Some(index) => index,
            None => {
                self.entries.push(ScoreEntry {
                    name: name.to_string(),
                    wins: 0,
                    losses: 0,
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }
}

impl ScoreLedger for Leaderboard {
    /// Credit the winner, debit the loser, then re-rank and keep only the top
    /// `LEADERBOARD_CAPACITY` entries. Players pushed off the table start
    /// from zero if they return.
    fn record(&mut self, outcome: &MatchOutcome) {
        self.entry_mut(&outcome.winner).wins += 1;
        self.entry_mut(&outcome.loser).losses += 1;
        // Stable sort keeps earlier entries ahead on ties.
        self.entries
            .sort_by(|a, b| b.wins.cmp(&a.wins).then(a.losses.cmp(&b.losses)));
        self.entries.truncate(LEADERBOARD_CAPACITY);
        info!("recorded win for {} over {}", outcome.winner, outcome.loser);
    }
}
