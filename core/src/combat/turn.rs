use log::debug;
use serde::{Deserialize, Serialize};

/// Whose turn it is, over an ordered list of `len` combatants. The list
/// itself lives elsewhere; every transition takes its current length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub round: u32,
    pub current_turn: usize,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            round: 1,
            current_turn: 0,
        }
    }
}

impl TurnState {
    pub fn next_turn(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.current_turn = (self.current_turn + 1) % len;
        if self.current_turn == 0 {
            self.round += 1;
        }
        debug!("Round {}, turn {}", self.round, self.current_turn);
    }

    /// Round never drops below 1.
    pub fn previous_turn(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.current_turn == 0 {
            self.current_turn = len - 1;
            self.round = self.round.saturating_sub(1).max(1);
        } else {
            self.current_turn -= 1;
        }
        debug!("Round {}, turn {}", self.round, self.current_turn);
    }

    pub fn next_round(&mut self) {
        self.round += 1;
        self.current_turn = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keeps the pointer valid after the combatant at `removed` was taken
    /// out of a list that now has `len` entries. Entries before the pointer
    /// shift it down so the same combatant keeps acting; removing the acting
    /// combatant hands the turn to whoever slid into its slot, wrapping to
    /// the top without changing the round.
    pub fn on_removed(&mut self, removed: usize, len: usize) {
        if removed < self.current_turn {
            self.current_turn -= 1;
        }
        if self.current_turn >= len {
            self.current_turn = 0;
        }
        debug!("Turn pointer clamped to {}", self.current_turn);
    }
}
