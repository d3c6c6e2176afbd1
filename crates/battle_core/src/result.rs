//! The immutable record of a finished match.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::reward::Achievement;
use crate::unit::{Side, UnitId};
use crate::victory::VictoryReason;

/// A value kept for each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// Player's value.
    pub player: T,
    /// Opponent's value.
    pub opponent: T,
}

impl<T: Copy> PerSide<T> {
    /// Value for `side`.
    #[must_use]
    pub fn get(&self, side: Side) -> T {
        match side {
            Side::Player => self.player,
            Side::Opponent => self.opponent,
        }
    }
}

/// Outcome of a match, produced once when it ends.
///
/// This is the only artifact handed to persistence. Its binary encoding is
/// stable, so stored results can be re-evaluated later (for example to
/// audit a ticket payout with [`calculate_reward`](crate::reward::calculate_reward)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Winning side.
    pub winner: Side,
    /// Deciding rule.
    pub reason: VictoryReason,
    /// Player units lost, in death order (deployment order on forfeit).
    pub player_units_lost: Vec<UnitId>,
    /// Opponent units lost, same ordering rules.
    pub opponent_units_lost: Vec<UnitId>,
    /// Simulated combat time until the decision.
    pub duration_ms: u64,
    /// Damage dealt by each side.
    pub damage_dealt: PerSide<u64>,
    /// Enemy units killed by each side.
    pub kills: PerSide<u32>,
    /// Side that scored the first kill.
    pub first_kill: Option<Side>,
    /// Player achievements unlocked.
    pub achievements: Vec<Achievement>,
    /// Tickets paid to the player.
    pub tickets_earned: u32,
}

impl MatchResult {
    /// Whether the player won.
    #[must_use]
    pub fn player_won(&self) -> bool {
        self.winner == Side::Player
    }

    /// Units `side` lost.
    #[must_use]
    pub fn units_lost(&self, side: Side) -> &[UnitId] {
        match side {
            Side::Player => &self.player_units_lost,
            Side::Opponent => &self.opponent_units_lost,
        }
    }

    /// Encode for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| {
            BattleError::Serialization(format!("Failed to serialize match result: {}", e))
        })
    }

    /// Decode a stored result.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid encoded result.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| {
            BattleError::Serialization(format!("Failed to deserialize match result: {}", e))
        })
    }
}
