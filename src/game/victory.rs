//! Terminal-condition evaluation.

use serde::{Deserialize, Serialize};

use crate::game::faction::FactionId;
use crate::game::state::GameState;

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryReason {
    /// A unit ended the turn on the opposing headquarters.
    HqCapture,
    /// The opposing faction has no living units.
    Elimination,
    /// The turn limit was reached and the tiebreak metric decided it.
    TurnLimit,
}

/// The outcome of evaluating a state for terminal conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Verdict {
    /// The match continues.
    Ongoing,
    /// One faction won.
    Win {
        /// The winner.
        faction: FactionId,
        /// How it won.
        reason: VictoryReason,
    },
    /// Neither faction won.
    Draw {
        /// Why the match ended without a winner.
        reason: VictoryReason,
    },
}

/// Tiebreak metric applied when the turn limit is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryMetric {
    /// Compare living unit counts.
    #[default]
    UnitCount,
    /// Compare resource stockpiles.
    Resources,
}

/// Terminal-condition parameters for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryConfig {
    /// Matches end after this many completed turns.
    pub max_turns: u32,
    /// Tiebreak metric at the turn limit.
    pub metric: VictoryMetric,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        Self {
            max_turns: 50,
            metric: VictoryMetric::default(),
        }
    }
}

/// Evaluate the state after a resolved turn.
///
/// Conditions are checked in strict priority order: headquarters capture,
/// then elimination, then the turn limit. A condition achieved by both
/// factions on the same turn is a draw at that priority level, and lower
/// levels are never consulted.
#[must_use]
pub fn check_victory(state: &GameState, config: &VictoryConfig) -> Verdict {
    let capture = [
        holds_enemy_hq(state, FactionId::Alpha),
        holds_enemy_hq(state, FactionId::Beta),
    ];
    match capture {
        [true, true] => {
            return Verdict::Draw {
                reason: VictoryReason::HqCapture,
            };
        }
        [true, false] => {
            return Verdict::Win {
                faction: FactionId::Alpha,
                reason: VictoryReason::HqCapture,
            };
        }
        [false, true] => {
            return Verdict::Win {
                faction: FactionId::Beta,
                reason: VictoryReason::HqCapture,
            };
        }
        [false, false] => {}
    }

    let eliminated = [
        state.faction(FactionId::Alpha).is_eliminated(),
        state.faction(FactionId::Beta).is_eliminated(),
    ];
    match eliminated {
        [true, true] => {
            return Verdict::Draw {
                reason: VictoryReason::Elimination,
            };
        }
        [false, true] => {
            return Verdict::Win {
                faction: FactionId::Alpha,
                reason: VictoryReason::Elimination,
            };
        }
        [true, false] => {
            return Verdict::Win {
                faction: FactionId::Beta,
                reason: VictoryReason::Elimination,
            };
        }
        [false, false] => {}
    }

    // The resolver advances the counter after each completed turn, so the
    // limit is hit once `turn` passes it.
    if state.turn > config.max_turns {
        let scores = match config.metric {
            VictoryMetric::UnitCount => {
                let [a, b] = state.living_counts();
                [a as i64, b as i64]
            }
            VictoryMetric::Resources => [
                state.faction(FactionId::Alpha).resources,
                state.faction(FactionId::Beta).resources,
            ],
        };
        return match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Verdict::Win {
                faction: FactionId::Alpha,
                reason: VictoryReason::TurnLimit,
            },
            std::cmp::Ordering::Less => Verdict::Win {
                faction: FactionId::Beta,
                reason: VictoryReason::TurnLimit,
            },
            std::cmp::Ordering::Equal => Verdict::Draw {
                reason: VictoryReason::TurnLimit,
            },
        };
    }

    Verdict::Ongoing
}

/// Whether any living unit of `faction` stands on the opposing HQ.
fn holds_enemy_hq(state: &GameState, faction: FactionId) -> bool {
    let enemy_hq = state.faction(faction.opponent()).hq;
    state
        .faction(faction)
        .living_units()
        .any(|u| u.coord == enemy_hq)
}
