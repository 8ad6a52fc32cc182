//! World-state consistency checks.
//!
//! The resolver asserts these after every turn in debug builds. Release
//! builds skip them; the checks are also callable directly from tests.

use std::collections::HashMap;

use crate::game::map::Coord;
use crate::game::state::GameState;
use crate::game::unit::UnitId;

/// A single detected inconsistency, described for humans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Human-readable description of what is wrong.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check every world invariant, returning all violations found.
///
/// Checked:
/// - no two living units share a cell
/// - every living unit stands in bounds on passable terrain
/// - every unit's health lies within `[0, max_hp]`
/// - `alive` agrees with health (alive iff hp > 0)
#[must_use]
pub fn check_invariants(state: &GameState, max_hp: i32) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut occupancy: HashMap<Coord, UnitId> = HashMap::new();
    for unit in state.living_units() {
        if let Some(&other) = occupancy.get(&unit.coord) {
            violations.push(InvariantViolation::new(format!(
                "units {other} and {} both occupy ({},{})",
                unit.id, unit.coord.x, unit.coord.y
            )));
        } else {
            occupancy.insert(unit.coord, unit.id);
        }

        if !state.map.in_bounds(unit.coord) {
            violations.push(InvariantViolation::new(format!(
                "unit {} out of bounds at ({},{})",
                unit.id, unit.coord.x, unit.coord.y
            )));
        } else if !state.map.is_passable(unit.coord) {
            violations.push(InvariantViolation::new(format!(
                "unit {} on impassable terrain at ({},{})",
                unit.id, unit.coord.x, unit.coord.y
            )));
        }
    }

    for faction in &state.factions {
        for unit in &faction.units {
            if unit.hp < 0 || unit.hp > max_hp {
                violations.push(InvariantViolation::new(format!(
                    "unit {} health {} outside [0, {max_hp}]",
                    unit.id, unit.hp
                )));
            }
            if unit.alive != (unit.hp > 0) {
                violations.push(InvariantViolation::new(format!(
                    "unit {} alive flag disagrees with health {}",
                    unit.id, unit.hp
                )));
            }
        }
    }

    violations
}

/// Panic on any invariant violation. Compiled out of release builds.
#[inline]
pub fn assert_invariants(state: &GameState, max_hp: i32) {
    if cfg!(debug_assertions) {
        let violations = check_invariants(state, max_hp);
        assert!(
            violations.is_empty(),
            "world invariants violated on turn {}: {:?}",
            state.turn,
            violations
        );
    }
}
