//! Unit state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::faction::FactionId;
use crate::game::map::Coord;

/// Unique identifier for a unit, stable for the whole match.
///
/// Serializes transparently as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.0)
    }
}

/// A single unit on the board.
///
/// Units exist from initialization to the end of the match. A unit whose
/// health reaches zero becomes not-alive: it stops occupying its cell and
/// is excluded from visibility and combat, but stays in its faction's unit
/// list for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Unique identifier.
    pub id: UnitId,
    /// Owning faction.
    pub faction: FactionId,
    /// Current position.
    pub coord: Coord,
    /// Current health, within `[0, max_hp]`.
    pub hp: i32,
    /// Whether the unit is still on the board.
    pub alive: bool,
}

impl Unit {
    /// Create a new living unit at full health.
    #[must_use]
    pub const fn new(id: UnitId, faction: FactionId, coord: Coord, max_hp: i32) -> Self {
        Self {
            id,
            faction,
            coord,
            hp: max_hp,
            alive: true,
        }
    }

    /// Apply damage. The unit dies when health drops to zero or below.
    pub fn take_damage(&mut self, damage: i32) {
        self.hp -= damage;
        if self.hp <= 0 {
            self.hp = 0;
            self.alive = false;
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_creation() {
        let unit = Unit::new(UnitId(1), FactionId::Alpha, Coord::new(2, 3), 10);
        assert!(unit.alive);
        assert_eq!(unit.hp, 10);
        assert_eq!(unit.coord, Coord::new(2, 3));
    }

    #[test]
    fn test_take_damage_survives() {
        let mut unit = Unit::new(UnitId(1), FactionId::Alpha, Coord::new(0, 0), 10);
        unit.take_damage(5);
        assert!(unit.alive);
        assert_eq!(unit.hp, 5);
    }

    #[test]
    fn test_take_damage_dies_and_clamps() {
        let mut unit = Unit::new(UnitId(1), FactionId::Beta, Coord::new(0, 0), 10);
        unit.take_damage(15);
        assert!(!unit.alive);
        assert_eq!(unit.hp, 0);
    }

    #[test]
    fn test_take_damage_exactly_lethal() {
        let mut unit = Unit::new(UnitId(1), FactionId::Beta, Coord::new(0, 0), 10);
        unit.take_damage(10);
        assert!(!unit.alive);
        assert_eq!(unit.hp, 0);
    }
}
