//! Faction-scoped intel views (fog of war).
//!
//! [`build_intel`] is the only thing the external agent ever sees. It is a
//! pure function of the game state: no side effects, deterministic output,
//! and nothing faction-private from the opponent (resources, battle log,
//! out-of-range units) ever crosses the boundary.

use serde::{Deserialize, Serialize};

use crate::game::faction::FactionId;
use crate::game::map::{Coord, Terrain};
use crate::game::state::GameState;
use crate::game::unit::{Unit, UnitId};

/// What a faction knows about one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitIntel {
    /// Unit identifier.
    pub id: UnitId,
    /// Position.
    pub coord: Coord,
    /// Current health.
    pub hp: i32,
}

impl From<&Unit> for UnitIntel {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            coord: unit.coord,
            hp: unit.hp,
        }
    }
}

/// The sanitized, faction-scoped snapshot handed to the external agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelReport {
    /// Current turn number.
    pub turn: u32,
    /// The requesting faction.
    pub faction: FactionId,
    /// All of the requester's own living units.
    pub own_units: Vec<UnitIntel>,
    /// Enemy units within visibility range of at least one living own unit.
    pub visible_enemy_units: Vec<UnitIntel>,
    /// The full terrain grid, row-major. Terrain is never hidden.
    pub terrain: Vec<Vec<Terrain>>,
    /// The requester's headquarters.
    pub own_hq: Coord,
    /// The opposing headquarters. HQ locations are public knowledge.
    pub enemy_hq: Coord,
    /// The requester's own resource stockpile.
    pub own_resources: i64,
}

/// Build the fog-of-war-limited view of the world for one faction.
///
/// An enemy unit is visible when it lies within the requester's
/// visibility range (Chebyshev distance) of at least one living own unit.
/// Dead units on either side never appear. Unit lists are sorted by id so
/// the output is reproducible for a given state.
#[must_use]
pub fn build_intel(state: &GameState, faction: FactionId) -> IntelReport {
    let own = state.faction(faction);
    let enemy = state.faction(faction.opponent());

    let mut own_units: Vec<UnitIntel> = own.living_units().map(UnitIntel::from).collect();
    own_units.sort_by_key(|u| u.id);

    let range = own.visibility_range;
    let mut visible_enemy_units: Vec<UnitIntel> = enemy
        .living_units()
        .filter(|enemy_unit| {
            own.living_units()
                .any(|own_unit| own_unit.coord.chebyshev_distance(enemy_unit.coord) <= range)
        })
        .map(UnitIntel::from)
        .collect();
    visible_enemy_units.sort_by_key(|u| u.id);

    IntelReport {
        turn: state.turn,
        faction,
        own_units,
        visible_enemy_units,
        terrain: state.map.terrain_rows(),
        own_hq: own.hq,
        enemy_hq: enemy.hq,
        own_resources: own.resources,
    }
}
