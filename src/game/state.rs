//! Mutable world snapshot.

use crate::game::faction::{FactionId, FactionState};
use crate::game::map::{Coord, MapModel};
use crate::game::unit::{Unit, UnitId};

/// Complete world state for one match.
///
/// The state is exclusively owned by the match driver and passed by
/// reference into the engine components: intel building and validation
/// read it, only turn resolution mutates it.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The immutable terrain grid.
    pub map: MapModel,
    /// Both factions, indexed by [`FactionId::index`].
    pub factions: [FactionState; 2],
    /// Current turn number, starting at 1. Incremented exactly once per
    /// completed turn by the resolver.
    pub turn: u32,
}

impl GameState {
    /// Create a new game state at turn 1.
    #[must_use]
    pub fn new(map: MapModel, factions: [FactionState; 2]) -> Self {
        Self {
            map,
            factions,
            turn: 1,
        }
    }

    /// Get a faction's state.
    #[must_use]
    pub fn faction(&self, id: FactionId) -> &FactionState {
        &self.factions[id.index()]
    }

    /// Get a faction's state, mutably.
    #[must_use]
    pub fn faction_mut(&mut self, id: FactionId) -> &mut FactionState {
        &mut self.factions[id.index()]
    }

    /// Iterate over all living units of both factions.
    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.factions.iter().flat_map(FactionState::living_units)
    }

    /// The living unit occupying a coordinate, if any.
    ///
    /// Dead units never occupy cells.
    #[must_use]
    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        self.living_units().find(|u| u.coord == coord)
    }

    /// Whether any living unit occupies a coordinate.
    #[must_use]
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.unit_at(coord).is_some()
    }

    /// Look up a unit by id across both factions (living or dead).
    #[must_use]
    pub fn find_unit(&self, id: UnitId) -> Option<&Unit> {
        self.factions.iter().find_map(|f| f.unit(id))
    }

    /// Look up a unit by id, mutably.
    #[must_use]
    pub fn find_unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.factions.iter_mut().find_map(|f| f.unit_mut(id))
    }

    /// Total living units per faction, in canonical order.
    #[must_use]
    pub fn living_counts(&self) -> [usize; 2] {
        [
            self.factions[0].living_count(),
            self.factions[1].living_count(),
        ]
    }

    /// Advance the turn counter. Called once per completed turn.
    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }
}
