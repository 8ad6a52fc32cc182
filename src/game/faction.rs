//! Faction identity and per-faction state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::map::Coord;
use crate::game::unit::{Unit, UnitId};

/// One of the two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactionId {
    /// The first faction.
    Alpha,
    /// The second faction.
    Beta,
}

impl FactionId {
    /// Both factions, in canonical order.
    pub const BOTH: [FactionId; 2] = [FactionId::Alpha, FactionId::Beta];

    /// The opposing faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Alpha => Self::Beta,
            Self::Beta => Self::Alpha,
        }
    }

    /// Index into two-element per-faction arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Alpha => 0,
            Self::Beta => 1,
        }
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alpha => write!(f, "alpha"),
            Self::Beta => write!(f, "beta"),
        }
    }
}

/// Mutable state owned by a single faction.
///
/// The battle log and resource stockpile are faction-private: intel views
/// built for the opponent never contain them.
#[derive(Debug, Clone)]
pub struct FactionState {
    /// Faction identity.
    pub id: FactionId,
    /// Units owned by this faction, in creation order. Dead units are
    /// retained (with `alive == false`) for logging.
    pub units: Vec<Unit>,
    /// Fixed headquarters coordinate.
    pub hq: Coord,
    /// Fog-of-war visibility radius in cells (Chebyshev).
    pub visibility_range: u16,
    /// Resource stockpile.
    pub resources: i64,
    /// Append-only private battle log.
    pub log: Vec<String>,
}

impl FactionState {
    /// Create a faction with no units yet.
    #[must_use]
    pub fn new(id: FactionId, hq: Coord, visibility_range: u16, resources: i64) -> Self {
        Self {
            id,
            units: Vec::new(),
            hq,
            visibility_range,
            resources,
            log: Vec::new(),
        }
    }

    /// Append a line to the private battle log.
    pub fn record(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Iterate over this faction's living units.
    pub fn living_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(|u| u.alive)
    }

    /// Number of living units.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.living_units().count()
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Look up a unit by id, mutably.
    #[must_use]
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Whether this faction has been wiped out.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.living_count() == 0
    }
}
