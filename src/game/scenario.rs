//! Initial match setup.
//!
//! Builds the starting [`GameState`] from a scenario configuration and a
//! seed. The seed drives spawn placement only; everything after turn 1 is
//! a pure function of the state and the factions' orders.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::ConfigError;
use crate::game::faction::{FactionId, FactionState};
use crate::game::map::{Coord, MapModel};
use crate::game::state::GameState;
use crate::game::unit::{Unit, UnitId};

/// The built-in 10x10 map: two urban headquarters, water barriers, and
/// forest cover between them.
const DEFAULT_MAP: &str = "\
RRRRRRRRRR
RRRFFRRURR
RRFFRRRURR
WWRRRRRRRR
WWRRURRRRR
RURRRRRFFR
RRRRRRRFFR
RRWWRRRRRR
RRWWRRRRRR
RRRRRRRRRR";

const DEFAULT_ALPHA_HQ: Coord = Coord::new(1, 5);
const DEFAULT_BETA_HQ: Coord = Coord::new(7, 2);

/// How far from its headquarters a faction's units may spawn (Chebyshev).
const SPAWN_RADIUS: u16 = 2;

/// Parameters for the initial world.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Units spawned per faction.
    pub units_per_faction: u32,
    /// Maximum (and starting) health per unit.
    pub max_hp: i32,
    /// Fog-of-war visibility radius.
    pub visibility_range: u16,
    /// Starting resource stockpile per faction.
    pub starting_resources: i64,
    /// ASCII terrain grid overriding the built-in map.
    pub map: Option<String>,
    /// Headquarters override, `[alpha, beta]`. Required when `map` is set.
    pub headquarters: Option<[Coord; 2]>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            units_per_faction: 3,
            max_hp: 10,
            visibility_range: 2,
            starting_resources: 100,
            map: None,
            headquarters: None,
        }
    }
}

/// Build the starting state for a match.
///
/// Each faction's units spawn on distinct passable cells within
/// [`SPAWN_RADIUS`] of its headquarters, chosen by a seeded shuffle.
/// The same config and seed always produce the same starting state.
pub fn build(config: &ScenarioConfig, seed: u64) -> Result<GameState, ConfigError> {
    let map = match &config.map {
        Some(ascii) => MapModel::from_ascii(ascii)?,
        None => MapModel::from_ascii(DEFAULT_MAP)?,
    };
    let hqs = match (config.map.as_ref(), config.headquarters) {
        (_, Some(hqs)) => hqs,
        (None, None) => [DEFAULT_ALPHA_HQ, DEFAULT_BETA_HQ],
        (Some(_), None) => {
            return Err(ConfigError::BadHeadquarters {
                detail: "custom map requires headquarters coordinates".to_owned(),
            });
        }
    };
    for (faction, hq) in FactionId::BOTH.into_iter().zip(hqs) {
        if !map.in_bounds(hq) {
            return Err(ConfigError::BadHeadquarters {
                detail: format!("{faction} headquarters ({},{}) out of bounds", hq.x, hq.y),
            });
        }
        if !map.is_passable(hq) {
            return Err(ConfigError::BadHeadquarters {
                detail: format!("{faction} headquarters ({},{}) is impassable", hq.x, hq.y),
            });
        }
    }
    if hqs[0] == hqs[1] {
        return Err(ConfigError::BadHeadquarters {
            detail: "both factions share a headquarters cell".to_owned(),
        });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut factions = [
        FactionState::new(
            FactionId::Alpha,
            hqs[0],
            config.visibility_range,
            config.starting_resources,
        ),
        FactionState::new(
            FactionId::Beta,
            hqs[1],
            config.visibility_range,
            config.starting_resources,
        ),
    ];

    let mut next_id = 1;
    let mut taken: Vec<Coord> = Vec::new();
    for faction in &mut factions {
        let mut candidates: Vec<Coord> = map
            .iter()
            .filter(|&(coord, terrain)| {
                terrain.is_passable()
                    && coord.chebyshev_distance(faction.hq) <= SPAWN_RADIUS
                    && !taken.contains(&coord)
            })
            .map(|(coord, _)| coord)
            .collect();
        if (candidates.len() as u32) < config.units_per_faction {
            return Err(ConfigError::SpawnExhausted {
                faction: faction.id.to_string(),
            });
        }
        candidates.shuffle(&mut rng);

        for coord in candidates.into_iter().take(config.units_per_faction as usize) {
            faction
                .units
                .push(Unit::new(UnitId(next_id), faction.id, coord, config.max_hp));
            taken.push(coord);
            next_id += 1;
        }
    }

    Ok(GameState::new(map, factions))
}
