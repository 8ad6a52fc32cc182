//! Turn resolution: simultaneous movement, then simultaneous combat.
//!
//! Both factions' sanitized actions are resolved jointly. Movement
//! contention is settled by iterating the candidate move set to a fixed
//! point; combat damage is computed from health values as they stood at
//! the start of the combat phase. Neither phase depends on faction order
//! or unit identifiers in a way that favors one side.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::game::actions::{Action, SanitizedOrders};
use crate::game::faction::FactionId;
use crate::game::invariants::assert_invariants;
use crate::game::map::Coord;
use crate::game::state::GameState;
use crate::game::unit::UnitId;

/// Which board positions attack adjacency is evaluated against.
///
/// Combat follows movement, so `PostMovement` is the internally consistent
/// default; `PreMovement` exists for replay compatibility with runs that
/// resolved attacks against start-of-turn positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackAdjacency {
    /// Evaluate attacks on the grid as it stands after the movement phase.
    #[default]
    PostMovement,
    /// Evaluate attacks on the start-of-turn grid.
    PreMovement,
}

/// Tunables for turn resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Flat damage dealt by every successful attack.
    pub attack_damage: i32,
    /// Maximum health, used for the post-turn consistency check.
    pub max_hp: i32,
    /// Attack adjacency evaluation mode.
    pub attack_adjacency: AttackAdjacency,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            attack_damage: 5,
            max_hp: 10,
            attack_adjacency: AttackAdjacency::default(),
        }
    }
}

/// The kind of action a unit ended up taking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// The unit attempted a move.
    Move,
    /// The unit attempted an attack.
    Attack,
    /// The unit held position.
    Pass,
}

/// One per-unit entry in the turn event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEvent {
    /// The acting unit.
    pub unit_id: UnitId,
    /// Its faction.
    pub faction: FactionId,
    /// What it attempted.
    pub action: ActionKind,
    /// Where it stood at the start of the turn.
    pub source: Coord,
    /// Move destination or attack target, if any.
    pub target: Option<Coord>,
    /// Whether the action took effect (moves can be cancelled by
    /// contention, attacks can miss a vacated cell).
    pub success: bool,
    /// Damage dealt by this unit's attack this turn.
    pub damage_dealt: i32,
}

/// Everything that happened during one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// The turn that was resolved.
    pub turn: u32,
    /// Per-unit events, sorted by unit id.
    pub events: Vec<UnitEvent>,
    /// Units that died this turn, sorted by unit id.
    pub casualties: Vec<UnitId>,
}

/// A candidate move surviving validation, tracked through the fixed point.
#[derive(Debug, Clone, Copy)]
struct MoveIntent {
    unit_id: UnitId,
    to: Coord,
}

/// Resolve one full turn against both factions' sanitized actions.
///
/// Runs the movement phase, then the combat phase, appends per-faction
/// battle-log lines, advances the turn counter by exactly one, and (in
/// debug builds) asserts the world invariants.
pub fn resolve_turn(
    state: &mut GameState,
    alpha: &SanitizedOrders,
    beta: &SanitizedOrders,
    config: &ResolutionConfig,
) -> TurnReport {
    debug_assert_eq!(alpha.faction, FactionId::Alpha);
    debug_assert_eq!(beta.faction, FactionId::Beta);

    let turn = state.turn;
    let pre_positions: HashMap<UnitId, Coord> =
        state.living_units().map(|u| (u.id, u.coord)).collect();

    let mut events: HashMap<UnitId, UnitEvent> = HashMap::new();
    for orders in [alpha, beta] {
        for &(unit_id, action) in &orders.actions {
            let Some(&source) = pre_positions.get(&unit_id) else {
                continue;
            };
            let (kind, target) = match action {
                Action::Move { to } => (ActionKind::Move, Some(to)),
                Action::Attack { target } => (ActionKind::Attack, Some(target)),
                Action::Pass => (ActionKind::Pass, None),
            };
            events.insert(
                unit_id,
                UnitEvent {
                    unit_id,
                    faction: orders.faction,
                    action: kind,
                    source,
                    target,
                    // Pass always "succeeds"; moves and attacks are
                    // confirmed by their phases below.
                    success: matches!(action, Action::Pass),
                    damage_dealt: 0,
                },
            );
        }
    }

    movement_phase(state, alpha, beta, &mut events);
    let casualties = combat_phase(state, alpha, beta, config, &pre_positions, &mut events);

    record_battle_logs(state, turn, &casualties, &events);

    state.advance_turn();
    assert_invariants(state, config.max_hp);

    let mut events: Vec<UnitEvent> = events.into_values().collect();
    events.sort_by_key(|e| e.unit_id);
    let mut casualties: Vec<UnitId> = casualties.into_iter().collect();
    casualties.sort();

    TurnReport {
        turn,
        events,
        casualties,
    }
}

/// Resolve simultaneous movement for both factions.
///
/// Contested destinations (two or more units targeting the same cell)
/// cancel every contender. The remaining moves are iterated to a fixed
/// point: a move is dropped while its destination is occupied by a unit
/// that is not itself moving away. Chains and cycles of vacating units
/// all succeed; the iteration is bounded by the number of candidate moves.
/// Surviving moves are applied atomically at the end.
fn movement_phase(
    state: &mut GameState,
    alpha: &SanitizedOrders,
    beta: &SanitizedOrders,
    events: &mut HashMap<UnitId, UnitEvent>,
) {
    let mut moves: Vec<MoveIntent> = Vec::new();
    for orders in [alpha, beta] {
        for &(unit_id, action) in &orders.actions {
            if let Action::Move { to } = action
                && state.find_unit(unit_id).is_some_and(|u| u.alive)
            {
                moves.push(MoveIntent { unit_id, to });
            }
        }
    }

    // Contested destinations cancel symmetrically, regardless of faction
    // or unit id.
    let mut dest_counts: HashMap<Coord, u32> = HashMap::new();
    for m in &moves {
        *dest_counts.entry(m.to).or_insert(0) += 1;
    }
    moves.retain(|m| dest_counts.get(&m.to).copied().unwrap_or(0) == 1);

    // Fixed point over the remaining candidate set. Each pass can only
    // remove moves, so at most `moves.len()` passes occur.
    let occupant_at: HashMap<Coord, UnitId> =
        state.living_units().map(|u| (u.coord, u.id)).collect();
    let bound = moves.len();
    for _ in 0..=bound {
        let moving: HashSet<UnitId> = moves.iter().map(|m| m.unit_id).collect();
        let before = moves.len();
        moves.retain(|m| {
            occupant_at
                .get(&m.to)
                .is_none_or(|occupant| moving.contains(occupant))
        });
        if moves.len() == before {
            break;
        }
    }

    // Apply atomically: every surviving mover relocates together.
    for m in &moves {
        debug_assert!(state.map.is_passable(m.to));
        if let Some(unit) = state.find_unit_mut(m.unit_id) {
            unit.coord = m.to;
        }
        if let Some(event) = events.get_mut(&m.unit_id) {
            event.success = true;
        }
    }
}

/// Resolve simultaneous combat for both factions.
///
/// Adjacency and target occupancy are evaluated on the grid selected by
/// [`AttackAdjacency`]. All damage is computed from health values at the
/// start of the phase, then applied in one step, so a unit killed this
/// turn still lands its own attack. Returns the set of units that died.
fn combat_phase(
    state: &mut GameState,
    alpha: &SanitizedOrders,
    beta: &SanitizedOrders,
    config: &ResolutionConfig,
    pre_positions: &HashMap<UnitId, Coord>,
    events: &mut HashMap<UnitId, UnitEvent>,
) -> HashSet<UnitId> {
    // Positions the attacks are evaluated against.
    let attack_grid: HashMap<Coord, UnitId> = match config.attack_adjacency {
        AttackAdjacency::PostMovement => {
            state.living_units().map(|u| (u.coord, u.id)).collect()
        }
        AttackAdjacency::PreMovement => {
            pre_positions.iter().map(|(&id, &coord)| (coord, id)).collect()
        }
    };
    let attacker_pos = |unit_id: UnitId| -> Option<Coord> {
        match config.attack_adjacency {
            AttackAdjacency::PostMovement => state.find_unit(unit_id).map(|u| u.coord),
            AttackAdjacency::PreMovement => pre_positions.get(&unit_id).copied(),
        }
    };

    let mut damage: HashMap<UnitId, i32> = HashMap::new();
    for orders in [alpha, beta] {
        for &(unit_id, action) in &orders.actions {
            let Action::Attack { target } = action else {
                continue;
            };
            let hit = attacker_pos(unit_id)
                .filter(|from| from.is_orthogonal_neighbor(target))
                .and_then(|_| attack_grid.get(&target))
                .copied()
                .filter(|victim| {
                    state
                        .find_unit(*victim)
                        .is_some_and(|u| u.alive && u.faction != orders.faction)
                });

            if let Some(victim) = hit {
                *damage.entry(victim).or_insert(0) += config.attack_damage;
                if let Some(event) = events.get_mut(&unit_id) {
                    event.success = true;
                    event.damage_dealt = config.attack_damage;
                }
            }
        }
    }

    // Apply all damage at once, from phase-start health.
    let mut casualties = HashSet::new();
    for (&victim, &amount) in &damage {
        if let Some(unit) = state.find_unit_mut(victim) {
            unit.take_damage(amount);
            if !unit.alive {
                casualties.insert(victim);
            }
        }
    }
    casualties
}

/// Append per-faction private battle-log lines for this turn.
fn record_battle_logs(
    state: &mut GameState,
    turn: u32,
    casualties: &HashSet<UnitId>,
    events: &HashMap<UnitId, UnitEvent>,
) {
    for faction_id in FactionId::BOTH {
        let mut lines = Vec::new();
        for event in events.values() {
            if event.faction != faction_id {
                continue;
            }
            match event.action {
                ActionKind::Move if event.success => {
                    if let Some(to) = event.target {
                        lines.push(format!(
                            "turn {turn}: {} moved ({},{}) -> ({},{})",
                            event.unit_id, event.source.x, event.source.y, to.x, to.y
                        ));
                    }
                }
                ActionKind::Move => {
                    lines.push(format!("turn {turn}: {} move blocked", event.unit_id));
                }
                ActionKind::Attack if event.success => {
                    lines.push(format!(
                        "turn {turn}: {} dealt {} damage",
                        event.unit_id, event.damage_dealt
                    ));
                }
                ActionKind::Attack => {
                    lines.push(format!("turn {turn}: {} attack missed", event.unit_id));
                }
                ActionKind::Pass => {}
            }
        }
        for &casualty in casualties {
            if state.faction(faction_id).unit(casualty).is_some() {
                lines.push(format!("turn {turn}: {casualty} was destroyed"));
            }
        }
        lines.sort();
        let faction = state.faction_mut(faction_id);
        for line in lines {
            faction.record(line);
        }
    }
}
