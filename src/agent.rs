//! The external-agent boundary.
//!
//! Agents are untrusted: they see only an [`IntelReport`] and hand back
//! proposed orders. Anything an agent does wrong is contained here or in
//! the validator; no agent behavior can crash a match.

use std::collections::{HashSet, VecDeque};

use crate::error::AgentError;
use crate::game::actions::{RawAction, RawOrder};
use crate::game::intel::{IntelReport, UnitIntel};
use crate::game::map::{Coord, Direction, Terrain};
use crate::game::unit::UnitId;

/// A source of orders for one faction.
///
/// `decide` is called once per turn with that faction's intel. Returning
/// an error forfeits the turn (all units pass); it never ends the match.
pub trait Agent {
    /// Stable display name for logs.
    fn name(&self) -> &str;

    /// Propose orders for the current turn.
    fn decide(&mut self, intel: &IntelReport) -> Result<Vec<RawOrder>, AgentError>;
}

/// Decode an order list from an agent's raw text response.
///
/// The text may be wrapped in a markdown code fence; fences are stripped
/// before parsing. The root must be a JSON array or the whole response is
/// a protocol error. Individual entries that fail to decode are kept as
/// malformed placeholders when their `unit_id` is recoverable (so the
/// rejection is attributable), and dropped otherwise.
pub fn parse_orders(text: &str) -> Result<Vec<RawOrder>, AgentError> {
    let body = strip_code_fence(text);
    let root: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AgentError::Protocol(format!("response is not JSON: {e}")))?;
    let serde_json::Value::Array(items) = root else {
        return Err(AgentError::Protocol(
            "response root is not an array".to_owned(),
        ));
    };

    let mut orders = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RawOrder>(item.clone()) {
            Ok(order) => orders.push(order),
            Err(_) => {
                if let Some(id) = item.get("unit_id").and_then(serde_json::Value::as_u64) {
                    #[allow(clippy::cast_possible_truncation)]
                    let id = id as u32;
                    orders.push(RawOrder::malformed(UnitId(id)));
                }
            }
        }
    }
    Ok(orders)
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Replays a pre-scripted order list each turn; empty once exhausted.
///
/// Test and replay double.
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    script: VecDeque<Vec<RawOrder>>,
}

impl ScriptedAgent {
    /// Create an agent that plays `turns` in order, then passes forever.
    #[must_use]
    pub fn new(turns: Vec<Vec<RawOrder>>) -> Self {
        Self {
            script: turns.into(),
        }
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    fn decide(&mut self, _intel: &IntelReport) -> Result<Vec<RawOrder>, AgentError> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

/// Always passes.
#[derive(Debug, Default)]
pub struct PassiveAgent;

impl Agent for PassiveAgent {
    fn name(&self) -> &str {
        "passive"
    }

    fn decide(&mut self, _intel: &IntelReport) -> Result<Vec<RawOrder>, AgentError> {
        Ok(Vec::new())
    }
}

/// Always times out. Exercises the forfeit path.
#[derive(Debug, Default)]
pub struct UnresponsiveAgent;

impl Agent for UnresponsiveAgent {
    fn name(&self) -> &str {
        "unresponsive"
    }

    fn decide(&mut self, _intel: &IntelReport) -> Result<Vec<RawOrder>, AgentError> {
        Err(AgentError::Timeout)
    }
}

/// A simple deterministic baseline: attack an adjacent visible enemy,
/// otherwise march toward the enemy headquarters.
#[derive(Debug, Default)]
pub struct AdvanceAgent;

impl Agent for AdvanceAgent {
    fn name(&self) -> &str {
        "advance"
    }

    fn decide(&mut self, intel: &IntelReport) -> Result<Vec<RawOrder>, AgentError> {
        let mut orders = Vec::with_capacity(intel.own_units.len());
        // Cells already spoken for this turn: known units plus the
        // destinations this agent has committed to.
        let mut claimed: HashSet<Coord> = intel
            .own_units
            .iter()
            .chain(&intel.visible_enemy_units)
            .map(|u| u.coord)
            .collect();

        for unit in &intel.own_units {
            if let Some(target) = adjacent_enemy(unit, &intel.visible_enemy_units) {
                orders.push(RawOrder::new(unit.id, RawAction::Attack { target }));
                continue;
            }
            if let Some(direction) = step_toward(unit.coord, intel.enemy_hq, intel, &claimed) {
                if let Some(to) = direction.step(unit.coord) {
                    claimed.insert(to);
                }
                orders.push(RawOrder::new(unit.id, RawAction::Move { direction }));
            } else {
                orders.push(RawOrder::new(unit.id, RawAction::Pass));
            }
        }
        Ok(orders)
    }
}

/// The first orthogonally adjacent visible enemy, by id order.
fn adjacent_enemy(unit: &UnitIntel, enemies: &[UnitIntel]) -> Option<Coord> {
    enemies
        .iter()
        .find(|e| unit.coord.is_orthogonal_neighbor(e.coord))
        .map(|e| e.coord)
}

/// Pick the direction that best closes distance to `goal` among steps
/// that land in bounds, on passable terrain, and off claimed cells.
fn step_toward(
    from: Coord,
    goal: Coord,
    intel: &IntelReport,
    claimed: &HashSet<Coord>,
) -> Option<Direction> {
    let mut candidates: Vec<Direction> = Vec::with_capacity(4);
    if goal.x > from.x {
        candidates.push(Direction::East);
    }
    if goal.x < from.x {
        candidates.push(Direction::West);
    }
    if goal.y > from.y {
        candidates.push(Direction::South);
    }
    if goal.y < from.y {
        candidates.push(Direction::North);
    }
    // Fall back to any legal sidestep when the direct axes are blocked.
    candidates.extend([
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ]);

    candidates.into_iter().find(|direction| {
        direction.step(from).is_some_and(|to| {
            terrain_at(intel, to).is_some_and(Terrain::is_passable) && !claimed.contains(&to)
        })
    })
}

/// Terrain at a coordinate per the intel's grid, `None` out of bounds.
fn terrain_at(intel: &IntelReport, coord: Coord) -> Option<Terrain> {
    intel
        .terrain
        .get(usize::from(coord.y))
        .and_then(|row| row.get(usize::from(coord.x)))
        .copied()
}
