//! Proposed orders and the action validator.
//!
//! Orders come from an untrusted external agent. The validator never
//! aborts a turn and never panics on bad input: every illegal or malformed
//! order is downgraded to a pass, with a reason code kept for logging.

use serde::{Deserialize, Serialize};

use crate::game::faction::FactionId;
use crate::game::map::{Coord, Direction};
use crate::game::state::GameState;
use crate::game::unit::UnitId;

/// An action as proposed over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum RawAction {
    /// Step one cell in a cardinal direction.
    Move {
        /// The direction to step.
        direction: Direction,
    },
    /// Strike an adjacent coordinate.
    Attack {
        /// The coordinate under attack.
        target: Coord,
    },
    /// Do nothing this turn.
    Pass,
}

/// One proposed order for one unit, as received from an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOrder {
    /// The unit this order is addressed to.
    pub unit_id: UnitId,
    /// The proposed action.
    #[serde(flatten)]
    pub action: RawAction,
    /// Set when the wire entry could not be fully decoded. The validator
    /// rejects such orders with [`RejectReason::MalformedAction`].
    #[serde(skip)]
    pub malformed: bool,
}

impl RawOrder {
    /// Create a well-formed order.
    #[must_use]
    pub const fn new(unit_id: UnitId, action: RawAction) -> Self {
        Self {
            unit_id,
            action,
            malformed: false,
        }
    }

    /// Create a placeholder for a wire entry that failed to decode.
    #[must_use]
    pub const fn malformed(unit_id: UnitId) -> Self {
        Self {
            unit_id,
            action: RawAction::Pass,
            malformed: true,
        }
    }
}

/// A fully validated action, with destinations resolved to coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move to an adjacent passable cell.
    Move {
        /// Destination cell.
        to: Coord,
    },
    /// Attack a coordinate holding a living enemy.
    Attack {
        /// The coordinate under attack.
        target: Coord,
    },
    /// Do nothing.
    Pass,
}

/// Why a proposed order was downgraded to a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The unit id does not exist.
    UnknownUnit,
    /// The unit belongs to the opposing faction.
    NotYourUnit,
    /// The unit is no longer alive.
    UnitDead,
    /// Move destination is outside the grid.
    OutOfBounds,
    /// Move destination is impassable terrain.
    Impassable,
    /// Attack target is not orthogonally adjacent.
    NotAdjacent,
    /// Attack target holds no living unit.
    NoTarget,
    /// Attack target holds a friendly unit.
    FriendlyTarget,
    /// A second order arrived for a unit that already has one.
    DuplicateOrder,
    /// The wire entry could not be decoded.
    MalformedAction,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::UnknownUnit => "unknown unit",
            Self::NotYourUnit => "unit belongs to the opponent",
            Self::UnitDead => "unit is dead",
            Self::OutOfBounds => "destination out of bounds",
            Self::Impassable => "destination impassable",
            Self::NotAdjacent => "target not adjacent",
            Self::NoTarget => "no unit at target",
            Self::FriendlyTarget => "target is friendly",
            Self::DuplicateOrder => "duplicate order",
            Self::MalformedAction => "malformed action",
        };
        write!(f, "{text}")
    }
}

/// A rejected order, kept for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// The unit the order addressed.
    pub unit_id: UnitId,
    /// Why it was rejected.
    pub reason: RejectReason,
}

/// The validator's output: exactly one action per living unit of the
/// issuing faction, plus the rejection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedOrders {
    /// The issuing faction.
    pub faction: FactionId,
    /// One `(unit, action)` pair per living unit, sorted by unit id.
    /// Units without a surviving order carry [`Action::Pass`].
    pub actions: Vec<(UnitId, Action)>,
    /// Orders that were downgraded to pass, with reasons.
    pub rejections: Vec<Rejection>,
}

impl SanitizedOrders {
    /// All-pass orders for a faction (used when its agent fails).
    #[must_use]
    pub fn all_pass(state: &GameState, faction: FactionId) -> Self {
        validate_orders(state, faction, &[])
    }

    /// The sanitized action for a unit, if it is listed.
    #[must_use]
    pub fn action_for(&self, unit_id: UnitId) -> Option<Action> {
        self.actions
            .iter()
            .find(|(id, _)| *id == unit_id)
            .map(|(_, action)| *action)
    }
}

/// Validate a faction's proposed orders against the pre-turn snapshot.
///
/// Every rule is evaluated against the state as it stands *before* any
/// action in the turn is applied. Occupancy is deliberately not checked
/// here: whether a destination is free depends on what every other unit
/// does this turn, so all occupancy contention (contested destinations,
/// vacancy chains, blocked cells) belongs to the resolver. Units without
/// an order (or whose order is rejected) pass.
#[must_use]
pub fn validate_orders(
    state: &GameState,
    faction: FactionId,
    orders: &[RawOrder],
) -> SanitizedOrders {
    let own = state.faction(faction);
    let mut actions: Vec<(UnitId, Action)> = own
        .living_units()
        .map(|u| (u.id, Action::Pass))
        .collect();
    actions.sort_by_key(|(id, _)| *id);

    let mut rejections = Vec::new();
    let mut ordered: Vec<UnitId> = Vec::new();

    for order in orders {
        let unit_id = order.unit_id;

        if order.malformed {
            rejections.push(Rejection {
                unit_id,
                reason: RejectReason::MalformedAction,
            });
            continue;
        }

        let Some(unit) = own.unit(unit_id) else {
            let reason = if state.find_unit(unit_id).is_some() {
                RejectReason::NotYourUnit
            } else {
                RejectReason::UnknownUnit
            };
            rejections.push(Rejection { unit_id, reason });
            continue;
        };

        if !unit.alive {
            rejections.push(Rejection {
                unit_id,
                reason: RejectReason::UnitDead,
            });
            continue;
        }

        if ordered.contains(&unit_id) {
            // First order wins; later duplicates are noise.
            rejections.push(Rejection {
                unit_id,
                reason: RejectReason::DuplicateOrder,
            });
            continue;
        }

        let verdict = match order.action {
            RawAction::Move { direction } => check_move(state, unit.coord, direction),
            RawAction::Attack { target } => check_attack(state, faction, unit.coord, target),
            RawAction::Pass => Ok(Action::Pass),
        };

        match verdict {
            Ok(action) => {
                ordered.push(unit_id);
                if let Some(slot) = actions.iter_mut().find(|(id, _)| *id == unit_id) {
                    slot.1 = action;
                }
            }
            Err(reason) => rejections.push(Rejection { unit_id, reason }),
        }
    }

    SanitizedOrders {
        faction,
        actions,
        rejections,
    }
}

/// Check a move against bounds and terrain.
fn check_move(state: &GameState, from: Coord, direction: Direction) -> Result<Action, RejectReason> {
    let Some(to) = direction.step(from) else {
        return Err(RejectReason::OutOfBounds);
    };
    if !state.map.in_bounds(to) {
        return Err(RejectReason::OutOfBounds);
    }
    if !state.map.is_passable(to) {
        return Err(RejectReason::Impassable);
    }
    Ok(Action::Move { to })
}

/// Check an attack for adjacency and a living enemy occupant.
fn check_attack(
    state: &GameState,
    faction: FactionId,
    from: Coord,
    target: Coord,
) -> Result<Action, RejectReason> {
    if !from.is_orthogonal_neighbor(target) {
        return Err(RejectReason::NotAdjacent);
    }
    match state.unit_at(target) {
        None => Err(RejectReason::NoTarget),
        Some(occupant) if occupant.faction == faction => Err(RejectReason::FriendlyTarget),
        Some(_) => Ok(Action::Attack { target }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::faction::FactionState;
    use crate::game::map::{MapModel, Terrain};
    use crate::game::unit::Unit;

    fn test_state() -> GameState {
        // 5x5, water at (2,2)
        let mut rows = vec![vec![Terrain::Rural; 5]; 5];
        rows[2][2] = Terrain::Water;
        let map = MapModel::from_rows(rows).expect("valid map");

        let mut alpha = FactionState::new(FactionId::Alpha, Coord::new(0, 0), 2, 0);
        let mut beta = FactionState::new(FactionId::Beta, Coord::new(4, 4), 2, 0);
        alpha
            .units
            .push(Unit::new(UnitId(1), FactionId::Alpha, Coord::new(1, 2), 10));
        alpha
            .units
            .push(Unit::new(UnitId(2), FactionId::Alpha, Coord::new(1, 1), 10));
        beta.units
            .push(Unit::new(UnitId(3), FactionId::Beta, Coord::new(1, 3), 10));
        GameState::new(map, [alpha, beta])
    }

    fn move_order(id: u32, direction: Direction) -> RawOrder {
        RawOrder::new(UnitId(id), RawAction::Move { direction })
    }

    #[test]
    fn test_legal_move_accepted() {
        let state = test_state();
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(2, Direction::East)]);
        assert_eq!(
            out.action_for(UnitId(2)),
            Some(Action::Move { to: Coord::new(2, 1) })
        );
        assert!(out.rejections.is_empty());
    }

    #[test]
    fn test_move_into_water_rejected() {
        let state = test_state();
        // (1,2) east -> (2,2) is water
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(1, Direction::East)]);
        assert_eq!(out.action_for(UnitId(1)), Some(Action::Pass));
        assert_eq!(out.rejections.len(), 1);
        assert_eq!(out.rejections[0].reason, RejectReason::Impassable);
    }

    #[test]
    fn test_move_off_grid_rejected() {
        let state = test_state();
        // (1,1) has no unit west at (0,1); move unit 2 north twice? One
        // order only: from (1,1) west is fine, so use a unit at the edge.
        let mut state = state;
        state
            .find_unit_mut(UnitId(2))
            .expect("unit exists")
            .coord = Coord::new(0, 0);
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(2, Direction::North)]);
        assert_eq!(out.rejections[0].reason, RejectReason::OutOfBounds);
    }

    #[test]
    fn test_move_onto_occupied_passes_validation() {
        // (1,2) south -> (1,3) holds an enemy at turn start. Whether the
        // cell ends up free depends on the whole turn, so the validator
        // accepts the move and the resolver settles it.
        let state = test_state();
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(1, Direction::South)]);
        assert_eq!(
            out.action_for(UnitId(1)),
            Some(Action::Move { to: Coord::new(1, 3) })
        );
        assert!(out.rejections.is_empty());
    }

    #[test]
    fn test_attack_adjacent_enemy_accepted() {
        let state = test_state();
        let order = RawOrder::new(
            UnitId(1),
            RawAction::Attack {
                target: Coord::new(1, 3),
            },
        );
        let out = validate_orders(&state, FactionId::Alpha, &[order]);
        assert_eq!(
            out.action_for(UnitId(1)),
            Some(Action::Attack {
                target: Coord::new(1, 3)
            })
        );
        assert!(out.rejections.is_empty());
    }

    #[test]
    fn test_attack_distant_rejected() {
        let state = test_state();
        let order = RawOrder::new(
            UnitId(2),
            RawAction::Attack {
                target: Coord::new(1, 3),
            },
        );
        let out = validate_orders(&state, FactionId::Alpha, &[order]);
        assert_eq!(out.rejections[0].reason, RejectReason::NotAdjacent);
    }

    #[test]
    fn test_attack_friendly_rejected() {
        let state = test_state();
        let order = RawOrder::new(
            UnitId(1),
            RawAction::Attack {
                target: Coord::new(1, 1),
            },
        );
        let out = validate_orders(&state, FactionId::Alpha, &[order]);
        assert_eq!(out.rejections[0].reason, RejectReason::FriendlyTarget);
    }

    #[test]
    fn test_attack_empty_cell_rejected() {
        let state = test_state();
        let order = RawOrder::new(
            UnitId(2),
            RawAction::Attack {
                target: Coord::new(2, 1),
            },
        );
        let out = validate_orders(&state, FactionId::Alpha, &[order]);
        assert_eq!(out.rejections[0].reason, RejectReason::NoTarget);
    }

    #[test]
    fn test_enemy_unit_order_rejected() {
        let state = test_state();
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(3, Direction::South)]);
        assert_eq!(out.rejections[0].reason, RejectReason::NotYourUnit);
        // Enemy unit gets no entry in alpha's action list
        assert!(out.action_for(UnitId(3)).is_none());
    }

    #[test]
    fn test_unknown_unit_rejected() {
        let state = test_state();
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(42, Direction::South)]);
        assert_eq!(out.rejections[0].reason, RejectReason::UnknownUnit);
    }

    #[test]
    fn test_dead_unit_order_rejected() {
        let mut state = test_state();
        state
            .find_unit_mut(UnitId(1))
            .expect("unit exists")
            .take_damage(10);
        let out = validate_orders(&state, FactionId::Alpha, &[move_order(1, Direction::East)]);
        assert_eq!(out.rejections[0].reason, RejectReason::UnitDead);
        // Only living units get action entries
        assert_eq!(out.actions.len(), 1);
    }

    #[test]
    fn test_duplicate_order_first_wins() {
        let state = test_state();
        let orders = [move_order(2, Direction::East), move_order(2, Direction::South)];
        let out = validate_orders(&state, FactionId::Alpha, &orders);
        assert_eq!(
            out.action_for(UnitId(2)),
            Some(Action::Move { to: Coord::new(2, 1) })
        );
        assert_eq!(out.rejections[0].reason, RejectReason::DuplicateOrder);
    }

    #[test]
    fn test_missing_orders_become_pass() {
        let state = test_state();
        let out = validate_orders(&state, FactionId::Alpha, &[]);
        assert_eq!(out.actions.len(), 2);
        assert!(out.actions.iter().all(|(_, a)| *a == Action::Pass));
        assert!(out.rejections.is_empty());
    }

    #[test]
    fn test_malformed_order_rejected() {
        let state = test_state();
        let out = validate_orders(&state, FactionId::Alpha, &[RawOrder::malformed(UnitId(1))]);
        assert_eq!(out.rejections[0].reason, RejectReason::MalformedAction);
        assert_eq!(out.action_for(UnitId(1)), Some(Action::Pass));
    }

    #[test]
    fn test_order_wire_format() {
        let json = r#"{"unit_id": 7, "action": "move", "direction": "north"}"#;
        let order: RawOrder = serde_json::from_str(json).expect("decodes");
        assert_eq!(order.unit_id, UnitId(7));
        assert_eq!(
            order.action,
            RawAction::Move {
                direction: Direction::North
            }
        );

        let json = r#"{"unit_id": 3, "action": "attack", "target": {"x": 2, "y": 5}}"#;
        let order: RawOrder = serde_json::from_str(json).expect("decodes");
        assert_eq!(
            order.action,
            RawAction::Attack {
                target: Coord::new(2, 5)
            }
        );
    }
}
