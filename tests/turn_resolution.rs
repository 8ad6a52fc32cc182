//! End-to-end turn resolution scenarios driven through the public API.

#![allow(clippy::unwrap_used)]

use skirmish::agent::{PassiveAgent, UnresponsiveAgent};
use skirmish::game::actions::{RawAction, RawOrder};
use skirmish::game::faction::{FactionId, FactionState};
use skirmish::game::map::{Coord, Direction, MapModel, Terrain};
use skirmish::game::resolve::{ResolutionConfig, resolve_turn};
use skirmish::game::state::GameState;
use skirmish::game::unit::{Unit, UnitId};
use skirmish::game::validate_orders;
use skirmish::game::victory::{Verdict, VictoryConfig, VictoryReason, check_victory};
use skirmish::game::{build_intel, check_invariants};
use skirmish::runner::{MatchConfig, run_match};

fn open_field(units: &[(u32, FactionId, Coord)]) -> GameState {
    let rows = vec![vec![Terrain::Rural; 10]; 10];
    let map = MapModel::from_rows(rows).expect("valid map");
    let mut alpha = FactionState::new(FactionId::Alpha, Coord::new(0, 0), 2, 100);
    let mut beta = FactionState::new(FactionId::Beta, Coord::new(9, 9), 2, 100);
    for &(id, faction, coord) in units {
        let unit = Unit::new(UnitId(id), faction, coord, 10);
        match faction {
            FactionId::Alpha => alpha.units.push(unit),
            FactionId::Beta => beta.units.push(unit),
        }
    }
    GameState::new(map, [alpha, beta])
}

fn run_one_turn(
    state: &mut GameState,
    alpha_orders: &[RawOrder],
    beta_orders: &[RawOrder],
) -> skirmish::game::resolve::TurnReport {
    let alpha = validate_orders(state, FactionId::Alpha, alpha_orders);
    let beta = validate_orders(state, FactionId::Beta, beta_orders);
    resolve_turn(state, &alpha, &beta, &ResolutionConfig::default())
}

fn mv(id: u32, direction: Direction) -> RawOrder {
    RawOrder::new(UnitId(id), RawAction::Move { direction })
}

fn atk(id: u32, target: Coord) -> RawOrder {
    RawOrder::new(UnitId(id), RawAction::Attack { target })
}

#[test]
fn contested_destination_freezes_both_factions() {
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(4, 5)),
        (2, FactionId::Beta, Coord::new(6, 5)),
    ]);
    run_one_turn(&mut state, &[mv(1, Direction::East)], &[mv(2, Direction::West)]);

    assert_eq!(state.find_unit(UnitId(1)).unwrap().coord, Coord::new(4, 5));
    assert_eq!(state.find_unit(UnitId(2)).unwrap().coord, Coord::new(6, 5));
    assert!(check_invariants(&state, 10).is_empty());
}

#[test]
fn vacated_cell_move_succeeds_across_factions() {
    // Beta's unit vacates (5,5) northward while alpha's moves into it.
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(4, 5)),
        (2, FactionId::Beta, Coord::new(5, 5)),
    ]);
    run_one_turn(&mut state, &[mv(1, Direction::East)], &[mv(2, Direction::North)]);

    assert_eq!(state.find_unit(UnitId(1)).unwrap().coord, Coord::new(5, 5));
    assert_eq!(state.find_unit(UnitId(2)).unwrap().coord, Coord::new(5, 4));
    assert!(check_invariants(&state, 10).is_empty());
}

#[test]
fn chained_vacancy_resolves_whole_chain() {
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(2, 2)),
        (2, FactionId::Alpha, Coord::new(3, 2)),
        (3, FactionId::Alpha, Coord::new(4, 2)),
    ]);
    let orders = [
        mv(1, Direction::East),
        mv(2, Direction::East),
        mv(3, Direction::East),
    ];
    run_one_turn(&mut state, &orders, &[]);

    assert_eq!(state.find_unit(UnitId(1)).unwrap().coord, Coord::new(3, 2));
    assert_eq!(state.find_unit(UnitId(2)).unwrap().coord, Coord::new(4, 2));
    assert_eq!(state.find_unit(UnitId(3)).unwrap().coord, Coord::new(5, 2));
}

#[test]
fn chain_blocked_by_stationary_unit_fails_only_blocked_links() {
    // Unit 3 holds (4,2) and passes; 2 cannot enter it, so 1 cannot enter
    // 2's cell either. An unrelated mover is unaffected.
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(2, 2)),
        (2, FactionId::Alpha, Coord::new(3, 2)),
        (3, FactionId::Alpha, Coord::new(4, 2)),
        (4, FactionId::Alpha, Coord::new(7, 7)),
    ]);
    let orders = [mv(1, Direction::East), mv(2, Direction::East), mv(4, Direction::East)];
    run_one_turn(&mut state, &orders, &[]);

    assert_eq!(state.find_unit(UnitId(1)).unwrap().coord, Coord::new(2, 2));
    assert_eq!(state.find_unit(UnitId(2)).unwrap().coord, Coord::new(3, 2));
    assert_eq!(state.find_unit(UnitId(3)).unwrap().coord, Coord::new(4, 2));
    assert_eq!(state.find_unit(UnitId(4)).unwrap().coord, Coord::new(8, 7));
}

#[test]
fn mutual_combat_is_simultaneous() {
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(5, 5)),
        (2, FactionId::Beta, Coord::new(5, 6)),
    ]);
    state.find_unit_mut(UnitId(1)).unwrap().hp = 5;
    state.find_unit_mut(UnitId(2)).unwrap().hp = 5;

    let report = run_one_turn(
        &mut state,
        &[atk(1, Coord::new(5, 6))],
        &[atk(2, Coord::new(5, 5))],
    );

    assert!(!state.find_unit(UnitId(1)).unwrap().alive);
    assert!(!state.find_unit(UnitId(2)).unwrap().alive);
    assert_eq!(report.casualties.len(), 2);
}

#[test]
fn fog_of_war_hides_distant_enemy_and_private_state() {
    let state = open_field(&[
        (1, FactionId::Alpha, Coord::new(1, 1)),
        (2, FactionId::Beta, Coord::new(8, 8)),
    ]);
    let intel = build_intel(&state, FactionId::Alpha);

    assert!(intel.visible_enemy_units.is_empty());
    assert_eq!(intel.own_resources, 100);
    let json = serde_json::to_string(&intel).expect("serializable");
    // Nothing faction-private from beta crosses the boundary.
    assert!(!json.contains("log"));
}

#[test]
fn hq_capture_beats_inferior_position() {
    // Alpha's lone unit stands on beta's HQ while beta has more units and
    // the turn count is past the limit: capture still wins.
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(9, 9)),
        (2, FactionId::Beta, Coord::new(1, 1)),
        (3, FactionId::Beta, Coord::new(2, 1)),
    ]);
    state.faction_mut(FactionId::Beta).resources = 9999;
    state.turn = 99;

    assert_eq!(
        check_victory(&state, &VictoryConfig::default()),
        Verdict::Win {
            faction: FactionId::Alpha,
            reason: VictoryReason::HqCapture,
        }
    );
}

#[test]
fn capture_on_final_move_wins_that_turn() {
    // Beta HQ is at (9,9); alpha's unit steps onto it this turn.
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(9, 8)),
        (2, FactionId::Beta, Coord::new(1, 1)),
    ]);
    run_one_turn(&mut state, &[mv(1, Direction::South)], &[]);

    assert_eq!(state.find_unit(UnitId(1)).unwrap().coord, Coord::new(9, 9));
    assert_eq!(
        check_victory(&state, &VictoryConfig::default()),
        Verdict::Win {
            faction: FactionId::Alpha,
            reason: VictoryReason::HqCapture,
        }
    );
}

#[test]
fn draw_when_turn_limit_expires_with_equal_counts() {
    let config = MatchConfig {
        max_turns: 5,
        ..MatchConfig::default()
    };
    let result =
        run_match(&mut PassiveAgent, &mut PassiveAgent, &config).expect("match runs");
    assert_eq!(
        result.verdict,
        Verdict::Draw {
            reason: VictoryReason::TurnLimit,
        }
    );
    assert_eq!(result.turns_played, 5);
}

#[test]
fn agent_timeout_forfeits_turn_without_stopping_opponent() {
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(4, 4)),
        (2, FactionId::Beta, Coord::new(6, 6)),
    ]);
    // Alpha's agent failed: all-pass. Beta still moves.
    let alpha = skirmish::game::actions::SanitizedOrders::all_pass(&state, FactionId::Alpha);
    let beta = validate_orders(&state, FactionId::Beta, &[mv(2, Direction::North)]);
    resolve_turn(&mut state, &alpha, &beta, &ResolutionConfig::default());

    assert_eq!(state.find_unit(UnitId(1)).unwrap().coord, Coord::new(4, 4));
    assert_eq!(state.find_unit(UnitId(2)).unwrap().coord, Coord::new(6, 5));
    assert_eq!(state.turn, 2);
}

#[test]
fn unresponsive_agent_never_crashes_a_full_match() {
    let config = MatchConfig {
        max_turns: 8,
        ..MatchConfig::default()
    };
    let result = run_match(&mut UnresponsiveAgent, &mut UnresponsiveAgent, &config)
        .expect("match runs");
    assert_eq!(result.turns_played, 8);
    for record in &result.log.records {
        assert_eq!(
            record.agent_failures,
            vec![FactionId::Alpha, FactionId::Beta]
        );
    }
}

#[test]
fn invariants_hold_through_a_full_scripted_melee() {
    let mut state = open_field(&[
        (1, FactionId::Alpha, Coord::new(4, 4)),
        (2, FactionId::Alpha, Coord::new(4, 5)),
        (3, FactionId::Beta, Coord::new(5, 4)),
        (4, FactionId::Beta, Coord::new(5, 5)),
    ]);

    for _ in 0..4 {
        let alpha_orders = [atk(1, Coord::new(5, 4)), atk(2, Coord::new(5, 5))];
        let beta_orders = [atk(3, Coord::new(4, 4)), atk(4, Coord::new(4, 5))];
        run_one_turn(&mut state, &alpha_orders, &beta_orders);
        assert!(check_invariants(&state, 10).is_empty());
    }
    // 4 rounds at 5 damage: everyone is dead, and that is a draw.
    assert_eq!(state.living_counts(), [0, 0]);
    assert_eq!(
        check_victory(&state, &VictoryConfig::default()),
        Verdict::Draw {
            reason: VictoryReason::Elimination,
        }
    );
}
