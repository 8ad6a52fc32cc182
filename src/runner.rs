//! The match driver.
//!
//! Owns the game state and runs the per-turn pipeline: build intel for
//! each faction, ask its agent for orders, sanitize them, resolve the
//! turn, evaluate victory, and record everything. Agents only ever see
//! intel; the state itself never crosses the boundary.

use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::error::ConfigError;
use crate::game::actions::{Rejection, SanitizedOrders, validate_orders};
use crate::game::faction::FactionId;
use crate::game::intel::build_intel;
use crate::game::map::Coord;
use crate::game::resolve::{AttackAdjacency, ResolutionConfig, resolve_turn};
use crate::game::scenario::{ScenarioConfig, build};
use crate::game::state::GameState;
use crate::game::victory::{Verdict, VictoryConfig, VictoryMetric, check_victory};
use crate::replay::{MatchLog, TurnRecord};

/// Full configuration for one match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Scenario layout seed.
    pub seed: u64,
    /// Turn limit.
    pub max_turns: u32,
    /// Tiebreak metric at the turn limit.
    pub victory_metric: VictoryMetric,
    /// Units spawned per faction.
    pub units_per_faction: u32,
    /// Maximum unit health.
    pub max_hp: i32,
    /// Damage per successful attack.
    pub attack_damage: i32,
    /// Fog-of-war radius.
    pub visibility_range: u16,
    /// Starting resources per faction.
    pub starting_resources: i64,
    /// Attack adjacency evaluation mode.
    pub attack_adjacency: AttackAdjacency,
    /// ASCII map override with its headquarters, replacing the built-in
    /// scenario map.
    pub map: Option<(String, [Coord; 2])>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_turns: 50,
            victory_metric: VictoryMetric::default(),
            units_per_faction: 3,
            max_hp: 10,
            attack_damage: 5,
            visibility_range: 2,
            starting_resources: 100,
            attack_adjacency: AttackAdjacency::default(),
            map: None,
        }
    }
}

impl MatchConfig {
    fn scenario(&self) -> ScenarioConfig {
        let (map, headquarters) = match &self.map {
            Some((ascii, hqs)) => (Some(ascii.clone()), Some(*hqs)),
            None => (None, None),
        };
        ScenarioConfig {
            units_per_faction: self.units_per_faction,
            max_hp: self.max_hp,
            visibility_range: self.visibility_range,
            starting_resources: self.starting_resources,
            map,
            headquarters,
        }
    }

    fn resolution(&self) -> ResolutionConfig {
        ResolutionConfig {
            attack_damage: self.attack_damage,
            max_hp: self.max_hp,
            attack_adjacency: self.attack_adjacency,
        }
    }

    fn victory(&self) -> VictoryConfig {
        VictoryConfig {
            max_turns: self.max_turns,
            metric: self.victory_metric,
        }
    }
}

/// The outcome of a completed match.
#[derive(Debug)]
pub struct MatchResult {
    /// Final verdict. Never [`Verdict::Ongoing`].
    pub verdict: Verdict,
    /// Number of turns resolved.
    pub turns_played: u32,
    /// The full recording.
    pub log: MatchLog,
    /// Final state, for inspection.
    pub state: GameState,
}

/// Run a full match between two agents.
///
/// Never fails mid-match: agent errors forfeit the faction's turn and
/// validation downgrades bad orders. The only error path is scenario
/// construction.
pub fn run_match(
    alpha: &mut dyn Agent,
    beta: &mut dyn Agent,
    config: &MatchConfig,
) -> Result<MatchResult, ConfigError> {
    let mut state = build(&config.scenario(), config.seed)?;
    let resolution = config.resolution();
    let victory = config.victory();
    let mut log = MatchLog::new(config.seed);

    info!(
        seed = config.seed,
        max_turns = config.max_turns,
        alpha = alpha.name(),
        beta = beta.name(),
        "match start"
    );

    let mut turns_played = 0;
    let verdict = loop {
        let turn = state.turn;
        let mut agent_failures = Vec::new();

        let alpha_orders = faction_orders(&state, FactionId::Alpha, alpha, &mut agent_failures);
        let beta_orders = faction_orders(&state, FactionId::Beta, beta, &mut agent_failures);

        for &failed in &agent_failures {
            state
                .faction_mut(failed)
                .record(format!("turn {turn}: agent failed, all units pass"));
        }

        record_rejections(&mut state, &alpha_orders);
        record_rejections(&mut state, &beta_orders);
        let rejections = [
            alpha_orders.rejections.clone(),
            beta_orders.rejections.clone(),
        ];

        let report = resolve_turn(&mut state, &alpha_orders, &beta_orders, &resolution);
        turns_played += 1;

        let verdict = check_victory(&state, &victory);
        debug!(
            turn,
            casualties = report.casualties.len(),
            ?verdict,
            "turn resolved"
        );
        log.push(TurnRecord::new(report, rejections, agent_failures, verdict));

        if verdict != Verdict::Ongoing {
            break verdict;
        }
    };

    info!(turns_played, ?verdict, "match over");
    Ok(MatchResult {
        verdict,
        turns_played,
        log,
        state,
    })
}

/// Obtain one faction's sanitized orders, forfeiting on agent failure.
fn faction_orders(
    state: &GameState,
    faction: FactionId,
    agent: &mut dyn Agent,
    agent_failures: &mut Vec<FactionId>,
) -> SanitizedOrders {
    let intel = build_intel(state, faction);
    match agent.decide(&intel) {
        Ok(raw) => validate_orders(state, faction, &raw),
        Err(e) => {
            warn!(%faction, agent = agent.name(), error = %e, "agent failed, forfeiting turn");
            agent_failures.push(faction);
            SanitizedOrders::all_pass(state, faction)
        }
    }
}

/// Log each faction's rejected orders into its private battle log.
fn record_rejections(state: &mut GameState, orders: &SanitizedOrders) {
    let turn = state.turn;
    let rejections: Vec<Rejection> = orders.rejections.clone();
    let faction = state.faction_mut(orders.faction);
    for rejection in rejections {
        warn!(
            faction = %faction.id,
            unit = %rejection.unit_id,
            reason = %rejection.reason,
            "order rejected"
        );
        faction.record(format!(
            "turn {turn}: order for {} rejected: {}",
            rejection.unit_id, rejection.reason
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AdvanceAgent, PassiveAgent, UnresponsiveAgent};
    use crate::game::victory::VictoryReason;

    #[test]
    fn test_passive_match_draws_at_limit() {
        let config = MatchConfig {
            max_turns: 4,
            ..MatchConfig::default()
        };
        let result = run_match(&mut PassiveAgent, &mut PassiveAgent, &config)
            .expect("match runs");
        assert_eq!(
            result.verdict,
            Verdict::Draw {
                reason: VictoryReason::TurnLimit,
            }
        );
        assert_eq!(result.turns_played, 4);
        assert_eq!(result.log.records.len(), 4);
    }

    #[test]
    fn test_unresponsive_agent_forfeits_without_crash() {
        let config = MatchConfig {
            max_turns: 3,
            ..MatchConfig::default()
        };
        let result = run_match(&mut UnresponsiveAgent, &mut PassiveAgent, &config)
            .expect("match runs");
        assert_eq!(result.turns_played, 3);
        for record in &result.log.records {
            assert_eq!(record.agent_failures, vec![FactionId::Alpha]);
        }
    }

    #[test]
    fn test_advance_beats_passive() {
        let config = MatchConfig {
            max_turns: 50,
            ..MatchConfig::default()
        };
        let result = run_match(&mut AdvanceAgent, &mut PassiveAgent, &config)
            .expect("match runs");
        // A marching, attacking side against a motionless one must win by
        // capture or elimination before the limit.
        assert!(matches!(
            result.verdict,
            Verdict::Win {
                faction: FactionId::Alpha,
                ..
            }
        ));
    }

    #[test]
    fn test_match_is_deterministic() {
        let config = MatchConfig {
            seed: 11,
            ..MatchConfig::default()
        };
        let a = run_match(&mut AdvanceAgent, &mut AdvanceAgent, &config).expect("match runs");
        let b = run_match(&mut AdvanceAgent, &mut AdvanceAgent, &config).expect("match runs");
        assert_eq!(a.log, b.log);
        assert_eq!(a.verdict, b.verdict);
    }

    #[test]
    fn test_log_records_every_turn_in_order() {
        let config = MatchConfig {
            max_turns: 6,
            ..MatchConfig::default()
        };
        let result = run_match(&mut PassiveAgent, &mut PassiveAgent, &config)
            .expect("match runs");
        let turns: Vec<u32> = result.log.records.iter().map(|r| r.turn).collect();
        assert_eq!(turns, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(result.log.final_verdict(), Some(result.verdict));
    }
}
