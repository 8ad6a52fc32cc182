//! Run command implementation.

use std::fs;
use std::path::PathBuf;

use skirmish::game::victory::{Verdict, VictoryReason};
use skirmish::game::{AttackAdjacency, Coord};
use skirmish::runner::{MatchConfig, run_match};

use super::{AgentKind, CliError};

/// Execute the run command.
///
/// # Errors
///
/// Returns an error for a bad map asset or an unsavable log file.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    seed: Option<u64>,
    turns: u32,
    alpha: AgentKind,
    beta: AgentKind,
    map: Option<PathBuf>,
    alpha_hq: Option<String>,
    beta_hq: Option<String>,
    pre_movement_attacks: bool,
    save: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(42))
            .unwrap_or(42)
    });

    let map = match map {
        Some(path) => {
            let ascii = fs::read_to_string(&path)
                .map_err(|e| CliError::new(format!("failed to read {}: {e}", path.display())))?;
            let hqs = [
                parse_coord(alpha_hq.as_deref(), "--alpha-hq")?,
                parse_coord(beta_hq.as_deref(), "--beta-hq")?,
            ];
            Some((ascii, hqs))
        }
        None => None,
    };

    let config = MatchConfig {
        seed,
        max_turns: turns,
        attack_adjacency: if pre_movement_attacks {
            AttackAdjacency::PreMovement
        } else {
            AttackAdjacency::PostMovement
        },
        map,
        ..MatchConfig::default()
    };

    let mut alpha = alpha.build();
    let mut beta = beta.build();

    if !quiet {
        println!(
            "Running match with seed {seed}: {} (alpha) vs {} (beta)",
            alpha.name(),
            beta.name()
        );
    }

    let result = run_match(alpha.as_mut(), beta.as_mut(), &config)?;

    if let Some(save_path) = save {
        result.log.save(&save_path)?;
        if !quiet {
            println!("Match log saved to: {}", save_path.display());
        }
    }

    if !quiet {
        for record in &result.log.records {
            let moved = record.events.iter().filter(|e| e.success).count();
            println!(
                "turn {:>3}: {} effective actions, {} casualties",
                record.turn,
                moved,
                record.casualties.len()
            );
        }
    }

    println!(
        "{} after {} turns",
        describe_verdict(result.verdict),
        result.turns_played
    );
    Ok(())
}

/// Parse an `X,Y` coordinate argument.
fn parse_coord(arg: Option<&str>, flag: &str) -> Result<Coord, CliError> {
    let text =
        arg.ok_or_else(|| CliError::new(format!("{flag} is required with a custom map")))?;
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| CliError::new(format!("{flag} expects X,Y, got '{text}'")))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u16>()
            .map_err(|e| CliError::new(format!("{flag}: bad coordinate '{s}': {e}")))
    };
    Ok(Coord::new(parse(x)?, parse(y)?))
}

/// Human-readable verdict line.
pub(crate) fn describe_verdict(verdict: Verdict) -> String {
    let reason = |r: VictoryReason| match r {
        VictoryReason::HqCapture => "headquarters capture",
        VictoryReason::Elimination => "elimination",
        VictoryReason::TurnLimit => "turn limit",
    };
    match verdict {
        Verdict::Ongoing => "match ongoing".to_owned(),
        Verdict::Win { faction, reason: r } => {
            format!("{faction} wins by {}", reason(r))
        }
        Verdict::Draw { reason: r } => format!("draw by {}", reason(r)),
    }
}
