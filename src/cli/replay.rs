//! Replay command implementation.

use std::path::PathBuf;

use skirmish::game::resolve::ActionKind;
use skirmish::replay::MatchLog;

use super::CliError;
use super::run::describe_verdict;

/// Execute the replay command: print a saved match log turn by turn.
///
/// # Errors
///
/// Returns an error when the log cannot be read or decoded.
pub(crate) fn execute(log_path: PathBuf, turn: Option<u32>) -> Result<(), CliError> {
    let log = MatchLog::load(&log_path)?;
    println!("Match log {} (seed {})", log_path.display(), log.seed);

    for record in log
        .records
        .iter()
        .filter(|r| turn.is_none_or(|t| r.turn == t))
    {
        println!("--- turn {} ---", record.turn);
        for event in &record.events {
            let verb = match (event.action, event.success) {
                (ActionKind::Move, true) => "moved",
                (ActionKind::Move, false) => "move blocked",
                (ActionKind::Attack, true) => "hit",
                (ActionKind::Attack, false) => "attack missed",
                (ActionKind::Pass, _) => "passed",
            };
            let target = event
                .target
                .map(|t| format!(" -> ({},{})", t.x, t.y))
                .unwrap_or_default();
            println!(
                "  {} [{}] at ({},{}) {verb}{target}",
                event.unit_id, event.faction, event.source.x, event.source.y
            );
        }
        for casualty in &record.casualties {
            println!("  {casualty} destroyed");
        }
        for faction in &record.agent_failures {
            println!("  {faction} agent failed; all units passed");
        }
    }

    if let Some(verdict) = log.final_verdict() {
        println!("{}", describe_verdict(verdict));
    }
    Ok(())
}
