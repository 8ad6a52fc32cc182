//! Match recording.
//!
//! Every resolved turn is appended to a [`MatchLog`], which serializes to
//! JSON. Together with the seed and the match settings, a saved log is
//! enough to audit or re-derive an entire match.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::actions::Rejection;
use crate::game::faction::FactionId;
use crate::game::resolve::{TurnReport, UnitEvent};
use crate::game::unit::UnitId;
use crate::game::victory::Verdict;

/// Failure while saving or loading a match log.
#[derive(Debug)]
pub enum ReplayError {
    /// Filesystem failure.
    Io(std::io::Error),
    /// The log file is not valid JSON for this schema.
    Format(serde_json::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "replay io error: {e}"),
            Self::Format(e) => write!(f, "replay format error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<std::io::Error> for ReplayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

/// Everything recorded about one resolved turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The turn number.
    pub turn: u32,
    /// Per-unit events, sorted by unit id.
    pub events: Vec<UnitEvent>,
    /// Units that died this turn.
    pub casualties: Vec<UnitId>,
    /// Orders downgraded to pass, indexed by [`FactionId::index`].
    pub rejections: [Vec<Rejection>; 2],
    /// Factions whose agent failed this turn and forfeited their orders.
    pub agent_failures: Vec<FactionId>,
    /// The verdict after this turn.
    pub verdict: Verdict,
}

impl TurnRecord {
    /// Assemble a record from the resolver's report and the turn's
    /// bookkeeping.
    #[must_use]
    pub fn new(
        report: TurnReport,
        rejections: [Vec<Rejection>; 2],
        agent_failures: Vec<FactionId>,
        verdict: Verdict,
    ) -> Self {
        Self {
            turn: report.turn,
            events: report.events,
            casualties: report.casualties,
            rejections,
            agent_failures,
            verdict,
        }
    }
}

/// A complete match recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLog {
    /// Seed the scenario was built from.
    pub seed: u64,
    /// One record per resolved turn, in order.
    pub records: Vec<TurnRecord>,
}

impl MatchLog {
    /// Start an empty log for a match.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            records: Vec::new(),
        }
    }

    /// Append one turn's record.
    pub fn push(&mut self, record: TurnRecord) {
        self.records.push(record);
    }

    /// The final verdict, if any turn has been recorded.
    #[must_use]
    pub fn final_verdict(&self) -> Option<Verdict> {
        self.records.last().map(|r| r.verdict)
    }

    /// Save the log as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Io`] on filesystem failure.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a log previously written by [`MatchLog::save`].
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Io`] on filesystem failure and
    /// [`ReplayError::Format`] when the content does not match the schema.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
