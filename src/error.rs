//! Error types for the match engine.

use std::fmt;

/// Startup-time configuration failure.
///
/// The engine refuses to start a match with invalid static data; once a
/// [`crate::game::MapModel`] is constructed, the turn engine assumes it is
/// valid and never re-validates terrain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Map asset is empty or has a zero dimension.
    EmptyMap,
    /// Map rows have inconsistent widths.
    RaggedRows {
        /// Row index (0-based) with the mismatched width.
        row: usize,
        /// Expected width taken from the first row.
        expected: usize,
        /// Actual width of the offending row.
        actual: usize,
    },
    /// Unrecognised terrain glyph in the map asset.
    UnknownTerrain {
        /// The offending character.
        glyph: char,
        /// Row index (0-based).
        row: usize,
        /// Column index (0-based).
        col: usize,
    },
    /// A headquarters coordinate is out of bounds or on impassable terrain.
    BadHeadquarters {
        /// Human-readable detail.
        detail: String,
    },
    /// A scenario could not place all starting units on passable cells.
    SpawnExhausted {
        /// Faction whose spawn area was too small.
        faction: String,
    },
    /// Failed to read a map asset from disk.
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMap => write!(f, "map asset is empty"),
            Self::RaggedRows {
                row,
                expected,
                actual,
            } => write!(f, "map row {row} has width {actual}, expected {expected}"),
            Self::UnknownTerrain { glyph, row, col } => {
                write!(f, "unknown terrain glyph '{glyph}' at row {row}, col {col}")
            }
            Self::BadHeadquarters { detail } => write!(f, "bad headquarters: {detail}"),
            Self::SpawnExhausted { faction } => {
                write!(f, "no passable spawn cells left for faction {faction}")
            }
            Self::Io(e) => write!(f, "failed to read map asset: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure at the external agent boundary.
///
/// None of these abort the match: the runner downgrades the offending
/// faction to all-pass for the turn and records the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The agent did not respond within the configured deadline.
    Timeout,
    /// The agent responded with something that is not a valid order list.
    Protocol(String),
    /// The agent's backing provider reported an error.
    Provider(String),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "agent timed out"),
            Self::Protocol(detail) => write!(f, "agent protocol error: {detail}"),
            Self::Provider(detail) => write!(f, "agent provider error: {detail}"),
        }
    }
}

impl std::error::Error for AgentError {}
