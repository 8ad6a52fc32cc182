// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Skirmish: a deterministic two-faction turn-based wargame engine.
//!
//! The engine resolves simultaneous turns on a small terrain grid. Each
//! faction is driven by an external, untrusted [`agent::Agent`] that sees
//! only a fog-of-war-limited intel view and proposes orders; everything
//! the agent can do wrong is absorbed by validation and the turn resolver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Match Runner (runner)        │
//! ├──────────────┬──────────────────────┤
//! │ Agent bound. │  Turn engine (game)  │
//! │   (agent)    │  intel → validate →  │
//! │              │  resolve → victory   │
//! ├──────────────┴──────────────────────┤
//! │       Recording (replay)            │
//! └─────────────────────────────────────┘
//! ```
//!
//! Given the same seed, configuration, and agent decisions, a match is
//! bit-for-bit reproducible.

pub mod agent;
pub mod error;
pub mod game;
pub mod replay;
pub mod runner;

pub use error::{AgentError, ConfigError};

// Re-export key engine types at crate root for convenience
pub use game::{
    Action, Coord, Direction, FactionId, GameState, IntelReport, MapModel, RawOrder, Terrain,
    Unit, UnitId, Verdict,
};
pub use runner::{MatchConfig, MatchResult, run_match};
