//! The turn engine: world model, intel, validation, resolution, victory.

pub mod actions;
pub mod faction;
pub mod intel;
pub mod invariants;
pub mod map;
pub mod resolve;
pub mod scenario;
pub mod state;
pub mod unit;
pub mod victory;

pub use actions::{Action, RawAction, RawOrder, RejectReason, Rejection, SanitizedOrders, validate_orders};
pub use faction::{FactionId, FactionState};
pub use intel::{IntelReport, UnitIntel, build_intel};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{Coord, Direction, MapModel, Terrain};
pub use resolve::{
    ActionKind, AttackAdjacency, ResolutionConfig, TurnReport, UnitEvent, resolve_turn,
};
pub use scenario::ScenarioConfig;
pub use state::GameState;
pub use unit::{Unit, UnitId};
pub use victory::{Verdict, VictoryConfig, VictoryMetric, VictoryReason, check_victory};
