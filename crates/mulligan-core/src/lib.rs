mod search;

pub use search::action::{
    scan_order, Action, ActionMask, PolicyGrid, CHOICE_SLOT, END_TURN_SLOT, FIRST_FIELD_SLOT,
    HERO_ATTACK_SLOT, HERO_POWER_SLOT, NO_TARGET, SLOTS, TARGETS,
};
pub use search::config::{SearchConfig, SearchConfigError};
pub use search::determinize::Determinizer;
pub use search::engine::{Mcts, RunMetrics, SimulationMetrics};
pub use search::env::{
    Features, GameEnv, GameOutcome, Oracle, OracleError, Prediction, Seat, StepOutcome,
    StepRejection, UniformOracle,
};
pub use search::error::SearchError;
pub use search::key::StateKey;
pub use search::policy::visit_distribution;
pub use search::snapshot::{EdgeSnapshot, RootSnapshot};
pub use search::store::{EdgeStats, StatsStore};
