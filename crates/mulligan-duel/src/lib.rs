mod compiled;
mod env;
mod error;
mod io;
mod oracle;
mod spec;
mod state;

pub use compiled::{CardId, CardStats, CompiledDuel};
pub use env::{DuelEnv, DRAW_SCORE, FEATURE_LEN, POWER_COST, POWER_DAMAGE};
pub use error::DuelError;
pub use io::{compile_yaml, load_yaml, save_yaml};
pub use oracle::HealthOracle;
pub use spec::{CardSpec, DuelSpec, MAX_COST, MAX_DECK_SIZE};
pub use state::{
    DuelState, Minion, SideState, HERO_HEALTH, MAX_FIELD_SIZE, MAX_HAND_SIZE, MAX_MANA, TURN_CAP,
};
