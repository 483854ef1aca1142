use rand::Rng;
use thiserror::Error;

use crate::search::{
    action::{Action, ActionMask, PolicyGrid},
    key::StateKey,
};

/// Fixed-length feature encoding of a game state, as produced by the
/// environment adapter and consumed by the oracle.
pub type Features = Vec<f32>;

/// One of the two seats at the table. `First` is the seat that owned the
/// opening turn; all signed values in the engine are expressed from its
/// perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    /// The other seat.
    pub fn rival(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}

/// Terminal signal for a state, relative to `Seat::First`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameOutcome {
    /// The game has not ended.
    Ongoing,
    /// Signed result: 1 win, -1 loss, small non-zero for a draw or the
    /// rule engine's turn-cap cutoff.
    Decided(f32),
}

impl GameOutcome {
    /// Whether the game has ended.
    pub fn is_over(self) -> bool {
        matches!(self, GameOutcome::Decided(_))
    }
}

/// Reason the rule engine refused to apply an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRejection {
    /// The action is not legal in the concrete world it was applied to,
    /// e.g. stale legality after determinization divergence.
    IllegalAction,
    /// The action was applied to an already-terminated state.
    GameOver,
}

/// Result of applying one action. Transitions report their status as a
/// value; the engine branches on it instead of catching exceptions.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The game continues; `to_move` flips only on the end-turn action.
    Advanced { features: Features, to_move: Seat },
    /// The action resolved and ended the game.
    Finished { features: Features },
    /// The action was refused; the state is unchanged or unusable.
    Rejected(StepRejection),
}

/// Environment adapter contract the search engine consumes. Implemented by
/// the surrounding game-rule engine; the engine itself owns no game logic.
pub trait GameEnv {
    /// Concrete game state. Cloned once per simulation by determinization.
    type State: Clone;

    /// Legality grid for the acting player. When a forced choice is
    /// pending, only choice-slot actions may be legal.
    fn valid_moves(&self, state: &Self::State) -> ActionMask;

    /// Fixed-length feature encoding of the state.
    fn encode(&self, state: &Self::State) -> Features;

    /// Terminal signal for the state.
    fn outcome(&self, state: &Self::State) -> GameOutcome;

    /// Seat of the player to act.
    fn to_move(&self, state: &Self::State) -> Seat;

    /// Apply one action, mutating the state in place.
    fn apply(&self, state: &mut Self::State, action: Action) -> StepOutcome;

    /// Produce an independent clone of `state` with the information hidden
    /// from the acting player (the opponent's hand and remaining deck
    /// order) randomly permuted. The card multiset and everything visible
    /// to the acting player must be preserved exactly.
    fn redeal_hidden<R: Rng>(&self, state: &Self::State, rng: &mut R) -> Self::State;

    /// Fingerprint a feature encoding. The default hashes the raw bits;
    /// environments with a compact canonical form may override it.
    fn fingerprint(&self, features: &Features) -> StateKey {
        StateKey::of(features)
    }
}

/// Prior distribution and value estimate returned by the oracle for one
/// encoded state. The value is in `[-1, 1]`, relative to the mover at the
/// evaluated state.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub priors: PolicyGrid,
    pub value: f32,
}

/// Failure to obtain a prediction. This is a collaborator contract breach,
/// not a game-state transient, and is fatal to the enclosing search run.
#[derive(Debug, Error)]
#[error("oracle prediction failed: {reason}")]
pub struct OracleError {
    pub reason: String,
}

impl OracleError {
    pub fn new(reason: impl Into<String>) -> Self {
        OracleError {
            reason: reason.into(),
        }
    }
}

/// Policy/value oracle contract.
pub trait Oracle {
    fn predict(&self, features: &Features) -> Result<Prediction, OracleError>;
}

/// Oracle that knows nothing: a flat prior over the full grid and a zero
/// value estimate. Search driven by it degrades to plain rollout-guided
/// MCTS, which makes it a useful baseline and test double.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformOracle;

impl Oracle for UniformOracle {
    fn predict(&self, _features: &Features) -> Result<Prediction, OracleError> {
        let mut priors = PolicyGrid::zeroed();
        let share = 1.0 / (crate::search::action::SLOTS * crate::search::action::TARGETS) as f32;
        for action in crate::search::action::scan_order() {
            priors.set(action, share);
        }
        Ok(Prediction { priors, value: 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_oracle_prior_sums_to_one() {
        let prediction = UniformOracle.predict(&vec![0.0; 4]).expect("never fails");
        assert!((prediction.priors.sum() - 1.0).abs() < 1e-4);
        assert_eq!(prediction.value, 0.0);
    }

    #[test]
    fn seats_are_symmetric_rivals() {
        assert_eq!(Seat::First.rival(), Seat::Second);
        assert_eq!(Seat::Second.rival(), Seat::First);
    }
}
