use mulligan_core::{Features, Oracle, OracleError, PolicyGrid, Prediction, scan_order, SLOTS, TARGETS};

use crate::env::{FEAT_FIRST_HERO, FEAT_SECOND_HERO, FEAT_TO_MOVE};
use crate::state::HERO_HEALTH;

/// Stand-in oracle until a trained network is wired up: a flat prior over
/// the action grid and a value read off the hero health difference,
/// expressed for the mover as the contract requires.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthOracle;

impl Oracle for HealthOracle {
    fn predict(&self, features: &Features) -> Result<Prediction, OracleError> {
        let first = features
            .get(FEAT_FIRST_HERO)
            .copied()
            .ok_or_else(|| OracleError::new("feature vector too short"))?;
        let second = features
            .get(FEAT_SECOND_HERO)
            .copied()
            .ok_or_else(|| OracleError::new("feature vector too short"))?;
        let mover_is_second = features
            .get(FEAT_TO_MOVE)
            .copied()
            .ok_or_else(|| OracleError::new("feature vector too short"))?
            > 0.5;

        let mut value = (first - second) / HERO_HEALTH as f32;
        if mover_is_second {
            value = -value;
        }

        let mut priors = PolicyGrid::zeroed();
        let share = 1.0 / (SLOTS * TARGETS) as f32;
        for action in scan_order() {
            priors.set(action, share);
        }

        Ok(Prediction {
            priors,
            value: value.clamp(-1.0, 1.0),
        })
    }
}
