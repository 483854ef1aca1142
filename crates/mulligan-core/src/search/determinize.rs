use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::search::env::GameEnv;

/// Samples one concrete world per simulation from the acting player's
/// information set.
///
/// The actual permutation of hidden cards is the environment's job
/// (`GameEnv::redeal_hidden`); this type supplies the seeded RNG so a
/// whole search is reproducible from one seed, mirroring the seeded
/// simulator discipline used elsewhere in the workspace.
#[derive(Debug, Clone)]
pub struct Determinizer {
    rng: ChaCha8Rng,
}

impl Determinizer {
    /// Create a determinizer with a deterministic RNG seed.
    pub fn new(seed: u64) -> Self {
        Determinizer {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw one determinized clone. The clone is private to the calling
    /// simulation and is discarded when the simulation ends.
    pub fn sample<G: GameEnv>(&mut self, env: &G, state: &G::State) -> G::State {
        env.redeal_hidden(state, &mut self.rng)
    }
}
