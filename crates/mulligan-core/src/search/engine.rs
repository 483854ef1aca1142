use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::search::{
    action::{Action, ActionMask, PolicyGrid},
    config::{SearchConfig, SearchConfigError},
    determinize::Determinizer,
    env::{GameEnv, GameOutcome, Oracle, Seat, StepOutcome},
    error::SearchError,
    key::StateKey,
    policy,
    store::StatsStore,
};

/// Floor under the parent visit count so an expanded-but-unvisited node can
/// still discriminate between priors.
const VISIT_EPS: f32 = 1e-8;

/// One `(fingerprint, action, actor)` entry recorded during selection and
/// consumed exactly once during backpropagation.
#[derive(Debug, Clone, Copy)]
struct PathStep {
    key: StateKey,
    action: Action,
    actor: Seat,
}

/// Per-simulation metrics emitted by the engine.
#[derive(Debug, Clone, Copy)]
pub struct SimulationMetrics {
    /// Edges credited during backpropagation.
    pub path_len: usize,
    /// Final signed value, from `Seat::First`'s perspective.
    pub value: f32,
    /// Whether this simulation expanded a new leaf.
    pub expanded: bool,
    /// Random-rollout steps taken past the leaf.
    pub rollout_steps: usize,
    /// Whether a rejected action or dead end cut the simulation short.
    pub truncated: bool,
}

/// Aggregate metrics for a complete search run.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    pub simulations_requested: usize,
    pub simulations_completed: usize,
    pub expansions: usize,
    pub truncations: usize,
    pub value_sum: f64,
    pub average_value: f64,
}

impl RunMetrics {
    fn new(simulations_requested: usize) -> Self {
        RunMetrics {
            simulations_requested,
            simulations_completed: 0,
            expansions: 0,
            truncations: 0,
            value_sum: 0.0,
            average_value: 0.0,
        }
    }

    fn record(&mut self, metrics: &SimulationMetrics) {
        self.simulations_completed += 1;
        if metrics.expanded {
            self.expansions += 1;
        }
        if metrics.truncated {
            self.truncations += 1;
        }
        self.value_sum += f64::from(metrics.value);
        self.average_value = self.value_sum / self.simulations_completed as f64;
    }
}

/// Determinizing PUCT search over an external rule engine and oracle.
///
/// The engine owns the statistics store for one search tree and two seeded
/// RNG streams: one for determinization, one for rollouts. It runs
/// single-threaded; simulations always run to completion, and total work
/// is bounded by `SearchConfig::simulations` plus the game's own turn cap.
#[derive(Debug, Clone)]
pub struct Mcts {
    config: SearchConfig,
    store: StatsStore,
    determinizer: Determinizer,
    rng: ChaCha8Rng,
}

impl Mcts {
    /// Create an engine with a validated config and a deterministic seed.
    pub fn new(config: SearchConfig, seed: u64) -> Result<Self, SearchConfigError> {
        config.validate()?;
        Ok(Mcts {
            config,
            store: StatsStore::new(),
            determinizer: Determinizer::new(seed),
            rng: ChaCha8Rng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
        })
    }

    /// Borrow the search configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Borrow the accumulated statistics.
    pub fn store(&self) -> &StatsStore {
        &self.store
    }

    /// Discard all accumulated statistics. Callers do this between
    /// independent training iterations; the store never evicts on its own.
    pub fn reset(&mut self) {
        self.store = StatsStore::new();
    }

    /// Run `config.simulations` simulations from `root`.
    pub fn run<G: GameEnv, O: Oracle>(
        &mut self,
        env: &G,
        oracle: &O,
        root: &G::State,
    ) -> Result<RunMetrics, SearchError> {
        self.run_with_hook(env, oracle, root, |_| {})
    }

    /// Run the full simulation budget, invoking a callback after each
    /// completed simulation.
    pub fn run_with_hook<G, O, FHook>(
        &mut self,
        env: &G,
        oracle: &O,
        root: &G::State,
        mut on_simulation: FHook,
    ) -> Result<RunMetrics, SearchError>
    where
        G: GameEnv,
        O: Oracle,
        FHook: FnMut(&SimulationMetrics),
    {
        self.ensure_root_expanded(env, oracle, root)?;

        let mut metrics = RunMetrics::new(self.config.simulations);

        for _ in 0..self.config.simulations {
            let simulation = self.simulate(env, oracle, root)?;
            on_simulation(&simulation);
            metrics.record(&simulation);
        }

        debug!(
            "search run complete: {} simulations, {} expansions, {} truncations, {} nodes",
            metrics.simulations_completed,
            metrics.expansions,
            metrics.truncations,
            self.store.node_count(),
        );
        Ok(metrics)
    }

    /// Convert accumulated root visit counts into a move distribution.
    ///
    /// Temperature 0 is greedy one-hot on the most-visited action; higher
    /// temperatures flatten towards uniform over visited actions.
    pub fn action_probabilities<G: GameEnv>(
        &self,
        env: &G,
        root: &G::State,
        temperature: f32,
    ) -> Result<PolicyGrid, SearchError> {
        let features = env.encode(root);
        let key = env.fingerprint(&features);
        policy::visit_distribution(&self.store, key, temperature)
    }

    /// Execute one complete simulation:
    /// determinize, select, expand, simulate, backpropagate.
    pub fn simulate<G: GameEnv, O: Oracle>(
        &mut self,
        env: &G,
        oracle: &O,
        root: &G::State,
    ) -> Result<SimulationMetrics, SearchError> {
        // Determinize: one private concrete world for this simulation.
        let mut world = self.determinizer.sample(env, root);
        let mut features = env.encode(&world);
        let mut key = env.fingerprint(&features);
        let root_key = key;

        let mut ended = env.outcome(&world).is_over();
        let mut truncated = false;
        let mut path: Vec<PathStep> = Vec::new();

        // Select: descend while the node has a cached prior, no cached
        // terminal value, and the determinized world has not ended.
        while !ended
            && self.store.terminal_value(key).is_none()
            && self.store.is_expanded(key)
        {
            let mask = env.valid_moves(&world);
            let actor = env.to_move(&world);

            let Some(action) = self.select_action(key, &mask) else {
                if path.is_empty() {
                    return Err(SearchError::DeadEnd { key });
                }
                truncated = true;
                break;
            };

            match env.apply(&mut world, action) {
                StepOutcome::Advanced { features: next, .. } => {
                    path.push(PathStep { key, action, actor });
                    features = next;
                    key = env.fingerprint(&features);
                }
                StepOutcome::Finished { features: next } => {
                    // The action resolved and ended the game: credit the
                    // edge that reached the terminal, then stop selecting.
                    path.push(PathStep { key, action, actor });
                    features = next;
                    key = env.fingerprint(&features);
                    ended = true;
                }
                StepOutcome::Rejected(reason) => {
                    // Non-fatal: truncate path extension here and fall
                    // through to backpropagation with the best signal we have.
                    trace!("selection truncated at {key}: {reason:?}");
                    truncated = true;
                    ended = env.outcome(&world).is_over();
                    break;
                }
            }
        }

        if ended {
            if let GameOutcome::Decided(z) = env.outcome(&world) {
                self.store.cache_terminal(key, z);
            }
        }

        // Expand: query the oracle once for the new leaf.
        let mut value = 0.0_f32;
        let mut expanded = false;
        if self.store.terminal_value(key).is_none() && !self.store.is_expanded(key) {
            let mask = env.valid_moves(&world);
            if !mask.any_legal() {
                if path.is_empty() {
                    return Err(SearchError::DeadEnd { key });
                }
                truncated = true;
            } else {
                let prediction = oracle
                    .predict(&features)
                    .map_err(|source| SearchError::Oracle { key, source })?;
                let priors = prediction
                    .priors
                    .masked(&mask, self.config.prior_floor)
                    .unwrap_or_else(|| PolicyGrid::uniform_over(&mask));
                self.store.insert_prior(key, priors);

                value = prediction.value.clamp(-1.0, 1.0);
                // The oracle values states for their own mover; flip to the
                // fixed root perspective.
                if env.to_move(&world) != Seat::First {
                    value = -value;
                }
                expanded = true;
            }
        }

        // Simulate: random rollout past the oracle's reach, for a cheap
        // end-of-game signal. A truncated path goes straight to
        // backpropagation: no oracle estimate exists for this simulation,
        // so a rollout outcome would have nothing sound to blend with.
        let mut rollout_steps = 0_usize;
        while !ended
            && !truncated
            && self.store.terminal_value(key).is_none()
            && rollout_steps < self.config.max_rollout_steps
        {
            let mask = env.valid_moves(&world);
            let Some(action) = self.uniform_legal(&mask) else {
                truncated = true;
                break;
            };
            match env.apply(&mut world, action) {
                StepOutcome::Advanced { features: next, .. } => {
                    key = env.fingerprint(&next);
                }
                StepOutcome::Finished { features: next } => {
                    key = env.fingerprint(&next);
                    ended = true;
                }
                StepOutcome::Rejected(reason) => {
                    trace!("rollout truncated at {key}: {reason:?}");
                    truncated = true;
                    break;
                }
            }
            rollout_steps += 1;
        }

        if ended && self.store.terminal_value(key).is_none() {
            if let GameOutcome::Decided(z) = env.outcome(&world) {
                // Dampen single-rollout variance while still grounding the
                // estimate in a real outcome.
                value = self.config.oracle_blend * value + (1.0 - self.config.oracle_blend) * z;
            }
        }
        if let Some(z) = self.store.terminal_value(key) {
            value = z;
        }

        // Backpropagate: signed updates along the recorded path, in reverse.
        for step in path.iter().rev() {
            let signed = if step.actor == Seat::First {
                value
            } else {
                -value
            };
            self.store.record_edge(step.key, step.action, signed);
            self.store.bump_node_visits(step.key);
        }
        if path.is_empty() {
            // The root still counts this simulation even when selection
            // never left it.
            self.store.bump_node_visits(root_key);
        }

        Ok(SimulationMetrics {
            path_len: path.len(),
            value,
            expanded,
            rollout_steps,
            truncated,
        })
    }

    /// Expand the root up front so every budgeted simulation selects a
    /// root edge and root visit counts sum to the simulation budget.
    /// No-op for terminal or already-expanded roots.
    fn ensure_root_expanded<G: GameEnv, O: Oracle>(
        &mut self,
        env: &G,
        oracle: &O,
        root: &G::State,
    ) -> Result<(), SearchError> {
        let features = env.encode(root);
        let key = env.fingerprint(&features);
        if env.outcome(root).is_over()
            || self.store.is_expanded(key)
            || self.store.terminal_value(key).is_some()
        {
            return Ok(());
        }

        let mask = env.valid_moves(root);
        if !mask.any_legal() {
            return Err(SearchError::DeadEnd { key });
        }

        let prediction = oracle
            .predict(&features)
            .map_err(|source| SearchError::Oracle { key, source })?;
        let priors = prediction
            .priors
            .masked(&mask, self.config.prior_floor)
            .unwrap_or_else(|| PolicyGrid::uniform_over(&mask));
        self.store.insert_prior(key, priors);
        Ok(())
    }

    /// PUCT upper-confidence selection over the legal actions of an
    /// expanded node. Ties break to the first action in scan order.
    fn select_action(&self, key: StateKey, mask: &ActionMask) -> Option<Action> {
        let priors = self.store.prior(key)?;
        let parent_visits = self.store.node_visits(key) as f32;
        let sqrt_visited = parent_visits.sqrt();
        let sqrt_unvisited = (parent_visits + VISIT_EPS).sqrt();

        let mut best: Option<(Action, f32)> = None;
        for action in mask.legal() {
            let prior = priors.get(action);
            let score = match self.store.edge(key, action) {
                Some(edge) => {
                    edge.q()
                        + self.config.cpuct * prior * sqrt_visited
                            / (1.0 + edge.visits() as f32)
                }
                None => self.config.cpuct * prior * sqrt_unvisited,
            };
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((action, score));
            }
        }

        best.map(|(action, _)| action)
    }

    /// Uniformly random legal action from the full validity mask.
    fn uniform_legal(&mut self, mask: &ActionMask) -> Option<Action> {
        let legal: Vec<Action> = mask.legal().collect();
        if legal.is_empty() {
            return None;
        }
        Some(legal[self.rng.gen_range(0..legal.len())])
    }
}
