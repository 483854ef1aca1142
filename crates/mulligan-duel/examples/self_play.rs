//! Play one full game of the bundled basic ruleset against itself, running
//! a fresh search for every decision and printing the chosen line.
//!
//! Run with `RUST_LOG=debug` to see per-run search summaries.

use mulligan_core::{
    GameEnv, GameOutcome, Mcts, RootSnapshot, SearchConfig, StepOutcome,
};
use mulligan_duel::{compile_yaml, DuelEnv, HealthOracle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let rules = compile_yaml(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/assets/basic.duel.yaml"
    ))?;
    let env = DuelEnv::new(rules);
    let oracle = HealthOracle;

    let config = SearchConfig::from_default_yaml()?;
    let mut mcts = Mcts::new(config, 42)?;
    let mut state = env.new_game(7);

    let mut ply = 0_usize;
    while env.outcome(&state) == GameOutcome::Ongoing && ply < 400 {
        // Statistics from one decision do not carry over to the next: the
        // mover (and thus the hidden information) changes as the game runs.
        mcts.reset();
        let metrics = mcts.run(&env, &oracle, &state)?;
        let probs = mcts.action_probabilities(&env, &state, 0.0)?;

        let chosen = probs
            .iter()
            .find(|(_, p)| *p > 0.0)
            .map(|(action, _)| action)
            .ok_or("empty move distribution")?;

        println!(
            "ply {ply:3}  seat {:?}  plays {}  (avg value {:+.3} over {} sims)",
            env.to_move(&state),
            chosen,
            metrics.average_value,
            metrics.simulations_completed,
        );

        if ply == 0 {
            let key = env.fingerprint(&env.encode(&state));
            let snapshot = RootSnapshot::capture(mcts.store(), key);
            println!("opening root: {}", snapshot.to_json()?);
        }

        match env.apply(&mut state, chosen) {
            StepOutcome::Advanced { .. } => {}
            StepOutcome::Finished { .. } => break,
            StepOutcome::Rejected(reason) => return Err(format!("{reason:?}").into()),
        }
        ply += 1;
    }

    match env.outcome(&state) {
        GameOutcome::Decided(z) if z > 0.5 => println!("first seat wins"),
        GameOutcome::Decided(z) if z < -0.5 => println!("second seat wins"),
        GameOutcome::Decided(_) => println!("drawn at the turn cap"),
        GameOutcome::Ongoing => println!("stopped after {ply} plies"),
    }
    Ok(())
}
