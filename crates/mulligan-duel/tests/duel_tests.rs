use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use mulligan_core::{
    Action, GameEnv, GameOutcome, Mcts, SearchConfig, Seat, StepOutcome, FIRST_FIELD_SLOT,
    NO_TARGET,
};
use mulligan_duel::{
    CardId, DuelEnv, DuelError, DuelSpec, HealthOracle, Minion, FEATURE_LEN, HERO_HEALTH,
};

const VALID_DUEL_YAML: &str = r#"
version: 1
cards:
  - id: sprite
    cost: 1
    attack: 1
    health: 1
  - id: golem
    cost: 2
    attack: 2
    health: 3
  - id: ogre
    cost: 3
    attack: 4
    health: 4
first_deck:
  [sprite, sprite, sprite, sprite, golem, golem, golem, golem, ogre, ogre, ogre, ogre]
second_deck:
  [sprite, sprite, sprite, sprite, golem, golem, golem, golem, ogre, ogre, ogre, ogre]
"#;

fn compiled_env() -> DuelEnv {
    let spec: DuelSpec = serde_yaml::from_str(VALID_DUEL_YAML).expect("valid yaml");
    DuelEnv::new(spec.compile().expect("compile should succeed"))
}

#[test]
fn yaml_parse_and_compile_success() {
    let spec: DuelSpec = serde_yaml::from_str(VALID_DUEL_YAML).expect("valid yaml");
    let compiled = spec.compile().expect("compile should succeed");

    assert_eq!(compiled.card_count(), 3);
    let sprite = compiled.card_key("sprite").expect("known card");
    assert_eq!(compiled.card_id(sprite), Some("sprite"));
    assert_eq!(compiled.deck(Seat::First).len(), 12);
}

#[test]
fn validation_fails_for_duplicate_card_id() {
    let yaml = r#"
cards:
  - id: sprite
    cost: 1
    attack: 1
    health: 1
  - id: sprite
    cost: 2
    attack: 2
    health: 2
first_deck: [sprite]
second_deck: [sprite]
"#;
    let spec: DuelSpec = serde_yaml::from_str(yaml).expect("valid syntax");
    let err = spec.compile().expect_err("compile should fail");
    assert!(matches!(err, DuelError::DuplicateCardId { .. }));
}

#[test]
fn validation_fails_for_unknown_deck_card() {
    let yaml = r#"
cards:
  - id: sprite
    cost: 1
    attack: 1
    health: 1
first_deck: [sprite, dragon]
second_deck: [sprite]
"#;
    let spec: DuelSpec = serde_yaml::from_str(yaml).expect("valid syntax");
    let err = spec.compile().expect_err("compile should fail");
    assert!(matches!(err, DuelError::UnknownDeckCard { .. }));
}

#[test]
fn validation_fails_for_non_positive_health() {
    let yaml = r#"
cards:
  - id: ghost
    cost: 1
    attack: 1
    health: 0
first_deck: [ghost]
second_deck: [ghost]
"#;
    let spec: DuelSpec = serde_yaml::from_str(yaml).expect("valid syntax");
    let err = spec.compile().expect_err("compile should fail");
    assert!(matches!(err, DuelError::InvalidHealth { .. }));
}

#[test]
fn new_games_deal_opening_hands_and_mana() {
    let env = compiled_env();
    let state = env.new_game(7);

    assert_eq!(state.to_move, Seat::First);
    assert_eq!(state.side(Seat::First).hand.len(), 3);
    assert_eq!(state.side(Seat::Second).hand.len(), 4);
    assert_eq!(state.side(Seat::First).mana, 1);
    assert_eq!(state.side(Seat::Second).mana, 0);
    assert_eq!(state.side(Seat::First).hero_health, HERO_HEALTH);
    assert_eq!(env.outcome(&state), GameOutcome::Ongoing);
    assert_eq!(env.encode(&state).len(), FEATURE_LEN);

    // Same seed, same deal.
    assert_eq!(env.new_game(7), state);
    assert_ne!(env.new_game(8), state);
}

#[test]
fn redeal_preserves_the_hidden_multiset_and_visible_state() {
    let env = compiled_env();
    let state = env.new_game(3);
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let world = env.redeal_hidden(&state, &mut rng);

    // The mover's hand and everything on the table are untouched.
    assert_eq!(world.side(Seat::First).hand, state.side(Seat::First).hand);
    assert_eq!(world.to_move, state.to_move);
    assert_eq!(env.encode(&world), env.encode(&state));

    // The rival's hand plus deck keep the same cards overall.
    let pool = |s: &mulligan_duel::DuelState| {
        let side = s.side(Seat::Second);
        let mut cards: Vec<usize> = side
            .hand
            .iter()
            .chain(side.deck.iter())
            .map(|c| c.index())
            .collect();
        cards.sort_unstable();
        cards
    };
    assert_eq!(pool(&world), pool(&state));
}

#[test]
fn successive_redeals_produce_different_worlds() {
    let env = compiled_env();
    let state = env.new_game(3);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let a = env.redeal_hidden(&state, &mut rng);
    let b = env.redeal_hidden(&state, &mut rng);
    // 16 hidden cards: two identical shuffles in a row would be a bug.
    assert_ne!(a, b);
}

#[test]
fn ending_the_turn_ramps_and_draws() {
    let env = compiled_env();
    let mut state = env.new_game(11);

    let before = state.side(Seat::Second).hand.len();
    let outcome = env.apply(&mut state, Action::end_turn());
    assert!(matches!(outcome, StepOutcome::Advanced { to_move: Seat::Second, .. }));
    assert_eq!(state.to_move, Seat::Second);
    assert_eq!(state.side(Seat::Second).mana, 1);
    assert_eq!(state.side(Seat::Second).max_mana, 1);
    assert_eq!(state.side(Seat::Second).hand.len(), before + 1);
}

#[test]
fn a_lethal_attack_finishes_the_game() {
    let env = compiled_env();
    let mut state = env.new_game(2);
    state.side_mut(Seat::Second).hero_health = 1;
    state.side_mut(Seat::First).field.push(Minion {
        card: CardId::from(0),
        attack: 1,
        health: 1,
        exhausted: false,
    });

    let attack = Action::new(FIRST_FIELD_SLOT, NO_TARGET);
    assert!(env.valid_moves(&state).is_legal(attack));
    let outcome = env.apply(&mut state, attack);
    assert!(matches!(outcome, StepOutcome::Finished { .. }));
    assert_eq!(env.outcome(&state), GameOutcome::Decided(1.0));
}

#[test]
fn empty_decks_deal_growing_fatigue_damage() {
    let env = compiled_env();
    let mut state = env.new_game(4);
    state.side_mut(Seat::Second).deck.clear();

    env.apply(&mut state, Action::end_turn());
    assert_eq!(
        state.side(Seat::Second).hero_health,
        HERO_HEALTH - 1,
        "first empty draw deals 1"
    );
    assert_eq!(state.side(Seat::Second).fatigue, 1);
}

#[test]
fn search_produces_a_distribution_over_legal_moves() {
    let env = compiled_env();
    let state = env.new_game(21);
    let config = SearchConfig {
        simulations: 50,
        ..SearchConfig::default()
    };
    let mut mcts = Mcts::new(config, 17).expect("valid config");

    mcts.run(&env, &HealthOracle, &state).expect("search succeeds");
    let probs = mcts
        .action_probabilities(&env, &state, 1.0)
        .expect("root has statistics");

    assert!((probs.sum() - 1.0).abs() < 1e-4);
    let mask = env.valid_moves(&state);
    for (action, p) in probs.iter() {
        if p > 0.0 {
            assert!(mask.is_legal(action), "mass on illegal action {action}");
        }
    }
}
