use log::debug;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mulligan_core::{
    Action, ActionMask, Features, GameEnv, GameOutcome, Seat, StepOutcome, StepRejection,
    END_TURN_SLOT, FIRST_FIELD_SLOT, HERO_POWER_SLOT, NO_TARGET,
};

use crate::{
    compiled::CompiledDuel,
    state::{
        DuelState, Minion, SideState, HERO_HEALTH, MAX_FIELD_SIZE, MAX_HAND_SIZE, MAX_MANA,
        TURN_CAP,
    },
};

/// Mana cost of the hero power.
pub const POWER_COST: u8 = 2;
/// Damage the hero power deals to the rival hero.
pub const POWER_DAMAGE: i32 = 1;
/// Signed score for a turn-capped game: non-zero so it never reads as
/// an unfinished game, small so it never outweighs a real result.
pub const DRAW_SCORE: f32 = 1e-4;

/// Cards the opening seat draws; the other seat draws one more to offset
/// the tempo of moving first.
const FIRST_DRAW: usize = 3;
const SECOND_DRAW: usize = 4;

// Feature layout. Hidden zones (the rival's hand contents and both deck
// orders) are deliberately absent so every determinization of one
// information set shares a fingerprint.
pub(crate) const FEAT_TO_MOVE: usize = 0;
const FEAT_TURN: usize = 1;
const SIDE_BASE: usize = 2;
const SIDE_STRIDE: usize = 7;
pub(crate) const FEAT_FIRST_HERO: usize = SIDE_BASE;
pub(crate) const FEAT_SECOND_HERO: usize = SIDE_BASE + SIDE_STRIDE;
const HAND_BASE: usize = SIDE_BASE + 2 * SIDE_STRIDE;
const HAND_CARD_STRIDE: usize = 3;
const FIELD_BASE: usize = HAND_BASE + MAX_HAND_SIZE * HAND_CARD_STRIDE;
const FIELD_MINION_STRIDE: usize = 3;
const FIELD_SIDE_STRIDE: usize = MAX_FIELD_SIZE * FIELD_MINION_STRIDE;

/// Total feature vector length.
pub const FEATURE_LEN: usize = FIELD_BASE + 2 * FIELD_SIDE_STRIDE;

/// Rule engine for the duel: owns the compiled ruleset and adapts it to
/// the search engine's environment contract.
#[derive(Debug, Clone)]
pub struct DuelEnv {
    rules: CompiledDuel,
}

impl DuelEnv {
    pub fn new(rules: CompiledDuel) -> Self {
        DuelEnv { rules }
    }

    /// Borrow the compiled ruleset.
    pub fn rules(&self) -> &CompiledDuel {
        &self.rules
    }

    /// Deal a fresh game: shuffle both decks, draw the opening hands, and
    /// give the opening seat its first mana crystal.
    pub fn new_game(&self, seed: u64) -> DuelState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut side = |seat: Seat, draw: usize| {
            let mut deck: Vec<_> = self.rules.deck(seat).to_vec();
            deck.shuffle(&mut rng);
            let hand = deck.split_off(deck.len().saturating_sub(draw));
            SideState {
                hero_health: HERO_HEALTH,
                mana: 0,
                max_mana: 0,
                power_used: false,
                hand,
                deck,
                field: Vec::new(),
                fatigue: 0,
            }
        };

        let mut state = DuelState {
            sides: [side(Seat::First, FIRST_DRAW), side(Seat::Second, SECOND_DRAW)],
            to_move: Seat::First,
            turn: 0,
        };
        let opener = state.side_mut(Seat::First);
        opener.max_mana = 1;
        opener.mana = 1;

        debug!(
            "dealt new game: {} vs {} cards in deck",
            state.side(Seat::First).deck.len(),
            state.side(Seat::Second).deck.len(),
        );
        state
    }

    fn start_turn(side: &mut SideState) {
        side.max_mana = (side.max_mana + 1).min(MAX_MANA);
        side.mana = side.max_mana;
        side.power_used = false;
        for minion in &mut side.field {
            minion.exhausted = false;
        }
        match side.deck.pop() {
            Some(card) => {
                // Overdraw burns the card.
                if side.hand.len() < MAX_HAND_SIZE {
                    side.hand.push(card);
                }
            }
            None => {
                side.fatigue += 1;
                side.hero_health -= side.fatigue;
            }
        }
    }

    fn resolve(&self, state: &mut DuelState, action: Action) {
        let actor = state.to_move;
        if action.slot == END_TURN_SLOT {
            // Priority passes and the new side ramps and draws.
            state.to_move = actor.rival();
            state.turn += 1;
            DuelEnv::start_turn(state.side_mut(actor.rival()));
            return;
        }

        let [first, second] = &mut state.sides;
        let (side, rival) = match actor {
            Seat::First => (first, second),
            Seat::Second => (second, first),
        };

        if action.slot < FIRST_FIELD_SLOT {
            let card = side.hand.remove(action.slot as usize);
            let stats = self.rules.stats(card);
            side.mana -= stats.cost;
            side.field.push(Minion {
                card,
                attack: stats.attack,
                health: stats.health,
                exhausted: true,
            });
        } else if action.slot < HERO_POWER_SLOT {
            let attacker = (action.slot - FIRST_FIELD_SLOT) as usize;
            side.field[attacker].exhausted = true;
            let attack = side.field[attacker].attack;
            if action.target == NO_TARGET {
                rival.hero_health -= attack;
            } else {
                let defender = (action.target - 1) as usize;
                rival.field[defender].health -= attack;
                side.field[attacker].health -= rival.field[defender].attack;
                rival.field.retain(|m| m.health > 0);
                side.field.retain(|m| m.health > 0);
            }
        } else if action.slot == HERO_POWER_SLOT {
            side.mana -= POWER_COST;
            side.power_used = true;
            rival.hero_health -= POWER_DAMAGE;
        }
    }
}

impl GameEnv for DuelEnv {
    type State = DuelState;

    fn valid_moves(&self, state: &Self::State) -> ActionMask {
        let mut mask = ActionMask::none();
        if self.outcome(state).is_over() {
            return mask;
        }

        let side = state.side(state.to_move);
        let rival = state.side(state.to_move.rival());

        for (i, card) in side.hand.iter().take(MAX_HAND_SIZE).enumerate() {
            let stats = self.rules.stats(*card);
            if stats.cost <= side.mana && side.field.len() < MAX_FIELD_SIZE {
                mask.allow(Action::untargeted(i as u8));
            }
        }

        for (i, minion) in side.field.iter().take(MAX_FIELD_SIZE).enumerate() {
            if minion.exhausted || minion.attack <= 0 {
                continue;
            }
            let slot = FIRST_FIELD_SLOT + i as u8;
            // Target 0 is the rival hero; targets 1..=7 index the rival field.
            mask.allow(Action::new(slot, NO_TARGET));
            for j in 0..rival.field.len().min(MAX_FIELD_SIZE) {
                mask.allow(Action::new(slot, j as u8 + 1));
            }
        }

        if side.mana >= POWER_COST && !side.power_used {
            mask.allow(Action::untargeted(HERO_POWER_SLOT));
        }

        mask.allow(Action::end_turn());
        mask
    }

    fn encode(&self, state: &Self::State) -> Features {
        let mut features = vec![0.0_f32; FEATURE_LEN];
        features[FEAT_TO_MOVE] = DuelState::seat_index(state.to_move) as f32;
        features[FEAT_TURN] = state.turn as f32;

        for (idx, side) in state.sides.iter().enumerate() {
            let base = SIDE_BASE + idx * SIDE_STRIDE;
            features[base] = side.hero_health as f32;
            features[base + 1] = side.mana as f32;
            features[base + 2] = side.max_mana as f32;
            features[base + 3] = side.power_used as u8 as f32;
            features[base + 4] = side.hand.len() as f32;
            features[base + 5] = side.deck.len() as f32;
            features[base + 6] = side.fatigue as f32;
        }

        // Only the mover's hand contents are visible.
        let hand = &state.side(state.to_move).hand;
        for (i, card) in hand.iter().take(MAX_HAND_SIZE).enumerate() {
            let stats = self.rules.stats(*card);
            let base = HAND_BASE + i * HAND_CARD_STRIDE;
            features[base] = stats.cost as f32;
            features[base + 1] = stats.attack as f32;
            features[base + 2] = stats.health as f32;
        }

        for (idx, side) in state.sides.iter().enumerate() {
            for (i, minion) in side.field.iter().take(MAX_FIELD_SIZE).enumerate() {
                let base = FIELD_BASE + idx * FIELD_SIDE_STRIDE + i * FIELD_MINION_STRIDE;
                features[base] = minion.attack as f32;
                features[base + 1] = minion.health as f32;
                features[base + 2] = minion.exhausted as u8 as f32;
            }
        }

        features
    }

    fn outcome(&self, state: &Self::State) -> GameOutcome {
        if state.side(Seat::First).hero_health <= 0 {
            GameOutcome::Decided(-1.0)
        } else if state.side(Seat::Second).hero_health <= 0 {
            GameOutcome::Decided(1.0)
        } else if state.turn > TURN_CAP {
            GameOutcome::Decided(DRAW_SCORE)
        } else {
            GameOutcome::Ongoing
        }
    }

    fn to_move(&self, state: &Self::State) -> Seat {
        state.to_move
    }

    fn apply(&self, state: &mut Self::State, action: Action) -> StepOutcome {
        if self.outcome(state).is_over() {
            return StepOutcome::Rejected(StepRejection::GameOver);
        }
        if !self.valid_moves(state).is_legal(action) {
            return StepOutcome::Rejected(StepRejection::IllegalAction);
        }

        self.resolve(state, action);

        let features = self.encode(state);
        if self.outcome(state).is_over() {
            StepOutcome::Finished { features }
        } else {
            StepOutcome::Advanced {
                features,
                to_move: state.to_move,
            }
        }
    }

    fn redeal_hidden<R: Rng>(&self, state: &Self::State, rng: &mut R) -> Self::State {
        let mut world = state.clone();
        let rival = world.side_mut(state.to_move.rival());

        // Pool the rival's hand and deck, shuffle, and redeal the same
        // counts: the card multiset is preserved exactly.
        let hand_size = rival.hand.len();
        let mut pool = std::mem::take(&mut rival.deck);
        pool.append(&mut rival.hand);
        pool.shuffle(rng);
        rival.hand = pool.split_off(pool.len() - hand_size);
        rival.deck = pool;

        // The mover's own deck order is hidden from them too.
        world.side_mut(state.to_move).deck.shuffle(rng);
        world
    }
}
