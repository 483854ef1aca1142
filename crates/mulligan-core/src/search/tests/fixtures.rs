//! A deliberately tiny two-seat duel used to exercise the engine without
//! a real rule engine: a few untargeted attacks of fixed damage, an
//! end-turn action, a turn cap, and a hidden opponent deck that only
//! matters to determinization.

use std::cell::Cell;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::search::{
    action::{Action, ActionMask, PolicyGrid, END_TURN_SLOT},
    env::{
        Features, GameEnv, GameOutcome, Oracle, OracleError, Prediction, Seat, StepOutcome,
        StepRejection,
    },
};

pub const DRAW_VALUE: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct TinyState {
    pub hp: [i32; 2],
    pub to_move: Seat,
    pub turn: u32,
    pub opp_deck: Vec<u8>,
    pub over: bool,
}

/// Environment with one attack slot per entry of `attack_damage` plus the
/// end-turn action. Attacks hit the rival hero directly.
#[derive(Debug, Clone)]
pub struct TinyDuel {
    pub attack_damage: Vec<i32>,
    pub start_hp: i32,
    pub turn_cap: u32,
}

impl TinyDuel {
    pub fn new(attack_damage: Vec<i32>) -> Self {
        TinyDuel {
            attack_damage,
            start_hp: 6,
            turn_cap: 40,
        }
    }

    pub fn start(&self) -> TinyState {
        TinyState {
            hp: [self.start_hp, self.start_hp],
            to_move: Seat::First,
            turn: 0,
            opp_deck: (0..8).collect(),
            over: false,
        }
    }

    fn seat_index(seat: Seat) -> usize {
        match seat {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

impl GameEnv for TinyDuel {
    type State = TinyState;

    fn valid_moves(&self, state: &Self::State) -> ActionMask {
        let mut mask = ActionMask::none();
        if state.over {
            return mask;
        }
        for slot in 0..self.attack_damage.len() as u8 {
            mask.allow(Action::untargeted(slot));
        }
        mask.allow(Action::end_turn());
        mask
    }

    fn encode(&self, state: &Self::State) -> Features {
        // Visible information only; the hidden deck is not part of the
        // information set and must not affect the fingerprint.
        vec![
            state.hp[0] as f32,
            state.hp[1] as f32,
            TinyDuel::seat_index(state.to_move) as f32,
            state.turn as f32,
            state.over as u8 as f32,
        ]
    }

    fn outcome(&self, state: &Self::State) -> GameOutcome {
        if state.hp[1] <= 0 {
            GameOutcome::Decided(1.0)
        } else if state.hp[0] <= 0 {
            GameOutcome::Decided(-1.0)
        } else if state.turn > self.turn_cap {
            GameOutcome::Decided(DRAW_VALUE)
        } else {
            GameOutcome::Ongoing
        }
    }

    fn to_move(&self, state: &Self::State) -> Seat {
        state.to_move
    }

    fn apply(&self, state: &mut Self::State, action: Action) -> StepOutcome {
        if state.over {
            return StepOutcome::Rejected(StepRejection::GameOver);
        }
        if !self.valid_moves(state).is_legal(action) {
            return StepOutcome::Rejected(StepRejection::IllegalAction);
        }

        if action.slot == END_TURN_SLOT {
            state.to_move = state.to_move.rival();
            state.turn += 1;
            if state.turn > self.turn_cap {
                state.over = true;
                return StepOutcome::Finished {
                    features: self.encode(state),
                };
            }
            return StepOutcome::Advanced {
                features: self.encode(state),
                to_move: state.to_move,
            };
        }

        let damage = self.attack_damage[action.slot as usize];
        let rival = TinyDuel::seat_index(state.to_move.rival());
        state.hp[rival] -= damage;
        if state.hp[rival] <= 0 {
            state.over = true;
            return StepOutcome::Finished {
                features: self.encode(state),
            };
        }
        StepOutcome::Advanced {
            features: self.encode(state),
            to_move: state.to_move,
        }
    }

    fn redeal_hidden<R: Rng>(&self, state: &Self::State, rng: &mut R) -> Self::State {
        let mut clone = state.clone();
        clone.opp_deck.shuffle(rng);
        clone
    }
}

/// Oracle that concentrates its prior on one action.
#[derive(Debug, Clone)]
pub struct BiasOracle {
    pub favorite: Action,
    pub value: f32,
}

impl Oracle for BiasOracle {
    fn predict(&self, _features: &Features) -> Result<Prediction, OracleError> {
        let mut priors = PolicyGrid::zeroed();
        priors.set(self.favorite, 1.0);
        Ok(Prediction {
            priors,
            value: self.value,
        })
    }
}

/// Oracle that always fails, for contract-breach propagation tests.
#[derive(Debug, Clone, Copy)]
pub struct BrokenOracle;

impl Oracle for BrokenOracle {
    fn predict(&self, _features: &Features) -> Result<Prediction, OracleError> {
        Err(OracleError::new("inference backend unreachable"))
    }
}

/// Wrapper that counts predictions, for "the oracle was never queried"
/// assertions.
pub struct CountingOracle<O> {
    pub inner: O,
    pub calls: Cell<usize>,
}

impl<O> CountingOracle<O> {
    pub fn new(inner: O) -> Self {
        CountingOracle {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    fn predict(&self, features: &Features) -> Result<Prediction, OracleError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.predict(features)
    }
}
