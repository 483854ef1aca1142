use mulligan_core::Seat;

use crate::compiled::CardId;

/// Hand size cap; cards drawn past it are burned.
pub const MAX_HAND_SIZE: usize = 10;

/// Field size cap per side.
pub const MAX_FIELD_SIZE: usize = 7;

/// Hero starting health.
pub const HERO_HEALTH: i32 = 30;

/// Mana ramp cap.
pub const MAX_MANA: u8 = 10;

/// Turn count past which the game is scored as a draw.
pub const TURN_CAP: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One minion in play.
pub struct Minion {
    pub card: CardId,
    pub attack: i32,
    pub health: i32,
    /// Freshly summoned or already attacked this turn.
    pub exhausted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything one seat owns: hero, mana, hand, deck, field.
pub struct SideState {
    pub hero_health: i32,
    pub mana: u8,
    pub max_mana: u8,
    pub power_used: bool,
    pub hand: Vec<CardId>,
    /// Remaining deck, drawn from the back.
    pub deck: Vec<CardId>,
    pub field: Vec<Minion>,
    /// Cumulative damage taken per empty draw.
    pub fatigue: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Complete game state. Cloned once per simulation by determinization, so
/// it holds plain vectors and no interior references.
pub struct DuelState {
    pub sides: [SideState; 2],
    pub to_move: Seat,
    pub turn: u32,
}

impl DuelState {
    /// Borrow one seat's side.
    pub fn side(&self, seat: Seat) -> &SideState {
        &self.sides[DuelState::seat_index(seat)]
    }

    /// Mutably borrow one seat's side.
    pub fn side_mut(&mut self, seat: Seat) -> &mut SideState {
        &mut self.sides[DuelState::seat_index(seat)]
    }

    pub(crate) fn seat_index(seat: Seat) -> usize {
        match seat {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}
