use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledDuel, DuelError};

/// Highest mana cost a card may declare; matches the mana ramp cap.
pub const MAX_COST: u8 = 10;

/// Largest deck either seat may bring.
pub const MAX_DECK_SIZE: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable ruleset schema used for YAML IO and validation: the card
/// pool plus one decklist per seat.
pub struct DuelSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// All card declarations in the pool.
    pub cards: Vec<CardSpec>,
    /// Decklist for the seat that opens the game, as card ids.
    pub first_deck: Vec<String>,
    /// Decklist for the other seat.
    pub second_deck: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single minion card declaration.
pub struct CardSpec {
    /// Unique card id.
    pub id: String,
    /// Mana cost to play.
    pub cost: u8,
    /// Attack of the summoned minion.
    pub attack: i32,
    /// Health of the summoned minion.
    pub health: i32,
}

impl DuelSpec {
    /// Validate card ids, stat ranges, and decklist references.
    pub fn validate(&self) -> Result<(), DuelError> {
        let mut ids = HashSet::with_capacity(self.cards.len());
        for card in &self.cards {
            if card.id.trim().is_empty() {
                return Err(DuelError::EmptyCardId);
            }
            if !ids.insert(card.id.as_str()) {
                return Err(DuelError::DuplicateCardId {
                    id: card.id.clone(),
                });
            }
            if card.cost > MAX_COST {
                return Err(DuelError::InvalidCost {
                    id: card.id.clone(),
                    cost: card.cost,
                    max: MAX_COST,
                });
            }
            if card.attack < 0 {
                return Err(DuelError::InvalidAttack {
                    id: card.id.clone(),
                    attack: card.attack,
                });
            }
            if card.health <= 0 {
                return Err(DuelError::InvalidHealth {
                    id: card.id.clone(),
                    health: card.health,
                });
            }
        }

        for (seat, deck) in [("first", &self.first_deck), ("second", &self.second_deck)] {
            if deck.is_empty() {
                return Err(DuelError::EmptyDeck { seat });
            }
            if deck.len() > MAX_DECK_SIZE {
                return Err(DuelError::DeckTooLarge {
                    seat,
                    size: deck.len(),
                    max: MAX_DECK_SIZE,
                });
            }
            for card in deck {
                if !ids.contains(card.as_str()) {
                    return Err(DuelError::UnknownDeckCard {
                        seat,
                        card: card.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Validate and compile the spec into a fast runtime representation.
    pub fn compile(&self) -> Result<CompiledDuel, DuelError> {
        CompiledDuel::from_spec(self)
    }
}
