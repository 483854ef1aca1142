use std::collections::HashMap;

use mulligan_core::Seat;

use crate::{DuelError, DuelSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Dense index for cards in a compiled ruleset.
pub struct CardId(usize);

impl CardId {
    /// Return the underlying card index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for CardId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy)]
/// Resolved stats of one card.
pub struct CardStats {
    pub cost: u8,
    pub attack: i32,
    pub health: i32,
}

#[derive(Debug, Clone)]
/// Runtime form of a duel ruleset with resolved decklists and dense card ids.
pub struct CompiledDuel {
    cards: Vec<CardStats>,
    card_ids: Vec<String>,
    card_id_to_key: HashMap<String, CardId>,
    decks: [Vec<CardId>; 2],
}

impl CompiledDuel {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &DuelSpec) -> Result<Self, DuelError> {
        spec.validate()?;

        let mut card_id_to_key = HashMap::with_capacity(spec.cards.len());
        let mut card_ids = Vec::with_capacity(spec.cards.len());
        let mut cards = Vec::with_capacity(spec.cards.len());

        for (idx, card) in spec.cards.iter().enumerate() {
            card_id_to_key.insert(card.id.clone(), CardId::from(idx));
            card_ids.push(card.id.clone());
            cards.push(CardStats {
                cost: card.cost,
                attack: card.attack,
                health: card.health,
            });
        }

        let resolve = |seat: &'static str, deck: &[String]| -> Result<Vec<CardId>, DuelError> {
            deck.iter()
                .map(|id| {
                    card_id_to_key
                        .get(id)
                        .copied()
                        .ok_or_else(|| DuelError::UnknownDeckCard {
                            seat,
                            card: id.clone(),
                        })
                })
                .collect()
        };

        let decks = [
            resolve("first", &spec.first_deck)?,
            resolve("second", &spec.second_deck)?,
        ];

        Ok(Self {
            cards,
            card_ids,
            card_id_to_key,
            decks,
        })
    }

    /// Return the number of distinct cards in the pool.
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Resolved stats for a card.
    pub fn stats(&self, card: CardId) -> CardStats {
        self.cards[card.index()]
    }

    /// Convert a card key back to its original string id.
    pub fn card_id(&self, card: CardId) -> Option<&str> {
        self.card_ids.get(card.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled card key.
    pub fn card_key(&self, id: &str) -> Option<CardId> {
        self.card_id_to_key.get(id).copied()
    }

    /// The decklist a seat starts the game with.
    pub fn deck(&self, seat: Seat) -> &[CardId] {
        match seat {
            Seat::First => &self.decks[0],
            Seat::Second => &self.decks[1],
        }
    }
}
