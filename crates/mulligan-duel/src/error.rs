use thiserror::Error;

#[derive(Debug, Error)]
/// Error type for duel ruleset loading, validation, and compilation.
pub enum DuelError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("card id must not be empty")]
    EmptyCardId,

    #[error("duplicate card id '{id}'")]
    DuplicateCardId { id: String },

    #[error("card '{id}' has invalid cost {cost}: must be at most {max}")]
    InvalidCost { id: String, cost: u8, max: u8 },

    #[error("card '{id}' has invalid attack {attack}: must be non-negative")]
    InvalidAttack { id: String, attack: i32 },

    #[error("card '{id}' has invalid health {health}: must be positive")]
    InvalidHealth { id: String, health: i32 },

    #[error("deck for the {seat} seat is empty")]
    EmptyDeck { seat: &'static str },

    #[error("deck for the {seat} seat has {size} cards: at most {max} allowed")]
    DeckTooLarge {
        seat: &'static str,
        size: usize,
        max: usize,
    },

    #[error("deck for the {seat} seat references unknown card '{card}'")]
    UnknownDeckCard { seat: &'static str, card: String },
}
