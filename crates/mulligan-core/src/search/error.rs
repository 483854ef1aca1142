use thiserror::Error;

use crate::search::{env::OracleError, key::StateKey};

/// Error type for search runs and probability extraction.
///
/// Individual simulation hiccups (rejected actions, truncated rollouts)
/// are absorbed inside the engine; only collaborator contract breaches
/// surface here.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The oracle could not be queried for a leaf encoding.
    #[error("oracle failed for state {key}: {source}")]
    Oracle {
        key: StateKey,
        #[source]
        source: OracleError,
    },

    /// A non-terminal state exposed no legal action. The environment
    /// guarantees this never happens for reachable states.
    #[error("state {key} is not terminal but has no legal actions")]
    DeadEnd { key: StateKey },

    /// Probability extraction found no visits at the root.
    #[error("no root statistics recorded for state {key}")]
    NoRootStatistics { key: StateKey },
}
