use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Fingerprint of a game state, derived from its feature encoding.
/// This is the sole identity used for statistics lookups, so it must be
/// deterministic and must not depend on search metadata.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(u64);

impl StateKey {
    /// Return the internal numeric representation of this key.
    pub fn value(self) -> u64 {
        self.0
    }

    /// Hash a feature encoding into a key.
    ///
    /// Uses `FxHasher` over the raw bit patterns: the std hasher is
    /// randomly keyed per process, which would break fingerprint
    /// determinism across runs. Bit-identical encodings always map to the
    /// same key.
    pub fn of(features: &[f32]) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write_usize(features.len());
        for feature in features {
            hasher.write_u32(feature.to_bits());
        }
        StateKey(hasher.finish())
    }
}

impl From<u64> for StateKey {
    /// Allow explicit conversion from u64 to StateKey.
    fn from(value: u64) -> Self {
        StateKey(value)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_encodings_yield_identical_keys() {
        let features = vec![0.0, 1.0, -3.5, 42.0];
        assert_eq!(StateKey::of(&features), StateKey::of(&features.clone()));
    }

    #[test]
    fn differing_encodings_yield_differing_keys() {
        let a = vec![0.0, 1.0, 2.0];
        let b = vec![0.0, 1.0, 3.0];
        assert_ne!(StateKey::of(&a), StateKey::of(&b));
        // Length is part of the identity: a zero-padded encoding is distinct.
        let c = vec![0.0, 1.0, 2.0, 0.0];
        assert_ne!(StateKey::of(&a), StateKey::of(&c));
    }
}
