use std::fmt;

/// Number of action slots (rows): hand cards, field minions, hero power,
/// hero attack, end turn, forced choice.
pub const SLOTS: usize = 21;

/// Number of target columns per slot: the no-target column plus up to 17
/// concrete targets.
pub const TARGETS: usize = 18;

/// First slot addressing a minion on the acting player's field.
pub const FIRST_FIELD_SLOT: u8 = 10;
/// Slot for using the hero power.
pub const HERO_POWER_SLOT: u8 = 17;
/// Slot for attacking with the hero itself.
pub const HERO_ATTACK_SLOT: u8 = 18;
/// Slot that ends the current turn.
pub const END_TURN_SLOT: u8 = 19;
/// Slot reserved for resolving a pending forced choice.
pub const CHOICE_SLOT: u8 = 20;
/// Target column used by untargeted actions.
pub const NO_TARGET: u8 = 0;

/// One entry in the two-level action grid: a playable source and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Action {
    pub slot: u8,
    pub target: u8,
}

impl Action {
    /// Build an action, panicking in debug builds when it lies outside the grid.
    pub fn new(slot: u8, target: u8) -> Self {
        debug_assert!((slot as usize) < SLOTS && (target as usize) < TARGETS);
        Action { slot, target }
    }

    /// An untargeted action in the given slot.
    pub fn untargeted(slot: u8) -> Self {
        Action::new(slot, NO_TARGET)
    }

    /// The end-turn action.
    pub fn end_turn() -> Self {
        Action::untargeted(END_TURN_SLOT)
    }

    /// Flat row-major index into the `SLOTS * TARGETS` grid.
    pub fn index(self) -> usize {
        self.slot as usize * TARGETS + self.target as usize
    }

    /// Whether this action ends the turn (the only action that passes priority).
    pub fn is_end_turn(self) -> bool {
        self.slot == END_TURN_SLOT
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.slot, self.target)
    }
}

/// Iterate the full grid in the fixed row-major scan order used for
/// deterministic tie-breaking.
pub fn scan_order() -> impl Iterator<Item = Action> {
    (0..SLOTS as u8)
        .flat_map(|slot| (0..TARGETS as u8).map(move |target| Action { slot, target }))
}

/// Boolean legality grid over the action space, produced per-state by the
/// environment adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionMask {
    grid: [[bool; TARGETS]; SLOTS],
}

impl ActionMask {
    /// Create a mask with every action illegal.
    pub fn none() -> Self {
        ActionMask {
            grid: [[false; TARGETS]; SLOTS],
        }
    }

    /// Mark one action as legal.
    pub fn allow(&mut self, action: Action) {
        self.grid[action.slot as usize][action.target as usize] = true;
    }

    /// Whether the given action is legal.
    pub fn is_legal(&self, action: Action) -> bool {
        self.grid[action.slot as usize][action.target as usize]
    }

    /// Count of legal actions.
    pub fn legal_count(&self) -> usize {
        self.legal().count()
    }

    /// Whether at least one action is legal.
    pub fn any_legal(&self) -> bool {
        self.legal().next().is_some()
    }

    /// Iterate legal actions in scan order.
    pub fn legal(&self) -> impl Iterator<Item = Action> + '_ {
        scan_order().filter(move |a| self.is_legal(*a))
    }
}

impl Default for ActionMask {
    fn default() -> Self {
        ActionMask::none()
    }
}

/// Dense `f32` grid over the action space. Used for oracle priors and for
/// extracted move probabilities; both are proper distributions over legal
/// entries with zero mass elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyGrid {
    grid: [[f32; TARGETS]; SLOTS],
}

impl PolicyGrid {
    /// Create an all-zero grid.
    pub fn zeroed() -> Self {
        PolicyGrid {
            grid: [[0.0; TARGETS]; SLOTS],
        }
    }

    /// Read one entry.
    pub fn get(&self, action: Action) -> f32 {
        self.grid[action.slot as usize][action.target as usize]
    }

    /// Write one entry.
    pub fn set(&mut self, action: Action, value: f32) {
        self.grid[action.slot as usize][action.target as usize] = value;
    }

    /// Sum over all entries.
    pub fn sum(&self) -> f32 {
        self.grid.iter().flatten().sum()
    }

    /// Iterate `(action, value)` pairs in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, f32)> + '_ {
        scan_order().map(move |a| (a, self.get(a)))
    }

    /// Uniform distribution over the legal actions of `mask`.
    /// All-zero when the mask has no legal action.
    pub fn uniform_over(mask: &ActionMask) -> Self {
        let mut out = PolicyGrid::zeroed();
        let count = mask.legal_count();
        if count == 0 {
            return out;
        }
        let share = 1.0 / count as f32;
        for action in mask.legal() {
            out.set(action, share);
        }
        out
    }

    /// Zero illegal entries, lift every legal entry by `floor`, and
    /// renormalize to sum 1 over legal actions.
    ///
    /// Returns `None` when the masked sum is not positive, in which case the
    /// caller should fall back to a uniform distribution over legal moves.
    pub fn masked(&self, mask: &ActionMask, floor: f32) -> Option<PolicyGrid> {
        let mut out = PolicyGrid::zeroed();
        let mut total = 0.0_f32;

        for action in mask.legal() {
            let raw = self.get(action).max(0.0);
            let lifted = raw + floor;
            out.set(action, lifted);
            total += lifted;
        }

        if !(total.is_finite() && total > 0.0) {
            return None;
        }

        for action in mask.legal() {
            out.set(action, out.get(action) / total);
        }
        Some(out)
    }
}

impl Default for PolicyGrid {
    fn default() -> Self {
        PolicyGrid::zeroed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order_is_row_major_and_covers_grid() {
        let all: Vec<Action> = scan_order().collect();
        assert_eq!(all.len(), SLOTS * TARGETS);
        assert_eq!(all[0], Action::new(0, 0));
        assert_eq!(all[1], Action::new(0, 1));
        assert_eq!(all[TARGETS], Action::new(1, 0));
        for (i, action) in all.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }

    #[test]
    fn masked_priors_are_a_distribution_over_legal_actions() {
        let mut mask = ActionMask::none();
        mask.allow(Action::new(0, 0));
        mask.allow(Action::new(3, 2));
        mask.allow(Action::end_turn());

        let mut raw = PolicyGrid::zeroed();
        raw.set(Action::new(0, 0), 0.5);
        raw.set(Action::new(7, 7), 0.5); // illegal, must be dropped

        let masked = raw.masked(&mask, 1e-3).expect("positive masked sum");
        let total: f32 = masked.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert_eq!(masked.get(Action::new(7, 7)), 0.0);
        // The floor keeps zero-prior legal actions selectable.
        assert!(masked.get(Action::new(3, 2)) > 0.0);
    }

    #[test]
    fn masked_priors_with_zero_sum_report_fallback() {
        let mut mask = ActionMask::none();
        mask.allow(Action::end_turn());
        let raw = PolicyGrid::zeroed();
        assert!(raw.masked(&mask, 0.0).is_none());

        let uniform = PolicyGrid::uniform_over(&mask);
        assert_eq!(uniform.get(Action::end_turn()), 1.0);
    }
}
