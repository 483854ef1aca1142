use rustc_hash::FxHashMap;

use crate::search::{
    action::{Action, PolicyGrid},
    key::StateKey,
};

/// Visit count and running mean action-value for one `(state, action)` edge.
/// u32/f32 keep the per-edge footprint small; the store holds one entry per
/// edge ever selected.
#[derive(Debug, Clone, Copy)]
pub struct EdgeStats {
    visits: u32,
    q: f32,
}

impl EdgeStats {
    fn new() -> Self {
        EdgeStats { visits: 0, q: 0.0 }
    }

    /// Amount of times this edge was selected.
    pub fn visits(&self) -> u32 {
        self.visits
    }

    /// Mean signed value observed through this edge.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Fold one signed value into the running mean and bump the visit count.
    fn record(&mut self, value: f32) {
        self.visits += 1;
        self.q += (value - self.q) / self.visits as f32;
    }
}

/// Per-fingerprint node bookkeeping: total visits plus the prior-policy
/// distribution cached at expansion.
#[derive(Debug, Clone)]
struct NodeStats {
    visits: u32,
    priors: PolicyGrid,
}

/// Process-lifetime statistics container for one search tree.
///
/// Grows monotonically: keys are only ever inserted, never evicted.
/// Callers discard the whole store between independent training
/// iterations when memory growth matters. Mutated exclusively by the
/// search engine during expansion and backpropagation.
#[derive(Debug, Clone, Default)]
pub struct StatsStore {
    nodes: FxHashMap<StateKey, NodeStats>,
    edges: FxHashMap<(StateKey, Action), EdgeStats>,
    terminals: FxHashMap<StateKey, f32>,
}

impl StatsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        StatsStore::default()
    }

    /// Whether a prior has been cached for this fingerprint.
    pub fn is_expanded(&self, key: StateKey) -> bool {
        self.nodes.contains_key(&key)
    }

    /// Cached prior distribution, if the node has been expanded.
    pub fn prior(&self, key: StateKey) -> Option<&PolicyGrid> {
        self.nodes.get(&key).map(|node| &node.priors)
    }

    /// Cache the masked, renormalized prior for a fresh node.
    /// Priors are set once at expansion and never overwritten.
    pub fn insert_prior(&mut self, key: StateKey, priors: PolicyGrid) {
        debug_assert!(!self.nodes.contains_key(&key));
        self.nodes
            .entry(key)
            .or_insert(NodeStats { visits: 0, priors });
    }

    /// Total visit count for a node. Zero for unknown fingerprints.
    pub fn node_visits(&self, key: StateKey) -> u32 {
        self.nodes.get(&key).map(|node| node.visits).unwrap_or(0)
    }

    /// Increment a node's visit count by one.
    ///
    /// A node's count equals the sum of its outgoing edge visits, with one
    /// exception: the root is also bumped for simulations that end with an
    /// empty path (a terminal root has no edges but still counts its
    /// simulations). The engine owns that invariant.
    pub fn bump_node_visits(&mut self, key: StateKey) {
        self.nodes
            .entry(key)
            .or_insert_with(|| NodeStats {
                visits: 0,
                priors: PolicyGrid::zeroed(),
            })
            .visits += 1;
    }

    /// Statistics for one edge, if it was ever selected.
    pub fn edge(&self, key: StateKey, action: Action) -> Option<&EdgeStats> {
        self.edges.get(&(key, action))
    }

    /// Visit count for one edge. Zero when never selected.
    pub fn edge_visits(&self, key: StateKey, action: Action) -> u32 {
        self.edge(key, action).map(|e| e.visits()).unwrap_or(0)
    }

    /// Fold one signed backpropagation value into an edge.
    pub fn record_edge(&mut self, key: StateKey, action: Action, value: f32) {
        self.edges
            .entry((key, action))
            .or_insert_with(EdgeStats::new)
            .record(value);
    }

    /// Cached terminal value for a fingerprint, if known.
    pub fn terminal_value(&self, key: StateKey) -> Option<f32> {
        self.terminals.get(&key).copied()
    }

    /// Cache the terminal value observed for a fingerprint.
    pub fn cache_terminal(&mut self, key: StateKey, value: f32) {
        self.terminals.entry(key).or_insert(value);
    }

    /// Number of expanded nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges with at least one visit.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of cached terminal fingerprints.
    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }
}
