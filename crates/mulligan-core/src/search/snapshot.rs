use serde::Serialize;

use crate::search::{action::scan_order, key::StateKey, store::StatsStore};

/// Serializable dump of the statistics accumulated at one root, for
/// logging and offline inspection of a search.
#[derive(Debug, Clone, Serialize)]
pub struct RootSnapshot {
    pub schema_version: u32,
    pub state_key: u64,
    pub node_visits: u32,
    pub edges: Vec<EdgeSnapshot>,
}

/// One visited root edge.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSnapshot {
    pub slot: u8,
    pub target: u8,
    pub visits: u32,
    pub q: f32,
    pub prior: f32,
}

impl RootSnapshot {
    /// Capture the visited edges of `root` in scan order.
    pub fn capture(store: &StatsStore, root: StateKey) -> Self {
        let priors = store.prior(root).copied();
        let edges = scan_order()
            .filter_map(|action| {
                store.edge(root, action).map(|edge| EdgeSnapshot {
                    slot: action.slot,
                    target: action.target,
                    visits: edge.visits(),
                    q: edge.q(),
                    prior: priors.map(|p| p.get(action)).unwrap_or(0.0),
                })
            })
            .collect();

        RootSnapshot {
            schema_version: 1,
            state_key: root.value(),
            node_visits: store.node_visits(root),
            edges,
        }
    }

    /// Render the snapshot as a single JSON line.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
