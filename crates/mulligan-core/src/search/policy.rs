use crate::search::{
    action::{scan_order, Action, PolicyGrid},
    error::SearchError,
    key::StateKey,
    store::StatsStore,
};

/// Convert the root's accumulated edge visit counts into a move
/// probability distribution over the full action grid.
///
/// Temperature 0 (or any non-positive/non-finite input) returns a one-hot
/// distribution on the most-visited action, ties broken by scan order.
/// Positive temperatures raise each count to `1/temperature` and
/// renormalize; as temperature grows the result flattens towards uniform
/// over visited actions. Actions never explored keep zero mass.
pub fn visit_distribution(
    store: &StatsStore,
    root: StateKey,
    temperature: f32,
) -> Result<PolicyGrid, SearchError> {
    let counts: Vec<(Action, u32)> = scan_order()
        .map(|action| (action, store.edge_visits(root, action)))
        .collect();

    let total: u64 = counts.iter().map(|(_, n)| u64::from(*n)).sum();
    if total == 0 {
        return Err(SearchError::NoRootStatistics { key: root });
    }

    let mut out = PolicyGrid::zeroed();

    if !(temperature.is_finite() && temperature > 0.0) {
        // Greedy: strict comparison keeps the first scan-order action on ties.
        let mut best: Option<(Action, u32)> = None;
        for &(action, visits) in &counts {
            if best.is_none_or(|(_, best_visits)| visits > best_visits) {
                best = Some((action, visits));
            }
        }
        if let Some((action, _)) = best {
            out.set(action, 1.0);
        }
        return Ok(out);
    }

    // Weights are computed in f64 on counts rescaled by the maximum: the
    // ratio is at most 1, so raising it to 1/temperature can never
    // overflow, and the most-visited action always keeps weight 1.
    let max_visits = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
    let inv_temperature = f64::from(1.0 / temperature);
    let mut weights: Vec<(Action, f64)> = Vec::new();
    let mut sum = 0.0_f64;
    for &(action, visits) in &counts {
        if visits == 0 {
            continue;
        }
        let weight = (f64::from(visits) / f64::from(max_visits)).powf(inv_temperature);
        weights.push((action, weight));
        sum += weight;
    }

    for (action, weight) in weights {
        out.set(action, (weight / sum) as f32);
    }

    Ok(out)
}
