use crate::data::Data;
use crate::merit::merit_calculation;
use crate::param::Param;
use log::{debug, info, warn};
use rayon::prelude::*;

// Forward search functions: grow a feature subset one feature per round,
// keeping the extension with the best merit, and stop as soon as the best
// candidate no longer improves on the previous round.

/// All ways to extend `selected` with one feature not already in it, the new
/// index taken in ascending order. With an empty `selected` this produces the
/// n single-feature candidates of the first round.
pub fn generate_candidates(selected: &[usize], feature_len: usize) -> Vec<Vec<usize>> {
    (0..feature_len)
        .filter(|j| !selected.contains(j))
        .map(|j| {
            let mut candidate = selected.to_vec();
            candidate.push(j);
            candidate
        })
        .collect()
}

/// Run the forward search on a dataset. Returns the merit score of each
/// accepted round (in acceptance order) and the final selected feature
/// indices; both are empty when no feature improves on the initial floor of 0.
///
/// Candidate scoring within a round is spread over the current rayon pool;
/// scores are collected back in candidate order so that ties are still broken
/// by the lowest newly added feature index.
pub fn forward_search(data: &Data, param: &Param) -> Result<(Vec<f64>, Vec<usize>), String> {
    data.validate_for_search()?;

    let n = data.feature_len;
    let labels = data.label_vector();

    let max_subset_size = if param.cfs.max_subset_size == 0 {
        n
    } else {
        param.cfs.max_subset_size
    };

    let mut selected: Vec<usize> = Vec::new();
    let mut merit_history: Vec<f64> = Vec::new();
    let mut best_previous = 0.0;

    if n < 2 {
        warn!("Only {} feature available: nothing to search.", n);
    }

    for round in 0..n.saturating_sub(1) {
        if selected.len() >= max_subset_size {
            info!("Subset size limit ({}) reached, stopping the search.", max_subset_size);
            break;
        }

        let mut candidates = generate_candidates(&selected, n);
        debug!("Round {}: scoring {} candidate subsets of size {}...", round + 1, candidates.len(), selected.len() + 1);

        let scores: Vec<f64> = candidates
            .par_iter()
            .map(|candidate| merit_calculation(&data.column_block(candidate), &labels))
            .collect();

        let mut best_index = 0;
        let mut best = f64::NEG_INFINITY;
        for (i, &score) in scores.iter().enumerate() {
            if score > best {
                best = score;
                best_index = i;
            }
        }

        if best - best_previous <= 0.0 {
            debug!(
                "Round {}: best candidate merit {:.6} does not improve on {:.6}, stopping.",
                round + 1,
                best,
                best_previous
            );
            break;
        }

        selected = candidates.swap_remove(best_index);
        best_previous = best;
        merit_history.push(best);
        info!(
            "Round {}: accepted subset {:?} with merit {:.6}",
            round + 1,
            selected,
            best
        );
    }

    Ok((merit_history, selected))
}
