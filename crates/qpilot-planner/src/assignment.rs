//! Capacity-aware fragment-to-QPU assignment (§4.6 steps 3 and 7).
//!
//! Grounded on `original_source/pilot/dreamer.py`'s
//! `_assign_fragments_by_capacity` and `_capacity_ok`. Per §3 invariant 3
//! the feasibility check — and, per this spec, the final assignment too —
//! runs against `capacity * tolerance`, not the raw capacity.

use std::collections::BTreeMap;

/// Greedy first-fit: place the largest fragments first into the first bin
/// they fit. Returns `None` if some fragment doesn't fit anywhere.
pub fn assign_first_fit(fragments: &[Vec<usize>], capacities: &[u32], tolerance: f64) -> Option<BTreeMap<usize, Vec<usize>>> {
    let mut remaining: Vec<i64> = capacities.iter().map(|&c| ((c as f64) * tolerance) as i64).collect();

    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(fragments[i].len()));

    let mut placement: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in order {
        let frag = &fragments[i];
        let mut placed = false;
        for (bin, cap) in remaining.iter_mut().enumerate() {
            if frag.len() as i64 <= *cap {
                placement.entry(bin + 1).or_default().extend(frag.iter().copied());
                *cap -= frag.len() as i64;
                placed = true;
                break;
            }
        }
        if !placed {
            return None;
        }
    }
    Some(placement)
}

/// Whether `fragments` fit under `capacities * tolerance`; always true when
/// no capacities were provided (no constraint).
pub fn capacity_ok(fragments: &[Vec<usize>], capacities: Option<&[u32]>, tolerance: f64) -> bool {
    match capacities {
        None => true,
        Some(caps) => assign_first_fit(fragments, caps, tolerance).is_some(),
    }
}

/// Distribute fragments round-robin into `qpus_count` buckets, used when no
/// capacities were supplied (§4.6 step 7).
pub fn assign_round_robin(fragments: &[Vec<usize>], qpus_count: usize) -> BTreeMap<usize, Vec<usize>> {
    let mut placement: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, frag) in fragments.iter().enumerate() {
        let qpu = (i % qpus_count) + 1;
        placement.entry(qpu).or_default().extend(frag.iter().copied());
    }
    placement
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fit_places_largest_fragments_first() {
        let fragments = vec![vec![0, 1], vec![2, 3, 4, 5], vec![6]];
        let assignment = assign_first_fit(&fragments, &[4, 2, 1], 1.0).unwrap();
        assert_eq!(assignment.get(&1).unwrap().len(), 4);
        assert_eq!(assignment.get(&2).unwrap().len(), 2);
        assert_eq!(assignment.get(&3).unwrap().len(), 1);
    }

    #[test]
    fn infeasible_without_tolerance_becomes_feasible_with_it() {
        let fragments = vec![vec![0, 1, 2, 3]];
        assert!(assign_first_fit(&fragments, &[3], 1.0).is_none());
        assert!(assign_first_fit(&fragments, &[3], 1.2).is_some());
    }

    #[test]
    fn round_robin_cycles_through_qpus() {
        let fragments = vec![vec![0], vec![1], vec![2]];
        let assignment = assign_round_robin(&fragments, 2);
        assert_eq!(assignment.get(&1).unwrap().len(), 2);
        assert_eq!(assignment.get(&2).unwrap().len(), 1);
    }
}
