//! Tolerance-window overlap matching between two interval collections
//!
//! The matcher is symmetric: callers run it twice with the roles swapped
//! to obtain both directional overlap sets.

use crate::core::interval::{Expanded1, Expanded2};
use std::collections::HashMap;
use std::hash::Hash;

/// Per-record overlap sets
///
/// Position `i` holds the positions of every record in the other
/// collection that intersects record `i`, in the other collection's
/// enumeration order. Empty list means no match.
pub type OverlapSets = Vec<Vec<usize>>;

/// A record that can be bucketed by chromosome and tested for intersection
pub trait Region {
    type Chrom: Eq + Hash;

    fn chrom(&self) -> &Self::Chrom;

    /// Closed-interval intersection on every axis
    fn intersects(&self, other: &Self) -> bool;
}

impl<C: Eq + Hash> Region for Expanded1<C> {
    type Chrom = C;

    fn chrom(&self) -> &C {
        &self.chrom
    }

    fn intersects(&self, other: &Self) -> bool {
        self.window.intersects(&other.window)
    }
}

impl<C: Eq + Hash> Region for Expanded2<C> {
    type Chrom = C;

    fn chrom(&self) -> &C {
        &self.chrom
    }

    fn intersects(&self, other: &Self) -> bool {
        self.x.intersects(&other.x) && self.y.intersects(&other.y)
    }
}

/// Collect, for every record in `from`, the indices of all records in `to`
/// on the same chromosome whose expanded windows intersect it
///
/// Either side may be empty; the result then carries one empty list per
/// `from` record. Candidates are tested exhaustively within a chromosome
/// bucket, so membership matches the all-pairs definition exactly,
/// boundary ties included.
pub fn overlap_sets<R: Region>(from: &[R], to: &[R]) -> OverlapSets {
    let mut buckets: HashMap<&R::Chrom, Vec<usize>> = HashMap::new();
    for (idx, record) in to.iter().enumerate() {
        buckets.entry(record.chrom()).or_default().push(idx);
    }

    from.iter()
        .map(|record| match buckets.get(record.chrom()) {
            Some(candidates) => candidates
                .iter()
                .copied()
                .filter(|&idx| record.intersects(&to[idx]))
                .collect(),
            None => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::{Expansion, Locus, LoopCall};

    fn expand1(loci: &[Locus<String>], tolerance: i64) -> Vec<Expanded1<String>> {
        loci.iter()
            .map(|l| l.expand(tolerance, Expansion::Pad))
            .collect()
    }

    #[test]
    fn test_1d_overlap_same_chromosome() {
        let a = expand1(&[Locus::new("chr1".into(), 100, 200)], 0);
        let b = expand1(&[Locus::new("chr1".into(), 150, 250)], 0);
        assert_eq!(overlap_sets(&a, &b), vec![vec![0]]);
        assert_eq!(overlap_sets(&b, &a), vec![vec![0]]);
    }

    #[test]
    fn test_chromosome_mismatch_never_matches() {
        let a = expand1(&[Locus::new("chr1".into(), 100, 200)], 5000);
        let b = expand1(&[Locus::new("chr2".into(), 100, 200)], 5000);
        assert_eq!(overlap_sets(&a, &b), vec![Vec::<usize>::new()]);
        assert_eq!(overlap_sets(&b, &a), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_empty_side_yields_empty_lists() {
        let a = expand1(&[Locus::new("chr1".into(), 100, 200)], 0);
        let empty: Vec<Expanded1<String>> = Vec::new();
        assert_eq!(overlap_sets(&a, &empty), vec![Vec::<usize>::new()]);
        assert!(overlap_sets(&empty, &a).is_empty());
    }

    #[test]
    fn test_indices_are_in_target_order() {
        let a = expand1(&[Locus::new("chr1".into(), 0, 1000)], 0);
        let b = expand1(
            &[
                Locus::new("chr1".into(), 900, 950),
                Locus::new("chr1".into(), 10, 20),
                Locus::new("chr2".into(), 10, 20),
                Locus::new("chr1".into(), 500, 600),
            ],
            0,
        );
        assert_eq!(overlap_sets(&a, &b), vec![vec![0, 1, 3]]);
    }

    #[test]
    fn test_2d_requires_both_axes() {
        let a = vec![LoopCall::new("chr1".to_string(), 1000, 2000, 9000, 10000)
            .expand(0, Expansion::Pad)];
        // x overlaps, y does not
        let b = vec![LoopCall::new("chr1".to_string(), 1500, 2500, 20000, 21000)
            .expand(0, Expansion::Pad)];
        // both axes overlap
        let c = vec![LoopCall::new("chr1".to_string(), 1500, 2500, 9500, 9800)
            .expand(0, Expansion::Pad)];
        assert_eq!(overlap_sets(&a, &b), vec![Vec::<usize>::new()]);
        assert_eq!(overlap_sets(&a, &c), vec![vec![0]]);
    }

    #[test]
    fn test_tolerance_bridges_gap() {
        let a = expand1(&[Locus::new("chr1".into(), 0, 100)], 0);
        let far = expand1(&[Locus::new("chr1".into(), 4000, 4100)], 0);
        assert_eq!(overlap_sets(&a, &far), vec![Vec::<usize>::new()]);

        let padded = expand1(&[Locus::new("chr1".into(), 0, 100)], 5000);
        assert_eq!(overlap_sets(&padded, &far), vec![vec![0]]);
    }

    #[test]
    fn test_boundary_tie_counts_as_match() {
        let a = expand1(&[Locus::new("chr1".into(), 100, 200)], 0);
        let b = expand1(&[Locus::new("chr1".into(), 200, 300)], 0);
        assert_eq!(overlap_sets(&a, &b), vec![vec![0]]);
    }
}
