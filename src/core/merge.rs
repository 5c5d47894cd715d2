//! Sweep-line merging of 1D loci
//!
//! Sorts by (chromosome, start) and collapses every maximal chain of
//! overlapping or directly adjacent loci into one merged run.

use crate::core::interval::{normalize_loci, Locus};

/// Adjacency slack: a locus starting exactly one base past the current
/// run's end still joins it
const MERGE_SLACK: i64 = 1;

/// Merged runs plus the count of records dropped during chromosome
/// normalization
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub merged: Vec<Locus<u32>>,
    pub dropped: usize,
}

/// Merge overlapping or adjacent loci into disjoint runs
///
/// Input order is irrelevant; records are sorted by (chromosome, start)
/// first. A chromosome change always closes the current run. Empty input
/// yields empty output.
pub fn merge_runs<C: Ord + Clone>(mut loci: Vec<Locus<C>>) -> Vec<Locus<C>> {
    loci.sort_by(|a, b| a.chrom.cmp(&b.chrom).then(a.start.cmp(&b.start)));

    let mut iter = loci.into_iter();
    let mut current = match iter.next() {
        Some(locus) => locus,
        None => return Vec::new(),
    };

    let mut merged = Vec::new();
    for locus in iter {
        if locus.chrom == current.chrom && locus.start <= current.end + MERGE_SLACK {
            if locus.end > current.end {
                current.end = locus.end;
            }
        } else {
            merged.push(std::mem::replace(&mut current, locus));
        }
    }
    merged.push(current);
    merged
}

/// Normalize chromosome names to numeric keys, then merge
///
/// Records with a non-numeric chromosome are dropped and counted, never
/// silently discarded.
pub fn merge_named(loci: &[Locus<String>]) -> MergeOutcome {
    let (numeric, dropped) = normalize_loci(loci);
    MergeOutcome {
        merged: merge_runs(numeric),
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locus(chrom: u32, start: i64, end: i64) -> Locus<u32> {
        Locus::new(chrom, start, end)
    }

    #[test]
    fn test_adjacent_loci_merge() {
        let merged = merge_runs(vec![locus(1, 100, 200), locus(1, 201, 300)]);
        assert_eq!(merged, vec![locus(1, 100, 300)]);
    }

    #[test]
    fn test_gap_of_two_does_not_merge() {
        let merged = merge_runs(vec![locus(1, 100, 200), locus(1, 202, 300)]);
        assert_eq!(merged, vec![locus(1, 100, 200), locus(1, 202, 300)]);
    }

    #[test]
    fn test_overlap_chain_collapses() {
        let merged = merge_runs(vec![locus(1, 0, 10), locus(1, 5, 20), locus(1, 25, 30)]);
        assert_eq!(merged, vec![locus(1, 0, 20), locus(1, 25, 30)]);
    }

    #[test]
    fn test_chromosome_change_forces_emission() {
        let merged = merge_runs(vec![locus(1, 100, 200), locus(2, 150, 250)]);
        assert_eq!(merged, vec![locus(1, 100, 200), locus(2, 150, 250)]);
    }

    #[test]
    fn test_contained_locus_keeps_run_end() {
        let merged = merge_runs(vec![locus(1, 0, 100), locus(1, 10, 20)]);
        assert_eq!(merged, vec![locus(1, 0, 100)]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let merged = merge_runs(vec![locus(2, 0, 10), locus(1, 201, 300), locus(1, 100, 200)]);
        assert_eq!(merged, vec![locus(1, 100, 300), locus(2, 0, 10)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_runs(Vec::<Locus<u32>>::new()).is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_runs(vec![
            locus(1, 0, 10),
            locus(1, 8, 30),
            locus(1, 31, 40),
            locus(2, 5, 6),
        ]);
        let twice = merge_runs(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_named_counts_drops() {
        let loci = vec![
            Locus::new("chr1".to_string(), 100, 200),
            Locus::new("chrX".to_string(), 100, 200),
            Locus::new("chr1".to_string(), 150, 260),
        ];
        let outcome = merge_named(&loci);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.merged, vec![locus(1, 100, 260)]);
    }
}
