//! Peak containment queries for loop-anchor validation
//!
//! A merged anchor locus is validated when every available marker
//! category (CTCF, RAD21, SMC3, ...) has at least one peak fully
//! contained inside it.

use crate::core::interval::Locus;
use std::collections::HashMap;

/// Per-chromosome index of marker peaks, sorted by start
pub struct PeakIndex {
    buckets: HashMap<u32, Vec<(i64, i64)>>,
    len: usize,
}

impl PeakIndex {
    /// Build the index from normalized peak records
    pub fn new(peaks: &[Locus<u32>]) -> Self {
        let mut buckets: HashMap<u32, Vec<(i64, i64)>> = HashMap::new();
        for peak in peaks {
            buckets
                .entry(peak.chrom)
                .or_default()
                .push((peak.start, peak.end));
        }
        for bucket in buckets.values_mut() {
            bucket.sort_unstable();
        }
        Self {
            buckets,
            len: peaks.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Is at least one peak fully contained in `[start, end]` on `chrom`?
    ///
    /// Full containment, not overlap: the peak's start must be >= `start`
    /// and its end <= `end`. Equal bounds qualify.
    pub fn contains_within(&self, chrom: u32, start: i64, end: i64) -> bool {
        let bucket = match self.buckets.get(&chrom) {
            Some(bucket) => bucket,
            None => return false,
        };
        // peaks starting before the query start can never be contained
        let lo = bucket.partition_point(|&(peak_start, _)| peak_start < start);
        bucket[lo..]
            .iter()
            .take_while(|&&(peak_start, _)| peak_start <= end)
            .any(|&(_, peak_end)| peak_end <= end)
    }
}

/// Validation counts for one batch of merged loci
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total: usize,
    pub validated: usize,
}

impl ValidationSummary {
    /// Validated share in percent, 0 when there are no loci
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            self.validated as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Validate loci against every available marker category
///
/// `markers` holds one index per category that is present for this run;
/// absent categories are excluded by the caller and never count as
/// failures. With no available categories the predicate is vacuously
/// true for every locus.
pub fn validate_loci(loci: &[Locus<u32>], markers: &[PeakIndex]) -> ValidationSummary {
    let validated = loci
        .iter()
        .filter(|locus| {
            markers
                .iter()
                .all(|index| index.contains_within(locus.chrom, locus.start, locus.end))
        })
        .count();
    ValidationSummary {
        total: loci.len(),
        validated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(peaks: &[(u32, i64, i64)]) -> PeakIndex {
        let loci: Vec<Locus<u32>> = peaks
            .iter()
            .map(|&(chrom, start, end)| Locus::new(chrom, start, end))
            .collect();
        PeakIndex::new(&loci)
    }

    #[test]
    fn test_equal_bounds_are_contained() {
        let idx = index(&[(1, 100, 200)]);
        assert!(idx.contains_within(1, 100, 200));
    }

    #[test]
    fn test_partial_overlap_is_not_containment() {
        let idx = index(&[(1, 99, 200)]);
        assert!(!idx.contains_within(1, 100, 200));

        let idx = index(&[(1, 100, 201)]);
        assert!(!idx.contains_within(1, 100, 200));
    }

    #[test]
    fn test_interior_peak_is_contained() {
        let idx = index(&[(1, 120, 180)]);
        assert!(idx.contains_within(1, 100, 200));
    }

    #[test]
    fn test_wrong_chromosome() {
        let idx = index(&[(2, 120, 180)]);
        assert!(!idx.contains_within(1, 100, 200));
    }

    #[test]
    fn test_empty_index_contains_nothing() {
        let idx = index(&[]);
        assert!(idx.is_empty());
        assert!(!idx.contains_within(1, 0, i64::MAX));
    }

    #[test]
    fn test_peaks_before_query_are_pruned_not_matched() {
        let idx = index(&[(1, 0, 50), (1, 10, 400), (1, 150, 160)]);
        assert!(idx.contains_within(1, 100, 200));
        assert!(!idx.contains_within(1, 100, 140));
    }

    #[test]
    fn test_validation_requires_every_marker() {
        let loci = vec![Locus::new(1u32, 100, 200), Locus::new(1u32, 500, 600)];
        let ctcf = index(&[(1, 120, 180), (1, 510, 590)]);
        let rad21 = index(&[(1, 130, 170)]);

        let summary = validate_loci(&loci, &[ctcf, rad21]);
        // second locus has CTCF support but no RAD21 peak
        assert_eq!(summary.total, 2);
        assert_eq!(summary.validated, 1);
        assert_eq!(summary.percentage(), 50.0);
    }

    #[test]
    fn test_no_markers_is_vacuously_valid() {
        let loci = vec![Locus::new(1u32, 100, 200)];
        let summary = validate_loci(&loci, &[]);
        assert_eq!(summary.validated, 1);
        assert_eq!(summary.percentage(), 100.0);
    }

    #[test]
    fn test_no_loci_reports_zero_percentage() {
        let summary = validate_loci(&[], &[index(&[(1, 0, 10)])]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.percentage(), 0.0);
    }
}
