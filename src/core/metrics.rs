//! Benchmark metrics derived from directional overlap sets
//!
//! The caller fixes which collection is the prediction and which is the
//! reference; the matcher itself stays symmetric.

use crate::core::overlap::OverlapSets;
use std::collections::HashSet;

/// Summary statistics for one predicted-vs-reference comparison
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    /// Predicted records that match at least one reference record
    pub true_positives: usize,
    /// Predicted records that match nothing
    pub false_positives: usize,
    /// Reference records that nothing matches
    pub false_negatives: usize,
    /// TP / (TP + 0.5 * (FP + FN)), 0 when the denominator is 0
    pub f1: f64,
    /// Distinct matched reference records over the union of both
    /// collections, 0 when the denominator is 0
    pub overlap_jaccard: f64,
    pub n_predicted: usize,
    pub n_reference: usize,
}

impl MetricsSummary {
    /// Reduce the two directional overlap sets to summary metrics
    ///
    /// `pred_to_ref[i]` holds the reference indices matching predicted
    /// record `i`; `ref_to_pred[j]` the predicted indices matching
    /// reference record `j`. Both must come from the same comparison.
    pub fn from_overlap_sets(pred_to_ref: &OverlapSets, ref_to_pred: &OverlapSets) -> Self {
        let n_predicted = pred_to_ref.len();
        let n_reference = ref_to_pred.len();

        let true_positives = pred_to_ref.iter().filter(|set| !set.is_empty()).count();
        let false_positives = n_predicted - true_positives;
        let false_negatives = ref_to_pred.iter().filter(|set| set.is_empty()).count();

        let f1_denom = true_positives as f64
            + 0.5 * (false_positives as f64 + false_negatives as f64);
        let f1 = if f1_denom > 0.0 {
            true_positives as f64 / f1_denom
        } else {
            0.0
        };

        let matched_refs: HashSet<usize> =
            pred_to_ref.iter().flat_map(|set| set.iter().copied()).collect();
        let intersection = matched_refs.len();
        let union = n_predicted + n_reference - intersection;
        let overlap_jaccard = if union > 0 {
            intersection as f64 / union as f64
        } else {
            0.0
        };

        Self {
            true_positives,
            false_positives,
            false_negatives,
            f1,
            overlap_jaccard,
            n_predicted,
            n_reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::{Expansion, Locus};
    use crate::core::overlap::overlap_sets;

    fn summary_for(
        pred: &[Locus<String>],
        reference: &[Locus<String>],
        tolerance: i64,
    ) -> MetricsSummary {
        let pred: Vec<_> = pred.iter().map(|l| l.expand(tolerance, Expansion::Pad)).collect();
        let reference: Vec<_> = reference
            .iter()
            .map(|l| l.expand(tolerance, Expansion::Pad))
            .collect();
        MetricsSummary::from_overlap_sets(
            &overlap_sets(&pred, &reference),
            &overlap_sets(&reference, &pred),
        )
    }

    #[test]
    fn test_single_match_is_perfect_score() {
        let pred = vec![Locus::new("chr1".to_string(), 100, 200)];
        let reference = vec![Locus::new("chr1".to_string(), 150, 250)];
        let m = summary_for(&pred, &reference, 0);
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_positives, 0);
        assert_eq!(m.false_negatives, 0);
        assert_eq!(m.f1, 1.0);
        assert_eq!(m.overlap_jaccard, 1.0);
    }

    #[test]
    fn test_chromosome_mismatch_scores_zero() {
        let pred = vec![Locus::new("chr1".to_string(), 100, 200)];
        let reference = vec![Locus::new("chr2".to_string(), 100, 200)];
        let m = summary_for(&pred, &reference, 5000);
        assert_eq!(m.true_positives, 0);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.overlap_jaccard, 0.0);
    }

    #[test]
    fn test_partial_match() {
        let pred = vec![
            Locus::new("chr1".to_string(), 0, 10),
            Locus::new("chr1".to_string(), 1000, 1010),
        ];
        let reference = vec![
            Locus::new("chr1".to_string(), 5, 15),
            Locus::new("chr1".to_string(), 5000, 5010),
        ];
        let m = summary_for(&pred, &reference, 0);
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.false_negatives, 1);
        // 1 / (1 + 0.5 * 2)
        assert_eq!(m.f1, 0.5);
        // 1 matched reference over union 2 + 2 - 1
        assert!((m.overlap_jaccard - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_both_empty_yields_zero_not_nan() {
        let m = MetricsSummary::from_overlap_sets(&Vec::new(), &Vec::new());
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.overlap_jaccard, 0.0);
        assert_eq!(m.n_predicted, 0);
        assert_eq!(m.n_reference, 0);
    }

    #[test]
    fn test_empty_reference_side() {
        let pred = vec![Locus::new("chr1".to_string(), 0, 10)];
        let m = summary_for(&pred, &[], 5000);
        assert_eq!(m.true_positives, 0);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.false_negatives, 0);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.overlap_jaccard, 0.0);
    }

    #[test]
    fn test_counts_partition_predictions() {
        let pred = vec![
            Locus::new("chr1".to_string(), 0, 10),
            Locus::new("chr1".to_string(), 20, 30),
            Locus::new("chr3".to_string(), 0, 10),
        ];
        let reference = vec![Locus::new("chr1".to_string(), 0, 100)];
        let m = summary_for(&pred, &reference, 0);
        assert_eq!(m.true_positives + m.false_positives, m.n_predicted);
        assert_eq!(m.true_positives, 2);
        assert_eq!(m.false_negatives, 0);
    }

    #[test]
    fn test_duplicate_matches_count_once_in_jaccard() {
        // both predictions hit the same reference record
        let pred = vec![
            Locus::new("chr1".to_string(), 0, 50),
            Locus::new("chr1".to_string(), 40, 90),
        ];
        let reference = vec![Locus::new("chr1".to_string(), 30, 60)];
        let m = summary_for(&pred, &reference, 0);
        assert_eq!(m.true_positives, 2);
        // 1 distinct matched reference over 2 + 1 - 1
        assert_eq!(m.overlap_jaccard, 0.5);
    }
}
