//! Base-pair Jaccard between two 1D interval collections
//!
//! Geometric similarity with BED half-open semantics: intersection and
//! union are measured in covered bases, so touching intervals do not
//! intersect. Distinct from the overlap-count Jaccard in
//! [`crate::core::metrics`].

use crate::core::interval::Locus;
use std::collections::BTreeMap;

/// Base-pair overlap statistics for one A-vs-B comparison
#[derive(Debug, Clone, PartialEq)]
pub struct BasePairJaccard {
    /// Bases covered by both collections
    pub intersection: u64,
    /// Bases covered by either collection
    pub union: u64,
    /// intersection / union, 0 when the union is 0
    pub jaccard: f64,
    /// Count of maximal contiguous intersection runs
    pub n_intersections: u64,
}

/// Compute the base-pair Jaccard via a per-chromosome boundary sweep
///
/// Neither collection needs to be sorted or merged beforehand; coverage
/// depth handles overlapping records within a collection. Intervals with
/// start == end contribute nothing.
pub fn bp_jaccard<C: Ord>(a: &[Locus<C>], b: &[Locus<C>]) -> BasePairJaccard {
    // boundary events per chromosome: position -> (depth delta A, depth delta B)
    let mut chroms: BTreeMap<&C, BTreeMap<i64, (i64, i64)>> = BTreeMap::new();
    for locus in a {
        let events = chroms.entry(&locus.chrom).or_default();
        events.entry(locus.start).or_default().0 += 1;
        events.entry(locus.end).or_default().0 -= 1;
    }
    for locus in b {
        let events = chroms.entry(&locus.chrom).or_default();
        events.entry(locus.start).or_default().1 += 1;
        events.entry(locus.end).or_default().1 -= 1;
    }

    let mut intersection = 0u64;
    let mut union = 0u64;
    let mut n_intersections = 0u64;

    for events in chroms.values() {
        let mut depth_a = 0i64;
        let mut depth_b = 0i64;
        let mut prev: Option<i64> = None;
        let mut in_overlap = false;

        for (&pos, &(delta_a, delta_b)) in events {
            if let Some(prev_pos) = prev {
                let span = (pos - prev_pos) as u64;
                if depth_a > 0 && depth_b > 0 {
                    intersection += span;
                }
                if depth_a > 0 || depth_b > 0 {
                    union += span;
                }
            }
            // all deltas at one position apply together, so intervals that
            // touch end-to-start never register as overlapping
            depth_a += delta_a;
            depth_b += delta_b;
            let overlapping = depth_a > 0 && depth_b > 0;
            if overlapping && !in_overlap {
                n_intersections += 1;
            }
            in_overlap = overlapping;
            prev = Some(pos);
        }
    }

    let jaccard = if union > 0 {
        intersection as f64 / union as f64
    } else {
        0.0
    };
    BasePairJaccard {
        intersection,
        union,
        jaccard,
        n_intersections,
    }
}
