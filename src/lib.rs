//! Chromeval - Benchmarking of chromatin loop and TAD predictions
//!
//! Compares predicted structural features against high-resolution
//! reference call sets and reports F1, Jaccard, and marker validation
//! metrics per chromosome.
//!
//! # Features
//!
//! - Tolerance-window loop matching with TP/FP/FN/F1 and overlap Jaccard
//! - Raw-bound TAD matching plus base-pair Jaccard
//! - ChIP peak containment validation over merged loop anchors
//! - Hi-C prediction matrices converted to juicer pre input
//! - Parallel model x replicate x chromosome sweeps with rayon
//! - Support for compressed input files (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use chromeval::formats::bedpe;
//! use chromeval::sweep::compare_loops;
//!
//! // Load predicted and reference loop calls
//! let predicted = bedpe::read_loops("model/merged_loops.bedpe".as_ref(), 2)?;
//! let reference = bedpe::read_loops("hr/merged_loops.bedpe".as_ref(), 2)?;
//!
//! // Score with a 5 kb tolerance window
//! let comparison = compare_loops(&predicted.records, &reference.records, 5000);
//! println!("F1 = {:.4}", comparison.bounds.f1);
//! ```

pub mod core;
pub mod formats;
pub mod report;
pub mod sweep;

// Re-export commonly used types
pub use crate::core::{
    bp_jaccard, merge_named, merge_runs, normalize_chrom, overlap_sets, validate_loci,
    BasePairJaccard, ChromevalError, Expansion, Locus, LoopCall, MergeOutcome, MetricsSummary,
    PeakIndex, Result, ValidationSummary, DEFAULT_TOLERANCE,
};
pub use crate::formats::{bed, bedpe, matrix};
