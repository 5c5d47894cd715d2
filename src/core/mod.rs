//! Core comparison engine
//!
//! This module contains the interval records, tolerance expansion,
//! overlap matching, merging, containment, and metric derivation.

mod bpjaccard;
mod containment;
mod error;
mod interval;
mod merge;
mod metrics;
pub mod io;
mod overlap;

pub use bpjaccard::{bp_jaccard, BasePairJaccard};
pub use containment::{validate_loci, PeakIndex, ValidationSummary};
pub use error::{
    ChromevalError, MatrixError, MatrixResult, ParseError, ParseResult, Result,
};
pub use interval::{
    normalize_chrom, normalize_loci, Expanded1, Expanded2, Expansion, Locus, LoopCall, Window,
    DEFAULT_TOLERANCE,
};
pub use io::{
    detect_compression, open_reader, ByteLineIterator, CompressionFormat, IoStrategy,
    SmartReader, DEFAULT_BUFFER_SIZE, LARGE_BUFFER_SIZE, MMAP_THRESHOLD,
};
pub use merge::{merge_named, merge_runs, MergeOutcome};
pub use metrics::MetricsSummary;
pub use overlap::{overlap_sets, OverlapSets, Region};
