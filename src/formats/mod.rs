//! File format adapters
//!
//! Adapters for the tabular and binary inputs the benchmark consumes
//! (BEDPE loop calls, three-column BED/peak lists, NumPy prediction
//! arrays, sparse contact lists).

pub mod bed;
pub mod bedpe;
pub mod matrix;

pub use bed::{read_loci, sort_loci, write_tad_bed, BedRecordError, BedRecordView};
pub use bedpe::{
    read_loops, sort_calls, stack_unique_anchors, BedpeRecordError, BedpeRecordView, LoopFile,
    JUICER_HEADER_LINES,
};
pub use matrix::{
    assemble_contacts, chrom_dimension, convert_predictions, crop_indices, matrix_dimension,
    read_chrom_sizes, read_contact_matrix, read_npy, write_contacts, write_pre, ContactEntry,
    ConvertConfig, ConvertStats, DEFAULT_CROP_SIZE, DEFAULT_RESOLUTION, DIAGONAL_BAND,
    MIN_NONZERO_RATE,
};
