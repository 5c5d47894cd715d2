//! BEDPE loop-call format adapter
//!
//! Reads juicer-tool BEDPE output (HICCUPS `merged_loops`, arrowhead
//! block files) with zero-copy field splitting. These files carry a
//! column-header line followed by an attribute line; both are skipped
//! before records start.

use crate::core::io::{open_reader, ByteLineIterator};
use crate::core::{Locus, LoopCall, ParseError, ParseResult};
use memchr::memchr;
use std::path::Path;

/// Physical header lines at the top of a juicer-tool BEDPE file
pub const JUICER_HEADER_LINES: usize = 2;

/// Zero-copy BEDPE record view
///
/// Only the six coordinate columns are parsed; trailing annotation
/// columns (observed counts, FDR values) are left untouched.
#[derive(Debug)]
pub struct BedpeRecordView<'a> {
    pub chrom1: &'a str,
    pub chrom2: &'a str,
    pub x_start: i64,
    pub x_end: i64,
    pub y_start: i64,
    pub y_end: i64,
    field_count: usize,
}

impl<'a> BedpeRecordView<'a> {
    /// Parse one BEDPE line
    pub fn parse(line: &'a [u8]) -> Result<Self, BedpeRecordError> {
        if line.is_empty() {
            return Err(BedpeRecordError::EmptyLine);
        }

        // Field boundaries via memchr; only the first six are decoded
        let mut bounds = [(0usize, 0usize); 6];
        let mut field_count = 0usize;
        let mut start_pos = 0;

        loop {
            match memchr(b'\t', &line[start_pos..]) {
                Some(tab_pos) => {
                    let end_pos = start_pos + tab_pos;
                    if field_count < 6 {
                        bounds[field_count] = (start_pos, end_pos);
                    }
                    field_count += 1;
                    start_pos = end_pos + 1;
                }
                None => {
                    if field_count < 6 {
                        bounds[field_count] = (start_pos, line.len());
                    }
                    field_count += 1;
                    break;
                }
            }
        }

        if field_count < 6 {
            return Err(BedpeRecordError::TooFewFields {
                expected: 6,
                found: field_count,
            });
        }

        let field_str = |idx: usize, name: &'static str| {
            let (start, end) = bounds[idx];
            std::str::from_utf8(&line[start..end])
                .map(str::trim)
                .map_err(|_| BedpeRecordError::InvalidUtf8(name))
        };
        let field_i64 = |idx: usize, name: &'static str| {
            let s = field_str(idx, name)?;
            s.parse::<i64>()
                .map_err(|_| BedpeRecordError::InvalidNumber(name, s.to_string()))
        };

        Ok(Self {
            chrom1: field_str(0, "chr1")?,
            chrom2: field_str(3, "chr2")?,
            x_start: field_i64(1, "x1")?,
            x_end: field_i64(2, "x2")?,
            y_start: field_i64(4, "y1")?,
            y_end: field_i64(5, "y2")?,
            field_count,
        })
    }

    /// True if both anchors sit on the same chromosome
    pub fn is_intra_chromosomal(&self) -> bool {
        self.chrom1 == self.chrom2
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }
}

/// BEDPE record parsing error
#[derive(Debug, thiserror::Error)]
pub enum BedpeRecordError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),
}

/// Parsed loop calls plus the count of rejected inter-chromosomal rows
#[derive(Debug, Clone)]
pub struct LoopFile {
    pub records: Vec<LoopCall<String>>,
    pub skipped_inter_chrom: usize,
}

/// Read a BEDPE loop file, skipping `skip_lines` physical header lines
///
/// Blank lines and `#`-prefixed lines in the body are ignored.
/// Inter-chromosomal rows are counted and dropped; the loop record type
/// keys both anchors on a single chromosome.
pub fn read_loops(path: &Path, skip_lines: usize) -> ParseResult<LoopFile> {
    let reader = open_reader(path)?;
    let mut lines = ByteLineIterator::new(reader);

    let mut records = Vec::new();
    let mut skipped_inter_chrom = 0usize;
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;
        if line_number <= skip_lines {
            continue;
        }
        if line.is_empty() || line[0] == b'#' {
            continue;
        }

        let view =
            BedpeRecordView::parse(line).map_err(|e| ParseError::InvalidRecord {
                line: line_number,
                message: e.to_string(),
            })?;

        if !view.is_intra_chromosomal() {
            skipped_inter_chrom += 1;
            continue;
        }

        records.push(LoopCall::new(
            view.chrom1.to_string(),
            view.x_start,
            view.x_end,
            view.y_start,
            view.y_end,
        ));
    }

    Ok(LoopFile {
        records,
        skipped_inter_chrom,
    })
}

/// Sort loop calls by (chromosome, upstream start, downstream start)
pub fn sort_calls(calls: &mut [LoopCall<String>]) {
    calls.sort_by(|a, b| {
        a.chrom
            .cmp(&b.chrom)
            .then(a.x_start.cmp(&b.x_start))
            .then(a.y_start.cmp(&b.y_start))
    });
}

/// Stack both anchors of every call as 1D loci, first occurrence only
///
/// All upstream anchors come first, then all downstream anchors, with
/// exact duplicate loci removed while preserving that order.
pub fn stack_unique_anchors(calls: &[LoopCall<String>]) -> Vec<Locus<String>> {
    let mut seen = std::collections::HashSet::new();
    let mut anchors = Vec::with_capacity(calls.len() * 2);
    for call in calls {
        let (up, _) = call.anchors();
        if seen.insert(up.clone()) {
            anchors.push(up);
        }
    }
    for call in calls {
        let (_, down) = call.anchors();
        if seen.insert(down.clone()) {
            anchors.push(down);
        }
    }
    anchors
}
