//! Three-column BED adapter
//!
//! Reads TAD interval files and ChIP-seq peak lists as 1D loci, and
//! writes the sorted TAD artifact the TAD sweep publishes. Only the
//! first three columns are decoded; trailing columns are tolerated.

use crate::core::io::{open_reader, ByteLineIterator};
use crate::core::{Locus, ParseError, ParseResult};
use memchr::memchr;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Zero-copy three-column record view
#[derive(Debug)]
pub struct BedRecordView<'a> {
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
    field_count: usize,
}

impl<'a> BedRecordView<'a> {
    /// Parse one BED line
    pub fn parse(line: &'a [u8]) -> Result<Self, BedRecordError> {
        if line.is_empty() {
            return Err(BedRecordError::EmptyLine);
        }

        let mut bounds = [(0usize, 0usize); 3];
        let mut field_count = 0usize;
        let mut start_pos = 0;

        loop {
            match memchr(b'\t', &line[start_pos..]) {
                Some(tab_pos) => {
                    let end_pos = start_pos + tab_pos;
                    if field_count < 3 {
                        bounds[field_count] = (start_pos, end_pos);
                    }
                    field_count += 1;
                    start_pos = end_pos + 1;
                }
                None => {
                    if field_count < 3 {
                        bounds[field_count] = (start_pos, line.len());
                    }
                    field_count += 1;
                    break;
                }
            }
        }

        if field_count < 3 {
            return Err(BedRecordError::TooFewFields {
                expected: 3,
                found: field_count,
            });
        }

        let field_str = |idx: usize, name: &'static str| {
            let (start, end) = bounds[idx];
            std::str::from_utf8(&line[start..end])
                .map(str::trim)
                .map_err(|_| BedRecordError::InvalidUtf8(name))
        };
        let field_i64 = |idx: usize, name: &'static str| {
            let s = field_str(idx, name)?;
            s.parse::<i64>()
                .map_err(|_| BedRecordError::InvalidNumber(name, s.to_string()))
        };

        Ok(Self {
            chrom: field_str(0, "chrom")?,
            start: field_i64(1, "start")?,
            end: field_i64(2, "end")?,
            field_count,
        })
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }
}

/// BED record parsing error
#[derive(Debug, thiserror::Error)]
pub enum BedRecordError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),
}

fn is_header_line(line: &[u8]) -> bool {
    line.starts_with(b"#") || line.starts_with(b"track") || line.starts_with(b"browser")
}

/// Read a three-column file as 1D loci
///
/// `skip_lines` physical lines are dropped first (TAD artifacts carry
/// one header line, peak lists none); blank, `#`, `track` and `browser`
/// lines in the body are ignored.
pub fn read_loci(path: &Path, skip_lines: usize) -> ParseResult<Vec<Locus<String>>> {
    let reader = open_reader(path)?;
    let mut lines = ByteLineIterator::new(reader);

    let mut loci = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;
        if line_number <= skip_lines {
            continue;
        }
        if line.is_empty() || is_header_line(line) {
            continue;
        }

        let view = BedRecordView::parse(line).map_err(|e| ParseError::InvalidRecord {
            line: line_number,
            message: e.to_string(),
        })?;
        loci.push(Locus::new(view.chrom.to_string(), view.start, view.end));
    }

    Ok(loci)
}

/// Sort loci by (chromosome, start)
pub fn sort_loci(loci: &mut [Locus<String>]) {
    loci.sort_by(|a, b| a.chrom.cmp(&b.chrom).then(a.start.cmp(&b.start)));
}

/// Write loci as a TAD bed file with a `chr / TAD_start / TAD_end` header
pub fn write_tad_bed(path: &Path, loci: &[Locus<String>]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "chr\tTAD_start\tTAD_end")?;
    for locus in loci {
        writeln!(writer, "{}\t{}\t{}", locus.chrom, locus.start, locus.end)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_record_view() {
        let view = BedRecordView::parse(b"chr1\t100\t200").unwrap();
        assert_eq!(view.chrom, "chr1");
        assert_eq!(view.start, 100);
        assert_eq!(view.end, 200);
        assert_eq!(view.field_count(), 3);
    }

    #[test]
    fn test_parse_tolerates_extra_columns() {
        let view = BedRecordView::parse(b"chr1\t100\t200\tpeak_1\t850\t.").unwrap();
        assert_eq!(view.end, 200);
        assert_eq!(view.field_count(), 6);
    }

    #[test]
    fn test_parse_rejects_two_columns() {
        let err = BedRecordView::parse(b"chr1\t100").unwrap_err();
        assert!(matches!(
            err,
            BedRecordError::TooFewFields { expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_read_peak_list_without_header() {
        let file = write_temp("chr1\t100\t200\nchr1\t500\t600\nchr2\t10\t20\n");
        let loci = read_loci(file.path(), 0).unwrap();
        assert_eq!(loci.len(), 3);
        assert_eq!(loci[2], Locus::new("chr2".to_string(), 10, 20));
    }

    #[test]
    fn test_read_skips_header_and_comments() {
        let file = write_temp(
            "chr\tTAD_start\tTAD_end\n# comment\ntrack name=tads\nchr1\t0\t400000\n",
        );
        let loci = read_loci(file.path(), 1).unwrap();
        assert_eq!(loci, vec![Locus::new("chr1".to_string(), 0, 400000)]);
    }

    #[test]
    fn test_read_error_carries_line_number() {
        let file = write_temp("chr1\t100\t200\nchr1\toops\t300\n");
        let err = read_loci(file.path(), 0).unwrap_err();
        match err {
            ParseError::InvalidRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_then_read_tad_bed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chr21_TADs_ratio16.bed");

        let mut loci = vec![
            Locus::new("chr21".to_string(), 800000, 1200000),
            Locus::new("chr21".to_string(), 0, 400000),
        ];
        sort_loci(&mut loci);
        write_tad_bed(&path, &loci).unwrap();

        let back = read_loci(&path, 1).unwrap();
        assert_eq!(back, loci);
        assert_eq!(back[0].start, 0);
    }
}
