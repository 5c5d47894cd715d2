//! Delimited report writers for sweep results
//!
//! One header line, then one row per benchmark unit. Scores are rounded
//! at serialization only; the in-memory rows keep full precision.

use crate::sweep::{LoopRow, TadRow, ValidationRow};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write the loop benchmark table as tab-separated text
pub fn write_loop_report(path: &Path, rows: &[LoopRow]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Model\tReplicate\tChromosome\tHR Loop Count\tTP\tFP\tFN\t\
         Enhanced Loop Count\tOverlap Jaccard\tF1 Score"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{:.4}",
            row.model,
            row.replicate,
            row.chromosome,
            row.reference_count,
            row.true_positives,
            row.false_positives,
            row.false_negatives,
            row.predicted_count,
            row.overlap_jaccard,
            row.f1
        )?;
    }
    writer.flush()
}

/// Write the TAD benchmark table as tab-separated text
pub fn write_tad_report(path: &Path, rows: &[TadRow]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Model\tReplicate\tChromosome\tDetected TADs\tBase-pair Jaccard\tF1 Score"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{:.4}\t{:.4}",
            row.model, row.replicate, row.chromosome, row.detected, row.bp_jaccard, row.f1
        )?;
    }
    writer.flush()
}

/// Write the marker validation table as comma-separated text
pub fn write_validation_report(path: &Path, rows: &[ValidationRow]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Cell Line,Model,Chromosome,Total Loci,Validated Loci,Validated Percentage"
    )?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{:.2}",
            row.cell_line,
            row.model,
            row.chromosome,
            row.total_loci,
            row.validated_loci,
            row.percentage
        )?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_loop_report_rounds_scores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("loops.tsv");

        let rows = vec![LoopRow {
            model: "model-a".to_string(),
            replicate: "rep1".to_string(),
            chromosome: "chr18".to_string(),
            reference_count: 3,
            true_positives: 1,
            false_positives: 1,
            false_negatives: 2,
            predicted_count: 2,
            overlap_jaccard: 1.0 / 3.0,
            f1: 0.4,
        }];
        write_loop_report(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Model\tReplicate\tChromosome\tHR Loop Count\tTP\tFP\tFN\tEnhanced Loop Count\tOverlap Jaccard\tF1 Score"
        );
        assert_eq!(
            lines.next().unwrap(),
            "model-a\trep1\tchr18\t3\t1\t1\t2\t2\t0.3333\t0.4000"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_tad_report_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tads.tsv");

        let rows = vec![TadRow {
            model: "model-a".to_string(),
            replicate: "rep1".to_string(),
            chromosome: "chr19".to_string(),
            detected: 42,
            bp_jaccard: 0.123456,
            f1: 1.0,
        }];
        write_tad_report(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Model\tReplicate\tChromosome\tDetected TADs\tBase-pair Jaccard\tF1 Score"
        );
        assert_eq!(lines.next().unwrap(), "model-a\trep1\tchr19\t42\t0.1235\t1.0000");
    }

    #[test]
    fn test_validation_report_percentage_two_decimals() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("validation.csv");

        let rows = vec![ValidationRow {
            cell_line: "GM12878".to_string(),
            model: "model-a".to_string(),
            chromosome: "chr18".to_string(),
            total_loci: 3,
            validated_loci: 2,
            percentage: 2.0 / 3.0 * 100.0,
        }];
        write_validation_report(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Cell Line,Model,Chromosome,Total Loci,Validated Loci,Validated Percentage"
        );
        assert_eq!(lines.next().unwrap(), "GM12878,model-a,chr18,3,2,66.67");
    }

    #[test]
    fn test_empty_rows_write_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.tsv");

        write_tad_report(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
