//! Chromeval CLI entry point
//!
//! Benchmarks chromatin loop and TAD predictions against high-resolution
//! references and converts predicted contact matrices to juicer pre input.

use chromeval::formats::matrix::{self, ConvertConfig};
use chromeval::report;
use chromeval::sweep::{
    self, LoopSweepConfig, ModelSpec, TadSweepConfig, ValidateSweepConfig,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chromeval")]
#[command(about = "Benchmarking of chromatin loop and TAD predictions")]
#[command(version)]
#[command(author = "Chromeval Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark loop calls against a high-resolution reference
    Loops {
        /// Model as name=template; {replicate} and {chrom} are substituted
        #[arg(short = 'm', long = "model", required = true, value_parser = ModelSpec::from_str)]
        models: Vec<ModelSpec>,
        /// Reference directory, or full template with {chrom}
        #[arg(short = 'r', long)]
        reference: String,
        /// Replicate labels substituted into {replicate}
        #[arg(long, value_delimiter = ',', default_value = "rep1")]
        replicates: Vec<String>,
        /// Chromosomes to evaluate
        #[arg(
            short = 'c',
            long,
            value_delimiter = ',',
            default_value = "chr18,chr19,chr20,chr21,chr22"
        )]
        chromosomes: Vec<String>,
        /// Matching tolerance in base pairs
        #[arg(long, default_value = "5000")]
        tolerance: i64,
        /// Output TSV file
        #[arg(short = 'o', long, default_value = "loop_benchmark.tsv")]
        output: PathBuf,
        /// Number of threads (0 = all cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },
    /// Benchmark TAD calls against a high-resolution reference
    Tads {
        /// Model as name=template; {replicate}, {chrom}, {ratio} are substituted
        #[arg(short = 'm', long = "model", required = true, value_parser = ModelSpec::from_str)]
        models: Vec<ModelSpec>,
        /// Reference directory, or full template with {chrom}
        #[arg(short = 'r', long)]
        reference: String,
        /// Replicate labels substituted into {replicate}
        #[arg(long, value_delimiter = ',', default_value = "rep1")]
        replicates: Vec<String>,
        /// Chromosomes to evaluate
        #[arg(
            short = 'c',
            long,
            value_delimiter = ',',
            default_value = "chr18,chr19,chr20,chr21,chr22"
        )]
        chromosomes: Vec<String>,
        /// Downsampling ratio substituted into {ratio}
        #[arg(long, default_value = "16")]
        ratio: u32,
        /// Output TSV file
        #[arg(short = 'o', long, default_value = "tad_benchmark.tsv")]
        output: PathBuf,
        /// Number of threads (0 = all cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },
    /// Validate merged loop anchors against ChIP-seq marker peaks
    Validate {
        /// Model as name=template; {chrom} and {cell} are substituted
        #[arg(short = 'm', long = "model", required = true, value_parser = ModelSpec::from_str)]
        models: Vec<ModelSpec>,
        /// Marker directory, or full template with {factor}
        #[arg(long)]
        markers: String,
        /// Cell line label, substituted into {cell}
        #[arg(long, default_value = "GM12878")]
        cell_line: String,
        /// Marker categories required for validation
        #[arg(long, value_delimiter = ',', default_value = "CTCF,RAD21,SMC3")]
        factors: Vec<String>,
        /// Chromosomes to evaluate
        #[arg(
            short = 'c',
            long,
            value_delimiter = ',',
            default_value = "chr18,chr19,chr20,chr21,chr22"
        )]
        chromosomes: Vec<String>,
        /// Anchor padding in base pairs applied before merging
        #[arg(long, default_value = "5000")]
        tolerance: i64,
        /// Output CSV file
        #[arg(short = 'o', long, default_value = "loop_validation.csv")]
        output: PathBuf,
        /// Number of threads (0 = all cores)
        #[arg(short = 't', long, default_value = "0")]
        threads: usize,
    },
    /// Convert predicted contact crops to sparse contacts and juicer pre input
    Matrix {
        /// Predicted crops (.npy, shape [n, size, size, 1])
        predictions: PathBuf,
        /// Low-resolution sparse contact file used for crop selection
        lr_contacts: PathBuf,
        /// Chromosome sizes file (name<TAB>length)
        chrom_sizes: PathBuf,
        /// Chromosome the predictions cover
        #[arg(long)]
        chrom: String,
        /// Bin resolution in base pairs
        #[arg(long, default_value = "10000")]
        resolution: u64,
        /// Crop edge length in bins
        #[arg(long, default_value = "40")]
        crop_size: usize,
        /// Diagonal band width in bins
        #[arg(long, default_value = "200")]
        band: usize,
        /// Output sparse contact file
        #[arg(short = 'o', long, default_value = "predicted_contacts.txt")]
        output: PathBuf,
        /// Also write juicer pre format to this path
        #[arg(long)]
        pre: Option<PathBuf>,
        /// Strip a 'chr' prefix from the chromosome name in pre output
        #[arg(long)]
        strip_chr_prefix: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Loops {
            models,
            reference,
            replicates,
            chromosomes,
            tolerance,
            output,
            threads,
        } => {
            let units = models.len() * replicates.len() * chromosomes.len();
            eprintln!("Benchmarking loops: {} models, {} units", models.len(), units);

            let config = LoopSweepConfig {
                models,
                reference,
                replicates,
                chromosomes,
                tolerance,
            };
            let rows = sweep::run_loop_sweep(&config, threads)?;
            report::write_loop_report(&output, &rows)?;

            eprintln!("\n=== Loop Benchmark ===");
            eprintln!("Units scored:    {}", rows.len());
            eprintln!("Units skipped:   {}", units - rows.len());
            eprintln!("Report:          {:?}", output);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Tads {
            models,
            reference,
            replicates,
            chromosomes,
            ratio,
            output,
            threads,
        } => {
            let units = models.len() * replicates.len() * chromosomes.len();
            eprintln!("Benchmarking TADs: {} models, {} units", models.len(), units);

            let config = TadSweepConfig {
                models,
                reference,
                replicates,
                chromosomes,
                ratio,
            };
            let rows = sweep::run_tad_sweep(&config, threads)?;
            report::write_tad_report(&output, &rows)?;

            eprintln!("\n=== TAD Benchmark ===");
            eprintln!("Units scored:    {}", rows.len());
            eprintln!("Units skipped:   {}", units - rows.len());
            eprintln!("Report:          {:?}", output);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Validate {
            models,
            markers,
            cell_line,
            factors,
            chromosomes,
            tolerance,
            output,
            threads,
        } => {
            let units = models.len() * chromosomes.len();
            eprintln!(
                "Validating loop anchors for {}: {} models, {} units",
                cell_line,
                models.len(),
                units
            );

            let config = ValidateSweepConfig {
                models,
                markers,
                cell_line,
                factors,
                chromosomes,
                tolerance,
            };
            let rows = sweep::run_validate_sweep(&config, threads)?;
            report::write_validation_report(&output, &rows)?;

            eprintln!("\n=== Marker Validation ===");
            eprintln!("Units scored:    {}", rows.len());
            eprintln!("Units skipped:   {}", units - rows.len());
            eprintln!("Report:          {:?}", output);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Matrix {
            predictions,
            lr_contacts,
            chrom_sizes,
            chrom,
            resolution,
            crop_size,
            band,
            output,
            pre,
            strip_chr_prefix,
        } => {
            eprintln!("Converting predictions: {:?} -> {:?}", predictions, output);

            let config = ConvertConfig {
                predictions,
                lr_contacts,
                chrom_sizes,
                chrom,
                resolution,
                crop_size,
                band,
                out_contacts: output,
                out_pre: pre,
                strip_chr_prefix,
            };
            let stats = matrix::convert_predictions(&config)?;

            eprintln!("\n=== Conversion Statistics ===");
            eprintln!("Matrix dimension: {}", stats.dim);
            eprintln!("Crops kept:       {}", stats.crops);
            eprintln!("Contacts written: {}", stats.contacts);
            eprintln!("Time elapsed:     {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
