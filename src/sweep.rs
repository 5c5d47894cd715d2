//! Batch benchmark sweeps over model x replicate x chromosome units
//!
//! Each sweep expands per-model path templates into concrete input files,
//! scores every unit with the core comparison engine, and returns one
//! report row per unit. Units are independent and run on a rayon thread
//! pool; a unit whose inputs are missing or empty is logged and skipped
//! without disturbing its siblings.

use crate::core::{
    bp_jaccard, merge_named, normalize_loci, overlap_sets, validate_loci, BasePairJaccard,
    ChromevalError, Expansion, Locus, LoopCall, MergeOutcome, MetricsSummary, PeakIndex, Result,
};
use crate::formats::{bed, bedpe};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;

/// Default per-chromosome loop-call file inside a model directory
pub const LOOP_CALLS_SUBPATH: &str = "hiccups_results_{chrom}/merged_loops.bedpe";

/// Default per-chromosome reference loop file inside the reference directory
pub const REFERENCE_LOOPS_SUBPATH: &str = "hiccups_results_ori_KR_{chrom}/merged_loops.bedpe";

/// Default per-chromosome TAD block file inside a model directory
pub const TAD_BLOCKS_SUBPATH: &str =
    "preds_lr_test_{chrom}_ratio{ratio}_convert_10kb/10000_blocks.bedpe";

/// Default per-chromosome reference TAD file inside the reference directory
pub const REFERENCE_TADS_SUBPATH: &str = "HR_{chrom}_TADs_ratio{ratio}.bedpe";

/// Default per-factor peak file inside the marker directory
pub const MARKER_PEAKS_SUBPATH: &str = "{factor}/merged_output.txt";

/// A model under evaluation: a display name plus a path template
///
/// Templates may carry `{replicate}`, `{chrom}`, `{ratio}` and `{cell}`
/// placeholders. A template without `{chrom}` is treated as a model
/// directory and the sweep's default subpath is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub template: String,
}

impl FromStr for ModelSpec {
    type Err = String;

    /// Parse a `name=template` argument; a bare template names itself
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, template)) if !name.is_empty() && !template.is_empty() => Ok(Self {
                name: name.to_string(),
                template: template.to_string(),
            }),
            Some(_) => Err(format!("empty model name or template in '{}'", s)),
            None if s.is_empty() => Err("empty model argument".to_string()),
            None => Ok(Self {
                name: s.to_string(),
                template: s.to_string(),
            }),
        }
    }
}

/// Substitute `{key}` placeholders in a path template
fn expand_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut expanded = template.to_string();
    for (key, value) in vars {
        expanded = expanded.replace(&format!("{{{}}}", key), value);
    }
    expanded
}

/// Expand a base template into a concrete path
///
/// A base that already contains `marker` is a full per-unit template;
/// anything else is a directory and `subpath` is appended first.
fn resolve_unit_path(base: &str, subpath: &str, marker: &str, vars: &[(&str, &str)]) -> PathBuf {
    let template = if base.contains(marker) {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), subpath)
    };
    PathBuf::from(expand_template(&template, vars))
}

/// Settings for the loop benchmark sweep
#[derive(Debug, Clone)]
pub struct LoopSweepConfig {
    pub models: Vec<ModelSpec>,
    /// Reference directory or full template with `{chrom}`
    pub reference: String,
    pub replicates: Vec<String>,
    pub chromosomes: Vec<String>,
    /// Matching tolerance in base pairs
    pub tolerance: i64,
}

/// Settings for the TAD benchmark sweep
#[derive(Debug, Clone)]
pub struct TadSweepConfig {
    pub models: Vec<ModelSpec>,
    /// Reference directory or full template with `{chrom}`
    pub reference: String,
    pub replicates: Vec<String>,
    pub chromosomes: Vec<String>,
    /// Downsampling ratio substituted into `{ratio}` placeholders
    pub ratio: u32,
}

/// Settings for the marker validation sweep
#[derive(Debug, Clone)]
pub struct ValidateSweepConfig {
    pub models: Vec<ModelSpec>,
    /// Marker directory or full template with `{factor}`
    pub markers: String,
    pub cell_line: String,
    pub factors: Vec<String>,
    pub chromosomes: Vec<String>,
    /// Anchor padding in base pairs applied before merging
    pub tolerance: i64,
}

/// One loop benchmark result row
#[derive(Debug, Clone, PartialEq)]
pub struct LoopRow {
    pub model: String,
    pub replicate: String,
    pub chromosome: String,
    pub reference_count: usize,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub predicted_count: usize,
    pub overlap_jaccard: f64,
    pub f1: f64,
}

/// One TAD benchmark result row
#[derive(Debug, Clone, PartialEq)]
pub struct TadRow {
    pub model: String,
    pub replicate: String,
    pub chromosome: String,
    pub detected: usize,
    pub bp_jaccard: f64,
    pub f1: f64,
}

/// One marker validation result row
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRow {
    pub cell_line: String,
    pub model: String,
    pub chromosome: String,
    pub total_loci: usize,
    pub validated_loci: usize,
    pub percentage: f64,
}

/// Overlap metrics for one loop comparison under both expansion policies
///
/// `bounds` pads the raw anchor bounds and feeds the TP/FP/FN/F1 counts;
/// `centers` recenters each anchor on its midpoint and feeds the overlap
/// Jaccard.
#[derive(Debug, Clone)]
pub struct LoopComparison {
    pub bounds: MetricsSummary,
    pub centers: MetricsSummary,
}

/// Score predicted loop calls against reference calls
pub fn compare_loops(
    predicted: &[LoopCall<String>],
    reference: &[LoopCall<String>],
    tolerance: i64,
) -> LoopComparison {
    LoopComparison {
        bounds: loop_metrics(predicted, reference, tolerance, Expansion::Pad),
        centers: loop_metrics(predicted, reference, tolerance, Expansion::Center),
    }
}

fn loop_metrics(
    predicted: &[LoopCall<String>],
    reference: &[LoopCall<String>],
    tolerance: i64,
    policy: Expansion,
) -> MetricsSummary {
    let pred: Vec<_> = predicted.iter().map(|c| c.expand(tolerance, policy)).collect();
    let refs: Vec<_> = reference.iter().map(|c| c.expand(tolerance, policy)).collect();
    MetricsSummary::from_overlap_sets(&overlap_sets(&pred, &refs), &overlap_sets(&refs, &pred))
}

/// Score predicted TAD intervals against reference intervals
///
/// The F1 counts come from raw-bound overlap (tolerance 0); the Jaccard
/// is the base-pair geometric one.
pub fn compare_tads(
    predicted: &[Locus<String>],
    reference: &[Locus<String>],
) -> (MetricsSummary, BasePairJaccard) {
    let pred: Vec<_> = predicted.iter().map(|l| l.expand(0, Expansion::Pad)).collect();
    let refs: Vec<_> = reference.iter().map(|l| l.expand(0, Expansion::Pad)).collect();
    let metrics =
        MetricsSummary::from_overlap_sets(&overlap_sets(&pred, &refs), &overlap_sets(&refs, &pred));
    (metrics, bp_jaccard(predicted, reference))
}

/// Stack both anchors of every loop call, pad, and merge into validation loci
///
/// Duplicate anchors are dropped before padding (first occurrence wins);
/// anchors with non-numeric chromosomes are dropped during normalization
/// and counted in the outcome.
pub fn merged_loop_loci(calls: &[LoopCall<String>], tolerance: i64) -> MergeOutcome {
    let anchors = bedpe::stack_unique_anchors(calls);
    let padded: Vec<Locus<String>> = anchors.iter().map(|a| a.pad(tolerance)).collect();
    merge_named(&padded)
}

/// Load every available marker category into a containment index
///
/// A category whose peak file is missing or zero-length is excluded from
/// the returned set, so validation does not require it. Peak rows with a
/// non-numeric chromosome are dropped with a warning.
pub fn load_markers(base: &str, cell_line: &str, factors: &[String]) -> Vec<PeakIndex> {
    let mut markers = Vec::new();
    for factor in factors {
        let vars = [("cell", cell_line), ("factor", factor.as_str())];
        let path = resolve_unit_path(base, MARKER_PEAKS_SUBPATH, "{factor}", &vars);

        let has_data = std::fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);
        if !has_data {
            warn!("Marker {} missing for {}: {}", factor, cell_line, path.display());
            continue;
        }

        match bed::read_loci(&path, 0) {
            Ok(loci) => {
                let (numeric, dropped) = normalize_loci(&loci);
                if dropped > 0 {
                    warn!(
                        "Dropped {} rows with non-numeric chromosomes in {}",
                        dropped,
                        path.display()
                    );
                }
                info!("Loaded {} peaks for {}", numeric.len(), factor);
                markers.push(PeakIndex::new(&numeric));
            }
            Err(e) => warn!("Skipping marker {}: {}", path.display(), e),
        }
    }
    markers
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| {
            ChromevalError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to create thread pool: {}", e),
            ))
        })
}

fn sweep_units<'a>(
    models: &'a [ModelSpec],
    replicates: &'a [String],
    chromosomes: &'a [String],
) -> Vec<(&'a ModelSpec, &'a str, &'a str)> {
    let mut units = Vec::with_capacity(models.len() * replicates.len() * chromosomes.len());
    for model in models {
        for replicate in replicates {
            for chrom in chromosomes {
                units.push((model, replicate.as_str(), chrom.as_str()));
            }
        }
    }
    units
}

/// Run the loop benchmark over every model x replicate x chromosome unit
///
/// Rows come back in unit order. `threads` of 0 uses all cores.
pub fn run_loop_sweep(config: &LoopSweepConfig, threads: usize) -> Result<Vec<LoopRow>> {
    let pool = build_pool(threads)?;
    let units = sweep_units(&config.models, &config.replicates, &config.chromosomes);
    let rows = pool.install(|| {
        units
            .par_iter()
            .filter_map(|&(model, replicate, chrom)| {
                evaluate_loop_unit(config, model, replicate, chrom)
            })
            .collect()
    });
    Ok(rows)
}

fn evaluate_loop_unit(
    config: &LoopSweepConfig,
    model: &ModelSpec,
    replicate: &str,
    chrom: &str,
) -> Option<LoopRow> {
    let vars = [("replicate", replicate), ("chrom", chrom)];
    let predicted_path =
        resolve_unit_path(&model.template, LOOP_CALLS_SUBPATH, "{chrom}", &vars);
    let reference_path =
        resolve_unit_path(&config.reference, REFERENCE_LOOPS_SUBPATH, "{chrom}", &vars);

    let mut predicted = match bedpe::read_loops(&predicted_path, bedpe::JUICER_HEADER_LINES) {
        Ok(file) => file,
        Err(e) => {
            warn!("Skipping {} {} {}: {}", model.name, replicate, chrom, e);
            return None;
        }
    };
    let mut reference = match bedpe::read_loops(&reference_path, bedpe::JUICER_HEADER_LINES) {
        Ok(file) => file,
        Err(e) => {
            warn!("Skipping {} {} {}: {}", model.name, replicate, chrom, e);
            return None;
        }
    };
    if predicted.skipped_inter_chrom > 0 {
        warn!(
            "Dropped {} inter-chromosomal rows in {}",
            predicted.skipped_inter_chrom,
            predicted_path.display()
        );
    }
    debug!(
        "{} {} {}: {} predicted vs {} reference loops",
        model.name,
        replicate,
        chrom,
        predicted.records.len(),
        reference.records.len()
    );

    bedpe::sort_calls(&mut predicted.records);
    bedpe::sort_calls(&mut reference.records);

    if predicted.records.is_empty() || reference.records.is_empty() {
        warn!(
            "Skipping {} {} {}: empty loop callset",
            model.name, replicate, chrom
        );
        return None;
    }

    let comparison = compare_loops(&predicted.records, &reference.records, config.tolerance);
    let bounds = comparison.bounds;
    Some(LoopRow {
        model: model.name.clone(),
        replicate: replicate.to_string(),
        chromosome: chrom.to_string(),
        reference_count: bounds.n_reference,
        true_positives: bounds.true_positives,
        false_positives: bounds.false_positives,
        false_negatives: bounds.false_negatives,
        predicted_count: bounds.n_predicted,
        overlap_jaccard: comparison.centers.overlap_jaccard,
        f1: bounds.f1,
    })
}

/// Run the TAD benchmark over every model x replicate x chromosome unit
///
/// Each unit also publishes its sorted TAD intervals as a bed file next
/// to the block file before scoring. Rows come back in unit order.
pub fn run_tad_sweep(config: &TadSweepConfig, threads: usize) -> Result<Vec<TadRow>> {
    let pool = build_pool(threads)?;
    let units = sweep_units(&config.models, &config.replicates, &config.chromosomes);
    let rows = pool.install(|| {
        units
            .par_iter()
            .filter_map(|&(model, replicate, chrom)| {
                evaluate_tad_unit(config, model, replicate, chrom)
            })
            .collect()
    });
    Ok(rows)
}

fn evaluate_tad_unit(
    config: &TadSweepConfig,
    model: &ModelSpec,
    replicate: &str,
    chrom: &str,
) -> Option<TadRow> {
    let ratio = config.ratio.to_string();
    let vars = [
        ("replicate", replicate),
        ("chrom", chrom),
        ("ratio", ratio.as_str()),
    ];
    let blocks_path = resolve_unit_path(&model.template, TAD_BLOCKS_SUBPATH, "{chrom}", &vars);
    let reference_path =
        resolve_unit_path(&config.reference, REFERENCE_TADS_SUBPATH, "{chrom}", &vars);

    let blocks = match bedpe::read_loops(&blocks_path, bedpe::JUICER_HEADER_LINES) {
        Ok(file) => file,
        Err(e) => {
            warn!("Skipping {} {} {}: {}", model.name, replicate, chrom, e);
            return None;
        }
    };

    // The upstream anchor of each block is the TAD interval
    let mut predicted: Vec<Locus<String>> = blocks
        .records
        .iter()
        .map(|call| Locus::new(call.chrom.clone(), call.x_start, call.x_end))
        .collect();
    bed::sort_loci(&mut predicted);

    let bed_name = format!("{}_TADs_ratio{}.bed", chrom, config.ratio);
    let bed_path = match blocks_path.parent() {
        Some(dir) => dir.join(&bed_name),
        None => PathBuf::from(&bed_name),
    };
    if let Err(e) = bed::write_tad_bed(&bed_path, &predicted) {
        warn!("Could not write {}: {}", bed_path.display(), e);
    }

    let reference = match bed::read_loci(&reference_path, 1) {
        Ok(loci) => loci,
        Err(e) => {
            warn!("Skipping {} {} {}: {}", model.name, replicate, chrom, e);
            return None;
        }
    };

    if predicted.is_empty() || reference.is_empty() {
        warn!(
            "Skipping {} {} {}: empty TAD callset",
            model.name, replicate, chrom
        );
        return None;
    }

    let (metrics, bp) = compare_tads(&predicted, &reference);
    Some(TadRow {
        model: model.name.clone(),
        replicate: replicate.to_string(),
        chromosome: chrom.to_string(),
        detected: predicted.len(),
        bp_jaccard: bp.jaccard,
        f1: metrics.f1,
    })
}

/// Run the marker validation over every model x chromosome unit
///
/// Marker peak files are loaded once and shared across units. A unit
/// whose loop file parses to zero loci still reports, with rate 0.
pub fn run_validate_sweep(
    config: &ValidateSweepConfig,
    threads: usize,
) -> Result<Vec<ValidationRow>> {
    let markers = load_markers(&config.markers, &config.cell_line, &config.factors);
    if markers.len() < config.factors.len() {
        warn!(
            "{} of {} marker categories available for {}",
            markers.len(),
            config.factors.len(),
            config.cell_line
        );
    }

    let pool = build_pool(threads)?;
    let mut units = Vec::with_capacity(config.models.len() * config.chromosomes.len());
    for model in &config.models {
        for chrom in &config.chromosomes {
            units.push((model, chrom.as_str()));
        }
    }

    let rows = pool.install(|| {
        units
            .par_iter()
            .filter_map(|&(model, chrom)| evaluate_validation_unit(config, &markers, model, chrom))
            .collect()
    });
    Ok(rows)
}

fn evaluate_validation_unit(
    config: &ValidateSweepConfig,
    markers: &[PeakIndex],
    model: &ModelSpec,
    chrom: &str,
) -> Option<ValidationRow> {
    let vars = [("chrom", chrom), ("cell", config.cell_line.as_str())];
    let path = resolve_unit_path(&model.template, LOOP_CALLS_SUBPATH, "{chrom}", &vars);

    let loops = match bedpe::read_loops(&path, bedpe::JUICER_HEADER_LINES) {
        Ok(file) => file,
        Err(e) => {
            warn!("Skipping {} {}: {}", model.name, chrom, e);
            return None;
        }
    };
    info!("Loaded {} loops from {}", loops.records.len(), path.display());

    let outcome = merged_loop_loci(&loops.records, config.tolerance);
    if outcome.dropped > 0 {
        warn!(
            "Dropped {} anchors with non-numeric chromosomes in {}",
            outcome.dropped,
            path.display()
        );
    }

    let summary = validate_loci(&outcome.merged, markers);
    Some(ValidationRow {
        cell_line: config.cell_line.clone(),
        model: model.name.clone(),
        chromosome: chrom.to_string(),
        total_loci: summary.total,
        validated_loci: summary.validated,
        percentage: summary.percentage(),
    })
}
