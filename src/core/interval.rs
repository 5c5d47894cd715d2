//! Genomic interval records and tolerance expansion
//!
//! Defines the 1D locus and 2D loop-call records the comparison engine
//! operates on, plus the expansion policies that turn raw coordinates
//! into matching windows.

/// Default matching tolerance in base pairs
pub const DEFAULT_TOLERANCE: i64 = 5000;

/// A 1D genomic interval on one chromosome
///
/// Coordinates are signed: tolerance padding may push a start below zero
/// and the padded value takes part in comparison as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locus<C> {
    pub chrom: C,
    pub start: i64,
    pub end: i64,
}

impl<C> Locus<C> {
    pub fn new(chrom: C, start: i64, end: i64) -> Self {
        Self { chrom, start, end }
    }

    /// Interval length in base pairs (closed-coordinate span)
    pub fn span(&self) -> i64 {
        self.end - self.start
    }

    /// Pad both bounds by a fixed tolerance, staying in integer coordinates
    pub fn pad(&self, tolerance: i64) -> Self
    where
        C: Clone,
    {
        Self {
            chrom: self.chrom.clone(),
            start: self.start - tolerance,
            end: self.end + tolerance,
        }
    }

    /// Expand into a matching window under the given policy
    pub fn expand(&self, tolerance: i64, policy: Expansion) -> Expanded1<C>
    where
        C: Clone,
    {
        Expanded1 {
            chrom: self.chrom.clone(),
            window: Window::from_bounds(self.start, self.end, tolerance, policy),
        }
    }
}

/// A chromatin loop call: two interacting anchor intervals on one chromosome
///
/// The x anchor is the upstream anchor, the y anchor the downstream one.
/// Inter-chromosomal calls are rejected at parse time, so a single
/// chromosome key covers both anchors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoopCall<C> {
    pub chrom: C,
    pub x_start: i64,
    pub x_end: i64,
    pub y_start: i64,
    pub y_end: i64,
}

impl<C> LoopCall<C> {
    pub fn new(chrom: C, x_start: i64, x_end: i64, y_start: i64, y_end: i64) -> Self {
        Self {
            chrom,
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Expand both anchors into matching windows under the given policy
    pub fn expand(&self, tolerance: i64, policy: Expansion) -> Expanded2<C>
    where
        C: Clone,
    {
        Expanded2 {
            chrom: self.chrom.clone(),
            x: Window::from_bounds(self.x_start, self.x_end, tolerance, policy),
            y: Window::from_bounds(self.y_start, self.y_end, tolerance, policy),
        }
    }

    /// The two anchors as separate 1D loci
    pub fn anchors(&self) -> (Locus<C>, Locus<C>)
    where
        C: Clone,
    {
        (
            Locus::new(self.chrom.clone(), self.x_start, self.x_end),
            Locus::new(self.chrom.clone(), self.y_start, self.y_end),
        )
    }
}

/// Tolerance expansion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Subtract the tolerance from the start and add it to the end
    Pad,
    /// Recenter on the interval midpoint, then pad both sides
    Center,
}

/// A matching window on one axis, closed on both bounds
///
/// Bounds are `f64` because center expansion of an odd-length span lands
/// on a half-integer midpoint. Integer inputs are exactly representable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub min: f64,
    pub max: f64,
}

impl Window {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn from_bounds(start: i64, end: i64, tolerance: i64, policy: Expansion) -> Self {
        let tolerance = tolerance as f64;
        match policy {
            Expansion::Pad => Self {
                min: start as f64 - tolerance,
                max: end as f64 + tolerance,
            },
            Expansion::Center => {
                let mid = (start as f64 + end as f64) / 2.0;
                Self {
                    min: mid - tolerance,
                    max: mid + tolerance,
                }
            }
        }
    }

    /// Closed-interval intersection test; equal bounds count as overlap
    pub fn intersects(&self, other: &Window) -> bool {
        self.max >= other.min && other.max >= self.min
    }
}

/// A tolerance-expanded 1D interval, ready for matching
#[derive(Debug, Clone)]
pub struct Expanded1<C> {
    pub chrom: C,
    pub window: Window,
}

/// A tolerance-expanded loop call, ready for matching
#[derive(Debug, Clone)]
pub struct Expanded2<C> {
    pub chrom: C,
    pub x: Window,
    pub y: Window,
}

/// Normalize a chromosome name to a numeric key
///
/// Strips a leading `chr` prefix case-insensitively and parses the rest
/// as an integer. Non-numeric chromosomes (X, Y, M) yield `None` and are
/// dropped by the callers that require numeric keys.
pub fn normalize_chrom(name: &str) -> Option<u32> {
    let stripped = if name.len() >= 3 && name[..3].eq_ignore_ascii_case("chr") {
        &name[3..]
    } else {
        name
    };
    stripped.trim().parse().ok()
}

/// Normalize a batch of loci to numeric chromosome keys
///
/// Returns the surviving records in input order plus the count of records
/// dropped for a non-numeric chromosome.
pub fn normalize_loci(loci: &[Locus<String>]) -> (Vec<Locus<u32>>, usize) {
    let mut out = Vec::with_capacity(loci.len());
    let mut dropped = 0usize;
    for locus in loci {
        match normalize_chrom(&locus.chrom) {
            Some(key) => out.push(Locus::new(key, locus.start, locus.end)),
            None => dropped += 1,
        }
    }
    (out, dropped)
}
