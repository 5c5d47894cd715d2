//! Hi-C contact matrix conversion
//!
//! Turns model predictions stored as NumPy crop arrays back into sparse
//! contact lists: reads the `.npy` payload, selects the crop grid that
//! passed quality control on the low-resolution input, averages scores
//! that land on the same bin pair, and writes both a plain contact list
//! and juicer "pre" input.

use crate::core::io::{create_buf_reader, ByteLineIterator, SmartReader};
use crate::core::{MatrixError, MatrixResult};
use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, info};
use ndarray::{s, Array2, ArrayD, IxDyn};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// Bin resolution in base pairs
pub const DEFAULT_RESOLUTION: u64 = 10_000;

/// Crop edge length in bins
pub const DEFAULT_CROP_SIZE: usize = 40;

/// Diagonal band half-width in bins; crops farther from the diagonal
/// are never considered
pub const DIAGONAL_BAND: usize = 200;

/// Minimum fraction of nonzero entries for a crop to pass quality control
pub const MIN_NONZERO_RATE: f64 = 0.05;

const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Read a `.npy` array into a dynamic-dimension f64 array
///
/// Supports format versions 1.x and 2.x with little-endian `f4`/`f8`
/// payloads in C order, which covers arrays written by `numpy.save`.
pub fn read_npy(path: &Path) -> MatrixResult<ArrayD<f64>> {
    let mut reader = create_buf_reader(path)?;

    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != NPY_MAGIC {
        return Err(MatrixError::InvalidNpy {
            message: "bad magic bytes".to_string(),
        });
    }

    let major = reader.read_u8()?;
    let _minor = reader.read_u8()?;
    let header_len = match major {
        1 => reader.read_u16::<LittleEndian>()? as usize,
        2 | 3 => reader.read_u32::<LittleEndian>()? as usize,
        other => {
            return Err(MatrixError::InvalidNpy {
                message: format!("unsupported format version {other}"),
            })
        }
    };

    let mut header_bytes = vec![0u8; header_len];
    reader.read_exact(&mut header_bytes)?;
    let header =
        std::str::from_utf8(&header_bytes).map_err(|_| MatrixError::InvalidNpy {
            message: "header is not valid UTF-8".to_string(),
        })?;

    let descr = extract_quoted(header, "descr").ok_or_else(|| MatrixError::InvalidNpy {
        message: "missing descr".to_string(),
    })?;
    if header.contains("'fortran_order': True") {
        return Err(MatrixError::InvalidNpy {
            message: "Fortran-order arrays are not supported".to_string(),
        });
    }
    let shape = extract_shape(header).ok_or_else(|| MatrixError::InvalidNpy {
        message: "missing shape".to_string(),
    })?;
    let total: usize = shape.iter().product();

    let data = match descr.as_str() {
        "<f4" => {
            let mut buf = vec![0f32; total];
            reader.read_f32_into::<LittleEndian>(&mut buf)?;
            buf.into_iter().map(f64::from).collect()
        }
        "<f8" => {
            let mut buf = vec![0f64; total];
            reader.read_f64_into::<LittleEndian>(&mut buf)?;
            buf
        }
        other => return Err(MatrixError::UnsupportedDtype(other.to_string())),
    };

    ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|e| MatrixError::InvalidNpy {
        message: e.to_string(),
    })
}

fn extract_quoted(header: &str, key: &str) -> Option<String> {
    let pattern = format!("'{key}':");
    let rest = &header[header.find(&pattern)? + pattern.len()..];
    let open = rest.find('\'')?;
    let rest = &rest[open + 1..];
    let close = rest.find('\'')?;
    Some(rest[..close].to_string())
}

fn extract_shape(header: &str) -> Option<Vec<usize>> {
    let rest = &header[header.find("'shape':")? + "'shape':".len()..];
    let open = rest.find('(')?;
    let close = rest.find(')')?;
    let inner = &rest[open + 1..close];
    let mut shape = Vec::new();
    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        shape.push(part.parse().ok()?);
    }
    Some(shape)
}

/// Read a `name length` chromosome sizes file
pub fn read_chrom_sizes(path: &Path) -> MatrixResult<HashMap<String, u64>> {
    let reader = create_buf_reader(path)?;
    let mut lines = ByteLineIterator::new(reader);

    let mut sizes = HashMap::new();
    let mut line_number = 0usize;
    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;
        if line.is_empty() {
            continue;
        }
        let text = std::str::from_utf8(line).map_err(|_| MatrixError::InvalidSizes {
            line: line_number,
            message: "not valid UTF-8".to_string(),
        })?;
        let mut fields = text.split_whitespace();
        let name = fields.next();
        let length = fields.next().and_then(|s| s.parse::<u64>().ok());
        match (name, length) {
            (Some(name), Some(length)) => {
                sizes.insert(name.to_string(), length);
            }
            _ => {
                return Err(MatrixError::InvalidSizes {
                    line: line_number,
                    message: format!("expected 'name length', got '{text}'"),
                })
            }
        }
    }
    Ok(sizes)
}

/// Matrix dimension in bins for a chromosome length: ceil(length / resolution)
pub fn matrix_dimension(chrom_len: u64, resolution: u64) -> usize {
    ((chrom_len + resolution - 1) / resolution) as usize
}

/// Look up a chromosome's bin dimension in a sizes table
pub fn chrom_dimension(
    sizes: &HashMap<String, u64>,
    chrom: &str,
    resolution: u64,
) -> MatrixResult<usize> {
    sizes
        .get(chrom)
        .map(|&len| matrix_dimension(len, resolution))
        .ok_or_else(|| MatrixError::ChromosomeNotFound(chrom.to_string()))
}

/// Read a sparse `pos1 pos2 value` contact list into a dense symmetric matrix
///
/// Positions are binned at `resolution`; entries landing outside the
/// `dim x dim` grid are skipped. The upper triangle is mirrored into the
/// lower one with the diagonal counted once.
pub fn read_contact_matrix(path: &Path, dim: usize, resolution: u64) -> MatrixResult<Array2<f64>> {
    let reader = SmartReader::open_auto(path)?;
    let mut lines = ByteLineIterator::new(reader);

    let mut matrix = Array2::<f64>::zeros((dim, dim));
    let mut line_number = 0usize;
    let resolution = resolution as f64;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;
        if line.is_empty() {
            continue;
        }
        let text = std::str::from_utf8(line).map_err(|_| MatrixError::InvalidContact {
            line: line_number,
            message: "not valid UTF-8".to_string(),
        })?;

        let mut fields = text.split('\t');
        let pos1 = parse_contact_field(fields.next(), line_number)?;
        let pos2 = parse_contact_field(fields.next(), line_number)?;
        let value = parse_contact_field(fields.next(), line_number)?;

        let bin1 = pos1 / resolution;
        let bin2 = pos2 / resolution;
        if bin1 >= dim as f64 || bin2 >= dim as f64 {
            continue;
        }
        matrix[[bin1 as usize, bin2 as usize]] = value;
    }

    let transposed = matrix.t().to_owned();
    let diagonal = Array2::from_diag(&matrix.diag());
    Ok(matrix + &transposed - &diagonal)
}

fn parse_contact_field(field: Option<&str>, line: usize) -> MatrixResult<f64> {
    let field = field.ok_or_else(|| MatrixError::InvalidContact {
        line,
        message: "expected 3 tab-separated fields".to_string(),
    })?;
    field
        .trim()
        .parse()
        .map_err(|_| MatrixError::InvalidContact {
            line,
            message: format!("invalid number '{field}'"),
        })
}

/// Select the crop grid positions that pass quality control
///
/// Crops step by `size` along both axes over `[0, dim - size)`, keep only
/// positions within `band` bins of the diagonal, and require at least
/// `min_nonzero_rate` nonzero entries in the low-resolution crop. A
/// matrix not strictly larger than the band cannot be cropped.
pub fn crop_indices(
    lr: &Array2<f64>,
    size: usize,
    band: usize,
    min_nonzero_rate: f64,
) -> MatrixResult<Vec<(usize, usize)>> {
    let (rows, cols) = lr.dim();
    if rows <= band || cols <= band {
        return Err(MatrixError::MatrixTooSmall { rows, band });
    }

    let min_nonzero = min_nonzero_rate * (size * size) as f64;
    let mut indices = Vec::new();
    let mut idx1 = 0;
    while idx1 + size < rows {
        let mut idx2 = 0;
        while idx2 + size < cols {
            if idx1.abs_diff(idx2) < band {
                let crop = lr.slice(s![idx1..idx1 + size, idx2..idx2 + size]);
                let nonzero = crop.iter().filter(|&&v| v != 0.0).count();
                if nonzero as f64 >= min_nonzero {
                    indices.push((idx1, idx2));
                }
            }
            idx2 += size;
        }
        idx1 += size;
    }
    Ok(indices)
}

/// One sparse contact record, `pos1 <= pos2`
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEntry {
    pub pos1: u64,
    pub pos2: u64,
    pub score: f64,
}

/// Reassemble predicted crops into an averaged sparse contact list
///
/// `preds` must have shape `[n, size, size, 1]` with one crop per entry
/// of `indices`. Every nonzero score maps to a base-pair position pair;
/// the pair is keyed in sorted order so mirrored crops accumulate into
/// the same entry, and duplicates are averaged. Output is sorted by
/// (pos2, pos1).
pub fn assemble_contacts(
    preds: &ArrayD<f64>,
    indices: &[(usize, usize)],
    resolution: u64,
) -> MatrixResult<Vec<ContactEntry>> {
    let shape = preds.shape();
    if preds.ndim() != 4 || shape[3] != 1 {
        return Err(MatrixError::ShapeMismatch {
            expected: "[n, size, size, 1]".to_string(),
            got: format!("{shape:?}"),
        });
    }
    if shape[0] != indices.len() {
        return Err(MatrixError::ShapeMismatch {
            expected: format!("{} crops", indices.len()),
            got: format!("{} crops", shape[0]),
        });
    }

    let mut entries: HashMap<(u64, u64), (f64, u64)> = HashMap::new();
    for (i, &(idx1, idx2)) in indices.iter().enumerate() {
        for row in 0..shape[1] {
            for col in 0..shape[2] {
                let score = preds[[i, row, col, 0]];
                if score != 0.0 {
                    let pos1 = (idx1 + row) as u64 * resolution;
                    let pos2 = (idx2 + col) as u64 * resolution;
                    let key = if pos1 <= pos2 {
                        (pos1, pos2)
                    } else {
                        (pos2, pos1)
                    };
                    let entry = entries.entry(key).or_insert((0.0, 0));
                    entry.0 += score;
                    entry.1 += 1;
                }
            }
        }
    }

    let mut contacts: Vec<ContactEntry> = entries
        .into_iter()
        .map(|((pos1, pos2), (sum, count))| ContactEntry {
            pos1,
            pos2,
            score: sum / count as f64,
        })
        .collect();
    contacts.sort_by(|a, b| a.pos2.cmp(&b.pos2).then(a.pos1.cmp(&b.pos1)));
    Ok(contacts)
}

/// Write contacts as `pos1<TAB>pos2<TAB>score` lines
pub fn write_contacts(path: &Path, entries: &[ContactEntry]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        writeln!(writer, "{}\t{}\t{}", entry.pos1, entry.pos2, entry.score)?;
    }
    writer.flush()
}

/// Write contacts in juicer "pre" short format
///
/// One line per contact:
/// `0 <chrom> <pos1> 0 0 <chrom> <pos2> 1 <score>`. With
/// `strip_chr_prefix` the leading `chr` is removed from the chromosome
/// name (hg19-style references expect bare names).
pub fn write_pre(
    path: &Path,
    chrom: &str,
    entries: &[ContactEntry],
    strip_chr_prefix: bool,
) -> io::Result<()> {
    let chrom = if strip_chr_prefix {
        chrom.strip_prefix("chr").unwrap_or(chrom)
    } else {
        chrom
    };
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        writeln!(
            writer,
            "0 {chrom} {} 0 0 {chrom} {} 1 {}",
            entry.pos1, entry.pos2, entry.score
        )?;
    }
    writer.flush()
}

/// Configuration for one prediction conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Predicted crops, `[n, size, size, 1]`
    pub predictions: std::path::PathBuf,
    /// Low-resolution sparse contact list used for crop selection
    pub lr_contacts: std::path::PathBuf,
    /// Chromosome sizes file
    pub chrom_sizes: std::path::PathBuf,
    pub chrom: String,
    pub resolution: u64,
    pub crop_size: usize,
    /// Diagonal band half-width in bins
    pub band: usize,
    /// Averaged contact list output
    pub out_contacts: std::path::PathBuf,
    /// Optional juicer pre output
    pub out_pre: Option<std::path::PathBuf>,
    pub strip_chr_prefix: bool,
}

/// Counters reported after a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertStats {
    pub dim: usize,
    pub crops: usize,
    pub contacts: usize,
}

/// Run the full conversion: crop selection, reassembly, serialization
pub fn convert_predictions(config: &ConvertConfig) -> crate::core::Result<ConvertStats> {
    let sizes = read_chrom_sizes(&config.chrom_sizes)?;
    let dim = chrom_dimension(&sizes, &config.chrom, config.resolution)?;
    debug!("{}: {} bins at {} bp", config.chrom, dim, config.resolution);

    info!("reading low-resolution contacts from {}", config.lr_contacts.display());
    let lr = read_contact_matrix(&config.lr_contacts, dim, config.resolution)?;
    let indices = crop_indices(&lr, config.crop_size, config.band, MIN_NONZERO_RATE)?;
    info!("{} crops passed quality control", indices.len());

    info!("reading predictions from {}", config.predictions.display());
    let preds = read_npy(&config.predictions)?;
    let contacts = assemble_contacts(&preds, &indices, config.resolution)?;

    write_contacts(&config.out_contacts, &contacts)?;
    if let Some(pre_path) = &config.out_pre {
        write_pre(pre_path, &config.chrom, &contacts, config.strip_chr_prefix)?;
    }

    Ok(ConvertStats {
        dim,
        crops: indices.len(),
        contacts: contacts.len(),
    })
}
