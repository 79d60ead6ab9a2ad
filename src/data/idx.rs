use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::DataError;
use crate::math::vector::Vector;

/// Conventional MNIST file names inside a data directory.  `load_mnist` also
/// accepts each with a `.gz` suffix.
pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Labelled samples: `patterns[i]` has class `labels[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub patterns: Vec<Vector>,
    pub labels: Vec<usize>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Keeps only the first `limit` samples.
    pub fn truncate(&mut self, limit: usize) {
        self.patterns.truncate(limit);
        self.labels.truncate(limit);
    }
}

/// Parses an IDX3 image file and IDX1 label file (the MNIST format).
///
/// # IDX3 image file layout
/// ```text
/// bytes  0-1:   0x00 0x00   (reserved, must be zero)
/// byte   2:     0x08        (dtype = uint8)
/// byte   3:     0x03        (number of dimensions = 3)
/// bytes  4-7:   N           (number of images, big-endian u32)
/// bytes  8-11:  rows        (big-endian u32)
/// bytes 12-15:  cols        (big-endian u32)
/// bytes 16..:   N * rows * cols bytes, row-major, uint8
/// ```
///
/// # IDX1 label file layout
/// ```text
/// bytes  0-3:   0x00 0x00 0x08 0x01
/// bytes  4-7:   N           (number of labels, big-endian u32)
/// bytes  8..:   N bytes, each a class index
/// ```
///
/// Pixels are divided by 255.0 so every pattern value lies in `[0.0, 1.0]`.
pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Dataset, DataError> {
    // ── Image file ──────────────────────────────────────────────────────────

    check_header(image_bytes, "image", 3, 16)?;
    let n_items = read_u32(image_bytes, 4);
    let rows = read_u32(image_bytes, 8);
    let cols = read_u32(image_bytes, 12);

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| DataError::BadHeader {
        kind: "image",
        message: format!("rows * cols overflows (rows={rows}, cols={cols})"),
    })?;
    let required_image_len = n_items
        .checked_mul(n_pixels)
        .and_then(|n| n.checked_add(16))
        .ok_or_else(|| DataError::BadHeader {
            kind: "image",
            message: format!("data length overflows (items={n_items}, pixels={n_pixels})"),
        })?;
    if image_bytes.len() < required_image_len {
        return Err(DataError::Truncated {
            kind: "image",
            expected: required_image_len,
            actual: image_bytes.len(),
        });
    }

    // ── Label file ──────────────────────────────────────────────────────────

    check_header(label_bytes, "label", 1, 8)?;
    let label_count = read_u32(label_bytes, 4);
    if label_count != n_items {
        return Err(DataError::CountMismatch { images: n_items, labels: label_count });
    }
    let required_label_len = 8 + n_items;
    if label_bytes.len() < required_label_len {
        return Err(DataError::Truncated {
            kind: "label",
            expected: required_label_len,
            actual: label_bytes.len(),
        });
    }

    // ── Build dataset ───────────────────────────────────────────────────────

    let patterns = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        image_bytes[16..required_image_len]
            .chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
            .collect()
    };
    let labels = label_bytes[8..required_label_len]
        .iter()
        .map(|&l| l as usize)
        .collect();

    Ok(Dataset { patterns, labels })
}

/// Reads and parses an image/label file pair from disk.  Gzip-compressed
/// files are inflated transparently.
pub fn load_idx_pair(image_path: &Path, label_path: &Path) -> Result<Dataset, DataError> {
    let image_bytes = read_file(image_path)?;
    let label_bytes = read_file(label_path)?;
    let dataset = parse_idx_pair(&image_bytes, &label_bytes)?;
    info!(
        images = %image_path.display(),
        samples = dataset.len(),
        "loaded IDX dataset"
    );
    Ok(dataset)
}

/// Loads the MNIST training and test splits from `dir`, preferring the
/// `.gz` archives when both forms are present.
pub fn load_mnist(dir: &Path) -> Result<(Dataset, Dataset), DataError> {
    let train = load_idx_pair(&locate(dir, TRAIN_IMAGES), &locate(dir, TRAIN_LABELS))?;
    let test = load_idx_pair(&locate(dir, TEST_IMAGES), &locate(dir, TEST_LABELS))?;
    Ok((train, test))
}

fn locate(dir: &Path, name: &str) -> PathBuf {
    let gz = dir.join(format!("{name}.gz"));
    if gz.is_file() { gz } else { dir.join(name) }
}

fn read_file(path: &Path) -> Result<Vec<u8>, DataError> {
    let bytes = std::fs::read(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    maybe_gunzip(bytes, &path.display().to_string())
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflates `bytes` if they start with the gzip magic; IDX data never does.
fn maybe_gunzip(bytes: Vec<u8>, origin: &str) -> Result<Vec<u8>, DataError> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }
    let mut inflated = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut inflated)
        .map_err(|source| DataError::Decompress { path: origin.to_string(), source })?;
    debug!(origin, compressed = bytes.len(), inflated = inflated.len(), "gunzipped IDX data");
    Ok(inflated)
}

fn check_header(bytes: &[u8], kind: &'static str, dims: u8, header_len: usize) -> Result<(), DataError> {
    if bytes.len() < header_len {
        return Err(DataError::Truncated { kind, expected: header_len, actual: bytes.len() });
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(DataError::BadHeader {
            kind,
            message: format!("bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}", bytes[0], bytes[1]),
        });
    }
    if bytes[2] != 0x08 {
        return Err(DataError::BadHeader {
            kind,
            message: format!("dtype byte must be 0x08 (uint8), got 0x{:02X}", bytes[2]),
        });
    }
    if bytes[3] != dims {
        return Err(DataError::BadHeader {
            kind,
            message: format!("expected {dims} dimensions, got {}", bytes[3]),
        });
    }
    Ok(())
}

fn read_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    fn images(n: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut b = vec![0x00, 0x00, 0x08, 0x03];
        b.extend_from_slice(&n.to_be_bytes());
        b.extend_from_slice(&rows.to_be_bytes());
        b.extend_from_slice(&cols.to_be_bytes());
        b.extend_from_slice(pixels);
        b
    }

    fn labels(values: &[u8]) -> Vec<u8> {
        let mut b = vec![0x00, 0x00, 0x08, 0x01];
        b.extend_from_slice(&(values.len() as u32).to_be_bytes());
        b.extend_from_slice(values);
        b
    }

    #[test]
    fn parses_and_normalizes() {
        let ds = parse_idx_pair(&images(2, 1, 2, &[0, 255, 51, 102]), &labels(&[7, 3])).unwrap();
        assert_eq!(ds.patterns, vec![vec![0.0, 1.0], vec![0.2, 0.4]]);
        assert_eq!(ds.labels, vec![7, 3]);
    }

    #[test]
    fn rejects_truncated_images() {
        let err = parse_idx_pair(&images(2, 2, 2, &[0; 5]), &labels(&[0, 1])).unwrap_err();
        assert!(matches!(err, DataError::Truncated { kind: "image", expected: 24, actual: 21 }));
    }

    #[test]
    fn rejects_label_file_as_images() {
        let err = parse_idx_pair(&labels(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), &labels(&[1])).unwrap_err();
        assert!(matches!(err, DataError::BadHeader { kind: "image", .. }));
    }

    #[test]
    fn rejects_count_mismatch() {
        let err = parse_idx_pair(&images(1, 1, 1, &[9]), &labels(&[1, 2])).unwrap_err();
        assert!(matches!(err, DataError::CountMismatch { images: 1, labels: 2 }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_idx_pair(Path::new("/nonexistent/images"), Path::new("/nonexistent/labels"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/images"));
    }

    #[test]
    fn gzipped_bytes_are_inflated() {
        let raw = images(1, 1, 2, &[0, 255]);
        assert_eq!(maybe_gunzip(gzip(&raw), "mem").unwrap(), raw);
        assert_eq!(maybe_gunzip(raw.clone(), "mem").unwrap(), raw);
    }

    #[test]
    fn corrupt_gzip_is_reported() {
        let mut bytes = gzip(&labels(&[1, 2]));
        bytes.truncate(12);
        let err = maybe_gunzip(bytes, "labels.gz").unwrap_err();
        assert!(matches!(err, DataError::Decompress { ref path, .. } if path == "labels.gz"));
    }

    #[test]
    fn load_mnist_prefers_gzip_and_falls_back_to_plain() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, bytes: &[u8]| std::fs::write(dir.path().join(name), bytes).unwrap();

        write(&format!("{TRAIN_IMAGES}.gz"), &gzip(&images(2, 1, 1, &[0, 255])));
        write(TRAIN_IMAGES, &images(1, 1, 1, &[51]));
        write(&format!("{TRAIN_LABELS}.gz"), &gzip(&labels(&[4, 9])));
        write(TEST_IMAGES, &images(1, 1, 1, &[102]));
        write(TEST_LABELS, &labels(&[3]));

        let (train, test) = load_mnist(dir.path()).unwrap();
        assert_eq!(train.patterns, vec![vec![0.0], vec![1.0]]);
        assert_eq!(train.labels, vec![4, 9]);
        assert_eq!(test.patterns, vec![vec![0.4]]);
        assert_eq!(test.labels, vec![3]);
    }
}
