//! # word2vec loaders
//!
//! Reads vectors in the two layouts the word2vec tool writes:
//!
//! - binary: a `"<count> <dimension>\n"` header, then per word the UTF-8 word,
//!   a single space, `dimension` little-endian `f32`s and an optional newline;
//! - text: an optional `"<count> <dimension>"` header, then one
//!   `word v1 .. vD` line per word.
//!
//! Paths ending in `.gz` are decompressed on the fly.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::{Result, VecDbError};
use crate::kind::EmbeddingKind;
use crate::store::{VectorSource, WordVectors};

/// Load vectors of the given kind from `path`.
///
/// `binary` selects between the word2vec binary and text layouts. Formats
/// without a loader fail with [`VecDbError::UnsupportedFormat`].
pub fn load_vectors<P: AsRef<Path>>(
    kind: EmbeddingKind,
    path: P,
    binary: bool,
) -> Result<WordVectors> {
    kind.ensure_supported()?;
    let path = path.as_ref();
    info!("Loading {} vectors from {:?} ...", kind, path);

    let reader = open(path)?;
    let store = if binary {
        read_word2vec_binary(reader)?
    } else {
        read_word2vec_text(reader)?
    };

    info!(
        "Loaded {} vectors, dimension of embedding is {}",
        store.len(),
        store.dimension()
    );
    Ok(store)
}

fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|source| VecDbError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    if gzipped {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Largest vector dimensionality accepted from a header.
pub const MAX_DIMENSION: usize = 1 << 20;

/// Entries reserved up front; larger stores grow as they are read.
const RESERVE_LIMIT: usize = 1 << 20;

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let count = fields.next()?.parse().ok()?;
    let dimension = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((count, dimension))
}

/// Reject headers whose sizes cannot describe a loadable store.
fn check_header(line: &str, count: usize, dimension: usize) -> Result<()> {
    let fits = dimension <= MAX_DIMENSION
        && count.checked_mul(dimension).is_some()
        && dimension.checked_mul(4).is_some();
    if fits {
        Ok(())
    } else {
        Err(VecDbError::InvalidHeader(line.trim().into()))
    }
}

/// Read the word2vec binary layout.
pub fn read_word2vec_binary<R: BufRead>(mut reader: R) -> Result<WordVectors> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let (count, dimension) =
        parse_header(&header).ok_or_else(|| VecDbError::InvalidHeader(header.trim().into()))?;
    check_header(&header, count, dimension)?;

    let mut store = WordVectors::with_capacity(dimension, count.min(RESERVE_LIMIT));
    let mut word = Vec::new();
    let mut bytes = vec![0u8; dimension * 4];
    let mut vector = vec![0f32; dimension];

    for read in 0..count {
        let truncated = || VecDbError::Truncated {
            read,
            expected: count,
        };

        word.clear();
        reader.read_until(b' ', &mut word)?;
        if word.pop() != Some(b' ') {
            return Err(truncated());
        }

        reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => truncated(),
            _ => VecDbError::Read(e),
        })?;
        for (value, chunk) in vector.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        // Records are usually newline-terminated; the newline sticks to the next word.
        let start = word.iter().position(|&b| b != b'\n').unwrap_or(word.len());
        let text = String::from_utf8(word[start..].to_vec())
            .map_err(|_| VecDbError::InvalidUtf8 { entry: read })?;
        if !store.insert(text, &vector)? {
            debug!("duplicate vector for word at entry {} ignored", read);
        }
    }

    Ok(store)
}

/// Read the word2vec text layout. Files without a header (GloVe style) take
/// their dimensionality from the first vector.
///
/// With a header, exactly `<count>` rows are read; fewer is
/// [`VecDbError::Truncated`] and trailing lines are ignored.
pub fn read_word2vec_text<R: BufRead>(reader: R) -> Result<WordVectors> {
    let mut store: Option<WordVectors> = None;
    let mut expected: Option<usize> = None;
    let mut rows = 0;
    let mut values = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        if index == 0 {
            if let Some((count, dimension)) = parse_header(&line) {
                check_header(&line, count, dimension)?;
                store = Some(WordVectors::with_capacity(dimension, count.min(RESERVE_LIMIT)));
                expected = Some(count);
                continue;
            }
        }

        if expected.is_some_and(|count| rows == count) {
            debug!("line {}: rows past the header count ignored", line_no);
            break;
        }
        rows += 1;

        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            continue;
        };

        values.clear();
        for field in fields {
            let value = field.parse::<f32>().map_err(|_| VecDbError::InvalidNumber {
                line: line_no,
                value: field.to_string(),
            })?;
            values.push(value);
        }

        let store = store.get_or_insert_with(|| WordVectors::new(values.len()));
        if !store.insert(word, &values)? {
            debug!("line {}: duplicate vector for {:?} ignored", line_no, word);
        }
    }

    if let Some(count) = expected {
        if rows < count {
            return Err(VecDbError::Truncated {
                read: rows,
                expected: count,
            });
        }
    }

    Ok(store.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn binary_fixture() -> Vec<u8> {
        let mut bytes = b"2 3\n".to_vec();
        bytes.extend_from_slice(b"john ");
        for v in [0.25f32, -1.0, 2.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(b'\n');
        bytes.extend_from_slice(b"mary ");
        for v in [1.5f32, 0.0, -0.5] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(b'\n');
        bytes
    }

    #[test]
    fn reads_binary_layout() {
        let store = read_word2vec_binary(Cursor::new(binary_fixture())).unwrap();
        assert_eq!(store.dimension(), 3);
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("john"), Some(&[0.25, -1.0, 2.0][..]));
        assert_eq!(store.lookup("mary"), Some(&[1.5, 0.0, -0.5][..]));
    }

    #[test]
    fn binary_without_trailing_newlines() {
        let mut bytes = b"1 2\nx ".to_vec();
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        bytes.extend_from_slice(&2.0f32.to_le_bytes());
        let store = read_word2vec_binary(Cursor::new(bytes)).unwrap();
        assert_eq!(store.lookup("x"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn truncated_binary_is_an_error() {
        let mut bytes = binary_fixture();
        bytes.truncate(bytes.len() - 6);
        let err = read_word2vec_binary(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            VecDbError::Truncated {
                read: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn bad_header_is_an_error() {
        let err = read_word2vec_binary(Cursor::new(b"not a header\n".to_vec())).unwrap_err();
        assert!(matches!(err, VecDbError::InvalidHeader(_)));
    }

    #[test]
    fn oversized_header_is_an_error() {
        for header in [
            "18446744073709551615 4\n",
            "4 18446744073709551615\n",
            "1 4611686018427387904\n",
        ] {
            let err = read_word2vec_binary(Cursor::new(header.as_bytes().to_vec())).unwrap_err();
            assert!(matches!(err, VecDbError::InvalidHeader(_)), "{header}");
        }
        let err = read_word2vec_text(Cursor::new("1 4611686018427387904\nx 1\n")).unwrap_err();
        assert!(matches!(err, VecDbError::InvalidHeader(_)));
    }

    #[test]
    fn large_count_is_not_preallocated() {
        let mut bytes = b"4294967296 1\nx ".to_vec();
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        let err = read_word2vec_binary(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, VecDbError::Truncated { read: 1, .. }));
    }

    #[test]
    fn invalid_utf8_word_is_an_error() {
        let mut bytes = b"2 1\n".to_vec();
        bytes.extend_from_slice(b"a\xff ");
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        bytes.extend_from_slice(b"a\xfe ");
        bytes.extend_from_slice(&2.0f32.to_le_bytes());
        let err = read_word2vec_binary(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, VecDbError::InvalidUtf8 { entry: 0 }));
    }

    #[test]
    fn reads_text_with_header() {
        let text = "2 2\njohn 0.5 1.5\nmary -1 2\n";
        let store = read_word2vec_text(Cursor::new(text)).unwrap();
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.lookup("mary"), Some(&[-1.0, 2.0][..]));
    }

    #[test]
    fn short_text_file_is_truncated() {
        let text = "3 2\njohn 0.5 1.5\nmary -1 2\n";
        let err = read_word2vec_text(Cursor::new(text)).unwrap_err();
        assert!(matches!(
            err,
            VecDbError::Truncated {
                read: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn text_rows_past_header_count_are_ignored() {
        let text = "1 2\njohn 0.5 1.5\nmary -1 2\n";
        let store = read_word2vec_text(Cursor::new(text)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.lookup("mary").is_none());
    }

    #[test]
    fn reads_text_without_header() {
        let text = "john 0.5 1.5 2.5\nmary -1 2 3\n";
        let store = read_word2vec_text(Cursor::new(text)).unwrap();
        assert_eq!(store.dimension(), 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn inconsistent_text_dimension_is_an_error() {
        let text = "john 0.5 1.5\nmary -1\n";
        let err = read_word2vec_text(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, VecDbError::DimensionMismatch { .. }));
    }

    #[test]
    fn invalid_component_reports_line() {
        let text = "1 2\njohn 0.5 abc\n";
        let err = read_word2vec_text(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, VecDbError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn loads_gzipped_file() {
        let path = std::env::temp_dir().join(format!(
            "seqtensor-vecdb-{}-vectors.bin.gz",
            std::process::id()
        ));
        {
            let file = File::create(&path).unwrap();
            let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            encoder.write_all(&binary_fixture()).unwrap();
            encoder.finish().unwrap();
        }

        let store = load_vectors(EmbeddingKind::Word2Vec, &path, true).unwrap();
        assert_eq!(store.len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn senna_has_no_loader() {
        let err = load_vectors(EmbeddingKind::Senna, "unused", true).unwrap_err();
        assert!(matches!(err, VecDbError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_vectors(EmbeddingKind::Word2Vec, "/nonexistent/vectors.bin", true)
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/vectors.bin"));
    }
}
