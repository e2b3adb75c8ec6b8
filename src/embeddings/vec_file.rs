// vec_file.rs — Loader for the plain-text word vector format (`.vec`).
//
// Layout (as published with fastText models):
//   <count> <dim>            optional header
//   <token> <f1> ... <fD>    one row per token
//
// The whole table is loaded into memory; `max_words` caps how many rows are read
// (vector files are sorted by frequency, so a prefix keeps the common words).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};

use crate::embeddings::source::{InMemoryVectors, TokenVectorSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VecFileOptions {
    /// Stop after this many vector rows.
    pub max_words: Option<usize>,
}

/// Load a `.vec` file from disk.
pub fn load_vec_file(path: &Path, opts: &VecFileOptions) -> anyhow::Result<InMemoryVectors> {
    let file = File::open(path).with_context(|| format!("open vector file {}", path.display()))?;
    log::info!("Loading word vectors from {}", path.display());
    let started = Instant::now();

    let vectors = read_vectors(BufReader::new(file), opts)
        .with_context(|| format!("parse vector file {}", path.display()))?;

    log::info!(
        "Word vectors loaded: words={}, dims={}, elapsed={:.1}s",
        vectors.len(),
        vectors.dimension(),
        started.elapsed().as_secs_f64()
    );
    if vectors.is_empty() {
        log::warn!("Vector file {} has a header but no rows", path.display());
    }
    Ok(vectors)
}

/// Parse `.vec` rows from any buffered reader.
pub fn read_vectors<R: BufRead>(reader: R, opts: &VecFileOptions) -> anyhow::Result<InMemoryVectors> {
    let mut table: Option<InMemoryVectors> = None;
    let mut header_count: Option<usize> = None;
    let mut rows: usize = 0;
    let mut duplicates: usize = 0;

    if opts.max_words == Some(0) {
        bail!("max_words must be at least 1");
    }

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("read line {line_no}"))?;
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        // Fields are separated by ASCII spaces only; tokens may contain other whitespace.
        let mut parts = line.split(' ').filter(|s| !s.is_empty());
        let Some(token) = parts.next() else {
            continue;
        };
        let values: Vec<&str> = parts.collect();

        if table.is_none() && values.len() == 1 {
            if let (Ok(count), Ok(dim)) = (token.parse::<usize>(), values[0].parse::<usize>()) {
                if dim == 0 {
                    bail!("line {line_no}: header declares zero dimensions");
                }
                header_count = Some(count);
                table = Some(InMemoryVectors::with_capacity(dim, capacity_hint(count, opts)));
                continue;
            }
        }

        if opts.max_words.is_some_and(|max| rows >= max) {
            break;
        }

        let vector = values
            .iter()
            .map(|v| v.parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("line {line_no}: invalid float in vector for {token:?}"))?;

        // No header: the first row fixes the dimension.
        if table.is_none() && vector.is_empty() {
            bail!("line {line_no}: row for {token:?} has no values");
        }
        let vectors = table.get_or_insert_with(|| InMemoryVectors::new(vector.len()));

        let dim = vectors.dimension();
        if vector.len() != dim {
            bail!(
                "line {line_no}: row for {:?} has {} values, expected {}",
                token,
                vector.len(),
                dim
            );
        }

        if !vectors.insert(token, vector)? {
            duplicates += 1;
        }
        rows += 1;
    }

    let Some(table) = table else {
        bail!("no word vectors found");
    };

    if duplicates > 0 {
        log::debug!("Skipped {} duplicate tokens (first row kept)", duplicates);
    }
    if let Some(expected) = header_count {
        if opts.max_words.is_none() && expected != rows {
            log::warn!("Vector header declares {} rows but {} were read", expected, rows);
        }
    }

    Ok(table)
}

fn capacity_hint(count: usize, opts: &VecFileOptions) -> usize {
    opts.max_words.map_or(count, |max| max.min(count))
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;

    #[test]
    fn test_read_with_header() {
        let data = "3 2\nሰላም 0.5 -1\nሰው 1 2\nእኔ 0 0.25\n";
        let v = read_vectors(Cursor::new(data), &VecFileOptions::default()).unwrap();
        assert_eq!(v.dimension(), 2);
        assert_eq!(v.len(), 3);
        assert_eq!(v.lookup("ሰላም").as_deref(), Some(&[0.5, -1.0][..]));
        assert_eq!(v.lookup("እኔ").as_deref(), Some(&[0.0, 0.25][..]));
    }

    #[test]
    fn test_read_without_header_infers_dimension() {
        let data = "a 1 2 3\n\nb 4 5 6\n";
        let v = read_vectors(Cursor::new(data), &VecFileOptions::default()).unwrap();
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_max_words_limits_rows() {
        let data = "3 1\na 1\nb 2\nc 3\n";
        let opts = VecFileOptions { max_words: Some(2) };
        let v = read_vectors(Cursor::new(data), &opts).unwrap();
        assert_eq!(v.len(), 2);
        assert!(v.contains("b"));
        assert!(!v.contains("c"));
    }

    #[test]
    fn test_token_with_non_breaking_space_loads() {
        let data = "2 2\nሰላም 0.5 1\nአዲስ\u{a0}አበባ 0.1 0.2\n";
        let v = read_vectors(Cursor::new(data), &VecFileOptions::default()).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.lookup("አዲስ\u{a0}አበባ").as_deref(), Some(&[0.1, 0.2][..]));
        assert!(v.lookup("አዲስ").is_none());
    }

    #[test]
    fn test_zero_max_words_rejected_with_or_without_header() {
        let opts = VecFileOptions { max_words: Some(0) };
        assert!(read_vectors(Cursor::new("1 1\na 1\n"), &opts).is_err());
        assert!(read_vectors(Cursor::new("a 1\n"), &opts).is_err());
    }

    #[test]
    fn test_duplicate_tokens_keep_first_row() {
        let data = "a 1 1\na 2 2\n";
        let v = read_vectors(Cursor::new(data), &VecFileOptions::default()).unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v.lookup("a").as_deref(), Some(&[1.0, 1.0][..]));
    }

    #[test]
    fn test_wrong_row_width_names_line() {
        let data = "2 3\na 1 2 3\nb 1 2\n";
        let err = read_vectors(Cursor::new(data), &VecFileOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"), "{err:#}");
    }

    #[test]
    fn test_invalid_float_is_error() {
        let data = "a 1 x\n";
        let err = read_vectors(Cursor::new(data), &VecFileOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid float"), "{err:#}");
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(read_vectors(Cursor::new(""), &VecFileOptions::default()).is_err());
        // Header only: dimension known, no rows.
        let v = read_vectors(Cursor::new("0 300\n"), &VecFileOptions::default()).unwrap();
        assert_eq!(v.dimension(), 300);
        assert!(v.is_empty());
    }

    #[test]
    fn test_load_vec_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2 2").unwrap();
        writeln!(file, "ተማሪ 0.1 0.2").unwrap();
        writeln!(file, "ቤት 0.3 0.4").unwrap();
        file.flush().unwrap();

        let v = load_vec_file(file.path(), &VecFileOptions::default()).unwrap();
        assert_eq!(v.len(), 2);
        assert!(v.contains("ተማሪ"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = load_vec_file(Path::new("/nonexistent/cc.am.300.vec"), &VecFileOptions::default()).unwrap_err();
        assert!(format!("{err:#}").contains("open vector file"));
    }
}
