use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("invalid price on line {line}: {content:?}")]
    Parse { line: usize, content: String },

    #[error("no prices found in {0}")]
    Empty(String),
}

/// Read a price file: one price per line, first whitespace-separated token.
///
/// Blank lines are skipped. Anything else that does not parse to a finite
/// number fails the whole load.
pub fn read_price_series<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, LoadError> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|error| LoadError::Io {
        source_name: source_name.clone(),
        error,
    })?;

    let prices = parse_price_series(BufReader::new(file), &source_name)?;
    info!(path = %source_name, prices = prices.len(), "price file loaded");
    Ok(prices)
}

/// Same as [`read_price_series`] over any buffered reader.
pub fn parse_price_series<R: BufRead>(reader: R, source_name: &str) -> Result<Vec<f64>, LoadError> {
    let mut prices = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|error| LoadError::Io {
            source_name: source_name.to_string(),
            error,
        })?;

        let Some(token) = line.split_whitespace().next() else {
            continue;
        };

        match token.parse::<f64>() {
            Ok(price) if price.is_finite() => prices.push(price),
            _ => {
                return Err(LoadError::Parse {
                    line: line_num + 1,
                    content: line.trim().to_string(),
                });
            }
        }
    }

    if prices.is_empty() {
        return Err(LoadError::Empty(source_name.to_string()));
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_first_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1800.25 2023-01-02 09:30").unwrap();
        writeln!(file, "1801.5").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  1799.75\t12").unwrap();

        let prices = read_price_series(file.path()).unwrap();
        assert_eq!(prices, vec![1800.25, 1801.5, 1799.75]);
    }

    #[test]
    fn test_malformed_line() {
        let input = "1800\nabc 1\n1801\n";
        let err = parse_price_series(input.as_bytes(), "memory").unwrap_err();
        match err {
            LoadError::Parse { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "abc 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_token() {
        let err = parse_price_series("1800\nNaN\n".as_bytes(), "memory").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
        let err = parse_price_series("inf\n".as_bytes(), "memory").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_empty_input() {
        let err = parse_price_series("\n \n".as_bytes(), "memory").unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_price_series(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }
}
