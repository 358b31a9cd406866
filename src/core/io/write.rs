use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use waiting::WaitingTimes;

/// Writes contents to a file, creating parent directories if they don't exist.
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> io::Result<()> {
    let mut file = create_with_parents(path.as_ref())?;
    file.write_all(contents.as_ref())?;
    Ok(())
}

/// Write every waiting-time array as CSV.
///
/// One row per series index, one column per (delta, direction) pair named
/// `<direction>_<delta>`. Unreachable targets are written as `inf`.
pub fn write_waiting_times<W: Write>(writer: &mut W, times: &WaitingTimes) -> io::Result<()> {
    let columns: Vec<_> = times.iter().collect();

    write!(writer, "index")?;
    for (delta, direction, _) in &columns {
        write!(writer, ",{}_{}", direction, delta)?;
    }
    writeln!(writer)?;

    for i in 0..times.series_len() {
        write!(writer, "{}", i)?;
        for (_, _, waits) in &columns {
            write!(writer, ",{}", waits[i])?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// [`write_waiting_times`] into a file at `path`.
pub fn write_waiting_times_csv<P: AsRef<Path>>(path: P, times: &WaitingTimes) -> io::Result<()> {
    let mut writer = BufWriter::new(create_with_parents(path.as_ref())?);
    write_waiting_times(&mut writer, times)?;
    writer.flush()
}

/// Pretty-printed JSON of `value` at `path`.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    let mut writer = BufWriter::new(create_with_parents(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

fn create_with_parents(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use waiting::{DeltaSet, PriceSeries, Staircases, compute_waiting_times};

    fn gold_times() -> WaitingTimes {
        let series = PriceSeries::new(vec![1800.0, 1805.0, 1803.0, 1810.0, 1795.0, 1790.0]).unwrap();
        let stairs = Staircases::build(&series);
        compute_waiting_times(&series, &stairs, &DeltaSet::new([10.0]).unwrap()).unwrap()
    }

    #[test]
    fn test_write_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("subdir/test.txt");

        write_file(&file_path, "1800\n").unwrap();

        assert_eq!(fs::read_to_string(file_path).unwrap(), "1800\n");
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_waiting_times(&mut out, &gold_times()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "index,increase_10,decrease_10");
        assert_eq!(lines[1], "0,3,5");
        assert_eq!(lines[4], "3,inf,1");
        assert_eq!(lines[5], "4,inf,inf");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_csv_and_json_files() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("out/waiting_times.csv");
        write_waiting_times_csv(&csv_path, &gold_times()).unwrap();
        assert!(fs::read_to_string(&csv_path).unwrap().starts_with("index,"));

        let json_path = dir.path().join("out/summary.json");
        write_json(&json_path, &vec![1, 2, 3]).unwrap();
        let parsed: Vec<i32> = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(parsed, vec![1, 2, 3]);
    }
}
