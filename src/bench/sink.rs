//! Persisting and reading back timing logs.
//!
//! A log is one delimiter-separated line per matrix row: the input length
//! followed by the elapsed seconds of each repetition.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;

use super::{BenchError, TimingMatrix};

/// Destination for finished timing matrices.
pub trait LogSink {
    /// Persist `matrix` under the log name `name` (no extension).
    fn write(&mut self, name: &str, matrix: &TimingMatrix) -> Result<(), BenchError>;
}

/// Writes `{dir}/{name}.csv`, creating `dir` on first use.
#[derive(Debug, Clone)]
pub struct CsvLogWriter {
    dir: PathBuf,
    delimiter: char,
}

impl CsvLogWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delimiter: ',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}

impl LogSink for CsvLogWriter {
    fn write(&mut self, name: &str, matrix: &TimingMatrix) -> Result<(), BenchError> {
        fs::create_dir_all(&self.dir).map_err(|e| BenchError::io(&self.dir, e))?;
        let path = self.path_for(name);
        let file = File::create(&path).map_err(|e| BenchError::io(&path, e))?;
        let mut w = BufWriter::new(file);
        matrix
            .write_delimited(&mut w, self.delimiter)
            .and_then(|_| w.flush())
            .map_err(|e| BenchError::io(&path, e))?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

/// Reads logs written by [`CsvLogWriter`].
#[derive(Debug, Clone, Copy)]
pub struct LogReader {
    delimiter: char,
}

impl Default for LogReader {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl LogReader {
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Parse a log file back into a [`TimingMatrix`]. Blank lines are
    /// skipped; a non-numeric field or a ragged row is a parse error.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<TimingMatrix, BenchError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| BenchError::io(path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parse_err = || BenchError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
            };
            let row = line
                .split(self.delimiter)
                .map(|field| field.trim().parse::<f64>().map_err(|_| parse_err()))
                .collect::<Result<Vec<f64>, _>>()?;
            if rows.first().is_some_and(|first| first.len() != row.len()) {
                return Err(parse_err());
            }
            rows.push(row);
        }
        TimingMatrix::from_rows(rows).ok_or_else(|| BenchError::Parse {
            path: path.to_path_buf(),
            line: 0,
        })
    }
}

/// How the repetitions of one row are collapsed into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    Max,
    Min,
    Mean,
    #[default]
    Median,
}

impl Reduction {
    pub fn apply(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Reduction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reduction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Reduction::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Reduction::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
        }
    }
}

impl FromStr for Reduction {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(Reduction::Max),
            "min" => Ok(Reduction::Min),
            "mean" => Ok(Reduction::Mean),
            "median" => Ok(Reduction::Median),
            other => Err(BenchError::InvalidReduction(other.to_string())),
        }
    }
}

/// One reduced time-vs-size series, read from one log file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSeries {
    /// Timed method name with the method prefix removed.
    pub algorithm: String,
    pub path: PathBuf,
    pub lengths: Vec<usize>,
    pub values: Vec<f64>,
}

/// Collect every `{type_name}_*.csv` log in `dir` and reduce each row.
///
/// Files are parsed with `reader`, which must use the delimiter the logs were
/// written with. Series come back sorted by file name. `method_prefix`
/// (e.g. `time_`) is stripped from the algorithm name when present.
pub fn summarize_logs(
    reader: &LogReader,
    dir: impl AsRef<Path>,
    type_name: &str,
    method_prefix: &str,
    reduction: Reduction,
) -> Result<Vec<LogSeries>, BenchError> {
    let dir = dir.as_ref();
    let head = format!("{type_name}_");
    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| BenchError::io(dir, e))? {
        let entry = entry.map_err(|e| BenchError::io(dir, e))?;
        let path = entry.path();
        let Some(stem) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".csv"))
            .and_then(|n| n.strip_prefix(&head))
        else {
            continue;
        };
        let algorithm = stem.strip_prefix(method_prefix).unwrap_or(stem).to_string();
        files.push((algorithm, path));
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));

    files
        .into_iter()
        .map(|(algorithm, path)| {
            let matrix = reader.read(&path)?;
            let values = (0..matrix.shape().0)
                .map(|i| reduction.apply(matrix.timings(i)))
                .collect();
            Ok(LogSeries {
                algorithm,
                lengths: matrix.lengths(),
                values,
                path,
            })
        })
        .collect()
}
