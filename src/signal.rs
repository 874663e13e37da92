//! Test-signal generation and headerless CSV signal files.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::bench::BenchError;

/// `n` evenly spaced points over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// `sin(2π·ft·t)` sampled at `round(duration·fs)` points spread evenly over
/// `[0, duration]`.
pub fn sine(duration: f64, fs: f64, ft: f64) -> Vec<f64> {
    let n = (duration * fs).round().max(0.0) as usize;
    linspace(0.0, duration, n)
        .into_iter()
        .map(|t| (2.0 * PI * ft * t).sin())
        .collect()
}

/// Read one column of a headerless comma-separated file.
pub fn read_csv(path: impl AsRef<Path>, column: usize) -> Result<Vec<f64>, BenchError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
    let mut samples = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| BenchError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let value = line
            .split(',')
            .nth(column)
            .and_then(|field| field.trim().parse::<f64>().ok())
            .ok_or_else(|| BenchError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;
        samples.push(value);
    }
    Ok(samples)
}

/// Write one sample per line.
pub fn write_csv(path: impl AsRef<Path>, samples: &[f64]) -> Result<(), BenchError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| BenchError::io(path, e))?;
    let mut w = BufWriter::new(file);
    for s in samples {
        writeln!(w, "{s}").map_err(|e| BenchError::io(path, e))?;
    }
    w.flush().map_err(|e| BenchError::io(path, e))
}
