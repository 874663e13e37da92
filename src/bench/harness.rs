use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;

use super::sink::{CsvLogWriter, LogSink};
use super::{BenchError, TimingMatrix};

/// Validate `(len, step, rd)` before any timing starts.
pub fn check_bench_args(len: usize, step: usize, rd: usize) -> Result<(), BenchError> {
    if len == 0 {
        return Err(BenchError::NoData);
    }
    if step < 1 {
        return Err(BenchError::InvalidStep);
    }
    if rd < 1 {
        return Err(BenchError::InvalidRepetitions);
    }
    if len / step < 1 {
        return Err(BenchError::InsufficientData { len, step });
    }
    Ok(())
}

/// Time `f` on growing prefixes of `data`.
///
/// For `i` in `1..=step` the prefix length is `floor(len * i / step)` and
/// `f` runs `rd` times on it; each call is timed on its own with
/// [`Instant`], the platform's monotonic clock. Row 0 of the result is the
/// zero-length baseline and is never executed.
///
/// The first error returned by `f` aborts the run and is propagated.
pub fn benchmark<T, F, E>(
    data: &[T],
    step: usize,
    rd: usize,
    mut f: F,
) -> Result<TimingMatrix, BenchError>
where
    F: FnMut(&[T]) -> Result<(), E>,
    E: Into<BenchError>,
{
    check_bench_args(data.len(), step, rd)?;
    let mut matrix = TimingMatrix::new(step, rd);
    for i in 1..=step {
        let rlen = (data.len() as u128 * i as u128 / step as u128) as usize;
        let prefix = &data[..rlen];
        matrix.set_length(i, rlen);
        for r in 0..rd {
            let start = Instant::now();
            let outcome = black_box(f(black_box(prefix)));
            let elapsed = start.elapsed();
            outcome.map_err(Into::into)?;
            matrix.set_elapsed(i, r, elapsed.as_secs_f64());
        }
        debug!(
            "step {i}/{step}: len {rlen}, {:?}",
            matrix.timings(i)
        );
    }
    Ok(matrix)
}

/// Run [`benchmark`] and write the matrix to
/// `{dir}/{name}_{yymmddHHMMSS}.csv`, creating `dir` if needed.
///
/// The log is written only after every measurement has finished.
pub fn benchmark_to_log<T, F, E>(
    data: &[T],
    step: usize,
    rd: usize,
    name: &str,
    dir: impl AsRef<Path>,
    f: F,
) -> Result<PathBuf, BenchError>
where
    F: FnMut(&[T]) -> Result<(), E>,
    E: Into<BenchError>,
{
    let matrix = benchmark(data, step, rd, f)?;
    let stamp = chrono::Local::now().format("%y%m%d%H%M%S");
    let log_name = format!("{name}_{stamp}");
    let mut writer = CsvLogWriter::new(dir.as_ref());
    writer.write(&log_name, &matrix)?;
    Ok(writer.path_for(&log_name))
}
