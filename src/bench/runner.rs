use std::env;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::case::{BenchmarkSuite, Case};
use super::registry::DiscoveryConfig;
use super::sink::{CsvLogWriter, LogSink};
use super::{BenchError, TimingMatrix};

/// Where a runner reads inputs and writes logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub log_dir: PathBuf,
    pub data_dir: PathBuf,
    pub delimiter: char,
    pub discovery: DiscoveryConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("bench_log"),
            data_dir: PathBuf::from("data"),
            delimiter: ',',
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Defaults overridden by `GOFFT_LOG_DIR` and `GOFFT_DATA_DIR`.
    /// Unset or empty variables keep the default.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(dir) = env_dir("GOFFT_LOG_DIR") {
            cfg.log_dir = dir;
        }
        if let Some(dir) = env_dir("GOFFT_DATA_DIR") {
            cfg.data_dir = dir;
        }
        cfg
    }
}

fn env_dir(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Outcome of one successfully run case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub matrix: TimingMatrix,
    /// Whether the matrix was handed to the log sink.
    pub logged: bool,
}

/// Sequences cases through setup, run, logging and tear-down.
pub struct BenchmarkRunner<S: LogSink = CsvLogWriter> {
    data_dir: PathBuf,
    sink: S,
}

impl BenchmarkRunner<CsvLogWriter> {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            sink: CsvLogWriter::new(&config.log_dir).with_delimiter(config.delimiter),
        }
    }
}

impl<S: LogSink> BenchmarkRunner<S> {
    pub fn with_sink(data_dir: impl Into<PathBuf>, sink: S) -> Self {
        Self {
            data_dir: data_dir.into(),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Run one case. `tear_down` is called exactly once whatever the
    /// outcome; the first error from setup, run or logging is returned
    /// after it.
    pub fn run_benchmark(&mut self, case: &mut dyn Case) -> Result<CaseReport, BenchError> {
        let name = case.log_name();
        let outcome = self.execute(case, &name);
        case.tear_down();
        match &outcome {
            Ok(report) => info!(
                "{name}: {} steps x {} repetitions",
                report.matrix.steps(),
                report.matrix.repetitions()
            ),
            Err(e) => warn!("{name} failed: {e}"),
        }
        outcome
    }

    fn execute(&mut self, case: &mut dyn Case, name: &str) -> Result<CaseReport, BenchError> {
        case.setup(&self.data_dir)?;
        let matrix = case.run()?;
        let logged = case.config().enable_logging;
        if logged {
            self.sink.write(name, &matrix)?;
        }
        Ok(CaseReport {
            name: name.to_string(),
            matrix,
            logged,
        })
    }

    /// Run every case in suite order, stopping at the first failure.
    pub fn run_benchmark_suite(
        &mut self,
        suite: &mut BenchmarkSuite,
    ) -> Result<Vec<CaseReport>, BenchError> {
        suite
            .iter_mut()
            .map(|case| self.run_benchmark(case.as_mut()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemorySink {
        written: Vec<String>,
    }

    impl LogSink for MemorySink {
        fn write(&mut self, name: &str, _matrix: &TimingMatrix) -> Result<(), BenchError> {
            self.written.push(name.to_string());
            Ok(())
        }
    }

    #[test]
    fn default_dirs() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.log_dir, PathBuf::from("bench_log"));
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.discovery.method_prefix, "time_");
    }

    #[test]
    fn empty_suite_writes_nothing() {
        let mut runner = BenchmarkRunner::with_sink("data", MemorySink::default());
        let reports = runner
            .run_benchmark_suite(&mut BenchmarkSuite::new())
            .unwrap();
        assert!(reports.is_empty());
        assert!(runner.sink().written.is_empty());
    }
}
