//! Benchmark engine: times a callable over growing prefixes of a dataset.
//!
//! - [`harness`]: the timing loop producing a [`TimingMatrix`]
//! - [`case`]: benchmark case contract and suites
//! - [`registry`]: explicit registration and convention-based discovery
//! - [`runner`]: setup → run → log → tear-down sequencing
//! - [`sink`]: log sinks, log reading and summarisation
//!
//! Everything here runs sequentially on the calling thread.

pub mod case;
pub mod harness;
pub mod matrix;
pub mod registry;
pub mod runner;
pub mod sink;

use std::path::PathBuf;

use crate::goertzel::GoertzelError;

pub use case::{Bench, BenchmarkCase, BenchmarkSuite, Case, CaseConfig, Member, TimedFn};
pub use harness::{benchmark, benchmark_to_log};
pub use matrix::TimingMatrix;
pub use registry::{DiscoveryConfig, Registry};
pub use runner::{BenchmarkRunner, CaseReport, RunnerConfig};
pub use sink::{summarize_logs, CsvLogWriter, LogReader, LogSeries, LogSink, Reduction};

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("no data available")]
    NoData,
    #[error("step should not be less than 1")]
    InvalidStep,
    #[error("repetition count should not be less than 1")]
    InvalidRepetitions,
    #[error("data of length {len} cannot be partitioned proportionally into {step} steps")]
    InsufficientData { len: usize, step: usize },
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed line {line} in {}", path.display())]
    Parse { path: PathBuf, line: usize },
    #[error("invalid reduction `{0}`; expected one of max, min, mean, median")]
    InvalidReduction(String),
    #[error(transparent)]
    Eval(#[from] GoertzelError),
}

impl BenchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }
}
