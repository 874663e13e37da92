//! Frequency-term evaluators timed against each other.
//!
//! The frequency resolution is `fs / width = 1 Hz`.

use log::debug;

use crate::algorithm::Method;
use crate::bench::{Bench, BenchError, CaseConfig, Member, Registry};
use crate::short_time::Padding;
use crate::signal;

/// Input file looked up in the data directory.
pub const DATA_FILE: &str = "rawecg.csv";

/// Length in seconds of the signal used when [`DATA_FILE`] is absent.
pub const SYNTHETIC_SECONDS: f64 = 120.0;

#[derive(Debug, Clone)]
pub struct BenchDsp {
    pub fs: f64,
    pub freqs: Vec<f64>,
    pub width: usize,
}

impl Default for BenchDsp {
    fn default() -> Self {
        Self {
            fs: 1000.0,
            freqs: vec![50.0, 60.0, 70.0],
            width: 1000,
        }
    }
}

impl BenchDsp {
    fn eval(&self, method: Method, data: &[f64]) -> Result<(), BenchError> {
        method.evaluate(data, self.fs, &self.freqs, self.width, Padding::Truncate)?;
        Ok(())
    }

    pub fn time_goertzel(&self, data: &[f64]) -> Result<(), BenchError> {
        self.eval(Method::Goertzel, data)
    }

    pub fn time_goertzel_m(&self, data: &[f64]) -> Result<(), BenchError> {
        self.eval(Method::GoertzelMulti, data)
    }

    pub fn time_goertzel_st(&self, data: &[f64]) -> Result<(), BenchError> {
        self.eval(Method::ShortTimeGoertzel, data)
    }

    pub fn time_goertzel_st_m(&self, data: &[f64]) -> Result<(), BenchError> {
        self.eval(Method::ShortTimeGoertzelMulti, data)
    }

    pub fn time_fft_eval(&self, data: &[f64]) -> Result<(), BenchError> {
        self.eval(Method::Fft, data)
    }

    pub fn time_stfft_eval(&self, data: &[f64]) -> Result<(), BenchError> {
        self.eval(Method::ShortTimeFft, data)
    }
}

impl Bench for BenchDsp {
    const NAME: &'static str = "BenchDsp";

    fn members() -> Vec<Member<Self>> {
        vec![
            Member::attribute("fs"),
            Member::attribute("freqs"),
            Member::attribute("width"),
            Member::method("time_goertzel", Self::time_goertzel),
            Member::method("time_goertzel_m", Self::time_goertzel_m),
            Member::method("time_goertzel_st", Self::time_goertzel_st),
            Member::method("time_goertzel_st_m", Self::time_goertzel_st_m),
            Member::method("time_fft_eval", Self::time_fft_eval),
            Member::method("time_stfft_eval", Self::time_stfft_eval),
        ]
    }

    fn setup(&mut self, config: &mut CaseConfig) -> Result<(), BenchError> {
        config.step = 100;
        config.rd = 3;
        config.enable_logging = true;
        let path = config.data_dir.join(DATA_FILE);
        let data = if path.is_file() {
            debug!("loading {}", path.display());
            signal::read_csv(&path, 0)?
        } else {
            debug!("{} not found, using a synthetic signal", path.display());
            signal::sine(SYNTHETIC_SECONDS, self.fs, 60.0)
        };
        config.data = Some(data);
        Ok(())
    }
}

pub fn register(registry: &mut Registry) {
    registry.unit(module_path!()).register::<BenchDsp>();
}
