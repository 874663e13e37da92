//! Name-based dispatch over the evaluators.
//!
//! Every algorithm is driven through the same call shape
//! `(data, fs, freqs, width)` so benchmark cases can time them uniformly.

use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::goertzel::{goertzel, goertzel_m, GoertzelError};
use crate::reference::fft_eval;
use crate::short_time::{goertzel_st, goertzel_st_m, stfft_eval, Padding};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `go`: one single-bin Goertzel call per frequency.
    Goertzel,
    /// `gom`: batched Goertzel, one pass for all frequencies.
    GoertzelMulti,
    /// `stgo`: short-time single-bin Goertzel, one call per frequency.
    ShortTimeGoertzel,
    /// `stgom`: short-time batched Goertzel.
    ShortTimeGoertzelMulti,
    /// `fft`: dense transform over the whole signal; `width` is ignored.
    Fft,
    /// `stft`: short-time dense transform.
    ShortTimeFft,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Goertzel,
        Method::GoertzelMulti,
        Method::ShortTimeGoertzel,
        Method::ShortTimeGoertzelMulti,
        Method::Fft,
        Method::ShortTimeFft,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Goertzel => "go",
            Method::GoertzelMulti => "gom",
            Method::ShortTimeGoertzel => "stgo",
            Method::ShortTimeGoertzelMulti => "stgom",
            Method::Fft => "fft",
            Method::ShortTimeFft => "stft",
        }
    }

    /// Run the algorithm, returning one magnitude per entry of `freqs`.
    pub fn evaluate(
        self,
        data: &[f64],
        fs: f64,
        freqs: &[f64],
        width: usize,
        padding: Padding,
    ) -> Result<Vec<f64>, GoertzelError> {
        match self {
            Method::Goertzel => freqs
                .iter()
                .map(|&ft| goertzel(data, fs, ft, width))
                .collect(),
            Method::GoertzelMulti => goertzel_m(data, fs, freqs, width),
            Method::ShortTimeGoertzel => freqs
                .iter()
                .map(|&ft| goertzel_st(data, fs, ft, width, padding))
                .collect(),
            Method::ShortTimeGoertzelMulti => goertzel_st_m(data, fs, freqs, width, padding),
            Method::Fft => fft_eval(data, fs, freqs),
            Method::ShortTimeFft => stfft_eval(data, fs, freqs, width, padding),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = GoertzelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or(GoertzelError::InvalidMethod)
    }
}
