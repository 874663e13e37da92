//! Goertzel algorithm: DFT terms without the full transform.
//!
//! Each evaluator runs the second-order recursion
//! `s[n] = x[n] + 2cos(ω)·s[n-1] - s[n-2]` with `ω = 2πk/width` and
//! `k = round(ft · width / fs)`, then reads the magnitude of the `k`-th term
//! off the last two states. Results are normalised by the number of samples
//! processed, so a block of exactly `width` samples yields `|X[k]| / width`,
//! the same scale as [`crate::reference::fft_eval`].
//!
//! no_std + alloc compatible

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::fft::FftError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GoertzelError {
    #[error("input signal is empty")]
    EmptyInput,
    /// Sampling rate, target frequency or band width is not a usable number.
    #[error("invalid numeric parameter")]
    InvalidValue,
    /// The sampling rate exceeds the number of available samples.
    #[error("data length {len} is too short for the sampling rate")]
    InsufficientData { len: usize },
    /// The block width is zero or exceeds the number of available samples.
    #[error("block width {width} is invalid for {len} samples")]
    InvalidWidth { width: usize, len: usize },
    #[error("unrecognised evaluation method")]
    InvalidMethod,
    #[error(transparent)]
    Fft(#[from] FftError),
}

/// Nearest DFT bin for `ft` in a block of `width` samples at rate `fs`.
#[inline]
pub fn bin_index(ft: f64, fs: f64, width: usize) -> f64 {
    libm::floor(0.5 + width as f64 * ft / fs)
}

/// Argument checks shared by every public evaluator.
pub(crate) fn check_args(data: &[f64], fs: f64, width: usize) -> Result<(), GoertzelError> {
    if data.is_empty() {
        return Err(GoertzelError::EmptyInput);
    }
    if !fs.is_finite() || fs <= 0.0 {
        return Err(GoertzelError::InvalidValue);
    }
    if fs > data.len() as f64 {
        return Err(GoertzelError::InsufficientData { len: data.len() });
    }
    if width == 0 || width > data.len() {
        return Err(GoertzelError::InvalidWidth {
            width,
            len: data.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_freqs(freqs: &[f64]) -> Result<(), GoertzelError> {
    if freqs.iter().all(|f| f.is_finite()) {
        Ok(())
    } else {
        Err(GoertzelError::InvalidValue)
    }
}

/// One resonator tuned to bin `k` of a `width`-sample block.
///
/// The recursion is carried in Reinsch's modified form so that bins near DC
/// and Nyquist keep full precision on long inputs. Besides `s[n]` it tracks
/// `w[n] = s[n] - s[n-1]` when `cos(ω) >= 0` and `w[n] = s[n] + s[n-1]`
/// otherwise, with `sign` = +1 or -1 picking the form:
///
/// ```text
/// w[n] = sign·w[n-1] + x[n] + kappa·s[n-1]
/// s[n] = w[n] + sign·s[n-1]
/// ```
///
/// `kappa` is `-4sin²(ω/2)` or `4cos²(ω/2)`, both small exactly where
/// `2cos(ω)` would lose its low bits.
#[derive(Debug, Clone, Copy)]
struct Resonator {
    kappa: f64,
    sign: f64,
    cos: f64,
    sin: f64,
}

impl Resonator {
    fn new(k: f64, width: usize) -> Self {
        let half = PI * k / width as f64;
        let (sh, ch) = libm::sincos(half);
        let (sin, cos) = libm::sincos(2.0 * half);
        let (sign, kappa) = if cos >= 0.0 {
            (1.0, -4.0 * sh * sh)
        } else {
            (-1.0, 4.0 * ch * ch)
        };
        Self {
            kappa,
            sign,
            cos,
            sin,
        }
    }

    #[inline(always)]
    fn step(&self, s: &mut f64, w: &mut f64, x: f64) {
        *w = self.sign * *w + x + self.kappa * *s;
        *s = *w + self.sign * *s;
    }

    /// Run the recursion over `data`, returning the final `(s, w)`.
    fn run(&self, data: &[f64]) -> (f64, f64) {
        let mut s = 0.0;
        let mut w = 0.0;
        let mut chunks = data.chunks_exact(3);
        for c in &mut chunks {
            self.step(&mut s, &mut w, c[0]);
            self.step(&mut s, &mut w, c[1]);
            self.step(&mut s, &mut w, c[2]);
        }
        for &x in chunks.remainder() {
            self.step(&mut s, &mut w, x);
        }
        (s, w)
    }

    /// `|s[N-1] - e^{-iω} s[N-2]| / norm`, rewritten in terms of `w` so the
    /// real part never subtracts two large nearly equal states.
    #[inline]
    fn magnitude(&self, s: f64, w: f64, norm: f64) -> f64 {
        let re = (0.5 * self.kappa.abs() * s + self.sign * self.cos * w) / norm;
        let im = (self.sin * (s - w)) / norm;
        libm::sqrt(re * re + im * im)
    }
}

pub(crate) fn goertzel_unchecked(data: &[f64], fs: f64, ft: f64, width: usize) -> f64 {
    let res = Resonator::new(bin_index(ft, fs, width), width);
    let (s, w) = res.run(data);
    res.magnitude(s, w, data.len() as f64)
}

pub(crate) fn goertzel_band_unchecked(
    data: &[f64],
    fs: f64,
    ft: f64,
    width: usize,
    range: f64,
) -> f64 {
    let k_start = bin_index(ft, fs, width);
    let span = libm::floor(0.5 + range * width as f64 / fs);
    let norm = data.len() as f64;
    let mut total = 0.0;
    let mut k = k_start;
    while k < k_start + span {
        let res = Resonator::new(k, width);
        let (s, w) = res.run(data);
        total += res.magnitude(s, w, norm);
        k += 1.0;
    }
    total
}

pub(crate) fn goertzel_m_unchecked(
    data: &[f64],
    fs: f64,
    freqs: &[f64],
    width: usize,
    out: &mut [f64],
) {
    let bank: Vec<Resonator> = freqs
        .iter()
        .map(|&ft| Resonator::new(bin_index(ft, fs, width), width))
        .collect();
    // (s, w) per frequency
    let mut state = vec![(0.0f64, 0.0f64); bank.len()];
    for &x in data {
        for (res, (s, w)) in bank.iter().zip(state.iter_mut()) {
            res.step(s, w, x);
        }
    }
    let norm = data.len() as f64;
    for ((res, &(s, w)), o) in bank.iter().zip(state.iter()).zip(out.iter_mut()) {
        *o = res.magnitude(s, w, norm);
    }
}

/// Magnitude of the DFT term nearest `target_freq`.
///
/// - `input`: real-valued signal
/// - `sample_rate`: sampling rate in Hz, must not exceed `input.len()`
/// - `target_freq`: frequency to detect in Hz
/// - `width`: block width fixing the bin grid (`fs / width` Hz apart)
///
/// With `width == input.len()` this is exactly `|X[k]| / N`.
pub fn goertzel(
    input: &[f64],
    sample_rate: f64,
    target_freq: f64,
    width: usize,
) -> Result<f64, GoertzelError> {
    check_args(input, sample_rate, width)?;
    check_freqs(&[target_freq])?;
    Ok(goertzel_unchecked(input, sample_rate, target_freq, width))
}

/// Sum of the bin magnitudes over `[k, k + round(range · width / fs))`.
///
/// Useful when the target does not sit on the `fs / width` grid. A band
/// narrower than half a bin is empty and sums to zero.
pub fn goertzel_band(
    input: &[f64],
    sample_rate: f64,
    target_freq: f64,
    width: usize,
    range: f64,
) -> Result<f64, GoertzelError> {
    check_args(input, sample_rate, width)?;
    check_freqs(&[target_freq])?;
    if !range.is_finite() || range < 0.0 {
        return Err(GoertzelError::InvalidValue);
    }
    Ok(goertzel_band_unchecked(
        input,
        sample_rate,
        target_freq,
        width,
        range,
    ))
}

/// Evaluate every frequency in `target_freqs` in a single pass over `input`.
///
/// The output keeps the query order and matches calling [`goertzel`] once
/// per frequency.
pub fn goertzel_m(
    input: &[f64],
    sample_rate: f64,
    target_freqs: &[f64],
    width: usize,
) -> Result<Vec<f64>, GoertzelError> {
    check_args(input, sample_rate, width)?;
    check_freqs(target_freqs)?;
    let mut out = vec![0.0; target_freqs.len()];
    goertzel_m_unchecked(input, sample_rate, target_freqs, width, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(n: usize, fs: f64, f: f64) -> Vec<f64> {
        (0..n)
            .map(|i| libm::sin(2.0 * PI * f * i as f64 / fs))
            .collect()
    }

    #[test]
    fn test_goertzel_detects_tone() {
        let signal = tone(1000, 1000.0, 100.0);
        let mag = goertzel(&signal, 1000.0, 100.0, 1000).unwrap();
        assert!((mag - 0.5).abs() < 1e-9, "mag = {mag}");
        let off = goertzel(&signal, 1000.0, 200.0, 1000).unwrap();
        assert!(off < 1e-9, "off = {off}");
    }

    #[test]
    fn test_bin_index_rounds_half_up() {
        assert_eq!(bin_index(60.0, 1000.0, 2000), 120.0);
        assert_eq!(bin_index(60.25, 1000.0, 2000), 121.0);
        assert_eq!(bin_index(60.2, 1000.0, 2000), 120.0);
    }

    #[test]
    fn test_unrolled_remainder_paths_agree() {
        // Lengths 999, 1000 and 1001 hit remainders 0, 1 and 2.
        for n in [999usize, 1000, 1001] {
            let signal = tone(n, 500.0, 40.0);
            let res = Resonator::new(bin_index(40.0, 500.0, n), n);
            let (s, w) = res.run(&signal);
            let (mut p, mut q) = (0.0, 0.0);
            for &x in &signal {
                res.step(&mut p, &mut q, x);
            }
            assert_eq!((s, w), (p, q));
        }
    }

    #[test]
    fn test_both_forms_match_textbook_recursion() {
        // Bin 5 of 64 runs the difference form, bin 27 the sum form.
        let signal = tone(64, 64.0, 5.0);
        for k in [5.0, 27.0] {
            let omega = 2.0 * PI * k / 64.0;
            let coeff = 2.0 * libm::cos(omega);
            let (mut q1, mut q2) = (0.0, 0.0);
            for &x in &signal {
                let q0 = coeff * q1 - q2 + x;
                q2 = q1;
                q1 = q0;
            }
            let re = q1 - q2 * libm::cos(omega);
            let im = q2 * libm::sin(omega);
            let textbook = libm::sqrt(re * re + im * im) / 64.0;
            let res = Resonator::new(k, 64);
            assert_eq!(res.sign, if k < 16.0 { 1.0 } else { -1.0 });
            let (s, w) = res.run(&signal);
            let mag = res.magnitude(s, w, 64.0);
            assert!((mag - textbook).abs() < 1e-12, "k={k}: {mag} vs {textbook}");
        }
    }

    #[test]
    fn test_dc_and_nyquist_bins() {
        let signal = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert!(goertzel(&signal, 8.0, 0.0, 8).unwrap() < 1e-15);
        assert!((goertzel(&signal, 8.0, 4.0, 8).unwrap() - 1.0).abs() < 1e-15);
        let flat = [0.5; 9];
        assert!((goertzel(&flat, 9.0, 0.0, 9).unwrap() - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_goertzel_empty() {
        assert_eq!(
            goertzel(&[], 1.0, 1.0, 1).unwrap_err(),
            GoertzelError::EmptyInput
        );
    }

    #[test]
    fn test_goertzel_bad_rate() {
        let signal = [1.0, 2.0];
        assert_eq!(
            goertzel(&signal, 0.0, 1.0, 2).unwrap_err(),
            GoertzelError::InvalidValue
        );
        assert_eq!(
            goertzel(&signal, f64::NAN, 1.0, 2).unwrap_err(),
            GoertzelError::InvalidValue
        );
    }

    #[test]
    fn test_negative_range_rejected() {
        let signal = tone(100, 100.0, 10.0);
        assert_eq!(
            goertzel_band(&signal, 100.0, 10.0, 100, -1.0).unwrap_err(),
            GoertzelError::InvalidValue
        );
    }

    #[test]
    fn test_empty_band_sums_to_zero() {
        let signal = tone(100, 100.0, 10.0);
        assert_eq!(goertzel_band(&signal, 100.0, 10.0, 100, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_goertzel_m_empty_query() {
        let signal = tone(100, 100.0, 10.0);
        assert!(goertzel_m(&signal, 100.0, &[], 100).unwrap().is_empty());
    }
}
