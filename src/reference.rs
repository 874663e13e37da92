//! Reference evaluator built on the dense FFT.
//!
//! Transforms the whole block, normalises by its length and picks the bin
//! nearest each queried frequency. It exists to cross-check the Goertzel
//! evaluators, so it favours accuracy over speed.

use alloc::vec::Vec;

use crate::fft::ScalarFftImpl;
use crate::goertzel::{bin_index, check_freqs, GoertzelError};

/// Wrap a (possibly negative or out-of-band) bin index into `0..n`.
///
/// DFT bins are periodic in `n`, and the Goertzel recursion sees the same
/// periodicity through `cos(2πk/n)`.
#[inline]
pub(crate) fn wrap_bin(k: f64, n: usize) -> usize {
    let n_f = n as f64;
    let wrapped = k - n_f * libm::floor(k / n_f);
    (wrapped as usize).min(n - 1)
}

/// Pick the bins for `freqs` out of a normalised magnitude spectrum.
pub(crate) fn pick_bins(spectrum: &[f64], fs: f64, freqs: &[f64], out: &mut [f64]) {
    let n = spectrum.len();
    for (o, &ft) in out.iter_mut().zip(freqs) {
        *o = spectrum[wrap_bin(bin_index(ft, fs, n), n)];
    }
}

/// Magnitudes `|X[k]| / N` of the bins nearest `target_freqs`, where `X` is
/// the DFT of the whole `signal` and `N = signal.len()`.
pub fn fft_eval(
    signal: &[f64],
    sample_rate: f64,
    target_freqs: &[f64],
) -> Result<Vec<f64>, GoertzelError> {
    if signal.is_empty() {
        return Err(GoertzelError::EmptyInput);
    }
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(GoertzelError::InvalidValue);
    }
    check_freqs(target_freqs)?;
    let fft = ScalarFftImpl::<f64>::default();
    let spectrum = fft.magnitudes(signal)?;
    let mut out = alloc::vec![0.0; target_freqs.len()];
    pick_bins(&spectrum, sample_rate, target_freqs, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_bin_is_periodic() {
        assert_eq!(wrap_bin(3.0, 8), 3);
        assert_eq!(wrap_bin(8.0, 8), 0);
        assert_eq!(wrap_bin(11.0, 8), 3);
        assert_eq!(wrap_bin(-1.0, 8), 7);
    }

    #[test]
    fn dc_bin_of_constant_signal() {
        let signal = alloc::vec![2.0; 16];
        let mags = fft_eval(&signal, 16.0, &[0.0, 1.0]).unwrap();
        assert!((mags[0] - 2.0).abs() < 1e-12);
        assert!(mags[1].abs() < 1e-12);
    }

    #[test]
    fn rejects_empty_and_bad_rate() {
        assert_eq!(fft_eval(&[], 1.0, &[1.0]), Err(GoertzelError::EmptyInput));
        assert_eq!(
            fft_eval(&[1.0], -1.0, &[1.0]),
            Err(GoertzelError::InvalidValue)
        );
    }
}
