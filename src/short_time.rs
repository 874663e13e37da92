//! Short-time evaluation: split a signal into consecutive, non-overlapping
//! blocks of `width` samples, evaluate each block and average the results.
//!
//! There is no tapering window and no overlap. A trailing partial block is
//! either dropped ([`Padding::Truncate`]) or zero-extended to `width` and
//! counted like any other block ([`Padding::ZeroPad`]).

use alloc::vec;
use alloc::vec::Vec;

use crate::fft::ScalarFftImpl;
use crate::goertzel::{
    check_args, check_freqs, goertzel_band_unchecked, goertzel_m_unchecked, goertzel_unchecked,
    GoertzelError,
};
use crate::reference::pick_bins;

/// What happens to the `len % width` samples left after the last full block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    #[default]
    Truncate,
    ZeroPad,
}

impl Padding {
    pub fn from_flag(padding: bool) -> Self {
        if padding {
            Padding::ZeroPad
        } else {
            Padding::Truncate
        }
    }
}

/// Per-block evaluator driven by [`short_time`].
pub trait BlockEvaluator {
    /// Number of magnitudes produced per block.
    fn outputs(&self) -> usize;

    /// Evaluate one block of exactly `block.len() == width` samples into `out`.
    fn evaluate_block(&self, block: &[f64], fs: f64, out: &mut [f64])
        -> Result<(), GoertzelError>;
}

/// Single-bin Goertzel on each block.
#[derive(Debug, Clone, Copy)]
pub struct Bin {
    pub freq: f64,
}

impl BlockEvaluator for Bin {
    fn outputs(&self) -> usize {
        1
    }
    fn evaluate_block(
        &self,
        block: &[f64],
        fs: f64,
        out: &mut [f64],
    ) -> Result<(), GoertzelError> {
        out[0] = goertzel_unchecked(block, fs, self.freq, block.len());
        Ok(())
    }
}

/// Band-summed Goertzel on each block.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub freq: f64,
    pub range: f64,
}

impl BlockEvaluator for Band {
    fn outputs(&self) -> usize {
        1
    }
    fn evaluate_block(
        &self,
        block: &[f64],
        fs: f64,
        out: &mut [f64],
    ) -> Result<(), GoertzelError> {
        out[0] = goertzel_band_unchecked(block, fs, self.freq, block.len(), self.range);
        Ok(())
    }
}

/// Batched Goertzel over a frequency set on each block.
#[derive(Debug, Clone, Copy)]
pub struct Bins<'a> {
    pub freqs: &'a [f64],
}

impl BlockEvaluator for Bins<'_> {
    fn outputs(&self) -> usize {
        self.freqs.len()
    }
    fn evaluate_block(
        &self,
        block: &[f64],
        fs: f64,
        out: &mut [f64],
    ) -> Result<(), GoertzelError> {
        goertzel_m_unchecked(block, fs, self.freqs, block.len(), out);
        Ok(())
    }
}

/// Dense-FFT reference on each block. The planner is shared across blocks.
pub struct ReferenceBins<'a> {
    pub freqs: &'a [f64],
    fft: ScalarFftImpl<f64>,
}

impl<'a> ReferenceBins<'a> {
    pub fn new(freqs: &'a [f64]) -> Self {
        Self {
            freqs,
            fft: ScalarFftImpl::default(),
        }
    }
}

impl BlockEvaluator for ReferenceBins<'_> {
    fn outputs(&self) -> usize {
        self.freqs.len()
    }
    fn evaluate_block(
        &self,
        block: &[f64],
        fs: f64,
        out: &mut [f64],
    ) -> Result<(), GoertzelError> {
        let spectrum = self.fft.magnitudes(block)?;
        pick_bins(&spectrum, fs, self.freqs, out);
        Ok(())
    }
}

/// Average `evaluator` over the `width`-sample blocks of `signal`.
///
/// Returns one value per evaluator output. `width == signal.len()` gives a
/// single block, identical to evaluating the whole signal once.
pub fn short_time<E: BlockEvaluator + ?Sized>(
    signal: &[f64],
    sample_rate: f64,
    width: usize,
    padding: Padding,
    evaluator: &E,
) -> Result<Vec<f64>, GoertzelError> {
    check_args(signal, sample_rate, width)?;
    let outputs = evaluator.outputs();
    let remainder = signal.len() % width;
    let full_len = signal.len() - remainder;

    let mut acc = vec![0.0; outputs];
    let mut out = vec![0.0; outputs];
    let mut count = 0usize;
    for block in signal[..full_len].chunks_exact(width) {
        evaluator.evaluate_block(block, sample_rate, &mut out)?;
        for (a, &o) in acc.iter_mut().zip(out.iter()) {
            *a += o;
        }
        count += 1;
    }

    if remainder != 0 && padding == Padding::ZeroPad {
        let mut padded = vec![0.0; width];
        padded[..remainder].copy_from_slice(&signal[full_len..]);
        evaluator.evaluate_block(&padded, sample_rate, &mut out)?;
        for (a, &o) in acc.iter_mut().zip(out.iter()) {
            *a += o;
        }
        count += 1;
    }

    let count = count as f64;
    for a in acc.iter_mut() {
        *a /= count;
    }
    Ok(acc)
}

/// Short-time single-bin Goertzel.
pub fn goertzel_st(
    signal: &[f64],
    sample_rate: f64,
    target_freq: f64,
    width: usize,
    padding: Padding,
) -> Result<f64, GoertzelError> {
    check_freqs(&[target_freq])?;
    let out = short_time(
        signal,
        sample_rate,
        width,
        padding,
        &Bin { freq: target_freq },
    )?;
    Ok(out[0])
}

/// Short-time band-summed Goertzel.
pub fn goertzel_st_band(
    signal: &[f64],
    sample_rate: f64,
    target_freq: f64,
    width: usize,
    range: f64,
    padding: Padding,
) -> Result<f64, GoertzelError> {
    check_freqs(&[target_freq])?;
    if !range.is_finite() || range < 0.0 {
        return Err(GoertzelError::InvalidValue);
    }
    let band = Band {
        freq: target_freq,
        range,
    };
    let out = short_time(signal, sample_rate, width, padding, &band)?;
    Ok(out[0])
}

/// Short-time batched Goertzel.
pub fn goertzel_st_m(
    signal: &[f64],
    sample_rate: f64,
    target_freqs: &[f64],
    width: usize,
    padding: Padding,
) -> Result<Vec<f64>, GoertzelError> {
    check_freqs(target_freqs)?;
    short_time(
        signal,
        sample_rate,
        width,
        padding,
        &Bins {
            freqs: target_freqs,
        },
    )
}

/// Short-time version of [`crate::reference::fft_eval`].
pub fn stfft_eval(
    signal: &[f64],
    sample_rate: f64,
    target_freqs: &[f64],
    width: usize,
    padding: Padding,
) -> Result<Vec<f64>, GoertzelError> {
    check_freqs(target_freqs)?;
    short_time(
        signal,
        sample_rate,
        width,
        padding,
        &ReferenceBins::new(target_freqs),
    )
}
