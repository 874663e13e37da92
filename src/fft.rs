//! Dense complex FFT used as the reference transform.
//!
//! Power-of-two lengths run a radix-2 Stockham auto-sort FFT; every other
//! length goes through Bluestein's chirp-z reformulation on top of it. A
//! [`FftPlanner`] caches twiddle and chirp tables so repeated blocks of the
//! same width reuse them.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use hashbrown::HashMap;

pub use crate::num::{Complex, Complex32, Complex64, Float};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FftError {
    #[error("transform input is empty")]
    EmptyInput,
    #[error("transform length {0} is not representable in the float type")]
    SizeOverflow(usize),
}

type BluesteinPair<T> = (Arc<[Complex<T>]>, Arc<[Complex<T>]>);

pub struct FftPlanner<T: Float> {
    /// Twiddle tables keyed by transform size `n`. The table for `n` has
    /// `n/2` entries `exp(-2πi k / n)`.
    cache: HashMap<usize, Arc<[Complex<T>]>>,
    /// Bluestein chirp and transformed kernel keyed by the original length.
    bluestein_cache: HashMap<usize, BluesteinPair<T>>,
    scratch: Vec<Complex<T>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            bluestein_cache: HashMap::new(),
            scratch: Vec::new(),
        }
    }

    /// Retrieve the twiddle table for stage size `n`.
    ///
    /// Each entry is computed from its own angle rather than by a running
    /// rotation, so the table error does not grow with `n`.
    pub fn get_twiddles(&mut self, n: usize) -> Result<Arc<[Complex<T>]>, FftError> {
        if let Some(table) = self.cache.get(&n) {
            return Ok(Arc::clone(table));
        }
        let len = T::from_usize(n).ok_or(FftError::SizeOverflow(n))?;
        let two_pi = T::from_f64(2.0) * T::pi();
        let table: Vec<Complex<T>> = (0..n / 2)
            .map(|k| {
                let k = T::from_usize(k).unwrap_or_else(T::zero);
                Complex::expi(-(two_pi * k / len))
            })
            .collect();
        let table: Arc<[Complex<T>]> = Arc::from(table);
        self.cache.insert(n, Arc::clone(&table));
        Ok(table)
    }

    /// Chirp `exp(-iπ j²/n)` and the FFT of the zero-padded conjugate kernel.
    pub fn get_bluestein(&mut self, n: usize) -> Result<BluesteinPair<T>, FftError> {
        if let Some(pair) = self.bluestein_cache.get(&n) {
            return Ok((Arc::clone(&pair.0), Arc::clone(&pair.1)));
        }
        let len = T::from_usize(n).ok_or(FftError::SizeOverflow(n))?;
        let m = (2 * n - 1).next_power_of_two();
        let mut chirp: Vec<Complex<T>> = Vec::with_capacity(n);
        let mut b: Vec<Complex<T>> = Vec::with_capacity(m);
        for j in 0..n {
            // j² mod 2n keeps the angle small; the chirp has period 2n in j².
            let jj = ((j as u128 * j as u128) % (2 * n as u128)) as usize;
            let jj = T::from_usize(jj).ok_or(FftError::SizeOverflow(jj))?;
            let angle = T::pi() * jj / len;
            chirp.push(Complex::expi(-angle));
            b.push(Complex::expi(angle));
        }
        b.resize(m, Complex::zero());
        for j in 1..n {
            b[m - j] = b[j];
        }
        let fft = ScalarFftImpl::<T>::default();
        fft.stockham(&mut b)?;
        let pair: BluesteinPair<T> = (Arc::from(chirp), Arc::from(b));
        self.bluestein_cache
            .insert(n, (Arc::clone(&pair.0), Arc::clone(&pair.1)));
        Ok(pair)
    }
}

pub trait FftImpl<T: Float> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;
}

pub struct ScalarFftImpl<T: Float> {
    planner: RefCell<FftPlanner<T>>,
}

impl<T: Float> Default for ScalarFftImpl<T> {
    fn default() -> Self {
        Self {
            planner: RefCell::new(FftPlanner::new()),
        }
    }
}

impl<T: Float> ScalarFftImpl<T> {
    /// Radix-2 Stockham auto-sort FFT. `input.len()` must be a power of two.
    fn stockham(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        debug_assert!(n.is_power_of_two());
        if n < 2 {
            return Ok(());
        }

        let (twiddles, mut scratch) = {
            let mut planner = self.planner.borrow_mut();
            let twiddles = planner.get_twiddles(n)?;
            let scratch = core::mem::take(&mut planner.scratch);
            (twiddles, scratch)
        };
        if scratch.len() < n {
            scratch.resize(n, Complex::zero());
        }

        // n1 = number of groups, n2 = size of each group in this pass.
        let mut n1 = 1usize;
        let mut n2 = n;
        let mut in_scratch = false;
        while n1 < n {
            n2 >>= 1;
            let (src, dst): (&[Complex<T>], &mut [Complex<T>]) = if in_scratch {
                (&scratch[..n], &mut *input)
            } else {
                (&*input, &mut scratch[..n])
            };
            for k in 0..n1 {
                // exp(-2πi k / (2 n1)) == table[k * n2]
                let w = twiddles[k * n2];
                let base0 = 2 * k * n2;
                let base1 = base0 + n2;
                let lo = k * n2;
                let hi = (k + n1) * n2;
                for j in 0..n2 {
                    let u = src[base0 + j];
                    let v = src[base1 + j].mul(w);
                    dst[lo + j] = u.add(v);
                    dst[hi + j] = u.sub(v);
                }
            }
            in_scratch = !in_scratch;
            n1 <<= 1;
        }

        if in_scratch {
            input.copy_from_slice(&scratch[..n]);
        }
        self.planner.borrow_mut().scratch = scratch;
        Ok(())
    }

    fn bluestein(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        let (chirp, kernel) = self.planner.borrow_mut().get_bluestein(n)?;
        let m = kernel.len();
        let mut a: Vec<Complex<T>> = input
            .iter()
            .zip(chirp.iter())
            .map(|(&x, &c)| x.mul(c))
            .collect();
        a.resize(m, Complex::zero());
        self.stockham(&mut a)?;
        for (ai, &bi) in a.iter_mut().zip(kernel.iter()) {
            *ai = ai.mul(bi).conj();
        }
        self.stockham(&mut a)?;
        let scale = T::one() / T::from_usize(m).ok_or(FftError::SizeOverflow(m))?;
        for ((out, &ai), &c) in input.iter_mut().zip(a.iter()).zip(chirp.iter()) {
            *out = ai.conj().scale(scale).mul(c);
        }
        Ok(())
    }

    /// Transform a real block and return `|X[k]| / N` for every bin `k`.
    pub fn magnitudes(&self, block: &[T]) -> Result<Vec<T>, FftError> {
        let n = block.len();
        let norm = T::from_usize(n).ok_or(FftError::SizeOverflow(n))?;
        let mut buf: Vec<Complex<T>> = block
            .iter()
            .map(|&x| Complex::new(x, T::zero()))
            .collect();
        self.fft(&mut buf)?;
        Ok(buf.iter().map(|c| c.norm() / norm).collect())
    }
}

impl<T: Float> FftImpl<T> for ScalarFftImpl<T> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if n == 1 {
            return Ok(());
        }
        if n.is_power_of_two() {
            self.stockham(input)
        } else {
            self.bluestein(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn dft(input: &[Complex64]) -> Vec<Complex64> {
        let len = input.len();
        (0..len)
            .map(|k| {
                let mut sum = Complex64::zero();
                for (n, &x) in input.iter().enumerate() {
                    let angle = -2.0 * core::f64::consts::PI * ((k * n) % len) as f64 / len as f64;
                    sum = sum.add(x.mul(Complex64::expi(angle)));
                }
                sum
            })
            .collect()
    }

    #[test]
    fn test_fft_empty() {
        let fft = ScalarFftImpl::<f64>::default();
        let mut data: Vec<Complex64> = vec![];
        assert_eq!(fft.fft(&mut data), Err(FftError::EmptyInput));
    }

    #[test]
    fn test_fft_single_element() {
        let fft = ScalarFftImpl::<f64>::default();
        let mut data = vec![Complex64::new(42.0, -1.0)];
        fft.fft(&mut data).unwrap();
        assert_eq!(data[0], Complex64::new(42.0, -1.0));
    }

    #[test]
    fn test_fft_impulse_is_flat() {
        let fft = ScalarFftImpl::<f32>::default();
        let mut data = [
            Complex32::new(1.0, 0.0),
            Complex32::zero(),
            Complex32::zero(),
            Complex32::zero(),
        ];
        fft.fft(&mut data).unwrap();
        for c in &data {
            assert!((c.re - 1.0).abs() < 1e-6, "re = {}", c.re);
            assert!(c.im.abs() < 1e-6, "im = {}", c.im);
        }
    }

    #[test]
    fn test_power_of_two_matches_dft() {
        let input: Vec<Complex64> = (0..64)
            .map(|i| Complex64::new((i as f64 * 0.7).sin(), (i as f64 * 0.3).cos()))
            .collect();
        let expected = dft(&input);
        let fft = ScalarFftImpl::<f64>::default();
        let mut out = input.clone();
        fft.fft(&mut out).unwrap();
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a.re - b.re).abs() < 1e-10 && (a.im - b.im).abs() < 1e-10);
        }
    }

    #[test]
    fn test_bluestein_matches_dft() {
        for n in [3usize, 6, 15, 100] {
            let input: Vec<Complex64> = (0..n)
                .map(|i| Complex64::new(i as f64, -(i as f64) * 0.5))
                .collect();
            let expected = dft(&input);
            let fft = ScalarFftImpl::<f64>::default();
            let mut out = input.clone();
        fft.fft(&mut out).unwrap();
            for (a, b) in out.iter().zip(expected.iter()) {
                assert!(
                    (a.re - b.re).abs() < 1e-8 && (a.im - b.im).abs() < 1e-8,
                    "n = {n}: {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_planner_reuses_tables() {
        let mut planner = FftPlanner::<f64>::new();
        let a = planner.get_twiddles(16).unwrap();
        let b = planner.get_twiddles(16).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_magnitudes_are_normalised() {
        let fft = ScalarFftImpl::<f64>::default();
        let block = vec![1.0; 10];
        let mags = fft.magnitudes(&block).unwrap();
        assert!((mags[0] - 1.0).abs() < 1e-12);
        for m in &mags[1..] {
            assert!(m.abs() < 1e-12);
        }
    }
}
