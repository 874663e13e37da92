//! # gofft - Goertzel frequency-term evaluation and benchmarking
//!
//! Estimates the magnitude of selected DFT terms of a real signal without
//! computing the whole transform, and measures how those evaluators scale
//! against a dense FFT as the input grows.
//!
//! ## Evaluators
//!
//! - [`goertzel::goertzel`]: one bin, one pass
//! - [`goertzel::goertzel_band`]: sum over a band of bins
//! - [`goertzel::goertzel_m`]: many bins, still one pass over the data
//! - [`short_time`]: any of the above averaged over `width`-sample blocks
//! - [`reference::fft_eval`]: the same terms read off a full FFT
//!
//! All evaluators normalise by the number of samples processed, so a block of
//! `width` samples yields `|X[k]| / width` whichever path computed it.
//!
//! ```
//! use gofft::goertzel::goertzel;
//!
//! let fs = 1000.0;
//! let signal: Vec<f64> = (0..1000)
//!     .map(|i| (2.0 * core::f64::consts::PI * 60.0 * i as f64 / fs).sin())
//!     .collect();
//! let mag = goertzel(&signal, fs, 60.0, 1000).unwrap();
//! assert!((mag - 0.5).abs() < 1e-9);
//! ```
//!
//! ## Benchmarking (`std`)
//!
//! [`bench::benchmark`] times a callable on growing prefixes of a dataset.
//! Case types implementing [`bench::Bench`] are registered in a
//! [`bench::Registry`], discovered by naming convention and driven by a
//! [`bench::BenchmarkRunner`] that writes one CSV log per case.
//!
//! ## Cargo Features
//!
//! - `std` (default): benchmark engine, signal files and log timestamps.
//!   Without it the evaluators build as `no_std + alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod num;

/// Complex FFT: radix-2 Stockham for powers of two, Bluestein otherwise.
pub mod fft;

/// Goertzel single-bin, band and batched evaluators.
pub mod goertzel;

/// FFT-based reference evaluator.
pub mod reference;

/// Block segmentation and averaging.
pub mod short_time;

/// Name-based dispatch over every evaluator.
pub mod algorithm;

#[cfg(feature = "std")]
pub mod bench;

#[cfg(feature = "std")]
pub mod signal;

#[cfg(feature = "std")]
pub mod benchmarks;

pub use algorithm::Method;
pub use fft::FftPlanner;
pub use goertzel::{goertzel, goertzel_band, goertzel_m, GoertzelError};
pub use num::{Complex, Complex32, Complex64, Float};
pub use reference::fft_eval;
pub use short_time::{goertzel_st, goertzel_st_band, goertzel_st_m, stfft_eval, Padding};
