#![allow(dead_code)]

use std::f64::consts::PI;

pub const REL_TOL: f64 = 1e-9;
pub const ABS_TOL: f64 = 1e-12;

pub fn assert_close(actual: f64, expected: f64) {
    let tol = (REL_TOL * expected.abs()).max(ABS_TOL);
    assert!(
        (actual - expected).abs() <= tol,
        "{actual} vs {expected} (tol {tol})"
    );
}

/// `sin(2π·f·i/fs)` for `i` in `0..n`.
pub fn tone(n: usize, fs: f64, f: f64) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * PI * f * i as f64 / fs).sin())
        .collect()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
