mod common;

use common::{assert_close, tone};
use gofft::goertzel::{goertzel, goertzel_band, goertzel_m, GoertzelError};
use gofft::reference::fft_eval;
use gofft::short_time::{
    goertzel_st, goertzel_st_band, goertzel_st_m, short_time, stfft_eval, Bin, Padding,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FS: f64 = 1000.0;

fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

#[test]
fn two_full_blocks_are_averaged() {
    let signal = noise(2000, 1);
    let st = goertzel_st(&signal, FS, 60.0, 1000, Padding::Truncate).unwrap();
    let first = goertzel(&signal[..1000], FS, 60.0, 1000).unwrap();
    let second = goertzel(&signal[1000..], FS, 60.0, 1000).unwrap();
    assert_close(st, (first + second) / 2.0);
}

#[test]
fn remainder_is_dropped_or_zero_padded() {
    let signal = noise(2500, 2);
    let first = goertzel(&signal[..1000], FS, 60.0, 1000).unwrap();
    let second = goertzel(&signal[1000..2000], FS, 60.0, 1000).unwrap();
    let mut tail = signal[2000..].to_vec();
    tail.resize(1000, 0.0);
    let third = goertzel(&tail, FS, 60.0, 1000).unwrap();

    let truncated = goertzel_st(&signal, FS, 60.0, 1000, Padding::Truncate).unwrap();
    assert_close(truncated, (first + second) / 2.0);
    assert_close(
        truncated,
        goertzel_st(&signal[..2000], FS, 60.0, 1000, Padding::Truncate).unwrap(),
    );

    let padded = goertzel_st(&signal, FS, 60.0, 1000, Padding::ZeroPad).unwrap();
    assert_close(padded, (first + second + third) / 3.0);
}

#[test]
fn padding_is_a_no_op_without_remainder() {
    let signal = noise(3000, 3);
    let a = goertzel_st_m(&signal, FS, &[50.0, 60.0], 1000, Padding::Truncate).unwrap();
    let b = goertzel_st_m(&signal, FS, &[50.0, 60.0], 1000, Padding::ZeroPad).unwrap();
    assert_eq!(a, b);
}

#[test]
fn whole_signal_width_is_a_single_block() {
    let signal = noise(1500, 4);
    let freqs = [40.0, 60.0, 80.0];
    assert_eq!(
        goertzel_st_m(&signal, FS, &freqs, 1500, Padding::Truncate).unwrap(),
        goertzel_m(&signal, FS, &freqs, 1500).unwrap()
    );
    let st = stfft_eval(&signal, FS, &freqs, 1500, Padding::Truncate).unwrap();
    let whole = fft_eval(&signal, FS, &freqs).unwrap();
    for (a, b) in st.iter().zip(whole.iter()) {
        assert_close(*a, *b);
    }
}

#[test]
fn short_time_reference_agrees_with_goertzel() {
    let signal = tone(2500, FS, 60.0);
    let freqs = [50.0, 60.0, 70.0];
    for padding in [Padding::Truncate, Padding::ZeroPad] {
        let go = goertzel_st_m(&signal, FS, &freqs, 1000, padding).unwrap();
        let reference = stfft_eval(&signal, FS, &freqs, 1000, padding).unwrap();
        for (a, b) in go.iter().zip(reference.iter()) {
            assert_close(*a, *b);
        }
    }
}

#[test]
fn band_variant_averages_band_sums() {
    let signal = noise(2000, 5);
    let st = goertzel_st_band(&signal, FS, 60.0, 1000, 2.0, Padding::Truncate).unwrap();
    let first = goertzel_band(&signal[..1000], FS, 60.0, 1000, 2.0).unwrap();
    let second = goertzel_band(&signal[1000..], FS, 60.0, 1000, 2.0).unwrap();
    assert_close(st, (first + second) / 2.0);
}

#[test]
fn generic_driver_accepts_any_evaluator() {
    let signal = noise(2000, 6);
    let out = short_time(&signal, FS, 1000, Padding::Truncate, &Bin { freq: 60.0 }).unwrap();
    assert_eq!(out.len(), 1);
    assert_close(
        out[0],
        goertzel_st(&signal, FS, 60.0, 1000, Padding::Truncate).unwrap(),
    );
}

#[test]
fn width_larger_than_signal_is_rejected() {
    let signal = noise(1200, 7);
    assert_eq!(
        goertzel_st(&signal, FS, 60.0, 1201, Padding::ZeroPad),
        Err(GoertzelError::InvalidWidth {
            width: 1201,
            len: 1200
        })
    );
    assert_eq!(
        stfft_eval(&signal[..999], FS, &[60.0], 500, Padding::Truncate),
        Err(GoertzelError::InsufficientData { len: 999 })
    );
}
