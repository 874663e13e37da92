//! Built-in benchmark case definitions.
//!
//! Each `bench_*` module registers its case types under its own module path,
//! so [`crate::bench::Registry::discover`] finds them by convention.

pub mod bench_dsp;

use crate::bench::Registry;

/// Register every built-in unit.
pub fn register(registry: &mut Registry) {
    bench_dsp::register(registry);
}
