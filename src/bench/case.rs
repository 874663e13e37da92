//! Benchmark case contract.
//!
//! A case type implements [`Bench`]: it declares its members, prepares its
//! own data in `setup` and cleans up in `tear_down`. Each invocable member
//! whose name carries the timed-method prefix becomes one [`BenchmarkCase`],
//! and the runner drives cases through the object-safe [`Case`] trait.

use std::path::{Path, PathBuf};

use super::harness::benchmark;
use super::{BenchError, TimingMatrix};

/// A timed method: called with each growing prefix of the case's data.
pub type TimedFn<B> = fn(&B, &[f64]) -> Result<(), BenchError>;

/// One named member of a case type.
pub struct Member<B> {
    name: &'static str,
    call: Option<TimedFn<B>>,
}

impl<B> Member<B> {
    /// An invocable member.
    pub fn method(name: &'static str, call: TimedFn<B>) -> Self {
        Self {
            name,
            call: Some(call),
        }
    }

    /// A plain data member. Never enumerated as a case, whatever its name.
    pub fn attribute(name: &'static str) -> Self {
        Self { name, call: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invocable(&self) -> Option<TimedFn<B>> {
        self.call
    }
}

impl<B> Clone for Member<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for Member<B> {}

/// Run parameters a case fills in during setup.
#[derive(Debug, Clone)]
pub struct CaseConfig {
    pub data: Option<Vec<f64>>,
    pub step: usize,
    pub rd: usize,
    pub enable_logging: bool,
    /// Where the case may look for input files.
    pub data_dir: PathBuf,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            data: None,
            step: 100,
            rd: 3,
            enable_logging: true,
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Capability contract of a benchmark case type.
pub trait Bench: Default + 'static {
    /// Type name used in log file names.
    const NAME: &'static str;

    /// Every member of the type, in declaration order.
    fn members() -> Vec<Member<Self>>;

    /// Bind data and run parameters. Runs before every timed method.
    fn setup(&mut self, _config: &mut CaseConfig) -> Result<(), BenchError> {
        Ok(())
    }

    fn tear_down(&mut self) {}
}

/// Object-safe view of one runnable case.
pub trait Case {
    fn type_name(&self) -> &str;
    fn func_name(&self) -> &str;
    fn config(&self) -> &CaseConfig;
    fn setup(&mut self, data_dir: &Path) -> Result<(), BenchError>;
    fn run(&mut self) -> Result<TimingMatrix, BenchError>;
    fn tear_down(&mut self);

    /// `{type_name}_{func_name}`
    fn log_name(&self) -> String {
        format!("{}_{}", self.type_name(), self.func_name())
    }
}

/// One timed method of a [`Bench`] type, bound to a fresh instance.
pub struct BenchmarkCase<B: Bench> {
    bench: B,
    func_name: String,
    method: Option<TimedFn<B>>,
    config: CaseConfig,
}

impl<B: Bench> BenchmarkCase<B> {
    /// Bind `func_name`. If the type has no invocable member of that name,
    /// construction still succeeds and [`Case::run`] reports the mismatch.
    pub fn new(func_name: impl Into<String>) -> Self {
        let func_name = func_name.into();
        let method = B::members()
            .into_iter()
            .find(|m| m.name() == func_name)
            .and_then(|m| m.invocable());
        Self {
            bench: B::default(),
            func_name,
            method,
            config: CaseConfig::default(),
        }
    }

    pub fn bench(&self) -> &B {
        &self.bench
    }
}

impl<B: Bench> Case for BenchmarkCase<B> {
    fn type_name(&self) -> &str {
        B::NAME
    }

    fn func_name(&self) -> &str {
        &self.func_name
    }

    fn config(&self) -> &CaseConfig {
        &self.config
    }

    fn setup(&mut self, data_dir: &Path) -> Result<(), BenchError> {
        self.config = CaseConfig {
            data_dir: data_dir.to_path_buf(),
            ..CaseConfig::default()
        };
        self.bench.setup(&mut self.config)
    }

    fn run(&mut self) -> Result<TimingMatrix, BenchError> {
        let method = self.method.ok_or_else(|| {
            BenchError::TypeMismatch(format!(
                "`{}` has no invocable member `{}`",
                B::NAME,
                self.func_name
            ))
        })?;
        let data = self.config.data.as_deref().ok_or(BenchError::NoData)?;
        let bench = &self.bench;
        benchmark(data, self.config.step, self.config.rd, |prefix| {
            method(bench, prefix)
        })
    }

    fn tear_down(&mut self) {
        self.bench.tear_down();
    }
}

/// Ordered, append-only collection of cases.
#[derive(Default)]
pub struct BenchmarkSuite {
    cases: Vec<Box<dyn Case>>,
}

impl BenchmarkSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_case(&mut self, case: Box<dyn Case>) {
        self.cases.push(case);
    }

    pub fn add_cases<I: IntoIterator<Item = Box<dyn Case>>>(&mut self, cases: I) {
        self.cases.extend(cases);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Case> {
        self.cases.iter().map(|c| c.as_ref())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Case>> {
        self.cases.iter_mut()
    }

    /// `func_name` of every case, in suite order.
    pub fn func_names(&self) -> Vec<&str> {
        self.iter().map(|c| c.func_name()).collect()
    }
}

impl FromIterator<Box<dyn Case>> for BenchmarkSuite {
    fn from_iter<I: IntoIterator<Item = Box<dyn Case>>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sum;

    impl Sum {
        fn time_sum(&self, data: &[f64]) -> Result<(), BenchError> {
            std::hint::black_box(data.iter().sum::<f64>());
            Ok(())
        }
    }

    impl Bench for Sum {
        const NAME: &'static str = "Sum";

        fn members() -> Vec<Member<Self>> {
            vec![Member::method("time_sum", Self::time_sum)]
        }

        fn setup(&mut self, config: &mut CaseConfig) -> Result<(), BenchError> {
            config.data = Some(vec![1.0; 40]);
            config.step = 4;
            config.rd = 2;
            Ok(())
        }
    }

    #[test]
    fn run_produces_matrix() {
        let mut case = BenchmarkCase::<Sum>::new("time_sum");
        case.setup(Path::new("data")).unwrap();
        let m = case.run().unwrap();
        assert_eq!(m.shape(), (5, 3));
        assert_eq!(m.length(2), 20);
        assert_eq!(case.log_name(), "Sum_time_sum");
    }

    #[test]
    fn run_without_setup_has_no_data() {
        let mut case = BenchmarkCase::<Sum>::new("time_sum");
        assert!(matches!(case.run(), Err(BenchError::NoData)));
    }

    #[test]
    fn unknown_method_is_type_mismatch() {
        let mut case = BenchmarkCase::<Sum>::new("time_missing");
        case.setup(Path::new("data")).unwrap();
        assert!(matches!(case.run(), Err(BenchError::TypeMismatch(_))));
    }
}
