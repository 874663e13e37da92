//! Explicit registry of benchmark case types.
//!
//! Case definitions are registered at initialization time under a *unit*
//! path, normally `module_path!()` of the defining module. Discovery walks
//! registered units instead of the filesystem: the `::`-separated segments of
//! a unit path stand in for directories and files.

use log::trace;

use super::case::{Bench, BenchmarkCase, BenchmarkSuite, Case};
use super::BenchError;

/// Naming conventions applied by [`Registry::discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Segment that marks a benchmarks folder.
    pub benchmarks_dir: String,
    /// Prefix of a discoverable unit's final segment.
    pub file_prefix: String,
    /// Prefix of a timed method.
    pub method_prefix: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            benchmarks_dir: "benchmarks".to_string(),
            file_prefix: "bench_".to_string(),
            method_prefix: "time_".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Whether `path` sits inside a benchmarks folder and names a bench unit.
    pub fn matches_unit(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split("::").collect();
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        parents.iter().any(|s| *s == self.benchmarks_dir) && last.starts_with(&self.file_prefix)
    }
}

struct CaseType {
    name: &'static str,
    members: fn() -> Vec<(&'static str, bool)>,
    make: fn(&str) -> Box<dyn Case>,
}

fn member_table<B: Bench>() -> Vec<(&'static str, bool)> {
    B::members()
        .iter()
        .map(|m| (m.name(), m.invocable().is_some()))
        .collect()
}

fn make_case<B: Bench>(func_name: &str) -> Box<dyn Case> {
    Box::new(BenchmarkCase::<B>::new(func_name))
}

/// One registered module and the case types it defines.
pub struct Unit {
    path: String,
    types: Vec<CaseType>,
}

impl Unit {
    /// Add a case type to this unit.
    pub fn register<B: Bench>(&mut self) -> &mut Self {
        self.types.push(CaseType {
            name: B::NAME,
            members: member_table::<B>,
            make: make_case::<B>,
        });
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.iter().map(|t| t.name)
    }
}

/// Registration-ordered collection of units.
#[derive(Default)]
pub struct Registry {
    config: DiscoveryConfig,
    units: Vec<Unit>,
}

impl Registry {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            units: Vec::new(),
        }
    }

    /// Registry preloaded with the crate's own benchmark cases.
    pub fn with_builtin(config: DiscoveryConfig) -> Self {
        let mut registry = Self::new(config);
        crate::benchmarks::register(&mut registry);
        registry
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// The unit registered at `path`, created on first use.
    pub fn unit(&mut self, path: &str) -> &mut Unit {
        let idx = match self.units.iter().position(|u| u.path == path) {
            Some(idx) => idx,
            None => {
                self.units.push(Unit {
                    path: path.to_string(),
                    types: Vec::new(),
                });
                self.units.len() - 1
            }
        };
        &mut self.units[idx]
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Build one case per timed method of every case type in every
    /// conventional unit under `root`.
    ///
    /// `root` is a unit path prefix compared segment by segment; an empty
    /// root covers every unit. Units are visited in registration order and
    /// members in declaration order.
    pub fn discover(&self, root: &str) -> BenchmarkSuite {
        let mut suite = BenchmarkSuite::new();
        for unit in &self.units {
            if !under_root(&unit.path, root) {
                continue;
            }
            if !self.config.matches_unit(&unit.path) {
                trace!("skipping unit {}: naming convention", unit.path);
                continue;
            }
            for ty in &unit.types {
                suite.add_cases(self.cases_of(ty));
            }
        }
        suite
    }

    /// Suite of every timed method of the case type called `type_name`,
    /// wherever it was registered.
    pub fn load_cases(&self, type_name: &str) -> Result<BenchmarkSuite, BenchError> {
        let ty = self
            .units
            .iter()
            .flat_map(|u| u.types.iter())
            .find(|t| t.name == type_name)
            .ok_or_else(|| {
                BenchError::TypeMismatch(format!("no registered case type `{type_name}`"))
            })?;
        Ok(self.cases_of(ty).collect())
    }

    fn cases_of<'a>(&'a self, ty: &'a CaseType) -> impl Iterator<Item = Box<dyn Case>> + 'a {
        (ty.members)()
            .into_iter()
            .filter(move |&(name, invocable)| {
                let timed = name.starts_with(&self.config.method_prefix);
                if timed && !invocable {
                    trace!("skipping {}::{name}: not invocable", ty.name);
                }
                timed && invocable
            })
            .map(move |(name, _)| (ty.make)(name))
    }
}

fn under_root(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches("::");
    if root.is_empty() {
        return true;
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_convention() {
        let cfg = DiscoveryConfig::default();
        assert!(cfg.matches_unit("pkg::benchmarks::bench_foo"));
        assert!(cfg.matches_unit("a::benchmarks::b::bench_x"));
        assert!(!cfg.matches_unit("pkg::benchmarks::foo"));
        assert!(!cfg.matches_unit("pkg::bench::bench_foo"));
        assert!(!cfg.matches_unit("benchmarks"));
        assert!(!cfg.matches_unit("bench_foo"));
    }

    #[test]
    fn root_is_segment_aware() {
        assert!(under_root("pkg::benchmarks::bench_a", "pkg"));
        assert!(under_root("pkg::benchmarks::bench_a", "pkg::"));
        assert!(under_root("pkg::benchmarks::bench_a", ""));
        assert!(!under_root("pkg2::benchmarks::bench_a", "pkg"));
    }

    #[test]
    fn unknown_type_is_mismatch() {
        let registry = Registry::default();
        assert!(matches!(
            registry.load_cases("Nope"),
            Err(BenchError::TypeMismatch(_))
        ));
    }
}
