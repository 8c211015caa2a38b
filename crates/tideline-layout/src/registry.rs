use crate::LayoutOptions;
use crate::algo::{greedy, succession, tree};
use crate::error::{Error, Result};
use crate::input::{Link, PeriodSpan};
use tideline_core::LaneAssignment;

pub const DEFAULT_ALGORITHM: &str = "succession";

pub type PeriodLayoutFn =
    fn(periods: &[PeriodSpan], links: &[Link], options: &LayoutOptions) -> Vec<LaneAssignment>;

#[derive(Debug, Clone, Copy)]
pub struct PeriodAlgorithm {
    pub id: &'static str,
    pub layout: PeriodLayoutFn,
}

/// Period layout strategies addressable by name.
#[derive(Debug, Clone)]
pub struct AlgorithmRegistry {
    algorithms: Vec<PeriodAlgorithm>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self {
            algorithms: Vec::new(),
        }
    }

    /// Registers an algorithm; a later entry with the same id replaces the earlier one.
    pub fn add(&mut self, algorithm: PeriodAlgorithm) {
        if let Some(slot) = self.algorithms.iter_mut().find(|a| a.id == algorithm.id) {
            *slot = algorithm;
        } else {
            self.algorithms.push(algorithm);
        }
    }

    pub fn add_fn(&mut self, id: &'static str, layout: PeriodLayoutFn) {
        self.add(PeriodAlgorithm { id, layout });
    }

    pub fn get(&self, id: &str) -> Option<&PeriodAlgorithm> {
        self.algorithms.iter().find(|a| a.id == id)
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.id).collect()
    }

    /// Looks up `id`, falling back to [`DEFAULT_ALGORITHM`] when no name is given.
    pub fn resolve(&self, id: Option<&str>) -> Result<&PeriodAlgorithm> {
        let name = id.unwrap_or(DEFAULT_ALGORITHM);
        self.get(name).ok_or_else(|| Error::UnknownAlgorithm {
            name: name.to_string(),
            available: self.ids().join(", "),
        })
    }

    pub fn with_builtin_algorithms() -> Self {
        let mut reg = Self::new();
        reg.add_fn("succession", succession::layout_periods);
        reg.add_fn("greedy", greedy::layout_periods);
        reg.add_fn("tree", tree::layout_periods);
        reg
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_builtin_algorithms()
    }
}
