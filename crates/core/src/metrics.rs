//! Metric bundles and the result set
//!
//! Results are keyed by scenario name rather than stored in one struct per
//! scenario shape, so new scenarios need no changes here or in the reporter.

use crate::error::{Error, Result};
use crate::ids::IdStrategy;
use rustc_hash::FxHashMap;
use std::time::Duration;

/// Measurements for one (scenario, strategy) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricBundle {
    /// Wall-clock duration of the timed insertion phase
    pub insert: Duration,
    /// Mean point-lookup duration, when measured
    pub lookup: Option<Duration>,
    /// Primary-key index size in bytes, when measured
    pub index_bytes: Option<u64>,
}

/// Bundles recorded for one scenario, in strategy order
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// Scenario name
    pub scenario: String,
    /// One bundle per strategy
    pub bundles: Vec<(IdStrategy, MetricBundle)>,
}

impl ScenarioResult {
    /// Bundle recorded for `strategy`
    pub fn bundle(&self, strategy: IdStrategy) -> Option<&MetricBundle> {
        self.bundles
            .iter()
            .find(|(s, _)| *s == strategy)
            .map(|(_, bundle)| bundle)
    }
}

/// All results of a run
///
/// Built incrementally by the matrix engine, then checked with
/// [`ResultSet::finalize`] before being handed to the reporter.
#[derive(Debug, Clone)]
pub struct ResultSet {
    strategies: Vec<IdStrategy>,
    scenarios: Vec<ScenarioResult>,
    by_name: FxHashMap<String, usize>,
    finalized: bool,
}

impl ResultSet {
    /// Create an empty result set for the given strategies (baseline first)
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `strategies` is empty or repeats a strategy.
    pub fn new(strategies: Vec<IdStrategy>) -> Result<Self> {
        if strategies.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one identifier strategy is required".to_string(),
            ));
        }
        for (i, strategy) in strategies.iter().enumerate() {
            if strategies[..i].contains(strategy) {
                return Err(Error::InvalidConfig(format!(
                    "strategy {} listed more than once",
                    strategy
                )));
            }
        }
        Ok(Self {
            strategies,
            scenarios: Vec::new(),
            by_name: FxHashMap::default(),
            finalized: false,
        })
    }

    /// Baseline strategy
    pub fn baseline(&self) -> IdStrategy {
        self.strategies[0]
    }

    /// Strategies compared against the baseline
    pub fn comparisons(&self) -> &[IdStrategy] {
        &self.strategies[1..]
    }

    /// All configured strategies, baseline first
    pub fn strategies(&self) -> &[IdStrategy] {
        &self.strategies
    }

    /// Record the bundle for a (scenario, strategy) pair
    ///
    /// # Errors
    /// Returns `DuplicateBundle` if the pair was already recorded and
    /// `InvalidConfig` if the strategy is not configured.
    pub fn record(
        &mut self,
        scenario: &str,
        strategy: IdStrategy,
        bundle: MetricBundle,
    ) -> Result<()> {
        if !self.strategies.contains(&strategy) {
            return Err(Error::InvalidConfig(format!(
                "strategy {} is not part of this run",
                strategy
            )));
        }
        let idx = match self.by_name.get(scenario) {
            Some(&idx) => idx,
            None => {
                self.scenarios.push(ScenarioResult {
                    scenario: scenario.to_string(),
                    bundles: Vec::with_capacity(self.strategies.len()),
                });
                let idx = self.scenarios.len() - 1;
                self.by_name.insert(scenario.to_string(), idx);
                idx
            }
        };
        let entry = &mut self.scenarios[idx];
        if entry.bundle(strategy).is_some() {
            return Err(Error::DuplicateBundle {
                scenario: scenario.to_string(),
                strategy,
            });
        }
        entry.bundles.push((strategy, bundle));
        Ok(())
    }

    /// Results for one scenario
    pub fn get(&self, scenario: &str) -> Option<&ScenarioResult> {
        self.by_name.get(scenario).map(|&idx| &self.scenarios[idx])
    }

    /// Scenario results in recording order
    pub fn scenarios(&self) -> &[ScenarioResult] {
        &self.scenarios
    }

    /// Number of recorded scenarios
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Whether [`ResultSet::finalize`] succeeded on this set
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Check that every scenario has exactly one bundle per strategy
    ///
    /// # Errors
    /// Returns `IncompleteResults` for the first scenario missing a bundle.
    pub fn finalize(mut self) -> Result<Self> {
        for result in &self.scenarios {
            if result.bundles.len() != self.strategies.len() {
                return Err(Error::IncompleteResults {
                    scenario: result.scenario.clone(),
                    expected: self.strategies.len(),
                    actual: result.bundles.len(),
                });
            }
        }
        self.finalized = true;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(ms: u64) -> MetricBundle {
        MetricBundle {
            insert: Duration::from_millis(ms),
            lookup: None,
            index_bytes: None,
        }
    }

    #[test]
    fn test_record_and_get() {
        let mut set = ResultSet::new(IdStrategy::ALL.to_vec()).unwrap();
        set.record("a", IdStrategy::ObjectId, bundle(10)).unwrap();
        set.record("a", IdStrategy::Ulid, bundle(12)).unwrap();
        set.record("b", IdStrategy::ObjectId, bundle(5)).unwrap();

        assert_eq!(set.len(), 2);
        let a = set.get("a").unwrap();
        assert_eq!(a.bundle(IdStrategy::Ulid).unwrap().insert, Duration::from_millis(12));
        assert!(a.bundle(IdStrategy::Uuid).is_none());
        assert_eq!(set.scenarios()[1].scenario, "b");
    }

    #[test]
    fn test_duplicate_bundle_rejected() {
        let mut set = ResultSet::new(vec![IdStrategy::ObjectId]).unwrap();
        set.record("a", IdStrategy::ObjectId, bundle(1)).unwrap();
        let err = set.record("a", IdStrategy::ObjectId, bundle(2)).unwrap_err();
        assert!(matches!(err, Error::DuplicateBundle { .. }));
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let mut set = ResultSet::new(vec![IdStrategy::ObjectId]).unwrap();
        assert!(set.record("a", IdStrategy::Uuid, bundle(1)).is_err());
    }

    #[test]
    fn test_finalize_detects_missing_bundle() {
        let mut set = ResultSet::new(vec![IdStrategy::ObjectId, IdStrategy::Ulid]).unwrap();
        set.record("a", IdStrategy::ObjectId, bundle(1)).unwrap();
        match set.finalize().unwrap_err() {
            Error::IncompleteResults {
                scenario,
                expected,
                actual,
            } => {
                assert_eq!(scenario, "a");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_finalize_complete() {
        let mut set = ResultSet::new(vec![IdStrategy::ObjectId, IdStrategy::Ulid]).unwrap();
        set.record("a", IdStrategy::Ulid, bundle(1)).unwrap();
        set.record("a", IdStrategy::ObjectId, bundle(1)).unwrap();
        let set = set.finalize().unwrap();
        assert!(set.is_finalized());
        assert_eq!(set.baseline(), IdStrategy::ObjectId);
        assert_eq!(set.comparisons(), &[IdStrategy::Ulid]);
    }

    #[test]
    fn test_empty_strategies_rejected() {
        assert!(ResultSet::new(Vec::new()).is_err());
        assert!(ResultSet::new(vec![IdStrategy::Ulid, IdStrategy::Ulid]).is_err());
    }
}
