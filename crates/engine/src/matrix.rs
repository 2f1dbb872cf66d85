//! Benchmark matrix engine
//!
//! Walks the fixed scenario list and, inside each scenario, every configured
//! strategy (baseline first). Everything runs strictly in sequence: the
//! workload saturates the store, so overlapping runs would contaminate each
//! other's timings. The first error stops the whole matrix.

use crate::runner::ScenarioRunner;
use idbench_core::{Error, IdStrategy, Result, ResultSet, ScenarioDefinition, SCENARIOS};
use idbench_store::DocumentStore;
use rustc_hash::FxHashSet;
use std::time::Instant;
use tracing::info;

/// Scenario × strategy matrix over one store
pub struct BenchmarkMatrix<S> {
    runner: ScenarioRunner<S>,
    scenarios: Vec<ScenarioDefinition>,
    strategies: Vec<IdStrategy>,
}

impl<S: DocumentStore> BenchmarkMatrix<S> {
    /// Full matrix: every scenario in [`SCENARIOS`] for every strategy
    pub fn new(store: S) -> Self {
        Self::with_runner(ScenarioRunner::new(store))
    }

    /// Full matrix driven by a pre-configured runner
    pub fn with_runner(runner: ScenarioRunner<S>) -> Self {
        Self {
            runner,
            scenarios: SCENARIOS.to_vec(),
            strategies: IdStrategy::ALL.to_vec(),
        }
    }

    /// Replace the scenario list (order is preserved)
    pub fn with_scenarios(mut self, scenarios: impl Into<Vec<ScenarioDefinition>>) -> Self {
        self.scenarios = scenarios.into();
        self
    }

    /// Replace the strategy list; the first entry becomes the baseline
    pub fn with_strategies(mut self, strategies: impl Into<Vec<IdStrategy>>) -> Self {
        self.strategies = strategies.into();
        self
    }

    /// Scenarios in execution order
    pub fn scenarios(&self) -> &[ScenarioDefinition] {
        &self.scenarios
    }

    /// Strategies in execution order
    pub fn strategies(&self) -> &[IdStrategy] {
        &self.strategies
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        self.runner.store()
    }

    /// Execute the whole matrix
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an unusable scenario or strategy list, otherwise
    /// the first runner error, unmodified (it already carries its scenario,
    /// strategy and phase).
    pub fn run(&self) -> Result<ResultSet> {
        self.validate()?;
        let mut results = ResultSet::new(self.strategies.clone())?;
        let total = self.scenarios.len();

        for (i, scenario) in self.scenarios.iter().enumerate() {
            info!(
                target: "idbench::matrix",
                scenario = scenario.name,
                step = i + 1,
                total,
                "Scenario started"
            );
            let started = Instant::now();

            for &strategy in &self.strategies {
                let bundle = self.runner.run(scenario, strategy)?;
                results.record(scenario.name, strategy, bundle)?;
            }

            info!(
                target: "idbench::matrix",
                scenario = scenario.name,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Scenario finished"
            );
        }

        results.finalize()
    }

    fn validate(&self) -> Result<()> {
        let mut names = FxHashSet::default();
        for scenario in &self.scenarios {
            scenario.validate()?;
            if !names.insert(scenario.name) {
                return Err(Error::InvalidConfig(format!(
                    "scenario '{}' is defined more than once",
                    scenario.name
                )));
            }
        }
        Ok(())
    }
}
