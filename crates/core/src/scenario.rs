//! Scenario definitions
//!
//! The scenario list is a compile-time constant. Order matters: cheap
//! scenarios run first so an interrupted run still produced the most useful
//! comparisons.

use crate::error::{Error, Result};
use std::fmt;

/// One million documents
pub const ONE_MILLION: usize = 1_000_000;
/// Ten million documents
pub const TEN_MILLION: usize = 10 * ONE_MILLION;

/// Batch size used to provision pre-existing documents (not measured)
pub const PROVISION_BATCH_SIZE: usize = 100_000;

/// Number of point lookups averaged in the lookup phase
pub const LOOKUP_PROBES: usize = 100;

/// How the working collection is emptied after a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cleanup {
    /// Drop the whole collection, indexes included
    Drop,
    /// Delete every document; the collection and its indexes persist
    Clear,
}

/// Phase of a single (scenario, strategy) execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inserting pre-existing documents
    Provisioning,
    /// Timed insertion
    Insert,
    /// Timed point lookups
    Lookup,
    /// Primary-key index size query
    IndexSize,
    /// Dropping or clearing the collection
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Provisioning => "provisioning",
            Phase::Insert => "insert",
            Phase::Lookup => "lookup",
            Phase::IndexSize => "index size",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Immutable description of one benchmark scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioDefinition {
    /// Human-readable name, also the result-set key
    pub name: &'static str,
    /// Documents inserted during the timed phase
    pub total_documents: usize,
    /// Documents per insert call; `None` inserts one document per call
    pub batch_size: Option<usize>,
    /// Documents present before the timed phase starts
    pub preexisting_documents: usize,
    /// Measure average point-lookup latency after insertion
    pub measure_lookup: bool,
    /// Read the primary-key index size after insertion
    pub measure_index_size: bool,
    /// How the collection is emptied afterwards
    pub cleanup: Cleanup,
}

impl ScenarioDefinition {
    /// Batched insertion into an empty collection
    pub const fn batched(name: &'static str, total_documents: usize, batch_size: usize) -> Self {
        Self {
            name,
            total_documents,
            batch_size: Some(batch_size),
            preexisting_documents: 0,
            measure_lookup: false,
            measure_index_size: false,
            cleanup: Cleanup::Drop,
        }
    }

    /// One-document-per-call insertion into an empty collection
    pub const fn single(name: &'static str, total_documents: usize) -> Self {
        Self {
            name,
            total_documents,
            batch_size: None,
            preexisting_documents: 0,
            measure_lookup: false,
            measure_index_size: false,
            cleanup: Cleanup::Drop,
        }
    }

    /// Batched insertion on top of pre-existing data, with lookup and index
    /// size measured afterwards
    pub const fn with_preexisting(
        name: &'static str,
        total_documents: usize,
        preexisting_documents: usize,
        batch_size: usize,
    ) -> Self {
        Self {
            name,
            total_documents,
            batch_size: Some(batch_size),
            preexisting_documents,
            measure_lookup: true,
            measure_index_size: true,
            cleanup: Cleanup::Drop,
        }
    }

    /// Sizes of the insert calls issued by the timed phase
    ///
    /// Batched scenarios issue full batches followed by one shorter remainder;
    /// unbatched scenarios issue one call per document.
    pub fn insert_call_sizes(&self) -> impl Iterator<Item = usize> {
        let total = self.total_documents;
        let step = self.batch_size.unwrap_or(1).max(1);
        (0..total).step_by(step).map(move |start| step.min(total - start))
    }

    /// Number of documents in the collection once the timed phase finishes
    pub fn final_documents(&self) -> usize {
        self.preexisting_documents + self.total_documents
    }

    /// Check the definition is executable
    ///
    /// # Errors
    /// Returns `InvalidConfig` for an empty name or a zero batch size.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("scenario name is empty".to_string()));
        }
        if self.batch_size == Some(0) {
            return Err(Error::InvalidConfig(format!(
                "scenario '{}' has a zero batch size",
                self.name
            )));
        }
        Ok(())
    }
}

/// The fixed benchmark matrix, cheapest first
pub const SCENARIOS: &[ScenarioDefinition] = &[
    ScenarioDefinition::batched("1M inserts batched, batch size = 1k", ONE_MILLION, 1_000),
    ScenarioDefinition::batched("1M inserts batched, batch size = 5k", ONE_MILLION, 5_000),
    ScenarioDefinition::batched("1M inserts batched, batch size = 10k", ONE_MILLION, 10_000),
    ScenarioDefinition::single("1M inserts", ONE_MILLION),
    ScenarioDefinition::with_preexisting(
        "10M inserts batched, 10M documents already present, batch size = 10k",
        TEN_MILLION,
        TEN_MILLION,
        10_000,
    ),
    ScenarioDefinition::with_preexisting(
        "10M inserts batched, 10M documents already present, batch size = 100k",
        TEN_MILLION,
        TEN_MILLION,
        100_000,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_insert_call_sizes_with_remainder() {
        let scenario = ScenarioDefinition::batched("t", 10, 3);
        let sizes: Vec<_> = scenario.insert_call_sizes().collect();
        assert_eq!(sizes, vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_insert_call_sizes_unbatched() {
        let scenario = ScenarioDefinition::single("t", 4);
        assert_eq!(scenario.insert_call_sizes().collect::<Vec<_>>(), vec![1; 4]);
    }

    #[test]
    fn test_insert_call_sizes_empty() {
        let scenario = ScenarioDefinition::batched("t", 0, 5);
        assert_eq!(scenario.insert_call_sizes().count(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(ScenarioDefinition::batched("t", 10, 0).validate().is_err());
        assert!(ScenarioDefinition::single("", 10).validate().is_err());
        for scenario in SCENARIOS {
            scenario.validate().unwrap();
        }
    }

    #[test]
    fn test_scenario_names_unique() {
        let names: HashSet<_> = SCENARIOS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SCENARIOS.len());
    }

    #[test]
    fn test_scenarios_ordered_cheap_first() {
        let costs: Vec<_> = SCENARIOS.iter().map(|s| s.final_documents()).collect();
        let mut sorted = costs.clone();
        sorted.sort();
        assert_eq!(costs, sorted);
        assert!(SCENARIOS.last().unwrap().measure_index_size);
    }
}
