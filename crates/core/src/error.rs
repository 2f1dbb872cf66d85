//! Error types for idbench
//!
//! Every failure the benchmark can hit is a variant of [`Error`]. We use
//! `thiserror` for the `Display` and `Error` implementations.
//!
//! Nothing in the workspace recovers from or retries an error: a retried
//! store call would corrupt the timing it belongs to. Errors raised while a
//! scenario is executing are wrapped in [`Error::Scenario`] so the top level
//! can print which scenario, strategy and phase produced them.

use crate::ids::IdStrategy;
use crate::scenario::Phase;
use thiserror::Error;

/// Result type alias for idbench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for idbench
#[derive(Debug, Error)]
pub enum Error {
    /// Connecting to or pinging the store failed during setup
    #[error("connection failed: {reason}")]
    ConnectionFailed {
        /// Driver or configuration message
        reason: String,
    },

    /// A store call failed on connectivity or exceeded its timeout
    #[error("store unavailable during {operation}: {reason}")]
    StoreUnavailable {
        /// Store operation that was in flight
        operation: &'static str,
        /// Driver message
        reason: String,
    },

    /// The store rejected a write (e.g. duplicate key)
    #[error("write rejected: {reason}")]
    WriteRejected {
        /// Driver message
        reason: String,
    },

    /// A point lookup failed for a reason other than connectivity
    #[error("query failed: {reason}")]
    QueryFailed {
        /// Driver message
        reason: String,
    },

    /// Dropping or clearing the working collection failed
    #[error("cleanup failed: {reason}")]
    CleanupFailed {
        /// Driver message
        reason: String,
    },

    /// The collection statistics did not contain the primary-key index size
    #[error("index statistics unavailable: {reason}")]
    StatsUnavailable {
        /// What was missing from the response
        reason: String,
    },

    /// A percentage comparison was requested against a zero baseline
    #[error("invalid baseline: {metric} is zero for the baseline strategy")]
    InvalidBaseline {
        /// Metric (and scenario) whose baseline was zero
        metric: String,
    },

    /// A scenario is missing bundles for some configured strategies
    #[error("incomplete results for scenario '{scenario}': expected {expected} bundles, got {actual}")]
    IncompleteResults {
        /// Scenario name
        scenario: String,
        /// Number of configured strategies
        expected: usize,
        /// Number of recorded bundles
        actual: usize,
    },

    /// A second bundle was recorded for the same scenario and strategy
    #[error("duplicate result for scenario '{scenario}' and strategy {strategy}")]
    DuplicateBundle {
        /// Scenario name
        scenario: String,
        /// Strategy recorded twice
        strategy: IdStrategy,
    },

    /// Invalid benchmark configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A failure raised while executing one (scenario, strategy) pair
    #[error("scenario '{scenario}' with {strategy} identifiers failed during {phase}")]
    Scenario {
        /// Scenario name
        scenario: String,
        /// Strategy being measured
        strategy: IdStrategy,
        /// Phase that failed
        phase: Phase,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the scenario, strategy and phase that produced it
    pub fn in_scenario(self, scenario: &str, strategy: IdStrategy, phase: Phase) -> Self {
        Error::Scenario {
            scenario: scenario.to_string(),
            strategy,
            phase,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping scenario context
    pub fn root(&self) -> &Error {
        match self {
            Error::Scenario { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is a cleanup failure (possibly wrapped in context)
    pub fn is_cleanup_failure(&self) -> bool {
        matches!(self.root(), Error::CleanupFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display_store_unavailable() {
        let err = Error::StoreUnavailable {
            operation: "insert_batch",
            reason: "timed out after 5s".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("store unavailable"));
        assert!(msg.contains("insert_batch"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn test_error_display_invalid_baseline() {
        let err = Error::InvalidBaseline {
            metric: "index size".to_string(),
        };
        assert!(err.to_string().contains("index size"));
    }

    #[test]
    fn test_scenario_context_keeps_source() {
        let err = Error::WriteRejected {
            reason: "E11000 duplicate key".to_string(),
        }
        .in_scenario("1M inserts", IdStrategy::Ulid, Phase::Insert);

        let msg = err.to_string();
        assert!(msg.contains("1M inserts"));
        assert!(msg.contains("ULID"));
        assert!(msg.contains("insert"));

        let source = err.source().expect("context must expose its source");
        assert!(source.to_string().contains("E11000"));
        assert!(matches!(err.root(), Error::WriteRejected { .. }));
    }

    #[test]
    fn test_is_cleanup_failure_sees_through_context() {
        let err = Error::CleanupFailed {
            reason: "drop timed out".to_string(),
        }
        .in_scenario("s", IdStrategy::ObjectId, Phase::Cleanup);
        assert!(err.is_cleanup_failure());

        let other = Error::QueryFailed {
            reason: "bad filter".to_string(),
        };
        assert!(!other.is_cleanup_failure());
    }
}
