//! Comparison table
//!
//! One row per (scenario, metric) pair that was measured. Each row carries
//! the raw value of every strategy followed by the percentage difference of
//! every comparison strategy against the baseline.

use crate::diff::{calc_diff, format_diff};
use crate::format::{format_bytes, format_duration};
use idbench_core::{Error, IdStrategy, MetricBundle, Result, ResultSet};
use std::fmt;
use std::time::Duration;

/// Minimum width of the label column
pub const LABEL_WIDTH: usize = 72;
/// Width of every value and difference column
pub const VALUE_WIDTH: usize = 12;

const INSERT_GRANULARITY: Duration = Duration::from_millis(1);
const LOOKUP_GRANULARITY: Duration = Duration::from_micros(1);

/// A reported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Timed insertion duration
    Insert,
    /// Mean point-lookup duration
    Lookup,
    /// Primary-key index size
    IndexSize,
}

impl Metric {
    /// All metrics in row order
    pub const ALL: [Metric; 3] = [Metric::Insert, Metric::Lookup, Metric::IndexSize];

    /// Short name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Metric::Insert => "insert duration",
            Metric::Lookup => "get by ID avg duration",
            Metric::IndexSize => "index size",
        }
    }

    /// Comparable value: whole microseconds for durations, bytes for sizes
    pub fn value(self, bundle: &MetricBundle) -> Option<u64> {
        match self {
            Metric::Insert => Some(micros(bundle.insert)),
            Metric::Lookup => bundle.lookup.map(micros),
            Metric::IndexSize => bundle.index_bytes,
        }
    }

    fn render(self, bundle: &MetricBundle) -> Option<String> {
        match self {
            Metric::Insert => Some(format_duration(bundle.insert, INSERT_GRANULARITY)),
            Metric::Lookup => bundle
                .lookup
                .map(|d| format_duration(d, LOOKUP_GRANULARITY)),
            Metric::IndexSize => bundle.index_bytes.map(format_bytes),
        }
    }

    fn row_label(self, scenario: &str) -> String {
        match self {
            Metric::Insert => scenario.to_string(),
            other => format!("{}, {}", scenario, other.name()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

fn missing_metric(results: &ResultSet, scenario: &str, metric: Metric, present: usize) -> Error {
    Error::IncompleteResults {
        scenario: format!("{} ({})", scenario, metric),
        expected: results.strategies().len(),
        actual: present,
    }
}

/// Percentage differences of every comparison strategy against the baseline
///
/// Returns an empty vector when no strategy measured `metric` for this
/// scenario.
///
/// # Errors
///
/// Returns `InvalidConfig` for an unknown scenario, `IncompleteResults` when
/// only some strategies (baseline included) have the metric, and
/// `InvalidBaseline` when the baseline value is zero.
pub fn metric_deltas(
    results: &ResultSet,
    scenario: &str,
    metric: Metric,
) -> Result<Vec<(IdStrategy, f64)>> {
    let result = results
        .get(scenario)
        .ok_or_else(|| Error::InvalidConfig(format!("no results for scenario '{}'", scenario)))?;
    let present = result
        .bundles
        .iter()
        .filter(|(_, bundle)| metric.value(bundle).is_some())
        .count();

    let baseline = match result
        .bundle(results.baseline())
        .and_then(|bundle| metric.value(bundle))
    {
        Some(value) => value,
        None if present == 0 => return Ok(Vec::new()),
        None => return Err(missing_metric(results, scenario, metric, present)),
    };

    results
        .comparisons()
        .iter()
        .map(|&strategy| {
            let value = result
                .bundle(strategy)
                .and_then(|bundle| metric.value(bundle))
                .ok_or_else(|| missing_metric(results, scenario, metric, present))?;
            let diff = calc_diff(baseline, value).map_err(|_| Error::InvalidBaseline {
                metric: format!("{} of '{}'", metric, scenario),
            })?;
            Ok((strategy, diff))
        })
        .collect()
}

/// One table row
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Scenario name, suffixed with the metric for lookup and index rows
    pub label: String,
    /// Formatted value per strategy, baseline first
    pub values: Vec<String>,
    /// Formatted difference per comparison strategy
    pub deltas: Vec<String>,
}

/// Rendered comparison of a finished run
#[derive(Debug, Clone)]
pub struct Report {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Report {
    /// Build the report, finalizing `results` first if needed
    ///
    /// # Errors
    ///
    /// Fails when results are incomplete or a baseline value is zero; no
    /// partial table is produced.
    pub fn build(results: ResultSet) -> Result<Self> {
        let results = if results.is_finalized() {
            results
        } else {
            results.finalize()?
        };

        let mut columns: Vec<String> = results
            .strategies()
            .iter()
            .map(|s| s.label().to_string())
            .collect();
        columns.extend(
            results
                .comparisons()
                .iter()
                .map(|s| format!("% diff {}", s.label())),
        );

        let mut rows = Vec::new();
        for scenario in results.scenarios() {
            for metric in Metric::ALL {
                let deltas = metric_deltas(&results, &scenario.scenario, metric)?;
                let measured = scenario
                    .bundle(results.baseline())
                    .and_then(|bundle| metric.value(bundle))
                    .is_some();
                if !measured {
                    continue;
                }
                let values = results
                    .strategies()
                    .iter()
                    .map(|&strategy| {
                        scenario
                            .bundle(strategy)
                            .and_then(|bundle| metric.render(bundle))
                            .ok_or_else(|| {
                                missing_metric(&results, &scenario.scenario, metric, 0)
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                rows.push(Row {
                    label: metric.row_label(&scenario.scenario),
                    values,
                    deltas: deltas.iter().map(|(_, d)| format_diff(*d)).collect(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Column headers after the label column
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Table rows in scenario order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Render the fixed-width table
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn label_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.label.chars().count())
            .fold(LABEL_WIDTH, usize::max)
    }
}

fn write_line<'a>(
    f: &mut fmt::Formatter<'_>,
    label_width: usize,
    label: &str,
    cells: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    write!(f, "| {:<width$} |", label, width = label_width)?;
    for cell in cells {
        write!(f, " {:<width$} |", cell, width = VALUE_WIDTH)?;
    }
    writeln!(f)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self.label_width();
        write_line(
            f,
            label_width,
            "Test case",
            self.columns.iter().map(String::as_str),
        )?;

        let rule = "-".repeat(VALUE_WIDTH);
        write_line(
            f,
            label_width,
            &"-".repeat(label_width),
            self.columns.iter().map(|_| rule.as_str()),
        )?;

        for row in &self.rows {
            write_line(
                f,
                label_width,
                &row.label,
                row.values.iter().chain(&row.deltas).map(String::as_str),
            )?;
        }
        Ok(())
    }
}
