//! Comparative reporting for idbench
//!
//! Turns a finished [`idbench_core::ResultSet`] into a fixed-width table of
//! raw values and percentage differences against the baseline strategy.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diff;
pub mod format;
pub mod table;

pub use diff::{calc_diff, format_diff};
pub use format::{format_bytes, format_duration};
pub use table::{metric_deltas, Metric, Report, Row};
