//! Analytics error types.
//!
//! Every fatal failure mode has a named variant. Per-row constraint
//! violations are not fatal: they become [`RecordRejection`] values that
//! the loader counts and drops while processing continues.

use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    /// A required source table is absent or unreadable. Fatal: nothing
    /// renders, the operator must regenerate the input.
    #[error("missing input table '{path}': {source}")]
    MissingInput {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The input stream was readable but no row survived validation.
    #[error("no valid order rows in input ({dropped} dropped)")]
    EmptyInput { dropped: usize },

    /// The CSV stream itself is broken (not a single-row problem).
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for loading and report operations.
pub type InsightResult<T> = Result<T, InsightError>;

/// Why a single row was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// A required identifier column is empty.
    MissingField(&'static str),
    /// The purchase timestamp matched none of the accepted formats.
    UnparseableTimestamp(String),
    /// Revenue must be finite and non-negative.
    InvalidRevenue(f64),
    /// Review scores live on the 1-5 scale when present.
    ReviewOutOfRange(f64),
    /// Delivery duration cannot be negative.
    NegativeDeliveryDays(f64),
    /// The row failed CSV deserialization outright.
    Malformed(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::MissingField(field) => write!(f, "missing required field '{}'", field),
            RejectReason::UnparseableTimestamp(raw) => {
                write!(f, "unparseable timestamp '{}'", raw)
            }
            RejectReason::InvalidRevenue(v) => write!(f, "invalid revenue {}", v),
            RejectReason::ReviewOutOfRange(v) => write!(f, "review score {} outside 1-5", v),
            RejectReason::NegativeDeliveryDays(v) => write!(f, "negative delivery days {}", v),
            RejectReason::Malformed(msg) => write!(f, "malformed row: {}", msg),
        }
    }
}

/// One dropped input row, with its 1-based CSV line number (the header
/// is line 1, so data starts at line 2).
#[derive(Debug, Clone)]
pub struct RecordRejection {
    pub line: usize,
    pub reason: RejectReason,
}

impl fmt::Display for RecordRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}
