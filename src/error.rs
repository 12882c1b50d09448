//! Error types for the line-level parsers.
//!
//! File-level routines wrap these in [anyhow::Error] with the file path and
//! line number attached, so callers only need to match on [AnnotError] when
//! they drive the parsers directly.

use thiserror::Error;

/// Failures raised while parsing a single feature line, lineage token or table row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotError {
    /// A `gene` record ended before the named column.
    #[error("missing {field} column (found {found} fields)")]
    MissingField { field: &'static str, found: usize },

    /// A start or end column that is not an integer.
    #[error("invalid {field} coordinate: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    /// The attribute column has fewer `;`-separated pairs than requested.
    #[error("attribute field {field:?} has no pair at index {index}")]
    MissingAttribute { field: String, index: usize },

    /// The selected attribute pair does not start with the expected `key=`.
    #[error("malformed attribute field: expected {key}=<value>, found {pair:?}")]
    MalformedAttribute { key: String, pair: String },

    /// Percent difference against a reference gene of length 0.
    #[error("reference length is 0, cannot compute a percent difference")]
    ZeroLengthReference,

    /// A lineage token without a parenthesized rank.
    #[error("malformed lineage entry {0:?}: no parenthesized rank")]
    MalformedLineageEntry(String),

    /// A lineage table row with fewer leading columns than required.
    #[error("expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
}
