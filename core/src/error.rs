//! Error types for the relay core.
//!
//! # Design
//! Only failures that the graph layer must surface get a variant here.
//! A mutation that targets an id which resolves to nothing is not an error:
//! the operation returns an empty outcome and callers inspect the payload.
//! Malformed global ids are reported as `InvalidGlobalId` by the codec, but
//! node lookup absorbs them into a `None` result.

use thiserror::Error;

/// Errors raised by the store backing the todo list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// The viewer record is missing from the store.
    #[error("viewer `{0}` not found")]
    MissingViewer(String),
}

/// Errors returned by the codec, paginator, resolver and operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The string is not a well-formed global id.
    #[error("invalid global id `{0}`")]
    InvalidGlobalId(String),

    /// `first` or `last` was negative.
    #[error("argument `{name}` must be a non-negative integer, got {value}")]
    InvalidPaginationArgument { name: &'static str, value: i64 },

    /// The underlying store failed.
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}
