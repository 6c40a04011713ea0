use std::io;

use thiserror::Error;

/// Result alias for revertible iteration operations.
pub type Result<T> = std::result::Result<T, IterationError>;

/// Failure kinds surfaced by revertible iterators.
///
/// All failures are local and synchronous; nothing is retried inside the
/// library. Callers either propagate, or catch and backtrack with
/// `save`/`revert`.
#[derive(Debug, Error)]
pub enum IterationError {
    /// No element remains at the current position.
    #[error("iterator is past the final position")]
    Exhausted,

    /// `revert` or `remove_save` was called with no unmatched `save`.
    #[error("no positions saved")]
    NoSavedPosition,

    /// `advance` was called with a negative count.
    #[error("cannot advance by a negative amount")]
    NegativeAdvance,

    /// The backing source was closed, or reading from it failed.
    #[error("backing source is closed")]
    ClosedSource(#[source] Option<io::Error>),
}

impl IterationError {
    /// A `ClosedSource` error with no underlying I/O cause.
    pub fn closed() -> Self {
        IterationError::ClosedSource(None)
    }
}
