//! Revertible Iteration
//!
//! Revertible positional iteration over sequences and streaming character
//! sources, with sparse lazily-created per-position values. The substrate
//! for backtracking lexers, packrat parsers, and similar scanning
//! front-ends; no tokenizing or grammar lives here.

pub mod error;
pub mod pivot;
pub mod sequence;
pub mod source;
pub mod stack;
pub mod traits;

pub use error::{IterationError, Result};
pub use pivot::PivotIterator;
pub use pivot_collections::{NodeId, PivotChain, SourcePosition};
pub use sequence::{SliceIterator, TextIterator};
pub use source::SourceIterator;
pub use stack::SaveStack;
pub use traits::RevertibleIterator;
