//! Pivot Collections
//!
//! Shared primitives for revertible iteration: the line/column position
//! token and the ordered position-to-value chain used for per-position
//! memoization.

pub mod chain;
pub mod position;

pub use chain::{NodeId, PivotChain};
pub use position::SourcePosition;
