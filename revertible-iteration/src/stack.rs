use crate::error::{IterationError, Result};

/// A growable LIFO stack of saved position tokens.
///
/// Every revertible iterator owns one of these to implement nested
/// `save`/`revert`. Entries may be plain integers, composite checkpoints,
/// or line/column positions.
#[derive(Debug, Clone)]
pub struct SaveStack<P> {
    saved: Vec<P>,
}

impl<P> SaveStack<P> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { saved: Vec::new() }
    }

    /// Pushes a saved position.
    pub fn push(&mut self, position: P) {
        self.saved.push(position);
    }

    /// Pops the most recently saved position, failing with
    /// [`NoSavedPosition`](IterationError::NoSavedPosition) when empty.
    pub fn pop(&mut self) -> Result<P> {
        self.saved.pop().ok_or(IterationError::NoSavedPosition)
    }

    /// Returns the number of saved positions.
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    /// Returns true if no positions are saved.
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

impl<P> Default for SaveStack<P> {
    fn default() -> Self {
        Self::new()
    }
}
