use crate::error::Result;

/// A forward cursor over a sequence whose position can be saved and
/// reverted to later, to arbitrary depth.
///
/// ```
/// use revertible_iteration::{RevertibleIterator, TextIterator};
///
/// let mut chars = TextIterator::new("Hello, world!");
/// chars.save();
/// chars.advance(7).unwrap();
/// assert_eq!(chars.by_ref().collect::<String>(), "world!");
/// chars.revert().unwrap();
/// assert_eq!(chars.by_ref().collect::<String>(), "Hello, world!");
/// ```
pub trait RevertibleIterator {
    /// The element type produced by the iterator.
    type Item;

    /// The position token: an opaque, totally ordered identifier of a
    /// place in the sequence.
    type Position: Clone + Ord;

    /// Moves the cursor forward by the given number of elements without
    /// producing them. Fails with
    /// [`NegativeAdvance`](crate::IterationError::NegativeAdvance) when
    /// `places` is negative, leaving the position unchanged. Never touches
    /// the saved-position stack.
    fn advance(&mut self, places: isize) -> Result<()>;

    /// Saves the current cursor position.
    ///
    /// Can be called more than once to save multiple positions, and even
    /// when the iterator is exhausted.
    fn save(&mut self);

    /// Reverts the cursor to the position last saved, removing it from
    /// the saved-position stack. Fails with
    /// [`NoSavedPosition`](crate::IterationError::NoSavedPosition) if no
    /// unmatched `save` precedes it.
    fn revert(&mut self) -> Result<()>;

    /// Removes the position last saved without moving the cursor to it.
    /// Same failure mode as [`revert`](Self::revert).
    fn remove_save(&mut self) -> Result<()>;

    /// Returns the next element without consuming it. Fails with
    /// [`Exhausted`](crate::IterationError::Exhausted) if none remains.
    ///
    /// Takes `&mut self` because a streaming iterator may need to pull
    /// from its source to answer.
    fn peek(&mut self) -> Result<Self::Item>;

    /// Returns the current position token.
    fn position(&mut self) -> Result<Self::Position>;

    /// Returns true if another element can be read without reverting.
    fn has_next(&mut self) -> bool;

    /// The negation of [`has_next`](Self::has_next); no independent state.
    fn is_exhausted(&mut self) -> bool {
        !self.has_next()
    }

    /// Consumes and returns the next element.
    fn next_item(&mut self) -> Result<Self::Item> {
        let item = self.peek()?;
        self.advance(1)?;
        Ok(item)
    }
}
