use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{IterationError, Result};
use crate::stack::SaveStack;
use crate::traits::RevertibleIterator;

/// A revertible iterator over a finite, index-addressable sequence of
/// elements. Position is the element index, starting at 0.
///
/// The backing sequence is shared and immutable for the iterator's
/// lifetime; consuming elements never mutates it. Two iterators compare
/// equal iff they share the identical backing allocation and report the
/// same position.
#[derive(Debug, Clone)]
pub struct SliceIterator<E> {
    elements: Arc<[E]>,
    position: usize,
    saved: SaveStack<usize>,
}

impl<E: Clone> SliceIterator<E> {
    /// Creates an iterator over the given elements.
    pub fn new(elements: impl Into<Arc<[E]>>) -> Self {
        Self::with_arc(elements.into())
    }

    /// Creates an iterator over an existing shared sequence.
    pub fn with_arc(elements: Arc<[E]>) -> Self {
        Self {
            elements,
            position: 0,
            saved: SaveStack::new(),
        }
    }

    /// Returns the shared backing sequence.
    pub fn elements(&self) -> &Arc<[E]> {
        &self.elements
    }
}

impl<E: Clone> RevertibleIterator for SliceIterator<E> {
    type Item = E;
    type Position = usize;

    fn advance(&mut self, places: isize) -> Result<()> {
        if places < 0 {
            return Err(IterationError::NegativeAdvance);
        }
        // May move past the end; exhaustion is a valid position.
        self.position += places as usize;
        Ok(())
    }

    fn save(&mut self) {
        self.saved.push(self.position);
    }

    fn revert(&mut self) -> Result<()> {
        self.position = self.saved.pop()?;
        Ok(())
    }

    fn remove_save(&mut self) -> Result<()> {
        self.saved.pop()?;
        Ok(())
    }

    fn peek(&mut self) -> Result<E> {
        self.elements
            .get(self.position)
            .cloned()
            .ok_or(IterationError::Exhausted)
    }

    fn position(&mut self) -> Result<usize> {
        Ok(self.position)
    }

    fn has_next(&mut self) -> bool {
        self.position < self.elements.len()
    }
}

impl<E: Clone> Iterator for SliceIterator<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.next_item().ok()
    }
}

impl<E> PartialEq for SliceIterator<E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.elements, &other.elements) && self.position == other.position
    }
}

impl<E> Eq for SliceIterator<E> {}

impl<E> Hash for SliceIterator<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.elements) as *const E).hash(state);
        self.position.hash(state);
    }
}

impl<E: fmt::Debug> fmt::Display for SliceIterator<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elements.get(self.position) {
            Some(element) => write!(f, "{:?} (index = {})", element, self.position),
            None => write!(f, "<past final position> (index = {})", self.position),
        }
    }
}

/// A saved cursor state pairing the char index with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextCheckpoint {
    chars: usize,
    byte: usize,
}

/// A revertible iterator over the characters of a string. Position is
/// the char index, starting at 0.
///
/// Internally the cursor also tracks the matching byte offset so that
/// peeking is O(1) at the cursor while positions stay char-addressed.
#[derive(Debug, Clone)]
pub struct TextIterator {
    text: Arc<str>,
    chars: usize,
    byte: usize,
    saved: SaveStack<TextCheckpoint>,
}

impl TextIterator {
    /// Creates an iterator over the given text.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self::with_arc(Arc::<str>::from(text.into()))
    }

    /// Creates an iterator over an existing shared buffer.
    pub fn with_arc(text: Arc<str>) -> Self {
        Self {
            text,
            chars: 0,
            byte: 0,
            saved: SaveStack::new(),
        }
    }

    /// Returns the shared backing text.
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }
}

impl RevertibleIterator for TextIterator {
    type Item = char;
    type Position = usize;

    fn advance(&mut self, places: isize) -> Result<()> {
        if places < 0 {
            return Err(IterationError::NegativeAdvance);
        }
        for _ in 0..places {
            // Past the end the byte offset stays pinned while the char
            // index keeps counting, so reverting remains exact.
            if let Some(ch) = self.text[self.byte..].chars().next() {
                self.byte += ch.len_utf8();
            }
            self.chars += 1;
        }
        Ok(())
    }

    fn save(&mut self) {
        self.saved.push(TextCheckpoint {
            chars: self.chars,
            byte: self.byte,
        });
    }

    fn revert(&mut self) -> Result<()> {
        let checkpoint = self.saved.pop()?;
        self.chars = checkpoint.chars;
        self.byte = checkpoint.byte;
        Ok(())
    }

    fn remove_save(&mut self) -> Result<()> {
        self.saved.pop()?;
        Ok(())
    }

    fn peek(&mut self) -> Result<char> {
        self.text[self.byte..]
            .chars()
            .next()
            .ok_or(IterationError::Exhausted)
    }

    fn position(&mut self) -> Result<usize> {
        Ok(self.chars)
    }

    fn has_next(&mut self) -> bool {
        self.byte < self.text.len()
    }
}

impl Iterator for TextIterator {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.next_item().ok()
    }
}

impl PartialEq for TextIterator {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.text, &other.text) && self.chars == other.chars
    }
}

impl Eq for TextIterator {}

impl Hash for TextIterator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.text) as *const u8).hash(state);
        self.chars.hash(state);
    }
}

impl fmt::Display for TextIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text[self.byte..].chars().next() {
            Some(ch) => write!(f, "{} (index = {})", ch, self.chars),
            None => write!(f, "<past final position> (index = {})", self.chars),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_unicode_positions_are_char_indices() {
        let mut chars = TextIterator::new("héllo");
        assert_eq!(chars.next_item().unwrap(), 'h');
        assert_eq!(chars.next_item().unwrap(), 'é');
        assert_eq!(RevertibleIterator::position(&mut chars).unwrap(), 2);
        assert_eq!(chars.peek().unwrap(), 'l');
    }

    #[test]
    fn test_text_revert_restores_byte_offset() {
        let mut chars = TextIterator::new("日本語abc");
        chars.save();
        chars.advance(3).unwrap();
        assert_eq!(chars.peek().unwrap(), 'a');
        chars.revert().unwrap();
        assert_eq!(chars.peek().unwrap(), '日');
        assert_eq!(RevertibleIterator::position(&mut chars).unwrap(), 0);
    }

    #[test]
    fn test_equality_requires_identical_backing() {
        let shared = Arc::<str>::from("abc");
        let mut a = TextIterator::with_arc(Arc::clone(&shared));
        let mut b = TextIterator::with_arc(shared);
        assert_eq!(a, b);
        a.advance(1).unwrap();
        assert_ne!(a, b);
        b.advance(1).unwrap();
        assert_eq!(a, b);
        let c = TextIterator::new("abc");
        assert_ne!(b, c); // same content, different instance
    }

    #[test]
    fn test_slice_display() {
        let mut elements = SliceIterator::new(vec![10, 20]);
        assert_eq!(elements.to_string(), "10 (index = 0)");
        elements.advance(2).unwrap();
        assert_eq!(elements.to_string(), "<past final position> (index = 2)");
    }
}
