use std::cell::RefMut;

use pivot_collections::{NodeId, PivotChain};

use crate::error::Result;
use crate::traits::RevertibleIterator;

/// A revertible iterator that lazily attaches a value to each position
/// it visits.
///
/// Wraps a [`RevertibleIterator`] and grows a [`PivotChain`] on demand:
/// [`here`](Self::here) returns the value at the current position,
/// materializing it with the default-value factory on first visit. The
/// node last produced anchors the next lookup, so the chain walk stays
/// short for the scanning-with-occasional-backtrack access pattern.
/// Reverting the iterator never removes or resets already-created
/// values.
///
/// ```
/// use revertible_iteration::{PivotIterator, RevertibleIterator, TextIterator};
///
/// let mut chars = PivotIterator::new(TextIterator::new("Hi!"), |_| [0u32; 1]);
/// while chars.has_next() {
///     let ch = chars.peek().unwrap();
///     chars.here().unwrap()[0] = ch as u32;
///     chars.advance(1).unwrap();
/// }
/// let codes: Vec<u32> = chars.pivots().into_iter().map(|(_, v)| v[0]).collect();
/// assert_eq!(codes, vec![72, 105, 33]);
/// ```
pub struct PivotIterator<I, V, F>
where
    I: RevertibleIterator,
    F: Fn(&I::Position) -> V,
{
    iter: I,
    chain: PivotChain<I::Position, V>,
    cursor: Option<NodeId>,
    init: F,
}

impl<I, V, F> PivotIterator<I, V, F>
where
    I: RevertibleIterator,
    F: Fn(&I::Position) -> V,
{
    /// Wraps the iterator with a fresh, empty chain.
    pub fn new(iter: I, init: F) -> Self {
        Self::with_chain(iter, PivotChain::new(), init)
    }

    /// Wraps the iterator around an existing chain, so separate passes
    /// can attach or observe the same position-keyed values.
    pub fn with_chain(iter: I, chain: PivotChain<I::Position, V>, init: F) -> Self {
        Self {
            iter,
            chain,
            cursor: None,
            init,
        }
    }

    /// Returns a shared handle to the chain.
    pub fn chain(&self) -> PivotChain<I::Position, V> {
        self.chain.clone()
    }

    /// Returns a reference to the wrapped iterator.
    pub fn inner(&self) -> &I {
        &self.iter
    }

    /// Returns the value attached to the current position, creating it
    /// from the default-value factory if this is the first visit. The
    /// returned node becomes the anchor for the next lookup.
    ///
    /// The guard must be dropped before the next chain access.
    pub fn here(&mut self) -> Result<RefMut<'_, V>> {
        let position = self.iter.position()?;
        let id = self
            .chain
            .get_or_insert(self.cursor, position.clone(), || (self.init)(&position));
        self.cursor = Some(id);
        Ok(self.chain.value_mut(id))
    }

    /// Returns every pivot created so far as ascending (position, value)
    /// pairs. Walks the whole chain; this is an export/diagnostic path,
    /// not a hot one.
    pub fn pivots(&self) -> Vec<(I::Position, V)>
    where
        V: Clone,
    {
        self.chain.pairs()
    }
}

impl<I, V, F> RevertibleIterator for PivotIterator<I, V, F>
where
    I: RevertibleIterator,
    F: Fn(&I::Position) -> V,
{
    type Item = I::Item;
    type Position = I::Position;

    fn advance(&mut self, places: isize) -> Result<()> {
        self.iter.advance(places)
    }

    fn save(&mut self) {
        self.iter.save();
    }

    fn revert(&mut self) -> Result<()> {
        self.iter.revert()
    }

    fn remove_save(&mut self) -> Result<()> {
        self.iter.remove_save()
    }

    fn peek(&mut self) -> Result<Self::Item> {
        self.iter.peek()
    }

    fn position(&mut self) -> Result<Self::Position> {
        self.iter.position()
    }

    fn has_next(&mut self) -> bool {
        self.iter.has_next()
    }
}

impl<I, V, F> Iterator for PivotIterator<I, V, F>
where
    I: RevertibleIterator + Iterator,
    F: Fn(&<I as RevertibleIterator>::Position) -> V,
{
    type Item = <I as Iterator>::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

impl<I, V, F> PartialEq for PivotIterator<I, V, F>
where
    I: RevertibleIterator + PartialEq,
    F: Fn(&I::Position) -> V,
{
    fn eq(&self, other: &Self) -> bool {
        self.iter == other.iter
    }
}
