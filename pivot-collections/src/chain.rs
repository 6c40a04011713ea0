use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::rc::Rc;

use log::trace;

/// Stable handle to a node in a [`PivotChain`].
///
/// Ids are never invalidated: nodes are only ever added to a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct PivotNode<P, V> {
    position: P,
    value: V,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug)]
struct Arena<P, V> {
    nodes: Vec<PivotNode<P, V>>,
}

/// An ordered chain of (position, value) pivots, strictly ascending by
/// position, supporting nearest-position lookup-or-insert anchored at a
/// previously returned node.
///
/// The chain is a cheaply clonable handle: clones share the same nodes,
/// so several iterators can attach values to the same positions. Access
/// is single-threaded; callers sharing a chain must not do so concurrently.
///
/// Nodes are stored in an arena and linked by index, so a [`NodeId`]
/// stays valid for the lifetime of the chain. Nodes are never removed.
#[derive(Debug)]
pub struct PivotChain<P, V> {
    inner: Rc<RefCell<Arena<P, V>>>,
}

impl<P, V> Clone for PivotChain<P, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P, V> Default for PivotChain<P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V> PivotChain<P, V> {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Arena { nodes: Vec::new() })),
        }
    }

    /// Returns the number of pivots in the chain.
    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Returns true if the chain holds no pivots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the head of the chain, the node with the least position.
    pub fn head_id(&self) -> Option<NodeId> {
        let arena = self.inner.borrow();
        if arena.nodes.is_empty() {
            return None;
        }
        Some(arena.head_from(NodeId(0)))
    }

    /// Returns the tail of the chain, the node with the greatest position.
    pub fn tail_id(&self) -> Option<NodeId> {
        let arena = self.inner.borrow();
        if arena.nodes.is_empty() {
            return None;
        }
        Some(arena.tail_from(NodeId(0)))
    }

    /// Returns the node directly after the given one, or `None` at the tail.
    pub fn next_id(&self, id: NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes[id.0].next
    }

    /// Returns the node directly before the given one, or `None` at the head.
    pub fn prev_id(&self, id: NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes[id.0].prev
    }

    /// Returns every node id in ascending position order.
    pub fn ids(&self) -> Vec<NodeId> {
        let arena = self.inner.borrow();
        let mut ids = Vec::with_capacity(arena.nodes.len());
        let mut walk = if arena.nodes.is_empty() {
            None
        } else {
            Some(arena.head_from(NodeId(0)))
        };
        while let Some(id) = walk {
            ids.push(id);
            walk = arena.nodes[id.0].next;
        }
        ids
    }

    /// Borrows the value stored at the given node.
    ///
    /// The guard must be released before the chain is mutated again.
    pub fn value(&self, id: NodeId) -> Ref<'_, V> {
        Ref::map(self.inner.borrow(), |arena| &arena.nodes[id.0].value)
    }

    /// Mutably borrows the value stored at the given node.
    pub fn value_mut(&self, id: NodeId) -> RefMut<'_, V> {
        RefMut::map(self.inner.borrow_mut(), |arena| {
            &mut arena.nodes[id.0].value
        })
    }
}

impl<P: Clone, V> PivotChain<P, V> {
    /// Returns the position stored at the given node.
    pub fn position(&self, id: NodeId) -> P {
        self.inner.borrow().nodes[id.0].position.clone()
    }
}

impl<P: Clone, V: Clone> PivotChain<P, V> {
    /// Returns an ascending snapshot of every (position, value) pair.
    ///
    /// Walks the whole chain; intended for export and diagnostics rather
    /// than hot paths.
    pub fn pairs(&self) -> Vec<(P, V)> {
        let arena = self.inner.borrow();
        self.ids()
            .into_iter()
            .map(|id| {
                let node = &arena.nodes[id.0];
                (node.position.clone(), node.value.clone())
            })
            .collect()
    }
}

impl<P: Ord, V> PivotChain<P, V> {
    /// Builds a chain from pairs already sorted by strictly ascending position.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (P, V)>) -> Self {
        let chain = Self::new();
        {
            let mut arena = chain.inner.borrow_mut();
            let mut tail = None;
            for (position, value) in pairs {
                tail = Some(match tail {
                    None => arena.seed(position, value),
                    Some(at) => arena.insert_after(at, position, value),
                });
            }
        }
        chain
    }

    /// Returns the node holding `position`, inserting one if absent.
    ///
    /// The search walks from `anchor` toward the target, so cost is
    /// proportional to the distance between the anchor's position and
    /// `position`: near-constant for monotone or local query patterns,
    /// linear for arbitrary jumps. `init` runs only when a node is
    /// actually created. With no anchor the walk starts at the head.
    pub fn get_or_insert<F>(&self, anchor: Option<NodeId>, position: P, init: F) -> NodeId
    where
        F: FnOnce() -> V,
    {
        let mut arena = self.inner.borrow_mut();
        let mut at = match anchor {
            Some(id) => id,
            None if arena.nodes.is_empty() => return arena.seed(position, init()),
            None => arena.head_from(NodeId(0)),
        };
        match position.cmp(&arena.nodes[at.0].position) {
            Ordering::Equal => return at,
            Ordering::Less => {
                while arena.nodes[at.0].position > position {
                    match arena.nodes[at.0].prev {
                        Some(prev) => at = prev,
                        None => break,
                    }
                }
            }
            Ordering::Greater => {
                while arena.nodes[at.0].position < position {
                    match arena.nodes[at.0].next {
                        Some(next) => at = next,
                        None => break,
                    }
                }
            }
        }
        match position.cmp(&arena.nodes[at.0].position) {
            Ordering::Equal => at,
            Ordering::Greater => arena.insert_after(at, position, init()),
            Ordering::Less => arena.insert_before(at, position, init()),
        }
    }
}

impl<P, V> Arena<P, V> {
    fn head_from(&self, mut at: NodeId) -> NodeId {
        while let Some(prev) = self.nodes[at.0].prev {
            at = prev;
        }
        at
    }

    fn tail_from(&self, mut at: NodeId) -> NodeId {
        while let Some(next) = self.nodes[at.0].next {
            at = next;
        }
        at
    }

    fn push(&mut self, node: PivotNode<P, V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        trace!("materialized pivot node {} (chain length {})", id.0, self.nodes.len());
        id
    }
}

impl<P: Ord, V> Arena<P, V> {
    fn seed(&mut self, position: P, value: V) -> NodeId {
        self.push(PivotNode {
            position,
            value,
            prev: None,
            next: None,
        })
    }

    fn insert_after(&mut self, at: NodeId, position: P, value: V) -> NodeId {
        assert!(
            self.nodes[at.0].position < position,
            "pivot chain positions must stay strictly ascending"
        );
        let next = self.nodes[at.0].next;
        if let Some(next) = next {
            assert!(
                position < self.nodes[next.0].position,
                "pivot chain positions must stay strictly ascending"
            );
        }
        let id = self.push(PivotNode {
            position,
            value,
            prev: Some(at),
            next,
        });
        self.nodes[at.0].next = Some(id);
        if let Some(next) = next {
            self.nodes[next.0].prev = Some(id);
        }
        id
    }

    fn insert_before(&mut self, at: NodeId, position: P, value: V) -> NodeId {
        assert!(
            position < self.nodes[at.0].position,
            "pivot chain positions must stay strictly ascending"
        );
        let prev = self.nodes[at.0].prev;
        if let Some(prev) = prev {
            assert!(
                self.nodes[prev.0].position < position,
                "pivot chain positions must stay strictly ascending"
            );
        }
        let id = self.push(PivotNode {
            position,
            value,
            prev,
            next: Some(at),
        });
        self.nodes[at.0].prev = Some(id);
        if let Some(prev) = prev {
            self.nodes[prev.0].next = Some(id);
        }
        id
    }
}
