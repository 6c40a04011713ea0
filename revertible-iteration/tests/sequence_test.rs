//! Sequence-backed iterator tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use revertible_iteration::{IterationError, RevertibleIterator, SliceIterator, TextIterator};

const TEST_STRING: &str = "A3Z8q9B5C2";

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_exactly_len_consumptions() {
    let elements: Vec<i32> = (0..6).collect();
    let mut iter = SliceIterator::new(elements);
    for k in 0..6 {
        assert_eq!(RevertibleIterator::position(&mut iter).unwrap(), k);
        assert_eq!(iter.next_item().unwrap(), k as i32);
    }
    assert_eq!(RevertibleIterator::position(&mut iter).unwrap(), 6);
    assert!(matches!(iter.next_item(), Err(IterationError::Exhausted)));
}

#[test]
fn test_peek_does_not_consume() {
    let mut chars = TextIterator::new(TEST_STRING);
    assert_eq!(chars.peek().unwrap(), 'A');
    assert_eq!(chars.peek().unwrap(), 'A');
    assert_eq!(RevertibleIterator::position(&mut chars).unwrap(), 0);
}

#[test]
fn test_out_of_range_is_exhausted_not_a_panic() {
    let mut elements: SliceIterator<u8> = SliceIterator::new(Vec::new());
    assert!(elements.is_exhausted());
    assert!(matches!(elements.peek(), Err(IterationError::Exhausted)));
    elements.advance(3).unwrap();
    assert!(matches!(elements.peek(), Err(IterationError::Exhausted)));
}

#[test]
fn test_iterator_adapter_collect() {
    let chars: String = TextIterator::new(TEST_STRING).collect();
    assert_eq!(chars, TEST_STRING);

    let elements: Vec<char> = TEST_STRING.chars().collect();
    let collected: Vec<char> = SliceIterator::new(elements.clone()).collect();
    assert_eq!(collected, elements);
}

#[test]
fn test_exhaustion_is_negation_of_has_next() {
    let mut chars = TextIterator::new("a");
    assert!(chars.has_next());
    assert!(!chars.is_exhausted());
    chars.next_item().unwrap();
    assert!(!chars.has_next());
    assert!(chars.is_exhausted());
}

#[test]
fn test_equality_by_instance_and_position() {
    let shared: Arc<[i32]> = vec![1, 2, 3].into();
    let mut a = SliceIterator::with_arc(Arc::clone(&shared));
    let mut b = SliceIterator::with_arc(Arc::clone(&shared));
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    a.advance(2).unwrap();
    assert_ne!(a, b);
    b.advance(2).unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    // Same contents, different backing instance.
    let other = SliceIterator::new(vec![1, 2, 3]);
    assert_ne!(b, other);
}

#[test]
fn test_consuming_does_not_mutate_backing() {
    let shared: Arc<str> = Arc::from(TEST_STRING);
    let mut chars = TextIterator::with_arc(Arc::clone(&shared));
    while chars.has_next() {
        chars.next_item().unwrap();
    }
    assert_eq!(&*shared, TEST_STRING);
    // A second pass over the same buffer sees the full sequence again.
    let again: String = TextIterator::with_arc(shared).collect();
    assert_eq!(again, TEST_STRING);
}

#[test]
fn test_slice_of_owned_tokens() {
    let tokens = vec!["let".to_string(), "x".to_string(), "=".to_string()];
    let mut iter = SliceIterator::new(tokens);
    iter.save();
    assert_eq!(iter.next_item().unwrap(), "let");
    iter.revert().unwrap();
    assert_eq!(iter.peek().unwrap(), "let");
}
