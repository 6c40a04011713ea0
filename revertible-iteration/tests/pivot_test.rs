//! Pivot iterator tests: lazily-created per-position values that
//! survive backtracking.

use std::io;
use std::sync::Arc;

use revertible_iteration::{
    PivotChain, PivotIterator, RevertibleIterator, SliceIterator, SourceIterator, TextIterator,
};

const TEST_STRING: &str = "A3Z8q9B5C2";

fn counter_pivots(text: &str) -> PivotIterator<TextIterator, Vec<i32>, impl Fn(&usize) -> Vec<i32>> {
    PivotIterator::new(TextIterator::new(text), |_| vec![0])
}

#[test]
fn test_scenario_counters_in_ascending_order() {
    let mut iter = counter_pivots(TEST_STRING);
    iter.save();
    iter.here().unwrap()[0] = 10; // position 0
    iter.advance(2).unwrap();
    iter.here().unwrap(); // auto-created at position 2, default 0
    iter.advance(5).unwrap();
    iter.here().unwrap()[0] = 17; // position 7
    iter.revert().unwrap(); // back to 0
    iter.advance(1).unwrap();
    iter.here().unwrap()[0] = 11; // position 1

    let (positions, values): (Vec<usize>, Vec<Vec<i32>>) =
        iter.pivots().into_iter().unzip();
    assert_eq!(positions, vec![0, 1, 2, 7]);
    assert_eq!(values, vec![vec![10], vec![11], vec![0], vec![17]]);
}

#[test]
fn test_pivoting_with_interleaved_reverts() {
    let mut iter = counter_pivots(TEST_STRING);
    iter.save();
    iter.save();
    iter.save();
    iter.next_item().unwrap(); // to 1
    iter.remove_save().unwrap();
    iter.next_item().unwrap(); // to 2
    iter.here().unwrap()[0] = 12;
    iter.revert().unwrap(); // to 0
    iter.advance(2).unwrap(); // to 2
    assert_eq!(iter.here().unwrap()[0], 12); // value survived the revert
    iter.revert().unwrap(); // to 0
    iter.save();
    iter.here().unwrap()[0] = 10;
    iter.advance(7).unwrap(); // to 7
    iter.here().unwrap()[0] = 17;
    iter.next_item().unwrap(); // to 8
    iter.here().unwrap(); // initialize 8
    iter.revert().unwrap(); // to 0
    iter.advance(1).unwrap(); // to 1
    iter.here().unwrap()[0] = 11;

    let values: Vec<i32> = iter.pivots().into_iter().map(|(_, v)| v[0]).collect();
    assert_eq!(values, vec![10, 11, 12, 17, 0]);
}

#[test]
fn test_here_is_idempotent_per_position() {
    let mut iter = counter_pivots("abc");
    iter.here().unwrap()[0] = 5;
    assert_eq!(iter.here().unwrap()[0], 5);
    assert_eq!(iter.pivots().len(), 1);
}

#[test]
fn test_factory_receives_the_position() {
    let mut iter = PivotIterator::new(TextIterator::new("abcdef"), |p: &usize| *p * 10);
    iter.advance(3).unwrap();
    assert_eq!(*iter.here().unwrap(), 30);
    iter.advance(2).unwrap();
    assert_eq!(*iter.here().unwrap(), 50);
}

#[test]
fn test_forwarded_operations_behave_like_the_inner_iterator() {
    let elements: Vec<char> = TEST_STRING.chars().collect();
    let mut iter = PivotIterator::new(SliceIterator::new(elements.clone()), |_| 0u8);
    iter.save();
    iter.advance(7).unwrap();
    assert_eq!(iter.next_item().unwrap(), 'B');
    iter.revert().unwrap();
    assert_eq!(iter.next_item().unwrap(), 'A');
    let rest: Vec<char> = iter.collect();
    assert_eq!(rest, elements[1..].to_vec());
}

#[test]
fn test_shared_chain_between_iterators() {
    let chain: PivotChain<usize, i32> = PivotChain::new();
    let text: Arc<str> = Arc::from("abc");

    let mut first =
        PivotIterator::with_chain(TextIterator::with_arc(Arc::clone(&text)), chain.clone(), |_| 0);
    *first.here().unwrap() = 41;

    let mut second =
        PivotIterator::with_chain(TextIterator::with_arc(text), chain.clone(), |_| 0);
    // The second pass observes the first pass's value, no re-creation.
    assert_eq!(*second.here().unwrap(), 41);
    *second.here().unwrap() += 1;
    assert_eq!(*first.here().unwrap(), 42);
    assert_eq!(chain.len(), 1);
}

#[test]
fn test_pivoting_over_streaming_source() {
    let mut iter = PivotIterator::new(
        SourceIterator::new(io::Cursor::new(b"ab\ncd".to_vec())),
        |_| vec![0],
    );
    iter.save();
    iter.here().unwrap()[0] = 1; // (0, 0)
    iter.advance(3).unwrap();
    iter.here().unwrap()[0] = 4; // (1, 0)
    iter.revert().unwrap();
    iter.advance(2).unwrap();
    iter.here().unwrap()[0] = 3; // (0, 2), the newline slot

    let values: Vec<i32> = iter.pivots().into_iter().map(|(_, v)| v[0]).collect();
    assert_eq!(values, vec![1, 3, 4]);
}

#[test]
fn test_pivots_walk_is_ascending_after_arbitrary_jumps() {
    let mut iter = counter_pivots("0123456789");
    for target in [9isize, 0, 5, 2, 7, 1] {
        iter.save();
        iter.advance(target).unwrap();
        iter.here().unwrap();
        iter.revert().unwrap();
    }
    let positions: Vec<usize> = iter.pivots().into_iter().map(|(p, _)| p).collect();
    assert_eq!(positions, vec![0, 1, 2, 5, 7, 9]);
}
