//! Demonstrates backtracking iteration: scans a line of text for signed
//! integers, reverting after every failed attempt, while a pivot chain
//! counts how often each position was visited.

use revertible_iteration::{PivotIterator, RevertibleIterator, TextIterator};

const INPUT: &str = "x = -42 + 17a - -3; y += 8";

fn main() {
    let mut chars = PivotIterator::new(TextIterator::new(INPUT), |_| 0u32);
    let mut numbers: Vec<i64> = Vec::new();

    while chars.has_next() {
        *chars.here().unwrap() += 1;
        chars.save();
        match try_signed_integer(&mut chars) {
            Some(value) => {
                chars.remove_save().unwrap();
                numbers.push(value);
            }
            None => {
                chars.revert().unwrap();
                chars.advance(1).unwrap();
            }
        }
    }

    println!("input:   {INPUT}");
    println!("numbers: {numbers:?}");

    let revisited: Vec<(usize, u32)> = chars
        .pivots()
        .into_iter()
        .filter(|&(_, visits)| visits > 1)
        .collect();
    println!("positions visited more than once: {revisited:?}");
}

/// Consumes an optional sign followed by at least one digit. Leaves the
/// cursor wherever it ran out of digits; the caller reverts on failure.
fn try_signed_integer<I>(chars: &mut I) -> Option<i64>
where
    I: RevertibleIterator<Item = char>,
{
    let mut text = String::new();
    if let Ok(ch) = chars.peek() {
        if ch == '-' || ch == '+' {
            text.push(ch);
            chars.advance(1).ok()?;
        }
    }
    let mut digits = 0;
    while let Ok(ch) = chars.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        text.push(ch);
        chars.advance(1).ok()?;
        digits += 1;
    }
    if digits == 0 {
        return None;
    }
    text.parse().ok()
}
