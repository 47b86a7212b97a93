//! Domain invariants for Lecture Ordering
//!
//! INVARIANT-1 (Contiguous Order): for a section with N lectures the
//! multiset of `order` values is exactly `{0, 1, ..., N-1}`.

use super::entities::OrderViolation;
use shared_types::Lecture;
use std::collections::BTreeMap;

/// Inspect a section's order values and describe any deviation from `0..N`.
///
/// Returns `None` when the numbering is contiguous, zero-based and
/// duplicate-free.
pub fn find_order_violation<I>(orders: I) -> Option<OrderViolation>
where
    I: IntoIterator<Item = u32>,
{
    let mut histogram: BTreeMap<u32, u32> = BTreeMap::new();
    let mut count: u32 = 0;
    for order in orders {
        *histogram.entry(order).or_default() += 1;
        count += 1;
    }

    let missing: Vec<u32> = (0..count).filter(|o| !histogram.contains_key(o)).collect();
    let duplicated: Vec<u32> = histogram
        .iter()
        .filter(|(_, seen)| **seen > 1)
        .map(|(order, _)| *order)
        .collect();
    let out_of_range: Vec<u32> = histogram.range(count..).map(|(order, _)| *order).collect();

    if missing.is_empty() && duplicated.is_empty() && out_of_range.is_empty() {
        return None;
    }

    Some(OrderViolation {
        lecture_count: count,
        missing,
        duplicated,
        out_of_range,
    })
}

/// INVARIANT-1 over one section's lectures (any iteration order).
pub fn invariant_contiguous_order(lectures: &[Lecture]) -> bool {
    find_order_violation(lectures.iter().map(|l| l.order)).is_none()
}

/// A `list_ordered` result must read `0, 1, 2, ...` front to back.
pub fn invariant_listed_sequence(listed: &[Lecture]) -> bool {
    listed
        .iter()
        .enumerate()
        .all(|(index, lecture)| lecture.order as usize == index)
}
