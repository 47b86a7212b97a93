//! Renumbering for reconciliation
//!
//! Repairs a section whose numbering was left non-contiguous by an
//! interrupted operation. Relative order is preserved; ties (duplicated
//! values) are broken by lecture id so repeated runs agree.

use crate::domain::value_objects::Placement;
use shared_types::Lecture;

/// Compute the positional writes that bring `lectures` (one section) back to
/// `0..N`. Lectures already at their target position are skipped.
pub fn renumber(lectures: &[Lecture]) -> Vec<Placement> {
    let mut sorted: Vec<&Lecture> = lectures.iter().collect();
    sorted.sort_by_key(|lecture| (lecture.order, lecture.id));

    sorted
        .into_iter()
        .enumerate()
        .filter(|(target, lecture)| lecture.order as usize != *target)
        .map(|(target, lecture)| Placement {
            lecture_id: lecture.id,
            section_id: lecture.section_id,
            order: target as u32,
        })
        .collect()
}
