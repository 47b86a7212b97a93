//! Shift Planner
//!
//! Translates a validated request into the minimal ordered sequence of
//! range shifts plus one positional write (single-hole shift).
//!
//! Step order per operation:
//!
//! | Operation | Steps |
//! |-----------|-------|
//! | within, `from > to` | shift `[to, from-1]` by +1, place at `to` |
//! | within, `from < to` | shift `[from+1, to]` by -1, place at `to` |
//! | across | compact source `[from+1, ∞)` by -1, open destination `[to, ∞)` by +1, place |
//! | append | insert at tail |
//! | remove | delete, compact `[order+1, ∞)` by -1 |
//!
//! The shift ranges never contain the moved lecture's own slot, so the shift
//! and the final write never race over the same document.

use crate::domain::entities::{MovePlan, OperationKind, PlanStep};
use crate::domain::value_objects::{
    CrossSectionMove, OrderRange, Placement, RangeShift, WithinSectionMove,
};
use shared_types::Lecture;

/// Plan a same-section reorder.
pub fn plan_move_within_section(mv: &WithinSectionMove) -> MovePlan {
    let from = mv.from.get();
    let to = mv.to.get();

    let shift = if from > to {
        // Moving earlier: open a hole at `to` by pushing [to, from) right.
        RangeShift {
            section_id: mv.section_id,
            range: OrderRange::between(to, from - 1),
            delta: 1,
        }
    } else {
        // Moving later: close the hole at `from` by pulling (from, to] left.
        RangeShift {
            section_id: mv.section_id,
            range: OrderRange::between(from + 1, to),
            delta: -1,
        }
    };

    MovePlan::new(
        OperationKind::MoveWithinSection,
        vec![
            PlanStep::Shift(shift),
            PlanStep::Place(Placement {
                lecture_id: mv.lecture_id,
                section_id: mv.section_id,
                order: to,
            }),
        ],
    )
}

/// Plan a move into another section.
///
/// Both predicates are keyed on the real section ids: source compaction
/// first, destination expansion second, reassignment last.
pub fn plan_move_across_sections(mv: &CrossSectionMove) -> MovePlan {
    MovePlan::new(
        OperationKind::MoveAcrossSections,
        vec![
            PlanStep::Shift(RangeShift {
                section_id: mv.from_section,
                range: OrderRange::at_least(mv.from.get() + 1),
                delta: -1,
            }),
            PlanStep::Shift(RangeShift {
                section_id: mv.to_section,
                range: OrderRange::at_least(mv.to.get()),
                delta: 1,
            }),
            PlanStep::Place(Placement {
                lecture_id: mv.lecture_id,
                section_id: mv.to_section,
                order: mv.to.get(),
            }),
        ],
    )
}

/// Plan a tail insert. `lecture.order` must already equal the section count.
pub fn plan_append(lecture: Lecture) -> MovePlan {
    MovePlan::new(OperationKind::Append, vec![PlanStep::Insert(lecture)])
}

/// Plan a removal. Deleting first means an interruption leaves a gap, never
/// a duplicate.
pub fn plan_removal(lecture: &Lecture) -> MovePlan {
    MovePlan::new(
        OperationKind::Remove,
        vec![
            PlanStep::Delete(lecture.id),
            PlanStep::Shift(RangeShift {
                section_id: lecture.section_id,
                range: OrderRange::at_least(lecture.order + 1),
                delta: -1,
            }),
        ],
    )
}
