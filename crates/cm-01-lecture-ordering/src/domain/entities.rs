//! Domain entities for Lecture Ordering
//!
//! A `MovePlan` is the ordered list of store writes one engine operation
//! issues. The same plan is persisted in a `JournalRecord` so an interrupted
//! operation can be found and repaired later.

use super::value_objects::{JournalId, Placement, RangeShift};
use serde::{Deserialize, Serialize};
use shared_types::{Lecture, LectureId, SectionId};
use std::fmt;

/// Engine operation that produced a plan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    MoveWithinSection,
    MoveAcrossSections,
    Append,
    Remove,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::MoveWithinSection => "move_within_section",
            OperationKind::MoveAcrossSections => "move_across_sections",
            OperationKind::Append => "append",
            OperationKind::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// A single independent write against the Item Store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStep {
    /// Range-shift update.
    Shift(RangeShift),
    /// Positional write of one lecture (section and order).
    Place(Placement),
    /// New lecture document.
    Insert(Lecture),
    /// Lecture document removal.
    Delete(LectureId),
}

impl PlanStep {
    pub fn name(&self) -> &'static str {
        match self {
            PlanStep::Shift(_) => "shift_range",
            PlanStep::Place(_) => "set_position",
            PlanStep::Insert(_) => "insert_lecture",
            PlanStep::Delete(_) => "delete_lecture",
        }
    }
}

/// Ordered store writes for one engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    pub kind: OperationKind,
    pub steps: Vec<PlanStep>,
}

impl MovePlan {
    pub fn new(kind: OperationKind, steps: Vec<PlanStep>) -> Self {
        Self { kind, steps }
    }

    /// Sections whose numbering any step of this plan touches (deduplicated,
    /// in first-touched order).
    pub fn touched_sections(&self) -> Vec<SectionId> {
        let mut sections = Vec::new();
        for step in &self.steps {
            let section = match step {
                PlanStep::Shift(shift) => Some(shift.section_id),
                PlanStep::Place(placement) => Some(placement.section_id),
                PlanStep::Insert(lecture) => Some(lecture.section_id),
                PlanStep::Delete(_) => None,
            };
            if let Some(section) = section {
                if !sections.contains(&section) {
                    sections.push(section);
                }
            }
        }
        sections
    }

    pub fn shift_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, PlanStep::Shift(_)))
            .count()
    }
}

/// Persistent trace of an in-flight operation.
///
/// Written before the first step, advanced after each applied step and
/// removed once the operation completes. A record that outlives its
/// operation marks sections that may hold a partial shift.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub id: JournalId,
    pub kind: OperationKind,
    /// Sections to reconcile if the operation never completes.
    pub sections: Vec<SectionId>,
    pub steps: Vec<PlanStep>,
    /// Number of steps confirmed applied.
    pub applied: usize,
    /// Store error that aborted the operation, if one was observed.
    pub failure: Option<String>,
}

impl JournalRecord {
    pub fn open(plan: &MovePlan, sections: Vec<SectionId>) -> Self {
        Self {
            id: JournalId::new(),
            kind: plan.kind,
            sections,
            steps: plan.steps.clone(),
            applied: 0,
            failure: None,
        }
    }

    /// True when some but not all steps were applied.
    pub fn is_partial(&self) -> bool {
        self.applied > 0 && self.applied < self.steps.len()
    }
}

/// Deviation of one section's numbering from `0..N`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderViolation {
    pub lecture_count: u32,
    /// Values in `0..N` no lecture holds.
    pub missing: Vec<u32>,
    /// Values held by more than one lecture.
    pub duplicated: Vec<u32>,
    /// Values `>= N`.
    pub out_of_range: Vec<u32>,
}

/// Outcome of reconciling one section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub section_id: SectionId,
    /// Violation found before repair; `None` means the section was clean.
    pub violation: Option<OrderViolation>,
    /// Lectures whose order was rewritten.
    pub renumbered: usize,
}

impl ReconcileReport {
    pub fn clean(section_id: SectionId) -> Self {
        Self {
            section_id,
            violation: None,
            renumbered: 0,
        }
    }

    pub fn was_repaired(&self) -> bool {
        self.violation.is_some()
    }
}
