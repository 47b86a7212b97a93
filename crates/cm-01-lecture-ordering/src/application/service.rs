//! Lecture Ordering Service
//!
//! Main service implementing `LectureOrderingApi`.

use crate::adapters::locks::{HeldLocks, KeyedLocks};
use crate::algorithms::{
    plan_append, plan_move_across_sections, plan_move_within_section, plan_removal, renumber,
};
use crate::config::OrderingConfig;
use crate::domain::entities::{JournalRecord, MovePlan, PlanStep, ReconcileReport};
use crate::domain::errors::{OrderingError, StoreError, ValidationError};
use crate::domain::invariants::find_order_violation;
use crate::domain::value_objects::{
    validate_lecture_data, CrossSectionMove, LectureUpdate, WithinSectionMove,
};
use crate::ports::inbound::LectureOrderingApi;
use crate::ports::outbound::{ItemStore, MoveJournal};
use async_trait::async_trait;
use shared_types::{CourseId, Lecture, LectureData, LectureId, Section, SectionData, SectionId};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Attempts to pin down a lecture's section before removing it.
const REMOVE_ATTEMPTS: usize = 3;

/// Lecture Ordering Service
///
/// Every write operation runs the same pipeline:
/// 1. Acquire the section lock(s)
/// 2. Validate the request against current store contents
/// 3. Plan the range shifts and the positional write
/// 4. Execute the plan step by step, journaling progress
pub struct LectureOrderingService<S: ItemStore, J: MoveJournal> {
    store: Arc<S>,
    journal: Arc<J>,
    config: OrderingConfig,
    section_locks: KeyedLocks<SectionId>,
    course_locks: KeyedLocks<CourseId>,
}

impl<S: ItemStore, J: MoveJournal> LectureOrderingService<S, J> {
    /// Create a new service with default config
    pub fn new(store: Arc<S>, journal: Arc<J>) -> Self {
        Self::with_config(store, journal, OrderingConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(store: Arc<S>, journal: Arc<J>, config: OrderingConfig) -> Self {
        Self {
            store,
            journal,
            config,
            section_locks: KeyedLocks::new(),
            course_locks: KeyedLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn journal(&self) -> &Arc<J> {
        &self.journal
    }

    pub fn config(&self) -> &OrderingConfig {
        &self.config
    }

    /// Bound one store (or journal) call by `store_timeout_ms`.
    async fn call<T, F>(&self, operation: &'static str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.config.store_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                operation,
                timeout_ms: self.config.store_timeout_ms,
            }),
        }
    }

    async fn lock_sections(&self, sections: &[SectionId]) -> Result<HeldLocks, OrderingError> {
        if !self.config.serialize_writes {
            return Ok(HeldLocks::none());
        }
        self.section_locks
            .acquire_many(sections, self.config.lock_timeout())
            .await
    }

    async fn require_section(&self, section_id: SectionId) -> Result<Section, OrderingError> {
        self.call("get_section", self.store.get_section(section_id))
            .await?
            .ok_or(OrderingError::SectionNotFound(section_id))
    }

    async fn require_lecture(&self, lecture_id: LectureId) -> Result<Lecture, OrderingError> {
        self.call("get_lecture", self.store.get_lecture(lecture_id))
            .await?
            .ok_or(OrderingError::LectureNotFound(lecture_id))
    }

    async fn count(&self, section_id: SectionId) -> Result<u32, OrderingError> {
        Ok(self
            .call("count_lectures", self.store.count_lectures(section_id))
            .await?)
    }

    /// Reject a move whose `from` no longer matches where the lecture sits.
    fn check_occupies(
        lecture: &Lecture,
        section_id: SectionId,
        from: u32,
    ) -> Result<(), ValidationError> {
        if lecture.section_id != section_id || lecture.order != from {
            return Err(ValidationError::StalePosition {
                lecture_id: lecture.id,
                section_id,
                expected: from,
            });
        }
        Ok(())
    }

    fn check_capacity(&self, section_id: SectionId, count: u32) -> Result<(), ValidationError> {
        if count >= self.config.max_lectures_per_section {
            return Err(ValidationError::SectionFull {
                section_id,
                max: self.config.max_lectures_per_section,
            });
        }
        Ok(())
    }

    async fn apply_step(&self, step: &PlanStep) -> Result<Option<Lecture>, OrderingError> {
        match step {
            PlanStep::Shift(shift) => {
                let matched = self
                    .call("shift_range", self.store.shift_range(shift))
                    .await?;
                debug!(
                    section_id = %shift.section_id,
                    range = %shift.range,
                    delta = shift.delta,
                    matched,
                    "[cm-01] range shifted"
                );
                Ok(None)
            }
            PlanStep::Place(placement) => self
                .call("set_position", self.store.set_position(placement))
                .await?
                .map(Some)
                .ok_or(OrderingError::LectureNotFound(placement.lecture_id)),
            PlanStep::Insert(lecture) => {
                self.call("insert_lecture", self.store.insert_lecture(lecture))
                    .await?;
                Ok(Some(lecture.clone()))
            }
            PlanStep::Delete(lecture_id) => self
                .call("delete_lecture", self.store.delete_lecture(*lecture_id))
                .await?
                .map(Some)
                .ok_or(OrderingError::LectureNotFound(*lecture_id)),
        }
    }

    /// Issue a plan's steps in order.
    ///
    /// Multi-step plans are journaled: the record is opened before the first
    /// write and closed after the last. A failing step aborts the rest and
    /// leaves the record (and whatever was applied) in place.
    async fn execute(
        &self,
        plan: MovePlan,
        sections: Vec<SectionId>,
    ) -> Result<Option<Lecture>, OrderingError> {
        let record_id = if self.config.journal_enabled && plan.steps.len() > 1 {
            let record = JournalRecord::open(&plan, sections);
            self.call("journal_open", self.journal.open(&record)).await?;
            Some(record.id)
        } else {
            None
        };

        let mut outcome = None;
        for (index, step) in plan.steps.iter().enumerate() {
            match self.apply_step(step).await {
                Ok(result) => {
                    if result.is_some() {
                        outcome = result;
                    }
                }
                Err(err) => {
                    error!(
                        kind = %plan.kind,
                        step = step.name(),
                        applied = index,
                        error = %err,
                        "[cm-01] operation aborted, applied steps are not rolled back"
                    );
                    if let Some(id) = record_id {
                        let failure = err.to_string();
                        if let Err(journal_err) = self
                            .call("journal_mark_failed", self.journal.mark_failed(id, &failure))
                            .await
                        {
                            warn!(
                                journal_id = %id,
                                error = %journal_err,
                                "[cm-01] could not record failure"
                            );
                        }
                    }
                    return Err(err);
                }
            }

            if let Some(id) = record_id {
                self.call("journal_mark_applied", self.journal.mark_applied(id, index + 1))
                    .await?;
            }
        }

        if let Some(id) = record_id {
            self.call("journal_close", self.journal.close(id)).await?;
        }
        Ok(outcome)
    }

    /// Renumber one section. Caller holds the section lock.
    async fn reconcile_locked(
        &self,
        section_id: SectionId,
    ) -> Result<ReconcileReport, OrderingError> {
        let lectures = self
            .call("list_lectures", self.store.list_lectures(section_id))
            .await?;

        let Some(violation) = find_order_violation(lectures.iter().map(|l| l.order)) else {
            return Ok(ReconcileReport::clean(section_id));
        };

        warn!(
            section_id = %section_id,
            missing = ?violation.missing,
            duplicated = ?violation.duplicated,
            out_of_range = ?violation.out_of_range,
            "[cm-01] order violation found, renumbering"
        );

        let placements = renumber(&lectures);
        self.call("set_positions", self.store.set_positions(&placements))
            .await?;

        info!(
            section_id = %section_id,
            renumbered = placements.len(),
            "[cm-01] section repaired"
        );
        Ok(ReconcileReport {
            section_id,
            violation: Some(violation),
            renumbered: placements.len(),
        })
    }

    /// Repair every section of one journal record, then close it.
    ///
    /// Reports for sections already renumbered are pushed even if a later
    /// section or the close fails; the record then stays pending.
    async fn reconcile_record(
        &self,
        record: &JournalRecord,
        reports: &mut Vec<ReconcileReport>,
    ) -> Result<(), OrderingError> {
        let _locks = self.lock_sections(&record.sections).await?;

        // The owning operation may have finished while we waited.
        if self
            .call("journal_get", self.journal.get(record.id))
            .await?
            .is_none()
        {
            return Ok(());
        }

        for section_id in &record.sections {
            reports.push(self.reconcile_locked(*section_id).await?);
        }

        self.call("journal_close", self.journal.close(record.id))
            .await?;
        debug!(
            journal_id = %record.id,
            kind = %record.kind,
            applied = record.applied,
            steps = record.steps.len(),
            "[cm-01] journal record resolved"
        );
        Ok(())
    }
}

#[async_trait]
impl<S: ItemStore, J: MoveJournal> LectureOrderingApi for LectureOrderingService<S, J> {
    async fn move_within_section(&self, mv: WithinSectionMove) -> Result<Lecture, OrderingError> {
        let _locks = self.lock_sections(&[mv.section_id]).await?;

        self.require_section(mv.section_id).await?;
        let count = self.count(mv.section_id).await?;
        for position in [mv.from, mv.to] {
            if position.get() >= count {
                return Err(ValidationError::OutOfRange {
                    section_id: mv.section_id,
                    position: position.get(),
                    count,
                }
                .into());
            }
        }
        let lecture = self.require_lecture(mv.lecture_id).await?;
        Self::check_occupies(&lecture, mv.section_id, mv.from.get())?;

        let plan = plan_move_within_section(&mv);
        let moved = self
            .execute(plan, vec![mv.section_id])
            .await?
            .ok_or(OrderingError::LectureNotFound(mv.lecture_id))?;

        info!(
            section_id = %mv.section_id,
            lecture_id = %mv.lecture_id,
            from = mv.from.get(),
            to = mv.to.get(),
            "[cm-01] lecture moved within section"
        );
        Ok(moved)
    }

    async fn move_across_sections(&self, mv: CrossSectionMove) -> Result<Lecture, OrderingError> {
        let _locks = self
            .lock_sections(&[mv.from_section, mv.to_section])
            .await?;

        let source = self.require_section(mv.from_section).await?;
        let destination = self.require_section(mv.to_section).await?;
        if source.course_id != destination.course_id {
            return Err(ValidationError::CrossCourseMove {
                from: mv.from_section,
                to: mv.to_section,
            }
            .into());
        }

        let source_count = self.count(mv.from_section).await?;
        if mv.from.get() >= source_count {
            return Err(ValidationError::OutOfRange {
                section_id: mv.from_section,
                position: mv.from.get(),
                count: source_count,
            }
            .into());
        }
        let destination_count = self.count(mv.to_section).await?;
        // `to == count` appends at the destination tail.
        if mv.to.get() > destination_count {
            return Err(ValidationError::OutOfRange {
                section_id: mv.to_section,
                position: mv.to.get(),
                count: destination_count,
            }
            .into());
        }
        self.check_capacity(mv.to_section, destination_count)?;

        let lecture = self.require_lecture(mv.lecture_id).await?;
        Self::check_occupies(&lecture, mv.from_section, mv.from.get())?;

        let plan = plan_move_across_sections(&mv);
        let moved = self
            .execute(plan, vec![mv.from_section, mv.to_section])
            .await?
            .ok_or(OrderingError::LectureNotFound(mv.lecture_id))?;

        info!(
            lecture_id = %mv.lecture_id,
            from_section = %mv.from_section,
            to_section = %mv.to_section,
            from = mv.from.get(),
            to = mv.to.get(),
            "[cm-01] lecture moved across sections"
        );
        Ok(moved)
    }

    async fn append_lecture(
        &self,
        section_id: SectionId,
        data: LectureData,
    ) -> Result<Lecture, OrderingError> {
        validate_lecture_data(&data)?;
        let _locks = self.lock_sections(&[section_id]).await?;

        let section = self.require_section(section_id).await?;
        let count = self.count(section_id).await?;
        self.check_capacity(section_id, count)?;

        let lecture = Lecture::new(section.course_id, section_id, count, data);
        let lecture_id = lecture.id;
        let created = self
            .execute(plan_append(lecture), vec![section_id])
            .await?
            .ok_or(OrderingError::LectureNotFound(lecture_id))?;

        info!(
            section_id = %section_id,
            lecture_id = %created.id,
            order = created.order,
            "[cm-01] lecture appended"
        );
        Ok(created)
    }

    async fn list_ordered(&self, section_id: SectionId) -> Result<Vec<Lecture>, OrderingError> {
        self.require_section(section_id).await?;
        let mut lectures = self
            .call("list_lectures", self.store.list_lectures(section_id))
            .await?;
        lectures.sort_by_key(|lecture| (lecture.order, lecture.id));
        Ok(lectures)
    }

    async fn remove_lecture(&self, lecture_id: LectureId) -> Result<Lecture, OrderingError> {
        let mut section_id = self.require_lecture(lecture_id).await?.section_id;

        for _ in 0..REMOVE_ATTEMPTS {
            let _locks = self.lock_sections(&[section_id]).await?;
            // A cross-section move may have completed before the lock was taken.
            let lecture = self.require_lecture(lecture_id).await?;
            if lecture.section_id != section_id {
                section_id = lecture.section_id;
                continue;
            }

            let removed = self
                .execute(plan_removal(&lecture), vec![section_id])
                .await?
                .ok_or(OrderingError::LectureNotFound(lecture_id))?;

            info!(
                section_id = %section_id,
                lecture_id = %lecture_id,
                order = removed.order,
                "[cm-01] lecture removed"
            );
            return Ok(removed);
        }

        Err(StoreError::Unavailable(format!(
            "lecture {lecture_id} kept changing sections during removal"
        ))
        .into())
    }

    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Lecture, OrderingError> {
        self.require_lecture(lecture_id).await
    }

    async fn update_lecture_details(
        &self,
        lecture_id: LectureId,
        data: LectureData,
    ) -> Result<Lecture, OrderingError> {
        validate_lecture_data(&data)?;
        let updated = self
            .call(
                "update_lecture",
                self.store
                    .update_lecture(lecture_id, &LectureUpdate::Details(data)),
            )
            .await?
            .ok_or(OrderingError::LectureNotFound(lecture_id))?;
        debug!(lecture_id = %lecture_id, "[cm-01] lecture details updated");
        Ok(updated)
    }

    async fn mark_processed(
        &self,
        lecture_id: LectureId,
        media_ref: String,
    ) -> Result<Lecture, OrderingError> {
        if media_ref.trim().is_empty() {
            return Err(
                ValidationError::InvalidLectureData("processed media ref is empty".into()).into(),
            );
        }
        let updated = self
            .call(
                "update_lecture",
                self.store
                    .update_lecture(lecture_id, &LectureUpdate::Processed { media_ref }),
            )
            .await?
            .ok_or(OrderingError::LectureNotFound(lecture_id))?;
        info!(
            lecture_id = %lecture_id,
            media_ref = %updated.media_ref,
            "[cm-01] lecture marked processed"
        );
        Ok(updated)
    }

    async fn append_section(
        &self,
        course_id: CourseId,
        data: SectionData,
    ) -> Result<Section, OrderingError> {
        if data.title.trim().is_empty() {
            return Err(ValidationError::InvalidSectionData("title is empty".into()).into());
        }

        let _lock = if self.config.serialize_writes {
            self.course_locks
                .acquire(course_id, self.config.lock_timeout())
                .await?
        } else {
            HeldLocks::none()
        };

        let existing = self
            .call("list_sections", self.store.list_sections(course_id))
            .await?;
        let section = Section {
            id: SectionId::new(),
            course_id,
            title: data.title,
            description: data.description,
            order: existing.len() as u32,
        };
        self.call("insert_section", self.store.insert_section(&section))
            .await?;

        info!(
            course_id = %course_id,
            section_id = %section.id,
            order = section.order,
            "[cm-01] section appended"
        );
        Ok(section)
    }

    async fn get_section(&self, section_id: SectionId) -> Result<Section, OrderingError> {
        self.require_section(section_id).await
    }

    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, OrderingError> {
        let mut sections = self
            .call("list_sections", self.store.list_sections(course_id))
            .await?;
        sections.sort_by_key(|section| (section.order, section.id));
        Ok(sections)
    }

    async fn reconcile_section(
        &self,
        section_id: SectionId,
    ) -> Result<ReconcileReport, OrderingError> {
        let _locks = self.lock_sections(&[section_id]).await?;
        self.require_section(section_id).await?;
        self.reconcile_locked(section_id).await
    }

    async fn reconcile_pending(&self) -> Result<Vec<ReconcileReport>, OrderingError> {
        let pending = self.call("journal_pending", self.journal.pending()).await?;
        if pending.is_empty() {
            return Ok(Vec::new());
        }
        info!(records = pending.len(), "[cm-01] reconciling unfinished operations");

        let mut reports = Vec::new();
        for record in &pending {
            // One busy or unreadable record must not stall the rest.
            if let Err(err) = self.reconcile_record(record, &mut reports).await {
                warn!(
                    journal_id = %record.id,
                    sections = ?record.sections,
                    error = %err,
                    "[cm-01] reconciliation failed, record kept"
                );
            }
        }
        Ok(reports)
    }
}
