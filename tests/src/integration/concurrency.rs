//! # Concurrent Ordering
//!
//! Interleavings that corrupt a section when writers are not serialized,
//! and the same interleavings with per-section locking enabled.
//!
//! ## Scenario (A0 B1 C2 D3):
//!
//! 1. Move A 0 → 2 applies its shift, then stalls before placing A
//! 2. Move D 3 → 0 runs
//! 3. Move A resumes and places A at 2
//!
//! Unserialized, step 2 shifts the half-moved section and the result holds
//! a duplicate 2 and no 3. Serialized, step 2 waits for step 1 to finish.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use cm_01_lecture_ordering::test_utils::{
        ids, lecture_data, memory_service, seed_section, GatedItemStore, MemoryOrderingService,
    };
    use cm_01_lecture_ordering::{
        find_order_violation, invariant_contiguous_order, CrossSectionMove, InMemoryItemStore,
        InMemoryKVStore, KvMoveJournal, LectureOrderingApi, LectureOrderingService, OrderViolation,
        OrderingConfig, OrderingError, Position, ValidationError, WithinSectionMove,
    };
    use shared_types::{CourseId, Lecture, LectureId, SectionId};

    type GatedService =
        LectureOrderingService<GatedItemStore<InMemoryItemStore>, KvMoveJournal<InMemoryKVStore>>;

    fn gated_service(
        serialize_writes: bool,
    ) -> (Arc<GatedService>, Arc<GatedItemStore<InMemoryItemStore>>) {
        let store = Arc::new(GatedItemStore::new(Arc::new(InMemoryItemStore::new())));
        let service = LectureOrderingService::with_config(
            Arc::clone(&store),
            Arc::new(KvMoveJournal::in_memory()),
            OrderingConfig {
                serialize_writes,
                ..OrderingConfig::default()
            },
        );
        (Arc::new(service), store)
    }

    fn within(section: SectionId, lecture: &Lecture, from: u32, to: u32) -> WithinSectionMove {
        WithinSectionMove::new(section, lecture.id, Position::new(from), Position::new(to))
            .unwrap()
    }

    /// Runs the scenario and returns the section as listed afterwards.
    async fn run_interleaving(serialize_writes: bool) -> (Vec<Lecture>, Vec<Lecture>) {
        let (service, store) = gated_service(serialize_writes);
        let (section, seeded) = seed_section(service.as_ref(), CourseId::new(), "Race", 4)
            .await
            .unwrap();

        store.arm();
        let first = {
            let service = Arc::clone(&service);
            let mv = within(section.id, &seeded[0], 0, 2);
            tokio::spawn(async move { service.move_within_section(mv).await })
        };
        store.wait_until_paused().await;

        let mut second = {
            let service = Arc::clone(&service);
            let mv = within(section.id, &seeded[3], 3, 0);
            tokio::spawn(async move { service.move_within_section(mv).await })
        };
        let second_result = if serialize_writes {
            // The parked move holds the section lock until released.
            assert!(
                tokio::time::timeout(Duration::from_millis(50), &mut second)
                    .await
                    .is_err(),
                "second move ran while the section was locked"
            );
            store.release();
            second.await
        } else {
            // Unguarded, the second move completes against the half-moved section.
            let result = second.await;
            store.release();
            result
        };

        first.await.unwrap().unwrap();
        second_result.unwrap().unwrap();

        let listed = service.list_ordered(section.id).await.unwrap();
        (seeded, listed)
    }

    fn is_stale(err: &OrderingError) -> bool {
        matches!(
            err,
            OrderingError::Validation(
                ValidationError::StalePosition { .. } | ValidationError::OutOfRange { .. }
            )
        )
    }

    /// Move `lecture_id` to the front of the other section `times` times,
    /// re-reading its position whenever another task got there first.
    async fn bounce(
        service: &MemoryOrderingService,
        lecture_id: LectureId,
        left: SectionId,
        right: SectionId,
        times: usize,
    ) -> Result<(), OrderingError> {
        let mut moved = 0;
        while moved < times {
            let current = service.get_lecture(lecture_id).await?;
            let target = if current.section_id == left { right } else { left };
            let mv = CrossSectionMove::new(
                lecture_id,
                current.section_id,
                target,
                Position::new(current.order),
                Position::new(0),
            )?;
            match service.move_across_sections(mv).await {
                Ok(_) => moved += 1,
                Err(err) if is_stale(&err) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Move `lecture_id` to position 0 (or 1 if it is already first).
    async fn nudge_to_front(
        service: &MemoryOrderingService,
        section_id: SectionId,
        lecture_id: LectureId,
    ) -> Result<(), OrderingError> {
        loop {
            let current = service.get_lecture(lecture_id).await?;
            let to = if current.order == 0 { 1 } else { 0 };
            let mv = WithinSectionMove::new(
                section_id,
                lecture_id,
                Position::new(current.order),
                Position::new(to),
            )?;
            match service.move_within_section(mv).await {
                Ok(_) => return Ok(()),
                Err(err) if is_stale(&err) => continue,
                Err(err) => return Err(err),
            }
        }
    }

    #[tokio::test]
    async fn test_unserialized_moves_corrupt_section() {
        let (_, listed) = run_interleaving(false).await;

        let violation = find_order_violation(listed.iter().map(|l| l.order));
        assert_eq!(
            violation,
            Some(OrderViolation {
                lecture_count: 4,
                missing: vec![3],
                duplicated: vec![2],
                out_of_range: vec![],
            })
        );
    }

    #[tokio::test]
    async fn test_serialized_moves_keep_section_contiguous() {
        let (seeded, listed) = run_interleaving(true).await;

        assert!(invariant_contiguous_order(&listed));
        // A 0 → 2 gives B C A D, then D 3 → 0 gives D B C A.
        let expected = vec![seeded[3].id, seeded[1].id, seeded[2].id, seeded[0].id];
        assert_eq!(ids(&listed), expected);
    }

    /// Lectures bounce between two sections from many tasks at once. Locks
    /// are taken in id order, so opposite-direction moves never deadlock.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_opposite_cross_section_moves_do_not_deadlock() {
        let service = Arc::new(memory_service(OrderingConfig::default()));
        let course_id = CourseId::new();
        let (left, left_lectures) = seed_section(service.as_ref(), course_id, "Left", 6)
            .await
            .unwrap();
        let (right, right_lectures) = seed_section(service.as_ref(), course_id, "Right", 6)
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for lecture in left_lectures.iter().chain(right_lectures.iter()) {
            let service = Arc::clone(&service);
            let lecture_id = lecture.id;
            let (left_id, right_id) = (left.id, right.id);
            tasks.push(tokio::spawn(async move {
                bounce(service.as_ref(), lecture_id, left_id, right_id, 3).await
            }));
        }

        let all = async {
            for task in tasks {
                task.await.unwrap().unwrap();
            }
        };
        tokio::time::timeout(Duration::from_secs(10), all)
            .await
            .expect("cross-section moves deadlocked");

        let left_after = service.list_ordered(left.id).await.unwrap();
        let right_after = service.list_ordered(right.id).await.unwrap();
        assert!(invariant_contiguous_order(&left_after));
        assert!(invariant_contiguous_order(&right_after));
        assert_eq!(left_after.len() + right_after.len(), 12);
    }

    /// Appends racing with moves in the same section.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_appends_and_moves_interleave_safely() {
        let service = Arc::new(memory_service(OrderingConfig::default()));
        let (section, seeded) = seed_section(service.as_ref(), CourseId::new(), "Busy", 5)
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for i in 0..10 {
            let service = Arc::clone(&service);
            let section_id = section.id;
            let pinned = seeded[i % seeded.len()].id;
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    service
                        .append_lecture(section_id, lecture_data(&format!("Extra {i}")))
                        .await
                        .map(|_| ())
                } else {
                    nudge_to_front(service.as_ref(), section_id, pinned).await
                }
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let listed = service.list_ordered(section.id).await.unwrap();
        assert_eq!(listed.len(), 10);
        assert!(invariant_contiguous_order(&listed));
    }
}
