//! # Crash Recovery
//!
//! Operations interrupted between store writes leave their section
//! numbering damaged and a journal record behind. Reconciliation must find
//! every such section and renumber it, including after a restart on the
//! file-backed stores.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tempfile::TempDir;

    use cm_01_lecture_ordering::test_utils::{ids, seed_section, FaultyItemStore};
    use cm_01_lecture_ordering::{
        invariant_contiguous_order, CrossSectionMove, FileBackedKVStore, InMemoryItemStore,
        InMemoryKVStore, ItemStore, KvItemStore, KvMoveJournal, LectureOrderingApi,
        LectureOrderingService, MoveJournal, OperationKind, OrderingConfig, OrderingError,
        Position, StoreError, WithinSectionMove,
    };
    use curriculum_runtime::runtime::{ITEMS_FILE, JOURNAL_FILE};
    use curriculum_runtime::{CurriculumRuntime, RuntimeConfig};
    use shared_types::CourseId;

    type FaultyService =
        LectureOrderingService<FaultyItemStore<InMemoryItemStore>, KvMoveJournal<InMemoryKVStore>>;

    fn faulty_service() -> (FaultyService, Arc<FaultyItemStore<InMemoryItemStore>>) {
        let store = Arc::new(FaultyItemStore::new(Arc::new(InMemoryItemStore::new())));
        let service = LectureOrderingService::with_config(
            Arc::clone(&store),
            Arc::new(KvMoveJournal::in_memory()),
            OrderingConfig::default(),
        );
        (service, store)
    }

    fn assert_injected(err: OrderingError) {
        let injected = matches!(
            &err,
            OrderingError::Store(StoreError::Unavailable(message)) if message.contains("injected")
        );
        assert!(injected, "unexpected error: {err}");
    }

    /// Cross-section move dies after both shifts, before the lecture is
    /// reassigned. The source has a duplicate, the destination a gap.
    #[tokio::test]
    async fn test_cross_section_move_interrupted_before_placement() {
        let (service, store) = faulty_service();
        let course_id = CourseId::new();
        let (source, source_lectures) = seed_section(&service, course_id, "Source", 3)
            .await
            .unwrap();
        let (target, _) = seed_section(&service, course_id, "Target", 2).await.unwrap();

        store.fail_write(3);
        let mv = CrossSectionMove::new(
            source_lectures[0].id,
            source.id,
            target.id,
            Position::new(0),
            Position::new(1),
        )
        .unwrap();
        assert_injected(service.move_across_sections(mv).await.unwrap_err());

        let source_now = service.list_ordered(source.id).await.unwrap();
        let target_now = service.list_ordered(target.id).await.unwrap();
        assert!(!invariant_contiguous_order(&source_now));
        assert!(!invariant_contiguous_order(&target_now));

        let pending = service.journal().pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, OperationKind::MoveAcrossSections);
        assert_eq!(pending[0].applied, 2);
        assert!(pending[0].failure.is_some());

        let reports = service.reconcile_pending().await.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.was_repaired()));

        let source_now = service.list_ordered(source.id).await.unwrap();
        let target_now = service.list_ordered(target.id).await.unwrap();
        assert!(invariant_contiguous_order(&source_now));
        assert!(invariant_contiguous_order(&target_now));
        // The lecture never left its section.
        assert_eq!(source_now.len(), 3);
        assert_eq!(target_now.len(), 2);
        assert!(ids(&source_now).contains(&source_lectures[0].id));
        assert!(service.journal().pending().await.unwrap().is_empty());
    }

    /// Removal dies after the delete; the survivors keep their old numbers.
    #[tokio::test]
    async fn test_removal_interrupted_leaves_gap_only() {
        let (service, store) = faulty_service();
        let (section, lectures) = seed_section(&service, CourseId::new(), "Intro", 4)
            .await
            .unwrap();

        store.fail_write(2);
        assert_injected(service.remove_lecture(lectures[1].id).await.unwrap_err());

        let damaged = service.list_ordered(section.id).await.unwrap();
        let orders: Vec<u32> = damaged.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![0, 2, 3]);

        let report = service.reconcile_section(section.id).await.unwrap();
        assert_eq!(report.renumbered, 2);

        let repaired = service.list_ordered(section.id).await.unwrap();
        assert_eq!(
            ids(&repaired),
            vec![lectures[0].id, lectures[2].id, lectures[3].id]
        );
        assert!(invariant_contiguous_order(&repaired));
    }

    /// A failed first step changes nothing, yet the record still names the
    /// section so a sweep confirms it is clean.
    #[tokio::test]
    async fn test_failure_on_first_step_writes_nothing() {
        let (service, store) = faulty_service();
        let (section, lectures) = seed_section(&service, CourseId::new(), "Intro", 3)
            .await
            .unwrap();

        store.fail_write(1);
        let mv = WithinSectionMove::new(
            section.id,
            lectures[2].id,
            Position::new(2),
            Position::new(0),
        )
        .unwrap();
        assert_injected(service.move_within_section(mv).await.unwrap_err());

        let listed = service.list_ordered(section.id).await.unwrap();
        assert_eq!(ids(&listed), ids(&lectures));

        let reports = service.reconcile_pending().await.unwrap();
        assert_eq!(reports.len(), 1);
        assert!(!reports[0].was_repaired());
    }

    /// The journal written by a crashed process is picked up by the next
    /// runtime on the same directory.
    #[tokio::test]
    async fn test_file_backed_journal_survives_restart() {
        let dir = TempDir::new().unwrap();
        let course_id = CourseId::new();

        let (section, lectures) = {
            let items = FileBackedKVStore::open(dir.path().join(ITEMS_FILE)).unwrap();
            let journal = FileBackedKVStore::open(dir.path().join(JOURNAL_FILE)).unwrap();
            let store = Arc::new(FaultyItemStore::new(Arc::new(KvItemStore::new(items))));
            let service = LectureOrderingService::new(
                Arc::clone(&store),
                Arc::new(KvMoveJournal::new(journal)),
            );
            let (section, lectures) = seed_section(&service, course_id, "Durable", 4)
                .await
                .unwrap();

            store.fail_write(2);
            let mv = WithinSectionMove::new(
                section.id,
                lectures[0].id,
                Position::new(0),
                Position::new(3),
            )
            .unwrap();
            assert_injected(service.move_within_section(mv).await.unwrap_err());
            (section, lectures)
        };

        let runtime = CurriculumRuntime::open(RuntimeConfig {
            data_dir: dir.path().to_path_buf(),
            reconcile_interval: Duration::from_secs(60),
            ..RuntimeConfig::default()
        })
        .unwrap();

        let damaged = runtime.service().list_ordered(section.id).await.unwrap();
        assert!(!invariant_contiguous_order(&damaged));
        assert_eq!(runtime.service().journal().pending().await.unwrap().len(), 1);

        assert_eq!(runtime.recover().await.unwrap(), 1);

        let repaired = runtime.service().list_ordered(section.id).await.unwrap();
        assert!(invariant_contiguous_order(&repaired));
        assert_eq!(repaired.len(), lectures.len());
        assert!(runtime.service().journal().pending().await.unwrap().is_empty());
        assert_eq!(
            runtime.service().store().count_lectures(section.id).await.unwrap(),
            4
        );
    }
}
