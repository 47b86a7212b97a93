//! # End-to-End Ordering Flows
//!
//! Drives the curriculum handler and service on top of the durable runtime
//! stores, then reopens the data directory to check what was persisted.
//!
//! ## Flow Tested:
//!
//! 1. **Handler (cm-02) → Engine (cm-01)**: JSON requests become validated moves
//! 2. **Engine → File store**: every step lands in `items.db`
//! 3. **Restart**: a fresh runtime sees the same curriculum

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    use cm_01_lecture_ordering::{
        invariant_contiguous_order, LectureOrderingApi, MoveJournal, Position,
    };
    use cm_02_curriculum::{
        CurriculumApi, CurriculumHandler, CurriculumRequest, CurriculumResponse,
        CurriculumService, InMemoryCourseDirectory, MoveLectureCommand,
    };
    use curriculum_runtime::{CurriculumRuntime, DurableOrderingService, RuntimeConfig};
    use shared_types::{Course, InstructorId, LectureData, LectureStatus, SectionData};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type DurableHandler = CurriculumHandler<DurableOrderingService, InMemoryCourseDirectory>;

    fn runtime_config(dir: &TempDir) -> RuntimeConfig {
        RuntimeConfig {
            data_dir: dir.path().to_path_buf(),
            reconcile_interval: Duration::from_secs(60),
            ..RuntimeConfig::default()
        }
    }

    fn lecture(title: &str, duration_secs: u32) -> LectureData {
        LectureData {
            title: title.to_string(),
            media_ref: format!("uploads/{}.mp4", title.to_lowercase().replace(' ', "-")),
            duration_secs,
        }
    }

    fn section(title: &str) -> SectionData {
        SectionData {
            title: title.to_string(),
            description: format!("All about {title}"),
        }
    }

    fn handler_for(runtime: &CurriculumRuntime, course: &Course) -> DurableHandler {
        let directory = Arc::new(InMemoryCourseDirectory::new());
        directory.insert(course.clone());
        CurriculumHandler::new(CurriculumService::new(runtime.service(), directory))
    }

    async fn send(
        handler: &DurableHandler,
        caller: InstructorId,
        body: Value,
    ) -> CurriculumResponse {
        let request: CurriculumRequest = serde_json::from_value(body).unwrap();
        handler.handle(caller, request).await
    }

    fn lecture_titles(data: &Value, section_index: usize) -> Vec<String> {
        data["sections"][section_index]["lectures"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap().to_string())
            .collect()
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    /// Build a two-section course, reorder it through the handler and the
    /// typed API, and confirm the result after a restart.
    #[tokio::test]
    async fn test_course_editing_session_persists() {
        let dir = TempDir::new().unwrap();
        let owner = InstructorId::new();
        let course = Course {
            id: shared_types::CourseId::new(),
            instructor_id: owner,
            title: "Rust in Production".to_string(),
        };

        {
            let runtime = CurriculumRuntime::open(runtime_config(&dir)).unwrap();
            let handler = handler_for(&runtime, &course);
            let service = handler.service();

            let basics = service
                .add_section(owner, course.id, section("Basics"))
                .await
                .unwrap();
            let advanced = service
                .add_section(owner, course.id, section("Advanced"))
                .await
                .unwrap();
            assert_eq!((basics.order, advanced.order), (0, 1));

            let mut basic_lectures = Vec::new();
            for title in ["Ownership", "Borrowing", "Traits", "Generics"] {
                basic_lectures.push(
                    service
                        .add_lecture(owner, course.id, basics.id, lecture(title, 600))
                        .await
                        .unwrap(),
                );
            }
            let unsafe_lecture = service
                .add_lecture(owner, course.id, advanced.id, lecture("Unsafe", 900))
                .await
                .unwrap();
            service
                .add_lecture(owner, course.id, advanced.id, lecture("Macros", 1200))
                .await
                .unwrap();

            // Generics 3 → 1 through the JSON boundary.
            let moved = send(
                &handler,
                owner,
                json!({
                    "action": "move_lecture",
                    "courseId": course.id.to_string(),
                    "lectureId": basic_lectures[3].id.to_string(),
                    "fromSectionId": basics.id.to_string(),
                    "toSectionId": basics.id.to_string(),
                    "fromOrder": 3,
                    "toOrder": 1,
                }),
            )
            .await;
            assert!(moved.success, "{:?}", moved.error);

            // Unsafe leaves Advanced and lands at the tail of Basics.
            let across = service
                .move_lecture(
                    owner,
                    MoveLectureCommand {
                        course_id: course.id,
                        lecture_id: unsafe_lecture.id,
                        from_section: advanced.id,
                        to_section: basics.id,
                        from: Position::new(0),
                        to: Position::new(4),
                    },
                )
                .await
                .unwrap();
            assert_eq!((across.section_id, across.order), (basics.id, 4));

            // Borrowing is dropped; everything behind it closes up.
            service
                .remove_lecture(owner, course.id, basic_lectures[1].id)
                .await
                .unwrap();

            let view = send(
                &handler,
                owner,
                json!({"action": "get_instructor_curriculum", "courseId": course.id.to_string()}),
            )
            .await;
            let data = view.data.unwrap();
            assert_eq!(
                lecture_titles(&data, 0),
                vec!["Ownership", "Generics", "Traits", "Unsafe"]
            );
            assert_eq!(lecture_titles(&data, 1), vec!["Macros"]);
        }

        // Restart on the same directory.
        let runtime = CurriculumRuntime::open(runtime_config(&dir)).unwrap();
        let service = CurriculumService::new(runtime.service(), {
            let directory = Arc::new(InMemoryCourseDirectory::new());
            directory.insert(course.clone());
            directory
        });

        let curriculum = service.get_curriculum(course.id).await.unwrap();
        assert_eq!(curriculum.lecture_count(), 5);
        assert_eq!(curriculum.total_duration_secs(), 600 * 3 + 900 + 1200);
        for entry in &curriculum.sections {
            assert!(invariant_contiguous_order(&entry.lectures));
        }
        let titles: Vec<&str> = curriculum.sections[0]
            .lectures
            .iter()
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Ownership", "Generics", "Traits", "Unsafe"]);
        assert!(runtime.service().journal().pending().await.unwrap().is_empty());
    }

    /// The transcoding callback flips a lecture to processed without
    /// touching its position.
    #[tokio::test]
    async fn test_processed_callback_keeps_position() {
        let dir = TempDir::new().unwrap();
        let owner = InstructorId::new();
        let course = Course {
            id: shared_types::CourseId::new(),
            instructor_id: owner,
            title: "Media Pipelines".to_string(),
        };
        let runtime = CurriculumRuntime::open(runtime_config(&dir)).unwrap();
        let handler = handler_for(&runtime, &course);

        let encoding = handler
            .service()
            .add_section(owner, course.id, section("Encoding"))
            .await
            .unwrap();
        let mut lectures = Vec::new();
        for title in ["Containers", "Codecs", "Bitrates"] {
            lectures.push(
                handler
                    .service()
                    .add_lecture(owner, course.id, encoding.id, lecture(title, 300))
                    .await
                    .unwrap(),
            );
        }

        let response = send(
            &handler,
            InstructorId::new(),
            json!({
                "action": "processed_lecture",
                "userId": owner.to_string(),
                "courseId": course.id.to_string(),
                "sectionId": encoding.id.to_string(),
                "lectureId": lectures[1].id.to_string(),
                "key": "processed/codecs.m3u8",
            }),
        )
        .await;
        assert!(response.success, "{:?}", response.error);

        let stored = runtime.service().get_lecture(lectures[1].id).await.unwrap();
        assert_eq!(stored.order, 1);
        assert_eq!(stored.status, LectureStatus::Processed);
        assert_eq!(stored.media_ref, "processed/codecs.m3u8");
    }

    /// Bad input never reaches the store.
    #[tokio::test]
    async fn test_rejected_requests_leave_store_untouched() {
        let dir = TempDir::new().unwrap();
        let owner = InstructorId::new();
        let course = Course {
            id: shared_types::CourseId::new(),
            instructor_id: owner,
            title: "Validation".to_string(),
        };
        let runtime = CurriculumRuntime::open(runtime_config(&dir)).unwrap();
        let handler = handler_for(&runtime, &course);

        let intro = handler
            .service()
            .add_section(owner, course.id, section("Intro"))
            .await
            .unwrap();
        let first = handler
            .service()
            .add_lecture(owner, course.id, intro.id, lecture("Welcome", 60))
            .await
            .unwrap();
        let before = runtime.service().list_ordered(intro.id).await.unwrap();

        // Out of range, no-op, stringly typed, stale source.
        let cases = [
            (json!(0), json!(5)),
            (json!(0), json!(0)),
            (json!("0"), json!(1)),
            (json!(1), json!(0)),
        ];
        for (from, to) in cases {
            let response = send(
                &handler,
                owner,
                json!({
                    "action": "move_lecture",
                    "courseId": course.id.to_string(),
                    "lectureId": first.id.to_string(),
                    "fromSectionId": intro.id.to_string(),
                    "toSectionId": intro.id.to_string(),
                    "fromOrder": from,
                    "toOrder": to,
                }),
            )
            .await;
            assert!(!response.success, "accepted {from} -> {to}");
            assert_eq!(response.error.unwrap().code, "bad_request");
        }

        let after = runtime.service().list_ordered(intro.id).await.unwrap();
        assert_eq!(before, after);
    }
}
