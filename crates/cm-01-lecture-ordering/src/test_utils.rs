//! Test utilities
//!
//! Fixtures for seeding sections, plus two `ItemStore` wrappers used to
//! reproduce partial failures and interleavings:
//!
//! - [`FaultyItemStore`] fails a chosen write call once.
//! - [`GatedItemStore`] pauses the first range shift until released.
//!
//! Requires feature: `test-utils`

use crate::adapters::{InMemoryItemStore, InMemoryKVStore, KvMoveJournal};
use crate::application::LectureOrderingService;
use crate::config::OrderingConfig;
use crate::domain::errors::{OrderingError, StoreError};
use crate::domain::value_objects::{LectureUpdate, Placement, RangeShift};
use crate::ports::inbound::LectureOrderingApi;
use crate::ports::outbound::ItemStore;
use async_trait::async_trait;
use shared_types::{CourseId, Lecture, LectureData, LectureId, Section, SectionData, SectionId};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Engine over in-memory store and journal.
pub type MemoryOrderingService =
    LectureOrderingService<InMemoryItemStore, KvMoveJournal<InMemoryKVStore>>;

pub fn memory_service(config: OrderingConfig) -> MemoryOrderingService {
    LectureOrderingService::with_config(
        Arc::new(InMemoryItemStore::new()),
        Arc::new(KvMoveJournal::in_memory()),
        config,
    )
}

pub fn lecture_data(title: &str) -> LectureData {
    LectureData {
        title: title.to_string(),
        media_ref: format!("uploads/{}.mp4", title.to_lowercase().replace(' ', "-")),
        duration_secs: 300,
    }
}

pub fn section_data(title: &str) -> SectionData {
    SectionData {
        title: title.to_string(),
        description: format!("{title} overview"),
    }
}

/// Create a section with `lectures` appended lectures named `L0`, `L1`, ...
///
/// Returned lectures are in append order, so `lectures[i].order == i`.
pub async fn seed_section<A>(
    api: &A,
    course_id: CourseId,
    title: &str,
    lectures: usize,
) -> Result<(Section, Vec<Lecture>), OrderingError>
where
    A: LectureOrderingApi + ?Sized,
{
    let section = api.append_section(course_id, section_data(title)).await?;
    let mut created = Vec::with_capacity(lectures);
    for index in 0..lectures {
        created.push(
            api.append_lecture(section.id, lecture_data(&format!("L{index}")))
                .await?,
        );
    }
    Ok((section, created))
}

/// Ids of `lectures` as returned by `list_ordered`, front to back.
pub fn ids(lectures: &[Lecture]) -> Vec<LectureId> {
    lectures.iter().map(|lecture| lecture.id).collect()
}

/// Store wrapper that fails one write call.
///
/// Writes are counted from 1 across `shift_range`, `set_position`,
/// `insert_lecture`, `delete_lecture`, `update_lecture` and
/// `insert_section`. Reads always pass through.
pub struct FaultyItemStore<S: ItemStore> {
    inner: Arc<S>,
    writes: AtomicUsize,
    fail_at: AtomicUsize,
}

impl<S: ItemStore> FaultyItemStore<S> {
    pub fn new(inner: Arc<S>) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
            fail_at: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Fail the `nth` write from now (1 = the very next one).
    pub fn fail_write(&self, nth: usize) {
        let seen = self.writes.load(Ordering::SeqCst);
        self.fail_at.store(seen + nth, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self, operation: &str) -> Result<(), StoreError> {
        let current = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self
            .fail_at
            .compare_exchange(current, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return Err(StoreError::Unavailable(format!(
                "injected fault on {operation}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: ItemStore> ItemStore for FaultyItemStore<S> {
    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        self.inner.get_lecture(lecture_id).await
    }

    async fn get_section(&self, section_id: SectionId) -> Result<Option<Section>, StoreError> {
        self.inner.get_section(section_id).await
    }

    async fn count_lectures(&self, section_id: SectionId) -> Result<u32, StoreError> {
        self.inner.count_lectures(section_id).await
    }

    async fn list_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>, StoreError> {
        self.inner.list_lectures(section_id).await
    }

    async fn shift_range(&self, shift: &RangeShift) -> Result<u64, StoreError> {
        self.check("shift_range")?;
        self.inner.shift_range(shift).await
    }

    async fn set_position(&self, placement: &Placement) -> Result<Option<Lecture>, StoreError> {
        self.check("set_position")?;
        self.inner.set_position(placement).await
    }

    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError> {
        self.check("insert_lecture")?;
        self.inner.insert_lecture(lecture).await
    }

    async fn delete_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        self.check("delete_lecture")?;
        self.inner.delete_lecture(lecture_id).await
    }

    async fn update_lecture(
        &self,
        lecture_id: LectureId,
        update: &LectureUpdate,
    ) -> Result<Option<Lecture>, StoreError> {
        self.check("update_lecture")?;
        self.inner.update_lecture(lecture_id, update).await
    }

    async fn insert_section(&self, section: &Section) -> Result<(), StoreError> {
        self.check("insert_section")?;
        self.inner.insert_section(section).await
    }

    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, StoreError> {
        self.inner.list_sections(course_id).await
    }
}

/// Store wrapper that parks the first range shift after it is applied.
///
/// Once armed, the next `shift_range` call applies its update, signals
/// [`GatedItemStore::wait_until_paused`] and then blocks until
/// [`GatedItemStore::release`]. Later calls pass straight through.
pub struct GatedItemStore<S: ItemStore> {
    inner: Arc<S>,
    armed: AtomicBool,
    paused: Notify,
    released: Notify,
}

impl<S: ItemStore> GatedItemStore<S> {
    pub fn new(inner: Arc<S>) -> Self {
        Self {
            inner,
            armed: AtomicBool::new(false),
            paused: Notify::new(),
            released: Notify::new(),
        }
    }

    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub async fn wait_until_paused(&self) {
        self.paused.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }
}

#[async_trait]
impl<S: ItemStore> ItemStore for GatedItemStore<S> {
    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        self.inner.get_lecture(lecture_id).await
    }

    async fn get_section(&self, section_id: SectionId) -> Result<Option<Section>, StoreError> {
        self.inner.get_section(section_id).await
    }

    async fn count_lectures(&self, section_id: SectionId) -> Result<u32, StoreError> {
        self.inner.count_lectures(section_id).await
    }

    async fn list_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>, StoreError> {
        self.inner.list_lectures(section_id).await
    }

    async fn shift_range(&self, shift: &RangeShift) -> Result<u64, StoreError> {
        let matched = self.inner.shift_range(shift).await?;
        if self.armed.swap(false, Ordering::SeqCst) {
            self.paused.notify_one();
            self.released.notified().await;
        }
        Ok(matched)
    }

    async fn set_position(&self, placement: &Placement) -> Result<Option<Lecture>, StoreError> {
        self.inner.set_position(placement).await
    }

    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError> {
        self.inner.insert_lecture(lecture).await
    }

    async fn delete_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        self.inner.delete_lecture(lecture_id).await
    }

    async fn update_lecture(
        &self,
        lecture_id: LectureId,
        update: &LectureUpdate,
    ) -> Result<Option<Lecture>, StoreError> {
        self.inner.update_lecture(lecture_id, update).await
    }

    async fn insert_section(&self, section: &Section) -> Result<(), StoreError> {
        self.inner.insert_section(section).await
    }

    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, StoreError> {
        self.inner.list_sections(course_id).await
    }
}
