//! Item Store over a key-value backend
//!
//! Key layout:
//!
//! | Prefix | Key | Value |
//! |--------|-----|-------|
//! | `lecture:` | lecture id (16 bytes) | bincode `Lecture` |
//! | `section:` | section id (16 bytes) | bincode `Section` |

use super::blocking::BlockingKv;
use crate::adapters::memory_store::apply_update;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{LectureUpdate, Placement, RangeShift};
use crate::ports::outbound::{BatchOperation, ItemStore, KeyValueStore};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared_types::{CourseId, Lecture, LectureId, Section, SectionId};
use tracing::trace;

const LECTURE_PREFIX: &[u8] = b"lecture:";
const SECTION_PREFIX: &[u8] = b"section:";

fn key(prefix: &[u8], id: &[u8; 16]) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + id.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(id);
    key
}

fn lecture_key(id: LectureId) -> Vec<u8> {
    key(LECTURE_PREFIX, id.as_bytes())
}

fn section_key(id: SectionId) -> Vec<u8> {
    key(SECTION_PREFIX, id.as_bytes())
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    Ok(bincode::deserialize(bytes)?)
}

fn scan_lectures<KV: KeyValueStore>(kv: &KV) -> Result<Vec<Lecture>, StoreError> {
    kv.prefix_scan(LECTURE_PREFIX)?
        .iter()
        .map(|(_, value)| decode::<Lecture>(value))
        .collect()
}

fn read_lecture<KV: KeyValueStore>(
    kv: &KV,
    lecture_id: LectureId,
) -> Result<Option<Lecture>, StoreError> {
    kv.get(&lecture_key(lecture_id))?
        .map(|bytes| decode(&bytes))
        .transpose()
}

fn write_lecture<KV: KeyValueStore>(kv: &mut KV, lecture: &Lecture) -> Result<(), StoreError> {
    let bytes = bincode::serialize(lecture)?;
    kv.put(&lecture_key(lecture.id), &bytes)?;
    Ok(())
}

/// `ItemStore` adapter persisting documents through a `KeyValueStore`.
///
/// Backend calls run on the blocking pool through `BlockingKv`.
pub struct KvItemStore<KV: KeyValueStore> {
    kv: BlockingKv<KV>,
}

impl<KV: KeyValueStore> KvItemStore<KV> {
    pub fn new(kv: KV) -> Self {
        Self {
            kv: BlockingKv::new(kv),
        }
    }
}

#[async_trait]
impl<KV: KeyValueStore> ItemStore for KvItemStore<KV> {
    async fn get_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        self.kv.run(move |kv| read_lecture(kv, lecture_id)).await
    }

    async fn get_section(&self, section_id: SectionId) -> Result<Option<Section>, StoreError> {
        self.kv
            .run(move |kv| {
                kv.get(&section_key(section_id))?
                    .map(|bytes| decode(&bytes))
                    .transpose()
            })
            .await
    }

    async fn count_lectures(&self, section_id: SectionId) -> Result<u32, StoreError> {
        self.kv
            .run(move |kv| {
                let lectures = scan_lectures(kv)?;
                Ok(lectures.iter().filter(|l| l.section_id == section_id).count() as u32)
            })
            .await
    }

    async fn list_lectures(&self, section_id: SectionId) -> Result<Vec<Lecture>, StoreError> {
        self.kv
            .run(move |kv| {
                Ok(scan_lectures(kv)?
                    .into_iter()
                    .filter(|l| l.section_id == section_id)
                    .collect())
            })
            .await
    }

    async fn shift_range(&self, shift: &RangeShift) -> Result<u64, StoreError> {
        let shift = *shift;
        let matched = self
            .kv
            .run(move |kv| {
                let mut batch = Vec::new();
                for mut lecture in scan_lectures(kv)? {
                    if let Some(order) = shift.shifted(lecture.section_id, lecture.order) {
                        lecture.order = order;
                        batch.push(BatchOperation::put(
                            lecture_key(lecture.id),
                            bincode::serialize(&lecture)?,
                        ));
                    }
                }
                let matched = batch.len() as u64;
                kv.atomic_batch_write(batch)?;
                Ok(matched)
            })
            .await?;
        trace!(
            section_id = %shift.section_id,
            range = %shift.range,
            delta = shift.delta,
            matched,
            "[cm-01] kv shift_range"
        );
        Ok(matched)
    }

    async fn set_position(&self, placement: &Placement) -> Result<Option<Lecture>, StoreError> {
        let placement = *placement;
        self.kv
            .run(move |kv| {
                let Some(mut lecture) = read_lecture(kv, placement.lecture_id)? else {
                    return Ok(None);
                };
                lecture.section_id = placement.section_id;
                lecture.order = placement.order;
                write_lecture(kv, &lecture)?;
                Ok(Some(lecture))
            })
            .await
    }

    async fn set_positions(&self, placements: &[Placement]) -> Result<u64, StoreError> {
        let placements = placements.to_vec();
        let placed = self
            .kv
            .run(move |kv| {
                let mut batch = Vec::with_capacity(placements.len());
                for placement in &placements {
                    let Some(mut lecture) = read_lecture(kv, placement.lecture_id)? else {
                        continue;
                    };
                    lecture.section_id = placement.section_id;
                    lecture.order = placement.order;
                    batch.push(BatchOperation::put(
                        lecture_key(lecture.id),
                        bincode::serialize(&lecture)?,
                    ));
                }
                let placed = batch.len() as u64;
                kv.atomic_batch_write(batch)?;
                Ok(placed)
            })
            .await?;
        trace!(placed, "[cm-01] kv set_positions");
        Ok(placed)
    }

    async fn insert_lecture(&self, lecture: &Lecture) -> Result<(), StoreError> {
        let lecture = lecture.clone();
        self.kv
            .run(move |kv| {
                if kv.get(&lecture_key(lecture.id))?.is_some() {
                    return Err(StoreError::Duplicate(lecture.id.to_string()));
                }
                write_lecture(kv, &lecture)
            })
            .await
    }

    async fn delete_lecture(&self, lecture_id: LectureId) -> Result<Option<Lecture>, StoreError> {
        self.kv
            .run(move |kv| {
                let existing = read_lecture(kv, lecture_id)?;
                if existing.is_some() {
                    kv.delete(&lecture_key(lecture_id))?;
                }
                Ok(existing)
            })
            .await
    }

    async fn update_lecture(
        &self,
        lecture_id: LectureId,
        update: &LectureUpdate,
    ) -> Result<Option<Lecture>, StoreError> {
        let update = update.clone();
        self.kv
            .run(move |kv| {
                let Some(mut lecture) = read_lecture(kv, lecture_id)? else {
                    return Ok(None);
                };
                apply_update(&mut lecture, &update);
                write_lecture(kv, &lecture)?;
                Ok(Some(lecture))
            })
            .await
    }

    async fn insert_section(&self, section: &Section) -> Result<(), StoreError> {
        let section = section.clone();
        self.kv
            .run(move |kv| {
                let key = section_key(section.id);
                if kv.get(&key)?.is_some() {
                    return Err(StoreError::Duplicate(section.id.to_string()));
                }
                kv.put(&key, &bincode::serialize(&section)?)?;
                Ok(())
            })
            .await
    }

    async fn list_sections(&self, course_id: CourseId) -> Result<Vec<Section>, StoreError> {
        self.kv
            .run(move |kv| {
                let mut sections = Vec::new();
                for (_, value) in kv.prefix_scan(SECTION_PREFIX)? {
                    let section: Section = decode(&value)?;
                    if section.course_id == course_id {
                        sections.push(section);
                    }
                }
                Ok(sections)
            })
            .await
    }
}
