//! estampa-gallery: Stored-image bookkeeping boundary.
//!
//! The editing screens save finished images into a session gallery and
//! list them back, optionally scoped to a project. [`GalleryStore`] is
//! the contract; the browser host backs it with IndexedDB, while
//! [`MemoryGallery`] is the in-memory reference implementation used by
//! tests and native builds.

use uuid::Uuid;
use web_time::{SystemTime, UNIX_EPOCH};

/// Default display name for images saved without one.
pub const DEFAULT_IMAGE_NAME: &str = "Edited image";

/// One stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRecord {
    /// Store-assigned unique id.
    pub id: Uuid,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Display name.
    pub name: String,
    /// Save time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Owning project, `None` for unscoped saves.
    pub project_id: Option<u64>,
}

/// Gallery storage errors.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// No record exists with the given id.
    #[error("no stored image with id {0}")]
    NotFound(Uuid),
    /// The underlying store failed.
    #[error("gallery backend error: {0}")]
    Backend(String),
}

/// Contract for gallery backends.
///
/// Listing is always newest-first by save timestamp; records saved
/// within the same millisecond keep most-recently-saved-first order.
pub trait GalleryStore {
    /// Store image bytes under a new id and return the full record.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Backend`] if the store cannot persist
    /// the record.
    fn save(
        &mut self,
        bytes: Vec<u8>,
        name: Option<String>,
        project_id: Option<u64>,
    ) -> Result<GalleryRecord, GalleryError>;

    /// List stored images, newest first. `Some(project)` restricts the
    /// listing to that project; `None` lists everything.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Backend`] if the store cannot be read.
    fn list(&self, project_id: Option<u64>) -> Result<Vec<GalleryRecord>, GalleryError>;

    /// Delete one stored image.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::NotFound`] when no record has the id.
    fn delete(&mut self, id: Uuid) -> Result<(), GalleryError>;

    /// Delete every stored image.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Backend`] if the store cannot be
    /// cleared.
    fn clear(&mut self) -> Result<(), GalleryError>;
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// In-memory [`GalleryStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryGallery {
    records: Vec<GalleryRecord>,
}

impl MemoryGallery {
    /// Empty gallery.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Number of stored images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the gallery holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl GalleryStore for MemoryGallery {
    fn save(
        &mut self,
        bytes: Vec<u8>,
        name: Option<String>,
        project_id: Option<u64>,
    ) -> Result<GalleryRecord, GalleryError> {
        let record = GalleryRecord {
            id: Uuid::new_v4(),
            bytes,
            name: name.unwrap_or_else(|| DEFAULT_IMAGE_NAME.to_string()),
            timestamp_ms: now_ms(),
            project_id,
        };
        // Newest at the front keeps same-millisecond saves in
        // most-recent-first order under the stable sort in list().
        self.records.insert(0, record.clone());
        Ok(record)
    }

    fn list(&self, project_id: Option<u64>) -> Result<Vec<GalleryRecord>, GalleryError> {
        let mut records: Vec<GalleryRecord> = self
            .records
            .iter()
            .filter(|r| project_id.is_none() || r.project_id == project_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        Ok(records)
    }

    fn delete(&mut self, id: Uuid) -> Result<(), GalleryError> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(GalleryError::NotFound(id));
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), GalleryError> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn save_assigns_unique_ids_and_default_name() {
        let mut gallery = MemoryGallery::new();
        let a = gallery.save(vec![1], None, None).unwrap();
        let b = gallery.save(vec![2], Some("Shirt front".to_string()), None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, DEFAULT_IMAGE_NAME);
        assert_eq!(b.name, "Shirt front");
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn list_is_newest_first() {
        let mut gallery = MemoryGallery::new();
        let first = gallery.save(vec![1], None, None).unwrap();
        let second = gallery.save(vec![2], None, None).unwrap();
        let third = gallery.save(vec![3], None, None).unwrap();

        let ids: Vec<Uuid> = gallery.list(None).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn list_scopes_to_project() {
        let mut gallery = MemoryGallery::new();
        gallery.save(vec![1], None, Some(7)).unwrap();
        gallery.save(vec![2], None, Some(8)).unwrap();
        gallery.save(vec![3], None, None).unwrap();

        let seven = gallery.list(Some(7)).unwrap();
        assert_eq!(seven.len(), 1);
        assert_eq!(seven[0].project_id, Some(7));

        // Unscoped listing includes everything, project-less saves too.
        assert_eq!(gallery.list(None).unwrap().len(), 3);
    }

    #[test]
    fn delete_removes_only_the_named_record() {
        let mut gallery = MemoryGallery::new();
        let keep = gallery.save(vec![1], None, None).unwrap();
        let drop = gallery.save(vec![2], None, None).unwrap();

        gallery.delete(drop.id).unwrap();
        let remaining = gallery.list(None).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut gallery = MemoryGallery::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            gallery.delete(id),
            Err(GalleryError::NotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut gallery = MemoryGallery::new();
        gallery.save(vec![1], None, Some(1)).unwrap();
        gallery.save(vec![2], None, None).unwrap();
        gallery.clear().unwrap();
        assert!(gallery.is_empty());
        assert!(gallery.list(None).unwrap().is_empty());
    }

    #[test]
    fn record_carries_stored_bytes() {
        let mut gallery = MemoryGallery::new();
        let saved = gallery.save(vec![0xDE, 0xAD], None, None).unwrap();
        let listed = gallery.list(None).unwrap();
        assert_eq!(listed[0].bytes, vec![0xDE, 0xAD]);
        assert_eq!(listed[0].id, saved.id);
    }
}
