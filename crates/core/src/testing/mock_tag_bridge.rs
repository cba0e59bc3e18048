//! Mock tag bridge for testing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::tags::{TagBridge, TagError, TagSet};

/// A recorded tag write for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub path: PathBuf,
    pub tags: TagSet,
}

/// In-memory implementation of the TagBridge trait.
///
/// Files that were never seeded or written read back as untagged (an empty
/// set), the same as a real file without a tag container.
///
/// # Example
///
/// ```rust,ignore
/// use transcoder_core::testing::MockTagBridge;
///
/// let bridge = MockTagBridge::new();
/// bridge.set_tags("/music/a.flac", TagSet::new().with("title", "So What"));
///
/// pipeline.run(job).await?;
///
/// assert_eq!(bridge.tags_for("/out/a.mp3").unwrap().get("title"), Some("So What"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTagBridge {
    files: Arc<RwLock<HashMap<PathBuf, TagSet>>>,
    writes: Arc<RwLock<Vec<RecordedWrite>>>,
    fail_reads: Arc<RwLock<Option<String>>>,
    fail_writes: Arc<RwLock<Option<String>>>,
}

impl MockTagBridge {
    /// Create a new mock bridge with no files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the tags stored for `path`.
    pub fn set_tags(&self, path: impl AsRef<Path>, tags: TagSet) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.as_ref().to_path_buf(), tags);
    }

    /// Current tags for `path`, if any were seeded or written.
    pub fn tags_for(&self, path: impl AsRef<Path>) -> Option<TagSet> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path.as_ref())
            .cloned()
    }

    /// All writes performed so far, in order.
    pub fn recorded_writes(&self) -> Vec<RecordedWrite> {
        self.writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every read fail with `reason`.
    pub fn fail_reads(&self, reason: impl Into<String>) {
        *self.fail_reads.write().unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
    }

    /// Make every write fail with `reason`.
    pub fn fail_writes(&self, reason: impl Into<String>) {
        *self.fail_writes.write().unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
    }

    /// Clear configured failures.
    pub fn clear_failures(&self) {
        *self.fail_reads.write().unwrap_or_else(PoisonError::into_inner) = None;
        *self.fail_writes.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl TagBridge for MockTagBridge {
    fn name(&self) -> &str {
        "mock"
    }

    fn read(&self, path: &Path) -> Result<TagSet, TagError> {
        if let Some(reason) = self
            .fail_reads
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Err(TagError::read(path, reason));
        }

        Ok(self.tags_for(path).unwrap_or_default())
    }

    fn write(&self, path: &Path, tags: &TagSet) -> Result<(), TagError> {
        if let Some(reason) = self
            .fail_writes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Err(TagError::write(path, reason));
        }

        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_path_buf())
            .or_default()
            .update(tags);
        self.writes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedWrite {
                path: path.to_path_buf(),
                tags: tags.clone(),
            });
        Ok(())
    }
}
