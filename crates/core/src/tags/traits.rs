//! Trait definitions for the tags module.

use std::path::Path;

use super::error::TagError;
use super::types::TagSet;

/// Reads and writes metadata tags for a file, independent of its format.
///
/// Implementations do blocking file I/O; async callers should run them on a
/// blocking thread.
pub trait TagBridge: Send + Sync {
    /// Returns the name of this bridge implementation.
    fn name(&self) -> &str;

    /// Reads the file's tags into an owned set.
    fn read(&self, path: &Path) -> Result<TagSet, TagError>;

    /// Loads the file's tag container (creating one if absent), overwrites
    /// it with `tags` and saves it back to `path`.
    fn write(&self, path: &Path, tags: &TagSet) -> Result<(), TagError>;
}
