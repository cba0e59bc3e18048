//! Shared plumbing handed to every plugin.

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::error::CodecError;
use crate::process::{Invocation, OutputSink, ProcessHandle, ProcessInput, ProcessRunner};
use crate::tags::{TagBridge, TagSet};

/// Process runner and tag bridge shared by all plugins of a registry.
#[derive(Clone)]
pub struct CodecContext {
    runner: ProcessRunner,
    tags: Arc<dyn TagBridge>,
}

impl std::fmt::Debug for CodecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecContext")
            .field("runner", &self.runner)
            .field("tags", &self.tags.name())
            .finish()
    }
}

impl CodecContext {
    pub fn new(runner: ProcessRunner, tags: Arc<dyn TagBridge>) -> Self {
        Self { runner, tags }
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    pub fn tag_bridge(&self) -> &Arc<dyn TagBridge> {
        &self.tags
    }

    /// Launches `invocation` through the runner.
    pub fn spawn(
        &self,
        invocation: &Invocation,
        niceness: i32,
        input: ProcessInput,
        sink: OutputSink,
    ) -> Result<ProcessHandle, CodecError> {
        Ok(self.runner.spawn(invocation, niceness, input, sink)?)
    }

    /// Reads tags on a blocking thread.
    pub async fn read_tags(&self, path: &Path) -> Result<TagSet, CodecError> {
        let bridge = Arc::clone(&self.tags);
        let path = path.to_path_buf();
        let tags = tokio::task::spawn_blocking(move || bridge.read(&path))
            .await
            .map_err(std::io::Error::other)??;
        Ok(tags)
    }

    /// Writes tags on a blocking thread.
    pub async fn write_tags(&self, path: &Path, tags: &TagSet) -> Result<(), CodecError> {
        let bridge = Arc::clone(&self.tags);
        let path = path.to_path_buf();
        let tags = tags.clone();
        tokio::task::spawn_blocking(move || bridge.write(&path, &tags))
            .await
            .map_err(std::io::Error::other)??;
        Ok(())
    }
}

/// Deletes `path` if it exists.
///
/// Runs before every decode and encode launch, whether or not the launch
/// later succeeds.
pub async fn remove_existing(path: &Path) -> Result<(), CodecError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed existing target");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CodecError::RemoveExisting {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remove_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.mp3");
        std::fs::write(&path, b"stale").unwrap();

        remove_existing(&path).await.unwrap();
        assert!(!path.exists());

        // Missing file is fine.
        remove_existing(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_existing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove_existing(dir.path()).await.unwrap_err();
        assert!(matches!(err, CodecError::RemoveExisting { .. }));
    }
}
