//! Testing utilities and mock implementations.
//!
//! The codec plugins only ever talk to external programs through the process
//! runner, so tests substitute small shell scripts for the real encoders and
//! swap the tag bridge for [`MockTagBridge`].
//!
//! # Example
//!
//! ```rust,ignore
//! use transcoder_core::testing::{fixtures, MockTagBridge};
//!
//! let dir = tempfile::tempdir()?;
//! let encoder = fixtures::write_script(dir.path(), "fake-lame", "exit 0");
//! let tools = ToolPaths::all(&encoder);
//! let registry = CodecRegistry::with_builtin(&tools, Arc::new(MockTagBridge::new()));
//! ```

mod mock_tag_bridge;

pub use mock_tag_bridge::{MockTagBridge, RecordedWrite};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::tags::{keys, TagSet};

    /// A typical album track's tags.
    pub fn sample_tags() -> TagSet {
        TagSet::new()
            .with(keys::TITLE, "So What")
            .with(keys::ARTIST, "Miles Davis")
            .and(keys::ARTIST, "John Coltrane")
            .with(keys::ALBUM, "Kind of Blue")
            .with(keys::TRACK_NUMBER, "1")
            .with(keys::DATE, "1959")
            .with(keys::GENRE, "Jazz")
            .with("replaygain_track_gain", "-6.20 dB")
    }

    /// Writes an executable `sh` script named `name` into `dir`.
    ///
    /// The script's arguments are available as `"$@"` in `body`.
    pub fn write_script(dir: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
        }

        Ok(path)
    }

    /// A script that appends its arguments, one per line, to `log` and
    /// drains stdin.
    pub fn recording_script(dir: &Path, name: &str, log: &Path) -> std::io::Result<PathBuf> {
        let body = format!(
            r#"for arg in "$@"; do printf '%s\n' "$arg" >> '{log}'; done
cat > /dev/null"#,
            log = log.display()
        );
        write_script(dir, name, &body)
    }
}
