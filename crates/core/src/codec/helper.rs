//! Invocation of the stream-to-tempfile helper (`transcode-wrapper`).
//!
//! Some encoders cannot read audio from standard input. The helper accepts
//! the stream on its own stdin, writes it to a temporary file, substitutes
//! that file's path for every [`INPUT_PLACEHOLDER`] in the wrapped command,
//! runs it, and removes the temporary file afterwards.

use std::ffi::OsString;

use crate::process::Invocation;

/// Placeholder replaced by the temporary input path in encode mode.
pub const INPUT_PLACEHOLDER: &str = "%i";

/// Placeholder replaced by the temporary output path in decode mode.
pub const OUTPUT_PLACEHOLDER: &str = "%o";

/// Direction of the temp-file bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperMode {
    /// stdin → temp file → wrapped command.
    Encode,
    /// wrapped command → temp file → stdout.
    Decode,
}

impl HelperMode {
    fn flag(self) -> &'static str {
        match self {
            Self::Encode => "--encode",
            Self::Decode => "--decode",
        }
    }
}

/// Wraps `inner` so it runs behind the helper.
///
/// `suffix` is the extension (with leading dot) given to the temporary file,
/// which some encoders use to detect the input format.
pub fn helper_invocation(
    helper: impl Into<OsString>,
    mode: HelperMode,
    suffix: &str,
    inner: Invocation,
) -> Invocation {
    Invocation::new(helper)
        .args([mode.flag(), "--suffix", suffix, "--"])
        .arg(inner.program)
        .args(inner.args)
}
