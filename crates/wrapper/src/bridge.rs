//! Temp-file bridge between a byte stream and a path-only program.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit code reported when the wrapped program cannot be started.
pub const EXIT_LAUNCH_FAILURE: i32 = 127;

/// Direction of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Spool input to a temp file, then run the command on it.
    Encode,
    /// Run the command into a temp file, then stream it out.
    Decode,
}

/// One wrapped invocation.
#[derive(Debug, Clone)]
pub struct Bridge {
    pub direction: Direction,
    /// Suffix (with leading dot) of the temp file.
    pub suffix: String,
    /// Token replaced by the temp file path in every argument.
    pub placeholder: String,
    /// Where temp files are created; the system default when unset.
    pub temp_dir: Option<PathBuf>,
    /// Program followed by its arguments.
    pub command: Vec<OsString>,
}

impl Bridge {
    /// Runs the bridge and returns the exit code to propagate.
    ///
    /// In encode mode `input` is spooled before the command starts. In
    /// decode mode the temp file is copied to `output` only when the command
    /// succeeded.
    pub async fn run<R, W>(&self, input: &mut R, output: &mut W) -> Result<i32>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if self.command.is_empty() {
            bail!("no command given after --");
        }

        match self.direction {
            Direction::Encode => self.encode(input).await,
            Direction::Decode => self.decode(output).await,
        }
    }

    async fn encode<R: AsyncRead + Unpin>(&self, input: &mut R) -> Result<i32> {
        let temp = self
            .builder()
            .tempfile_in(self.temp_root())
            .context("Failed to create temporary input file")?;

        let mut file = tokio::fs::File::from_std(
            temp.reopen()
                .context("Failed to open temporary input file")?,
        );
        let bytes = tokio::io::copy(input, &mut file)
            .await
            .context("Failed to spool input")?;
        file.flush().await?;
        drop(file);
        debug!(path = %temp.path().display(), bytes, "Spooled input");

        let code = self.execute(temp.path(), Stdio::inherit()).await?;

        temp.close()
            .context("Failed to remove temporary input file")?;
        Ok(code)
    }

    async fn decode<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<i32> {
        let dir = tempfile::Builder::new()
            .prefix("transcode-")
            .tempdir_in(self.temp_root())
            .context("Failed to create temporary directory")?;
        let path = dir.path().join(format!("output{}", self.suffix));

        // Standard output carries the decoded audio, so the program's own
        // output is sent to standard error.
        let code = self.execute(&path, Stdio::from(std::io::stderr())).await?;

        if code == 0 {
            let mut file = tokio::fs::File::open(&path)
                .await
                .with_context(|| {
                    format!("{} produced no output file", self.command[0].to_string_lossy())
                })?;
            let bytes = tokio::io::copy(&mut file, output)
                .await
                .context("Failed to stream output")?;
            output.flush().await?;
            debug!(path = %path.display(), bytes, "Streamed output");
        }

        dir.close()
            .context("Failed to remove temporary directory")?;
        Ok(code)
    }

    async fn execute(&self, path: &Path, stdout: Stdio) -> Result<i32> {
        let argv = substitute(&self.command, &self.placeholder, path);
        if argv == self.command {
            warn!(placeholder = %self.placeholder, "Placeholder not found in command");
        }
        debug!(?argv, "Running wrapped command");

        let status = Command::new(&argv[0])
            .args(&argv[1..])
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .await;

        match status {
            Ok(status) => Ok(exit_code(status)),
            Err(e) => {
                warn!(program = %argv[0].to_string_lossy(), error = %e, "Failed to launch wrapped command");
                Ok(EXIT_LAUNCH_FAILURE)
            }
        }
    }

    fn builder(&self) -> tempfile::Builder<'_, '_> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("transcode-").suffix(&self.suffix);
        builder
    }

    fn temp_root(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Replaces `placeholder` with `path` inside every argument.
///
/// Neither the arguments nor the path need to be valid UTF-8.
pub fn substitute(command: &[OsString], placeholder: &str, path: &Path) -> Vec<OsString> {
    command
        .iter()
        .map(|arg| replace_os(arg, placeholder, path.as_os_str()))
        .collect()
}

#[cfg(unix)]
fn replace_os(arg: &OsStr, from: &str, to: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let (mut rest, from, to) = (arg.as_bytes(), from.as_bytes(), to.as_bytes());
    if from.is_empty() {
        return arg.to_os_string();
    }

    let mut out = Vec::with_capacity(rest.len());
    while let Some(pos) = rest.windows(from.len()).position(|w| w == from) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(to);
        rest = &rest[pos + from.len()..];
    }
    out.extend_from_slice(rest);
    OsString::from_vec(out)
}

#[cfg(not(unix))]
fn replace_os(arg: &OsStr, from: &str, to: &OsStr) -> OsString {
    arg.to_string_lossy()
        .replace(from, &to.to_string_lossy())
        .into()
}

/// Shell-style exit code: the program's own code, or 128 + signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
