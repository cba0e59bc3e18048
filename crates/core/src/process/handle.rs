//! Handle on a running external program.

use std::ffi::OsString;
use std::io::{PipeReader, Read};
use std::process::ExitStatus;
use tokio::process::Child;
use tracing::{debug, warn};

use super::error::ProcessError;

/// Exit status plus whatever the program wrote to its merged output pipe.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Program name as invoked (without the niceness prefix).
    pub program: String,
    /// Exit status.
    pub status: ExitStatus,
    /// Merged stdout/stderr, lossily decoded.
    pub output: String,
}

impl ProcessOutput {
    /// Converts a non-zero exit into a conversion error.
    pub fn into_result(self) -> Result<Self, ProcessError> {
        check_status(&self.program, self.status)?;
        Ok(self)
    }
}

/// Maps an exit status to `Ok(())` or [`ProcessError::Conversion`].
pub fn check_status(program: &str, status: ExitStatus) -> Result<(), ProcessError> {
    if status.success() {
        Ok(())
    } else {
        Err(ProcessError::Conversion {
            program: program.to_string(),
            code: status.code(),
        })
    }
}

/// A spawned external program.
///
/// Spawning never blocks; completion is observed through [`wait`](Self::wait),
/// [`finish`](Self::finish) or [`wait_with_output`](Self::wait_with_output).
/// When the process was launched with [`OutputSink::Pipe`](super::OutputSink::Pipe)
/// the read end must either be handed to the next stage via
/// [`take_output`](Self::take_output) or drained with `wait_with_output`,
/// otherwise a chatty program can stall on a full pipe.
#[must_use = "a spawned process must be waited on and its exit status checked"]
#[derive(Debug)]
pub struct ProcessHandle {
    program: String,
    command_line: Vec<OsString>,
    child: Child,
    output: Option<PipeReader>,
}

impl ProcessHandle {
    pub(crate) fn new(
        program: String,
        command_line: Vec<OsString>,
        child: Child,
        output: Option<PipeReader>,
    ) -> Self {
        Self {
            program,
            command_line,
            child,
            output,
        }
    }

    /// Program name as invoked (without the niceness prefix).
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector, niceness prefix included.
    pub fn command_line(&self) -> &[OsString] {
        &self.command_line
    }

    /// OS process id, if the process has not been reaped yet.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Takes the read end of the merged output pipe, if any.
    pub fn take_output(&mut self) -> Option<PipeReader> {
        self.output.take()
    }

    /// Polls for completion without blocking.
    pub fn try_status(&mut self) -> Result<Option<ExitStatus>, ProcessError> {
        Ok(self.child.try_wait()?)
    }

    /// Waits for the process to exit and returns its raw status.
    pub async fn wait(&mut self) -> Result<ExitStatus, ProcessError> {
        let status = self.child.wait().await?;
        debug!(program = %self.program, ?status, "Process exited");
        Ok(status)
    }

    /// Waits for the process and fails on a non-zero exit.
    ///
    /// An untaken output pipe is closed first so the program cannot block on it.
    pub async fn finish(mut self) -> Result<(), ProcessError> {
        drop(self.output.take());
        let status = self.wait().await?;
        if !status.success() {
            warn!(program = %self.program, code = ?status.code(), "Process failed");
        }
        check_status(&self.program, status)
    }

    /// Waits for the process while draining its output pipe.
    ///
    /// Returns an empty `output` when the process was not launched with a pipe sink.
    pub async fn wait_with_output(mut self) -> Result<ProcessOutput, ProcessError> {
        let reader_task = self.output.take().map(|mut reader| {
            tokio::task::spawn_blocking(move || {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).map(|_| buf)
            })
        });

        let status = self.wait().await?;

        let bytes = match reader_task {
            Some(task) => task.await.map_err(std::io::Error::other)??,
            None => Vec::new(),
        };

        Ok(ProcessOutput {
            program: self.program,
            status,
            output: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Terminates the process and reaps it.
    ///
    /// The caller is expected to treat a killed process as a failed conversion.
    pub async fn kill(&mut self) -> Result<(), ProcessError> {
        warn!(program = %self.program, pid = ?self.child.id(), "Killing process");
        self.child.kill().await?;
        Ok(())
    }
}
