//! Types describing how an external program is invoked and wired.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{PipeReader, PipeWriter};
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// A program and its ordered arguments, before niceness wrapping.
///
/// Arguments are OS strings so file names reach the program byte for byte,
/// whatever their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path.
    pub program: OsString,
    /// Arguments passed after the program name.
    pub args: Vec<OsString>,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Appends a path argument, unchanged.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path)
    }

    /// Program name for logs and error messages.
    pub fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Where a child's standard input comes from.
#[derive(Debug, Default)]
pub enum ProcessInput {
    /// No input (`/dev/null`).
    #[default]
    Null,
    /// Read from a file opened at launch time.
    File(PathBuf),
    /// Read end of a previous stage's output pipe.
    Pipe(PipeReader),
}

impl ProcessInput {
    pub(crate) fn into_stdio(self) -> std::io::Result<Stdio> {
        Ok(match self {
            Self::Null => Stdio::null(),
            Self::File(path) => Stdio::from(File::open(path)?),
            Self::Pipe(reader) => Stdio::from(reader),
        })
    }
}

/// Where a child's standard output goes. Standard error always follows it.
#[derive(Debug, Default)]
pub enum OutputSink {
    /// The parent's standard output.
    #[default]
    Inherit,
    /// An already open file (e.g. a per-job log).
    File(File),
    /// A fresh pipe; the read end is kept on the process handle.
    Pipe,
}

/// Stdio triple produced from an [`OutputSink`].
pub(crate) struct SinkWiring {
    pub stdout: Stdio,
    pub stderr: Stdio,
    pub reader: Option<PipeReader>,
}

impl OutputSink {
    pub(crate) fn into_wiring(self) -> std::io::Result<SinkWiring> {
        match self {
            Self::Inherit => Ok(SinkWiring {
                stdout: Stdio::inherit(),
                stderr: parent_stdout()?,
                reader: None,
            }),
            Self::File(file) => {
                let stderr = file.try_clone()?;
                Ok(SinkWiring {
                    stdout: Stdio::from(file),
                    stderr: Stdio::from(stderr),
                    reader: None,
                })
            }
            Self::Pipe => {
                let (reader, writer): (PipeReader, PipeWriter) = std::io::pipe()?;
                let stderr = writer.try_clone()?;
                Ok(SinkWiring {
                    stdout: Stdio::from(writer),
                    stderr: Stdio::from(stderr),
                    reader: Some(reader),
                })
            }
        }
    }
}

#[cfg(unix)]
fn parent_stdout() -> std::io::Result<Stdio> {
    use std::os::fd::AsFd;

    let fd = std::io::stdout().as_fd().try_clone_to_owned()?;
    Ok(Stdio::from(fd))
}

#[cfg(not(unix))]
fn parent_stdout() -> std::io::Result<Stdio> {
    Ok(Stdio::inherit())
}
