//! Launches external programs behind a `nice` prefix.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use super::error::ProcessError;
use super::handle::ProcessHandle;
use super::types::{Invocation, OutputSink, ProcessInput};

/// Default `nice` executable.
pub const DEFAULT_NICE: &str = "nice";

/// Spawns programs as `nice -n <level> <program> <args...>`.
///
/// The runner keeps no per-process state and can be shared freely.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    nice_program: PathBuf,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_NICE)
    }
}

impl ProcessRunner {
    /// Creates a runner using the given `nice` executable.
    pub fn new(nice_program: impl Into<PathBuf>) -> Self {
        Self {
            nice_program: nice_program.into(),
        }
    }

    /// Path of the `nice` executable used as prefix.
    pub fn nice_program(&self) -> &Path {
        &self.nice_program
    }

    /// Returns the exact argument vector that [`spawn`](Self::spawn) executes.
    pub fn command_line(&self, invocation: &Invocation, niceness: i32) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(invocation.args.len() + 4);
        argv.push(self.nice_program.clone().into_os_string());
        argv.push("-n".into());
        argv.push(niceness.to_string().into());
        argv.push(invocation.program.clone());
        argv.extend(invocation.args.iter().cloned());
        argv
    }

    /// Launches `invocation` and returns without waiting for it.
    ///
    /// Standard error is merged into `sink`. The target program is resolved
    /// before spawning so a missing encoder is reported as
    /// [`ProcessError::Launch`] rather than as a later exit code from `nice`.
    pub fn spawn(
        &self,
        invocation: &Invocation,
        niceness: i32,
        input: ProcessInput,
        sink: OutputSink,
    ) -> Result<ProcessHandle, ProcessError> {
        if resolve_program(Path::new(&invocation.program)).is_none() {
            return Err(ProcessError::launch(
                invocation.display_program(),
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "executable not found in PATH",
                ),
            ));
        }

        let argv = self.command_line(invocation, niceness);
        let stdin = input.into_stdio()?;
        let wiring = sink.into_wiring()?;

        let mut command = Command::new(&argv[0]);
        command
            .args(&argv[1..])
            .stdin(stdin)
            .stdout(wiring.stdout)
            .stderr(wiring.stderr);

        let child = command.spawn().map_err(|e| {
            ProcessError::launch(self.nice_program.to_string_lossy().to_string(), e)
        })?;

        debug!(
            program = %invocation.display_program(),
            pid = ?child.id(),
            argv = ?argv,
            "Spawned process"
        );

        Ok(ProcessHandle::new(
            invocation.display_program(),
            argv,
            child,
            wiring.reader,
        ))
    }
}

/// Finds an executable by path or by searching `PATH`.
pub fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
