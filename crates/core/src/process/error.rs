//! Error types for the process module.

use thiserror::Error;

/// Errors raised while launching or awaiting an external program.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (missing executable, permission denied).
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program started but exited unsuccessfully.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("{program} exited with status {}", display_code(.code))]
    Conversion { program: String, code: Option<i32> },

    /// I/O error while wiring or awaiting the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

impl ProcessError {
    /// Creates a launch error for `program`.
    pub fn launch(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            program: program.into(),
            source,
        }
    }

    /// Whether the program never started.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::Launch { .. })
    }
}
