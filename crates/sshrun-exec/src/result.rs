//! Result type for remote command execution

use std::borrow::Cow;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exit code reported when the server sent no exit status
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Output and status of one remote command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Raw stdout bytes, in order
    pub stdout: Vec<u8>,
    /// Raw stderr bytes, in order
    pub stderr: Vec<u8>,
    /// Remote exit status, or [`UNKNOWN_EXIT_CODE`]
    pub exit_code: i32,
    /// Signal name if the remote process was killed by a signal
    pub exit_signal: Option<String>,
    /// Time from exec request to channel close
    pub duration: Duration,
}

impl ExecutionResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    #[must_use]
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    #[must_use]
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Exit code as a process exit status (low 8 bits)
    #[must_use]
    pub fn process_exit_code(&self) -> u8 {
        (self.exit_code & 0xff) as u8
    }
}
