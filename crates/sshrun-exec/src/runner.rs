//! One-shot remote command runner

use std::io::Write;

use tracing::{debug, instrument, warn};

use crate::error::RunError;
use crate::params::ConnectionParameters;
use crate::relay::relay_output;
use crate::result::ExecutionResult;
use crate::ssh::SshConnector;
use crate::traits::{Connector, RemoteSession};

/// Runs a single command over a fresh connection
///
/// Each call connects, executes, drains both output streams and disconnects.
/// The connection is closed on every path once it has been established.
#[derive(Debug, Clone)]
pub struct RemoteCommandRunner<C> {
    connector: C,
}

impl RemoteCommandRunner<SshConnector> {
    /// Runner over SSH
    pub fn ssh(params: ConnectionParameters) -> Self {
        Self::new(SshConnector::new(params))
    }
}

impl<C: Connector> RemoteCommandRunner<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Execute `command` and collect its output
    ///
    /// # Errors
    /// `RunError::InvalidCommand` for a blank command (no connection is made),
    /// `RunError::Connection` if connecting or authenticating fails,
    /// `RunError::Execution` if the command cannot be started
    #[instrument(skip(self), fields(remote = %self.connector.target()))]
    pub async fn run(&self, command: &str) -> Result<ExecutionResult, RunError> {
        if command.trim().is_empty() {
            return Err(RunError::InvalidCommand);
        }

        let mut session = self.connector.connect().await?;

        let outcome = session.exec(command).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "failed to close connection cleanly");
        }

        if let Ok(result) = &outcome {
            debug!(status = result.exit_code, "run finished");
        }

        outcome
    }

    /// Execute `command`, then write its stdout to `out` and its stderr
    /// (if any) to `err`
    ///
    /// # Errors
    /// Same as [`Self::run`], plus `RunError::Relay` if writing fails
    pub async fn run_relayed<O, E>(
        &self,
        command: &str,
        out: &mut O,
        err: &mut E,
    ) -> Result<ExecutionResult, RunError>
    where
        O: Write + ?Sized,
        E: Write + ?Sized,
    {
        let result = self.run(command).await?;
        relay_output(&result, out, err)?;
        Ok(result)
    }
}
