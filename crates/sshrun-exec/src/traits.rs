//! Connection traits driven by [`crate::runner::RemoteCommandRunner`]

use async_trait::async_trait;

use crate::error::{ConnectionError, RunError};
use crate::result::ExecutionResult;

/// Opens authenticated sessions to one remote host
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: RemoteSession;

    /// Connect and authenticate
    async fn connect(&self) -> Result<Self::Session, ConnectionError>;

    /// Human-readable target, for logs
    fn target(&self) -> String;
}

/// An established, authenticated connection
#[async_trait]
pub trait RemoteSession: Send {
    /// Run `cmd` and collect its output until the channel closes
    async fn exec(&mut self, cmd: &str) -> Result<ExecutionResult, RunError>;

    /// Release the connection
    async fn close(&mut self) -> Result<(), RunError>;
}
