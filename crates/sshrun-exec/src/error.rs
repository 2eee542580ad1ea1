//! Error types for sshrun-exec

use std::time::Duration;

use thiserror::Error;

use crate::keys::KeyError;

/// Errors that can occur while running a remote command
#[derive(Error, Debug)]
pub enum RunError {
    /// Could not establish an authenticated connection
    #[error("connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// The remote command could not be started
    #[error("command execution failed: {0}")]
    Execution(String),

    /// Command line was empty
    #[error("no command given")]
    InvalidCommand,

    /// Writing captured output to the local streams failed
    #[error("failed to relay output: {0}")]
    Relay(#[from] std::io::Error),
}

/// Coarse classification of a [`RunError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Execution,
    Local,
}

impl RunError {
    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::Connection(_) => ErrorKind::Connection,
            RunError::Execution(_) => ErrorKind::Execution,
            RunError::InvalidCommand | RunError::Relay(_) => ErrorKind::Local,
        }
    }
}

/// Reasons a connection attempt fails
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Host could not be reached or the SSH handshake failed
    #[error("{host}:{port} unreachable: {reason}")]
    Unreachable {
        host: String,
        port: u16,
        reason: String,
    },

    /// Connect and authentication did not finish in time
    #[error("timed out after {timeout:?}")]
    TimedOut {
        /// Connect timeout that was exceeded
        timeout: Duration,
    },

    /// Server presented a host key the policy refused
    #[error("host key for {host} rejected")]
    HostKeyRejected { host: String },

    /// Server rejected the credential
    #[error("authentication failed for {user}: {reason}")]
    Authentication { user: String, reason: String },

    /// Private key could not be loaded
    #[error("SSH key error: {0}")]
    Key(#[from] KeyError),
}

/// Invalid connection parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("host must not be empty")]
    EmptyHost,

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("timeout must be positive")]
    ZeroTimeout,
}
