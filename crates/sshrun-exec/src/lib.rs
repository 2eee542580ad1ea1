//! sshrun-exec: one-shot remote command execution
//!
//! Connects to a single host over SSH, runs one command, collects its output
//! streams and exit status, and releases the connection.

pub mod error;
pub mod host_keys;
pub mod keys;
pub mod params;
pub mod relay;
pub mod result;
pub mod runner;
pub mod ssh;
pub mod traits;

pub use error::{ConnectionError, ErrorKind, ParamsError, RunError};
pub use host_keys::HostKeyPolicy;
pub use keys::KeySource;
pub use params::{ConnectionParameters, Credential};
pub use result::ExecutionResult;
pub use runner::RemoteCommandRunner;
