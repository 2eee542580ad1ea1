//! Connection parameters for a single remote invocation

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ParamsError;
use crate::host_keys::HostKeyPolicy;
use crate::keys::KeySource;

/// Default SSH port
pub const DEFAULT_PORT: u16 = 22;

/// Default connect timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How to authenticate as `username`
#[derive(Debug, Clone)]
pub enum Credential {
    /// Password authentication
    Password(SecretString),
    /// Public key authentication
    Key {
        source: KeySource,
        passphrase: Option<SecretString>,
    },
}

/// Validated, immutable connection parameters
///
/// Built with [`ConnectionParametersBuilder`].
#[derive(Debug, Clone)]
pub struct ConnectionParameters {
    host: String,
    port: u16,
    username: String,
    credential: Credential,
    timeout: Duration,
    host_key_policy: HostKeyPolicy,
}

impl ConnectionParameters {
    /// Start building parameters with the required fields
    pub fn builder(
        host: impl Into<String>,
        username: impl Into<String>,
        credential: Credential,
    ) -> ConnectionParametersBuilder {
        ConnectionParametersBuilder::new(host, username, credential)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Bound on connect + handshake + authentication
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn host_key_policy(&self) -> &HostKeyPolicy {
        &self.host_key_policy
    }
}

/// Builder for [`ConnectionParameters`]
#[derive(Debug)]
pub struct ConnectionParametersBuilder {
    host: String,
    port: u16,
    username: String,
    credential: Credential,
    timeout: Duration,
    host_key_policy: HostKeyPolicy,
}

impl ConnectionParametersBuilder {
    /// Create builder with required fields
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        credential: Credential,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            credential,
            timeout: DEFAULT_TIMEOUT,
            host_key_policy: HostKeyPolicy::default(),
        }
    }

    /// Set custom port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set connect timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set host key verification policy
    #[must_use]
    pub fn host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key_policy = policy;
        self
    }

    /// Validate and build
    ///
    /// # Errors
    /// Returns `ParamsError` if host or username is blank or the timeout is zero
    pub fn build(self) -> Result<ConnectionParameters, ParamsError> {
        if self.host.trim().is_empty() {
            return Err(ParamsError::EmptyHost);
        }
        if self.username.trim().is_empty() {
            return Err(ParamsError::EmptyUsername);
        }
        if self.timeout.is_zero() {
            return Err(ParamsError::ZeroTimeout);
        }

        Ok(ConnectionParameters {
            host: self.host,
            port: self.port,
            username: self.username,
            credential: self.credential,
            timeout: self.timeout,
            host_key_policy: self.host_key_policy,
        })
    }
}
