//! SSH connections using the russh crate

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use russh::keys::{PrivateKey, PrivateKeyWithHashAlg, ssh_key};
use russh::{ChannelMsg, Disconnect, client};
use secrecy::{ExposeSecret, SecretString};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::error::{ConnectionError, RunError};
use crate::host_keys::HostKeyPolicy;
use crate::params::{ConnectionParameters, Credential};
use crate::result::{ExecutionResult, UNKNOWN_EXIT_CODE};
use crate::traits::{Connector, RemoteSession};

/// Extended data stream carrying stderr
const SSH_EXTENDED_DATA_STDERR: u32 = 1;

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
}

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // known_hosts is read and appended with blocking file I/O
        let policy = self.policy.clone();
        let host = self.host.clone();
        let port = self.port;
        let key = server_public_key.clone();

        let verdict = tokio::task::spawn_blocking(move || policy.verify(&host, port, &key));

        match verdict.await {
            Ok(verdict) => Ok(verdict.is_accepted()),
            Err(e) => {
                warn!(error = %e, "host key verification task failed");
                Ok(false)
            }
        }
    }
}

enum Auth<'a> {
    Password(&'a SecretString),
    Key(PrivateKey),
}

/// Opens SSH sessions described by [`ConnectionParameters`]
#[derive(Debug, Clone)]
pub struct SshConnector {
    params: ConnectionParameters,
}

impl SshConnector {
    pub fn new(params: ConnectionParameters) -> Self {
        Self { params }
    }

    /// Get connection parameters
    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    fn prepare_auth(&self) -> Result<Auth<'_>, ConnectionError> {
        match self.params.credential() {
            Credential::Password(password) => Ok(Auth::Password(password)),
            Credential::Key { source, passphrase } => {
                let passphrase = passphrase.as_ref().map(|p| p.expose_secret().as_str());
                Ok(Auth::Key(source.resolve(passphrase)?))
            }
        }
    }

    /// Connect, verify the host key and authenticate
    async fn establish(&self) -> Result<SshSession, ConnectionError> {
        let host = self.params.host();
        let port = self.params.port();
        let user = self.params.username();

        // Resolve keys before touching the network
        let auth = self.prepare_auth()?;

        info!(host, port, user, "connecting to SSH");

        let config = Arc::new(client::Config::default());
        let handler = SshClientHandler {
            host: host.to_string(),
            port,
            policy: self.params.host_key_policy().clone(),
        };

        let mut handle = client::connect(config, (host, port), handler)
            .await
            .map_err(|e| match e {
                russh::Error::UnknownKey => ConnectionError::HostKeyRejected {
                    host: host.to_string(),
                },
                other => ConnectionError::Unreachable {
                    host: host.to_string(),
                    port,
                    reason: other.to_string(),
                },
            })?;

        let auth_failed = |reason: String| ConnectionError::Authentication {
            user: user.to_string(),
            reason,
        };

        let auth_res = match auth {
            Auth::Password(password) => handle
                .authenticate_password(user, password.expose_secret())
                .await
                .map_err(|e| auth_failed(e.to_string()))?,
            Auth::Key(key) => {
                let hash_alg = handle
                    .best_supported_rsa_hash()
                    .await
                    .ok()
                    .flatten()
                    .flatten();
                handle
                    .authenticate_publickey(
                        user,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(|e| auth_failed(e.to_string()))?
            }
        };

        if !auth_res.success() {
            return Err(auth_failed("credential rejected by server".to_string()));
        }

        info!(host, "SSH connected and authenticated");

        Ok(SshSession {
            host: host.to_string(),
            handle: Some(handle),
        })
    }
}

#[async_trait]
impl Connector for SshConnector {
    type Session = SshSession;

    #[instrument(skip(self), fields(host = %self.params.host()))]
    async fn connect(&self) -> Result<SshSession, ConnectionError> {
        let connect_timeout = self.params.timeout();

        match timeout(connect_timeout, self.establish()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?connect_timeout, "connect timed out");
                Err(ConnectionError::TimedOut {
                    timeout: connect_timeout,
                })
            }
        }
    }

    fn target(&self) -> String {
        format!(
            "{}@{}:{}",
            self.params.username(),
            self.params.host(),
            self.params.port()
        )
    }
}

/// Authenticated SSH connection
///
/// Dropping the session without [`RemoteSession::close`] still tears down
/// the underlying connection.
pub struct SshSession {
    host: String,
    handle: Option<client::Handle<SshClientHandler>>,
}

impl std::fmt::Debug for SshSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshSession")
            .field("host", &self.host)
            .field("open", &self.handle.is_some())
            .finish()
    }
}

#[async_trait]
impl RemoteSession for SshSession {
    #[instrument(skip(self, cmd), fields(host = %self.host))]
    async fn exec(&mut self, cmd: &str) -> Result<ExecutionResult, RunError> {
        let handle = self
            .handle
            .as_mut()
            .ok_or_else(|| RunError::Execution("session already closed".to_string()))?;

        debug!(command = %cmd, "executing remote command");

        let start = Instant::now();

        let mut channel = handle
            .channel_open_session()
            .await
            .map_err(|e| RunError::Execution(format!("cannot open session channel: {e}")))?;

        channel
            .exec(true, cmd)
            .await
            .map_err(|e| RunError::Execution(e.to_string()))?;

        let mut exit_code = UNKNOWN_EXIT_CODE;
        let mut exit_signal = None;
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        // Exit status may arrive after EOF, so drain until the channel closes
        loop {
            match channel.wait().await {
                Some(ChannelMsg::Data { data }) => {
                    stdout.extend_from_slice(&data);
                }
                Some(ChannelMsg::ExtendedData { data, ext }) => {
                    if ext == SSH_EXTENDED_DATA_STDERR {
                        stderr.extend_from_slice(&data);
                    }
                }
                Some(ChannelMsg::ExitStatus { exit_status }) => {
                    exit_code = exit_status.cast_signed();
                }
                Some(ChannelMsg::ExitSignal { signal_name, .. }) => {
                    exit_signal = Some(format!("{signal_name:?}"));
                }
                Some(ChannelMsg::Failure) => {
                    return Err(RunError::Execution(
                        "server refused to start the command".to_string(),
                    ));
                }
                Some(ChannelMsg::Close) | None => break,
                _ => {}
            }
        }

        let duration = start.elapsed();

        debug!(
            command = %cmd,
            status = exit_code,
            signal = ?exit_signal,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            duration = ?duration,
            "remote command completed"
        );

        Ok(ExecutionResult {
            stdout,
            stderr,
            exit_code,
            exit_signal,
            duration,
        })
    }

    async fn close(&mut self) -> Result<(), RunError> {
        if let Some(handle) = self.handle.take() {
            handle
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
                .map_err(|e| RunError::Execution(format!("disconnect failed: {e}")))?;
            info!(host = %self.host, "SSH disconnected");
        }
        Ok(())
    }
}
