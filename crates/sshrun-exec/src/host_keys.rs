//! Host key verification policies

use std::path::{Path, PathBuf};

use russh::keys::known_hosts::learn_known_hosts_path;
use russh::keys::{HashAlg, PublicKey, check_known_hosts_path};
use tracing::{info, warn};

/// How the server's host key is verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept any key without verification (like `StrictHostKeyChecking=no`)
    AcceptAny,
    /// Accept known keys, remember unknown hosts, reject changed keys
    TrustOnFirstUse { known_hosts: PathBuf },
    /// Accept only keys already in `known_hosts`
    Strict { known_hosts: PathBuf },
}

impl Default for HostKeyPolicy {
    fn default() -> Self {
        HostKeyPolicy::TrustOnFirstUse {
            known_hosts: default_known_hosts(),
        }
    }
}

/// `~/.ssh/known_hosts`
pub fn default_known_hosts() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".ssh")
        .join("known_hosts")
}

/// Outcome of checking a presented key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Key matched or policy accepts everything
    Accepted,
    /// Host was unknown and its key has been recorded
    Learned,
    Rejected,
}

impl Verdict {
    #[must_use]
    pub fn is_accepted(self) -> bool {
        !matches!(self, Verdict::Rejected)
    }
}

impl HostKeyPolicy {
    /// Check `key` presented by `host:port`
    ///
    /// Reads and may append to `known_hosts` with blocking file I/O; call it
    /// from a blocking context.
    pub fn verify(&self, host: &str, port: u16, key: &PublicKey) -> Verdict {
        let fingerprint = key.fingerprint(HashAlg::Sha256);

        match self {
            HostKeyPolicy::AcceptAny => {
                warn!(host, port, %fingerprint, "accepting host key without verification");
                Verdict::Accepted
            }
            HostKeyPolicy::Strict { known_hosts } => {
                match lookup(host, port, key, known_hosts) {
                    Lookup::Match => Verdict::Accepted,
                    Lookup::Unknown => {
                        warn!(host, port, %fingerprint, known_hosts = %known_hosts.display(), "host key not in known_hosts");
                        Verdict::Rejected
                    }
                    Lookup::Changed | Lookup::Unreadable => Verdict::Rejected,
                }
            }
            HostKeyPolicy::TrustOnFirstUse { known_hosts } => {
                match lookup(host, port, key, known_hosts) {
                    Lookup::Match => Verdict::Accepted,
                    Lookup::Unknown => match learn_known_hosts_path(host, port, key, known_hosts) {
                        Ok(()) => {
                            info!(host, port, %fingerprint, known_hosts = %known_hosts.display(), "recorded new host key");
                            Verdict::Learned
                        }
                        Err(e) => {
                            warn!(host, port, error = %e, "failed to record host key");
                            Verdict::Rejected
                        }
                    },
                    Lookup::Changed | Lookup::Unreadable => Verdict::Rejected,
                }
            }
        }
    }
}

enum Lookup {
    Match,
    Unknown,
    Changed,
    Unreadable,
}

fn lookup(host: &str, port: u16, key: &PublicKey, known_hosts: &Path) -> Lookup {
    if !known_hosts.exists() {
        return Lookup::Unknown;
    }

    match check_known_hosts_path(host, port, key, known_hosts) {
        Ok(true) => Lookup::Match,
        Ok(false) => Lookup::Unknown,
        Err(russh::keys::Error::KeyChanged { line }) => {
            warn!(
                host,
                port,
                line,
                known_hosts = %known_hosts.display(),
                "host key changed; refusing to connect"
            );
            Lookup::Changed
        }
        Err(e) => {
            warn!(host, port, error = %e, "cannot read known_hosts");
            Lookup::Unreadable
        }
    }
}
