//! SSH private key resolution

use std::env;
use std::path::{Path, PathBuf};

use russh::keys::{PrivateKey, decode_secret_key, load_secret_key};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Where the private key comes from
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Explicit path to key file
    Path(PathBuf),
    /// Base64-encoded key in the named environment variable
    Env(String),
    /// OpenSSH/PEM key text
    Inline(SecretString),
}

impl KeySource {
    /// Load and decode the private key
    ///
    /// # Errors
    /// Returns `KeyError` if the key is missing, unreadable, too widely
    /// readable, or cannot be decoded with the given passphrase.
    pub fn resolve(&self, passphrase: Option<&str>) -> Result<PrivateKey, KeyError> {
        match self {
            KeySource::Path(path) => {
                if !path.exists() {
                    return Err(KeyError::NotFound(path.display().to_string()));
                }
                validate_key_permissions(path)?;
                debug!(path = %path.display(), "loading private key");
                load_secret_key(path, passphrase).map_err(|e| KeyError::Decode(e.to_string()))
            }
            KeySource::Env(var_name) => {
                let encoded =
                    env::var(var_name).map_err(|_| KeyError::EnvNotSet(var_name.clone()))?;
                let pem = SecretString::new(decode_base64_key(&encoded)?);
                debug!(var = %var_name, "decoding private key from environment");
                decode_secret_key(pem.expose_secret(), passphrase)
                    .map_err(|e| KeyError::Decode(e.to_string()))
            }
            KeySource::Inline(pem) => decode_secret_key(pem.expose_secret(), passphrase)
                .map_err(|e| KeyError::Decode(e.to_string())),
        }
    }
}

/// Key resolution errors
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("environment variable {0} not set")]
    EnvNotSet(String),

    #[error("invalid base64 encoding")]
    InvalidBase64,

    #[error("key file permissions too open: {0} (should be 600)")]
    BadPermissions(String),

    #[error("key file not found: {0}")]
    NotFound(String),

    #[error("cannot decode private key: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn decode_base64_key(input: &str) -> Result<String, KeyError> {
    use base64::Engine;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|_| KeyError::InvalidBase64)?;
    String::from_utf8(bytes).map_err(|_| KeyError::InvalidBase64)
}

#[cfg(unix)]
fn validate_key_permissions(path: &Path) -> Result<(), KeyError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode();

    // group and other bits must be clear
    if mode & 0o077 != 0 {
        return Err(KeyError::BadPermissions(path.display().to_string()));
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_key_permissions(_path: &Path) -> Result<(), KeyError> {
    Ok(())
}
