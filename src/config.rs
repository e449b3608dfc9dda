//! Link configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::UnixDatagramClient;
use crate::{AppError, Result};

/// Longest socket path accepted, in bytes.
///
/// `sockaddr_un.sun_path` holds 108 bytes on Linux including the trailing
/// NUL.
pub const MAX_SOCKET_PATH_BYTES: usize = 107;

/// Link configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct LinkConfig {
    /// Filesystem path of the receiving datagram socket.
    pub socket_path: PathBuf,
    /// Upper bound on a single payload; unset leaves the limit to the
    /// transport.
    #[serde(default)]
    pub max_payload_bytes: Option<usize>,
}

impl LinkConfig {
    /// Build a configuration for `socket_path` with no payload limit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the path fails validation.
    pub fn for_socket(socket_path: impl Into<PathBuf>) -> Result<Self> {
        let config = Self {
            socket_path: socket_path.into(),
            max_payload_bytes: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Construct an unopened client from this configuration.
    #[must_use]
    pub fn client(&self) -> UnixDatagramClient {
        let client = UnixDatagramClient::new(self.socket_path.clone());
        match self.max_payload_bytes {
            Some(limit) => client.with_max_payload(limit),
            None => client,
        }
    }

    fn validate(&self) -> Result<()> {
        let len = self.socket_path.as_os_str().len();
        if len == 0 {
            return Err(AppError::Config("socket_path must not be empty".into()));
        }

        if len > MAX_SOCKET_PATH_BYTES {
            return Err(AppError::Config(format!(
                "socket_path is {len} bytes, limit is {MAX_SOCKET_PATH_BYTES}"
            )));
        }

        if self.max_payload_bytes == Some(0) {
            return Err(AppError::Config(
                "max_payload_bytes must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
