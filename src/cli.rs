//! Command-line definitions for the `ni-mouse-link` binaries.

use std::io::BufRead;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::client::SocketClient;
use crate::forward::{forward_lines, forward_messages};
use crate::listener::DEFAULT_MAX_DATAGRAM;
use crate::logging::LogFormat;
use crate::{AppError, LinkConfig, Result};

/// Arguments of the `ni-mouse-link` sender.
#[derive(Debug, Parser)]
#[command(
    name = "ni-mouse-link",
    about = "Send payloads to the ni-mouse receiver socket",
    version,
    long_about = None
)]
pub struct SenderCli {
    /// Path to the TOML configuration file.
    #[arg(long, conflicts_with = "socket", required_unless_present = "socket")]
    pub config: Option<PathBuf>,

    /// Receiver socket path, used instead of a configuration file.
    #[arg(long)]
    pub socket: Option<PathBuf>,

    /// Payload to send; may be repeated. Reads stdin lines when omitted.
    #[arg(long = "message", short = 'm')]
    pub messages: Vec<String>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl SenderCli {
    /// Resolve the link configuration from `--config` or `--socket`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither is set (only reachable when the
    /// struct is built by hand) or the configuration is invalid.
    pub fn link_config(&self) -> Result<LinkConfig> {
        match (&self.config, &self.socket) {
            (Some(path), _) => LinkConfig::load_from_path(path),
            (None, Some(socket)) => LinkConfig::for_socket(socket.clone()),
            (None, None) => Err(AppError::Config(
                "either --config or --socket is required".into(),
            )),
        }
    }

    /// Open the configured client, forward the messages (or `input` lines
    /// when no `--message` was given), and close it.
    ///
    /// Returns the number of datagrams sent.
    ///
    /// # Errors
    ///
    /// Returns the first configuration, input, or socket error.
    pub fn run(&self, input: impl BufRead) -> Result<usize> {
        let config = self.link_config()?;
        let mut client = config.client();
        client.open()?;

        let sent = if self.messages.is_empty() {
            forward_lines(input, &mut client)?
        } else {
            forward_messages(&self.messages, &mut client)?
        };

        client.close()?;
        info!(datagrams = sent, "done");
        Ok(sent)
    }
}

/// Arguments of the `ni-mouse-link-listen` receiver.
#[derive(Debug, Parser)]
#[command(
    name = "ni-mouse-link-listen",
    about = "Print datagrams received on a Unix socket path",
    version,
    long_about = None
)]
pub struct ListenCli {
    /// Socket path to bind; must not exist yet.
    #[arg(long)]
    pub socket: PathBuf,

    /// Receive buffer size in bytes; longer datagrams are truncated.
    #[arg(long, default_value_t = DEFAULT_MAX_DATAGRAM)]
    pub max_datagram: usize,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
