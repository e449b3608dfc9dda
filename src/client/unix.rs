//! Unix-domain datagram client.
//!
//! Holds one `SOCK_DGRAM` socket connected to a filesystem path. The socket
//! is connectionless; `connect` only fixes the default destination so that
//! every send goes to the configured receiver.

use std::fmt;
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use nix::sys::socket::{getsockopt, sockopt};
use tracing::{debug, info, trace, warn};

use super::{ConnectionState, SocketClient};
use crate::errors::SocketOp;
use crate::{AppError, Result};

/// Socket ownership stage.
enum Handle {
    Unopened,
    Open(UnixDatagram),
    Closed,
}

/// Producer-side datagram client bound to a single socket path.
///
/// The client exclusively owns its socket. Dropping it releases a socket
/// that is still open; an unopened client performs no system call on drop.
pub struct UnixDatagramClient {
    path: PathBuf,
    max_payload: Option<usize>,
    handle: Handle,
}

impl UnixDatagramClient {
    /// Create a client for `path`. The path is stored verbatim and no socket
    /// is acquired until [`SocketClient::open`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_payload: None,
            handle: Handle::Unopened,
        }
    }

    /// Reject payloads larger than `limit` bytes before they reach the
    /// socket.
    #[must_use]
    pub fn with_max_payload(mut self, limit: usize) -> Self {
        self.max_payload = Some(limit);
        self
    }

    /// Target socket path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Configured payload limit, if any.
    #[must_use]
    pub fn max_payload(&self) -> Option<usize> {
        self.max_payload
    }

    /// Whether a socket is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.handle, Handle::Open(_))
    }

    /// Kernel send-buffer size (`SO_SNDBUF`) of the open socket.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotOpen` or `AppError::Closed` when no socket is
    /// held, or `AppError::Transport` if the OS query fails.
    pub fn send_buffer_size(&self) -> Result<usize> {
        match &self.handle {
            Handle::Open(socket) => send_buffer_size(socket),
            Handle::Unopened => Err(AppError::NotOpen),
            Handle::Closed => Err(AppError::Closed),
        }
    }

    fn connect(&self) -> Result<UnixDatagram> {
        let socket =
            UnixDatagram::unbound().map_err(|err| AppError::transport(SocketOp::Socket, &err))?;
        socket
            .connect(&self.path)
            .map_err(|err| AppError::transport(SocketOp::Connect, &err))?;
        Ok(socket)
    }
}

impl SocketClient for UnixDatagramClient {
    fn open(&mut self) -> Result<RawFd> {
        match self.handle {
            Handle::Open(_) => return Err(AppError::AlreadyOpen),
            Handle::Closed => return Err(AppError::Closed),
            Handle::Unopened => {}
        }

        info!(path = %self.path.display(), "opening socket");
        let socket = self.connect()?;
        log_send_buffer(&socket);

        let fd = socket.as_raw_fd();
        self.handle = Handle::Open(socket);
        Ok(fd)
    }

    fn send(&mut self, payload: &[u8]) -> Result<usize> {
        let socket = match &self.handle {
            Handle::Open(socket) => socket,
            Handle::Unopened => return Err(AppError::NotOpen),
            Handle::Closed => return Err(AppError::Closed),
        };

        if let Some(limit) = self.max_payload {
            if payload.len() > limit {
                return Err(AppError::PayloadTooLarge {
                    size: payload.len(),
                    limit,
                });
            }
        }

        let sent = socket
            .send(payload)
            .map_err(|err| AppError::transport(SocketOp::Send, &err))?;
        trace!(bytes = sent, "datagram sent");
        Ok(sent)
    }

    fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.handle, Handle::Closed) {
            Handle::Open(socket) => {
                info!(path = %self.path.display(), "closing socket");
                release(socket)
            }
            Handle::Unopened | Handle::Closed => {
                debug!(path = %self.path.display(), "close on socket that is not open");
                Ok(())
            }
        }
    }

    fn state(&self) -> ConnectionState {
        match self.handle {
            Handle::Unopened => ConnectionState::Unopened,
            Handle::Open(_) => ConnectionState::Open,
            Handle::Closed => ConnectionState::Closed,
        }
    }
}

impl Drop for UnixDatagramClient {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, path = %self.path.display(), "failed to release socket on drop");
        }
    }
}

impl fmt::Debug for UnixDatagramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnixDatagramClient")
            .field("path", &self.path)
            .field("max_payload", &self.max_payload)
            .field("state", &self.state())
            .finish()
    }
}

/// Close the descriptor explicitly so a failing `close(2)` is reported
/// instead of being swallowed by `Drop`.
fn release(socket: UnixDatagram) -> Result<()> {
    let fd = OwnedFd::from(socket).into_raw_fd();
    nix::unistd::close(fd).map_err(|errno| AppError::Transport {
        op: SocketOp::Close,
        code: Some(errno as i32),
        message: errno.desc().to_owned(),
    })
}

fn send_buffer_size(socket: &UnixDatagram) -> Result<usize> {
    getsockopt(socket, sockopt::SndBuf).map_err(|errno| AppError::Transport {
        op: SocketOp::Socket,
        code: Some(errno as i32),
        message: errno.desc().to_owned(),
    })
}

fn log_send_buffer(socket: &UnixDatagram) {
    match send_buffer_size(socket) {
        Ok(size) => debug!(send_buffer = size, "socket send buffer"),
        Err(err) => warn!(%err, "failed to query socket send buffer"),
    }
}
