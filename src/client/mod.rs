//! Local socket client abstraction.
//!
//! The [`SocketClient`] trait is the seam between the tracking pipeline that
//! produces payloads and the transport that carries them to the receiving
//! process. [`unix::UnixDatagramClient`] is the Unix-domain datagram
//! implementation.

pub mod unix;

use std::os::fd::RawFd;

use serde::Serialize;

use crate::Result;

pub use unix::UnixDatagramClient;

/// Observable lifecycle stage of a client connection.
///
/// Transitions run forward only: `Unopened -> Open -> Closed`. A client may
/// also go straight from `Unopened` to `Closed` when closed without opening.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConnectionState {
    /// No socket has been acquired yet.
    Unopened,
    /// A socket is held and connected to the target path.
    Open,
    /// The socket was released; the client accepts no further sends.
    Closed,
}

/// Transport-agnostic producer side of a local IPC channel.
pub trait SocketClient {
    /// Acquire the socket and fix its destination.
    ///
    /// Returns the OS descriptor of the open socket.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the OS refuses the socket or the
    /// destination, `AppError::AlreadyOpen` on re-entry, and
    /// `AppError::Closed` once the client has been closed.
    fn open(&mut self) -> Result<RawFd>;

    /// Transmit `payload` as a single datagram.
    ///
    /// Returns the number of bytes handed to the transport.
    ///
    /// # Errors
    ///
    /// Returns a usage error (`NotOpen`, `Closed`, `PayloadTooLarge`) without
    /// touching the socket, or `AppError::Transport` if the send fails.
    fn send(&mut self, payload: &[u8]) -> Result<usize>;

    /// Release the socket. Calling this more than once is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` if the OS reports a failure while
    /// releasing the descriptor.
    fn close(&mut self) -> Result<()>;

    /// Current lifecycle stage.
    fn state(&self) -> ConnectionState;

    /// Serialize `value` as JSON and transmit it as one datagram.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Serialize` if encoding fails, otherwise the same
    /// errors as [`SocketClient::send`].
    fn send_json<T>(&mut self, value: &T) -> Result<usize>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(value)?;
        self.send(&payload)
    }
}
