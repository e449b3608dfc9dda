//! Error types shared across the crate.

use std::fmt::{Display, Formatter};
use std::io;

/// Shared crate result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Socket system operation that produced a transport failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SocketOp {
    /// Creating the socket resource.
    Socket,
    /// Fixing the default destination address.
    Connect,
    /// Transmitting a datagram.
    Send,
    /// Releasing the socket resource.
    Close,
    /// Binding a receiving socket to a path.
    Bind,
    /// Receiving a datagram.
    Recv,
}

impl SocketOp {
    /// Stable lowercase name of the operation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Socket => "socket",
            Self::Connect => "connect",
            Self::Send => "send",
            Self::Close => "close",
            Self::Bind => "bind",
            Self::Recv => "recv",
        }
    }
}

impl Display for SocketOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error enumeration covering transport, usage, and configuration failures.
#[derive(Debug)]
pub enum AppError {
    /// OS-level socket failure.
    Transport {
        /// Operation that failed.
        op: SocketOp,
        /// Raw OS error code, when the OS reported one.
        code: Option<i32>,
        /// Human-readable description of the failure.
        message: String,
    },
    /// `send` called before `open` succeeded.
    NotOpen,
    /// Operation attempted after the client was closed.
    Closed,
    /// `open` called on a client that is already open.
    AlreadyOpen,
    /// Payload exceeds the configured maximum datagram size.
    PayloadTooLarge {
        /// Size of the rejected payload in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Configuration parsing or validation failure.
    Config(String),
    /// Payload serialization failure.
    Serialize(String),
    /// Local I/O failure outside the socket (e.g. reading payload input).
    Io(String),
}

impl AppError {
    /// Build a transport error from an I/O error raised by `op`.
    #[must_use]
    pub fn transport(op: SocketOp, err: &io::Error) -> Self {
        Self::Transport {
            op,
            code: err.raw_os_error(),
            message: err.to_string(),
        }
    }

    /// Whether this error stems from calling the client incorrectly rather
    /// than from the OS.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::NotOpen | Self::Closed | Self::AlreadyOpen | Self::PayloadTooLarge { .. }
        )
    }

    /// Raw OS error code carried by a transport failure.
    #[must_use]
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Self::Transport { code, .. } => *code,
            _ => None,
        }
    }

    /// Socket operation that failed, for transport failures.
    #[must_use]
    pub fn op(&self) -> Option<SocketOp> {
        match self {
            Self::Transport { op, .. } => Some(*op),
            _ => None,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport {
                op,
                code: Some(code),
                message,
            } => write!(f, "transport: {op} failed (os error {code}): {message}"),
            Self::Transport {
                op,
                code: None,
                message,
            } => write!(f, "transport: {op} failed: {message}"),
            Self::NotOpen => write!(f, "usage: socket is not open"),
            Self::Closed => write!(f, "usage: socket is closed"),
            Self::AlreadyOpen => write!(f, "usage: socket is already open"),
            Self::PayloadTooLarge { size, limit } => {
                write!(f, "usage: payload of {size} bytes exceeds limit of {limit}")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Serialize(msg) => write!(f, "serialize: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}
