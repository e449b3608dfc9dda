#![forbid(unsafe_code)]

//! Producer side of the ni-mouse tracking link.
//!
//! Sends opaque payloads as Unix-domain datagrams to the process listening
//! on a configured socket path.

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod forward;
pub mod listener;
pub mod logging;

pub use client::{ConnectionState, SocketClient, UnixDatagramClient};
pub use config::LinkConfig;
pub use errors::{AppError, Result, SocketOp};
