//! Payload forwarding from line-oriented input.
//!
//! Lines are treated as raw bytes: only the trailing `\n` is removed, so
//! payloads that are not UTF-8 reach the socket unchanged.

use std::io::BufRead;

use tracing::trace;

use crate::client::SocketClient;
use crate::{AppError, Result};

/// Send every non-empty line of `reader` as one datagram.
///
/// Returns the number of datagrams sent.
///
/// # Errors
///
/// Returns `AppError::Io` if reading fails, or any error raised by
/// [`SocketClient::send`]. Lines already sent stay sent.
pub fn forward_lines<R, C>(mut reader: R, client: &mut C) -> Result<usize>
where
    R: BufRead,
    C: SocketClient + ?Sized,
{
    let mut line = Vec::new();
    let mut sent = 0_usize;
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|err| AppError::Io(format!("failed to read payload input: {err}")))?;
        if read == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.is_empty() {
            trace!("skipping empty line");
            continue;
        }
        client.send(&line)?;
        sent += 1;
    }
    Ok(sent)
}

/// Send each message as one datagram, empty ones included.
///
/// # Errors
///
/// Returns the first error raised by [`SocketClient::send`].
pub fn forward_messages<C>(messages: &[String], client: &mut C) -> Result<usize>
where
    C: SocketClient + ?Sized,
{
    for message in messages {
        client.send(message.as_bytes())?;
    }
    Ok(messages.len())
}
