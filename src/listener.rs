//! Diagnostic datagram receiver.
//!
//! Binds a Unix-domain datagram socket at a filesystem path and hands every
//! datagram it receives to the caller. Used by `ni-mouse-link-listen` and by
//! the test suite in place of the real receiving process.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::net::UnixDatagram;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::errors::SocketOp;
use crate::{AppError, Result};

/// Receive buffer size used unless overridden.
pub const DEFAULT_MAX_DATAGRAM: usize = 64 * 1024;

/// Datagram socket bound to a path. The socket file is removed on drop.
#[derive(Debug)]
pub struct DatagramListener {
    path: PathBuf,
    socket: UnixDatagram,
    max_datagram: usize,
}

impl DatagramListener {
    /// Bind a receiving socket at `path`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` with op `bind` if the path is taken or
    /// cannot be created.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let socket =
            UnixDatagram::bind(&path).map_err(|err| AppError::transport(SocketOp::Bind, &err))?;
        info!(path = %path.display(), "listener bound");
        Ok(Self {
            path,
            socket,
            max_datagram: DEFAULT_MAX_DATAGRAM,
        })
    }

    /// Override the receive buffer size. Longer datagrams are truncated.
    /// A size of zero is raised to one byte.
    #[must_use]
    pub fn with_max_datagram(mut self, max_datagram: usize) -> Self {
        self.max_datagram = max_datagram.max(1);
        self
    }

    /// Largest datagram returned untruncated.
    #[must_use]
    pub fn max_datagram(&self) -> usize {
        self.max_datagram
    }

    /// Bound socket path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait for the next datagram.
    ///
    /// Datagrams longer than [`Self::max_datagram`] are cut to that size and
    /// logged as truncated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Transport` with op `recv` if the receive fails.
    pub async fn recv(&self) -> Result<Vec<u8>> {
        // One spare byte tells a datagram of exactly `max_datagram` bytes
        // apart from a longer one.
        let mut buf = vec![0_u8; self.max_datagram + 1];
        let len = self
            .socket
            .recv(&mut buf)
            .await
            .map_err(|err| AppError::transport(SocketOp::Recv, &err))?;
        if len > self.max_datagram {
            warn!(limit = self.max_datagram, "datagram truncated");
        }
        buf.truncate(len.min(self.max_datagram));
        Ok(buf)
    }

    /// Receive datagrams until `ct` is cancelled, passing each to
    /// `on_datagram`. Receive failures are logged and the loop continues.
    pub async fn serve<F>(&self, ct: CancellationToken, mut on_datagram: F)
    where
        F: FnMut(Vec<u8>),
    {
        let span = info_span!("listener", path = %self.path.display());
        async move {
            loop {
                tokio::select! {
                    () = ct.cancelled() => {
                        info!("listener shutting down");
                        break;
                    }
                    result = self.recv() => deliver(result, &mut on_datagram),
                }
            }
        }
        .instrument(span)
        .await;
    }
}

/// Hand a received datagram to the callback; log receive failures and
/// carry on.
fn deliver<F>(result: Result<Vec<u8>>, on_datagram: &mut F)
where
    F: FnMut(Vec<u8>),
{
    match result {
        Ok(datagram) => {
            debug!(bytes = datagram.len(), "datagram received");
            on_datagram(datagram);
        }
        Err(err) => {
            warn!(%err, "datagram receive failed");
        }
    }
}

impl Drop for DatagramListener {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            debug!(%err, path = %self.path.display(), "failed to remove socket file");
        }
    }
}

/// Spawn a task that forwards received datagrams into `tx`.
///
/// The task ends when `ct` is cancelled or the receiving half of `tx` is
/// dropped.
pub fn spawn_listener(
    listener: DatagramListener,
    ct: CancellationToken,
    tx: mpsc::UnboundedSender<Vec<u8>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let stop = ct.clone();
        listener
            .serve(ct, |datagram| {
                if tx.send(datagram).is_err() {
                    stop.cancel();
                }
            })
            .await;
    })
}
