//! Shared test helpers for socket-level integration tests.
//!
//! Provides a blocking receiver bound inside a scratch directory so that
//! individual test modules can focus on what arrives at the endpoint.

use std::io::ErrorKind;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

/// A receiving datagram socket living in its own temporary directory.
pub struct Receiver {
    socket: UnixDatagram,
    path: PathBuf,
    _dir: TempDir,
}

impl Receiver {
    /// Bind a receiver at `<tmp>/<name>`.
    pub fn bind(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        let socket = UnixDatagram::bind(&path).expect("bind receiver");
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("set read timeout");
        Self {
            socket,
            path,
            _dir: dir,
        }
    }

    /// Socket path clients should target.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until one datagram arrives and return its bytes.
    pub fn recv(&self) -> Vec<u8> {
        let mut buf = vec![0_u8; 64 * 1024];
        let len = self.socket.recv(&mut buf).expect("datagram arrives");
        buf.truncate(len);
        buf
    }

    /// Assert that no datagram is queued right now.
    pub fn assert_empty(&self) {
        self.socket.set_nonblocking(true).expect("set nonblocking");
        let mut buf = [0_u8; 64];
        let result = self.socket.recv(&mut buf);
        self.socket.set_nonblocking(false).expect("restore blocking");
        match result {
            Err(err) => assert_eq!(err.kind(), ErrorKind::WouldBlock, "unexpected error: {err}"),
            Ok(len) => panic!("expected no datagram, got {len} bytes"),
        }
    }
}
