#![forbid(unsafe_code)]

//! `ni-mouse-link-listen` — prints datagrams arriving on a socket path.
//!
//! Stands in for the tracking receiver while developing the producer side.
//! Runs until Ctrl-C or SIGTERM and removes the socket file on exit.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use ni_mouse_link::cli::ListenCli;
use ni_mouse_link::listener::DatagramListener;
use ni_mouse_link::logging::init_tracing;
use ni_mouse_link::{AppError, Result};

fn main() -> ExitCode {
    let args = ListenCli::parse();
    if let Err(err) = init_tracing(args.log_format) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Io(format!("failed to build tokio runtime: {err}")))
        .and_then(|runtime| runtime.block_on(run(args)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "ni-mouse-link-listen failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: ListenCli) -> Result<()> {
    let listener = DatagramListener::bind(args.socket)?.with_max_datagram(args.max_datagram);

    let ct = CancellationToken::new();
    let signal_ct = ct.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_ct.cancel();
    });

    let mut received = 0_usize;
    listener
        .serve(ct, |datagram| {
            received += 1;
            let mut stdout = std::io::stdout().lock();
            let line = String::from_utf8_lossy(&datagram);
            if let Err(err) = writeln!(stdout, "{line}") {
                tracing::warn!(%err, "failed to write datagram to stdout");
            }
        })
        .await;

    info!(datagrams = received, "listener stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
            let _ = ctrl_c.await;
        }
    }
}
