#![forbid(unsafe_code)]

//! `ni-mouse-link` — forwards payloads to the tracking receiver socket.
//!
//! Each `--message` argument, or each stdin line when none is given, is sent
//! as one datagram. Any failure is logged and ends the process with a
//! non-zero status.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use ni_mouse_link::cli::SenderCli;
use ni_mouse_link::logging::init_tracing;

fn main() -> ExitCode {
    let args = SenderCli::parse();
    if let Err(err) = init_tracing(args.log_format) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    match args.run(io::stdin().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "ni-mouse-link failed");
            ExitCode::FAILURE
        }
    }
}
