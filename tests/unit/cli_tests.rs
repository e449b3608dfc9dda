//! Unit tests for the sender and listener argument parsers.

use std::path::PathBuf;

use clap::Parser as _;
use ni_mouse_link::cli::{ListenCli, SenderCli};
use ni_mouse_link::listener::DEFAULT_MAX_DATAGRAM;
use ni_mouse_link::logging::LogFormat;
use ni_mouse_link::AppError;

#[test]
fn sender_accepts_socket_and_repeated_messages() {
    let cli = SenderCli::try_parse_from([
        "ni-mouse-link",
        "--socket",
        "/tmp/a.sock",
        "-m",
        "one",
        "--message",
        "two",
    ])
    .expect("valid args");

    assert_eq!(cli.socket, Some(PathBuf::from("/tmp/a.sock")));
    assert_eq!(cli.config, None);
    assert_eq!(cli.messages, ["one", "two"]);
    assert_eq!(cli.log_format, LogFormat::Text);
}

#[test]
fn sender_accepts_config_alone() {
    let cli = SenderCli::try_parse_from(["ni-mouse-link", "--config", "link.toml"])
        .expect("valid args");
    assert_eq!(cli.config, Some(PathBuf::from("link.toml")));
    assert!(cli.messages.is_empty());
}

#[test]
fn sender_rejects_config_with_socket() {
    let err = SenderCli::try_parse_from([
        "ni-mouse-link",
        "--config",
        "link.toml",
        "--socket",
        "/tmp/a.sock",
    ])
    .expect_err("options conflict");
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn sender_requires_config_or_socket() {
    let err = SenderCli::try_parse_from(["ni-mouse-link", "-m", "x"]).expect_err("no target");
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn sender_parses_json_log_format() {
    let cli = SenderCli::try_parse_from([
        "ni-mouse-link",
        "--socket",
        "/tmp/a.sock",
        "--log-format",
        "json",
    ])
    .expect("valid args");
    assert_eq!(cli.log_format, LogFormat::Json);
}

#[test]
fn link_config_without_target_is_config_error() {
    let cli = SenderCli {
        config: None,
        socket: None,
        messages: Vec::new(),
        log_format: LogFormat::Text,
    };
    let err = cli.link_config().expect_err("no target");
    assert!(matches!(err, AppError::Config(_)), "got {err:?}");
}

#[test]
fn link_config_from_socket_validates_path() {
    let cli = SenderCli::try_parse_from(["ni-mouse-link", "--socket", "/tmp/b.sock"])
        .expect("valid args");
    let config = cli.link_config().expect("valid socket");
    assert_eq!(config.socket_path, PathBuf::from("/tmp/b.sock"));
    assert_eq!(config.max_payload_bytes, None);
}

#[test]
fn link_config_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let file = dir.path().join("link.toml");
    std::fs::write(
        &file,
        "socket_path = \"/tmp/c.sock\"\nmax_payload_bytes = 16\n",
    )
    .expect("write config");

    let file_arg = file.to_str().expect("utf-8 temp path");
    let cli =
        SenderCli::try_parse_from(["ni-mouse-link", "--config", file_arg]).expect("valid args");
    let config = cli.link_config().expect("valid config");
    assert_eq!(config.socket_path, PathBuf::from("/tmp/c.sock"));
    assert_eq!(config.max_payload_bytes, Some(16));
}

#[test]
fn listen_defaults() {
    let cli = ListenCli::try_parse_from(["ni-mouse-link-listen", "--socket", "/tmp/l.sock"])
        .expect("valid args");
    assert_eq!(cli.socket, PathBuf::from("/tmp/l.sock"));
    assert_eq!(cli.max_datagram, DEFAULT_MAX_DATAGRAM);
    assert_eq!(cli.log_format, LogFormat::Text);
}

#[test]
fn listen_requires_socket() {
    let err = ListenCli::try_parse_from(["ni-mouse-link-listen"]).expect_err("no socket");
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn listen_rejects_non_numeric_max_datagram() {
    let err = ListenCli::try_parse_from([
        "ni-mouse-link-listen",
        "--socket",
        "/tmp/l.sock",
        "--max-datagram",
        "lots",
    ])
    .expect_err("not a number");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}
