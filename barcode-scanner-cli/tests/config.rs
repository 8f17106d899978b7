use barcode_scanner_cli::config::{load_config, CliConfig};
use barcode_scanner_logger::{LogFormat, LogOutput};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
[bridge.channels]
dispatcher-command-buffer = 8

[bridge.scanner]
reject-concurrent-scans = true

[host]
program = "/opt/scanner/host"
args = ["--camera", "back"]

[log]
level = "debug"
format = "json"
"#,
    );

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.bridge.channels.dispatcher_command_buffer, 8);
    assert!(config.bridge.scanner.reject_concurrent_scans);
    assert_eq!(config.host.program, "/opt/scanner/host");
    assert_eq!(config.host.args, vec!["--camera", "back"]);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.log.format, LogFormat::Json);
    assert_eq!(config.log.output, LogOutput::Stderr);
}

#[test]
fn test_missing_sections_use_defaults() {
    let file = write_config(
        r#"
[host]
program = "scanner-host"
"#,
    );

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    let defaults = CliConfig::default();
    assert_eq!(config.host.program, "scanner-host");
    assert!(config.host.args.is_empty());
    assert_eq!(
        config.bridge.channels.dispatcher_command_buffer,
        defaults.bridge.channels.dispatcher_command_buffer
    );
    assert!(!config.bridge.scanner.reject_concurrent_scans);
    assert_eq!(config.log.level, "info");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = load_config(path.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Failed to build configuration"));
}

#[test]
fn test_wrong_type_is_an_error() {
    let file = write_config(
        r#"
[bridge.channels]
dispatcher-command-buffer = "lots"
"#,
    );
    assert!(load_config(file.path().to_str().unwrap()).is_err());
}

#[test]
fn test_zero_dispatcher_buffer_is_rejected() {
    let file = write_config(
        r#"
[bridge.channels]
dispatcher-command-buffer = 0
"#,
    );

    let err = load_config(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("dispatcher-command-buffer"));
}

#[test]
fn test_channels_section_without_buffer_key_uses_default() {
    let file = write_config(
        r#"
[bridge.channels]

[bridge.scanner]
reject-concurrent-scans = true
"#,
    );

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.bridge.channels.dispatcher_command_buffer, 64);
    assert!(config.bridge.scanner.reject_concurrent_scans);
}
