// Kept in its own test binary: it mutates the process environment.
use barcode_scanner_cli::config::{load_config, load_env_config};
use std::io::Write;

const PROGRAM_VAR: &str = "BARCODE_SCANNER__HOST__PROGRAM";

// One test so the two phases never race on the shared variable.
#[test]
fn test_environment_overrides_file_and_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(b"[host]\nprogram = \"from-file\"\n\n[log]\nlevel = \"warn\"\n")
        .unwrap();

    std::env::set_var(PROGRAM_VAR, "from-env");
    let with_file = load_config(file.path().to_str().unwrap());
    let without_file = load_env_config();
    std::env::remove_var(PROGRAM_VAR);

    let with_file = with_file.unwrap();
    assert_eq!(with_file.host.program, "from-env");
    assert_eq!(with_file.log.level, "warn");

    let without_file = without_file.unwrap();
    assert_eq!(without_file.host.program, "from-env");
    assert_eq!(without_file.log.level, "info");
    assert_eq!(without_file.bridge.channels.dispatcher_command_buffer, 64);

    let defaults = load_env_config().unwrap();
    assert_eq!(defaults.host.program, "barcode-scanner-host");
}
