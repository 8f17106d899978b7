pub mod cli;
pub mod config;

use anyhow::{Context, Result};
use barcode_scanner_bridge::{transport::JsonLineBridge, PluginHost, PluginHostHandle};
use clap::Parser;
use cli::{Cli, Commands};
use config::{load_config, load_env_config, CliConfig, HostConfig};
use serde_json::Value;
use std::{process::Stdio, sync::Arc};
use tokio::{
    process::{Child, Command},
    signal,
};

/// The main entry point for running the CLI.
/// This function handles CLI parsing, configuration, and command execution.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config_from_cli(cli.config.as_deref())?;
    barcode_scanner_logger::init(&config.log)?;
    tracing::debug!("Configuration loaded: {:#?}", &config);

    let payload = execute(cli.command, &config).await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

/// Loads the configuration file if one was given on the command line,
/// otherwise defaults plus environment overrides.
fn load_config_from_cli(path: Option<&str>) -> Result<CliConfig> {
    if let Some(config_path) = path {
        eprintln!("Loading configuration from '{}'", config_path);
        load_config(config_path)
    } else {
        load_env_config()
    }
}

/// Starts the native host, runs one command against it and shuts everything down.
///
/// Returns the success payload. A native error, a host that exits early or
/// Ctrl+C all come back as errors.
pub async fn execute(command: Commands, config: &CliConfig) -> Result<Value> {
    let mut native = spawn_native_host(&config.host)?;
    let stdin = native.stdin.take().context("native host stdin is not piped")?;
    let stdout = native.stdout.take().context("native host stdout is not piped")?;

    let (bridge, _reader) = JsonLineBridge::new(stdout, stdin);
    let (plugin_host, handle) = PluginHost::new(&config.bridge, Arc::new(bridge));
    tokio::spawn(plugin_host.run());

    let outcome = tokio::select! {
        result = run_command(&handle, command) => result,
        signal = signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
            tracing::info!("Received Ctrl+C, shutting down...");
            Err(anyhow::anyhow!("interrupted"))
        }
    };

    handle.stop().await;
    tracing::debug!("Plugin host stopped.");
    outcome
}

/// Sends a single command through the scanner registered on `handle`.
pub async fn run_command(handle: &PluginHostHandle, command: Commands) -> Result<Value> {
    let scanner = handle.barcode_scanner();
    match command {
        Commands::Scan(cmd) => {
            let result = scanner.scan_async(cmd.to_options()?).await?;
            tracing::info!(format = %result.format, cancelled = result.cancelled, "Scan finished");
            Ok(serde_json::to_value(result)?)
        }
        Commands::Encode(cmd) => {
            let options = cmd.to_options()?;
            let payload = scanner.encode_async(cmd.encode_type, cmd.data, options).await?;
            tracing::info!("Encode finished");
            Ok(payload)
        }
    }
}

fn spawn_native_host(host: &HostConfig) -> Result<Child> {
    tracing::info!(program = %host.program, args = ?host.args, "Starting native host");
    Command::new(&host.program)
        .args(&host.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("Failed to start native host '{}'", host.program))
}
