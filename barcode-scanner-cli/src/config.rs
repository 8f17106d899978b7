use anyhow::{Context, Result};
use barcode_scanner_bridge::config::BridgeConfig;
use barcode_scanner_logger::LogConfig;
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `BARCODE_SCANNER__HOST__PROGRAM`.
pub const ENV_PREFIX: &str = "BARCODE_SCANNER";

/// The top-level configuration for the barcode-scanner CLI.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// The native host process the CLI talks to over stdio.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            program: "barcode-scanner-host".to_string(),
            args: Vec::new(),
        }
    }
}

/// Loads the CLI configuration from a specified TOML file.
///
/// Values from the file can be overridden with `BARCODE_SCANNER__<SECTION>__<KEY>`
/// environment variables.
pub fn load_config(path: &str) -> Result<CliConfig> {
    let builder = config::Config::builder().add_source(config::File::with_name(path));
    build_config(builder, path)
}

/// Loads the CLI configuration from defaults and `BARCODE_SCANNER__*` variables only.
pub fn load_env_config() -> Result<CliConfig> {
    build_config(config::Config::builder(), "environment")
}

fn build_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    origin: &str,
) -> Result<CliConfig> {
    let settings: CliConfig = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context(format!("Failed to build configuration from '{}'", origin))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    settings.validate()?;
    Ok(settings)
}

impl CliConfig {
    /// Rejects values the bridge cannot run with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.bridge.channels.dispatcher_command_buffer > 0,
            "bridge.channels.dispatcher-command-buffer must be at least 1"
        );
        Ok(())
    }
}
