//! `tracing` subscriber setup shared by the barcode-scanner binaries.

use anyhow::Result;
use serde::Deserialize;
use std::{fs::File, str::FromStr, sync::Arc};
use tracing::Level;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
    Registry,
};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Plain,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    /// Stdout carries command output, so logs go here unless configured otherwise.
    #[default]
    Stderr,
    File,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case", default)]
pub struct LogConfig {
    /// Log level, e.g., "info", "debug", "trace". `RUST_LOG` overrides it when set.
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Path to the log file, required if output is "file".
    pub file_path: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
            output: LogOutput::Stderr,
            file_path: None,
        }
    }
}

impl LogConfig {
    /// The configured level, falling back to `INFO` when it doesn't parse.
    pub fn level(&self) -> Level {
        Level::from_str(&self.level).unwrap_or(Level::INFO)
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// Fails if the output is `file` without a `file_path`, if the file can't be
/// created, or if a global subscriber is already set.
pub fn init(config: &LogConfig) -> Result<()> {
    // `RUST_LOG` takes precedence over `config.level`
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.level()).into())
        .from_env_lossy();
    let subscriber = Registry::default().with(filter);

    match config.output {
        LogOutput::File => {
            let file_path = config
                .file_path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Log output is 'file' but 'file_path' is not specified"))?;
            let file_writer = Arc::new(File::create(file_path)?);

            match config.format {
                LogFormat::Json => subscriber
                    .with(fmt::layer().with_writer(file_writer).json())
                    .try_init()?,
                LogFormat::Plain => subscriber
                    .with(fmt::layer().with_writer(file_writer).with_ansi(false))
                    .try_init()?,
            }
        }
        LogOutput::Stdout => {
            let stdout_writer = std::io::stdout;
            match config.format {
                LogFormat::Json => subscriber
                    .with(fmt::layer().with_writer(stdout_writer).json())
                    .try_init()?,
                LogFormat::Plain => subscriber
                    .with(fmt::layer().with_writer(stdout_writer).pretty())
                    .try_init()?,
            }
        }
        LogOutput::Stderr => {
            let stderr_writer = std::io::stderr;
            match config.format {
                LogFormat::Json => subscriber
                    .with(fmt::layer().with_writer(stderr_writer).json())
                    .try_init()?,
                LogFormat::Plain => subscriber
                    .with(fmt::layer().with_writer(stderr_writer).pretty())
                    .try_init()?,
            }
        }
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_keys() {
        let config: LogConfig = serde_json::from_str(r#"{ "format": "json" }"#).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(config.file_path.is_none());
    }

    #[test]
    fn unparsable_level_falls_back_to_info() {
        let config = LogConfig {
            level: "chatty".into(),
            ..Default::default()
        };
        assert_eq!(config.level(), Level::INFO);

        let config = LogConfig {
            level: "DEBUG".into(),
            ..Default::default()
        };
        assert_eq!(config.level(), Level::DEBUG);
    }

    #[test]
    fn file_output_requires_a_path() {
        let config = LogConfig {
            output: LogOutput::File,
            ..Default::default()
        };
        let err = init(&config).unwrap_err();
        assert!(err.to_string().contains("file_path"));
    }

    // The only test that installs the global subscriber.
    #[test]
    fn file_output_writes_events_and_second_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanner.log");
        let config = LogConfig {
            format: LogFormat::Json,
            output: LogOutput::File,
            file_path: Some(path.to_string_lossy().into_owned()),
            ..Default::default()
        };

        init(&config).unwrap();
        tracing::info!(action = "scan", "forwarded to bridge");
        tracing::debug!("filtered out at info");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("forwarded to bridge"));
        assert!(!written.contains("filtered out at info"));

        assert!(init(&LogConfig::default()).is_err());
    }
}
