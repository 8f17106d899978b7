use anyhow::{Context, Result};
use barcode_scanner_bridge::{
    options::{BarcodeFormat, EncodeType, Orientation, ScanOptions},
    Options,
};
use clap::{Args, Parser, Subcommand};

/// The main CLI structure for the barcode scanner.
#[derive(Parser, Debug)]
#[command(name = "barcode-scanner", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration TOML file.
    /// If not provided, default values will be used.
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Defines the available subcommands for the application.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the native scanner and print what it read.
    Scan(ScanCmd),
    /// Ask the native side to render data as a barcode.
    Encode(EncodeCmd),
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug, Default)]
pub struct ScanCmd {
    /// Restrict the scanner to these formats, e.g. `QR_CODE,EAN_13`.
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<BarcodeFormat>,

    /// Text shown under the viewfinder.
    #[arg(long)]
    pub prompt: Option<String>,

    #[arg(long)]
    pub prefer_front_camera: bool,

    #[arg(long)]
    pub torch_on: bool,

    /// `portrait` or `landscape`.
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Extra options as a JSON object, merged over the flags above.
    #[arg(long)]
    pub options: Option<String>,
}

/// Arguments for the `encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeCmd {
    /// TEXT_TYPE, EMAIL_TYPE, PHONE_TYPE or SMS_TYPE.
    #[arg(long = "type", default_value = "TEXT_TYPE")]
    pub encode_type: EncodeType,

    /// The data to encode.
    #[arg(long)]
    pub data: String,

    /// Extra options as a JSON object.
    #[arg(long)]
    pub options: Option<String>,
}

impl ScanCmd {
    /// Builds the options map forwarded with the `scan` command.
    pub fn to_options(&self) -> Result<Options> {
        let mut typed = ScanOptions::default().formats(self.formats.iter().copied());
        if let Some(prompt) = &self.prompt {
            typed = typed.prompt(prompt.clone());
        }
        if self.prefer_front_camera {
            typed = typed.prefer_front_camera(true);
        }
        if self.torch_on {
            typed = typed.torch_on(true);
        }
        if let Some(orientation) = self.orientation {
            typed = typed.orientation(orientation);
        }

        let mut options: Options = typed.into();
        options.extend(parse_raw_options(self.options.as_deref())?);
        Ok(options)
    }
}

impl EncodeCmd {
    pub fn to_options(&self) -> Result<Options> {
        parse_raw_options(self.options.as_deref())
    }
}

/// Parses a `--options` value. An absent value is an empty map.
fn parse_raw_options(raw: Option<&str>) -> Result<Options> {
    match raw {
        None => Ok(Options::new()),
        Some(raw) => serde_json::from_str(raw).context("--options must be a JSON object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_scan_flags_into_native_options() {
        let cli = Cli::parse_from([
            "barcode-scanner",
            "scan",
            "--formats",
            "QR_CODE,ean_13",
            "--prompt",
            "Scan a ticket",
            "--torch-on",
            "--orientation",
            "landscape",
            "--options",
            r#"{"saveHistory": true}"#,
        ]);

        let Commands::Scan(cmd) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(
            serde_json::Value::Object(cmd.to_options().unwrap()),
            json!({
                "formats": "QR_CODE,EAN_13",
                "prompt": "Scan a ticket",
                "torchOn": true,
                "orientation": "landscape",
                "saveHistory": true,
            })
        );
    }

    #[test]
    fn bare_scan_sends_empty_options() {
        let cli = Cli::parse_from(["barcode-scanner", "scan"]);
        let Commands::Scan(cmd) = cli.command else {
            panic!("expected scan");
        };
        assert!(cmd.to_options().unwrap().is_empty());
        assert!(cli.config.is_none());
    }

    #[test]
    fn encode_defaults_to_text_type() {
        let cli = Cli::parse_from([
            "barcode-scanner",
            "encode",
            "--data",
            "http://www.nytimes.com",
            "--config",
            "scanner.toml",
        ]);
        assert_eq!(cli.config.as_deref(), Some("scanner.toml"));
        let Commands::Encode(cmd) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(cmd.encode_type, EncodeType::Text);
        assert_eq!(cmd.data, "http://www.nytimes.com");
    }

    #[test]
    fn rejects_unknown_format_and_bad_options() {
        assert!(Cli::try_parse_from(["barcode-scanner", "scan", "--formats", "QR"]).is_err());

        let cmd = ScanCmd {
            options: Some("[1, 2]".into()),
            ..Default::default()
        };
        assert!(cmd.to_options().is_err());
    }
}
