//! Typed helpers for the options the native scanners understand.
//!
//! The dispatcher treats options as an opaque map; [`ScanOptions`] only exists so
//! callers don't have to remember key spellings. Anything it doesn't cover can
//! still be inserted into the [`Options`] map directly.

use crate::command::Options;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Returned when a command-line or config string names no known option value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownOption {
    #[error("unknown barcode format: {0}")]
    Format(String),
    #[error("unknown encode type: {0}")]
    EncodeType(String),
    #[error("unknown orientation: {0}")]
    Orientation(String),
}

/// Symbologies a native scanner can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeFormat {
    QrCode,
    DataMatrix,
    UpcA,
    UpcE,
    #[serde(rename = "EAN_8")]
    Ean8,
    #[serde(rename = "EAN_13")]
    Ean13,
    #[serde(rename = "CODE_39")]
    Code39,
    #[serde(rename = "CODE_93")]
    Code93,
    #[serde(rename = "CODE_128")]
    Code128,
    Codabar,
    Itf,
    #[serde(rename = "RSS14")]
    Rss14,
    RssExpanded,
    #[serde(rename = "PDF_417")]
    Pdf417,
    Aztec,
    Msi,
}

impl BarcodeFormat {
    pub const ALL: [BarcodeFormat; 16] = [
        BarcodeFormat::QrCode,
        BarcodeFormat::DataMatrix,
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::Codabar,
        BarcodeFormat::Itf,
        BarcodeFormat::Rss14,
        BarcodeFormat::RssExpanded,
        BarcodeFormat::Pdf417,
        BarcodeFormat::Aztec,
        BarcodeFormat::Msi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeFormat::QrCode => "QR_CODE",
            BarcodeFormat::DataMatrix => "DATA_MATRIX",
            BarcodeFormat::UpcA => "UPC_A",
            BarcodeFormat::UpcE => "UPC_E",
            BarcodeFormat::Ean8 => "EAN_8",
            BarcodeFormat::Ean13 => "EAN_13",
            BarcodeFormat::Code39 => "CODE_39",
            BarcodeFormat::Code93 => "CODE_93",
            BarcodeFormat::Code128 => "CODE_128",
            BarcodeFormat::Codabar => "CODABAR",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Rss14 => "RSS14",
            BarcodeFormat::RssExpanded => "RSS_EXPANDED",
            BarcodeFormat::Pdf417 => "PDF_417",
            BarcodeFormat::Aztec => "AZTEC",
            BarcodeFormat::Msi => "MSI",
        }
    }
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BarcodeFormat {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BarcodeFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| UnknownOption::Format(s.to_string()))
    }
}

/// The kind of payload an `encode` call renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodeType {
    #[serde(rename = "TEXT_TYPE")]
    Text,
    #[serde(rename = "EMAIL_TYPE")]
    Email,
    #[serde(rename = "PHONE_TYPE")]
    Phone,
    #[serde(rename = "SMS_TYPE")]
    Sms,
}

impl EncodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodeType::Text => "TEXT_TYPE",
            EncodeType::Email => "EMAIL_TYPE",
            EncodeType::Phone => "PHONE_TYPE",
            EncodeType::Sms => "SMS_TYPE",
        }
    }
}

impl fmt::Display for EncodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EncodeType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TEXT_TYPE" | "TEXT" => Ok(EncodeType::Text),
            "EMAIL_TYPE" | "EMAIL" => Ok(EncodeType::Email),
            "PHONE_TYPE" | "PHONE" => Ok(EncodeType::Phone),
            "SMS_TYPE" | "SMS" => Ok(EncodeType::Sms),
            _ => Err(UnknownOption::EncodeType(s.to_string())),
        }
    }
}

impl From<EncodeType> for String {
    fn from(t: EncodeType) -> Self {
        t.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl std::str::FromStr for Orientation {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(UnknownOption::Orientation(s.to_string())),
        }
    }
}

/// Well-known scan options. Unset fields are left out of the resulting map so
/// the native side applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefer_front_camera: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_flip_camera_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_torch_button: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub torch_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_history: Option<bool>,
    /// Text shown under the viewfinder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// How long the decoded result stays on screen, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_display_duration: Option<u64>,
    /// Native scanners expect a single comma-separated string here.
    #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "serialize_formats")]
    pub formats: Vec<BarcodeFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_animations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_success_beep: Option<bool>,
}

fn serialize_formats<S>(formats: &[BarcodeFormat], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let joined = formats
        .iter()
        .map(BarcodeFormat::as_str)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

impl ScanOptions {
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn formats(mut self, formats: impl IntoIterator<Item = BarcodeFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    pub fn prefer_front_camera(mut self, on: bool) -> Self {
        self.prefer_front_camera = Some(on);
        self
    }

    pub fn torch_on(mut self, on: bool) -> Self {
        self.torch_on = Some(on);
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn result_display_duration(mut self, millis: u64) -> Self {
        self.result_display_duration = Some(millis);
        self
    }
}

impl From<ScanOptions> for Options {
    fn from(options: ScanOptions) -> Self {
        // a struct of plain fields always serializes to an object
        match serde_json::to_value(options) {
            Ok(Value::Object(map)) => map,
            _ => Options::new(),
        }
    }
}
