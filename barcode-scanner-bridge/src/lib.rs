//! A Rust library for dispatching barcode-scanner commands across a platform bridge.
//!
//! This crate provides the app-facing half of a barcode-scanner plugin. It never
//! touches a camera or decodes an image; it marshals `scan` and `encode` requests
//! to a native host and routes the answers back to the caller.
//!
//! # Key Components
//!
//! *   [`scanner::BarcodeScanner`]: The plugin object. Callback-style `scan`/`encode`
//!     plus future-returning `scan_async`/`encode_async`.
//! *   [`host::PluginHost`]: The main entry point. Wires the dispatcher, the scanner
//!     and the plugin registry around one platform bridge.
//! *   [`bridge::PlatformBridge`]: The seam to native code. Implemented by
//!     [`transport::JsonLineBridge`] for hosts reachable over a byte stream.
//! *   [`registry::PluginRegistry`]: An injected namespace where the scanner is
//!     registered at [`registry::BARCODE_SCANNER_PATH`].
pub mod bridge;
pub mod command;
/// Defines configuration structures for the bridge.
pub mod config;
/// The background worker that forwards commands to the bridge.
pub mod dispatcher;
pub mod error;
pub mod host;
/// Typed scan options, barcode formats and encode types.
pub mod options;
pub mod registry;
pub mod result;
pub mod scanner;
/// A line-delimited JSON implementation of the platform bridge.
pub mod transport;

pub use bridge::PlatformBridge;
pub use command::{Action, Command, Options, SERVICE_NAME};
pub use error::BridgeError;
pub use host::{PluginHost, PluginHostHandle};
pub use registry::{PluginRegistry, BARCODE_SCANNER_PATH};
pub use result::ScanResult;
pub use scanner::BarcodeScanner;
