use serde::{Deserialize, Serialize};

/// The top-level configuration for the `barcode-scanner-bridge` library.
///
/// This struct aggregates the dispatcher's channel sizing and the scanner's
/// behaviour. It is typically deserialized from a configuration file and passed
/// to the [`PluginHost`](crate::host::PluginHost) upon initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BridgeConfig {
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

/// Defines capacities for the MPSC channels within the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ChannelConfig {
    /// The buffer capacity for the command channel to the Dispatcher.
    /// Must be at least 1; `Dispatcher::new` treats 0 as 1.
    pub dispatcher_command_buffer: usize,
}

/// Behaviour of the `BarcodeScanner` plugin object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScannerConfig {
    /// Refuse a `scan` while another one has not answered yet.
    #[serde(default)]
    pub reject_concurrent_scans: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            dispatcher_command_buffer: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_fall_back_to_defaults() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{ "channels": {}, "scanner": {} }"#).unwrap();
        assert_eq!(config.channels.dispatcher_command_buffer, 64);
        assert!(!config.scanner.reject_concurrent_scans);
    }

    #[test]
    fn explicit_values_are_kept() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{ "channels": { "dispatcher-command-buffer": 2 }, "scanner": { "reject-concurrent-scans": true } }"#,
        )
        .unwrap();
        assert_eq!(config.channels.dispatcher_command_buffer, 2);
        assert!(config.scanner.reject_concurrent_scans);
    }
}
