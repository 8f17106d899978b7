//! # Plugin Host
//!
//! This module defines the `PluginHost`, which wires the dispatcher, the
//! `BarcodeScanner` plugin object and the plugin registry together around a single
//! platform bridge.
//!
//! ## Core Components
//!
//! - [`PluginHost`]: Owns the background `Dispatcher`. It is consumed when its
//!   `run` method is called.
//! - [`PluginHostHandle`]: A clonable handle that gives access to the registry and
//!   the scanner, and shuts the host down.

use crate::{
    bridge::PlatformBridge,
    config::BridgeConfig,
    dispatcher::{Dispatcher, DispatcherHandle},
    registry::{PluginRegistry, BARCODE_SCANNER_PATH},
    scanner::BarcodeScanner,
};
use std::sync::Arc;

/// A clonable, thread-safe handle for interacting with a running [`PluginHost`].
#[derive(Debug, Clone)]
pub struct PluginHostHandle {
    dispatcher: DispatcherHandle,
    registry: PluginRegistry,
    scanner: BarcodeScanner,
}

impl PluginHostHandle {
    /// The registry holding every plugin this host installed.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// The barcode scanner registered at [`BARCODE_SCANNER_PATH`].
    pub fn barcode_scanner(&self) -> BarcodeScanner {
        self.scanner.clone()
    }

    /// Sends a shutdown signal to the dispatcher.
    ///
    /// Commands queued after this point fail through their error callbacks.
    pub async fn stop(&self) {
        self.dispatcher.stop().await;
    }
}

/// The background service owning the platform bridge.
///
/// Created once; its [`run()`](PluginHost::run) method is spawned as a background task,
/// leaving the [`PluginHostHandle`] as the only way to reach the running services.
pub struct PluginHost {
    dispatcher: Dispatcher,
}

impl PluginHost {
    /// Creates a new `PluginHost` and its associated [`PluginHostHandle`].
    ///
    /// A fresh [`PluginRegistry`] is created and the scanner is registered in it at
    /// [`BARCODE_SCANNER_PATH`]. Nothing runs until [`run()`](PluginHost::run) is awaited.
    ///
    /// # Arguments
    ///
    /// * `config` - The bridge configuration.
    /// * `bridge` - The platform bridge commands are forwarded to.
    pub fn new(config: &BridgeConfig, bridge: Arc<dyn PlatformBridge>) -> (Self, PluginHostHandle) {
        Self::with_registry(config, bridge, PluginRegistry::new())
    }

    /// Same as [`new`](PluginHost::new), but installs the scanner into an existing registry.
    pub fn with_registry(
        config: &BridgeConfig,
        bridge: Arc<dyn PlatformBridge>,
        registry: PluginRegistry,
    ) -> (Self, PluginHostHandle) {
        let (dispatcher, dispatcher_handle) = Dispatcher::new(config, bridge);
        let scanner = BarcodeScanner::new(dispatcher_handle.clone(), &config.scanner);
        registry.register(BARCODE_SCANNER_PATH, scanner.clone());

        let handle = PluginHostHandle {
            dispatcher: dispatcher_handle,
            registry,
            scanner,
        };

        (Self { dispatcher }, handle)
    }

    /// Runs the dispatcher until [`PluginHostHandle::stop()`] is called or every
    /// sender is gone, including the scanner held by the registry.
    pub async fn run(self) {
        tracing::info!("Plugin host is running.");
        self.dispatcher.run().await;
    }
}
