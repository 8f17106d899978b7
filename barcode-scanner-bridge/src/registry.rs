//! # Plugin Registry
//!
//! A namespace of plugin objects keyed by dotted paths such as
//! `cordova.plugins.barcodeScanner`. The registry is an ordinary value: whoever
//! builds the app creates one and passes it to the code that needs to look
//! plugins up. Nothing is process-global.

use dashmap::DashMap;
use std::{any::Any, sync::Arc};

/// The well-known path the barcode scanner is registered under.
pub const BARCODE_SCANNER_PATH: &str = "cordova.plugins.barcodeScanner";

type PluginObject = Arc<dyn Any + Send + Sync>;

/// A thread-safe map from namespace paths to plugin objects.
///
/// Cloning the registry yields another view onto the same entries.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Arc<DashMap<String, PluginObject>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `plugin` under `path`, returning whatever was registered there before.
    pub fn register<P>(&self, path: impl Into<String>, plugin: P) -> Option<PluginObject>
    where
        P: Any + Send + Sync,
    {
        let path = path.into();
        tracing::debug!(%path, "Registering plugin");
        self.plugins.insert(path, Arc::new(plugin))
    }

    /// Looks up the plugin at `path`.
    ///
    /// Returns `None` if nothing is registered there, or if the entry is not a `P`.
    pub fn get<P>(&self, path: &str) -> Option<Arc<P>>
    where
        P: Any + Send + Sync,
    {
        let entry = self.plugins.get(path)?;
        Arc::clone(entry.value()).downcast::<P>().ok()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.plugins.contains_key(path)
    }

    pub fn unregister(&self, path: &str) -> Option<PluginObject> {
        self.plugins.remove(path).map(|(_, plugin)| plugin)
    }

    /// All registered paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.plugins.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("paths", &self.paths())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Torch(u8);

    #[test]
    fn get_downcasts_to_registered_type() {
        let registry = PluginRegistry::new();
        registry.register("cordova.plugins.torch", Torch(3));

        assert_eq!(registry.get::<Torch>("cordova.plugins.torch").as_deref(), Some(&Torch(3)));
        assert!(registry.get::<String>("cordova.plugins.torch").is_none());
        assert!(registry.get::<Torch>("cordova.plugins.flash").is_none());
    }

    #[test]
    fn register_replaces_previous_entry() {
        let registry = PluginRegistry::new();
        assert!(registry.register("a", Torch(1)).is_none());
        let previous = registry.register("a", Torch(2)).unwrap();

        assert_eq!(previous.downcast::<Torch>().unwrap().0, 1);
        assert_eq!(registry.get::<Torch>("a").unwrap().0, 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let registry = PluginRegistry::new();
        let view = registry.clone();
        registry.register("b", Torch(0));
        registry.register("a", Torch(0));

        assert_eq!(view.paths(), vec!["a".to_string(), "b".to_string()]);
        assert!(view.unregister("a").is_some());
        assert!(!registry.contains("a"));
    }
}
