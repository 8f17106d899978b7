use crate::command::{ErrorCallback, SuccessCallback};
use async_trait::async_trait;
use serde_json::Value;

/// The platform-bridge primitive: the single point where app-side calls cross
/// over to native code.
///
/// Implementations receive the caller's callbacks untouched and are responsible
/// for eventually invoking at most one of them. Errors from the native layer are
/// reported through `on_error`; `exec` itself never fails.
///
/// The [`Dispatcher`](crate::dispatcher::Dispatcher) is generic over this trait, so
/// the same dispatcher runs against a real native host
/// ([`JsonLineBridge`](crate::transport::JsonLineBridge)) or a recording mock in tests.
#[async_trait]
pub trait PlatformBridge: Send + Sync {
    /// Forwards one command to the native side.
    ///
    /// # Arguments
    ///
    /// * `on_success` - Called with the native success payload.
    /// * `on_error` - Called with the native error payload.
    /// * `service` - The native service name, always [`SERVICE_NAME`](crate::command::SERVICE_NAME).
    /// * `action` - The action literal, `"scan"` or `"encode"`.
    /// * `args` - The positional arguments for the action.
    async fn exec(
        &self,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
        service: &str,
        action: &str,
        args: Vec<Value>,
    );
}
