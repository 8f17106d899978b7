//! # Barcode Scanner Plugin Object
//!
//! [`BarcodeScanner`] is what application code holds. It exposes the two native
//! capabilities in two flavours:
//!
//! - **Callback style** ([`scan`](BarcodeScanner::scan), [`encode`](BarcodeScanner::encode)):
//!   builds a [`Command`], queues it and returns at once. The bridge only sees the
//!   command after the caller yields to the runtime.
//! - **Future style** ([`scan_async`](BarcodeScanner::scan_async),
//!   [`encode_async`](BarcodeScanner::encode_async)): the same command, with
//!   callbacks that complete a oneshot channel. The future resolves exactly once.
//!
//! The scanner does not look at options, types or data. Whatever the native side
//! reports is handed back verbatim.

use crate::{
    command::{Command, ErrorCallback, Options, SuccessCallback},
    config::ScannerConfig,
    dispatcher::DispatcherHandle,
    error::BridgeError,
    result::ScanResult,
};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tokio::sync::oneshot;

/// Error payload reported when the concurrent-scan guard rejects a `scan`.
pub const SCAN_IN_PROGRESS: &str = "Scan is already in progress";

/// The app-facing barcode scanner plugin.
///
/// Cheap to clone; every clone feeds the same dispatcher and shares the same
/// concurrent-scan guard.
#[derive(Debug, Clone)]
pub struct BarcodeScanner {
    dispatcher: DispatcherHandle,
    /// Present only when `reject-concurrent-scans` is enabled.
    scan_busy: Option<Arc<AtomicBool>>,
}

impl BarcodeScanner {
    pub fn new(dispatcher: DispatcherHandle, config: &ScannerConfig) -> Self {
        Self {
            dispatcher,
            scan_busy: config
                .reject_concurrent_scans
                .then(|| Arc::new(AtomicBool::new(false))),
        }
    }

    /// Opens the native scanner.
    ///
    /// The command is forwarded with the argument sequence `[options]`. Exactly one
    /// of `on_success` / `on_error` is eventually called by the native side.
    pub fn scan<S, E>(&self, on_success: S, on_error: E, options: impl Into<Options>)
    where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        match self.guard_scan(Box::new(on_success), Box::new(on_error)) {
            Ok((on_success, on_error)) => {
                self.submit(Command::scan(on_success, on_error, options.into()))
            }
            Err(on_error) => on_error(Value::String(SCAN_IN_PROGRESS.to_string())),
        }
    }

    /// Asks the native side to render `data` as a barcode.
    ///
    /// The command is forwarded with the argument sequence `[type, data, options]`.
    pub fn encode<S, E>(
        &self,
        encode_type: impl Into<String>,
        data: impl Into<String>,
        on_success: S,
        on_error: E,
        options: impl Into<Options>,
    ) where
        S: FnOnce(Value) + Send + 'static,
        E: FnOnce(Value) + Send + 'static,
    {
        self.submit(Command::encode(
            encode_type.into(),
            data.into(),
            Box::new(on_success),
            Box::new(on_error),
            options.into(),
        ));
    }

    /// Future-returning form of [`scan`](Self::scan).
    ///
    /// # Returns
    ///
    /// - `Ok(ScanResult)` decoded from the native success payload.
    /// - `Err(BridgeError::Native)` with the native error payload.
    /// - `Err(BridgeError::ScanInProgress)` if the guard is enabled and another scan is pending.
    /// - `Err(BridgeError::Unavailable)` / `Err(BridgeError::Dropped)` if the command never got an answer.
    pub async fn scan_async(&self, options: impl Into<Options>) -> Result<ScanResult, BridgeError> {
        let (on_success, on_error, answer) = oneshot_callbacks();
        let (on_success, on_error) = self
            .guard_scan(on_success, on_error)
            .map_err(|_| BridgeError::ScanInProgress)?;

        let payload = self
            .call(Command::scan(on_success, on_error, options.into()), answer)
            .await?;
        Ok(ScanResult::from_value(payload)?)
    }

    /// Future-returning form of [`encode`](Self::encode). Resolves to the raw native payload.
    pub async fn encode_async(
        &self,
        encode_type: impl Into<String>,
        data: impl Into<String>,
        options: impl Into<Options>,
    ) -> Result<Value, BridgeError> {
        let (on_success, on_error, answer) = oneshot_callbacks();
        let command = Command::encode(
            encode_type.into(),
            data.into(),
            on_success,
            on_error,
            options.into(),
        );
        self.call(command, answer).await
    }

    /// Returns `true` while a guarded scan is waiting for its answer.
    pub fn scan_in_progress(&self) -> bool {
        self.scan_busy
            .as_ref()
            .is_some_and(|busy| busy.load(Ordering::Acquire))
    }

    fn submit(&self, command: Command) {
        if let Err((err, command)) = self.dispatcher.submit(command) {
            tracing::warn!(action = %command.action, error = %err, "Failed to queue command");
            command.fail(err.to_string());
        }
    }

    async fn call(
        &self,
        command: Command,
        answer: oneshot::Receiver<Result<Value, Value>>,
    ) -> Result<Value, BridgeError> {
        if let Err((err, command)) = self.dispatcher.forward(command).await {
            tracing::warn!(action = %command.action, error = %err, "Failed to queue command");
            return Err(err);
        }

        match answer.await {
            Ok(Ok(payload)) => Ok(payload),
            Ok(Err(payload)) => Err(BridgeError::Native(payload)),
            Err(_) => Err(BridgeError::Dropped),
        }
    }

    /// Wraps scan callbacks so the guard is released on whichever path finishes the scan.
    ///
    /// Hands the error callback back untouched when another scan is in flight.
    fn guard_scan(
        &self,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
    ) -> Result<(SuccessCallback, ErrorCallback), ErrorCallback> {
        let Some(busy) = &self.scan_busy else {
            return Ok((on_success, on_error));
        };
        if busy.swap(true, Ordering::AcqRel) {
            return Err(on_error);
        }

        let slot = Arc::new(ScanSlot::new(Arc::clone(busy)));
        let success_slot = Arc::clone(&slot);
        let on_success: SuccessCallback = Box::new(move |payload| {
            success_slot.release();
            on_success(payload)
        });
        let on_error: ErrorCallback = Box::new(move |payload| {
            slot.release();
            on_error(payload)
        });
        Ok((on_success, on_error))
    }
}

/// Holds the concurrent-scan flag for one scan.
///
/// Released explicitly before the caller's callback runs, or on drop if the bridge
/// discards the callbacks without calling either.
struct ScanSlot {
    busy: Arc<AtomicBool>,
    released: AtomicBool,
}

impl ScanSlot {
    fn new(busy: Arc<AtomicBool>) -> Self {
        Self {
            busy,
            released: AtomicBool::new(false),
        }
    }

    fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.busy.store(false, Ordering::Release);
        }
    }
}

impl Drop for ScanSlot {
    fn drop(&mut self) {
        self.release();
    }
}

/// Builds a callback pair that completes a oneshot channel with the first answer.
fn oneshot_callbacks() -> (
    SuccessCallback,
    ErrorCallback,
    oneshot::Receiver<Result<Value, Value>>,
) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let error_tx = Arc::clone(&tx);

    let on_success: SuccessCallback = Box::new(move |payload| complete(&tx, Ok(payload)));
    let on_error: ErrorCallback = Box::new(move |payload| complete(&error_tx, Err(payload)));
    (on_success, on_error, rx)
}

fn complete(
    tx: &Mutex<Option<oneshot::Sender<Result<Value, Value>>>>,
    answer: Result<Value, Value>,
) {
    let sender = tx.lock().ok().and_then(|mut guard| guard.take());
    if let Some(sender) = sender {
        // the caller may have dropped the future already
        let _ = sender.send(answer);
    }
}
