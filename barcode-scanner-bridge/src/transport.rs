//! # JSON-line Bridge
//!
//! A [`PlatformBridge`] that talks to a native host over any async byte stream,
//! one JSON document per line. In production the stream is a child process's
//! stdio; in tests it is an in-memory duplex pipe.
//!
//! ## Wire format
//!
//! Requests (bridge → host):
//!
//! ```text
//! {"id":1,"service":"BarcodeScanner","action":"scan","args":[{"prompt":"..."}]}
//! ```
//!
//! Responses (host → bridge):
//!
//! ```text
//! {"id":1,"status":"ok","message":{"text":"...","format":"QR_CODE","cancelled":false}}
//! {"id":1,"status":"error","message":"Camera access denied"}
//! ```
//!
//! Each request id is answered at most once. The callbacks for an id are kept in
//! a pending table until its response arrives or the host goes away.

use crate::{
    bridge::PlatformBridge,
    command::{ErrorCallback, SuccessCallback},
    error::BridgeError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, PoisonError,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    sync::Mutex,
    task::JoinHandle,
};
use tokio_stream::{wrappers::LinesStream, StreamExt};

/// Error payload delivered to every pending call once the host's output ends.
pub const HOST_CLOSED: &str = "native host closed the bridge";

/// One request line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub id: u64,
    pub service: String,
    pub action: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub id: u64,
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: Value,
}

struct PendingCall {
    on_success: SuccessCallback,
    on_error: ErrorCallback,
}

/// Callbacks are `Send` but not `Sync`; the mutex lets the table be shared.
type PendingSlot = std::sync::Mutex<PendingCall>;

fn take_call(slot: PendingSlot) -> PendingCall {
    slot.into_inner().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the bridge and its reader task.
#[derive(Default)]
struct Shared {
    pending: DashMap<u64, PendingSlot>,
    closed: AtomicBool,
}

impl Shared {
    fn fail(&self, id: u64, reason: &str) {
        if let Some((_, slot)) = self.pending.remove(&id) {
            (take_call(slot).on_error)(Value::String(reason.to_string()));
        }
    }

    /// Routes one response line to the callbacks waiting on its id.
    fn route(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let response: BridgeResponse = match serde_json::from_str(line) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed line from native host");
                return;
            }
        };

        let Some((id, slot)) = self.pending.remove(&response.id) else {
            tracing::warn!(id = response.id, "Response for unknown request id");
            return;
        };
        let call = take_call(slot);

        tracing::debug!(id, status = ?response.status, "Response received from native host");
        match response.status {
            ResponseStatus::Ok => (call.on_success)(response.message),
            ResponseStatus::Error => (call.on_error)(response.message),
        }
    }

    /// Marks the host as gone and fails every call still waiting for an answer.
    fn close(&self) {
        self.closed.store(true, Ordering::Release);
        let ids: Vec<u64> = self.pending.iter().map(|e| *e.key()).collect();
        if !ids.is_empty() {
            tracing::warn!(pending = ids.len(), "Native host closed with calls outstanding");
        }
        for id in ids {
            self.fail(id, HOST_CLOSED);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// A platform bridge speaking line-delimited JSON to a native host.
pub struct JsonLineBridge {
    writer: Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
    shared: Arc<Shared>,
    next_id: AtomicU64,
}

impl JsonLineBridge {
    /// Creates the bridge and spawns the task that reads host responses.
    ///
    /// The returned `JoinHandle` finishes when the host's output ends or fails to
    /// read; by then every pending call has been failed with [`HOST_CLOSED`].
    pub fn new<R, W>(reader: R, writer: W) -> (Self, JoinHandle<()>)
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let shared = Arc::new(Shared::default());
        let reader_task = tokio::spawn(read_responses(reader, Arc::clone(&shared)));

        let bridge = Self {
            writer: Mutex::new(Box::new(writer)),
            shared,
            next_id: AtomicU64::new(1),
        };
        (bridge, reader_task)
    }

    /// Number of requests still waiting for a response.
    pub fn pending_calls(&self) -> usize {
        self.shared.pending.len()
    }

    async fn send_request(&self, request: &BridgeRequest) -> Result<(), BridgeError> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl PlatformBridge for JsonLineBridge {
    async fn exec(
        &self,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
        service: &str,
        action: &str,
        args: Vec<Value>,
    ) {
        if self.shared.is_closed() {
            on_error(Value::String(HOST_CLOSED.to_string()));
            return;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = BridgeRequest {
            id,
            service: service.to_string(),
            action: action.to_string(),
            args,
        };

        // registered before writing so a fast answer always finds its callbacks
        self.shared.pending.insert(
            id,
            PendingSlot::new(PendingCall {
                on_success,
                on_error,
            }),
        );

        // the reader may have closed between the check above and the insert
        if self.shared.is_closed() {
            self.shared.fail(id, HOST_CLOSED);
            return;
        }

        if let Err(e) = self.send_request(&request).await {
            tracing::warn!(id, error = %e, "Failed to write request to native host");
            self.shared.fail(id, &e.to_string());
            return;
        }

        tracing::debug!(id, service, action, "Request sent to native host");
    }
}

async fn read_responses<R>(reader: R, shared: Arc<Shared>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = LinesStream::new(BufReader::new(reader).lines());
    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => shared.route(&line),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read from native host");
                break;
            }
        }
    }
    tracing::info!("Native host output closed.");
    shared.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_line_shape() {
        let request = BridgeRequest {
            id: 7,
            service: "BarcodeScanner".into(),
            action: "encode".into(),
            args: vec![json!("TEXT_TYPE"), json!("hello"), json!({})],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "id": 7,
                "service": "BarcodeScanner",
                "action": "encode",
                "args": ["TEXT_TYPE", "hello", {}],
            })
        );
    }

    #[test]
    fn response_message_defaults_to_null() {
        let response: BridgeResponse = serde_json::from_str(r#"{"id":3,"status":"ok"}"#).unwrap();
        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(response.message, Value::Null);
    }

    #[test]
    fn route_ignores_blank_and_unknown_lines() {
        let shared = Shared::default();
        shared.route("   ");
        shared.route("not json");
        shared.route(r#"{"id":99,"status":"error","message":"nope"}"#);
        assert!(shared.pending.is_empty());
    }

    #[test]
    fn close_fails_pending_calls_once() {
        let shared = Shared::default();
        let (tx, rx) = std::sync::mpsc::channel();
        shared.pending.insert(
            1,
            PendingSlot::new(PendingCall {
                on_success: Box::new(|_| panic!("success must not run")),
                on_error: Box::new(move |err| tx.send(err).unwrap()),
            }),
        );

        shared.close();
        shared.close();

        assert_eq!(rx.recv().unwrap(), json!(HOST_CLOSED));
        assert!(rx.try_recv().is_err());
        assert!(shared.is_closed());
    }
}
