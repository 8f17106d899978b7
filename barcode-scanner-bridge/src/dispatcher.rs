//! # Command Dispatcher
//!
//! The `Dispatcher` is a background worker that owns the platform bridge and
//! forwards queued commands to it.
//!
//! ## Purpose
//! Callers never touch the bridge directly. They push a [`Command`] onto the
//! dispatcher's queue through a [`DispatcherHandle`] and return immediately; the
//! worker picks the command up once the caller yields to the runtime and calls
//! [`PlatformBridge::exec`] with the fixed service name.
//!
//! Commands are forwarded one at a time, in the order they were queued.
use crate::{
    bridge::PlatformBridge,
    command::{Command, SERVICE_NAME},
    config::BridgeConfig,
    error::BridgeError,
};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// A background worker that forwards commands from a queue to the platform bridge.
pub struct Dispatcher {
    bridge: Arc<dyn PlatformBridge>,
    command_rx: mpsc::Receiver<DispatcherCommand>,
}

/// Defines commands that can be sent to the Dispatcher task.
#[derive(Debug)]
pub enum DispatcherCommand {
    Forward(Command),
    Shutdown,
}

#[derive(Clone, Debug)]
pub struct DispatcherHandle {
    command_tx: mpsc::Sender<DispatcherCommand>,
}

impl DispatcherHandle {
    /// Queues a command without waiting.
    ///
    /// If the queue is full or the dispatcher has stopped, the command is handed
    /// back inside the error so the caller can report the failure through it.
    pub fn submit(&self, command: Command) -> Result<(), (BridgeError, Command)> {
        match self.command_tx.try_send(DispatcherCommand::Forward(command)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(returned)) => reject(BridgeError::QueueFull, returned),
            Err(TrySendError::Closed(returned)) => reject(BridgeError::Unavailable, returned),
        }
    }

    /// Queues a command, waiting for capacity if the queue is full.
    pub async fn forward(&self, command: Command) -> Result<(), (BridgeError, Command)> {
        match self.command_tx.send(DispatcherCommand::Forward(command)).await {
            Ok(()) => Ok(()),
            Err(e) => reject(BridgeError::Unavailable, e.0),
        }
    }

    pub async fn stop(&self) {
        if self
            .command_tx
            .send(DispatcherCommand::Shutdown)
            .await
            .is_err()
        {
            tracing::warn!("Failed to send shutdown to dispatcher: it may already be down");
        }
    }

    /// Returns `true` once the dispatcher task has stopped receiving.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }
}

/// Hands a rejected command back to the caller together with the reason.
fn reject(err: BridgeError, returned: DispatcherCommand) -> Result<(), (BridgeError, Command)> {
    match returned {
        DispatcherCommand::Forward(command) => Err((err, command)),
        DispatcherCommand::Shutdown => Ok(()),
    }
}

impl Dispatcher {
    /// Creates a new `Dispatcher` and the handle used to feed it.
    pub fn new(config: &BridgeConfig, bridge: Arc<dyn PlatformBridge>) -> (Self, DispatcherHandle) {
        // tokio rejects a zero-capacity channel
        let capacity = config.channels.dispatcher_command_buffer.max(1);
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let dispatcher = Self { bridge, command_rx };
        let handle = DispatcherHandle { command_tx };
        (dispatcher, handle)
    }

    /// Runs the main loop for the dispatcher.
    ///
    /// Returns when a `Shutdown` command arrives or every handle has been dropped.
    pub async fn run(mut self) {
        tracing::info!("Dispatcher started. Waiting for commands...");
        while let Some(command) = self.command_rx.recv().await {
            if self.handle_command(command).await {
                break;
            }
        }
        // fail whatever is still queued
        self.command_rx.close();
        while let Ok(pending) = self.command_rx.try_recv() {
            if let DispatcherCommand::Forward(command) = pending {
                command.fail(BridgeError::Unavailable.to_string());
            }
        }
        tracing::info!("Dispatcher has shut down.");
    }

    /// Handles an incoming command. Returns `true` if the dispatcher should shut down.
    async fn handle_command(&mut self, command: DispatcherCommand) -> bool {
        match command {
            DispatcherCommand::Forward(command) => {
                let Command {
                    action,
                    on_success,
                    on_error,
                    args,
                } = command;
                tracing::debug!(%action, args = args.len(), "Forwarding command to bridge");
                self.bridge
                    .exec(on_success, on_error, SERVICE_NAME, action.as_str(), args)
                    .await;
                false
            }
            DispatcherCommand::Shutdown => {
                tracing::info!("Received shutdown command. Exiting.");
                true
            }
        }
    }
}
