//! # Commands
//!
//! A [`Command`] is one invocation travelling from the app side to the native
//! side: the action to run, its positional arguments and the pair of callbacks
//! the native layer answers through. Commands are built per call, handed to the
//! dispatcher and consumed when the bridge receives them.

use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// The service name every command is addressed to on the native side.
pub const SERVICE_NAME: &str = "BarcodeScanner";

/// Opaque, string-keyed options passed through to the native layer unmodified.
pub type Options = Map<String, Value>;

/// Invoked with the native success payload.
pub type SuccessCallback = Box<dyn FnOnce(Value) + Send + 'static>;
/// Invoked with the native error payload, verbatim.
pub type ErrorCallback = Box<dyn FnOnce(Value) + Send + 'static>;

/// The native capability a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Scan,
    Encode,
}

impl Action {
    /// The literal action name sent across the bridge.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Scan => "scan",
            Action::Encode => "encode",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is neither `"scan"` nor `"encode"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scan" => Ok(Action::Scan),
            "encode" => Ok(Action::Encode),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// A single forwarded invocation.
///
/// Holds exactly one success callback and one error callback. Both are `FnOnce`,
/// so whichever the native side picks can run at most once.
pub struct Command {
    pub action: Action,
    pub on_success: SuccessCallback,
    pub on_error: ErrorCallback,
    pub args: Vec<Value>,
}

impl Command {
    /// Builds a `scan` command. The argument sequence is `[options]`.
    pub fn scan(on_success: SuccessCallback, on_error: ErrorCallback, options: Options) -> Self {
        Self {
            action: Action::Scan,
            on_success,
            on_error,
            args: vec![Value::Object(options)],
        }
    }

    /// Builds an `encode` command. The argument sequence is `[type, data, options]`.
    pub fn encode(
        encode_type: String,
        data: String,
        on_success: SuccessCallback,
        on_error: ErrorCallback,
        options: Options,
    ) -> Self {
        Self {
            action: Action::Encode,
            on_success,
            on_error,
            args: vec![
                Value::String(encode_type),
                Value::String(data),
                Value::Object(options),
            ],
        }
    }

    /// Consumes the command and reports `reason` through its error callback.
    pub(crate) fn fail(self, reason: impl Into<String>) {
        (self.on_error)(Value::String(reason.into()));
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("action", &self.action)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noop() -> Box<dyn FnOnce(Value) + Send> {
        Box::new(|_| {})
    }

    #[test]
    fn action_literals_round_trip() {
        assert_eq!(Action::Scan.as_str(), "scan");
        assert_eq!(Action::Encode.to_string(), "encode");
        assert_eq!("scan".parse::<Action>(), Ok(Action::Scan));
        assert_eq!(
            "decode".parse::<Action>(),
            Err(UnknownAction("decode".to_string()))
        );
    }

    #[test]
    fn scan_args_wrap_options() {
        let mut options = Options::new();
        options.insert("prompt".into(), json!("Place a barcode inside the scan area"));

        let command = Command::scan(noop(), noop(), options);
        assert_eq!(command.action, Action::Scan);
        assert_eq!(
            command.args,
            vec![json!({ "prompt": "Place a barcode inside the scan area" })]
        );
    }

    #[test]
    fn encode_args_keep_type_and_data_separate() {
        let command = Command::encode(
            "TEXT_TYPE".into(),
            "http://www.nytimes.com".into(),
            noop(),
            noop(),
            Options::new(),
        );
        assert_eq!(command.action, Action::Encode);
        assert_eq!(
            command.args,
            vec![json!("TEXT_TYPE"), json!("http://www.nytimes.com"), json!({})]
        );
    }

    #[test]
    fn fail_reports_through_error_callback() {
        let (tx, rx) = std::sync::mpsc::channel();
        let command = Command::scan(
            noop(),
            Box::new(move |err| tx.send(err).unwrap()),
            Options::new(),
        );
        command.fail("dispatcher is not running");
        assert_eq!(rx.recv().unwrap(), json!("dispatcher is not running"));
    }
}
