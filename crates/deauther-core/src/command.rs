//! Bridge message contract.
//!
//! Outbound [`Command`]s travel from the engine to the control bridge as one
//! JSON object per message:
//!
//! ```json
//! { "command": "scan", "data": "" }
//! ```
//!
//! Inbound [`BridgeMessage`]s travel the other way and carry text the bridge
//! wants shown on the terminal (`typeOut`) or lifecycle notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::BridgeError;

/// Actions the bridge understands. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Open the bridge's settings window.
    Settings,
    /// Enable monitor mode, scan, and attack non-whitelisted targets.
    Scan,
    /// Open the whitelist editor.
    Whitelist,
    /// Halt whatever the bridge is currently doing.
    StopAttack,
}

impl CommandKind {
    /// Wire name of this command.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Scan => "scan",
            Self::Whitelist => "whitelist",
            Self::StopAttack => "stop_attack",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound message to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Action to perform.
    pub command: CommandKind,
    /// Free-form payload. Every current action sends an empty string.
    pub data: String,
}

impl Command {
    /// Build a command with the given payload.
    pub fn new(command: CommandKind, data: impl Into<String>) -> Self {
        Self { command, data: data.into() }
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Encode(e.to_string()))
    }

    /// Parse the JSON wire form. Unknown command names are rejected.
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Decode(e.to_string()))
    }
}

/// Kinds of message the bridge pushes to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InboundKind {
    /// Text to render on the terminal.
    TypeOut,
    /// The bridge finished loading.
    AppReady,
    /// Liveness check.
    Ping,
    /// Anything this engine does not know about.
    #[serde(other)]
    Unknown,
}

/// One inbound message from the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeMessage {
    /// Message kind.
    pub command: InboundKind,
    /// Payload; text for `typeOut`, arbitrary JSON otherwise.
    #[serde(default)]
    pub data: Value,
}

impl BridgeMessage {
    /// A `typeOut` message carrying a line of text.
    pub fn type_out(text: impl Into<String>) -> Self {
        Self { command: InboundKind::TypeOut, data: Value::String(text.into()) }
    }

    /// Text to render, if this message carries any.
    ///
    /// Non-string `typeOut` payloads are rendered as their JSON form.
    pub fn text(&self) -> Option<String> {
        match (self.command, &self.data) {
            (InboundKind::TypeOut, Value::String(s)) => Some(s.clone()),
            (InboundKind::TypeOut, Value::Null) => None,
            (InboundKind::TypeOut, other) => Some(other.to_string()),
            _ => None,
        }
    }

    /// Parse the JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Decode(e.to_string()))
    }
}
