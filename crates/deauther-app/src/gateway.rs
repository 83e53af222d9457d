//! Bridge gateway.
//!
//! The single point through which the engine talks to the control bridge.
//! Outbound traffic goes through a [`CommandSink`]; status, fast mode and
//! queued inbound messages are read from a [`HostContext`].

use std::sync::Arc;

use deauther_core::{BridgeError, BridgeMessage, Command, CommandKind, StatusBoard, StatusFlag};

/// Transport for serialized commands.
pub trait CommandSink: Send + Sync {
    /// Deliver one JSON payload. Fire-and-forget: no reply is awaited.
    fn send(&self, payload: &str) -> Result<(), BridgeError>;
}

impl<S: CommandSink + ?Sized> CommandSink for Arc<S> {
    fn send(&self, payload: &str) -> Result<(), BridgeError> {
        (**self).send(payload)
    }
}

/// Read-only view of host-owned state.
pub trait HostContext: Send + Sync {
    /// Point-in-time read of a status flag.
    fn status(&self, flag: StatusFlag) -> bool;

    /// Whether typewriter animation is disabled.
    fn fast_mode(&self) -> bool;

    /// Drain inbound bridge messages.
    fn take_messages(&self) -> Vec<BridgeMessage> {
        Vec::new()
    }
}

impl HostContext for StatusBoard {
    fn status(&self, flag: StatusFlag) -> bool {
        self.get(flag)
    }

    fn fast_mode(&self) -> bool {
        StatusBoard::fast_mode(self)
    }

    fn take_messages(&self) -> Vec<BridgeMessage> {
        StatusBoard::take_messages(self)
    }
}

/// Command channel plus host context.
pub struct BridgeGateway {
    sink: Box<dyn CommandSink>,
    context: Arc<dyn HostContext>,
}

impl std::fmt::Debug for BridgeGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeGateway").finish_non_exhaustive()
    }
}

impl BridgeGateway {
    /// Build a gateway from a sink and a context.
    pub fn new(sink: impl CommandSink + 'static, context: Arc<dyn HostContext>) -> Self {
        Self { sink: Box::new(sink), context }
    }

    /// Gateway over a [`StatusBoard`].
    pub fn with_board(sink: impl CommandSink + 'static, board: StatusBoard) -> Self {
        Self::new(sink, Arc::new(board))
    }

    /// Serialize and deliver one command. The payload is always empty.
    ///
    /// # Errors
    ///
    /// Encoding failures and transport errors are returned unchanged.
    pub fn send(&self, kind: CommandKind) -> Result<(), BridgeError> {
        let payload = Command::new(kind, "").to_json()?;
        tracing::info!(command = %kind, "bridge command");
        self.sink.send(&payload)
    }

    /// Point-in-time read of a status flag.
    pub fn poll_status(&self, flag: StatusFlag) -> bool {
        self.context.status(flag)
    }

    /// Whether fast mode is on.
    pub fn fast_mode(&self) -> bool {
        self.context.fast_mode()
    }

    /// Drain inbound messages.
    pub fn take_messages(&self) -> Vec<BridgeMessage> {
        self.context.take_messages()
    }
}
