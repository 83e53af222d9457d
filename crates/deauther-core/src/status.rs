//! Externally-owned status flags.
//!
//! The bridge mutates these asynchronously; the engine only reads them at a
//! fixed cadence. [`StatusBoard`] is the shared, process-wide context object
//! both sides hold a clone of.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};

use crate::BridgeMessage;

/// Flags published by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFlag {
    /// The wireless interface is being switched into monitor mode.
    MonitorEnabling,
    /// A network scan is running.
    Scanning,
    /// An attack is running.
    Attacking,
}

impl StatusFlag {
    /// All flags, in lifecycle order.
    pub const ALL: [StatusFlag; 3] =
        [StatusFlag::MonitorEnabling, StatusFlag::Scanning, StatusFlag::Attacking];

    fn index(self) -> usize {
        match self {
            Self::MonitorEnabling => 0,
            Self::Scanning => 1,
            Self::Attacking => 2,
        }
    }
}

#[derive(Debug, Default)]
struct BoardInner {
    flags: [AtomicBool; 3],
    fast_mode: AtomicBool,
    inbox: Mutex<VecDeque<BridgeMessage>>,
}

/// Shared status and configuration context.
///
/// Cheap to clone; every clone observes the same flags. Reads are lock-free
/// so a poll never blocks the engine.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<BoardInner>,
}

impl StatusBoard {
    /// Create a board with every flag cleared and fast mode off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time read of a flag.
    pub fn get(&self, flag: StatusFlag) -> bool {
        self.inner.flags[flag.index()].load(Ordering::Acquire)
    }

    /// Publish a flag value.
    pub fn set(&self, flag: StatusFlag, value: bool) {
        self.inner.flags[flag.index()].store(value, Ordering::Release);
    }

    /// Clear every flag.
    pub fn clear_all(&self) {
        for flag in StatusFlag::ALL {
            self.set(flag, false);
        }
    }

    /// Whether typewriter animation is disabled.
    pub fn fast_mode(&self) -> bool {
        self.inner.fast_mode.load(Ordering::Acquire)
    }

    /// Enable or disable fast mode.
    pub fn set_fast_mode(&self, enabled: bool) {
        self.inner.fast_mode.store(enabled, Ordering::Release);
    }

    /// Queue a message for the terminal.
    pub fn push_message(&self, message: BridgeMessage) {
        self.inner.inbox.lock().unwrap_or_else(PoisonError::into_inner).push_back(message);
    }

    /// Take every queued message, oldest first.
    pub fn take_messages(&self) -> Vec<BridgeMessage> {
        self.inner.inbox.lock().unwrap_or_else(PoisonError::into_inner).drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_flags() {
        let board = StatusBoard::new();
        let reader = board.clone();

        board.set(StatusFlag::Scanning, true);
        assert!(reader.get(StatusFlag::Scanning));
        assert!(!reader.get(StatusFlag::Attacking));

        board.clear_all();
        assert!(!reader.get(StatusFlag::Scanning));
    }

    #[test]
    fn messages_drain_in_order() {
        let board = StatusBoard::new();
        board.push_message(BridgeMessage::type_out("one"));
        board.push_message(BridgeMessage::type_out("two"));

        let texts: Vec<_> = board.take_messages().iter().filter_map(BridgeMessage::text).collect();
        assert_eq!(texts, vec!["one".to_string(), "two".to_string()]);
        assert!(board.take_messages().is_empty());
    }

    #[test]
    fn fast_mode_toggles() {
        let board = StatusBoard::new();
        assert!(!board.fast_mode());
        board.set_fast_mode(true);
        assert!(board.clone().fast_mode());
    }
}
