//! Interrupt listener registration.
//!
//! At most one run at a time owns the interrupt key combination. The owner
//! holds an [`InterruptGuard`]; dropping it releases the listener on every
//! exit path, including errors and early returns.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use crate::{EngineError, KeyCombo, KeyEvent};

#[derive(Debug, Clone, Copy)]
struct Listener {
    id: u64,
    combo: KeyCombo,
}

/// Process-wide interrupt slot.
///
/// Clones share the slot. The terminal driver holds one to decide whether
/// Ctrl+C belongs to a run or to the host.
#[derive(Debug, Clone, Default)]
pub struct InterruptHub {
    slot: Arc<Mutex<Option<Listener>>>,
    next_id: Arc<AtomicU64>,
}

impl InterruptHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the interrupt slot for `combo`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InterruptBusy`] if another guard is alive.
    pub fn register(&self, combo: KeyCombo) -> Result<InterruptGuard, EngineError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(EngineError::InterruptBusy);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *slot = Some(Listener { id, combo });
        tracing::debug!(id, %combo, "interrupt listener registered");

        Ok(InterruptGuard { hub: self.clone(), id })
    }

    /// Whether a listener is registered.
    pub fn armed(&self) -> bool {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Whether `event` triggers the registered listener.
    pub fn intercepts(&self, event: &KeyEvent) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|listener| listener.combo.matches(event))
    }

    fn release(&self, id: u64) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some_and(|listener| listener.id == id) {
            *slot = None;
            tracing::debug!(id, "interrupt listener released");
        }
    }
}

/// Ownership of the interrupt slot. Released on drop.
#[derive(Debug)]
#[must_use = "the listener is released as soon as the guard is dropped"]
pub struct InterruptGuard {
    hub: InterruptHub,
    id: u64,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.hub.release(self.id);
    }
}
