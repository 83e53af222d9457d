//! Simulated control bridge.
//!
//! Records every command the engine sends and replays a scripted reaction
//! per command kind against a shared [`StatusBoard`]. Reactions run on tokio
//! tasks, so under a paused runtime flag changes land at exact virtual
//! times. Steps before the first `Wait` apply synchronously, before `send`
//! returns.
//!
//! `stop_attack` aborts every running reaction and clears all flags, the way
//! the real bridge halts.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use deauther_app::CommandSink;
use deauther_core::{BridgeError, BridgeMessage, Command, CommandKind, StatusBoard, StatusFlag};
use tokio::task::AbortHandle;

/// One step of a scripted bridge reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeStep {
    /// Publish a flag value.
    Set(StatusFlag, bool),
    /// Queue a `typeOut` line for the terminal.
    Say(String),
    /// Let virtual time pass.
    Wait(Duration),
}

#[derive(Default)]
struct Recorded {
    payloads: Vec<String>,
    commands: Vec<Command>,
    tasks: Vec<AbortHandle>,
}

/// Recording bridge with scripted reactions.
#[derive(Clone, Default)]
pub struct SimBridge {
    board: StatusBoard,
    recorded: Arc<Mutex<Recorded>>,
    reactions: Arc<Mutex<HashMap<CommandKind, Vec<BridgeStep>>>>,
    fail_sends: Arc<Mutex<bool>>,
}

impl SimBridge {
    /// Bridge over a fresh board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reaction to `kind`.
    #[must_use]
    pub fn on(self, kind: CommandKind, steps: Vec<BridgeStep>) -> Self {
        self.reactions.lock().unwrap_or_else(PoisonError::into_inner).insert(kind, steps);
        self
    }

    /// Make every later send fail with [`BridgeError::Disconnected`].
    pub fn disconnect(&self) {
        *self.fail_sends.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    /// Shared status board.
    pub fn board(&self) -> StatusBoard {
        self.board.clone()
    }

    /// Commands received, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.lock().commands.clone()
    }

    /// Command kinds received, in order.
    pub fn kinds(&self) -> Vec<CommandKind> {
        self.lock().commands.iter().map(|c| c.command).collect()
    }

    /// Raw JSON payloads received, in order.
    pub fn payloads(&self) -> Vec<String> {
        self.lock().payloads.clone()
    }

    /// How many commands of `kind` were received.
    pub fn count(&self, kind: CommandKind) -> usize {
        self.lock().commands.iter().filter(|c| c.command == kind).count()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(board: &StatusBoard, step: &BridgeStep) {
        match step {
            BridgeStep::Set(flag, value) => board.set(*flag, *value),
            BridgeStep::Say(text) => board.push_message(BridgeMessage::type_out(text.clone())),
            BridgeStep::Wait(_) => {},
        }
    }

    fn react(&self, kind: CommandKind) {
        if kind == CommandKind::StopAttack {
            for task in self.lock().tasks.drain(..) {
                task.abort();
            }
            self.board.clear_all();
        }

        let Some(steps) =
            self.reactions.lock().unwrap_or_else(PoisonError::into_inner).get(&kind).cloned()
        else {
            return;
        };

        let split = steps.iter().position(|s| matches!(s, BridgeStep::Wait(_))).unwrap_or(steps.len());
        let (now, later) = steps.split_at(split);
        for step in now {
            Self::apply(&self.board, step);
        }
        if later.is_empty() {
            return;
        }

        let board = self.board.clone();
        let later = later.to_vec();
        let task = tokio::spawn(async move {
            for step in &later {
                match step {
                    BridgeStep::Wait(duration) => tokio::time::sleep(*duration).await,
                    other => Self::apply(&board, other),
                }
            }
        });
        self.lock().tasks.push(task.abort_handle());
    }
}

impl CommandSink for SimBridge {
    fn send(&self, payload: &str) -> Result<(), BridgeError> {
        if *self.fail_sends.lock().unwrap_or_else(PoisonError::into_inner) {
            return Err(BridgeError::Disconnected);
        }

        let command = Command::from_json(payload)?;
        tracing::debug!(command = %command.command, "sim bridge received");
        {
            let mut recorded = self.lock();
            recorded.payloads.push(payload.to_string());
            recorded.commands.push(command.clone());
        }
        self.react(command.command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn leading_steps_apply_synchronously() {
        let bridge = SimBridge::new().on(
            CommandKind::Scan,
            vec![
                BridgeStep::Set(StatusFlag::MonitorEnabling, true),
                BridgeStep::Wait(Duration::from_millis(100)),
                BridgeStep::Set(StatusFlag::MonitorEnabling, false),
            ],
        );
        let board = bridge.board();

        bridge.send(r#"{"command":"scan","data":""}"#).unwrap();
        assert!(board.get(StatusFlag::MonitorEnabling));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!board.get(StatusFlag::MonitorEnabling));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_attack_halts_reactions() {
        let bridge = SimBridge::new().on(
            CommandKind::Scan,
            vec![
                BridgeStep::Set(StatusFlag::Scanning, true),
                BridgeStep::Wait(Duration::from_millis(100)),
                BridgeStep::Set(StatusFlag::Attacking, true),
            ],
        );
        let board = bridge.board();

        bridge.send(r#"{"command":"scan","data":""}"#).unwrap();
        bridge.send(r#"{"command":"stop_attack","data":""}"#).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(!board.get(StatusFlag::Scanning));
        assert!(!board.get(StatusFlag::Attacking));
        assert_eq!(bridge.kinds(), vec![CommandKind::Scan, CommandKind::StopAttack]);
    }

    #[test]
    fn rejects_unknown_commands() {
        let bridge = SimBridge::new();
        assert!(bridge.send(r#"{"command":"reboot","data":""}"#).is_err());
        assert!(bridge.commands().is_empty());
    }
}
