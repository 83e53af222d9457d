//! In-process control bridge.
//!
//! Stands in for the external wireless backend: parses each command, drives
//! the status flags through the monitor → scan → attack lifecycle on a tokio
//! task, and reports back through `typeOut` messages on the shared
//! [`StatusBoard`]. No radio is touched.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use deauther_app::CommandSink;
use deauther_core::{BridgeError, BridgeMessage, Command, CommandKind, StatusBoard, StatusFlag};
use rand::Rng;
use tokio::task::AbortHandle;

/// Lifecycle timings.
#[derive(Debug, Clone, Copy)]
pub struct BridgeTimings {
    /// Time spent switching the interface into monitor mode.
    pub monitor: Duration,
    /// Time spent scanning.
    pub scan: Duration,
    /// Time spent attacking.
    pub attack: Duration,
}

impl Default for BridgeTimings {
    fn default() -> Self {
        Self {
            monitor: Duration::from_millis(1500),
            scan: Duration::from_secs(5),
            attack: Duration::from_secs(4),
        }
    }
}

#[derive(Default)]
struct Lifecycle {
    generation: u64,
    task: Option<AbortHandle>,
}

/// Publishes on behalf of one scan task.
///
/// Every write happens under the lifecycle lock and only while the scan's
/// generation is current, so nothing lands after a halt even if the task is
/// mid-poll on another worker.
#[derive(Clone)]
struct Publisher {
    board: StatusBoard,
    lifecycle: Arc<Mutex<Lifecycle>>,
    generation: u64,
}

impl Publisher {
    fn set(&self, flag: StatusFlag, value: bool) -> bool {
        self.publish(|board| board.set(flag, value))
    }

    fn say(&self, text: String) -> bool {
        self.publish(|board| board.push_message(BridgeMessage::type_out(text)))
    }

    fn publish(&self, write: impl FnOnce(&StatusBoard)) -> bool {
        let lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if lifecycle.generation != self.generation {
            return false;
        }
        write(&self.board);
        true
    }
}

/// Simulated bridge running inside the terminal process.
#[derive(Clone)]
pub struct InProcessBridge {
    board: StatusBoard,
    timings: BridgeTimings,
    lifecycle: Arc<Mutex<Lifecycle>>,
}

impl InProcessBridge {
    /// Bridge publishing to `board`.
    pub fn new(board: StatusBoard) -> Self {
        Self::with_timings(board, BridgeTimings::default())
    }

    /// Bridge with custom lifecycle timings.
    pub fn with_timings(board: StatusBoard, timings: BridgeTimings) -> Self {
        Self { board, timings, lifecycle: Arc::new(Mutex::new(Lifecycle::default())) }
    }

    /// Queue a line for the terminal.
    fn say(&self, text: impl Into<String>) {
        self.board.push_message(BridgeMessage::type_out(text));
    }

    /// Abort the running scan and clear every flag. Returns a publisher for
    /// the next scan.
    fn halt(&self) -> Publisher {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        lifecycle.generation += 1;
        if let Some(task) = lifecycle.task.take() {
            task.abort();
        }
        self.board.clear_all();
        Publisher {
            board: self.board.clone(),
            lifecycle: Arc::clone(&self.lifecycle),
            generation: lifecycle.generation,
        }
    }

    fn start_scan(&self) {
        let publisher = self.halt();
        // Raised before returning so the first status poll already sees it.
        publisher.set(StatusFlag::MonitorEnabling, true);

        let timings = self.timings;
        let worker = publisher.clone();
        let task = tokio::spawn(async move {
            worker.say("Scanning for networks".to_string());
            tokio::time::sleep(timings.monitor).await;

            if !(worker.set(StatusFlag::Scanning, true)
                && worker.set(StatusFlag::MonitorEnabling, false))
            {
                return;
            }
            tokio::time::sleep(timings.scan).await;

            let (networks, clients) = {
                let mut rng = rand::rng();
                (rng.random_range(2..12), rng.random_range(0..24))
            };
            worker.say(format!("Loaded targets: {networks} networks, {clients} clients."));

            let attack = clients > 0;
            if attack && !worker.set(StatusFlag::Attacking, true) {
                return;
            }
            if !worker.set(StatusFlag::Scanning, false) || !attack {
                return;
            }
            tokio::time::sleep(timings.attack).await;
            worker.set(StatusFlag::Attacking, false);
        });

        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        if lifecycle.generation == publisher.generation {
            lifecycle.task = Some(task.abort_handle());
        } else {
            task.abort();
        }
    }
}

impl CommandSink for InProcessBridge {
    fn send(&self, payload: &str) -> Result<(), BridgeError> {
        let command = Command::from_json(payload)?;
        tracing::debug!(command = %command.command, data = %command.data, "bridge received");

        match command.command {
            CommandKind::Scan => self.start_scan(),
            CommandKind::StopAttack => {
                self.halt();
                self.say("All operations halted.");
            },
            CommandKind::Whitelist => self.say("Whitelist editor opened in the bridge window."),
            CommandKind::Settings => self.say("Settings opened in the bridge window."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan() -> String {
        Command::new(CommandKind::Scan, "").to_json().unwrap()
    }

    fn texts(board: &StatusBoard) -> Vec<String> {
        board.take_messages().iter().filter_map(BridgeMessage::text).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn scan_walks_the_lifecycle() {
        let board = StatusBoard::new();
        let bridge = InProcessBridge::new(board.clone());

        bridge.send(&scan()).unwrap();
        assert!(board.get(StatusFlag::MonitorEnabling));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(board.get(StatusFlag::Scanning));
        assert!(!board.get(StatusFlag::MonitorEnabling));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(StatusFlag::ALL.iter().all(|flag| !board.get(*flag)));

        let texts = texts(&board);
        assert_eq!(texts[0], "Scanning for networks");
        assert!(texts[1].starts_with("Loaded targets: "));
    }

    #[tokio::test(start_paused = true)]
    async fn halted_scan_cannot_publish() {
        let board = StatusBoard::new();
        let bridge = InProcessBridge::new(board.clone());

        let stale = bridge.halt();
        bridge.halt();

        assert!(!stale.set(StatusFlag::Attacking, true));
        assert!(!stale.say("late".to_string()));
        assert!(!board.get(StatusFlag::Attacking));
        assert!(board.take_messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_a_running_scan() {
        let board = StatusBoard::new();
        let bridge = InProcessBridge::new(board.clone());

        bridge.send(&scan()).unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(board.get(StatusFlag::Scanning));

        bridge.send(&Command::new(CommandKind::StopAttack, "").to_json().unwrap()).unwrap();
        assert!(!board.get(StatusFlag::Scanning));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(StatusFlag::ALL.iter().all(|flag| !board.get(*flag)));
        assert!(!texts(&board).iter().any(|t| t.starts_with("Loaded targets")));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let bridge = InProcessBridge::new(StatusBoard::new());
        assert!(matches!(bridge.send("not json"), Err(BridgeError::Decode(_))));
    }
}
