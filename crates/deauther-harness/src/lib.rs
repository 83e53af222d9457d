//! Deterministic simulation harness for the deauther interaction engine.
//!
//! Simulated implementations of the engine's seams, for reproducible tests on
//! tokio's paused clock:
//!
//! - [`SimDriver`]: scripted keys in, recorded renders out
//! - [`SimEnv`]: timers that record every requested delay
//! - [`SimBridge`]: command recorder with scripted status-flag reactions
//!
//! # Invariant Testing
//!
//! The `invariants` module checks properties of a finished run (no command
//! after `stop_attack`, no banner after the exit line) rather than specific
//! screens.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod sim_bridge;
pub mod sim_driver;
pub mod sim_env;

use deauther_app::{BridgeGateway, Console, EngineConfig, InterruptHub};

pub use invariants::{InvariantResult, Violation};
pub use sim_bridge::{BridgeStep, SimBridge};
pub use sim_driver::{Page, Script, SimDriver, SimDriverError, SimHandle, Step};
pub use sim_env::SimEnv;

/// Console wired to simulated collaborators, plus handles to observe them.
pub struct SimTerminal {
    /// The console under test.
    pub console: Console<SimDriver, SimEnv>,
    /// Render recordings.
    pub screen: SimHandle,
    /// Sleep recordings.
    pub env: SimEnv,
    /// Bridge recordings and status board.
    pub bridge: SimBridge,
    /// Interrupt hub shared with the console.
    pub hub: InterruptHub,
}

impl SimTerminal {
    /// Build a console that plays `script` against `bridge`.
    pub fn new(script: Script, bridge: SimBridge, config: EngineConfig) -> Self {
        let driver = SimDriver::new(script);
        let screen = driver.handle();
        let env = SimEnv::new();
        let hub = InterruptHub::new();
        let gateway = BridgeGateway::with_board(bridge.clone(), bridge.board());
        let console = Console::with_hub(driver, env.clone(), gateway, config, hub.clone());
        Self { console, screen, env, bridge, hub }
    }

    /// Same, with fast mode switched on.
    pub fn fast(script: Script, bridge: SimBridge, config: EngineConfig) -> Self {
        bridge.board().set_fast_mode(true);
        Self::new(script, bridge, config)
    }
}
