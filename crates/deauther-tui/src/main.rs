//! Deauther terminal entry point.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use deauther_app::{BridgeGateway, Catalog, Console, EngineConfig, InterruptHub, KeyCombo, Runtime};
use deauther_core::{StatusBoard, SystemEnv};
use deauther_tui::{InProcessBridge, TerminalDriver, logging};

/// Retro terminal front end for the deauther bridge
#[derive(Parser, Debug)]
#[command(name = "deauther-tui")]
#[command(about = "Retro terminal front end for the deauther control bridge")]
#[command(version)]
struct Args {
    /// Skip typewriter animation and boot banners
    #[arg(long)]
    fast: bool,

    /// Menu catalog file (JSON). Defaults to the built-in catalog.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Status poll interval in milliseconds (minimum 10)
    #[arg(long, default_value_t = 500)]
    poll_ms: u64,

    /// Key combination that stops a running application
    #[arg(long, default_value = "ctrl+c")]
    interrupt: KeyCombo,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write logs to this directory instead of the per-user data directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Launch this application before the first shell prompt
    #[arg(long)]
    app: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let log_dir = args.log_dir.clone().unwrap_or_else(logging::default_log_dir);
    let _logging = logging::init(&log_dir, &args.log_level);

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    let config = EngineConfig::default()
        .with_poll_interval(Duration::from_millis(args.poll_ms))
        .with_interrupt(args.interrupt);

    let board = StatusBoard::new();
    board.set_fast_mode(args.fast);
    let bridge = InProcessBridge::new(board.clone());
    let gateway = BridgeGateway::with_board(bridge, board.clone());

    let hub = InterruptHub::new();
    let driver = TerminalDriver::new(hub.clone(), board)?;
    let console = Console::with_hub(driver, SystemEnv::new(), gateway, config, hub);

    let mut runtime = Runtime::new(console, catalog);
    if let Some(name) = args.app {
        runtime = runtime.with_autostart(name);
    }

    tracing::info!(fast = args.fast, "terminal started");
    Ok(runtime.run().await?)
}
