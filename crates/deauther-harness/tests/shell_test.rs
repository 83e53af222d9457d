//! Shell loop behavior: dispatch, error recovery and shutdown.

use deauther_app::{Catalog, EngineConfig, Runtime};
use deauther_core::{BridgeMessage, CommandKind};
use deauther_harness::{
    Script, SimBridge, SimDriver, SimEnv, SimTerminal, invariants::appears_in_order,
};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

fn runtime(term: SimTerminal, catalog: Catalog) -> Runtime<SimDriver, SimEnv> {
    Runtime::new(term.console, catalog)
}

#[tokio::test(start_paused = true)]
async fn failed_commands_do_not_end_the_shell() {
    let script = Script::new().line("frobnicate").line("run nosuch").line("apps").line("exit");
    let term = SimTerminal::fast(script, SimBridge::new(), EngineConfig::default());
    let screen = term.screen.clone();

    runtime(term, Catalog::builtin().unwrap()).run().await.unwrap();

    appears_in_order(
        &screen.transcript(),
        &lines(&[
            "deauther terminal v0.1",
            "root@deauther:~# frobnicate",
            "ERROR: unknown command: frobnicate",
            "root@deauther:~# run nosuch",
            "ERROR: unknown application: nosuch",
            "root@deauther:~# apps",
            "deauth     Scan for targets and deauthenticate non-whitelisted clients",
            "recon      Passive scan without attacking",
            "root@deauther:~# exit",
        ]),
    )
    .unwrap();
    assert!(screen.stopped());
}

#[tokio::test(start_paused = true)]
async fn help_prints_the_help_screen() {
    let script = Script::new().line("help").line("exit");
    let term = SimTerminal::fast(script, SimBridge::new(), EngineConfig::default());
    let screen = term.screen.clone();
    let catalog = Catalog::builtin().unwrap();
    let help = catalog.screen("help").unwrap().to_vec();

    runtime(term, catalog).run().await.unwrap();

    appears_in_order(&screen.transcript(), &help).unwrap();
}

#[tokio::test(start_paused = true)]
async fn missing_screen_is_reported_and_shell_continues() {
    let catalog = Catalog::from_json(
        r#"{
            "screens": {},
            "apps": [{
                "name": "broken",
                "banner": "missing",
                "options": [{ "label": "Scan", "command": "scan" }],
                "quit_token": "q"
            }]
        }"#,
    )
    .unwrap();
    let script = Script::new().line("broken").line("exit");
    let term = SimTerminal::fast(script, SimBridge::new(), EngineConfig::default());
    let (screen, hub) = (term.screen.clone(), term.hub.clone());

    runtime(term, catalog).run().await.unwrap();

    appears_in_order(
        &screen.transcript(),
        &lines(&["ERROR: screen not found: missing", "root@deauther:~# exit"]),
    )
    .unwrap();
    assert!(!hub.armed(), "a failed run releases the interrupt listener");
}

#[tokio::test(start_paused = true)]
async fn autostart_launches_before_the_first_prompt() {
    let script = Script::new().line("q").line("exit");
    let term = SimTerminal::fast(script, SimBridge::new(), EngineConfig::default());
    let screen = term.screen.clone();

    runtime(term, Catalog::builtin().unwrap()).with_autostart("deauth").run().await.unwrap();

    let transcript = screen.transcript();
    appears_in_order(&transcript, &lines(&["System ready.", "option> q", "root@deauther:~# exit"]))
        .unwrap();
    assert!(!transcript.iter().any(|line| line == "root@deauther:~# q"));
}

#[tokio::test(start_paused = true)]
async fn closed_input_ends_the_shell_cleanly() {
    let term = SimTerminal::fast(Script::new(), SimBridge::new(), EngineConfig::default());
    let screen = term.screen.clone();

    let result = runtime(term, Catalog::builtin().unwrap()).run().await;

    assert!(result.is_ok());
    assert!(screen.stopped());
    assert!(screen.last_screen().unwrap().input().is_some(), "prompt was open when input closed");
}

#[tokio::test(start_paused = true)]
async fn queued_bridge_text_shows_at_the_shell() {
    let bridge = SimBridge::new();
    bridge.board().push_message(BridgeMessage::type_out("Bridge connected."));
    let term = SimTerminal::fast(Script::new().line("exit"), bridge, EngineConfig::default());
    let screen = term.screen.clone();

    runtime(term, Catalog::builtin().unwrap()).run().await.unwrap();

    appears_in_order(&screen.transcript(), &lines(&["Bridge connected.", "root@deauther:~# exit"]))
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn bridge_disconnect_is_reported() {
    let bridge = SimBridge::new();
    bridge.disconnect();
    let script = Script::new().line("deauth").line("2").line("exit");
    let term = SimTerminal::fast(script, bridge.clone(), EngineConfig::default());
    let (screen, hub) = (term.screen.clone(), term.hub.clone());

    runtime(term, Catalog::builtin().unwrap()).run().await.unwrap();

    appears_in_order(
        &screen.transcript(),
        &lines(&["option> 2", "ERROR: bridge disconnected", "root@deauther:~# exit"]),
    )
    .unwrap();
    assert_eq!(bridge.count(CommandKind::Whitelist), 0);
    assert!(!hub.armed());
}
