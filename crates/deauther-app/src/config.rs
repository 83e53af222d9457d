//! Engine configuration.

use std::time::Duration;

use crate::{KeyCombo, TypingOptions, screen::DEFAULT_SCROLLBACK};

/// Lower bound for the status polling interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Timing, text and key bindings used by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Default typewriter timing for menu output.
    pub typing: TypingOptions,
    /// Typewriter timing for boot banners.
    pub boot_typing: TypingOptions,
    /// Pause after the option banner is drawn.
    pub menu_pause: Duration,
    /// How long the exit line stays up before the screen clears.
    pub exit_linger: Duration,
    /// Interrupt key combination.
    pub interrupt: KeyCombo,
    /// Line printed when a run is interrupted.
    pub exit_line: String,
    /// Line printed for an unrecognized menu token.
    pub invalid_option: String,
    /// Line printed before waiting for a key at the end of boot.
    pub boot_gate: String,
    /// Menu option prompt label.
    pub menu_prompt: String,
    /// Top-level shell prompt label.
    pub shell_prompt: String,
    /// Echo character for masked prompts.
    pub mask: char,
    /// Maximum scrollback lines.
    pub scrollback: usize,
    poll_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            typing: TypingOptions::default(),
            boot_typing: TypingOptions::default()
                .with_line_wait(Duration::from_millis(60))
                .with_char_wait(Duration::from_millis(15)),
            menu_pause: Duration::from_millis(300),
            exit_linger: Duration::from_millis(800),
            interrupt: KeyCombo::default(),
            exit_line: "^C -- interrupt received, exiting...".to_string(),
            invalid_option: "Invalid option. Try again.".to_string(),
            boot_gate: "Press any key to continue...".to_string(),
            menu_prompt: "option> ".to_string(),
            shell_prompt: "root@deauther:~# ".to_string(),
            mask: '*',
            scrollback: DEFAULT_SCROLLBACK,
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl EngineConfig {
    /// Status polling interval, never below [`MIN_POLL_INTERVAL`].
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }

    /// Set the status polling interval. Values below the minimum are clamped.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the interrupt key combination.
    #[must_use]
    pub fn with_interrupt(mut self, combo: KeyCombo) -> Self {
        self.interrupt = combo;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_interval_is_clamped() {
        let config = EngineConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(config.poll_interval(), MIN_POLL_INTERVAL);

        let config = EngineConfig::default().with_poll_interval(Duration::from_secs(1));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
