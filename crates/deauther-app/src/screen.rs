//! Renderer surface view-model.
//!
//! [`Screen`] is the engine's output sink: an ordered scrollback of text lines,
//! a busy indicator and an optional live input line. The engine mutates it and
//! asks the [`crate::Driver`] to render it; drivers never mutate it.

/// Default number of lines kept in scrollback.
pub const DEFAULT_SCROLLBACK: usize = 500;

/// Live input line shown while a prompt is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    /// Prompt label, e.g. `option> `.
    pub label: String,
    /// Echoed text (masked for password prompts).
    pub echo: String,
}

/// Terminal screen state.
#[derive(Debug, Clone)]
pub struct Screen {
    lines: Vec<String>,
    busy: bool,
    input: Option<InputLine>,
    /// Incremented on every [`Screen::clear`].
    epoch: u64,
    scrollback: usize,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLLBACK)
    }
}

impl Screen {
    /// Create an empty screen keeping at most `scrollback` lines.
    pub fn new(scrollback: usize) -> Self {
        Self { lines: Vec::new(), busy: false, input: None, epoch: 0, scrollback: scrollback.max(1) }
    }

    /// Start a new line.
    pub fn push_line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
        self.trim();
    }

    /// Append text to the most recently created line.
    ///
    /// Starts a line if the screen is empty.
    pub fn append(&mut self, text: &str) {
        match self.lines.last_mut() {
            Some(last) => last.push_str(text),
            None => self.push_line(text),
        }
    }

    /// Remove every line and any active input.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.input = None;
        self.busy = false;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Show or hide the busy indicator.
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Open a live input line.
    pub fn begin_input(&mut self, label: impl Into<String>) {
        self.input = Some(InputLine { label: label.into(), echo: String::new() });
    }

    /// Replace the echoed text of the live input line.
    pub fn set_echo(&mut self, echo: String) {
        if let Some(input) = self.input.as_mut() {
            input.echo = echo;
        }
    }

    /// Close the live input line, moving it into scrollback.
    pub fn commit_input(&mut self) {
        if let Some(InputLine { label, echo }) = self.input.take() {
            self.push_line(format!("{label}{echo}"));
        }
    }

    /// Close the live input line without recording it.
    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Scrollback lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Most recent line.
    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Whether the busy indicator is shown.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Live input line, if a prompt is active.
    pub fn input(&self) -> Option<&InputLine> {
        self.input.as_ref()
    }

    /// Number of times the screen has been cleared.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn trim(&mut self) {
        let excess = self.lines.len().saturating_sub(self.scrollback);
        if excess > 0 {
            self.lines.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_extends_last_line() {
        let mut screen = Screen::default();
        screen.push_line("Scanning");
        screen.append(".");
        screen.append(".");
        assert_eq!(screen.lines(), ["Scanning.."]);
    }

    #[test]
    fn append_on_empty_screen_starts_line() {
        let mut screen = Screen::default();
        screen.append("x");
        assert_eq!(screen.lines(), ["x"]);
    }

    #[test]
    fn commit_input_records_echo_not_value() {
        let mut screen = Screen::default();
        screen.begin_input("password: ");
        screen.set_echo("****".into());
        screen.commit_input();
        assert_eq!(screen.last_line(), Some("password: ****"));
        assert!(screen.input().is_none());
    }

    #[test]
    fn clear_bumps_epoch() {
        let mut screen = Screen::default();
        screen.push_line("a");
        screen.set_busy(true);
        screen.clear();
        assert!(screen.lines().is_empty());
        assert!(!screen.is_busy());
        assert_eq!(screen.epoch(), 1);
    }

    #[test]
    fn scrollback_drops_oldest() {
        let mut screen = Screen::new(2);
        screen.push_line("1");
        screen.push_line("2");
        screen.push_line("3");
        assert_eq!(screen.lines(), ["2", "3"]);
    }
}
