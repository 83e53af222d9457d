//! Typewriter timing options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing for one typewriter call.
///
/// Every delay is ignored when fast mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingOptions {
    /// Delay between lines.
    #[serde(with = "millis")]
    pub line_wait: Duration,
    /// Delay between characters within a line. Zero renders a line at once.
    #[serde(with = "millis")]
    pub wait: Duration,
    /// Delay before the first line.
    #[serde(with = "millis")]
    pub initial_wait: Duration,
    /// Delay after the last line.
    #[serde(with = "millis")]
    pub final_wait: Duration,
    /// Append to the most recent line instead of starting new ones.
    pub use_container: bool,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            line_wait: Duration::from_millis(120),
            wait: Duration::ZERO,
            initial_wait: Duration::ZERO,
            final_wait: Duration::ZERO,
            use_container: false,
        }
    }
}

impl TypingOptions {
    /// No delays at all.
    pub const INSTANT: Self = Self {
        line_wait: Duration::ZERO,
        wait: Duration::ZERO,
        initial_wait: Duration::ZERO,
        final_wait: Duration::ZERO,
        use_container: false,
    };

    /// Same timing, appending to the most recent line.
    #[must_use]
    pub fn contained(mut self) -> Self {
        self.use_container = true;
        self
    }

    /// Same options with a per-character delay.
    #[must_use]
    pub fn with_char_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Same options with a delay between lines.
    #[must_use]
    pub fn with_line_wait(mut self, line_wait: Duration) -> Self {
        self.line_wait = line_wait;
        self
    }

}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_millis() {
        let opts: TypingOptions =
            serde_json::from_str(r#"{"wait": 15, "use_container": true}"#).unwrap();
        assert_eq!(opts.wait, Duration::from_millis(15));
        assert!(opts.use_container);
        assert_eq!(opts.line_wait, TypingOptions::default().line_wait);
    }
}
