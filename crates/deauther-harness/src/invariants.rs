//! Behavioral invariants over recorded runs.
//!
//! Each check inspects what a run left behind (the render transcript and the
//! commands the bridge received) and reports a [`Violation`] describing the
//! first thing that went wrong.

use deauther_core::{Command, CommandKind};

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// After the first `stop_attack`, nothing else reaches the bridge.
pub fn stop_is_final(commands: &[Command]) -> InvariantResult {
    let Some(first_stop) = commands.iter().position(|c| c.command == CommandKind::StopAttack)
    else {
        return Ok(());
    };

    match commands.get(first_stop + 1..).and_then(|rest| rest.first()) {
        None => Ok(()),
        Some(next) => Err(Violation {
            invariant: "StopIsFinal",
            message: format!("{} sent after stop_attack", next.command),
        }),
    }
}

/// Once `exit_line` is shown, no line in `banner` is shown again.
pub fn no_banner_after_exit(
    transcript: &[String],
    exit_line: &str,
    banner: &[String],
) -> InvariantResult {
    let Some(exit_at) = transcript.iter().position(|line| line == exit_line) else {
        return Ok(());
    };

    match transcript.iter().skip(exit_at + 1).find(|line| banner.contains(line)) {
        None => Ok(()),
        Some(line) => Err(Violation {
            invariant: "NoBannerAfterExit",
            message: format!("banner line {line:?} rendered after exit"),
        }),
    }
}

/// `expected` appears in `transcript` as a subsequence, in order.
pub fn appears_in_order(transcript: &[String], expected: &[String]) -> InvariantResult {
    let mut lines = transcript.iter();
    for want in expected {
        if !lines.any(|line| line == want) {
            return Err(Violation {
                invariant: "AppearsInOrder",
                message: format!("{want:?} missing or out of order"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn stop_must_be_last() {
        let ok = [Command::new(CommandKind::Scan, ""), Command::new(CommandKind::StopAttack, "")];
        assert!(stop_is_final(&ok).is_ok());

        let bad = [Command::new(CommandKind::StopAttack, ""), Command::new(CommandKind::Scan, "")];
        assert!(stop_is_final(&bad).is_err());
    }

    #[test]
    fn banner_after_exit_is_flagged() {
        let banner = lines(&["== menu =="]);
        let transcript = lines(&["== menu ==", "^C", "== menu =="]);
        assert!(no_banner_after_exit(&transcript, "^C", &banner).is_err());
        assert!(no_banner_after_exit(&transcript[..2], "^C", &banner).is_ok());
    }

    #[test]
    fn order_is_checked() {
        let transcript = lines(&["a", "b", "c"]);
        assert!(appears_in_order(&transcript, &lines(&["a", "c"])).is_ok());
        assert!(appears_in_order(&transcript, &lines(&["c", "a"])).is_err());
    }
}
