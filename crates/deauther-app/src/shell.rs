//! Top-level shell command parsing.

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,
    /// Show command help.
    Help,
    /// List applications.
    Apps,
    /// Clear the screen.
    Clear,
    /// Launch an application.
    Run(String),
    /// Leave the shell.
    Exit,
    /// Anything else: possibly a bare application name.
    Other(String),
}

impl ShellCommand {
    /// Parse one line. Command words ignore case.
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(command) = parts.first() else {
            return Self::Empty;
        };

        match command.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "apps" | "ls" => Self::Apps,
            "clear" | "cls" => Self::Clear,
            "exit" | "quit" | "logout" => Self::Exit,
            "run" => Self::Run(parts.get(1).copied().unwrap_or_default().to_string()),
            _ => Self::Other((*command).to_string()),
        }
    }
}
