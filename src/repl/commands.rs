//! Slash command parsing for the REPL
//!
//! Handles /help, /chart, /focus, /suggest, /ask, /history, /status, /new, etc.

use crate::chart::DisplayTab;
use crate::conversation::FocusContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    /// Show the chart, optionally switching tab first
    Chart(Option<DisplayTab>),
    /// Show or change the focus context
    Focus(Option<FocusContext>),
    Suggest,
    /// Send suggested question `n` (zero-based)
    Ask(usize),
    History,
    Status,
    /// Reset the session and go back to intake
    New,
    Quit,
    /// Recognized command with a bad argument
    Usage(String),
    Unknown(String),
}

impl Command {
    /// Parse a line starting with `/`; anything else is a chat message
    pub fn parse(line: &str) -> Option<Command> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let parsed = match command {
            "/help" => Command::Help,
            "/version" => Command::Version,
            "/chart" if arg.is_empty() => Command::Chart(None),
            "/chart" => match arg.parse::<DisplayTab>() {
                Ok(tab) => Command::Chart(Some(tab)),
                Err(e) => Command::Usage(e),
            },
            "/focus" if arg.is_empty() => Command::Focus(None),
            "/focus" => match arg.parse::<FocusContext>() {
                Ok(focus) => Command::Focus(Some(focus)),
                Err(e) => Command::Usage(e),
            },
            "/suggest" => Command::Suggest,
            "/ask" => match arg.parse::<usize>() {
                Ok(n) if n >= 1 => Command::Ask(n - 1),
                _ => Command::Usage("Usage: /ask <number> (see /suggest)".to_string()),
            },
            "/history" => Command::History,
            "/status" => Command::Status,
            "/new" | "/reset" => Command::New,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(parsed)
    }
}

pub fn help_text() -> &'static str {
    "Commands:
  /help              - Show this help
  /version           - Show version info
  /chart [tab]       - Show chart (overview, planets, houses)
  /focus [area]      - Show or set focus area
  /suggest           - List quick questions for the focus area
  /ask <n>           - Ask quick question n
  /history           - Reprint the conversation
  /status            - Show session and backend status
  /new               - Start over with new birth details
  /quit              - Exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(Command::parse("What about my career?"), None);
        assert_eq!(Command::parse("  "), None);
    }

    #[test]
    fn test_chart_tabs() {
        assert_eq!(Command::parse("/chart"), Some(Command::Chart(None)));
        assert_eq!(
            Command::parse("/chart houses"),
            Some(Command::Chart(Some(DisplayTab::Houses)))
        );
        assert!(matches!(Command::parse("/chart dasha"), Some(Command::Usage(_))));
    }

    #[test]
    fn test_focus() {
        assert_eq!(Command::parse("/focus"), Some(Command::Focus(None)));
        assert_eq!(
            Command::parse("/focus  Marriage "),
            Some(Command::Focus(Some(FocusContext::Marriage)))
        );
        assert!(matches!(Command::parse("/focus love"), Some(Command::Usage(_))));
    }

    #[test]
    fn test_ask_is_one_based() {
        assert_eq!(Command::parse("/ask 1"), Some(Command::Ask(0)));
        assert_eq!(Command::parse("/ask 3"), Some(Command::Ask(2)));
        assert!(matches!(Command::parse("/ask 0"), Some(Command::Usage(_))));
        assert!(matches!(Command::parse("/ask"), Some(Command::Usage(_))));
    }

    #[test]
    fn test_aliases_and_unknown() {
        assert_eq!(Command::parse("/reset"), Some(Command::New));
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(
            Command::parse("/dasha now"),
            Some(Command::Unknown("/dasha".to_string()))
        );
    }
}
