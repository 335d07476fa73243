//! Rustyline helper for REPL with tab completion and hints

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

use super::colors;
use crate::chart::DisplayTab;
use crate::conversation::FocusContext;

/// Slash commands for tab completion
pub const SLASH_COMMANDS: &[&str] = &[
    "/help",
    "/chart",
    "/focus",
    "/suggest",
    "/ask",
    "/history",
    "/status",
    "/new",
    "/version",
    "/quit",
    "/exit",
];

/// Custom helper for rustyline with completion and hints
pub struct JyotishHelper {
    hinter: HistoryHinter,
}

impl JyotishHelper {
    pub fn new() -> Self {
        Self {
            hinter: HistoryHinter::new(),
        }
    }
}

impl Default for JyotishHelper {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion candidates for `line` up to the cursor
fn candidates(line: &str) -> (usize, Vec<String>) {
    match line.split_once(' ') {
        None => {
            let matches = SLASH_COMMANDS
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| cmd.to_string())
                .collect();
            (0, matches)
        }
        Some((command, arg)) => {
            let options: Vec<&str> = match command {
                "/focus" => FocusContext::ALL.iter().map(|c| c.as_str()).collect(),
                "/chart" => DisplayTab::ALL.iter().map(|t| t.as_str()).collect(),
                _ => Vec::new(),
            };
            let start = command.len() + 1;
            let matches = options
                .into_iter()
                .filter(|opt| opt.starts_with(arg))
                .map(String::from)
                .collect();
            (start, matches)
        }
    }
}

impl Completer for JyotishHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((pos, vec![]));
        }

        let (start, matches) = candidates(line);
        Ok((
            start,
            matches
                .into_iter()
                .map(|m| Pair {
                    display: m.clone(),
                    replacement: m,
                })
                .collect(),
        ))
    }
}

impl Hinter for JyotishHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        // Show history hints for non-slash commands
        if !line.starts_with('/') {
            self.hinter.hint(line, pos, ctx)
        } else {
            None
        }
    }
}

impl Highlighter for JyotishHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(colors::header(prompt))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Dim hints
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for JyotishHelper {}

impl Helper for JyotishHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_completion() {
        let (start, matches) = candidates("/s");
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["/suggest", "/status"]);
    }

    #[test]
    fn test_focus_argument_completion() {
        let (start, matches) = candidates("/focus ca");
        assert_eq!(start, "/focus ".len());
        assert_eq!(matches, vec!["career"]);
    }

    #[test]
    fn test_chart_argument_completion() {
        let (_, matches) = candidates("/chart ");
        assert_eq!(matches, vec!["overview", "planets", "houses"]);
    }

    #[test]
    fn test_no_completion_for_other_arguments() {
        let (_, matches) = candidates("/ask 1");
        assert!(matches.is_empty());
    }
}
