//! ANSI color helpers for pretty terminal output
//!
//! Simple, tasteful colors that work on most terminals.

use chrono::{DateTime, Local, Utc};

use crate::conversation::Role;
use crate::notify::NoticeLevel;

/// ANSI escape codes
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    // Colors
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

use ansi::*;

/// Format a success message (green)
pub fn success(msg: &str) -> String {
    format!("{}{}{}", GREEN, msg, RESET)
}

/// Format an error message (red)
pub fn error(msg: &str) -> String {
    format!("{}{}{}", RED, msg, RESET)
}

/// Format a warning message (yellow)
pub fn warning(msg: &str) -> String {
    format!("{}{}{}", YELLOW, msg, RESET)
}

/// Format a status/info message (gray/dim)
pub fn status(msg: &str) -> String {
    format!("{}{}{}", GRAY, msg, RESET)
}

/// Format a header (bold)
pub fn header(msg: &str) -> String {
    format!("{}{}{}", BOLD, msg, RESET)
}

/// Notice line, colored by level
pub fn notice(level: NoticeLevel, msg: &str) -> String {
    match level {
        NoticeLevel::Success => format!("{}✔ {}{}", GREEN, msg, RESET),
        NoticeLevel::Info => format!("{}ℹ {}{}", CYAN, msg, RESET),
        NoticeLevel::Error => format!("{}✖ {}{}", RED, msg, RESET),
    }
}

/// Speaker label for a transcript line
pub fn speaker(role: Role) -> String {
    match role {
        Role::User => format!("{}{}You{}", BOLD, BLUE, RESET),
        Role::Assistant => format!("{}{}Guru{}", BOLD, MAGENTA, RESET),
    }
}

/// Local wall-clock time of a message
pub fn timestamp(at: &DateTime<Utc>) -> String {
    format!("{}{}{}", DIM, at.with_timezone(&Local).format("%H:%M:%S"), RESET)
}

/// Shown while a chat request is outstanding
pub fn thinking() -> String {
    format!("{}  consulting the stars...{}", DIM, RESET)
}

/// Format a horizontal separator
pub fn separator(width: usize) -> String {
    format!("{}{}{}", DIM, "─".repeat(width), RESET)
}

/// Format startup banner line
pub fn banner_line(label: &str, value: &str) -> String {
    format!("{}{:<12}{} {}", DIM, label, RESET, value)
}

/// Format startup banner with accent
pub fn banner_accent(text: &str) -> String {
    format!("{}{}{}{}", BOLD, MAGENTA, text, RESET)
}
