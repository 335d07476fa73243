//! Transient user-facing notices
//!
//! The terminal counterpart of toast popups: a short line shown once and
//! never kept in the transcript.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

/// Receives notices from intake and conversation
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Log the notice and hand it to the notifier
pub(crate) fn emit(notifier: &dyn Notifier, notice: Notice) {
    match notice.level {
        NoticeLevel::Error => tracing::warn!("notice: {}", notice.text),
        _ => tracing::info!("notice: {}", notice.text),
    }
    notifier.notify(notice);
}

/// Collects notices in memory
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .collect()
    }

    /// Remove and return everything collected so far
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_log_collects_in_order() {
        let log = NoticeLog::new();
        emit(&log, Notice::success("saved"));
        emit(&log, Notice::error("failed"));

        let notices = log.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0], Notice::success("saved"));
        assert_eq!(log.errors(), vec![Notice::error("failed")]);
    }

    #[test]
    fn test_drain_empties_log() {
        let log = NoticeLog::new();
        log.notify(Notice::info("hello"));
        assert_eq!(log.drain().len(), 1);
        assert!(log.notices().is_empty());
    }
}
