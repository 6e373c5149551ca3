//! User notifications
//!
//! Download and tag-registry operations report their outcome through a
//! `Notifier` rather than printing directly, so the same code can drive the
//! console or be observed in tests.

use colored::Colorize;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Sink for user-facing outcome messages
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NoticeLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Colored terminal notifications
///
/// Errors go to stderr; success and warning messages go to stdout and are
/// suppressed in quiet mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => eprintln!("{} {}", "✗".red(), message),
            _ if self.quiet => {}
            NoticeLevel::Success => println!("{} {}", "✓".green(), message),
            NoticeLevel::Warning => println!("{} {}", "!".yellow(), message),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, level: NoticeLevel, message: &str) {
        (**self).notify(level, message);
    }
}
