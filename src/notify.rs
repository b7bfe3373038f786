//! User-facing alerts.
//!
//! Alerts are the blocking notifications for auth, insert, delete and
//! clipboard failures. List-fetch failures never come through here; they are
//! logged and shown as a passive status line instead.

use std::io::Write as _;

/// Sink for blocking user notifications.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr so they stand apart from the rendered view.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "!! {message}");
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use super::Notifier;

    /// Remembers every alert for assertions.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub alerts: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        #[must_use]
        pub fn alerts(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_owned());
        }
    }
}
