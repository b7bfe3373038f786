//! Copy-address affordance with a transient "Copied!" indicator.
//!
//! Indicators are keyed by record id and expire on their own after
//! `COPIED_WINDOW`; nothing else in the view reads or resets them. Copying
//! again inside the window restarts it.

#[cfg(test)]
#[path = "copy_address_test.rs"]
mod copy_address_test;

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long the "Copied!" indicator stays up.
pub const COPIED_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
#[error("could not copy to clipboard: {0}")]
pub struct ClipboardError(pub String);

/// Destination for copied text.
pub trait Clipboard {
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard. Opened lazily and kept open, since on X11 the
/// copied text is only served while the handle lives.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let opened = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?,
        };
        self.inner
            .insert(opened)
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}

/// Per-record "Copied!" timestamps.
#[derive(Clone, Debug, Default)]
pub struct CopyIndicators {
    copied_at: HashMap<String, Instant>,
}

impl CopyIndicators {
    /// Copy `address` and light the indicator for `id`.
    ///
    /// # Errors
    ///
    /// Returns the clipboard error; the indicator stays off in that case.
    pub fn copy(&mut self, clipboard: &mut dyn Clipboard, id: &str, address: &str, now: Instant) -> Result<(), ClipboardError> {
        clipboard.set_text(address)?;
        self.copied_at.insert(id.to_owned(), now);
        Ok(())
    }

    #[must_use]
    pub fn is_showing(&self, id: &str, now: Instant) -> bool {
        self.copied_at
            .get(id)
            .is_some_and(|at| now.saturating_duration_since(*at) < COPIED_WINDOW)
    }

    /// When the earliest live indicator goes out, if any is still up.
    #[must_use]
    pub fn next_expiry(&self, now: Instant) -> Option<Instant> {
        self.copied_at
            .values()
            .map(|at| *at + COPIED_WINDOW)
            .filter(|expiry| *expiry > now)
            .min()
    }

    /// Forget indicators whose window has passed.
    pub fn prune(&mut self, now: Instant) {
        self.copied_at
            .retain(|_, at| now.saturating_duration_since(*at) < COPIED_WINDOW);
    }
}
