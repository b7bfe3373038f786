//! Detail, add, delete-confirm and copy surfaces.
//!
//! Each surface is plain state with no store access; `App` decides when to
//! open or close them and performs the remote calls they lead to.

pub mod add_form;
pub mod copy_address;
pub mod delete_confirm;
pub mod detail;

pub use add_form::{AddField, AddWalletForm, FormError, WalletDraft};
pub use copy_address::{COPIED_WINDOW, Clipboard, ClipboardError, CopyIndicators, SystemClipboard};
pub use delete_confirm::DeleteConfirmation;
pub use detail::{DetailRow, detail_rows};

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use super::{Clipboard, ClipboardError};

    /// Clipboard double that keeps the last text, or refuses every write.
    /// Clones share contents so a test can keep one after handing one away.
    #[derive(Clone, Debug, Default)]
    pub struct MemoryClipboard {
        pub text: Arc<Mutex<Option<String>>>,
        pub fail: bool,
    }

    impl MemoryClipboard {
        #[must_use]
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        #[must_use]
        pub fn contents(&self) -> Option<String> {
            self.text.lock().unwrap().clone()
        }
    }

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("no display".to_owned()));
            }
            *self.text.lock().unwrap() = Some(text.to_owned());
            Ok(())
        }
    }
}
