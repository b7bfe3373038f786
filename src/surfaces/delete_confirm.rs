//! Two-step delete gesture: request opens the confirmation, confirm hands
//! back the id to delete, cancel does nothing else.

#[cfg(test)]
#[path = "delete_confirm_test.rs"]
mod delete_confirm_test;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    target: Option<String>,
}

impl DeleteConfirmation {
    /// Open the confirmation for `id`, replacing any pending one.
    pub fn request(&mut self, id: &str) {
        self.target = Some(id.to_owned());
    }

    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Close the confirmation and return the id the caller must delete.
    pub fn confirm(&mut self) -> Option<String> {
        self.target.take()
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }
}
