//! View-layer state: the session controller and the record collection.
//!
//! DESIGN
//! ======
//! Session state and list state are kept apart so a sign-out can clear the
//! list without the list knowing anything about auth.

pub mod collection;
pub mod session;
