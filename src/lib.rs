//! walletdeck: a personal tracker for crypto wallet addresses kept in a
//! hosted Supabase project.
//!
//! ARCHITECTURE
//! ============
//! - `model`: the record shape and the closed platform/chain enumerations.
//! - `store`: the `RemoteStore` boundary and its Supabase HTTP adapter.
//! - `state`: the session controller and the filtered collection view.
//! - `surfaces`: detail, add form, delete confirmation and copy indicator.
//! - `app`: one `App` tying them together, driven by `Action`s.
//! - `shell` / `render`: the terminal front end used by the binary.

pub mod app;
pub mod model;
pub mod notify;
pub mod render;
pub mod shell;
pub mod state;
pub mod store;
pub mod surfaces;
