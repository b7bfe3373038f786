//! Plain-text rendering of the application state.
//!
//! Every function is pure: it reads `App` (and the current instant for the
//! "Copied!" indicators) and returns the text to print. The shell reprints
//! the whole screen after each action.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;
use std::time::Instant;

use crate::app::App;
use crate::model::{Chain, Platform, WalletRecord};
use crate::state::collection::FilterSelection;
use crate::surfaces::{AddWalletForm, CopyIndicators, detail_rows};

pub const HELP: &str = "\
Commands:
  login <email> <password>   sign in
  logout                     sign out
  ls                         reload the wallet list
  platform <name>            toggle a platform filter
  chain <name>               toggle a chain filter
  show <n>                   open wallet details
  close                      close details
  copy <n>                   copy a wallet address
  delete <n>                 delete a wallet (asks first)
  add                        add a wallet
  help                       this text
  quit                       exit";

pub const DELETE_TITLE: &str = "Are you sure?";
pub const DELETE_BODY: &str = "Do you really want to delete this wallet? This action cannot be undone.";

/// The whole screen for the current state.
#[must_use]
pub fn screen(app: &App, now: Instant) -> String {
    if !app.is_authenticated() {
        return login_prompt();
    }

    let mut out = String::new();
    if let Some(email) = app.signed_in_email() {
        let _ = writeln!(out, "Signed in as {email}");
    }
    out.push_str(&filters(app.collection().selection()));
    if let Some(reason) = app.collection().stale() {
        let _ = writeln!(out, "(list may be out of date: {reason})");
    }
    out.push('\n');
    out.push_str(&cards(&app.collection().visible(), app.copied(), now));

    if let Some(record) = app.detail() {
        out.push('\n');
        out.push_str(&detail(record));
    }
    if let Some(form) = app.add_form() {
        out.push('\n');
        out.push_str(&add_form(form));
    }
    if app.pending_delete().is_some() {
        out.push('\n');
        out.push_str(&delete_prompt());
    }
    out
}

#[must_use]
pub fn login_prompt() -> String {
    "Wallet Tracker\nSign in to continue: login <email> <password>\n".to_owned()
}

/// Both filter rows; selected values are bracketed.
#[must_use]
pub fn filters(selection: &FilterSelection) -> String {
    let platforms = Platform::ALL.map(|p| mark(p.as_str(), selection.platforms.contains(&p)));
    let chains = Chain::ALL.map(|c| mark(c.as_str(), selection.chains.contains(&c)));
    format!("Platforms: {}\nChains:    {}\n", platforms.join(" "), chains.join(" "))
}

fn mark(label: &str, selected: bool) -> String {
    if selected { format!("[{label}]") } else { label.to_owned() }
}

/// Numbered cards, 1-based, in the order given.
#[must_use]
pub fn cards(records: &[&WalletRecord], copied: &CopyIndicators, now: Instant) -> String {
    if records.is_empty() {
        return "No wallets to show.\n".to_owned();
    }
    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}  [{} / {}]", i + 1, record.name, record.platform, record.chain);
        let badge = if copied.is_showing(&record.id, now) { "  Copied!" } else { "" };
        let _ = writeln!(out, "     {}{badge}", record.address);
        let _ = writeln!(out, "     {}", record.purpose);
    }
    out
}

#[must_use]
pub fn detail(record: &WalletRecord) -> String {
    let mut out = String::from("Wallet Details\n");
    for row in detail_rows(record) {
        let _ = writeln!(out, "  {:<12} {}", row.label, row.value);
    }
    out.push_str("  (close to dismiss)\n");
    out
}

#[must_use]
pub fn delete_prompt() -> String {
    format!("{DELETE_TITLE}\n{DELETE_BODY}\n  yes / no\n")
}

#[must_use]
pub fn add_form(form: &AddWalletForm) -> String {
    format!("Add New Wallet\n{}  save | cancel | <field> <value>\n", form.summary())
}
