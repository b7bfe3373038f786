use super::*;

#[test]
fn starts_closed() {
    assert_eq!(DeleteConfirmation::default().pending(), None);
}

#[test]
fn confirm_returns_target_once() {
    let mut confirm = DeleteConfirmation::default();
    confirm.request("w-1");
    assert_eq!(confirm.pending(), Some("w-1"));
    assert_eq!(confirm.confirm(), Some("w-1".to_owned()));
    assert_eq!(confirm.confirm(), None);
}

#[test]
fn cancel_discards_target() {
    let mut confirm = DeleteConfirmation::default();
    confirm.request("w-1");
    confirm.cancel();
    assert_eq!(confirm.pending(), None);
    assert_eq!(confirm.confirm(), None);
}

#[test]
fn new_request_replaces_pending_one() {
    let mut confirm = DeleteConfirmation::default();
    confirm.request("w-1");
    confirm.request("w-2");
    assert_eq!(confirm.confirm(), Some("w-2".to_owned()));
}
