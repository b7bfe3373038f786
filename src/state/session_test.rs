use super::*;
use crate::notify::test_helpers::RecordingNotifier;
use crate::store::test_helpers::{MockStore, test_session};

fn controller(store: &Arc<MockStore>) -> (SessionController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let controller = SessionController::new(store.clone(), notifier.clone());
    (controller, notifier)
}

fn credentials() -> Credentials {
    Credentials { email: "me@example.com".to_owned(), password: "pw".to_owned() }
}

// =============================================================================
// init
// =============================================================================

#[tokio::test]
async fn init_without_session_is_unauthenticated() {
    let store = Arc::new(MockStore::new());
    let (mut controller, _) = controller(&store);
    let (tx, _rx) = mpsc::unbounded_channel();

    assert_eq!(controller.init(tx).await, None);
    assert!(!controller.is_authenticated());
    assert!(controller.is_subscribed());
    assert_eq!(store.listeners.len(), 1);
}

#[tokio::test]
async fn init_with_existing_session_requests_refresh() {
    let store = Arc::new(MockStore::signed_in(Vec::new()));
    let (mut controller, _) = controller(&store);
    let (tx, _rx) = mpsc::unbounded_channel();

    assert_eq!(controller.init(tx).await, Some(SessionEffect::Refresh));
    assert!(controller.is_authenticated());
    assert_eq!(controller.state().session.as_ref().map(|s| s.user.id.as_str()), Some("u1"));
}

// =============================================================================
// apply
// =============================================================================

#[test]
fn apply_signed_in_requests_refresh() {
    let store = Arc::new(MockStore::new());
    let (mut controller, _) = controller(&store);
    let effect = controller.apply(SessionChange { event: AuthEvent::SignedIn, session: Some(test_session()) });
    assert_eq!(effect, SessionEffect::Refresh);
    assert!(controller.is_authenticated());
}

#[test]
fn apply_signed_out_requests_clear() {
    let store = Arc::new(MockStore::new());
    let (mut controller, _) = controller(&store);
    controller.apply(SessionChange { event: AuthEvent::SignedIn, session: Some(test_session()) });
    let effect = controller.apply(SessionChange { event: AuthEvent::SignedOut, session: None });
    assert_eq!(effect, SessionEffect::Clear);
    assert_eq!(*controller.state(), SessionState::default());
}

// =============================================================================
// login / logout
// =============================================================================

#[tokio::test]
async fn login_success_flips_state_only_through_event() {
    let store = Arc::new(MockStore::new());
    let (mut controller, notifier) = controller(&store);
    let (tx, mut rx) = mpsc::unbounded_channel();
    controller.init(tx).await;

    assert!(controller.login(&credentials()).await);
    assert!(!controller.is_authenticated());
    assert!(notifier.alerts().is_empty());

    let change = rx.try_recv().unwrap();
    assert_eq!(change.event, AuthEvent::SignedIn);
    assert_eq!(controller.apply(change), SessionEffect::Refresh);
    assert!(controller.is_authenticated());
}

#[tokio::test]
async fn login_failure_alerts_provider_message() {
    let store = Arc::new(MockStore::new());
    MockStore::fail(&store.fail_sign_in, "Invalid login credentials");
    let (mut controller, notifier) = controller(&store);
    let (tx, mut rx) = mpsc::unbounded_channel();
    controller.init(tx).await;

    assert!(!controller.login(&credentials()).await);
    assert!(!controller.is_authenticated());
    assert_eq!(notifier.alerts(), vec!["Invalid login credentials".to_owned()]);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn logout_clears_state_unconditionally() {
    let store = Arc::new(MockStore::signed_in(Vec::new()));
    let (mut controller, _) = controller(&store);
    let (tx, _rx) = mpsc::unbounded_channel();
    controller.init(tx).await;
    assert!(controller.is_authenticated());

    controller.logout().await;
    assert!(!controller.is_authenticated());
    assert!(controller.state().session.is_none());
    assert_eq!(store.sign_out_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

// =============================================================================
// teardown
// =============================================================================

#[tokio::test]
async fn teardown_releases_subscription() {
    let store = Arc::new(MockStore::new());
    let (mut controller, _) = controller(&store);
    let (tx, mut rx) = mpsc::unbounded_channel();
    controller.init(tx).await;

    controller.teardown();
    assert!(!controller.is_subscribed());
    assert!(store.listeners.is_empty());

    store.announce(AuthEvent::SignedIn, Some(test_session()));
    assert!(rx.try_recv().is_err());
}
