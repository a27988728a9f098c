//! Session lifecycle tests: login validation and rollback, logout that always
//! clears, and the start-up restart check.

mod common;

use common::{url, MockTransport};
use lorcana_collection_sdk::{
    ApiClient, CollectionError, FileTokenStore, MemoryTokenStore, NoopObserver, Registration,
    SessionManager, SessionState, TokenStore,
};
use serde_json::json;
use std::sync::Arc;

fn me_ok(transport: &MockTransport) {
    transport.reply_json(200, json!({ "data": { "name": "Ariel", "email": "a@b.com" } }));
}

// ---------------------------------------------------------------------------
// initial state
// ---------------------------------------------------------------------------

#[test]
fn new_session_is_authenticating_and_loading() {
    let transport = MockTransport::new();
    let store = MemoryTokenStore::new();
    let session = common::session(&transport, &store);

    assert_eq!(session.state(), SessionState::Authenticating);
    assert!(session.is_loading());
    assert!(session.token().is_none());
    assert_eq!(transport.call_count(), 0);
}

// ---------------------------------------------------------------------------
// login
// ---------------------------------------------------------------------------

#[test]
fn login_with_valid_token_authenticates_and_persists() {
    let transport = MockTransport::new();
    me_ok(&transport);
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    let user = session.login("T").unwrap();

    assert_eq!(user["data"]["name"], "Ariel");
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.token(), Some("T"));
    assert_eq!(store.load().unwrap().as_deref(), Some("T"));

    let req = transport.last_request();
    assert_eq!(req.url, url("me"));
    assert_eq!(req.header("Authorization"), Some("Bearer T"));
}

#[test]
fn login_with_rejected_token_leaves_no_session_behind() {
    let transport = MockTransport::new();
    transport.reply(401, r#"{"message":"Unauthenticated."}"#);
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    let err = session.login("bad").unwrap_err();

    assert!(matches!(err, CollectionError::SessionInvalid(_)), "{err:?}");
    assert_eq!(err.status(), Some(401));
    assert!(err.is_unauthenticated());
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn login_with_unreachable_backend_rolls_back_too() {
    let transport = MockTransport::new();
    transport.fail("timed out");
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    let err = session.login("T").unwrap_err();

    match err {
        CollectionError::SessionInvalid(inner) => {
            assert!(matches!(*inner, CollectionError::Transport(_)))
        }
        other => panic!("expected SessionInvalid, got {other:?}"),
    }
    assert!(session.token().is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn sign_in_exchanges_credentials_then_validates() {
    let transport = MockTransport::new();
    transport.reply_json(200, json!({ "token": "T" }));
    me_ok(&transport);
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    session.sign_in("a@b.com", "pw").unwrap();

    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.token(), Some("T"));
    assert_eq!(store.load().unwrap().as_deref(), Some("T"));
    assert_eq!(
        transport.calls(),
        vec![format!("POST {}", url("login")), format!("GET {}", url("me"))]
    );
}

#[test]
fn sign_in_accepts_enveloped_token() {
    let transport = MockTransport::new();
    transport.reply_json(200, json!({ "data": { "token": "T2" } }));
    me_ok(&transport);
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    session.sign_in("a@b.com", "pw").unwrap();

    assert_eq!(session.token(), Some("T2"));
}

#[test]
fn sign_in_without_token_in_response_is_malformed() {
    let transport = MockTransport::new();
    transport.reply_json(200, json!({ "message": "ok" }));
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    let err = session.sign_in("a@b.com", "pw").unwrap_err();

    assert!(matches!(err, CollectionError::MalformedEnvelope(_)), "{err:?}");
    assert_eq!(transport.call_count(), 1);
    assert!(store.load().unwrap().is_none());
}

#[test]
fn sign_in_with_wrong_password_surfaces_backend_error() {
    let transport = MockTransport::new();
    transport.reply(422, r#"{"message":"The provided credentials are incorrect."}"#);
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    let err = session.sign_in("a@b.com", "nope").unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert!(session.token().is_none());
}

#[test]
fn sign_up_only_registers() {
    let transport = MockTransport::new();
    transport.reply_json(201, json!({ "data": { "id": 5 } }));
    let store = MemoryTokenStore::new();
    let session = common::session(&transport, &store);

    session
        .sign_up(&Registration::new("Mickey", "m@d.com", "secret"))
        .unwrap();

    assert_eq!(transport.calls(), vec![format!("POST {}", url("register"))]);
    assert!(store.load().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// logout
// ---------------------------------------------------------------------------

#[test]
fn logout_notifies_backend_and_clears_everything() {
    let transport = MockTransport::new();
    me_ok(&transport);
    transport.reply_json(200, json!({ "message": "Logged out" }));
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);
    session.login("T").unwrap();

    session.logout().unwrap();

    let req = transport.last_request();
    assert_eq!(req.url, url("logout"));
    assert_eq!(req.header("Authorization"), Some("Bearer T"));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn logout_clears_locally_when_backend_call_fails() {
    for failing in ["status", "transport"] {
        let transport = MockTransport::new();
        me_ok(&transport);
        if failing == "status" {
            transport.reply(500, "oops");
        } else {
            transport.fail("network down");
        }
        let store = MemoryTokenStore::new();
        let mut session = common::session(&transport, &store);
        session.login("T").unwrap();

        session.logout().unwrap();

        assert_eq!(session.state(), SessionState::Unauthenticated, "{failing}");
        assert!(session.token().is_none(), "{failing}");
        assert!(store.load().unwrap().is_none(), "{failing}");
    }
}

#[test]
fn logout_without_token_makes_no_call() {
    let transport = MockTransport::new();
    let store = MemoryTokenStore::with_token("stale");
    let mut session = common::session(&transport, &store);

    session.logout().unwrap();

    assert_eq!(transport.call_count(), 0);
    assert!(store.load().unwrap().is_none());
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

// ---------------------------------------------------------------------------
// restart_check
// ---------------------------------------------------------------------------

#[test]
fn restart_check_without_stored_token_ends_unauthenticated() {
    let transport = MockTransport::new();
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);

    let state = session.restart_check();

    assert_eq!(state, SessionState::Unauthenticated);
    assert!(!session.is_loading());
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn restart_check_adopts_valid_stored_token() {
    let transport = MockTransport::new();
    me_ok(&transport);
    let store = MemoryTokenStore::with_token("T");
    let mut session = common::session(&transport, &store);

    let state = session.restart_check();

    assert_eq!(state, SessionState::Authenticated);
    assert!(!session.is_loading());
    assert_eq!(session.token(), Some("T"));
    assert_eq!(session.require_token().unwrap(), "T");
    assert_eq!(store.load().unwrap().as_deref(), Some("T"));
    assert_eq!(
        transport.last_request().header("Authorization"),
        Some("Bearer T")
    );
}

#[test]
fn restart_check_discards_rejected_stored_token() {
    let transport = MockTransport::new();
    transport.reply(401, "Unauthenticated");
    let store = MemoryTokenStore::with_token("expired");
    let mut session = common::session(&transport, &store);

    let state = session.restart_check();

    assert_eq!(state, SessionState::Unauthenticated);
    assert!(!session.is_loading());
    assert!(session.token().is_none());
    assert!(store.load().unwrap().is_none());
    // Only the validation call; the rejected token is never sent to /logout.
    assert_eq!(transport.calls(), vec![format!("GET {}", url("me"))]);
}

#[test]
fn restart_check_treats_transport_failure_as_invalid() {
    let transport = MockTransport::new();
    transport.fail("dns failure");
    let store = MemoryTokenStore::with_token("T");
    let mut session = common::session(&transport, &store);

    let state = session.restart_check();

    assert_eq!(state, SessionState::Unauthenticated);
    assert!(!session.is_loading());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn restart_check_survives_unreadable_store() {
    struct BrokenStore;

    impl TokenStore for BrokenStore {
        fn load(&self) -> lorcana_collection_sdk::Result<Option<String>> {
            Err(std::io::Error::other("disk gone").into())
        }
        fn save(&mut self, _token: &str) -> lorcana_collection_sdk::Result<()> {
            Ok(())
        }
        fn clear(&mut self) -> lorcana_collection_sdk::Result<()> {
            Ok(())
        }
    }

    let transport = MockTransport::new();
    let mut session = SessionManager::new(common::client(&transport), BrokenStore);

    assert_eq!(session.restart_check(), SessionState::Unauthenticated);
    assert!(!session.is_loading());
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn file_store_session_survives_a_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let transport = MockTransport::new();
    me_ok(&transport);
    me_ok(&transport);

    let client = ApiClient::with_transport(common::BASE_URL, transport.clone())
        .with_observer(Arc::new(NoopObserver));

    {
        let store = FileTokenStore::new(Some(tmp.path().to_path_buf())).unwrap();
        let mut first_run = SessionManager::new(client.clone(), store);
        first_run.login("persisted").unwrap();
    }

    let store = FileTokenStore::new(Some(tmp.path().to_path_buf())).unwrap();
    let mut second_run = SessionManager::new(client, store);
    assert_eq!(second_run.restart_check(), SessionState::Authenticated);
    assert_eq!(second_run.token(), Some("persisted"));
}

// ---------------------------------------------------------------------------
// typed access
// ---------------------------------------------------------------------------

#[test]
fn require_token_is_a_precondition_error_when_signed_out() {
    let transport = MockTransport::new();
    let store = MemoryTokenStore::new();
    let session = common::session(&transport, &store);

    let err = session.require_token().unwrap_err();
    assert!(matches!(err, CollectionError::Precondition(_)), "{err:?}");

    let err = session.current_user().unwrap_err();
    assert!(matches!(err, CollectionError::Precondition(_)), "{err:?}");
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn current_user_decodes_the_envelope() {
    let transport = MockTransport::new();
    me_ok(&transport);
    me_ok(&transport);
    let store = MemoryTokenStore::new();
    let mut session = common::session(&transport, &store);
    session.login("T").unwrap();

    let user = session.current_user().unwrap();

    assert_eq!(user.name, "Ariel");
    assert_eq!(user.email, "a@b.com");
    assert!(user.id.is_none());
}
