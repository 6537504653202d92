use futures::executor::block_on;

use super::*;
use crate::http::tests::{
    RecordingHooks, ScriptedTransport, TestLog, reply, reply_with_header,
};
use crate::http::{ErrorKind, TransportError};
use crate::models::UserWithToken;

fn api_with(transport: Arc<ScriptedTransport>, log: Arc<TestLog>, store: &Store) -> Api {
    let hooks = RecordingHooks::new(log);
    let without_auth = Arc::new(Pipeline::without_auth(transport.clone(), hooks.clone()));
    let tokens = Arc::new(StoreTokenSource {
        store: store.clone(),
        without_auth: without_auth.clone(),
    });
    let service = Arc::new(Pipeline::service(transport, hooks, tokens));
    Api::new(without_auth, service)
}

fn login_body(user_name: &str, token: &str) -> String {
    serde_json::to_string(&UserWithToken {
        user: User {
            user_id: "id-1".to_string(),
            user_name: user_name.to_string(),
            ..User::default()
        },
        token: token.to_string(),
    })
    .unwrap()
}

// =========================================================
// Mutations are total
// =========================================================

#[test]
fn set_user_replaces_the_whole_record() {
    let store = Store::new();
    store.set_user(User {
        user_id: "a".to_string(),
        user_name: "alice".to_string(),
        ..User::default()
    });
    store.set_user(User {
        user_id: "b".to_string(),
        user_name: "bob".to_string(),
        ..User::default()
    });
    assert_eq!(store.user.get_untracked().user_name, "bob");
}

#[test]
fn set_user_following_applies_signed_deltas() {
    let store = Store::new();
    store.set_user_following(1);
    assert_eq!(store.user.get_untracked().following, Some(1));
    store.set_user_following(1);
    store.set_user_following(-1);
    assert_eq!(store.user.get_untracked().following, Some(1));
    store.set_user_following(-1);
    assert_eq!(store.user.get_untracked().following, Some(0));
}

#[test]
fn token_and_session_mutations_replace_values() {
    let store = Store::new();
    store.set_token("t1".to_string());
    store.set_token("t2".to_string());
    assert_eq!(store.token.get_untracked(), "t2");
    store.set_session("s1".to_string());
    assert_eq!(store.session.get_untracked(), "s1");
    store.set_csrf_token(Some("c".to_string()));
    assert_eq!(store.csrf.cached(), Some("c".to_string()));
}

#[test]
fn is_admin_checks_the_role_field() {
    let store = Store::new();
    assert!(!store.is_admin());
    store.set_user(User {
        role: Some("admin".to_string()),
        ..User::default()
    });
    assert!(store.is_admin());
    store.set_user(User {
        role: Some("user".to_string()),
        ..User::default()
    });
    assert!(!store.is_admin());
}

// =========================================================
// Actions
// =========================================================

#[test]
fn login_persists_the_token_and_commits_user_and_token() {
    LocalStorage::clear();
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, &login_body("jack", "tok-1"))));
    let store = Store::new();
    let api = api_with(transport, log, &store);

    block_on(store.login(&api, "jack@example.com", "pw")).expect("login succeeds");

    assert_eq!(LocalStorage::session_token().as_deref(), Some("tok-1"));
    assert_eq!(store.token.get_untracked(), "tok-1");
    assert_eq!(store.user.get_untracked().user_name, "jack");
}

#[test]
fn failed_login_leaves_the_store_untouched() {
    LocalStorage::clear();
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(400, r#"{"error":"bad credentials"}"#)));
    let store = Store::new();
    let api = api_with(transport, log, &store);

    let error = block_on(store.login(&api, "jack@example.com", "pw"))
        .expect_err("400 must propagate");
    assert_eq!(error.kind, ErrorKind::BadRequest);
    assert_eq!(LocalStorage::session_token(), None);
    assert_eq!(store.token.get_untracked(), "");
    assert!(!store.user_loaded());
}

#[test]
fn register_behaves_like_login_on_success() {
    LocalStorage::clear();
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, &login_body("newbie", "tok-r"))));
    let store = Store::new();
    let api = api_with(transport, log, &store);

    let form = crate::models::RegisterForm {
        user_name: "newbie".to_string(),
        name: "New Bee".to_string(),
        email: "n@example.com".to_string(),
        password: "pw".to_string(),
    };
    block_on(store.register(&api, &form)).expect("register succeeds");
    assert_eq!(LocalStorage::session_token().as_deref(), Some("tok-r"));
    assert!(store.user_loaded());
}

#[test]
fn get_me_commits_the_user_record() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(
        200,
        r#"{"user_id":"id-9","user_name":"me","role":"admin"}"#,
    )));
    let store = Store::new();
    let api = api_with(transport, log, &store);

    block_on(store.get_me(&api)).expect("get_me succeeds");
    assert!(store.user_loaded());
    assert!(store.is_admin());
}

#[test]
fn failed_get_me_does_not_mutate_state() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Err(TransportError("connection refused".to_string())));
    let store = Store::new();
    let api = api_with(transport, log, &store);

    block_on(store.get_me(&api)).expect_err("network failure must propagate");
    assert!(!store.user_loaded());
}

#[test]
fn remove_user_info_clears_everything_unconditionally() {
    LocalStorage::set_session_token("tok");
    let store = Store::new();
    store.set_token("tok".to_string());
    store.set_user(User {
        user_id: "id".to_string(),
        user_name: "jack".to_string(),
        ..User::default()
    });
    store.set_csrf_token(Some("csrf".to_string()));

    store.remove_user_info();

    assert_eq!(LocalStorage::session_token(), None);
    assert_eq!(store.token.get_untracked(), "");
    assert!(!store.user_loaded());
    assert_eq!(store.csrf.cached(), None);
}

// =========================================================
// CSRF wiring through the store
// =========================================================

#[test]
fn service_requests_fetch_the_token_via_the_without_auth_pipeline() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    // first reply: the token endpoint; second: the mutating call itself
    transport.push_reply(Ok(reply_with_header(200, "X-CSRF-Token", "csrf-1")));
    transport.push_reply(Ok(reply(200, "{}")));
    let store = Store::new();
    let api = api_with(transport.clone(), log.clone(), &store);

    block_on(api.send(crate::api::tweet::delete_tweet(5))).expect("delete succeeds");

    assert_eq!(
        log.events(),
        vec![
            "dispatch:/api/v1/users/token",
            "dispatch:/api/v1/tweets/5",
        ],
        "token fetch must be dispatched before the mutating request"
    );
    assert_eq!(store.csrf.cached(), Some("csrf-1".to_string()));

    let sent = transport.sent();
    assert!(
        sent[1]
            .headers
            .iter()
            .any(|(k, v)| k == "X-CSRF-Token" && v == "csrf-1")
    );
}

#[test]
fn cached_token_skips_the_token_endpoint() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, "{}")));
    let store = Store::new();
    store.set_csrf_token(Some("warm".to_string()));
    let api = api_with(transport.clone(), log.clone(), &store);

    block_on(api.send(crate::api::tweet::delete_tweet(5))).expect("delete succeeds");
    assert_eq!(log.events(), vec!["dispatch:/api/v1/tweets/5"]);
}

#[test]
fn token_endpoint_without_header_fails_the_mutating_call() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, "{}"))); // token endpoint, header missing
    let store = Store::new();
    let api = api_with(transport.clone(), log, &store);

    let error = block_on(api.send(crate::api::tweet::delete_tweet(5)))
        .expect_err("missing header must fail the call");
    assert_eq!(error.kind, ErrorKind::Decode);
    // the mutating request itself must never have been dispatched
    assert_eq!(transport.sent().len(), 1);
    assert_eq!(store.csrf.cached(), None);
}
