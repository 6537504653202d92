use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::executor::block_on;

use super::*;
use crate::api::{ApiRequest, AuthMode};

// =========================================================
// Shared mock components (also used by store tests)
// =========================================================

/// Ordered event log shared between all mock collaborators,
/// so tests can assert cross-component ordering.
pub(crate) struct TestLog {
    events: Mutex<Vec<String>>,
}

impl TestLog {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

pub(crate) fn reply(status: u16, body: &str) -> Reply {
    Reply {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

pub(crate) fn reply_with_header(status: u16, name: &str, value: &str) -> Reply {
    Reply {
        status,
        headers: vec![(name.to_string(), value.to_string())],
        body: String::new(),
    }
}

/// Transport mock that pops scripted replies in order and records
/// every prepared request it receives.
pub(crate) struct ScriptedTransport {
    log: Arc<TestLog>,
    replies: Mutex<VecDeque<Result<Reply, TransportError>>>,
    offline: AtomicBool,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(log: Arc<TestLog>) -> Arc<Self> {
        Arc::new(Self {
            log,
            replies: Mutex::new(VecDeque::new()),
            offline: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn push_reply(&self, result: Result<Reply, TransportError>) {
        self.replies.lock().unwrap().push_back(result);
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of every request dispatched so far.
    pub(crate) fn sent(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn dispatch(&self, request: PreparedRequest) -> Result<Reply, TransportError> {
        self.log.push(format!("dispatch:{}", request.url));
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(reply(200, "{}")))
    }

    fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }
}

/// ErrorHooks mock that only records what the pipeline asked for.
pub(crate) struct RecordingHooks {
    log: Arc<TestLog>,
}

impl RecordingHooks {
    pub(crate) fn new(log: Arc<TestLog>) -> Arc<Self> {
        Arc::new(Self { log })
    }
}

impl ErrorHooks for RecordingHooks {
    fn tip(&self, message: &str) {
        self.log.push(format!("tip:{}", message));
    }

    fn session_expired(&self) {
        self.log.push("session_expired");
    }

    fn forbidden(&self) {
        self.log.push("forbidden");
    }

    fn log_failure(&self, detail: &str) {
        self.log.push(format!("log:{}", detail));
    }
}

/// TokenSource mock returning a fixed result.
pub(crate) struct StaticTokens {
    log: Arc<TestLog>,
    result: Result<String, ApiError>,
}

impl StaticTokens {
    pub(crate) fn ok(log: Arc<TestLog>, token: &str) -> Arc<Self> {
        Arc::new(Self {
            log,
            result: Ok(token.to_string()),
        })
    }

    pub(crate) fn failing(log: Arc<TestLog>) -> Arc<Self> {
        Arc::new(Self {
            log,
            result: Err(ApiError {
                kind: ErrorKind::Network,
                status: None,
                message: "token fetch failed".to_string(),
            }),
        })
    }
}

#[async_trait(?Send)]
impl TokenSource for StaticTokens {
    async fn get_or_fetch(&self) -> Result<String, ApiError> {
        self.log.push("token_fetch");
        self.result.clone()
    }
}

fn get(path: &str) -> ApiRequest {
    ApiRequest::get(AuthMode::WithoutAuth, path)
}

// =========================================================
// Success path
// =========================================================

#[test]
fn success_passes_the_reply_through_unchanged() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, r#"{"id":7}"#)));
    let pipeline = Pipeline::without_auth(transport.clone(), RecordingHooks::new(log.clone()));

    let reply = block_on(pipeline.execute(get("/tweets/7"))).expect("2xx must pass through");
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, r#"{"id":7}"#);
    // no tips, no recovery on success
    assert_eq!(log.events(), vec!["dispatch:/api/v1/tweets/7"]);
}

#[test]
fn requests_carry_base_path_method_and_body() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    let pipeline = Pipeline::without_auth(transport.clone(), RecordingHooks::new(log));

    let request = ApiRequest::post(
        AuthMode::WithoutAuth,
        "/tweets",
        serde_json::json!({ "text": "hi" }),
    );
    block_on(pipeline.execute(request)).expect("scripted default reply is 200");

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "/api/v1/tweets");
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"text":"hi"}"#));
    assert!(
        sent[0]
            .headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json")
    );
}

// =========================================================
// CSRF attachment (Service variant)
// =========================================================

#[test]
fn service_fetches_the_token_before_dispatch_and_attaches_it() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    let pipeline = Pipeline::service(
        transport.clone(),
        RecordingHooks::new(log.clone()),
        StaticTokens::ok(log.clone(), "tok-9"),
    );

    block_on(pipeline.execute(ApiRequest::delete(AuthMode::Service, "/tweets/3")))
        .expect("scripted default reply is 200");

    assert_eq!(
        log.events(),
        vec!["token_fetch", "dispatch:/api/v1/tweets/3"],
        "token resolution must complete before dispatch"
    );
    let sent = transport.sent();
    assert!(
        sent[0]
            .headers
            .iter()
            .any(|(k, v)| k == CSRF_HEADER && v == "tok-9")
    );
}

#[test]
fn token_failure_fails_the_request_without_dispatching_it() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    let pipeline = Pipeline::service(
        transport.clone(),
        RecordingHooks::new(log.clone()),
        StaticTokens::failing(log.clone()),
    );

    let error = block_on(pipeline.execute(ApiRequest::delete(AuthMode::Service, "/tweets/3")))
        .expect_err("token failure must fail the call");
    assert_eq!(error.kind, ErrorKind::Network);
    assert!(transport.sent().is_empty(), "no dispatch allowed");
    assert_eq!(log.events(), vec!["token_fetch"]);
}

#[test]
fn without_auth_never_touches_the_token_source() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    let pipeline = Pipeline::without_auth(transport.clone(), RecordingHooks::new(log.clone()));

    block_on(pipeline.execute(get("/users/me"))).expect("scripted default reply is 200");
    assert_eq!(log.events(), vec!["dispatch:/api/v1/users/me"]);
    let sent = transport.sent();
    assert!(!sent[0].headers.iter().any(|(k, _)| k == CSRF_HEADER));
}

// =========================================================
// Status classification
// =========================================================

fn classify(status: u16, body: &str) -> (ApiError, Vec<String>) {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(status, body)));
    let pipeline = Pipeline::without_auth(transport, RecordingHooks::new(log.clone()));
    let error = block_on(pipeline.execute(get("/x"))).expect_err("non-2xx must reject");
    (error, log.events())
}

#[test]
fn bad_request_surfaces_the_server_message() {
    let (error, events) = classify(400, r#"{"error":"name too long"}"#);
    assert_eq!(error.kind, ErrorKind::BadRequest);
    assert_eq!(error.status, Some(400));
    assert_eq!(error.message, "name too long");
    assert!(events.contains(&"tip:name too long".to_string()));
}

#[test]
fn not_found_surfaces_the_server_message() {
    let (error, events) = classify(404, r#"{"error":"no such user"}"#);
    assert_eq!(error.kind, ErrorKind::NotFound);
    assert!(events.contains(&"tip:no such user".to_string()));
}

#[test]
fn unauthorized_tips_then_schedules_recovery_in_order() {
    let (error, events) = classify(401, r#"{"error":"session expired"}"#);
    assert_eq!(error.kind, ErrorKind::Unauthorized);
    // diagnostics first, then the fixed tip, then the delayed recovery
    assert_eq!(
        events,
        vec![
            "dispatch:/api/v1/x".to_string(),
            format!("log:HTTP 401: {}", r#"{"error":"session expired"}"#),
            format!("tip:{}", SESSION_EXPIRED_TIP),
            "session_expired".to_string(),
        ]
    );
}

#[test]
fn forbidden_redirects_without_any_tip() {
    let (error, events) = classify(403, r#"{"error":"forbidden"}"#);
    assert_eq!(error.kind, ErrorKind::Forbidden);
    assert!(events.contains(&"forbidden".to_string()));
    assert!(!events.iter().any(|event| event.starts_with("tip:")));
}

#[test]
fn other_statuses_surface_an_unknown_error_tip() {
    let (error, events) = classify(500, r#"{"error":"boom"}"#);
    assert_eq!(error.kind, ErrorKind::Server);
    assert!(events.contains(&"tip:Unknown Error: boom".to_string()));
}

#[test]
fn non_json_error_bodies_fall_back_to_raw_text() {
    let (error, _) = classify(400, "plain text failure");
    assert_eq!(error.message, "plain text failure");
}

#[test]
fn every_http_failure_is_logged_before_classification() {
    for status in [400u16, 401, 403, 404, 500] {
        let (_, events) = classify(status, r#"{"error":"e"}"#);
        let log_index = events
            .iter()
            .position(|event| event.starts_with("log:"))
            .expect("failure must be logged");
        let effect_index = events
            .iter()
            .position(|event| {
                event.starts_with("tip:") || *event == "forbidden" || *event == "session_expired"
            })
            .expect("failure must produce a user-facing effect");
        assert!(log_index < effect_index, "status {}", status);
    }
}

// =========================================================
// Network-level failures
// =========================================================

#[test]
fn offline_failure_tips_and_rejects_with_offline_kind() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Err(TransportError("request timed out".to_string())));
    transport.set_offline(true);
    let pipeline = Pipeline::without_auth(transport, RecordingHooks::new(log.clone()));

    let error = block_on(pipeline.execute(get("/x"))).expect_err("must reject");
    assert_eq!(error.kind, ErrorKind::Offline);
    assert_eq!(error.status, None);
    assert!(log.events().contains(&format!("tip:{}", OFFLINE_TIP)));
}

#[test]
fn online_network_failure_rejects_silently_with_network_kind() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Err(TransportError("connection refused".to_string())));
    let pipeline = Pipeline::without_auth(transport, RecordingHooks::new(log.clone()));

    let error = block_on(pipeline.execute(get("/x"))).expect_err("must reject");
    assert_eq!(error.kind, ErrorKind::Network);
    assert_eq!(error.status, None);
    assert_eq!(error.message, "connection refused");
    // logged for diagnostics, but no tip and no recovery
    let events = log.events();
    assert!(events.iter().any(|event| event.starts_with("log:")));
    assert!(!events.iter().any(|event| event.starts_with("tip:")));
}

// =========================================================
// Body decoding
// =========================================================

#[test]
fn json_helper_decodes_successful_bodies() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, r#"{"user":{"user_name":"jack"},"token":"t"}"#)));
    let pipeline = Pipeline::without_auth(transport, RecordingHooks::new(log));

    let decoded: crate::models::UserWithToken =
        block_on(pipeline.json(get("/users/login"))).expect("valid body must decode");
    assert_eq!(decoded.user.user_name, "jack");
    assert_eq!(decoded.token, "t");
}

#[test]
fn json_helper_rejects_undecodable_bodies() {
    let log = TestLog::new();
    let transport = ScriptedTransport::new(log.clone());
    transport.push_reply(Ok(reply(200, "not json")));
    let pipeline = Pipeline::without_auth(transport, RecordingHooks::new(log));

    let error = block_on(pipeline.json::<crate::models::User>(get("/users/me")))
        .expect_err("garbage body must reject");
    assert_eq!(error.kind, ErrorKind::Decode);
}

#[test]
fn reply_header_lookup_is_case_insensitive() {
    let reply = reply_with_header(200, "x-csrf-token", "abc");
    assert_eq!(reply.header("X-CSRF-Token"), Some("abc"));
    assert_eq!(reply.header("X-Missing"), None);
}
