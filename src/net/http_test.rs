use std::time::Duration;

use serde_json::json;

use super::*;
use crate::net::fallback::MockFallback;
use crate::net::transport::RawResponse;
use crate::net::types::Role;
use crate::state::notice::NoticeLevel;
use crate::test_support::{Harness, json_reply, network_down};

fn mock_client(h: &Harness, allow_on_auth_failure: &[&str]) -> ApiClient {
    let policy = FallbackPolicy {
        enabled: true,
        on_auth_failure: allow_on_auth_failure.iter().map(|p| (*p).to_owned()).collect(),
    };
    ApiClient::builder(h.transport.clone(), h.auth.clone())
        .notifier(h.notifier.clone())
        .navigator(h.navigator.clone())
        .fallback(Rc::new(MockFallback::new(Duration::ZERO)), policy)
        .build()
}

// =============================================================
// Request stage
// =============================================================

#[test]
fn attach_bearer_skips_empty_token() {
    let req = attach_bearer(OutboundRequest::post("/api/auth/signin"), "");
    assert!(req.headers.is_empty());
}

#[test]
fn attach_bearer_replaces_existing_header() {
    let mut req = OutboundRequest::get("/api/pets");
    req.headers.push(("authorization".to_owned(), "Bearer stale".to_owned()));
    let req = attach_bearer(req, "fresh");
    assert_eq!(req.headers.len(), 1);
    assert_eq!(req.header(AUTHORIZATION), Some("Bearer fresh"));
}

#[tokio::test]
async fn signed_in_request_carries_bearer() {
    let h = Harness::signed_in(vec![json_reply(200, &json!([]))]);
    h.client().send(OutboundRequest::get("/api/pets")).await.unwrap();
    assert_eq!(h.transport.sent()[0].header(AUTHORIZATION), Some("Bearer tok-1"));
}

#[tokio::test]
async fn anonymous_request_is_still_sent() {
    let h = Harness::new(vec![json_reply(200, &json!({"ok": true}))]);
    let body = h.client().send(OutboundRequest::post("/api/auth/signin")).await.unwrap();
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(h.transport.sent()[0].header(AUTHORIZATION), None);
}

// =============================================================
// Success
// =============================================================

#[tokio::test]
async fn request_decodes_unwrapped_body() {
    let h = Harness::signed_in(vec![json_reply(200, &json!({"id": 4, "name": "ROLE_OPERATOR"}))]);
    let role: Role = h.client().request(OutboundRequest::get("/api/admin/roles/4")).await.unwrap();
    assert_eq!(role.id, Some(4));
    assert_eq!(role.name, "ROLE_OPERATOR");
}

#[tokio::test]
async fn request_reports_shape_mismatch_as_decode_error() {
    let h = Harness::signed_in(vec![Ok(RawResponse::new(200, "<html>"))]);
    let result: Result<Role, ApiError> = h.client().request(OutboundRequest::get("/api/admin/roles/4")).await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
    assert!(h.notifier.notices().is_empty());
}

// =============================================================
// 401
// =============================================================

#[tokio::test]
async fn unauthorized_clears_session_and_redirects() {
    let h = Harness::signed_in(vec![json_reply(401, &json!({"message": "expired"}))]);
    let result = h.client().send(OutboundRequest::get("/api/pets")).await;

    assert_eq!(result, Err(ApiError::Unauthorized));
    assert!(!h.auth.is_authenticated());
    assert_eq!(h.auth.user(), None);
    assert!(h.storage.is_empty());
    assert_eq!(h.navigator.paths(), [LOGIN_PATH]);
    assert_eq!(h.notifier.messages(), [SESSION_EXPIRED_MESSAGE]);
    assert_eq!(h.notifier.notices()[0].level, NoticeLevel::Warning);
}

#[tokio::test]
async fn concurrent_unauthorized_notifies_once() {
    let expired = || json_reply(401, &json!({}));
    let h = Harness::signed_in(vec![expired(), expired(), expired()]);
    let client = h.client();

    let (a, b, c) = tokio::join!(
        client.send(OutboundRequest::get("/api/pets")),
        client.send(OutboundRequest::get("/api/orders")),
        client.send(OutboundRequest::get("/api/customers")),
    );

    for result in [a, b, c] {
        assert_eq!(result, Err(ApiError::Unauthorized));
    }
    assert_eq!(h.notifier.messages(), [SESSION_EXPIRED_MESSAGE]);
    assert_eq!(h.navigator.paths(), [LOGIN_PATH]);
    assert!(!h.auth.is_authenticated());
}

#[tokio::test]
async fn later_expiry_after_cooldown_notifies_again() {
    let expired = || json_reply(401, &json!({}));
    let h = Harness::signed_in(vec![expired(), expired()]);
    let client = ApiClient::builder(h.transport.clone(), h.auth.clone())
        .notifier(h.notifier.clone())
        .navigator(h.navigator.clone())
        .session_cooldown_ms(0)
        .build();

    let _ = client.send(OutboundRequest::get("/api/pets")).await;
    h.auth.login("tok-2", crate::test_support::admin_user());
    let _ = client.send(OutboundRequest::get("/api/pets")).await;

    assert_eq!(h.notifier.messages().len(), 2);
    assert_eq!(h.navigator.paths().len(), 2);
}

/// Answers 401 after the user has already signed in again, the way a slow
/// response to a request made with the old token arrives.
struct ReloginTransport {
    auth: AuthStore,
}

#[async_trait::async_trait(?Send)]
impl Transport for ReloginTransport {
    async fn send(&self, _request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        self.auth.login("tok-2", crate::test_support::admin_user());
        Ok(RawResponse::new(401, ""))
    }
}

#[tokio::test]
async fn stale_unauthorized_keeps_newer_session() {
    let h = Harness::signed_in(vec![]);
    let client = ApiClient::builder(Rc::new(ReloginTransport { auth: h.auth.clone() }), h.auth.clone())
        .notifier(h.notifier.clone())
        .navigator(h.navigator.clone())
        .build();

    let result = client.send(OutboundRequest::get("/api/pets")).await;

    assert_eq!(result, Err(ApiError::Unauthorized));
    assert_eq!(h.auth.token(), "tok-2");
    assert!(h.navigator.paths().is_empty());
    assert!(h.notifier.notices().is_empty());
}

#[test]
fn sent_token_reads_bearer_header() {
    let request = attach_bearer(OutboundRequest::get("/api/pets"), "tok-1");
    assert_eq!(sent_token(&request), "tok-1");
    assert_eq!(sent_token(&OutboundRequest::get("/api/pets")), "");
}

#[tokio::test]
async fn unauthorized_on_allow_listed_path_uses_mock_data() {
    let h = Harness::signed_in(vec![json_reply(401, &json!({}))]);
    let client = mock_client(&h, &["/api/admin/roles"]);

    let roles: Vec<Role> = client.request(OutboundRequest::get("/api/admin/roles")).await.unwrap();

    assert_eq!(roles.len(), 3);
    assert!(h.auth.is_authenticated());
    assert!(h.navigator.paths().is_empty());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn unauthorized_outside_allow_list_still_logs_out() {
    let h = Harness::signed_in(vec![json_reply(401, &json!({}))]);
    let client = mock_client(&h, &["/api/admin/roles"]);

    let result = client.send(OutboundRequest::get("/api/admin/users")).await;

    assert_eq!(result, Err(ApiError::Unauthorized));
    assert!(!h.auth.is_authenticated());
    assert_eq!(h.navigator.paths(), [LOGIN_PATH]);
}

// =============================================================
// 403
// =============================================================

#[tokio::test]
async fn forbidden_keeps_session_and_location() {
    let h = Harness::signed_in(vec![json_reply(403, &json!({"message": "nope"}))]);
    let result = h.client().send(OutboundRequest::delete("/api/admin/users/2")).await;

    assert_eq!(result, Err(ApiError::Forbidden));
    assert!(h.auth.is_authenticated());
    assert!(h.navigator.paths().is_empty());
    assert_eq!(h.notifier.messages(), [FORBIDDEN_MESSAGE]);
}

#[tokio::test]
async fn forbidden_on_allow_listed_path_uses_mock_data() {
    let h = Harness::signed_in(vec![json_reply(403, &json!({}))]);
    let client = mock_client(&h, &["/api/admin/users"]);

    let body = client.send(OutboundRequest::get("/api/admin/users/1")).await.unwrap();

    assert_eq!(body["username"], "admin");
    assert!(h.notifier.notices().is_empty());
}

// =============================================================
// Transport failure and 404
// =============================================================

#[tokio::test]
async fn network_failure_without_fallback_notifies_and_rejects() {
    let h = Harness::signed_in(vec![network_down()]);
    let result = h.client().send(OutboundRequest::get("/api/admin/roles")).await;

    assert!(matches!(result, Err(ApiError::Transport(TransportError::Network(_)))));
    assert_eq!(h.notifier.messages(), [NETWORK_ERROR_MESSAGE]);
    assert!(h.auth.is_authenticated());
}

#[tokio::test]
async fn network_failure_on_mock_endpoint_resolves() {
    let h = Harness::signed_in(vec![network_down()]);
    let client = mock_client(&h, &[]);

    let body = client
        .send(OutboundRequest::get("/api/admin/users/search").query("keyword", "li"))
        .await
        .unwrap();

    let names: Vec<&str> = body.as_array().unwrap().iter().filter_map(|u| u["username"].as_str()).collect();
    assert_eq!(names, ["li_si"]);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn network_failure_on_unknown_endpoint_propagates_under_mock() {
    let h = Harness::signed_in(vec![network_down()]);
    let client = mock_client(&h, &[]);

    let result = client.send(OutboundRequest::get("/api/pets")).await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
    assert_eq!(h.notifier.messages(), [NETWORK_ERROR_MESSAGE]);
}

#[tokio::test]
async fn disabled_policy_never_consults_resolver() {
    let h = Harness::signed_in(vec![network_down()]);
    let client = ApiClient::builder(h.transport.clone(), h.auth.clone())
        .notifier(h.notifier.clone())
        .fallback(Rc::new(MockFallback::new(Duration::ZERO)), FallbackPolicy::default())
        .build();

    let result = client.send(OutboundRequest::get("/api/admin/roles")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn timeout_is_a_transport_failure() {
    let h = Harness::signed_in(vec![Err(TransportError::Timeout { ms: 15_000 })]);
    let result = h.client().send(OutboundRequest::get("/api/pets")).await;
    assert_eq!(result, Err(ApiError::Transport(TransportError::Timeout { ms: 15_000 })));
}

#[tokio::test]
async fn not_found_without_fallback_surfaces_server_message() {
    let h = Harness::signed_in(vec![json_reply(404, &json!({"message": "Pet not found"}))]);
    let result = h.client().send(OutboundRequest::get("/api/pets/9")).await;

    assert_eq!(result, Err(ApiError::NotFound { message: Some("Pet not found".to_owned()) }));
    assert_eq!(h.notifier.messages(), ["Pet not found"]);
}

#[tokio::test]
async fn not_found_without_message_uses_generic_notice() {
    let h = Harness::signed_in(vec![Ok(RawResponse::new(404, ""))]);
    let _ = h.client().send(OutboundRequest::get("/api/pets/9")).await;
    assert_eq!(h.notifier.messages(), [NOT_FOUND_MESSAGE]);
}

#[tokio::test]
async fn not_found_on_mock_endpoint_resolves_and_persists_write() {
    let h = Harness::signed_in(vec![json_reply(404, &json!({})), json_reply(404, &json!({}))]);
    let client = mock_client(&h, &[]);

    let created = client
        .send(OutboundRequest::post("/api/admin/roles").json(&json!({"name": "ROLE_OPERATOR"})).unwrap())
        .await
        .unwrap();
    assert_eq!(created["id"], 4);

    let roles: Vec<Role> = client.request(OutboundRequest::get("/api/admin/roles")).await.unwrap();
    assert_eq!(roles.len(), 4);
}

// =============================================================
// Other statuses
// =============================================================

#[tokio::test]
async fn server_error_uses_generic_notice() {
    let h = Harness::signed_in(vec![json_reply(502, &json!({"message": "upstream down"}))]);
    let result = h.client().send(OutboundRequest::get("/api/orders")).await;

    assert_eq!(result, Err(ApiError::Server { status: 502, message: Some("upstream down".to_owned()) }));
    assert_eq!(h.notifier.messages(), [SERVER_ERROR_MESSAGE]);
    assert!(h.auth.is_authenticated());
}

#[tokio::test]
async fn other_status_prefers_server_message() {
    let h = Harness::signed_in(vec![
        json_reply(400, &json!({"message": "Username is already taken!"})),
        Ok(RawResponse::new(409, "")),
    ]);
    let client = h.client();

    let first = client.send(OutboundRequest::post("/api/auth/signup")).await;
    let second = client.send(OutboundRequest::post("/api/auth/signup")).await;

    assert!(matches!(first, Err(ApiError::Http { status: 400, .. })));
    assert!(matches!(second, Err(ApiError::Http { status: 409, message: None })));
    assert_eq!(h.notifier.messages(), ["Username is already taken!", "Request failed (409)"]);
}

// =============================================================
// Policy
// =============================================================

#[test]
fn policy_from_config() {
    let config = ClientConfig {
        mock_fallback: true,
        mock_on_auth_failure: vec!["/api/admin/roles".to_owned()],
        ..ClientConfig::default()
    };
    let policy = FallbackPolicy::from_config(&config);
    assert!(policy.enabled);
    assert!(policy.allows_auth_fallback("/api/admin/roles/2"));
    assert!(!policy.allows_auth_fallback("/api/admin/users"));
}

#[test]
fn auth_fallback_requires_enabled_policy() {
    let policy = FallbackPolicy { enabled: false, on_auth_failure: vec!["/api".to_owned()] };
    assert!(!policy.allows_auth_fallback("/api/admin/roles"));
}
