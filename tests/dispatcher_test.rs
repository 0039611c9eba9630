//! Integration tests for [`Dispatcher`] against a mock JSON:API server.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hugin::{
    Dispatcher, Hugin, HuginError, Method, Response, Transport, TransportError, TransportOptions,
    TransportResponse,
};

fn client(server: &MockServer) -> Dispatcher {
    Hugin::builder().host(server.uri()).build().unwrap()
}

fn authorized_client(server: &MockServer) -> Dispatcher {
    Hugin::builder()
        .host(server.uri())
        .token("abc")
        .user_id(1)
        .build()
        .unwrap()
}

fn discussion_document() -> serde_json::Value {
    json!({
        "data": {
            "type": "discussions",
            "id": "5",
            "attributes": {"title": "Hello"},
            "relationships": {"user": {"data": {"type": "users", "id": "1"}}}
        },
        "included": [{"type": "users", "id": "1", "attributes": {"username": "alice"}}]
    })
}

// ============================================================================
// Recording transport
// ============================================================================

#[derive(Default)]
struct RecordingTransport {
    calls: Mutex<Vec<(Method, String, TransportOptions)>>,
    reply: Mutex<Option<TransportResponse>>,
}

impl RecordingTransport {
    fn replying(response: TransportResponse) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(Some(response)),
        }
    }

    fn calls(&self) -> Vec<(Method, String, TransportOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    fn name(&self) -> &str {
        "recording"
    }

    async fn invoke(
        &self,
        method: Method,
        url: &str,
        options: TransportOptions,
    ) -> Result<TransportResponse, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((method, url.to_string(), options));
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError::new("connection refused"))
    }
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn get_discussion_resolves_included_author() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/discussions/5"))
        .and(query_param("include", "user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discussion_document()))
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = client(&server);
    let response = forum
        .discussions()
        .id(5)
        .include("user")
        .get([])
        .unwrap()
        .request()
        .await
        .unwrap()
        .unwrap();

    let discussion = response.into_item().expect("item");
    assert_eq!(discussion.get_str("title"), Some("Hello"));
    assert_eq!(
        discussion.related("user").and_then(|u| u.get_str("username")),
        Some("alice")
    );
    assert!(forum.cache().get(1, "users").is_some());
    assert!(forum.cache().get(5, "discussions").is_some());
}

#[tokio::test]
async fn successful_request_resets_builder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let mut forum = client(&server);
    forum.discussions().offset(20).request().await.unwrap();

    assert_eq!(forum.builder().descriptor().to_string(), "");
}

#[tokio::test]
async fn pagination_and_get_variables_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/discussions"))
        .and(query_param("page[offset]", "20"))
        .and(query_param("sort", "-createdAt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = client(&server);
    let response = forum
        .discussions()
        .offset(20)
        .get([json!({"sort": "-createdAt"})])
        .unwrap()
        .request()
        .await
        .unwrap()
        .unwrap();

    assert!(response.into_collection().unwrap().is_empty());
}

#[tokio::test]
async fn sends_user_agent_and_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Token abc;userId=1"))
        .and(header("User-Agent", hugin::version::user_agent().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = authorized_client(&server);
    forum.users().request().await.unwrap();
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn post_wraps_variables_in_data() {
    let server = MockServer::start().await;
    let payload = json!({"type": "discussions", "attributes": {"title": "New"}});
    Mock::given(method("POST"))
        .and(path("/api/discussions"))
        .and(body_json(json!({"data": payload.clone()})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"type": "discussions", "id": "9", "attributes": {"title": "New"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = authorized_client(&server);
    let created = forum
        .discussions()
        .post([payload])
        .unwrap()
        .request()
        .await
        .unwrap()
        .unwrap()
        .into_item()
        .unwrap();
    assert_eq!(created.id(), 9);
}

#[tokio::test]
async fn delete_returns_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/discussions/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = authorized_client(&server);
    let response = forum
        .discussions()
        .id(3)
        .delete([])
        .unwrap()
        .request()
        .await
        .unwrap();
    assert_eq!(response, Some(Response::NoContent));
}

#[tokio::test]
async fn unauthorized_write_never_reaches_transport() {
    let transport = Arc::new(RecordingTransport::default());
    let mut forum = Hugin::builder()
        .host("https://forum.example.com")
        .transport(transport.clone())
        .build()
        .unwrap();

    let err = forum.discussions().id(1).delete([]).err().unwrap();
    assert!(matches!(err, HuginError::UnauthorizedMethod(Method::Delete)));
    assert!(err.is_local());
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn authorize_enables_writes() {
    let transport = Arc::new(RecordingTransport::replying(TransportResponse::new(204, "")));
    let mut forum = Hugin::builder()
        .host("https://forum.example.com/")
        .transport(transport.clone())
        .build()
        .unwrap();

    forum.authorize("xyz", None);
    assert!(forum.is_authorized());
    forum
        .discussions()
        .id(2)
        .patch([json!({"attributes": {"isLocked": true}})])
        .unwrap()
        .request()
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (verb, url, options) = &calls[0];
    assert_eq!(*verb, Method::Patch);
    assert_eq!(url, "https://forum.example.com/api/discussions/2");
    assert_eq!(options.header("authorization"), Some("Token xyz"));
    assert_eq!(
        options.header("accept"),
        Some("application/vnd.api+json, application/json")
    );
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn authenticate_posts_unwrapped_credentials() {
    let server = MockServer::start().await;
    let credentials = json!({"identification": "alice", "password": "secret"});
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_json(credentials.clone()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "t0k3n", "userId": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = client(&server);
    let response = forum.authenticate(credentials).await.unwrap().unwrap();
    let document = response.as_document().expect("document");
    assert_eq!(document["token"], "t0k3n");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn error_status_is_data_and_state_is_reset() {
    let server = MockServer::start().await;
    let body = json!({"errors": [{"status": "404", "code": "route_not_found"}]});
    Mock::given(method("GET"))
        .and(path("/api/discussions/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let mut forum = client(&server);
    let response = forum
        .discussions()
        .id(404)
        .request()
        .await
        .unwrap()
        .unwrap();

    let error = response.as_error().expect("error");
    assert_eq!(error.status, 404);
    assert_eq!(error.body, body);
    assert_eq!(forum.builder().descriptor().path(), "");
}

#[tokio::test]
async fn failed_authentication_does_not_leak_into_next_request() {
    let transport = Arc::new(RecordingTransport::replying(TransportResponse::json(
        401,
        &json!({"errors": [{"status": "401", "code": "not_authenticated"}]}),
    )));
    let mut forum = Hugin::builder()
        .host("https://forum.example.com")
        .transport(transport.clone())
        .build()
        .unwrap();

    let response = forum
        .authenticate(json!({"identification": "alice", "password": "hunter2"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(response.as_error().map(|e| e.status), Some(401));

    forum
        .discussions()
        .get([])
        .unwrap()
        .request()
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    let (verb, url, options) = &calls[1];
    assert_eq!(*verb, Method::Get);
    assert_eq!(url, "https://forum.example.com/api/discussions");
    assert!(options.query.is_empty());
    assert!(options.json.is_none());
}

#[tokio::test]
async fn connection_failure_resets_state() {
    let transport = Arc::new(RecordingTransport::default());
    let mut forum = Hugin::builder()
        .host("https://forum.example.com")
        .transport(transport)
        .build()
        .unwrap();

    let err = forum.discussions().id(3).request().await.unwrap_err();
    assert!(matches!(err, HuginError::Http(_)));
    assert_eq!(forum.builder().descriptor().to_string(), "");
}

#[tokio::test]
async fn connection_failure_is_http_error() {
    let transport = Arc::new(RecordingTransport::default());
    let mut forum = Hugin::builder()
        .host("https://forum.example.com")
        .transport(transport.clone())
        .build()
        .unwrap();

    let err = forum.users().request().await.unwrap_err();
    assert!(matches!(err, HuginError::Http(ref msg) if msg == "connection refused"));
    assert!(!err.is_local());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let mut forum = Hugin::builder()
        .host("http://127.0.0.1:9")
        .build()
        .unwrap();

    let err = forum.users().request().await.unwrap_err();
    assert!(matches!(err, HuginError::Http(_)));
}

// ============================================================================
// Cache ownership
// ============================================================================

#[tokio::test]
async fn dispatchers_do_not_share_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(discussion_document()))
        .mount(&server)
        .await;

    let mut first = client(&server);
    let second = client(&server);
    first.discussions().id(5).request().await.unwrap();

    assert!(first.cache().get(5, "discussions").is_some());
    assert!(second.cache().get(5, "discussions").is_none());
}

#[tokio::test]
async fn unknown_resource_type_is_refused() {
    let server = MockServer::start().await;
    let mut forum = client(&server);
    let err = forum.resource("widgets").err().unwrap();
    assert!(matches!(err, HuginError::UnknownResourceType(_)));
}

#[tokio::test]
async fn configured_resource_type_is_addressable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "posts", "id": "7", "attributes": {"number": 1}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut forum = Hugin::builder()
        .host(server.uri())
        .resource_type("posts")
        .build()
        .unwrap();
    let post = forum
        .resource("posts")
        .unwrap()
        .id(7)
        .request()
        .await
        .unwrap()
        .unwrap()
        .into_item()
        .unwrap();
    assert_eq!(post.get("number"), Some(&json!(1)));
}
