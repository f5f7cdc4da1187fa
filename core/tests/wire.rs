//! Exact wire behavior of `ResourceClient` over reqwest, checked with wiremock.

use std::time::Duration;

use serde_json::{json, Value};
use staffdesk_core::{
    ApiError, AuthContext, AuthPolicy, Endpoint, ErrorKind, ReqwestTransport, ResourceClient,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, resource: &str, auth: AuthContext) -> ResourceClient {
    let endpoint = Endpoint::collection(&server.uri(), resource)
        .unwrap()
        .with_upload_path(&server.uri(), "files")
        .unwrap();
    ResourceClient::new(endpoint, auth, ReqwestTransport::new(None).unwrap())
}

#[tokio::test]
async fn create_returns_server_body_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/departments"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "Engineering"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "Engineering"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "departments", AuthContext::anonymous());
    let out: Value = c.create(&json!({"name": "Engineering"})).await.unwrap();
    assert_eq!(out, json!({"id": 1, "name": "Engineering"}));
}

#[tokio::test]
async fn list_issues_single_bodiless_get() {
    let server = MockServer::start().await;

    let listing = json!({"success": true, "data": [{"anything": ["goes", 1, null]}]});
    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&listing))
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "employees", AuthContext::anonymous());
    let out: Value = c.list().await.unwrap();
    assert_eq!(out, listing);

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].body.is_empty());
}

#[tokio::test]
async fn upload_posts_to_files() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_json(json!({"employee_id": "e1", "image": "me.jpg"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": true, "message": "File uploaded successfully!"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "employees", AuthContext::anonymous());
    let out: Value = c
        .upload(&json!({"employee_id": "e1", "image": "me.jpg"}))
        .await
        .unwrap();
    assert_eq!(out["success"], true);
}

#[tokio::test]
async fn search_sends_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/departments"))
        .and(query_param("search", "eng ops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "departments", AuthContext::anonymous());
    let _: Value = c.search("eng ops").await.unwrap();
}

#[tokio::test]
async fn token_header_follows_policy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/departments"))
        .and(header("x-access-token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(2)
        .mount(&server)
        .await;

    let departments = client(&server, "departments", AuthContext::new("tok"));
    let _: Value = departments.list().await.unwrap();

    let users = ResourceClient::new(
        Endpoint::collection(&server.uri(), "users")
            .unwrap()
            .with_auth_policy(AuthPolicy::Omit),
        AuthContext::new("tok"),
        ReqwestTransport::new(None).unwrap(),
    );
    let _: Value = users.create(&json!({"username": "u"})).await.unwrap();

    // attach policy, but no token to attach
    let anonymous = client(&server, "users", AuthContext::anonymous());
    let _: Value = anonymous.create(&json!({"username": "v"})).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let sign_ups: Vec<_> = received
        .iter()
        .filter(|r| r.url.path() == "/users")
        .collect();
    assert_eq!(sign_ups.len(), 2);
    for request in sign_ups {
        assert!(request.headers.get("x-access-token").is_none());
    }
}

#[tokio::test]
async fn error_status_is_remote_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server error"))
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "employees", AuthContext::anonymous());
    let err = c.create::<_, Value>(&json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server error");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_is_remote() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let c = client(&server, "departments", AuthContext::anonymous());
    let err = c.list::<Value>().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { status: 200, .. }));
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn concurrent_calls_are_attributed_correctly() {
    let server = MockServer::start().await;

    // the create reply is slower, so it completes after the list
    Mock::given(method("POST"))
        .and(path("/departments"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"op": "create"}))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"op": "list"})))
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "departments", AuthContext::anonymous());
    let body = json!({"name": "Engineering"});
    let (created, listed) = tokio::join!(
        c.create::<_, Value>(&body),
        c.list::<Value>()
    );
    assert_eq!(created.unwrap(), json!({"op": "create"}));
    assert_eq!(listed.unwrap(), json!({"op": "list"}));
}

#[tokio::test]
async fn timeout_surfaces_as_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let c = ResourceClient::new(
        Endpoint::collection(&server.uri(), "employees").unwrap(),
        AuthContext::anonymous(),
        ReqwestTransport::new(Some(Duration::from_millis(100))).unwrap(),
    );
    let err = c.list::<Value>().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/departments"))
        .respond_with(ResponseTemplate::new(303).insert_header("location", "/departments"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"op": "list"})))
        .expect(0)
        .mount(&server)
        .await;

    let c = client(&server, "departments", AuthContext::anonymous());
    let err = c
        .create::<_, Value>(&json!({"name": "Engineering"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 303, .. }));
    assert_eq!(err.kind(), ErrorKind::Remote);
}

#[tokio::test]
async fn unsendable_token_fails_locally_without_a_request() {
    let server = MockServer::start().await;

    let c = client(&server, "departments", AuthContext::new("abc\ndef"));
    let err = c.list::<Value>().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidHeader { .. }));
    assert_eq!(err.kind(), ErrorKind::Local);

    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn empty_token_sends_no_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/departments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "departments", AuthContext::new(""));
    let _: Value = c.list().await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("x-access-token").is_none());
}

#[tokio::test]
async fn non_utf8_body_is_remote() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
        .expect(1)
        .mount(&server)
        .await;

    let c = client(&server, "employees", AuthContext::anonymous());
    let err = c.list::<Value>().await.unwrap_err();
    assert!(matches!(err, ApiError::NonUtf8Body { status: 200, .. }));
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn caller_supplied_client_keeps_its_settings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees"))
        .and(header("x-request-source", "staffdesk-tests"))
        .and(header("x-access-token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut defaults = reqwest::header::HeaderMap::new();
    defaults.insert(
        "x-request-source",
        reqwest::header::HeaderValue::from_static("staffdesk-tests"),
    );
    let http = reqwest::Client::builder()
        .default_headers(defaults)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let c = ResourceClient::new(
        Endpoint::collection(&server.uri(), "employees").unwrap(),
        AuthContext::new("tok"),
        ReqwestTransport::from_client(http),
    );
    let out: Value = c.list().await.unwrap();
    assert_eq!(out, json!({"success": true}));
}
