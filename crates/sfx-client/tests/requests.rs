//! Request-level behavior of a configured client against a mock server.

use std::time::Duration;

use serde_json::{Value, json};
use sfx_client::{Error, HostInfo, SfxClient};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SfxClient {
    SfxClient::builder()
        .base_url(server.uri())
        .auth_token("t123")
        .host(HostInfo::new("Terraform").with_version("1.5.7"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_requests_carry_token_and_user_agent() {
    let server = MockServer::start().await;
    let expected_agent = format!("Terraform/1.5.7 sfx-client/{}", env!("CARGO_PKG_VERSION"));

    Mock::given(method("GET"))
        .and(path("/v2/detector/abc"))
        .and(header("x-sf-token", "t123"))
        .and(header("user-agent", expected_agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let detector: Value = client_for(&server).get("v2/detector/abc").await.unwrap();
    assert_eq!(detector["id"], "abc");
}

#[tokio::test]
async fn test_get_with_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/team"))
        .and(query_param("name", "sre"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 1})))
        .mount(&server)
        .await;

    let teams: Value = client_for(&server)
        .get_with_query("/v2/team", &[("name", "sre")])
        .await
        .unwrap();
    assert_eq!(teams["count"], 1);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/dashboardgroup"))
        .and(header_exists("x-sf-token"))
        .and(body_json(json!({"name": "ops"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "g1", "name": "ops"})))
        .mount(&server)
        .await;

    let created: Value = client_for(&server)
        .post("v2/dashboardgroup", &json!({"name": "ops"}))
        .await
        .unwrap();
    assert_eq!(created["id"], "g1");
}

#[tokio::test]
async fn test_put_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v2/team/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t1"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v2/team/t1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let updated: Value = client.put("v2/team/t1", &json!({"name": "x"})).await.unwrap();
    assert_eq!(updated["id"], "t1");
    client.delete("v2/team/t1").await.unwrap();
}

#[tokio::test]
async fn test_error_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/detector/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"code": 404, "message": "no such detector"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/organization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/chart/c1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = client.get::<Value>("v2/detector/missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(ref m) if m == "no such detector"));

    let err = client.get::<Value>("v2/organization").await.unwrap_err();
    assert!(err.is_auth_error());

    let err = client.get::<Value>("v2/chart/c1").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 503, ref message } if message == "HTTP 503"));
}

#[tokio::test]
async fn test_invalid_json_body_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/detector/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get::<Value>("v2/detector/abc")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_request_timeout_applies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = SfxClient::builder()
        .base_url(server.uri())
        .auth_token("t123")
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let err = client.get::<Value>("v2/slow").await.unwrap_err();
    match err {
        Error::Http(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_construction_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let _client = client_for(&server);
    // `expect(0)` is verified when the server drops
}
