//! HTTP contract tests for the InfraKitchen API client against a mock backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use infrakitchen::domain::ports::{
    Credentials, IdentityApi, IdentityError, InfraKitchenApi, ListQuery, TreeDirection,
};
use infrakitchen::domain::{ApiError, UNKNOWN_ERROR_CODE};
use infrakitchen::outbound::{InfraKitchenApiClient, MapConfig, StaticIdentity};
use mockito::{Matcher, Server, ServerGuard};
use pagination::{Pagination, Sort, SortOrder};
use rstest::rstest;
use serde_json::{Map, Value, json};

const API_ROOT: &str = "/api/proxy/infrakitchen/api";
const TOKEN: &str = "t0k3n";

fn client_for(server: &ServerGuard, identity: StaticIdentity) -> InfraKitchenApiClient {
    InfraKitchenApiClient::new(
        Arc::new(identity),
        &MapConfig::with_backend_base_url(server.url()),
    )
    .expect("client should build")
}

/// Identity provider that issues a new token on every call.
#[derive(Debug, Default)]
struct RotatingIdentity {
    issued: AtomicUsize,
}

#[async_trait]
impl IdentityApi for RotatingIdentity {
    async fn get_credentials(&self) -> Result<Credentials, IdentityError> {
        let serial = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Credentials::bearer(format!("token-{serial}")))
    }
}

fn client(server: &ServerGuard) -> InfraKitchenApiClient {
    client_for(server, StaticIdentity::bearer(TOKEN))
}

fn list_query(sort: &str, range: &str, filter: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("sort".into(), sort.into()),
        Matcher::UrlEncoded("range".into(), range.into()),
        Matcher::UrlEncoded("filter".into(), filter.into()),
    ])
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object literal")
}

#[tokio::test]
async fn list_sends_range_and_reads_total() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{API_ROOT}/templates").as_str())
        .match_header("range", "templates=0-9")
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .match_header("accept", "application/json")
        .match_query(list_query(r#"["id","ASC"]"#, "[0,9]", "{}"))
        .with_status(200)
        .with_header("content-range", "items 0-9/42")
        .with_body(r#"[{"id":1},{"id":2}]"#)
        .create_async()
        .await;

    let result = client(&server)
        .get_list(&ListQuery::new("templates"))
        .await
        .expect("list should succeed");

    mock.assert_async().await;
    assert_eq!(result.total, 42);
    assert_eq!(result.data, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[rstest]
#[case(1, 10, "0-9", "[0,9]")]
#[case(3, 25, "50-74", "[50,74]")]
#[case(2, 1, "1-1", "[1,1]")]
#[tokio::test]
async fn list_range_follows_the_page(
    #[case] page: u64,
    #[case] per_page: u64,
    #[case] header: &str,
    #[case] query: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{API_ROOT}/workspaces").as_str())
        .match_header("range", format!("workspaces={header}").as_str())
        .match_query(list_query(
            r#"["name","DESC"]"#,
            query,
            r#"{"status":"ready"}"#,
        ))
        .with_status(200)
        .with_header("content-range", "workspaces 0-0/100")
        .with_body("[]")
        .create_async()
        .await;

    let query = ListQuery::new("workspaces")
        .with_pagination(Pagination::new(page, per_page).expect("valid page"))
        .with_sort(Sort::new("name", SortOrder::Desc))
        .with_filter(object(json!({"status": "ready"})));
    let result = client(&server)
        .get_list(&query)
        .await
        .expect("list should succeed");

    mock.assert_async().await;
    assert_eq!(result.total, 100);
    assert!(result.data.is_empty());
}

#[tokio::test]
async fn list_without_content_range_is_a_transport_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{API_ROOT}/tasks").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let error = client(&server)
        .get_list(&ListQuery::new("tasks"))
        .await
        .expect_err("missing header must fail");

    assert!(matches!(error, ApiError::Transport { .. }));
    assert!(error.to_string().contains("Content-Range"));
}

#[tokio::test]
async fn list_with_non_array_body_is_a_parse_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{API_ROOT}/tasks").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-range", "tasks 0-9/1")
        .with_body(r#"{"id":1}"#)
        .create_async()
        .await;

    let error = client(&server)
        .get_list(&ListQuery::new("tasks"))
        .await
        .expect_err("object body must fail");

    assert!(matches!(error, ApiError::Parse { .. }));
}

#[rstest]
#[case(
    409,
    r#"{"message":"x","error_code":"E1","metadata":{"id":7}}"#,
    "E1"
)]
#[case(400, r#"{"message":"x"}"#, UNKNOWN_ERROR_CODE)]
#[case(409, r#"{"message":"x","error_code":7}"#, "7")]
#[case(422, r#"{"message":"x","error_code":{"kind":"E1"}}"#, UNKNOWN_ERROR_CODE)]
#[tokio::test]
async fn error_bodies_with_a_message_are_structured(
    #[case] status: usize,
    #[case] body: &str,
    #[case] code: &str,
) {
    let mut server = Server::new_async().await;
    server
        .mock("POST", format!("{API_ROOT}/templates").as_str())
        .with_status(status)
        .with_body(body)
        .create_async()
        .await;

    let error = client(&server)
        .post_raw("templates", &json!({"name": "vpc"}))
        .await
        .expect_err("non-2xx must fail");

    assert_eq!(error.status(), u16::try_from(status).ok());
    assert_eq!(error.error_code(), Some(code));
    assert_eq!(error.to_string(), "x");
}

#[rstest]
#[case(502, "<html>upstream down</html>", "502 Bad Gateway.")]
#[case(404, r#"{"detail":"missing"}"#, "404 Not Found.")]
#[case(599, "boom", "599.")]
#[tokio::test]
async fn unusable_error_bodies_report_status_text(
    #[case] status: usize,
    #[case] body: &str,
    #[case] expected: &str,
) {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{API_ROOT}/executors/9").as_str())
        .with_status(status)
        .with_body(body)
        .create_async()
        .await;

    let error = client(&server)
        .get("executors/9", &Map::new())
        .await
        .expect_err("non-2xx must fail");

    assert!(matches!(error, ApiError::Transport { .. }));
    assert_eq!(error.to_string(), expected);
}

#[tokio::test]
async fn get_encodes_params_and_returns_json() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{API_ROOT}/secrets").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("kind".into(), "vault".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"items":[]}"#)
        .create_async()
        .await;

    let value = client(&server)
        .get("secrets", &object(json!({"kind": "vault", "limit": 5})))
        .await
        .expect("get should succeed");

    mock.assert_async().await;
    assert_eq!(value, json!({"items": []}));
}

#[tokio::test]
async fn mutations_send_json_bodies() {
    let mut server = Server::new_async().await;
    let put = server
        .mock("PUT", format!("{API_ROOT}/templates/3").as_str())
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"name": "eks"})))
        .with_status(200)
        .with_body(r#"{"id":3,"name":"eks"}"#)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", format!("{API_ROOT}/templates/3").as_str())
        .match_body(Matcher::Json(json!({"state": "disabled"})))
        .with_status(200)
        .with_body(r#"{"id":3}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", format!("{API_ROOT}/templates/3").as_str())
        .match_body(Matcher::Json(json!({"force": true})))
        .with_status(204)
        .create_async()
        .await;

    let api = client(&server);
    let updated = api
        .update_raw("templates/3", &json!({"name": "eks"}))
        .await
        .expect("put should succeed");
    api.patch_raw("/templates/3", &json!({"state": "disabled"}))
        .await
        .expect("patch should succeed");
    let deleted = api
        .delete_raw("templates/3", &json!({"force": true}))
        .await
        .expect("delete should succeed");

    put.assert_async().await;
    patch.assert_async().await;
    delete.assert_async().await;
    assert_eq!(updated, json!({"id": 3, "name": "eks"}));
    assert_eq!(deleted, json!({}));
}

#[tokio::test]
async fn invalid_success_json_is_a_parse_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", format!("{API_ROOT}/tasks").as_str())
        .with_status(201)
        .with_body("created")
        .create_async()
        .await;

    let error = client(&server)
        .post_raw("tasks", &json!({}))
        .await
        .expect_err("text body must fail");

    assert!(matches!(error, ApiError::Parse { .. }));
}

#[rstest]
#[case(TreeDirection::Children, "children")]
#[case(TreeDirection::Parents, "parents")]
#[case(TreeDirection::Both, "both")]
#[tokio::test]
async fn tree_requests_join_without_double_slashes(
    #[case] direction: TreeDirection,
    #[case] segment: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            format!("{API_ROOT}/resources/12/tree/{segment}").as_str(),
        )
        .with_status(200)
        .with_body(r#"{"node":12}"#)
        .create_async()
        .await;

    let tree = client(&server)
        .get_tree("resources", "12", direction)
        .await
        .expect("tree should load");

    mock.assert_async().await;
    assert_eq!(tree, json!({"node": 12}));
}

#[rstest]
#[case(vec![], "")]
#[case(vec!["vpc".to_owned(), "iam".to_owned()], "vpc,iam")]
#[tokio::test]
async fn variable_schema_always_sends_parent_resources(
    #[case] parents: Vec<String>,
    #[case] expected: &str,
) {
    let mut server = Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            format!("{API_ROOT}/source_code_versions/5/variables").as_str(),
        )
        .match_query(Matcher::UrlEncoded(
            "parent_resources".into(),
            expected.into(),
        ))
        .with_status(200)
        .with_body(r#"[{"name":"region"}]"#)
        .create_async()
        .await;

    let schema = client(&server)
        .get_variable_schema("5", &parents)
        .await
        .expect("schema should load");

    mock.assert_async().await;
    assert_eq!(schema, json!([{"name": "region"}]));
}

#[tokio::test]
async fn download_returns_raw_bytes_with_only_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{API_ROOT}/resources/abc/debug").as_str())
        .match_header("authorization", format!("Bearer {TOKEN}").as_str())
        .match_header("content-type", Matcher::Missing)
        .with_status(200)
        .with_body(vec![0_u8, 159, 146, 150])
        .create_async()
        .await;

    let bytes = client(&server)
        .download_file("abc")
        .await
        .expect("download should succeed");

    mock.assert_async().await;
    assert_eq!(bytes, vec![0_u8, 159, 146, 150]);
}

#[tokio::test]
async fn failed_download_carries_the_body_text() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{API_ROOT}/resources/abc/debug").as_str())
        .with_status(404)
        .with_body("no debug bundle")
        .create_async()
        .await;

    let error = client(&server)
        .download_file("abc")
        .await
        .expect_err("404 must fail");

    assert!(matches!(error, ApiError::Transport { .. }));
    assert_eq!(
        error.to_string(),
        "Request failed with 404 Not Found, no debug bundle"
    );
}

#[tokio::test]
async fn anonymous_requests_omit_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{API_ROOT}/integrations").as_str())
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let api = client_for(&server, StaticIdentity::anonymous());
    api.get("integrations", &Map::new())
        .await
        .expect("get should succeed");

    mock.assert_async().await;
    assert_eq!(api.get_token().await, Ok(None));
}

#[tokio::test]
async fn token_is_passed_through() {
    let server = Server::new_async().await;
    assert_eq!(
        client(&server).get_token().await,
        Ok(Some(TOKEN.to_owned()))
    );
}

#[tokio::test]
async fn every_request_fetches_a_fresh_token() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", format!("{API_ROOT}/executors").as_str())
        .match_header("authorization", "Bearer token-1")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", format!("{API_ROOT}/executors").as_str())
        .match_header("authorization", "Bearer token-2")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let identity = Arc::new(RotatingIdentity::default());
    let api = InfraKitchenApiClient::new(
        identity.clone(),
        &MapConfig::with_backend_base_url(server.url()),
    )
    .expect("client should build");
    for _ in 0..2 {
        api.get("executors", &Map::new())
            .await
            .expect("get should succeed");
    }

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(identity.issued.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn download_without_a_reason_phrase_reports_the_bare_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{API_ROOT}/resources/abc/debug").as_str())
        .with_status(599)
        .with_body("boom")
        .create_async()
        .await;

    let error = client(&server)
        .download_file("abc")
        .await
        .expect_err("599 must fail");

    assert_eq!(error.to_string(), "Request failed with 599, boom");
}
