//! End-to-end roundtrip against a real HTTP server: serve a generated
//! OpenAPI document, bootstrap the registry over HTTP, and exercise each
//! request-construction and response-classification branch.

use axum::Router;
use axum::extract::RawQuery;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use sandbox_openapi_tools::config::AdapterConfig;
use sandbox_openapi_tools::dispatch::{CallContent, Dispatcher};
use sandbox_openapi_tools::error::AdapterError;
use sandbox_openapi_tools::runtime::ToolRegistry;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

struct TestApi {
    base_url: String,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Drop for TestApi {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Bind first so the served document can embed the real address.
async fn start_test_api() -> TestApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    let base_url = format!("http://{addr}");

    let document = json!({
        "openapi": "3.0.0",
        "servers": [{"url": base_url}],
        "paths": {
            "/echo/query": {
                "get": {
                    "summary": "echo_query",
                    "parameters": [
                        {"name": "a", "required": true, "schema": {"type": "integer"}},
                        {"name": "b", "schema": {"type": "string"}}
                    ]
                }
            },
            "/echo/body": {
                "post": {
                    "x_mcp_tool": "echo_body",
                    "requestBody": {"content": {"application/json": {"schema": {
                        "properties": {
                            "a": {"type": "integer"},
                            "note": {"type": "string"}
                        },
                        "required": ["a"]
                    }}}}
                }
            },
            "/plain": {"get": {"summary": "plain_text"}},
            "/image": {"get": {"summary": "render_image"}},
            "/fail": {"get": {"summary": "always_fails"}}
        }
    });

    async fn echo_query(RawQuery(query): RawQuery) -> axum::Json<Value> {
        axum::Json(json!({ "query": query.unwrap_or_default() }))
    }

    async fn echo_body(
        headers: HeaderMap,
        axum::Json(body): axum::Json<Value>,
    ) -> axum::Json<Value> {
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        axum::Json(json!({
            "body": body,
            "apiKey": api_key,
            "contentType": content_type,
        }))
    }

    async fn plain() -> &'static str {
        "ok"
    }

    async fn image() -> axum::Json<Value> {
        axum::Json(json!([
            {"type": "image", "data": "AAAA", "mimeType": "image/png"}
        ]))
    }

    async fn fail() -> (StatusCode, &'static str) {
        (StatusCode::INTERNAL_SERVER_ERROR, "sandbox exploded")
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(30)).await;
        "late"
    }

    let app = Router::new()
        .route(
            "/openapi.json",
            get(move || {
                let document = document.clone();
                async move { axum::Json(document) }
            }),
        )
        .route("/echo/query", get(echo_query))
        .route("/echo/body", post(echo_body))
        .route("/plain", get(plain))
        .route("/image", get(image))
        .route("/fail", get(fail))
        .route("/slow", get(slow));

    let server = axum::serve(listener, app);
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = server.with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });
    tokio::spawn(async move { server.await });

    TestApi {
        base_url,
        shutdown: Some(shutdown_tx),
    }
}

async fn bootstrap(api: &TestApi, api_key: Option<&str>) -> ToolRegistry {
    let config = AdapterConfig {
        document: Some(format!("{}/openapi.json", api.base_url)),
        api_key: api_key.map(str::to_string),
        ..AdapterConfig::default()
    };
    ToolRegistry::bootstrap_openapi(&config)
        .await
        .expect("bootstrap over http")
}

fn text_of(result: &rmcp::model::CallToolResult) -> String {
    result.content[0]
        .as_text()
        .expect("text content")
        .text
        .clone()
}

#[tokio::test]
async fn bootstrap_over_http_derives_all_tools() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let names: Vec<String> = registry.list_tools().iter().map(|t| t.name.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "echo_query",
            "echo_body",
            "plain_text",
            "render_image",
            "always_fails"
        ]
    );
}

#[tokio::test]
async fn get_calls_carry_ordered_query_parameters_and_no_body() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let args = json!({"a": 1, "b": "x"});
    let result = registry
        .call_tool(
            "echo_query",
            args.as_object().unwrap(),
            &CancellationToken::new(),
        )
        .await
        .expect("call echo_query");

    let echoed: Value = serde_json::from_str(&text_of(&result)).expect("json text");
    assert_eq!(echoed["query"], json!("a=1&b=x"));
}

#[tokio::test]
async fn post_calls_send_a_json_body_with_the_api_key() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, Some("secret")).await;

    let args = json!({"a": 7, "note": "hello"});
    let result = registry
        .call_tool(
            "echo_body",
            args.as_object().unwrap(),
            &CancellationToken::new(),
        )
        .await
        .expect("call echo_body");

    let echoed: Value = serde_json::from_str(&text_of(&result)).expect("json text");
    assert_eq!(echoed["body"], json!({"a": 7, "note": "hello"}));
    assert_eq!(echoed["apiKey"], json!("secret"));
    assert_eq!(echoed["contentType"], json!("application/json"));
}

#[tokio::test]
async fn missing_required_arguments_are_rejected_before_dispatch() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let args = json!({"note": "no a"});
    let err = registry
        .call_tool(
            "echo_body",
            args.as_object().unwrap(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing required argument 'a'"));
}

#[tokio::test]
async fn plain_text_responses_pass_through_raw() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let result = registry
        .call_tool(
            "plain_text",
            &serde_json::Map::new(),
            &CancellationToken::new(),
        )
        .await
        .expect("call plain_text");
    assert_eq!(text_of(&result), "ok");
}

#[tokio::test]
async fn json_responses_are_pretty_printed() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let args = json!({"a": 1});
    let result = registry
        .call_tool(
            "echo_query",
            args.as_object().unwrap(),
            &CancellationToken::new(),
        )
        .await
        .expect("call echo_query");

    let text = text_of(&result);
    assert!(text.contains("\n  \"query\""), "expected 2-space indent: {text}");
}

#[tokio::test]
async fn non_2xx_responses_are_errors_carrying_status_and_body() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let err = registry
        .call_tool(
            "always_fails",
            &serde_json::Map::new(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Http(_)), "got: {err}");
    let message = err.to_string();
    assert!(message.contains("500"), "missing status: {message}");
    assert!(
        message.contains("sandbox exploded"),
        "missing body: {message}"
    );
}

fn slow_tool() -> sandbox_openapi_tools::derive::ToolDescriptor {
    sandbox_openapi_tools::derive::ToolDescriptor {
        name: "slow".to_string(),
        description: "slow".to_string(),
        fields: vec![],
        method: sandbox_openapi_tools::Method::GET,
        path: "/slow".to_string(),
    }
}

#[tokio::test]
async fn stalled_remotes_hit_the_per_call_deadline() {
    let api = start_test_api().await;

    let dispatcher = Dispatcher::new(
        reqwest::Client::new(),
        api.base_url.clone(),
        None,
        Some(Duration::from_millis(200)),
    );

    let err = dispatcher
        .call(&slow_tool(), &serde_json::Map::new(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Timeout(_)), "got: {err}");
}

#[tokio::test]
async fn cancellation_aborts_an_in_flight_call() {
    let api = start_test_api().await;

    let dispatcher = Dispatcher::new(reqwest::Client::new(), api.base_url.clone(), None, None);

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let err = dispatcher
        .call(&slow_tool(), &serde_json::Map::new(), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Cancelled), "got: {err}");
}

#[tokio::test]
async fn image_arrays_pass_through_verbatim_at_the_dispatch_boundary() {
    let api = start_test_api().await;

    // Exercised at the dispatcher so the untouched payload is observable.
    let dispatcher = Dispatcher::new(reqwest::Client::new(), api.base_url.clone(), None, None);
    let tool = sandbox_openapi_tools::derive::ToolDescriptor {
        name: "render_image".to_string(),
        description: "render_image".to_string(),
        fields: vec![],
        method: sandbox_openapi_tools::Method::GET,
        path: "/image".to_string(),
    };

    let content = dispatcher
        .call(&tool, &serde_json::Map::new(), &CancellationToken::new())
        .await
        .expect("call /image");
    assert_eq!(
        content,
        CallContent::Rich(vec![json!({
            "type": "image", "data": "AAAA", "mimeType": "image/png"
        })])
    );
}

#[tokio::test]
async fn image_results_surface_as_mcp_image_content() {
    let api = start_test_api().await;
    let registry = bootstrap(&api, None).await;

    let result = registry
        .call_tool(
            "render_image",
            &serde_json::Map::new(),
            &CancellationToken::new(),
        )
        .await
        .expect("call render_image");

    let image = result.content[0].as_image().expect("image content");
    assert_eq!(image.data, "AAAA");
    assert_eq!(image.mime_type, "image/png");
}
