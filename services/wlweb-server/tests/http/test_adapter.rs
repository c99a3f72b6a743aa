//! Tests for the kernel-backed view adapter over real HTTP
//!
//! A router with one plain route and two kernel-backed routes is bound
//! to a local port and driven with an HTTP client. The evaluator stands
//! in for the kernel, answering `APIFunction` and `FormFunction` handlers
//! built from `Identity` and `"JSON"` the way the kernel does:
//! - APIFunction: 400 JSON failure without `x`, `{"x": ..}` with it
//! - FormFunction: HTML form on GET, `{"x": ..}` on POST (plain and file)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::{any, get},
    Router,
};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use wlweb::core::expr::Expr;
use wlweb::core::kernel::{Evaluation, Evaluator};
use wlweb::http::wl_view;

use crate::common::{kernel_payload, query_param, ScriptedEvaluator};

const API_FUNCTION: &str = r#"APIFunction[{"x" -> "String"}, Identity, "JSON"]"#;
const FORM_FUNCTION: &str = r#"FormFunction[{"x" -> "String"}, Identity, "JSON"]"#;
const FORM_HTML: &str = r#"<form method="post" enctype="multipart/form-data"><input name="x"/></form>"#;

/// Value of field `name`, read the way GenerateHTTPResponse reads it
fn field(request: &Expr, name: &str) -> Option<String> {
    if let Some(element) = request
        .lookup("MultipartElements")
        .and_then(|elements| elements.lookup(name))
    {
        if element.lookup("InMemory") == Some(&Expr::symbol("True")) {
            return element
                .lookup("ContentString")
                .and_then(Expr::as_str)
                .map(str::to_string);
        }
        let file = element.lookup("FileName").and_then(Expr::as_str)?;
        return std::fs::read_to_string(file).ok();
    }
    query_param(request, name)
}

fn json_payload(status: u16, value: serde_json::Value) -> Evaluation {
    kernel_payload(status, "application/json", value.to_string().as_bytes())
}

/// Minimal stand-in for the kernel side of the adapter
///
/// `Identity` hands the interpreted fields on unchanged, so a successful
/// call exports the association `<|"x" -> value|>`.
fn kernel(handler: &Expr, request: &Expr) -> wlweb::Result<Evaluation> {
    let source = match handler {
        Expr::Raw(source) => source.as_str(),
        other => panic!("unexpected handler {other}"),
    };
    let method = request.lookup("Method").and_then(Expr::as_str);

    if source == API_FUNCTION {
        return Ok(match field(request, "x") {
            Some(x) => json_payload(200, json!({ "x": x })),
            None => json_payload(
                400,
                json!({
                    "Success": false,
                    "Failure": "The field \"x\" is required",
                }),
            ),
        });
    }

    if source == FORM_FUNCTION {
        return Ok(match (method, field(request, "x")) {
            (Some("POST"), Some(x)) => json_payload(200, json!({ "x": x })),
            _ => kernel_payload(200, "text/html; charset=utf-8", FORM_HTML.as_bytes()),
        });
    }

    panic!("unexpected handler source {source}")
}

async fn api_view(
    State(evaluator): State<Arc<dyn Evaluator>>,
    request: Request<Body>,
) -> wlweb::Result<Response> {
    wl_view(evaluator.as_ref(), Expr::raw(API_FUNCTION), request).await
}

async fn form_view(
    State(evaluator): State<Arc<dyn Evaluator>>,
    request: Request<Body>,
) -> wlweb::Result<Response> {
    wl_view(evaluator.as_ref(), Expr::raw(FORM_FUNCTION), request).await
}

/// Bind the adapter routes on a free local port
async fn spawn_server() -> (SocketAddr, Arc<ScriptedEvaluator>) {
    let evaluator = ScriptedEvaluator::new(kernel);
    let state: Arc<dyn Evaluator> = evaluator.clone();

    let app = Router::new()
        .route("/", get(|| async { "Hello from axum" }))
        .route("/api", any(api_view))
        .route("/form", any(form_view))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, evaluator)
}

// =============================================================================
// APIFunction tests
// =============================================================================

/// Plain routes are untouched by the adapter
#[tokio::test]
async fn test_plain_route() {
    let (addr, evaluator) = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Hello from axum");
    assert_eq!(evaluator.call_count(), 0);
}

/// Missing parameters are reported by the kernel as a JSON failure
#[tokio::test]
async fn test_api_function_missing_parameter() {
    let (addr, _evaluator) = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/api")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["Success"], false);
    assert!(body["Failure"].is_string());
}

/// The interpreted query parameter comes back as a JSON object
#[tokio::test]
async fn test_api_function_echo() {
    let (addr, evaluator) = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/api?x=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "x": "a" }));

    let request = &evaluator.requests()[0];
    assert_eq!(request.lookup("Method").and_then(Expr::as_str), Some("GET"));
    assert_eq!(request.lookup("PathString").and_then(Expr::as_str), Some("/api"));
    assert_eq!(
        request.lookup("Domain").and_then(Expr::as_str),
        Some("127.0.0.1")
    );
    assert_eq!(request.lookup("Port"), Some(&Expr::from(addr.port())));
}

// =============================================================================
// FormFunction tests
// =============================================================================

/// Successful submissions answer `{"x": expected}` as JSON
async fn assert_json_field(response: reqwest::Response, expected: &str) {
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "x": expected }));
}

/// GET renders the form
#[tokio::test]
async fn test_form_function_get() {
    let (addr, _evaluator) = spawn_server().await;

    let response = reqwest::get(format!("http://{addr}/form")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(response.text().await.unwrap(), FORM_HTML);
}

/// A urlencoded submission reaches the kernel as an in-memory field
#[tokio::test]
async fn test_form_function_urlencoded() {
    let (addr, evaluator) = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/form"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("x=foobar")
        .send()
        .await
        .unwrap();
    assert_json_field(response, "foobar").await;

    let request = &evaluator.requests()[0];
    let x = request
        .lookup("MultipartElements")
        .and_then(|elements| elements.lookup("x"))
        .unwrap();
    assert_eq!(x.lookup("ContentString").and_then(Expr::as_str), Some("foobar"));
    assert!(request.lookup("BodyByteArray").is_none());
}

/// A multipart text field is decoded like a urlencoded one
#[tokio::test]
async fn test_form_function_multipart_field() {
    let (addr, _evaluator) = spawn_server().await;

    let form = Form::new().text("x", "foo bar");
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/form"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_json_field(response, "foo bar").await;
}

/// Uploaded files are handed to the kernel by file name
#[tokio::test]
async fn test_form_function_file_upload() {
    let (addr, evaluator) = spawn_server().await;

    let part = Part::bytes(b"foobar".to_vec())
        .file_name("pixeltez.txt")
        .mime_str("text/plain")
        .unwrap();
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/form"))
        .multipart(Form::new().part("x", part))
        .send()
        .await
        .unwrap();
    assert_json_field(response, "foobar").await;

    let request = &evaluator.requests()[0];
    let x = request
        .lookup("MultipartElements")
        .and_then(|elements| elements.lookup("x"))
        .unwrap();
    assert_eq!(
        x.lookup("OriginalFileName").and_then(Expr::as_str),
        Some("pixeltez.txt")
    );
    assert_eq!(x.lookup("ContentType").and_then(Expr::as_str), Some("text/plain"));
    assert_eq!(x.lookup("InMemory"), Some(&Expr::symbol("False")));

    // The spooled upload is removed once the response is sent
    let spooled = x.lookup("FileName").and_then(Expr::as_str).unwrap();
    assert!(!std::path::Path::new(spooled).exists());
}
