use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use website_audit::clients::ScreenshotClient;
use website_audit::config::Config;
use website_audit::utils::logging;
use website_audit::Intake;

/// Bind a mock upstream on an ephemeral port and return its base URL
async fn serve_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

/// Webhook sink: counts deliveries and forwards each body to the test
async fn serve_webhook_sink(
    calls: Arc<AtomicUsize>,
    tx: mpsc::UnboundedSender<Value>,
) -> String {
    serve_mock(Router::new().route(
        "/",
        post(move |Json(body): Json<Value>| {
            let calls = calls.clone();
            let tx = tx.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(body);
                StatusCode::OK
            }
        }),
    ))
    .await
}

fn mock_config(screenshot_base: String, vision_base: String, webhook_base: String) -> Config {
    Config {
        screenshot_api_key: "sk".to_string(),
        screenshot_api_base: screenshot_base,
        gemini_api_key: "gk".to_string(),
        gemini_api_base: vision_base,
        storage_api_key: "tk".to_string(),
        storage_public_base_url: "https://cdn.example.com".to_string(),
        webhook_url: Some(webhook_base),
        upstream_max_retries: 0,
        ..Config::default()
    }
}

#[tokio::test]
async fn successful_audit_notifies_exactly_once() {
    let webhook_calls = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

    let screenshot_base = serve_mock(Router::new().route(
        "/take",
        get(|| async { b"\x89PNG fake screenshot bytes".as_slice() }),
    ))
    .await;

    // fence-wrapped scorecard, the shape the sanitizer has to clean up
    let scorecard = json!({
        "overallScore": 1,
        "grade": "F",
        "summary": "solid foundation",
        "categories": {
            "firstImpression": { "score": 22, "findings": "clear hero" },
            "visualDesign": { "score": 20 },
            "userExperience": { "score": 21 },
            "conversion": { "score": 21 }
        },
        "recommendations": [
            { "priority": "HIGH", "issue": "no visible phone number" }
        ]
    })
    .to_string();
    let vision_base = serve_mock(Router::new().route(
        "/models/*rest",
        post(move || {
            let reply = format!("```json\n{}\n```", scorecard);
            async move {
                Json(json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": reply }] }
                    }]
                }))
            }
        }),
    ))
    .await;

    let storage_base = serve_mock(Router::new().route(
        "/audit-reports/*key",
        put(|| async { StatusCode::OK }),
    ))
    .await;

    let webhook_base = serve_webhook_sink(webhook_calls.clone(), tx).await;

    let mut config = mock_config(screenshot_base, vision_base, webhook_base);
    config.storage_api_base = storage_base;

    let intake = Intake::new(config).expect("intake construction failed");
    let ack = intake
        .accept(&json!({ "url": "example.com", "id": "c-1" }))
        .expect("intake should accept the request");
    assert!(ack.success);

    let payload = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("notification should arrive")
        .expect("webhook channel closed");

    assert_eq!(payload["success"], json!(true));
    assert!(payload["error"].is_null());
    assert_eq!(payload["contactId"], json!("c-1"));
    assert_eq!(payload["targetUrl"], json!("https://example.com"));

    let report_url = payload["reportUrl"].as_str().expect("success carries a report URL");
    assert!(report_url.starts_with("https://cdn.example.com/audits/"));

    // sanitizer recomputed the model's bogus overall score and grade
    assert_eq!(payload["auditResult"]["overallScore"], json!(84));
    assert_eq!(payload["auditResult"]["grade"], json!("B"));

    // a duplicate delivery would land within this window
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(webhook_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn forbidden_capture_notifies_failure_without_analysis() {
    let vision_calls = Arc::new(AtomicUsize::new(0));
    let webhook_calls = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = mpsc::unbounded_channel::<Value>();

    let screenshot_base = serve_mock(Router::new().route(
        "/take",
        get(|| async { (StatusCode::FORBIDDEN, "access denied") }),
    ))
    .await;

    let vision_base = {
        let calls = vision_calls.clone();
        serve_mock(Router::new().route(
            "/models/*rest",
            post(move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Json(json!({}))
                }
            }),
        ))
        .await
    };

    let webhook_base = serve_webhook_sink(webhook_calls.clone(), tx).await;

    let mut config = mock_config(screenshot_base, vision_base, webhook_base);
    // a 403 short-circuits before publish; storage is never contacted
    config.storage_api_base = "http://127.0.0.1:9".to_string();

    let intake = Intake::new(config).expect("intake construction failed");
    let ack = intake
        .accept(&json!({ "website_url": "example.com", "id": "c-2" }))
        .expect("intake should accept the request");
    assert!(ack.success);

    let payload = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("notification should arrive")
        .expect("webhook channel closed");

    assert_eq!(payload["success"], json!(false));
    assert!(payload["reportUrl"].is_null());
    assert!(payload["auditResult"].is_null());
    let error = payload["error"].as_str().expect("failure carries an error");
    assert!(error.contains("403"));

    // the pipeline stopped at capture
    assert_eq!(vision_calls.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(webhook_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_requests_never_spawn_tasks() {
    // an empty target is rejected synchronously even on a fully
    // unconfigured service; no task, no notification
    let intake = Intake::new(Config::default()).expect("intake construction failed");

    let result = intake.accept(&json!({ "url": "   " }));
    assert!(result.is_err());

    let result = intake.accept(&json!({}));
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // needs live credentials: cargo test -- --ignored
async fn test_full_audit_pipeline() {
    // initialize logging
    logging::init();

    // load configuration from the environment
    let config = Config::from_env();
    config
        .validate()
        .expect("set SCREENSHOT_API_KEY, GEMINI_API_KEY and STORAGE_* to run this test");

    let intake = Intake::new(config).expect("intake construction failed");

    let ack = intake
        .accept(&json!({
            "website_url": "https://example.com",
            "id": "integration-test",
            "email": "test@example.com",
            "name": "Integration Test",
            "businessType": "cpa firm"
        }))
        .expect("intake should accept the request");

    assert!(ack.success);
    assert_eq!(ack.target_url, "https://example.com");

    // the task is detached; give the full pipeline time to finish
    // (watch the logs for the notification attempt)
    tokio::time::sleep(std::time::Duration::from_secs(120)).await;
}

#[tokio::test]
#[ignore]
async fn test_screenshot_capture() {
    logging::init();

    let config = Config::from_env();
    assert!(
        !config.screenshot_api_key.is_empty(),
        "set SCREENSHOT_API_KEY to run this test"
    );

    let client = ScreenshotClient::new(&config).expect("client construction failed");
    let artifact = client
        .capture("https://example.com")
        .await
        .expect("capture should succeed");

    assert!(!artifact.bytes.is_empty());
    assert_eq!(artifact.media_type, "image/png");
    println!("captured {} bytes", artifact.bytes.len());
}
