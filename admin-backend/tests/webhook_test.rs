// tests/webhook_test.rs

mod common;

use admin_backend::middleware::error_alert::error_alert_middleware;
use admin_backend::utils::webhook::{
    MessageKind, WebhookConfig, WebhookError, WebhookNotifier,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceExt;

type Captured = Arc<Mutex<Vec<Value>>>;

/// 受け取ったペイロードを記録するローカル Webhook サーバーを起動
async fn spawn_capture_server(status: StatusCode) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route(
            "/robot",
            post(
                move |State(captured): State<Captured>, Json(body): Json<Value>| async move {
                    captured.lock().await.push(body);
                    status
                },
            ),
        )
        .with_state(captured.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = TcpListener::bind(addr).await.unwrap();
    let actual_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .unwrap();
    });

    (format!("http://{}/robot", actual_addr), captured)
}

/// fire-and-forget の送信が届くまで待つ
async fn wait_for_payloads(captured: &Captured, expected: usize) -> Vec<Value> {
    for _ in 0..100 {
        {
            let payloads = captured.lock().await;
            if payloads.len() >= expected {
                return payloads.clone();
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    captured.lock().await.clone()
}

#[tokio::test]
async fn test_send_text_message() {
    common::init_test_env();
    let (url, captured) = spawn_capture_server(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(WebhookConfig::new(url)).unwrap();

    notifier
        .send("database unreachable", MessageKind::Text)
        .await
        .unwrap();

    let payloads = captured.lock().await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["msgtype"], "text");
    assert_eq!(payloads[0]["text"]["content"], "database unreachable");
    assert!(payloads[0].get("markdown").is_none());
}

#[tokio::test]
async fn test_send_markdown_message() {
    common::init_test_env();
    let (url, captured) = spawn_capture_server(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(WebhookConfig::new(url)).unwrap();

    notifier
        .send("### alert\n> detail", MessageKind::Markdown)
        .await
        .unwrap();

    let payloads = captured.lock().await;
    assert_eq!(payloads[0]["msgtype"], "markdown");
    assert_eq!(payloads[0]["markdown"]["content"], "### alert\n> detail");
    assert!(payloads[0].get("text").is_none());
}

#[tokio::test]
async fn test_send_reports_rejected_status() {
    common::init_test_env();
    let (url, _captured) = spawn_capture_server(StatusCode::INTERNAL_SERVER_ERROR).await;
    let notifier = WebhookNotifier::new(WebhookConfig::new(url)).unwrap();

    let result = notifier.send("boom", MessageKind::Text).await;
    assert!(matches!(result, Err(WebhookError::Rejected(500))));
}

#[tokio::test]
async fn test_notify_delivers_in_background() {
    common::init_test_env();
    let (url, captured) = spawn_capture_server(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(WebhookConfig::new(url)).unwrap();

    notifier.notify("background message", MessageKind::Text);

    let payloads = wait_for_payloads(&captured, 1).await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["text"]["content"], "background message");
}

#[tokio::test]
async fn test_notify_swallows_delivery_failures() {
    common::init_test_env();
    // 誰も待ち受けていないポート
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = WebhookConfig {
        endpoint_url: Some(format!("http://{}/robot", addr)),
        timeout: Duration::from_millis(500),
    };
    let notifier = WebhookNotifier::new(config).unwrap();

    notifier.notify("nobody listens", MessageKind::Text);
    assert!(notifier.send("nobody listens", MessageKind::Text).await.is_err());
}

#[tokio::test]
async fn test_error_alert_middleware_reports_server_errors() {
    common::init_test_env();
    let (url, captured) = spawn_capture_server(StatusCode::OK).await;
    let notifier = WebhookNotifier::new(WebhookConfig::new(url)).unwrap();

    let app = Router::new()
        .route("/ok", get(|| async { "fine" }))
        .route(
            "/fail",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "broken") }),
        )
        .layer(axum::middleware::from_fn_with_state(
            notifier,
            error_alert_middleware,
        ))
        .layer(axum::middleware::from_fn(
            admin_backend::logging::inject_request_context,
        ));

    let res = app
        .clone()
        .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(
            Request::get("/fail")
                .header("x-tenant-id", "7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let payloads = wait_for_payloads(&captured, 1).await;
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["msgtype"], "markdown");
    let content = payloads[0]["markdown"]["content"].as_str().unwrap();
    assert!(content.contains("GET /fail"));
    assert!(content.contains("status: 500"));
    assert!(content.contains("tenant: 7"));
}
