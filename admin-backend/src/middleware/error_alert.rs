// admin-backend/src/middleware/error_alert.rs

use crate::logging::RequestContext;
use crate::utils::webhook::{MessageKind, WebhookNotifier};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

/// 5xx 応答をエラー通知用 Webhook に流す
pub async fn error_alert_middleware(
    State(notifier): State<WebhookNotifier>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let context = req.extensions().get::<RequestContext>().cloned();

    let response = next.run(req).await;

    if response.status().is_server_error() {
        let request_id = context
            .as_ref()
            .map_or("-", |context| context.request_id.as_str());
        let tenant = context
            .as_ref()
            .and_then(|context| context.tenant_id)
            .map_or_else(|| "-".to_string(), |id| id.to_string());

        notifier.notify(
            format_alert(&method, &path, response.status().as_u16(), request_id, &tenant),
            MessageKind::Markdown,
        );
    }

    response
}

pub fn format_alert(method: &str, path: &str, status: u16, request_id: &str, tenant: &str) -> String {
    format!(
        "### Server error\n> request: {} {}\n> status: {}\n> request_id: {}\n> tenant: {}",
        method, path, status, request_id, tenant
    )
}
