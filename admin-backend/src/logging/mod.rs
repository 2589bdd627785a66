// src/logging/mod.rs

//! リクエスト単位の構造化ログ
//!
//! `inject_request_context` がリクエストID・テナントを決めて extensions に積み、
//! 以降のミドルウェアとハンドラはそれを読んでログに載せる。

use crate::domain::tenant_context::TenantContext;
use crate::extractors::tenant_from_headers;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, Level};
use uuid::Uuid;

/// 上流（ロードバランサ等）から引き継ぐリクエストIDヘッダー
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// レベルを実行時に選べる構造化ログ。キーは文字列リテラル
#[macro_export]
macro_rules! log_with_context {
    (@emit $event:ident, $msg:expr $(, $key:literal => $value:expr)*) => {
        tracing::$event!(message = $msg $(, $key = ?$value)*)
    };
    ($level:expr, $msg:expr $(, $key:literal => $value:expr)* $(,)?) => {
        match $level {
            tracing::Level::ERROR => $crate::log_with_context!(@emit error, $msg $(, $key => $value)*),
            tracing::Level::WARN => $crate::log_with_context!(@emit warn, $msg $(, $key => $value)*),
            tracing::Level::INFO => $crate::log_with_context!(@emit info, $msg $(, $key => $value)*),
            tracing::Level::DEBUG => $crate::log_with_context!(@emit debug, $msg $(, $key => $value)*),
            _ => {}
        }
    };
}

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    pub tenant_id: Option<i64>,
    pub path: String,
    pub method: String,
}

impl RequestContext {
    pub fn from_request(req: &Request<Body>) -> Self {
        Self {
            request_id: request_id_from_headers(req.headers()),
            tenant_id: tenant_from_headers(req.headers()).tenant_id(),
            path: req.uri().path().to_string(),
            method: req.method().to_string(),
        }
    }

    pub fn tenant(&self) -> TenantContext {
        self.tenant_id.into()
    }
}

// 空や長すぎる値は信用せず採番し直す
fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string)
}

/// ステータスコードに応じたログレベル
pub fn level_for_status(status: u16) -> Level {
    match status {
        500..=u16::MAX => Level::ERROR,
        400..=499 => Level::WARN,
        _ => Level::INFO,
    }
}

pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let Some(context) = req.extensions().get::<RequestContext>().cloned() else {
        return next.run(req).await;
    };

    let start = Instant::now();
    log_with_context!(
        Level::INFO,
        "Request started",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
        "tenant_id" => context.tenant_id,
    );

    let response = next.run(req).await;
    let status = response.status().as_u16();

    log_with_context!(
        level_for_status(status),
        "Request completed",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
        "status" => status,
        "duration_ms" => start.elapsed().as_millis(),
        "tenant_id" => context.tenant_id,
    );

    response
}

/// RequestContext と TenantContext を積み、処理全体をリクエストの span で包む。
/// レスポンスにはリクエストIDを返す
pub async fn inject_request_context(mut req: Request<Body>, next: Next) -> Response {
    let context = RequestContext::from_request(&req);
    let span = tracing::info_span!(
        "request",
        request_id = %context.request_id,
        tenant_id = ?context.tenant_id,
    );
    let request_id = HeaderValue::from_str(&context.request_id).ok();

    req.extensions_mut().insert(context.tenant());
    req.extensions_mut().insert(context);

    let mut response = next.run(req).instrument(span).await;
    if let Some(request_id) = request_id {
        response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_status() {
        assert_eq!(level_for_status(200), Level::INFO);
        assert_eq!(level_for_status(404), Level::WARN);
        assert_eq!(level_for_status(503), Level::ERROR);
    }

    #[test]
    fn test_request_context_from_request() {
        let req = Request::post("/departments")
            .header("x-tenant-id", "12")
            .header(REQUEST_ID_HEADER, "upstream-1")
            .body(Body::empty())
            .unwrap();

        let context = RequestContext::from_request(&req);
        assert_eq!(context.request_id, "upstream-1");
        assert_eq!(context.tenant_id, Some(12));
        assert_eq!(context.method, "POST");
        assert_eq!(context.tenant(), TenantContext::new(12));
    }

    #[test]
    fn test_request_id_generated_when_missing_or_blank() {
        let mut headers = HeaderMap::new();
        let generated = request_id_from_headers(&headers);
        assert!(Uuid::parse_str(&generated).is_ok());

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        assert!(Uuid::parse_str(&request_id_from_headers(&headers)).is_ok());
    }
}
