// admin-backend/src/extractors/tenant.rs

use crate::domain::tenant_context::TenantContext;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

/// テナントIDを運ぶリクエストヘッダー
pub const TENANT_HEADER: &str = "x-tenant-id";

/// ヘッダーからテナントを取り出す。欠落・不正値・0以下はテナントなし扱い
pub fn tenant_from_headers(headers: &HeaderMap) -> TenantContext {
    headers
        .get(TENANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|tenant_id| *tenant_id > 0)
        .into()
}

// テナントなしでも拒否はせず、スコープ側で何も返さないようにする
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(*ctx);
        }
        Ok(tenant_from_headers(&parts.headers))
    }
}
