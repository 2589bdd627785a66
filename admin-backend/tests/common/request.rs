// tests/common/request.rs
use admin_backend::extractors::TENANT_HEADER;
use axum::{
    body::{self, Body},
    http::{header, Method, Request, Response},
};
use serde::Serialize;
use serde_json::Value;

/// テナント付きのHTTPリクエストを作成
pub fn create_request<T: Serialize>(
    method: &str,
    uri: &str,
    tenant_id: Option<i64>,
    body: Option<&T>,
) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant_id) = tenant_id {
        builder = builder.header(TENANT_HEADER, tenant_id.to_string());
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str, tenant_id: Option<i64>) -> Request<Body> {
    create_request::<Value>("GET", uri, tenant_id, None)
}

pub fn delete(uri: &str, tenant_id: Option<i64>) -> Request<Body> {
    create_request::<Value>("DELETE", uri, tenant_id, None)
}

/// レスポンスボディをJSONとして読む
pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
