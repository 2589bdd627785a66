// src/error.rs

use crate::domain::department_tree::HierarchyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::DbErr(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Conflict(_) => "conflict",
            AppError::Hierarchy(_) => "hierarchy_error",
            AppError::InternalServerError(_) => "internal_server_error",
        }
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_type = self.error_type().to_string();

        let (status, message, details) = match self {
            AppError::DbErr(db_err) => {
                tracing::error!(error = ?db_err, "Database error"); // サーバーログには詳細を出す

                let status = match db_err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                // クライアントには内部情報を出さない
                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found".to_string(),
                        Some(json!({ "entity": entity })),
                    ),
                    DbErr::Exec(_) => (
                        "A database operation failed".to_string(),
                        Some(json!({ "operation": "exec", "hint": "Check database connection" })),
                    ),
                    DbErr::Query(_) => (
                        "A database query failed".to_string(),
                        Some(json!({ "operation": "query", "hint": "Check query syntax" })),
                    ),
                    _ => ("A database error occurred".to_string(), None),
                };

                (status, message, details)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            AppError::Hierarchy(err) => {
                let details = match &err {
                    HierarchyError::OrphanedDepartment { id, parent_id } => {
                        Some(json!({ "department_id": id, "parent_id": parent_id }))
                    }
                };
                (StatusCode::CONFLICT, err.to_string(), details)
            }
            AppError::InternalServerError(message) => {
                tracing::error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let error_response = ErrorResponse {
            success: false,
            error: message.clone(),
            message,
            details,
            error_type,
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub error_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (
                AppError::NotFound("missing".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Unauthorized("no tenant".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Conflict("has children".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Hierarchy(HierarchyError::OrphanedDepartment {
                    id: 4,
                    parent_id: 99,
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::DbErr(DbErr::Custom("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::DbErr(DbErr::RecordNotFound("departments".to_string())),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_error_type_names() {
        assert_eq!(
            AppError::BadRequest("x".to_string()).error_type(),
            "bad_request"
        );
        assert_eq!(
            AppError::DbErr(DbErr::Custom("x".to_string())).error_type(),
            "database_error"
        );
    }
}
