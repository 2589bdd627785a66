// admin-backend/src/api/handlers/department_handler.rs

use crate::{
    api::{
        dto::department_dto::{CreateDepartmentDto, DepartmentQueryDto, UpdateDepartmentDto},
        AppState,
    },
    domain::tenant_context::TenantContext,
    error::AppError,
    types::ApiResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

// 部門の作成
pub async fn create_department_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Json(payload): Json<CreateDepartmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let department = app_state
        .department_service
        .create_department(&tenant, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(department)))
}

// 部門一覧（フィルタ・ページネーション付き）
pub async fn list_departments_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Query(query): Query<DepartmentQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let page = app_state
        .department_service
        .list_departments(&tenant, &query)
        .await?;
    Ok(ApiResponse::success(page))
}

pub async fn get_all_departments_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let departments = app_state
        .department_service
        .get_all_departments(&tenant)
        .await?;
    Ok(ApiResponse::success(departments))
}

// 部門ツリー
pub async fn get_department_tree_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let tree = app_state.department_service.get_tree(&tenant).await?;
    Ok(ApiResponse::success(tree))
}

pub async fn get_department_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let department = app_state
        .department_service
        .get_department(&tenant, id)
        .await?;
    Ok(ApiResponse::success(department))
}

pub async fn update_department_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDepartmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let department = app_state
        .department_service
        .update_department(&tenant, id, payload)
        .await?;
    Ok(ApiResponse::success(department))
}

pub async fn delete_department_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .department_service
        .delete_department(&tenant, id)
        .await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}

pub async fn get_children_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let children = app_state
        .department_service
        .get_children(&tenant, id)
        .await?;
    Ok(ApiResponse::success(children))
}

pub async fn count_children_handler(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state
        .department_service
        .count_children(&tenant, id)
        .await?;
    Ok(ApiResponse::success(count))
}

pub fn department_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/departments",
            get(list_departments_handler).post(create_department_handler),
        )
        .route("/departments/all", get(get_all_departments_handler))
        .route("/departments/tree", get(get_department_tree_handler))
        .route(
            "/departments/{id}",
            get(get_department_handler)
                .put(update_department_handler)
                .delete(delete_department_handler),
        )
        .route("/departments/{id}/children", get(get_children_handler))
        .route(
            "/departments/{id}/children/count",
            get(count_children_handler),
        )
        .with_state(app_state)
}
