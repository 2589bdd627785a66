// admin-backend/src/api/mod.rs
use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::{
    cors::cors_layer, error_alert::error_alert_middleware, slow_log::slow_request_middleware,
};
use crate::service::department_service::DepartmentService;
use crate::utils::webhook::WebhookNotifier;
use axum::{middleware, Router};
use std::sync::Arc;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub department_service: Arc<DepartmentService>,
    pub notifier: WebhookNotifier,
    pub config: Arc<AppConfig>,
}

/// ルーターとミドルウェアを組み立てる
pub fn build_router(app_state: AppState) -> Router {
    let config = app_state.config.clone();
    let notifier = app_state.notifier.clone();

    Router::new()
        .merge(handlers::department_handler::department_router(app_state))
        .merge(handlers::health_handler::health_router())
        .layer(middleware::from_fn_with_state(
            notifier,
            error_alert_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            config.slow_request_threshold,
            slow_request_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
        .layer(cors_layer(&config.cors_allowed_origins))
}
