// tests/common/app_helper.rs

use admin_backend::{
    api::{build_router, AppState},
    config::AppConfig,
    repository::department_repository::DepartmentScopePolicy,
    service::department_service::DepartmentService,
    utils::webhook::WebhookNotifier,
};
use axum::Router;
use std::sync::Arc;

use crate::common;

/// 既定（従来どおり）のスコープ方針でアプリを組み立てる
pub async fn setup_app() -> (Router, common::db::TestDatabase) {
    setup_app_with_policy(DepartmentScopePolicy::default()).await
}

pub async fn setup_app_with_policy(
    policy: DepartmentScopePolicy,
) -> (Router, common::db::TestDatabase) {
    let db = common::db::TestDatabase::new().await;

    let mut config = AppConfig::for_testing();
    config.department_scope = policy;

    let app_state = AppState {
        department_service: Arc::new(DepartmentService::new(db.connection.clone(), policy)),
        notifier: WebhookNotifier::disabled(),
        config: Arc::new(config),
    };

    (build_router(app_state), db)
}
