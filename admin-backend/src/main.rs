// src/main.rs
use admin_backend::api::{build_router, AppState};
use admin_backend::config::AppConfig;
use admin_backend::db::create_db_pool;
use admin_backend::service::department_service::DepartmentService;
use admin_backend::utils::webhook::WebhookNotifier;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "admin_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Admin Backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        webhook_enabled = app_config.webhook.is_enabled(),
        scope_policy = ?app_config.department_scope,
        "Configuration loaded"
    );

    let db_pool = create_db_pool(&app_config.database).await?;
    tracing::info!("Database pool created successfully.");

    let notifier = WebhookNotifier::new(app_config.webhook.clone())?;
    let department_service = Arc::new(DepartmentService::new(
        db_pool.clone(),
        app_config.department_scope,
    ));

    let server_addr = app_config.server_addr();
    let app_state = AppState {
        department_service,
        notifier,
        config: Arc::new(app_config),
    };

    // ルーターの設定
    let app_router = build_router(app_state);

    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
