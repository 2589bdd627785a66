// src/db.rs
use crate::config::DatabaseConfig;
use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_db_pool(config: &DatabaseConfig) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    // 接続オプションを設定
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.connect_timeout)
        .idle_timeout(Duration::from_secs(5 * 60))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(false);

    let pool = Database::connect(opt).await?;

    if config.auto_migrate {
        run_migrations(&pool).await?;
    }

    Ok(pool)
}

pub async fn run_migrations(conn: &DbPool) -> Result<(), DbErr> {
    tracing::info!("Applying pending migrations");
    Migrator::up(conn, None).await
}
