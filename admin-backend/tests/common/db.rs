//! In-memory SQLite test database with the workspace migrations applied.

use admin_backend::config::AppConfig;
use admin_backend::db::create_db_pool;
use sea_orm::DatabaseConnection;

pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    pub async fn new() -> Self {
        super::init_test_env();

        // インメモリDBは接続ごとに別物なので、テスト設定ではプールを1接続に固定している
        let config = AppConfig::for_testing();
        let connection = create_db_pool(&config.database)
            .await
            .expect("Failed to create test database");

        Self { connection }
    }
}
