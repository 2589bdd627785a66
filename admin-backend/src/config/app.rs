use crate::domain::department_tree::OrphanPolicy;
use crate::repository::department_repository::DepartmentScopePolicy;
use crate::repository::scope::ScopeOptions;
use crate::utils::webhook::WebhookConfig;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    /// 起動時にマイグレーションを実行するか
    pub auto_migrate: bool,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database: DatabaseConfig,
    /// これより遅いリクエストを WARN で記録する
    pub slow_request_threshold: Duration,
    pub webhook: WebhookConfig,
    pub department_scope: DepartmentScopePolicy,
}

fn env_bool(key: &str, default: bool) -> Result<bool, String> {
    match env::var(key) {
        Ok(value) => parse_bool(&value).ok_or_else(|| format!("Invalid {} value", key)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("Invalid {} value", key)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl DepartmentScopePolicy {
    /// 環境変数からスコープ方針を読み込む。未設定の項目は従来の挙動
    pub fn from_env() -> Result<Self, String> {
        let defaults = ScopeOptions::unscoped();

        let orphan_policy = match env::var("DEPT_TREE_ORPHAN_POLICY") {
            Ok(value) => OrphanPolicy::from_str(&value)
                .ok_or_else(|| "Invalid DEPT_TREE_ORPHAN_POLICY value".to_string())?,
            Err(_) => OrphanPolicy::default(),
        };

        Ok(Self {
            children: ScopeOptions {
                enforce_tenant_scope: env_bool(
                    "DEPT_CHILDREN_ENFORCE_TENANT",
                    defaults.enforce_tenant_scope,
                )?,
                include_deleted: env_bool(
                    "DEPT_CHILDREN_INCLUDE_DELETED",
                    defaults.include_deleted,
                )?,
            },
            tree: ScopeOptions {
                enforce_tenant_scope: env_bool(
                    "DEPT_TREE_ENFORCE_TENANT",
                    defaults.enforce_tenant_scope,
                )?,
                include_deleted: env_bool("DEPT_TREE_INCLUDE_DELETED", defaults.include_deleted)?,
            },
            orphan_policy,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 5000)?,
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            ),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
                max_connections: env_parse("DB_MAX_CONNECTIONS", 20)?,
                min_connections: env_parse("DB_MIN_CONNECTIONS", 2)?,
                connect_timeout: Duration::from_secs(env_parse("DB_CONNECT_TIMEOUT_SECS", 8)?),
                auto_migrate: env_bool("DB_AUTO_MIGRATE", false)?,
            },
            slow_request_threshold: Duration::from_millis(env_parse(
                "SLOW_REQUEST_THRESHOLD_MS",
                3000,
            )?),
            webhook: WebhookConfig::from_env().map_err(|e| e.to_string())?,
            department_scope: DepartmentScopePolicy::from_env()?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["http://localhost:3001".to_string()],
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                connect_timeout: Duration::from_secs(5),
                auto_migrate: true,
            },
            slow_request_threshold: Duration::from_secs(3),
            webhook: WebhookConfig::default(),
            department_scope: DepartmentScopePolicy::default(),
        }
    }
}
