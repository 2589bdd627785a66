// admin-backend/src/domain/tenant_context.rs

use crate::error::{AppError, AppResult};

/// リクエストから導出されたテナント情報
///
/// リポジトリはテナントIDを自分で組み立てず、必ずこのコンテキスト経由で受け取る。
/// テナントを持たないコンテキストはスコープ上「どの行にも一致しない」扱いになる。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: Option<i64>,
}

impl TenantContext {
    pub fn new(tenant_id: i64) -> Self {
        Self {
            tenant_id: Some(tenant_id),
        }
    }

    /// テナント不明のコンテキスト
    pub fn anonymous() -> Self {
        Self { tenant_id: None }
    }

    pub fn tenant_id(&self) -> Option<i64> {
        self.tenant_id
    }

    pub fn has_tenant(&self) -> bool {
        self.tenant_id.is_some()
    }

    pub fn require_tenant(&self) -> AppResult<i64> {
        self.tenant_id
            .ok_or_else(|| AppError::Unauthorized("Tenant context is required".to_string()))
    }
}

impl From<Option<i64>> for TenantContext {
    fn from(tenant_id: Option<i64>) -> Self {
        Self { tenant_id }
    }
}
