// admin-backend/src/repository/scope.rs

//! テナント・論理削除のスコープ条件
//!
//! どちらも `Condition` を返す合成可能なフィルタで、`Scoped::scopes` を使って
//! SELECT / UPDATE / COUNT いずれのクエリにも同じように適用できる。

use crate::domain::tenant_context::TenantContext;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};

/// テナントIDと論理削除マーカーを持つエンティティ
pub trait TenantScopedEntity: EntityTrait {
    fn tenant_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

/// 呼び出し元テナントの行だけに絞る。テナント不明なら何にも一致しない
pub fn tenant_scope<E: TenantScopedEntity>(ctx: &TenantContext) -> Condition {
    match ctx.tenant_id() {
        Some(tenant_id) => Condition::all().add(E::tenant_column().eq(tenant_id)),
        None => Condition::all().add(Expr::val(1).eq(0)),
    }
}

/// 論理削除されていない行だけに絞る
pub fn not_deleted_scope<E: TenantScopedEntity>() -> Condition {
    Condition::all().add(E::deleted_at_column().is_null())
}

/// 標準スコープ（テナント + 未削除）
pub fn default_scopes<E: TenantScopedEntity>(ctx: &TenantContext) -> Vec<Condition> {
    vec![tenant_scope::<E>(ctx), not_deleted_scope::<E>()]
}

/// 複数のスコープ条件をまとめてクエリに適用する
pub trait Scoped: QueryFilter + Sized {
    fn scopes<I>(self, scopes: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        scopes
            .into_iter()
            .fold(self, |query, scope| query.filter(scope))
    }
}

impl<Q: QueryFilter> Scoped for Q {}

/// 個別クエリのスコープ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeOptions {
    /// コンテキストのテナントで絞り込むか
    pub enforce_tenant_scope: bool,
    /// 論理削除済みの行も返すか
    pub include_deleted: bool,
}

impl ScopeOptions {
    /// 従来の挙動: テナント・削除状態どちらも絞り込まない
    pub const fn unscoped() -> Self {
        Self {
            enforce_tenant_scope: false,
            include_deleted: true,
        }
    }

    pub const fn strict() -> Self {
        Self {
            enforce_tenant_scope: true,
            include_deleted: false,
        }
    }

    pub fn conditions<E: TenantScopedEntity>(&self, ctx: &TenantContext) -> Vec<Condition> {
        let mut conditions = Vec::new();
        if self.enforce_tenant_scope {
            conditions.push(tenant_scope::<E>(ctx));
        }
        if !self.include_deleted {
            conditions.push(not_deleted_scope::<E>());
        }
        conditions
    }
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self::unscoped()
    }
}
