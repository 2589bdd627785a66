// admin-backend/src/repository/department_repository.rs

use crate::api::dto::department_dto::DepartmentQueryDto;
use crate::domain::department_model::{
    self, ActiveModel as DepartmentActiveModel, DepartmentChanges, Entity as DepartmentEntity,
    NewDepartment,
};
use crate::domain::department_tree::{build_department_tree, DepartmentTree, OrphanPolicy};
use crate::domain::tenant_context::TenantContext;
use crate::error::{AppError, AppResult};
use crate::repository::scope::{default_scopes, tenant_scope, ScopeOptions, Scoped, TenantScopedEntity};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::{debug, warn};

impl TenantScopedEntity for DepartmentEntity {
    fn tenant_column() -> Self::Column {
        department_model::Column::TenantId
    }

    fn deleted_at_column() -> Self::Column {
        department_model::Column::DeletedAt
    }
}

/// 子部門取得・ツリー取得のスコープ方針
///
/// 既定値は従来の挙動（テナント・削除状態を絞り込まない）を維持している。
/// `GetChildren` は他テナントの行を返しうるので、外部公開する場合は
/// `enforce_tenant_scope` を有効にすること。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepartmentScopePolicy {
    pub children: ScopeOptions,
    pub tree: ScopeOptions,
    pub orphan_policy: OrphanPolicy,
}

impl DepartmentScopePolicy {
    pub fn strict() -> Self {
        Self {
            children: ScopeOptions::strict(),
            tree: ScopeOptions::strict(),
            orphan_policy: OrphanPolicy::Drop,
        }
    }
}

pub struct DepartmentRepository {
    db: DbConn,
    policy: DepartmentScopePolicy,
}

impl DepartmentRepository {
    pub fn new(db: DbConn) -> Self {
        Self::with_policy(db, DepartmentScopePolicy::default())
    }

    pub fn with_policy(db: DbConn, policy: DepartmentScopePolicy) -> Self {
        Self { db, policy }
    }

    pub fn policy(&self) -> &DepartmentScopePolicy {
        &self.policy
    }

    /// 部門を作成
    pub async fn create(
        &self,
        ctx: &TenantContext,
        department: NewDepartment,
    ) -> AppResult<department_model::Model> {
        let tenant_id = ctx.require_tenant()?;
        let now = Utc::now();

        let active_model = DepartmentActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(department.name),
            parent_id: Set(department.parent_id),
            status: Set(department.status),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let created = active_model.insert(&self.db).await?;
        debug!(
            tenant_id,
            department_id = created.id,
            parent_id = created.parent_id,
            "Department created"
        );
        Ok(created)
    }

    /// 部門を更新（マスクに含まれるフィールドのみ）
    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: i64,
        changes: DepartmentChanges,
    ) -> AppResult<department_model::Model> {
        let result = DepartmentEntity::update_many()
            .set(changes.into_active_model(Utc::now()))
            .filter(department_model::Column::Id.eq(id))
            .scopes(default_scopes::<DepartmentEntity>(ctx))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Department {} not found", id)));
        }

        self.get_by_id(ctx, id).await
    }

    /// 部門を論理削除
    ///
    /// 削除済みの行は未削除スコープで除外されるため、二度目の呼び出しは
    /// 0 行更新で成功し、最初の削除日時はそのまま残る。
    pub async fn delete(&self, ctx: &TenantContext, id: i64) -> AppResult<()> {
        let active_model = DepartmentActiveModel {
            deleted_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        let result = DepartmentEntity::update_many()
            .set(active_model)
            .filter(department_model::Column::Id.eq(id))
            .scopes(default_scopes::<DepartmentEntity>(ctx))
            .exec(&self.db)
            .await?;

        debug!(
            tenant_id = ?ctx.tenant_id(),
            department_id = id,
            rows_affected = result.rows_affected,
            "Department soft-deleted"
        );
        Ok(())
    }

    /// IDで部門を取得
    pub async fn get_by_id(
        &self,
        ctx: &TenantContext,
        id: i64,
    ) -> AppResult<department_model::Model> {
        DepartmentEntity::find_by_id(id)
            .scopes(default_scopes::<DepartmentEntity>(ctx))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))
    }

    /// 論理削除済みも含めてIDで取得（テナントスコープのみ）
    pub async fn find_by_id_with_deleted(
        &self,
        ctx: &TenantContext,
        id: i64,
    ) -> AppResult<Option<department_model::Model>> {
        let result = DepartmentEntity::find_by_id(id)
            .filter(tenant_scope::<DepartmentEntity>(ctx))
            .one(&self.db)
            .await?;
        Ok(result)
    }

    /// 子部門数を取得
    pub async fn count_by_parent_id(&self, ctx: &TenantContext, parent_id: i64) -> AppResult<u64> {
        let count = DepartmentEntity::find()
            .filter(department_model::Column::ParentId.eq(parent_id))
            .scopes(default_scopes::<DepartmentEntity>(ctx))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    /// 部門一覧を取得（名前の部分一致・状態で絞り込み、ページネーション付き）
    ///
    /// 総件数はページング前に同じ条件で数える。
    pub async fn list(
        &self,
        ctx: &TenantContext,
        query: &DepartmentQueryDto,
    ) -> AppResult<(Vec<department_model::Model>, u64)> {
        let mut condition = Condition::all();

        if let Some(dept_name) = query.dept_name.as_deref().filter(|name| !name.is_empty()) {
            condition = condition.add(department_model::Column::Name.contains(dept_name));
        }
        if let Some(status) = query.status {
            condition = condition.add(department_model::Column::Status.eq(status));
        }

        let select = DepartmentEntity::find()
            .scopes(default_scopes::<DepartmentEntity>(ctx))
            .filter(condition);

        let total = select.clone().count(&self.db).await?;

        let (_, page_size) = query.get_pagination();
        let departments = select
            .order_by_asc(department_model::Column::Id)
            .offset(query.get_offset())
            .limit(page_size)
            .all(&self.db)
            .await?;

        Ok((departments, total))
    }

    /// テナント内の全部門を取得
    pub async fn get_all(&self, ctx: &TenantContext) -> AppResult<Vec<department_model::Model>> {
        let departments = DepartmentEntity::find()
            .scopes(default_scopes::<DepartmentEntity>(ctx))
            .order_by_asc(department_model::Column::Id)
            .all(&self.db)
            .await?;
        Ok(departments)
    }

    /// 子部門を取得
    ///
    /// 既定ではテナント・削除状態のスコープを適用しない（従来の挙動）。
    pub async fn get_children(
        &self,
        ctx: &TenantContext,
        parent_id: i64,
    ) -> AppResult<Vec<department_model::Model>> {
        let options = self.policy.children;
        if !options.enforce_tenant_scope {
            warn!(
                parent_id,
                "Fetching child departments without tenant scope"
            );
        }

        let departments = DepartmentEntity::find()
            .filter(department_model::Column::ParentId.eq(parent_id))
            .scopes(options.conditions::<DepartmentEntity>(ctx))
            .order_by_asc(department_model::Column::Id)
            .all(&self.db)
            .await?;
        Ok(departments)
    }

    /// 指定テナントの部門ツリーを取得
    ///
    /// 既定では論理削除済みの部門もツリーに含まれる（従来の挙動）。
    pub async fn get_tree(
        &self,
        ctx: &TenantContext,
        tenant_id: i64,
    ) -> AppResult<Vec<DepartmentTree>> {
        let departments = DepartmentEntity::find()
            .filter(department_model::Column::TenantId.eq(tenant_id))
            .scopes(self.policy.tree.conditions::<DepartmentEntity>(ctx))
            .order_by_asc(department_model::Column::Id)
            .all(&self.db)
            .await?;

        debug!(
            tenant_id,
            rows = departments.len(),
            orphan_policy = ?self.policy.orphan_policy,
            "Building department tree"
        );

        let tree = build_department_tree(departments, self.policy.orphan_policy)?;
        Ok(tree)
    }
}
