// admin-backend/src/service/department_service.rs

use crate::api::dto::department_dto::{
    ChildCountResponseDto, CreateDepartmentDto, DepartmentQueryDto, DepartmentResponseDto,
    UpdateDepartmentDto,
};
use crate::db::DbPool;
use crate::domain::department_tree::DepartmentTree;
use crate::domain::tenant_context::TenantContext;
use crate::error::{AppError, AppResult};
use crate::repository::department_repository::{DepartmentRepository, DepartmentScopePolicy};
use crate::types::PaginatedResponse;
use std::sync::Arc;
use tracing::{debug, info};

pub struct DepartmentService {
    repo: Arc<DepartmentRepository>,
}

impl DepartmentService {
    pub fn new(db_pool: DbPool, policy: DepartmentScopePolicy) -> Self {
        Self {
            repo: Arc::new(DepartmentRepository::with_policy(db_pool, policy)),
        }
    }

    pub fn from_repository(repo: Arc<DepartmentRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_department(
        &self,
        ctx: &TenantContext,
        payload: CreateDepartmentDto,
    ) -> AppResult<DepartmentResponseDto> {
        let created = self.repo.create(ctx, payload.into()).await?;
        info!(
            tenant_id = created.tenant_id,
            department_id = created.id,
            "Department created"
        );
        Ok(created.into())
    }

    pub async fn update_department(
        &self,
        ctx: &TenantContext,
        id: i64,
        payload: UpdateDepartmentDto,
    ) -> AppResult<DepartmentResponseDto> {
        let updated = self.repo.update(ctx, id, payload.into()).await?;
        Ok(updated.into())
    }

    /// 部門を削除。未削除の子部門が残っている間は削除できない
    ///
    /// 削除済みの部門に対しては何もせず成功を返す（リポジトリの削除と同じく冪等）。
    pub async fn delete_department(&self, ctx: &TenantContext, id: i64) -> AppResult<()> {
        let department = self
            .repo
            .find_by_id_with_deleted(ctx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Department {} not found", id)))?;

        if department.is_deleted() {
            debug!(
                tenant_id = department.tenant_id,
                department_id = id,
                "Department already deleted"
            );
            return Ok(());
        }

        let children = self.repo.count_by_parent_id(ctx, department.id).await?;
        if children > 0 {
            return Err(AppError::Conflict(format!(
                "Department {} still has {} child department(s)",
                id, children
            )));
        }

        self.repo.delete(ctx, id).await?;
        info!(
            tenant_id = department.tenant_id,
            department_id = id,
            "Department deleted"
        );
        Ok(())
    }

    pub async fn get_department(
        &self,
        ctx: &TenantContext,
        id: i64,
    ) -> AppResult<DepartmentResponseDto> {
        let department = self.repo.get_by_id(ctx, id).await?;
        Ok(department.into())
    }

    pub async fn list_departments(
        &self,
        ctx: &TenantContext,
        query: &DepartmentQueryDto,
    ) -> AppResult<PaginatedResponse<DepartmentResponseDto>> {
        let (departments, total) = self.repo.list(ctx, query).await?;
        let (page, page_size) = query.get_pagination();

        let items = departments
            .into_iter()
            .map(DepartmentResponseDto::from)
            .collect();
        Ok(PaginatedResponse::new(items, page, page_size, total))
    }

    pub async fn get_all_departments(
        &self,
        ctx: &TenantContext,
    ) -> AppResult<Vec<DepartmentResponseDto>> {
        let departments = self.repo.get_all(ctx).await?;
        Ok(departments
            .into_iter()
            .map(DepartmentResponseDto::from)
            .collect())
    }

    pub async fn get_children(
        &self,
        ctx: &TenantContext,
        parent_id: i64,
    ) -> AppResult<Vec<DepartmentResponseDto>> {
        let children = self.repo.get_children(ctx, parent_id).await?;
        Ok(children
            .into_iter()
            .map(DepartmentResponseDto::from)
            .collect())
    }

    pub async fn count_children(
        &self,
        ctx: &TenantContext,
        parent_id: i64,
    ) -> AppResult<ChildCountResponseDto> {
        let count = self.repo.count_by_parent_id(ctx, parent_id).await?;
        Ok(ChildCountResponseDto { parent_id, count })
    }

    /// 呼び出し元テナントの部門ツリー
    pub async fn get_tree(&self, ctx: &TenantContext) -> AppResult<Vec<DepartmentTree>> {
        let tenant_id = ctx.require_tenant()?;
        self.repo.get_tree(ctx, tenant_id).await
    }
}
