// admin-backend/src/api/dto/department_dto.rs

use crate::domain::department_model::{self, DepartmentChanges, NewDepartment, ROOT_PARENT_ID};
use crate::domain::department_status::DepartmentStatus;
use crate::types::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_OFFSET: u64 = i64::MAX as u64;

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

// --- Request DTOs ---

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateDepartmentDto {
    pub name: String,
    #[serde(default)]
    pub parent_id: i64,
    #[serde(default)]
    pub status: DepartmentStatus,
}

impl From<CreateDepartmentDto> for NewDepartment {
    fn from(dto: CreateDepartmentDto) -> Self {
        Self {
            name: dto.name,
            parent_id: dto.parent_id,
            status: dto.status,
        }
    }
}

/// 送られてきたフィールドだけを更新する
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateDepartmentDto {
    pub name: Option<String>,
    pub status: Option<DepartmentStatus>,
    pub parent_id: Option<i64>,
}

impl From<UpdateDepartmentDto> for DepartmentChanges {
    fn from(dto: UpdateDepartmentDto) -> Self {
        Self {
            name: dto.name,
            status: dto.status,
            parent_id: dto.parent_id,
        }
    }
}

/// 部門一覧の検索条件
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepartmentQueryDto {
    pub dept_name: Option<String>,
    pub status: Option<DepartmentStatus>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for DepartmentQueryDto {
    fn default() -> Self {
        Self {
            dept_name: None,
            status: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl DepartmentQueryDto {
    /// デフォルト値を適用してページとページサイズを取得
    pub fn get_pagination(&self) -> (u64, u64) {
        let page = self.page.max(1);
        let page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        (page, page_size)
    }

    /// オフセットを計算
    ///
    /// `page` はクエリ文字列そのままなので、DB がバインドできる `i64::MAX` で頭打ちにする。
    pub fn get_offset(&self) -> u64 {
        let (page, page_size) = self.get_pagination();
        page.saturating_sub(1)
            .saturating_mul(page_size)
            .min(MAX_OFFSET)
    }
}

// --- Response DTOs ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentResponseDto {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub parent_id: i64,
    pub status: DepartmentStatus,
    pub is_root: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<department_model::Model> for DepartmentResponseDto {
    fn from(model: department_model::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            is_root: model.parent_id == ROOT_PARENT_ID,
            name: model.name,
            parent_id: model.parent_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChildCountResponseDto {
    pub parent_id: i64,
    pub count: u64,
}
