// admin-backend/src/domain/department_model.rs

use super::department_status::DepartmentStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ルート部門を表す親ID
pub const ROOT_PARENT_ID: i64 = 0;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    #[sea_orm(column_name = "dept_name")]
    pub name: String,
    /// 親部門ID (0 はルート部門)
    pub parent_id: i64,
    pub status: DepartmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// 自己参照の親子関係はクエリ時に組み立てる
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// 新規部門の入力値。テナントはコンテキストから補完する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
    pub parent_id: i64,
    pub status: DepartmentStatus,
}

impl NewDepartment {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: ROOT_PARENT_ID,
            status: DepartmentStatus::Active,
        }
    }

    pub fn child_of(name: impl Into<String>, parent_id: i64) -> Self {
        Self {
            name: name.into(),
            parent_id,
            status: DepartmentStatus::Active,
        }
    }

    pub fn with_status(mut self, status: DepartmentStatus) -> Self {
        self.status = status;
        self
    }
}

/// 部分更新のフィールドマスク。`None` のフィールドは書き換えない
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentChanges {
    pub name: Option<String>,
    pub status: Option<DepartmentStatus>,
    pub parent_id: Option<i64>,
}

impl DepartmentChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.parent_id.is_none()
    }

    /// マスクに含まれるフィールドだけを Set した ActiveModel を作る
    pub fn into_active_model(self, updated_at: DateTime<Utc>) -> ActiveModel {
        let mut active = ActiveModel {
            updated_at: sea_orm::Set(updated_at),
            ..Default::default()
        };
        if let Some(name) = self.name {
            active.name = sea_orm::Set(name);
        }
        if let Some(status) = self.status {
            active.status = sea_orm::Set(status);
        }
        if let Some(parent_id) = self.parent_id {
            active.parent_id = sea_orm::Set(parent_id);
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn test_new_department_builders() {
        let root = NewDepartment::root("Engineering");
        assert_eq!(root.parent_id, ROOT_PARENT_ID);
        assert_eq!(root.status, DepartmentStatus::Active);

        let child = NewDepartment::child_of("Platform", 3).with_status(DepartmentStatus::Inactive);
        assert_eq!(child.parent_id, 3);
        assert_eq!(child.status, DepartmentStatus::Inactive);
    }

    #[test]
    fn test_changes_only_set_masked_fields() {
        let now = Utc::now();
        let changes = DepartmentChanges {
            status: Some(DepartmentStatus::Inactive),
            ..Default::default()
        };
        assert!(!changes.is_empty());

        let active = changes.into_active_model(now);
        assert_eq!(active.status, ActiveValue::Set(DepartmentStatus::Inactive));
        assert_eq!(active.updated_at, ActiveValue::Set(now));
        assert!(matches!(active.name, ActiveValue::NotSet));
        assert!(matches!(active.parent_id, ActiveValue::NotSet));
        assert!(matches!(active.tenant_id, ActiveValue::NotSet));
        assert!(matches!(active.deleted_at, ActiveValue::NotSet));
    }

    #[test]
    fn test_empty_changes() {
        assert!(DepartmentChanges::default().is_empty());
    }
}
