// admin-backend/src/domain/department_status.rs

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 部門の状態（DB上は整数で保持）
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum DepartmentStatus {
    #[sea_orm(num_value = 0)]
    Inactive,
    #[default]
    #[sea_orm(num_value = 1)]
    Active,
}

impl DepartmentStatus {
    /// 文字列からDepartmentStatusに変換
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" | "1" => Some(Self::Active),
            "inactive" | "0" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for DepartmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            DepartmentStatus::from_str("active"),
            Some(DepartmentStatus::Active)
        );
        assert_eq!(
            DepartmentStatus::from_str("INACTIVE"),
            Some(DepartmentStatus::Inactive)
        );
        assert_eq!(DepartmentStatus::from_str("1"), Some(DepartmentStatus::Active));
        assert_eq!(DepartmentStatus::from_str("archived"), None);
    }

    #[test]
    fn test_status_db_values() {
        assert_eq!(DepartmentStatus::Active.to_value(), 1);
        assert_eq!(DepartmentStatus::Inactive.to_value(), 0);
        assert_eq!(
            DepartmentStatus::try_from_value(&1).unwrap(),
            DepartmentStatus::Active
        );
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&DepartmentStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");
        let parsed: DepartmentStatus = serde_json::from_str("\"active\"").unwrap();
        assert!(parsed.is_active());
    }
}
