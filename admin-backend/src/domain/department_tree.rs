// admin-backend/src/domain/department_tree.rs

use super::department_model::{self, ROOT_PARENT_ID};
use super::department_status::DepartmentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// 部門ツリーのノード（クエリごとに組み立て、永続化しない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentTree {
    pub id: i64,
    pub tenant_id: i64,
    pub name: String,
    pub parent_id: i64,
    pub status: DepartmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub children: Vec<DepartmentTree>,
}

impl From<department_model::Model> for DepartmentTree {
    fn from(model: department_model::Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            parent_id: model.parent_id,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
            children: Vec::new(),
        }
    }
}

impl DepartmentTree {
    /// 自身を含むサブツリーのノード数
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// 親が結果セットに存在しない部門（孤児）の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// ツリーから除外する
    #[default]
    Drop,
    /// ルートとして扱う
    AttachToRoot,
    /// エラーにする
    Error,
}

impl OrphanPolicy {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Some(Self::Drop),
            "attach_to_root" | "attach-to-root" | "root" => Some(Self::AttachToRoot),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("Department {id} references missing parent {parent_id}")]
    OrphanedDepartment { id: i64, parent_id: i64 },
}

/// フラットな部門一覧から階層を組み立てる
///
/// 1パス目で ID → 配列インデックスの対応表を作り、2パス目で入力順に親子を連結する。
/// 子の並びは入力順のまま。ノードは連結後にまとめて所有権ごと組み立てるので、
/// どのノードも自分のサブツリーを完全に持つ。
///
/// 循環している部門はどのルートからも辿れないため結果に現れない。
pub fn build_department_tree(
    departments: Vec<department_model::Model>,
    orphan_policy: OrphanPolicy,
) -> Result<Vec<DepartmentTree>, HierarchyError> {
    let index: HashMap<i64, usize> = departments
        .iter()
        .enumerate()
        .map(|(i, dept)| (dept.id, i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); departments.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (i, dept) in departments.iter().enumerate() {
        if dept.parent_id == ROOT_PARENT_ID {
            roots.push(i);
            continue;
        }

        match index.get(&dept.parent_id) {
            Some(&parent) => children[parent].push(i),
            None => match orphan_policy {
                OrphanPolicy::Drop => {
                    debug!(
                        department_id = dept.id,
                        parent_id = dept.parent_id,
                        "Dropping orphaned department from tree"
                    );
                }
                OrphanPolicy::AttachToRoot => roots.push(i),
                OrphanPolicy::Error => {
                    return Err(HierarchyError::OrphanedDepartment {
                        id: dept.id,
                        parent_id: dept.parent_id,
                    });
                }
            },
        }
    }

    let mut nodes: Vec<Option<DepartmentTree>> = departments
        .into_iter()
        .map(|dept| Some(DepartmentTree::from(dept)))
        .collect();

    Ok(roots
        .into_iter()
        .filter_map(|root| assemble(root, &mut nodes, &children))
        .collect())
}

enum Visit {
    Enter(usize),
    Close(usize),
}

// 明示的なスタックで帰りがけ順に組み立てる。深い階層でもコールスタックを消費しない。
// 各スロットは一度だけ取り出されるので、入力が壊れていても必ず停止する
fn assemble(
    root: usize,
    nodes: &mut [Option<DepartmentTree>],
    children: &[Vec<usize>],
) -> Option<DepartmentTree> {
    let mut done: HashMap<usize, DepartmentTree> = HashMap::new();
    let mut stack = vec![Visit::Enter(root)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(at) => {
                if nodes[at].is_none() {
                    continue;
                }
                stack.push(Visit::Close(at));
                stack.extend(children[at].iter().rev().map(|&child| Visit::Enter(child)));
            }
            Visit::Close(at) => {
                let Some(mut node) = nodes[at].take() else {
                    continue;
                };
                node.children = children[at]
                    .iter()
                    .filter_map(|child| done.remove(child))
                    .collect();
                done.insert(at, node);
            }
        }
    }

    done.remove(&root)
}
