// src/domain/mod.rs
pub mod department_model;
pub mod department_status;
pub mod department_tree;
pub mod tenant_context;
