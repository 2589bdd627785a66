// src/repository/mod.rs
pub mod department_repository;
pub mod scope;
