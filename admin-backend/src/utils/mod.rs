// admin-backend/src/utils/mod.rs

pub mod webhook;
