// src/middleware/mod.rs
pub mod cors;
pub mod error_alert;
pub mod slow_log;
