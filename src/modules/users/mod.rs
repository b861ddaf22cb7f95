//! Student self-service: dashboard, password change and account removal.

pub mod controller;
pub mod router;
pub mod service;
