//! Student and admin account management for staff.

pub mod controller;
pub mod router;
pub mod service;
