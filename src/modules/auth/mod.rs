//! Registration, login and token introspection for students and admins.

pub mod controller;
pub mod router;
pub mod service;
