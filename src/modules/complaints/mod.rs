//! Complaint submission, lifecycle mutations and queries.
//!
//! - [`tickets`]: ticket id allocation strategies
//! - [`service`]: transactions around the pure lifecycle functions
//! - [`controller`]: HTTP handlers
//! - [`router`]: route table

pub mod controller;
pub mod router;
pub mod service;
pub mod tickets;
