//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: bearer token extraction, role and permission extractors
//! - [`role`]: route-group layers that reject the wrong account type
//! - [`rate_limit`]: per-client-IP token buckets
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the JWT and exposes its claims
//! 3. `RequireStudent`, `RequireAdmin` or a permission extractor such as
//!    `RequireComplaintsManage` checks role and flags, then that the
//!    account still exists
//! 4. The handler runs with the typed account id
//!
//! ```ignore
//! use crate::middleware::auth::RequireComplaintsManage;
//!
//! async fn update_status(
//!     RequireComplaintsManage(_auth_user, admin_id): RequireComplaintsManage,
//! ) -> impl IntoResponse {
//!     // only admins holding "complaints:manage"
//! }
//! ```

pub mod auth;
pub mod rate_limit;
pub mod role;
