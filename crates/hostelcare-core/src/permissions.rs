//! Permission constants for the HostelCare API.
//!
//! Admin accounts carry boolean capability flags. When a token is issued the
//! flags are flattened into `resource:action` strings, which is what the
//! permission guards compare against.
//!
//! ```ignore
//! use hostelcare_core::permissions;
//!
//! if auth_user.has_permission(permissions::COMPLAINTS_MANAGE) {
//!     // update status, assign
//! }
//! ```

/// Update complaint status and assign complaints to staff
pub const COMPLAINTS_MANAGE: &str = "complaints:manage";
/// List, inspect and delete student accounts
pub const USERS_MANAGE: &str = "users:manage";
/// Create admins, change their permissions, activate/deactivate them
pub const ADMINS_MANAGE: &str = "admins:manage";

/// Flattens admin capability flags into the permission strings put in a token.
#[must_use]
pub fn from_admin_flags(
    can_manage_complaints: bool,
    can_manage_users: bool,
    can_manage_admins: bool,
) -> Vec<String> {
    [
        (can_manage_complaints, COMPLAINTS_MANAGE),
        (can_manage_users, USERS_MANAGE),
        (can_manage_admins, ADMINS_MANAGE),
    ]
    .into_iter()
    .filter(|(granted, _)| *granted)
    .map(|(_, permission)| permission.to_string())
    .collect()
}
