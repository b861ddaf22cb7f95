//! Admin (staff) accounts and their permission flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use hostelcare_core::permissions;

use crate::complaints::RecentComplaint;
use crate::ids::AdminId;
use crate::students::{StudentSummary, valid_phone};
use crate::value_types::Email;

pub const DEFAULT_DEPARTMENT: &str = "Hostel Administration";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    /// Staff number used to log in
    pub admin_id: String,
    pub name: String,
    pub email: Email,
    pub department: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub can_manage_complaints: bool,
    pub can_manage_users: bool,
    pub can_manage_admins: bool,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub const COLUMNS: &'static str = "id, admin_id, name, email, department, phone, is_active, \
                                       can_manage_complaints, can_manage_users, can_manage_admins, \
                                       last_login, password, created_at, updated_at";

    /// Permission strings embedded in this admin's access token.
    pub fn permissions(&self) -> Vec<String> {
        permissions::from_admin_flags(
            self.can_manage_complaints,
            self.can_manage_users,
            self.can_manage_admins,
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminDto {
    #[validate(length(min = 3, max = 50, message = "Admin ID must be 3-50 characters"))]
    #[schema(example = "ADM001")]
    pub admin_id: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
    #[validate(custom(function = "valid_phone"))]
    pub phone: Option<String>,
    pub can_manage_complaints: Option<bool>,
    pub can_manage_users: Option<bool>,
    pub can_manage_admins: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_students: i64,
    pub total_complaints: i64,
    pub pending_complaints: i64,
    pub resolved_complaints: i64,
    pub recent_complaints: Vec<RecentComplaint>,
    pub recent_students: Vec<StudentSummary>,
}

/// Partial update; omitted flags keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminPermissionsDto {
    pub can_manage_complaints: Option<bool>,
    pub can_manage_users: Option<bool>,
    pub can_manage_admins: Option<bool>,
}

impl UpdateAdminPermissionsDto {
    pub fn is_empty(&self) -> bool {
        self.can_manage_complaints.is_none()
            && self.can_manage_users.is_none()
            && self.can_manage_admins.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Admin {
        let now = Utc::now();
        Admin {
            id: AdminId::new(),
            admin_id: "ADM001".to_string(),
            name: "Warden".to_string(),
            email: Email::new("warden@hostel.edu").unwrap(),
            department: DEFAULT_DEPARTMENT.to_string(),
            phone: None,
            is_active: true,
            can_manage_complaints: true,
            can_manage_users: false,
            can_manage_admins: false,
            last_login: None,
            password: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_default_admin_permissions() {
        assert_eq!(admin().permissions(), vec!["complaints:manage".to_string()]);
    }

    #[test]
    fn test_super_admin_permissions() {
        let mut admin = admin();
        admin.can_manage_users = true;
        admin.can_manage_admins = true;
        let perms = admin.permissions();
        assert!(perms.contains(&permissions::USERS_MANAGE.to_string()));
        assert!(perms.contains(&permissions::ADMINS_MANAGE.to_string()));
    }

    #[test]
    fn test_admin_json_hides_password() {
        let json = serde_json::to_value(admin()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["canManageComplaints"], true);
        assert_eq!(json["isActive"], true);
    }

    #[test]
    fn test_create_admin_dto_validation() {
        let dto: CreateAdminDto = serde_json::from_str(
            r#"{"adminId":"ADM002","name":"Ngozi","email":"ngozi@hostel.edu","password":"short"}"#,
        )
        .unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_permissions_dto_is_empty() {
        assert!(UpdateAdminPermissionsDto::default().is_empty());
        let dto: UpdateAdminPermissionsDto =
            serde_json::from_str(r#"{"canManageUsers":true}"#).unwrap();
        assert!(!dto.is_empty());
        assert_eq!(dto.can_manage_users, Some(true));
    }
}
