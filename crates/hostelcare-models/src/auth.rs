//! Login and registration request/response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::admins::Admin;
use crate::students::Student;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentLoginRequest {
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "Admin ID is required"))]
    pub admin_id: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentAuthResponse {
    pub token: String,
    pub student: Student,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminAuthResponse {
    pub token: String,
    pub admin: Admin,
}

/// The account behind a token, serialized as `{"userType": ..., "user": ...}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "userType", content = "user", rename_all = "lowercase")]
pub enum CurrentUser {
    Student(Student),
    Admin(Admin),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
