//! Student accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use hostelcare_core::{PaginationMeta, PaginationParams};

use crate::complaints::Complaint;
use crate::ids::StudentId;
use crate::value_types::{Email, PhoneNumber};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    /// Institutional matriculation number, stored upper-case
    pub student_id: String,
    pub name: String,
    pub email: Email,
    pub mobile: PhoneNumber,
    pub room_number: String,
    pub block: String,
    #[serde(skip)]
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Column list matching the `FromRow` layout.
    pub const COLUMNS: &'static str = "id, student_id, name, email, mobile, room_number, block, \
                                       password, created_at, updated_at";
}

pub(crate) fn valid_phone(value: &str) -> Result<(), ValidationError> {
    PhoneNumber::new(value).map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("phone");
        err.message = Some(e.to_string().into());
        err
    })
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentDto {
    #[validate(length(min = 3, max = 50, message = "Student ID must be 3-50 characters"))]
    #[schema(example = "CSC/2021/042")]
    pub student_id: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(custom(function = "valid_phone"))]
    pub mobile: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 20, message = "Room number is required"))]
    pub room_number: String,
    #[validate(length(min = 1, max = 20, message = "Block is required"))]
    pub block: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQueryParams {
    /// Case-insensitive match on name, student ID or email
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}

/// Status counts plus the newest complaints, for detail views and dashboards.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentComplaintSummary {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub recent: Vec<Complaint>,
}

/// Public fields of a recently registered student.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: StudentId,
    pub student_id: String,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    #[schema(example = "newSecret1")]
    pub new_password: String,
}

/// Self-service account removal, confirmed with the current password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteAccountDto {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDetailsResponse {
    pub student: Student,
    pub complaints: StudentComplaintSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_dto() -> RegisterStudentDto {
        RegisterStudentDto {
            student_id: "csc/2021/042".to_string(),
            name: "Ada Obi".to_string(),
            email: "ada@hostel.edu".to_string(),
            mobile: "+2348012345678".to_string(),
            password: "secret1".to_string(),
            room_number: "B12".to_string(),
            block: "B".to_string(),
        }
    }

    #[test]
    fn test_register_dto_valid() {
        assert!(register_dto().validate().is_ok());
    }

    #[test]
    fn test_register_dto_short_password() {
        let mut dto = register_dto();
        dto.password = "12345".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_dto_bad_mobile() {
        let mut dto = register_dto();
        dto.mobile = "call me".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("mobile"));
    }

    #[test]
    fn test_register_dto_camel_case() {
        let dto: RegisterStudentDto = serde_json::from_str(
            r#"{"studentId":"S1001","name":"Ada","email":"ada@hostel.edu","mobile":"08012345678","password":"secret1","roomNumber":"12","block":"A"}"#,
        )
        .unwrap();
        assert_eq!(dto.student_id, "S1001");
        assert_eq!(dto.room_number, "12");
    }

    #[test]
    fn test_change_password_dto_validation() {
        let dto: ChangePasswordDto =
            serde_json::from_str(r#"{"currentPassword":"secret1","newPassword":"12345"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
        assert!(!errors.field_errors().contains_key("current_password"));
    }

    #[test]
    fn test_student_never_serializes_password() {
        let now = Utc::now();
        let student = Student {
            id: StudentId::new(),
            student_id: "S1001".to_string(),
            name: "Ada".to_string(),
            email: Email::new("ada@hostel.edu").unwrap(),
            mobile: PhoneNumber::new("08012345678").unwrap(),
            room_number: "12".to_string(),
            block: "A".to_string(),
            password: "$2b$12$hash".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&student).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["studentId"], "S1001");
    }
}
