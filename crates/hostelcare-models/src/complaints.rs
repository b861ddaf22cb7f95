//! Complaint entities, enums and DTOs.
//!
//! [`ComplaintRow`] mirrors the `complaints` table column for column.
//! [`Complaint`] is the API shape: resolution and rating columns are folded
//! into optional nested records, and it is what the lifecycle functions in
//! [`crate::lifecycle`] operate on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::Json;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use hostelcare_core::{PaginationMeta, PaginationParams};

use crate::ids::{AdminId, ComplaintId, StudentId};
use crate::ticket::TicketId;

pub const MAX_IMAGES: usize = 5;

// ============================================================================
// Enums
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "complaint_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in-progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Rejected => "rejected",
        }
    }

    /// No status update may leave a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Resolved | ComplaintStatus::Rejected)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "complaint_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComplaintCategory {
    Electrical,
    Plumbing,
    Carpentry,
    Internet,
    Sanitation,
    Other,
}

impl ComplaintCategory {
    pub const ALL: [ComplaintCategory; 6] = [
        ComplaintCategory::Electrical,
        ComplaintCategory::Plumbing,
        ComplaintCategory::Carpentry,
        ComplaintCategory::Internet,
        ComplaintCategory::Sanitation,
        ComplaintCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintCategory::Electrical => "electrical",
            ComplaintCategory::Plumbing => "plumbing",
            ComplaintCategory::Carpentry => "carpentry",
            ComplaintCategory::Internet => "internet",
            ComplaintCategory::Sanitation => "sanitation",
            ComplaintCategory::Other => "other",
        }
    }
}

impl fmt::Display for ComplaintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "complaint_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "complaint_urgency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComplaintUrgency {
    Minor,
    #[default]
    Moderate,
    Critical,
}

// ============================================================================
// Nested records
// ============================================================================

/// Metadata of an image produced by the external upload service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ComplaintImage {
    #[validate(length(min = 1, max = 2048, message = "Image url is required"))]
    pub url: String,
    pub filename: String,
    pub originalname: String,
    pub mimetype: String,
    #[validate(range(min = 0, message = "Image size cannot be negative"))]
    pub size: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDetails {
    pub resolved_by: AdminId,
    pub resolved_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub solution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// 1-5
    pub score: i16,
    pub feedback: Option<String>,
    pub rated_at: DateTime<Utc>,
}

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: ComplaintId,
    pub ticket_id: TicketId,
    /// Owning student
    pub student: StudentId,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: ComplaintPriority,
    pub urgency: ComplaintUrgency,
    pub status: ComplaintStatus,
    pub images: Vec<ComplaintImage>,
    pub assigned_to: Option<AdminId>,
    pub resolution_details: Option<ResolutionDetails>,
    pub rating: Option<Rating>,
    /// Incremented by every mutation; send it back as `expectedVersion`
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ComplaintRow {
    pub id: ComplaintId,
    pub ticket_id: TicketId,
    pub student_id: StudentId,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: ComplaintPriority,
    pub urgency: ComplaintUrgency,
    pub status: ComplaintStatus,
    pub images: Json<Vec<ComplaintImage>>,
    pub assigned_to: Option<AdminId>,
    pub resolved_by: Option<AdminId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub resolution_solution: Option<String>,
    pub rating_score: Option<i16>,
    pub rating_feedback: Option<String>,
    pub rated_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintRow {
    pub const COLUMNS: &'static str = "id, ticket_id, student_id, category, title, description, \
                                       location, priority, urgency, status, images, assigned_to, \
                                       resolved_by, resolved_at, resolution_notes, \
                                       resolution_solution, rating_score, rating_feedback, \
                                       rated_at, version, created_at, updated_at";
}

impl From<ComplaintRow> for Complaint {
    fn from(row: ComplaintRow) -> Self {
        let resolution_details = match (row.resolved_by, row.resolved_at) {
            (Some(resolved_by), Some(resolved_at)) => Some(ResolutionDetails {
                resolved_by,
                resolved_at,
                notes: row.resolution_notes,
                solution: row.resolution_solution,
            }),
            _ => None,
        };

        let rating = match (row.rating_score, row.rated_at) {
            (Some(score), Some(rated_at)) => Some(Rating {
                score,
                feedback: row.rating_feedback,
                rated_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            ticket_id: row.ticket_id,
            student: row.student_id,
            category: row.category,
            title: row.title,
            description: row.description,
            location: row.location,
            priority: row.priority,
            urgency: row.urgency,
            status: row.status,
            images: row.images.0,
            assigned_to: row.assigned_to,
            resolution_details,
            rating,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The reduced view exposed without authentication.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicComplaint {
    pub title: String,
    pub category: ComplaintCategory,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
}

/// A dashboard row: the complaint headline and who filed it.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentComplaint {
    pub id: ComplaintId,
    pub ticket_id: TicketId,
    pub title: String,
    pub status: ComplaintStatus,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
    /// The filer's matriculation number
    pub student_number: String,
}

// ============================================================================
// DTOs
// ============================================================================

/// Length limits apply to the text that will be stored.
fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn valid_images(images: &[ComplaintImage]) -> Result<(), ValidationError> {
    if images.len() > MAX_IMAGES {
        let mut err = ValidationError::new("too_many_images");
        err.message = Some(format!("At most {MAX_IMAGES} images can be attached").into());
        return Err(err);
    }
    if images.iter().any(|image| image.validate().is_err()) {
        let mut err = ValidationError::new("invalid_image");
        err.message = Some("Image metadata is invalid".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComplaintDto {
    pub category: ComplaintCategory,
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "non_blank", message = "Title is required")
    )]
    #[serde(deserialize_with = "trim_string")]
    pub title: String,
    #[validate(
        length(min = 1, max = 1000, message = "Description must be 1-1000 characters"),
        custom(function = "non_blank", message = "Description is required")
    )]
    #[serde(deserialize_with = "trim_string")]
    pub description: String,
    #[validate(
        length(min = 1, max = 255, message = "Location must be 1-255 characters"),
        custom(function = "non_blank", message = "Location is required")
    )]
    #[serde(deserialize_with = "trim_string")]
    pub location: String,
    pub priority: Option<ComplaintPriority>,
    pub urgency: Option<ComplaintUrgency>,
    #[validate(custom(function = "valid_images"))]
    pub images: Option<Vec<ComplaintImage>>,
}

/// A validated creation request with text fields trimmed and defaults applied.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub student: StudentId,
    pub category: ComplaintCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub priority: ComplaintPriority,
    pub urgency: ComplaintUrgency,
    pub images: Vec<ComplaintImage>,
}

impl NewComplaint {
    pub fn from_dto(student: StudentId, dto: CreateComplaintDto) -> Self {
        Self {
            student,
            category: dto.category,
            title: dto.title.trim().to_string(),
            description: dto.description.trim().to_string(),
            location: dto.location.trim().to_string(),
            priority: dto.priority.unwrap_or_default(),
            urgency: dto.urgency.unwrap_or_default(),
            images: dto.images.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusDto {
    pub status: ComplaintStatus,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    #[validate(length(max = 1000, message = "Solution must be at most 1000 characters"))]
    pub solution: Option<String>,
    /// Rejects the update with 409 if the complaint has moved on
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateComplaintDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 500, message = "Feedback must be at most 500 characters"))]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignComplaintDto {
    /// Primary key of the admin receiving the complaint
    pub admin_id: AdminId,
    pub expected_version: Option<i64>,
}

// ============================================================================
// Query parameters and responses
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssignedFilter {
    /// Assigned to the requesting admin
    Me,
    Unassigned,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintFilterParams {
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
    pub assigned: Option<AssignedFilter>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyComplaintsParams {
    pub status: Option<ComplaintStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedComplaintsResponse {
    pub data: Vec<Complaint>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: ComplaintCategory,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
    /// Share of complaints that are resolved, in percent with one decimal
    pub resolution_rate: f64,
    pub resolved_last_7_days: i64,
    /// Mean days from creation to resolution, one decimal; absent with no resolutions
    pub avg_resolution_days: Option<f64>,
    pub by_category: Vec<CategoryCount>,
}

/// Headline figures for the public landing page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomeStats {
    pub total: i64,
    pub resolved: i64,
    pub pending: i64,
    pub in_progress: i64,
    /// Whole percent
    pub resolution_rate: i64,
    /// Mean days from creation to resolution, one decimal; 0 with no resolutions
    pub avg_days_to_resolve: f64,
}

/// Rounds to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
