//! # HostelCare Models
//!
//! Domain models, DTOs and the complaint lifecycle.
//!
//! - [`ids`]: typed primary keys
//! - [`value_types`]: validated email and phone number
//! - [`ticket`]: human-facing ticket identifiers
//! - [`complaints`]: complaint entity, enums, DTOs and statistics
//! - [`lifecycle`]: the status state machine, rating and assignment rules
//! - [`students`], [`admins`]: accounts
//! - [`auth`]: login and registration payloads

pub mod admins;
pub mod auth;
pub mod complaints;
pub mod ids;
pub mod lifecycle;
pub mod students;
pub mod ticket;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use admins::{Admin, AdminDashboard, CreateAdminDto, UpdateAdminPermissionsDto};
pub use auth::{
    AdminAuthResponse, AdminLoginRequest, CurrentUser, MessageResponse, StudentAuthResponse,
    StudentLoginRequest,
};
pub use complaints::{
    AssignComplaintDto, AssignedFilter, CategoryCount, Complaint, ComplaintCategory,
    ComplaintFilterParams, ComplaintImage, ComplaintPriority, ComplaintRow, ComplaintStats,
    ComplaintStatus, ComplaintUrgency, CreateComplaintDto, HomeStats, MyComplaintsParams,
    NewComplaint, PaginatedComplaintsResponse, PublicComplaint, RateComplaintDto, Rating,
    RecentComplaint, ResolutionDetails, UpdateStatusDto,
};
pub use ids::{AdminId, ComplaintId, StudentId};
pub use lifecycle::{LifecycleError, Transition};
pub use students::{
    ChangePasswordDto, DeleteAccountDto, PaginatedStudentsResponse, RegisterStudentDto, Student,
    StudentComplaintSummary, StudentDetailsResponse, StudentQueryParams, StudentSummary,
};
pub use ticket::TicketId;
pub use value_types::{Email, PhoneNumber, ValueTypeError};
