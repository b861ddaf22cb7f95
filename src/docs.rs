use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use hostelcare_core::{ErrorResponse, PaginationMeta, PaginationParams};
use hostelcare_models::{
    Admin, AdminAuthResponse, AdminDashboard, AdminLoginRequest, AssignComplaintDto,
    AssignedFilter, CategoryCount, ChangePasswordDto, Complaint, ComplaintCategory,
    ComplaintImage, ComplaintPriority, ComplaintStats, ComplaintStatus, ComplaintUrgency,
    CreateAdminDto, CreateComplaintDto, CurrentUser, DeleteAccountDto, HomeStats,
    MessageResponse, PaginatedComplaintsResponse, PaginatedStudentsResponse, PublicComplaint,
    RateComplaintDto, Rating, RecentComplaint, RegisterStudentDto, ResolutionDetails, Student,
    StudentAuthResponse, StudentComplaintSummary, StudentDetailsResponse, StudentLoginRequest,
    StudentSummary, UpdateAdminPermissionsDto, UpdateStatusDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_student,
        crate::modules::auth::controller::login_student,
        crate::modules::auth::controller::login_admin,
        crate::modules::auth::controller::get_current_user,
        crate::modules::users::controller::get_student_dashboard,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::delete_account,
        crate::modules::complaints::controller::create_complaint,
        crate::modules::complaints::controller::get_my_complaints,
        crate::modules::complaints::controller::get_complaints,
        crate::modules::complaints::controller::get_complaint,
        crate::modules::complaints::controller::update_status,
        crate::modules::complaints::controller::assign_complaint,
        crate::modules::complaints::controller::rate_complaint,
        crate::modules::complaints::controller::get_stats,
        crate::modules::complaints::controller::get_home_stats,
        crate::modules::complaints::controller::get_recent_public,
        crate::modules::admin::controller::get_admin_dashboard,
        crate::modules::admin::controller::get_students,
        crate::modules::admin::controller::get_student,
        crate::modules::admin::controller::delete_student,
        crate::modules::admin::controller::create_admin,
        crate::modules::admin::controller::get_admins,
        crate::modules::admin::controller::update_admin_permissions,
        crate::modules::admin::controller::toggle_admin_status,
    ),
    components(
        schemas(
            Student,
            RegisterStudentDto,
            StudentLoginRequest,
            StudentAuthResponse,
            Admin,
            AdminLoginRequest,
            AdminAuthResponse,
            CurrentUser,
            ChangePasswordDto,
            DeleteAccountDto,
            AdminDashboard,
            CreateAdminDto,
            UpdateAdminPermissionsDto,
            MessageResponse,
            ErrorResponse,
            Complaint,
            ComplaintStatus,
            ComplaintCategory,
            ComplaintPriority,
            ComplaintUrgency,
            ComplaintImage,
            ResolutionDetails,
            Rating,
            PublicComplaint,
            RecentComplaint,
            HomeStats,
            CreateComplaintDto,
            UpdateStatusDto,
            AssignComplaintDto,
            AssignedFilter,
            RateComplaintDto,
            ComplaintStats,
            CategoryCount,
            PaginatedComplaintsResponse,
            PaginatedStudentsResponse,
            StudentComplaintSummary,
            StudentDetailsResponse,
            StudentSummary,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Student registration and login for students and staff"),
        (name = "Users", description = "Student dashboard and account self-service"),
        (name = "Complaints", description = "Complaint submission, triage and feedback"),
        (name = "Admin", description = "Student and admin account management")
    ),
    info(
        title = "HostelCare API",
        version = "0.1.0",
        description = "Hostel maintenance complaint tracking: students raise tickets, staff triage and resolve them.",
        contact(
            name = "API Support",
            email = "support@hostelcare.dev"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/student/register",
            "/api/auth/admin/login",
            "/api/auth/me",
            "/api/user/password",
            "/api/user/delete",
            "/api/complaints",
            "/api/complaints/{id}/status",
            "/api/complaints/stats/overview",
            "/api/complaints/recent/public",
            "/api/complaints/stats/home/overview",
            "/api/admin/dashboard/overview",
            "/api/admin/admins/{id}/toggle-status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
