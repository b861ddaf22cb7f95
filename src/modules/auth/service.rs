use anyhow::anyhow;
use hostelcare_auth::{Role, create_access_token};
use hostelcare_config::JwtConfig;
use hostelcare_core::{AppError, hash_password, verify_password};
use hostelcare_db::unique_violation;
use hostelcare_models::{
    Admin, AdminAuthResponse, AdminLoginRequest, CurrentUser, Email, PhoneNumber,
    RegisterStudentDto, Student, StudentAuthResponse, StudentLoginRequest,
};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::{
    track_jwt_issued, track_login_failure, track_login_success, track_student_registered,
};
use crate::middleware::auth::AuthUser;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(student_id = %dto.student_id))]
    pub async fn register_student(
        db: &PgPool,
        dto: RegisterStudentDto,
        jwt_config: &JwtConfig,
    ) -> Result<StudentAuthResponse, AppError> {
        let email = Email::new(&dto.email).map_err(AppError::unprocessable)?;
        let mobile = PhoneNumber::new(&dto.mobile).map_err(AppError::unprocessable)?;
        let hashed_password = hash_password(&dto.password)?;

        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (student_id, name, email, mobile, room_number, block, password)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            Student::COLUMNS
        ))
        .bind(dto.student_id.trim().to_uppercase())
        .bind(dto.name.trim())
        .bind(&email)
        .bind(&mobile)
        .bind(dto.room_number.trim())
        .bind(dto.block.trim())
        .bind(&hashed_password)
        .fetch_one(db)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some("students_student_id_key") => {
                AppError::conflict(anyhow!("Student ID is already registered"))
            }
            Some("students_email_key") => AppError::conflict(anyhow!("Email is already registered")),
            Some("students_mobile_key") => {
                AppError::conflict(anyhow!("Mobile number is already registered"))
            }
            Some(_) => AppError::conflict(anyhow!("Student already exists")),
            None => AppError::database(e),
        })?;

        track_student_registered();
        tracing::info!(id = %student.id, "Student registered");

        let token = create_access_token(
            student.id.into(),
            student.email.as_str(),
            Role::Student,
            vec![],
            jwt_config,
        )?;
        track_jwt_issued();

        Ok(StudentAuthResponse { token, student })
    }

    #[instrument(skip(db, dto, jwt_config), fields(student_id = %dto.student_id))]
    pub async fn login_student(
        db: &PgPool,
        dto: StudentLoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<StudentAuthResponse, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE student_id = $1",
            Student::COLUMNS
        ))
        .bind(dto.student_id.trim().to_uppercase())
        .fetch_optional(db)
        .await?;

        let Some(student) = student else {
            track_login_failure("student", "unknown_account");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &student.password)? {
            track_login_failure("student", "bad_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = create_access_token(
            student.id.into(),
            student.email.as_str(),
            Role::Student,
            vec![],
            jwt_config,
        )?;
        track_jwt_issued();
        track_login_success("student");

        Ok(StudentAuthResponse { token, student })
    }

    #[instrument(skip(db, dto, jwt_config), fields(admin_id = %dto.admin_id))]
    pub async fn login_admin(
        db: &PgPool,
        dto: AdminLoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AdminAuthResponse, AppError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE admin_id = $1",
            Admin::COLUMNS
        ))
        .bind(dto.admin_id.trim().to_uppercase())
        .fetch_optional(db)
        .await?;

        let Some(admin) = admin else {
            track_login_failure("admin", "unknown_account");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &admin.password)? {
            track_login_failure("admin", "bad_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        // Checked after the password so the response does not reveal which
        // staff numbers exist.
        if !admin.is_active {
            track_login_failure("admin", "deactivated");
            return Err(AppError::unauthorized("Account is deactivated"));
        }

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins SET last_login = NOW() WHERE id = $1 RETURNING {}",
            Admin::COLUMNS
        ))
        .bind(admin.id)
        .fetch_one(db)
        .await?;

        let token = create_access_token(
            admin.id.into(),
            admin.email.as_str(),
            Role::Admin,
            admin.permissions(),
            jwt_config,
        )?;
        track_jwt_issued();
        track_login_success("admin");

        Ok(AdminAuthResponse { token, admin })
    }

    /// Loads the account a token was issued for.
    #[instrument(skip(db, auth_user))]
    pub async fn current_user(db: &PgPool, auth_user: &AuthUser) -> Result<CurrentUser, AppError> {
        let id = auth_user.account_id()?;

        let user = match auth_user.role() {
            Role::Student => sqlx::query_as::<_, Student>(&format!(
                "SELECT {} FROM students WHERE id = $1",
                Student::COLUMNS
            ))
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(CurrentUser::Student),
            Role::Admin => sqlx::query_as::<_, Admin>(&format!(
                "SELECT {} FROM admins WHERE id = $1",
                Admin::COLUMNS
            ))
            .bind(id)
            .fetch_optional(db)
            .await?
            .map(CurrentUser::Admin),
        };

        user.ok_or_else(|| AppError::unauthorized("Token is not valid"))
    }
}
