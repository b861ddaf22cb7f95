use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use hostelcare_auth::{Claims, Role, verify_token};
use hostelcare_core::AppError;
use hostelcare_models::{AdminId, StudentId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer token and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.permissions.iter().any(|p| p == permission)
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }

    pub fn is_student(&self) -> bool {
        self.0.role == Role::Student
    }

    /// Get the account ID as UUID
    pub fn account_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid account ID in token"))
    }

    pub fn student_id(&self) -> Result<StudentId, AppError> {
        if !self.is_student() {
            return Err(AppError::forbidden("Student access required"));
        }
        self.account_id().map(StudentId::from)
    }

    pub fn admin_id(&self) -> Result<AdminId, AppError> {
        if !self.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }
        self.account_id().map(AdminId::from)
    }

    /// Rejects tokens whose account has since been deleted.
    pub async fn ensure_account_exists(&self, db: &PgPool) -> Result<(), AppError> {
        let table = match self.role() {
            Role::Student => "students",
            Role::Admin => "admins",
        };
        let exists: bool =
            sqlx::query_scalar(&format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)"))
                .bind(self.account_id()?)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(AppError::unauthorized("Token is not valid"));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// A student token. Handlers receive the typed account id.
#[derive(Debug, Clone)]
pub struct RequireStudent(pub AuthUser, pub StudentId);

impl FromRequestParts<AppState> for RequireStudent {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let student_id = auth_user.student_id()?;
        auth_user.ensure_account_exists(&state.db).await?;
        Ok(RequireStudent(auth_user, student_id))
    }
}

/// An admin token, regardless of permission flags.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser, pub AdminId);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        let admin_id = auth_user.admin_id()?;
        auth_user.ensure_account_exists(&state.db).await?;
        Ok(RequireAdmin(auth_user, admin_id))
    }
}

/// Declares an extractor that requires an admin token carrying `$permission`.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(
            pub $crate::middleware::auth::AuthUser,
            pub hostelcare_models::AdminId,
        );

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = hostelcare_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                let admin_id = auth_user.admin_id()?;

                if !auth_user.has_permission($permission) {
                    return Err(hostelcare_core::AppError::forbidden(format!(
                        "Access denied. Missing required permission: {}",
                        $permission
                    )));
                }
                auth_user.ensure_account_exists(&state.db).await?;

                Ok($name(auth_user, admin_id))
            }
        }
    };
}

require_permission!(
    RequireComplaintsManage,
    hostelcare_core::permissions::COMPLAINTS_MANAGE
);
require_permission!(RequireUsersManage, hostelcare_core::permissions::USERS_MANAGE);
require_permission!(RequireAdminsManage, hostelcare_core::permissions::ADMINS_MANAGE);
