//! Access token creation and verification (HS256).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use hostelcare_config::JwtConfig;
use hostelcare_core::AppError;

use crate::claims::{Claims, Role};

/// Creates an access token for a student or admin account.
///
/// `permissions` should be empty for students; for admins it is built from
/// the account flags with `hostelcare_core::permissions::from_admin_flags`.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    account_id: Uuid,
    email: &str,
    role: Role,
    permissions: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: account_id.to_string(),
        email: email.to_string(),
        role,
        permissions,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {e}")))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// # Errors
///
/// Returns 401 for a bad signature, an expired token or a malformed one.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
