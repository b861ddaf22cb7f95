//! Role-based authorization for whole route groups.
//!
//! Handlers that need the caller's id use the extractors in
//! [`crate::middleware::auth`]. The layer functions here guard a nested
//! router so that every route below it rejects the wrong role before the
//! body is even read.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hostelcare_auth::Role;
use hostelcare_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Checks that the bearer token carries one of `allowed_roles`.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/students", get(list_students))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    let role = auth_user.role();

    if !allowed_roles.contains(&role) {
        let required = allowed_roles
            .iter()
            .map(Role::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {required}, but account has role: {role}"
        )));
    }

    Ok(())
}
