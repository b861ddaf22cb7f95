//! Bootstrap admin accounts.

use hostelcare_core::hash_password;
use hostelcare_db::{PgPool, unique_violation};
use hostelcare_models::admins::DEFAULT_DEPARTMENT;
use hostelcare_models::{AdminId, Email};

use crate::CliResult;

pub struct NewAdmin {
    pub admin_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: Option<String>,
}

/// Creates an active admin holding every permission flag.
pub async fn create_super_admin(db: &PgPool, admin: NewAdmin) -> CliResult<AdminId> {
    let email = Email::new(&admin.email)?;
    if admin.password.len() < 8 {
        return Err("Password must be at least 8 characters".into());
    }

    let hashed_password =
        hash_password(&admin.password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query_scalar::<_, AdminId>(
        "INSERT INTO admins (admin_id, name, email, password, department,
                             can_manage_complaints, can_manage_users, can_manage_admins)
         VALUES ($1, $2, $3, $4, $5, TRUE, TRUE, TRUE)
         RETURNING id",
    )
    .bind(admin.admin_id.trim().to_uppercase())
    .bind(admin.name.trim())
    .bind(&email)
    .bind(&hashed_password)
    .bind(admin.department.as_deref().unwrap_or(DEFAULT_DEPARTMENT))
    .fetch_one(db)
    .await;

    match result {
        Ok(id) => Ok(id),
        Err(e) if unique_violation(&e).is_some() => {
            Err("An admin with this admin ID or email already exists".into())
        }
        Err(e) => Err(e.into()),
    }
}
