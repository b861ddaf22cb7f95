#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use hostelcare::hostelcare_auth::{Role, create_access_token};
use hostelcare::hostelcare_config::{CorsConfig, JwtConfig, RateLimitConfig, TicketConfig};
use hostelcare::hostelcare_core::hash_password;
use hostelcare::hostelcare_core::permissions::from_admin_flags;
use hostelcare::hostelcare_models::{AdminId, ComplaintId, StudentId};
use hostelcare::router::init_router;
use hostelcare::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    setup_test_app_with(pool, TicketConfig::default(), RateLimitConfig::disabled())
}

pub fn setup_test_app_with(
    pool: PgPool,
    ticket_config: TicketConfig,
    rate_limit_config: RateLimitConfig,
) -> Router {
    let state = AppState::new(
        pool,
        test_jwt_config(),
        CorsConfig::from_lookup(|_| None),
        ticket_config,
        &rate_limit_config,
    );
    init_router(state)
}

pub struct TestStudent {
    pub id: StudentId,
    pub student_id: String,
    pub email: String,
    pub token: String,
}

pub struct TestAdmin {
    pub id: AdminId,
    pub admin_id: String,
    pub email: String,
    pub token: String,
}

/// Admin capability flags for fixtures.
#[derive(Clone, Copy)]
pub struct Flags {
    pub complaints: bool,
    pub users: bool,
    pub admins: bool,
}

impl Flags {
    pub const STAFF: Flags = Flags {
        complaints: true,
        users: false,
        admins: false,
    };
    pub const SUPER: Flags = Flags {
        complaints: true,
        users: true,
        admins: true,
    };
    pub const NONE: Flags = Flags {
        complaints: false,
        users: false,
        admins: false,
    };
}

fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_uppercase()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub async fn create_test_student(pool: &PgPool) -> TestStudent {
    let suffix = unique_suffix();
    let student_id = format!("STU{suffix}");
    let email = generate_unique_email();
    let mobile = format!("+1{}", &Uuid::new_v4().as_u128().to_string()[..11]);
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: StudentId = sqlx::query_scalar(
        "INSERT INTO students (student_id, name, email, mobile, room_number, block, password)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(&student_id)
    .bind("Test Student")
    .bind(&email)
    .bind(&mobile)
    .bind("A101")
    .bind("A")
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(
        id.into_inner(),
        &email,
        Role::Student,
        vec![],
        &test_jwt_config(),
    )
    .unwrap();

    TestStudent {
        id,
        student_id,
        email,
        token,
    }
}

pub async fn create_test_admin(pool: &PgPool, flags: Flags) -> TestAdmin {
    let admin_id = format!("ADM{}", unique_suffix());
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: AdminId = sqlx::query_scalar(
        "INSERT INTO admins (admin_id, name, email, password,
                             can_manage_complaints, can_manage_users, can_manage_admins)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id",
    )
    .bind(&admin_id)
    .bind("Test Admin")
    .bind(&email)
    .bind(&hashed)
    .bind(flags.complaints)
    .bind(flags.users)
    .bind(flags.admins)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(
        id.into_inner(),
        &email,
        Role::Admin,
        from_admin_flags(flags.complaints, flags.users, flags.admins),
        &test_jwt_config(),
    )
    .unwrap();

    TestAdmin {
        id,
        admin_id,
        email,
        token,
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends the request and returns the status with the JSON body (`Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn complaint_body(title: &str) -> Value {
    json!({
        "category": "plumbing",
        "title": title,
        "description": "Water has been leaking under the sink since Monday",
        "location": "Block A, Room 101"
    })
}

/// Creates a complaint through the API and returns its JSON.
pub async fn create_complaint(app: &Router, student: &TestStudent, title: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&student.token),
            Some(complaint_body(title)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

pub fn complaint_id(complaint: &Value) -> ComplaintId {
    complaint["id"].as_str().unwrap().parse().unwrap()
}

pub async fn set_status(app: &Router, admin: &TestAdmin, id: ComplaintId, body: Value) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::PATCH,
            &format!("/api/complaints/{id}/status"),
            Some(&admin.token),
            Some(body),
        ),
    )
    .await
}
