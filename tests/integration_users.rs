mod common;

use axum::http::{Method, StatusCode};
use common::{
    Flags, TEST_PASSWORD, complaint_id, create_complaint, create_test_admin, create_test_student,
    json_request, send, set_status, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

async fn student_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_dashboard(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let other = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;

    let started = complaint_id(&create_complaint(&app, &student, "Started").await);
    for i in 0..6 {
        create_complaint(&app, &student, &format!("Waiting {i}")).await;
    }
    create_complaint(&app, &other, "Not mine").await;
    set_status(&app, &admin, started, json!({ "status": "in-progress" })).await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/user/dashboard", Some(&student.token), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], 7);
    assert_eq!(body["pending"], 6);
    assert_eq!(body["inProgress"], 1);
    assert_eq!(body["resolved"], 0);
    let recent = body["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["title"], "Waiting 5");

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/user/dashboard", Some(&admin.token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let change = |current: &str, new: &str| {
        json_request(
            Method::PUT,
            "/api/user/password",
            Some(&student.token),
            Some(json!({ "currentPassword": current, "newPassword": new })),
        )
    };
    let login = |password: &str| {
        json_request(
            Method::POST,
            "/api/auth/student/login",
            None,
            Some(json!({ "studentId": student.student_id, "password": password })),
        )
    };

    let (status, body) = send(&app, change("wrongpass", "brandnew1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Current password is incorrect");

    let (status, body) = send(&app, change(TEST_PASSWORD, "123")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("New password must be at least 6 characters")
    );

    let (status, body) = send(&app, change(TEST_PASSWORD, "brandnew1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully");

    let (status, _) = send(&app, login(TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, login("brandnew1")).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_account_requires_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    create_complaint(&app, &student, "Mine").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::DELETE,
            "/api/user/delete",
            Some(&student.token),
            Some(json!({ "password": "wrongpass" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password is incorrect");
    assert_eq!(student_count(&pool).await, 1);

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            "/api/user/delete",
            Some(&student.token),
            Some(json!({ "password": "" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_account_cascades(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let other = create_test_student(&pool).await;
    create_complaint(&app, &student, "Mine").await;
    create_complaint(&app, &student, "Also mine").await;
    create_complaint(&app, &other, "Kept").await;

    let (status, body) = send(
        &app,
        json_request(
            Method::DELETE,
            "/api/user/delete",
            Some(&student.token),
            Some(json!({ "password": TEST_PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Account deleted successfully");

    assert_eq!(student_count(&pool).await, 1);
    let remaining: Vec<String> = sqlx::query_scalar("SELECT title FROM complaints")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, vec!["Kept".to_string()]);

    // The old token no longer authenticates.
    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/user/dashboard", Some(&student.token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
