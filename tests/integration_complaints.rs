mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use common::{
    Flags, complaint_body, complaint_id, create_complaint, create_test_admin, create_test_student,
    json_request, send, set_status, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_complaint_starts_pending(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;

    let complaint = create_complaint(&app, &student, "Leaking sink").await;

    assert_eq!(complaint["status"], "pending");
    assert_eq!(complaint["ticketId"], "TKT000001");
    assert_eq!(complaint["priority"], "medium");
    assert_eq!(complaint["urgency"], "moderate");
    assert_eq!(complaint["version"], 1);
    assert_eq!(complaint["student"], student.id.to_string());
    assert!(complaint["assignedTo"].is_null());
    assert!(complaint["resolutionDetails"].is_null());
    assert!(complaint["rating"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_complaint_trims_text(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&student.token),
            Some(json!({
                "category": "electrical",
                "title": "  Broken socket  ",
                "description": " Sparks when plugging in ",
                "location": " Room 12 ",
                "urgency": "critical"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Broken socket");
    assert_eq!(body["location"], "Room 12");
    assert_eq!(body["urgency"], "critical");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_title_length_counts_trimmed_text(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let title = "t".repeat(100);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&student.token),
            Some(complaint_body(&format!("   {title}   "))),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["title"], title);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_student_token_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_test_admin(&pool, Flags::SUPER).await;
    let student = create_test_student(&pool).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::DELETE,
            &format!("/api/admin/students/{}", student.id),
            Some(&admin.token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&student.token),
            Some(complaint_body("Ghost complaint")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is not valid");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_complaint_validation(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&student.token),
            Some(json!({
                "category": "plumbing",
                "title": "   ",
                "description": "desc",
                "location": "here"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&student.token),
            Some(json!({
                "category": "roofing",
                "title": "Hole",
                "description": "desc",
                "location": "here"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("roofing"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_complaint_requires_student(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_test_admin(&pool, Flags::SUPER).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            None,
            Some(common::complaint_body("No token")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/complaints",
            Some(&admin.token),
            Some(common::complaint_body("Admin token")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_in_progress_assigns_actor_once(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let first = create_test_admin(&pool, Flags::STAFF).await;
    let second = create_test_admin(&pool, Flags::STAFF).await;
    let id = complaint_id(&create_complaint(&app, &student, "Door hinge").await);

    let (status, body) = set_status(&app, &first, id, json!({ "status": "in-progress" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in-progress");
    assert_eq!(body["assignedTo"], first.id.to_string());
    assert_eq!(body["version"], 2);

    let (status, body) = set_status(&app, &second, id, json!({ "status": "in-progress" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignedTo"], first.id.to_string());
    assert_eq!(body["version"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resolve_records_resolution(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let created = create_complaint(&app, &student, "Blocked drain").await;
    let id = complaint_id(&created);

    let (status, body) = set_status(
        &app,
        &admin,
        id,
        json!({ "status": "resolved", "notes": " cleared ", "solution": "Replaced trap" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
    let resolution = &body["resolutionDetails"];
    assert_eq!(resolution["resolvedBy"], admin.id.to_string());
    assert_eq!(resolution["notes"], "cleared");
    assert_eq!(resolution["solution"], "Replaced trap");

    let created_at: DateTime<Utc> = created["createdAt"].as_str().unwrap().parse().unwrap();
    let resolved_at: DateTime<Utc> = resolution["resolvedAt"].as_str().unwrap().parse().unwrap();
    assert!(resolved_at >= created_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_is_terminal_without_resolution(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let id = complaint_id(&create_complaint(&app, &student, "Duplicate report").await);

    let (status, body) = set_status(&app, &admin, id, json!({ "status": "rejected" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert!(body["resolutionDetails"].is_null());

    let (status, body) = set_status(&app, &admin, id, json!({ "status": "in-progress" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rejected"));

    let (status, _) = set_status(&app, &admin, id, json!({ "status": "resolved" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_update_requires_permission(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let viewer = create_test_admin(&pool, Flags::NONE).await;
    let id = complaint_id(&create_complaint(&app, &student, "Flickering light").await);

    let (status, body) = set_status(&app, &viewer, id, json!({ "status": "resolved" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("complaints:manage"));

    let (status, _) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/complaints/{id}/status"),
            Some(&student.token),
            Some(json!({ "status": "resolved" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_update_unknown_complaint(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_test_admin(&pool, Flags::STAFF).await;

    let (status, _) = set_status(
        &app,
        &admin,
        hostelcare::hostelcare_models::ComplaintId::new(),
        json!({ "status": "resolved" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_expected_version_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let id = complaint_id(&create_complaint(&app, &student, "Window latch").await);

    let (status, _) = set_status(
        &app,
        &admin,
        id,
        json!({ "status": "in-progress", "expectedVersion": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = set_status(
        &app,
        &admin,
        id,
        json!({ "status": "resolved", "expectedVersion": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("modified"));

    let (stored_status, version): (String, i64) =
        sqlx::query_as("SELECT status::text, version FROM complaints WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored_status, "in-progress");
    assert_eq!(version, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rating_guard(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let id = complaint_id(&create_complaint(&app, &student, "Shower head").await);
    let rate = |score: i64| {
        json_request(
            Method::POST,
            &format!("/api/complaints/{id}/rating"),
            Some(&student.token),
            Some(json!({ "rating": score, "feedback": "great" })),
        )
    };

    let (status, body) = send(&app, rate(5)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("resolved"));

    set_status(&app, &admin, id, json!({ "status": "in-progress" })).await;
    let (status, _) = send(&app, rate(5)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    set_status(&app, &admin, id, json!({ "status": "resolved" })).await;
    let (status, body) = send(&app, rate(5)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"]["score"], 5);
    assert_eq!(body["rating"]["feedback"], "great");

    let (status, _) = send(&app, rate(6)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // A second rating replaces the first.
    let (status, body) = send(&app, rate(3)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"]["score"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ownership_guard(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let owner = create_test_student(&pool).await;
    let other = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let id = complaint_id(&create_complaint(&app, &owner, "Wardrobe door").await);
    set_status(&app, &admin, id, json!({ "status": "resolved" })).await;

    let (status, _) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/api/complaints/{id}"),
            Some(&other.token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            &format!("/api/complaints/{id}/rating"),
            Some(&other.token),
            Some(json!({ "rating": 1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/api/complaints/{id}"),
            Some(&owner.token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["rating"].is_null());

    let (status, _) = send(
        &app,
        json_request(
            Method::GET,
            &format!("/api/complaints/{id}"),
            Some(&admin.token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_reopens_and_keeps_resolution(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let assignee = create_test_admin(&pool, Flags::STAFF).await;
    let id = complaint_id(&create_complaint(&app, &student, "Ceiling fan").await);
    set_status(&app, &admin, id, json!({ "status": "resolved" })).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/complaints/{id}/assign"),
            Some(&admin.token),
            Some(json!({ "adminId": assignee.id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in-progress");
    assert_eq!(body["assignedTo"], assignee.id.to_string());
    assert_eq!(body["resolutionDetails"]["resolvedBy"], admin.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_unknown_or_inactive_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;
    let inactive = create_test_admin(&pool, Flags::STAFF).await;
    sqlx::query("UPDATE admins SET is_active = FALSE WHERE id = $1")
        .bind(inactive.id)
        .execute(&pool)
        .await
        .unwrap();
    let id = complaint_id(&create_complaint(&app, &student, "Loose tiles").await);

    let assign = |target: String| {
        json_request(
            Method::PATCH,
            &format!("/api/complaints/{id}/assign"),
            Some(&admin.token),
            Some(json!({ "adminId": target })),
        )
    };

    let (status, _) = send(&app, assign(uuid::Uuid::new_v4().to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, assign(inactive.id.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, assign("not-a-uuid".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_complaints_newest_first_with_filter(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let other = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;

    let first = complaint_id(&create_complaint(&app, &student, "First").await);
    create_complaint(&app, &student, "Second").await;
    create_complaint(&app, &other, "Not mine").await;
    set_status(&app, &admin, first, json!({ "status": "resolved" })).await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/complaints/my", Some(&student.token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["title"], "Second");
    assert_eq!(body["data"][1]["title"], "First");

    let (_, body) = send(
        &app,
        json_request(
            Method::GET,
            "/api/complaints/my?status=resolved",
            Some(&student.token),
            None,
        ),
    )
    .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "First");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_list_filters(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;

    let mine = complaint_id(&create_complaint(&app, &student, "Mine").await);
    create_complaint(&app, &student, "Open").await;
    set_status(&app, &admin, mine, json!({ "status": "in-progress" })).await;

    let list = |query: &str| {
        json_request(
            Method::GET,
            &format!("/api/complaints{query}"),
            Some(&admin.token),
            None,
        )
    };

    let (status, body) = send(&app, list("")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);

    let (_, body) = send(&app, list("?assigned=me")).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Mine");

    let (_, body) = send(&app, list("?assigned=unassigned")).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Open");

    let (_, body) = send(&app, list("?status=pending&category=plumbing")).await;
    assert_eq!(body["meta"]["total"], 1);

    let (_, body) = send(&app, list("?category=internet")).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, _) = send(
        &app,
        json_request(Method::GET, "/api/complaints", Some(&student.token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_overview(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;

    let resolved = complaint_id(&create_complaint(&app, &student, "One").await);
    let rejected = complaint_id(&create_complaint(&app, &student, "Two").await);
    create_complaint(&app, &student, "Three").await;
    set_status(&app, &admin, resolved, json!({ "status": "resolved" })).await;
    set_status(&app, &admin, rejected, json!({ "status": "rejected" })).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::GET,
            "/api/complaints/stats/overview",
            Some(&admin.token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["resolved"], 1);
    assert_eq!(body["rejected"], 1);
    assert_eq!(body["inProgress"], 0);
    assert_eq!(body["resolutionRate"], 33.3);
    assert_eq!(body["resolvedLast7Days"], 1);
    assert_eq!(body["avgResolutionDays"], 0.0);
    assert_eq!(body["byCategory"][0]["category"], "plumbing");
    assert_eq!(body["byCategory"][0]["count"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_empty(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_test_admin(&pool, Flags::NONE).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::GET,
            "/api/complaints/stats/overview",
            Some(&admin.token),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["resolutionRate"], 0.0);
    assert!(body["avgResolutionDays"].is_null());
    assert_eq!(body["byCategory"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_home_stats_are_public(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;
    let admin = create_test_admin(&pool, Flags::STAFF).await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/complaints/stats/home/overview", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["resolutionRate"], 0);
    assert_eq!(body["avgDaysToResolve"], 0.0);

    let resolved = complaint_id(&create_complaint(&app, &student, "One").await);
    let started = complaint_id(&create_complaint(&app, &student, "Two").await);
    create_complaint(&app, &student, "Three").await;
    set_status(&app, &admin, resolved, json!({ "status": "resolved" })).await;
    set_status(&app, &admin, started, json!({ "status": "in-progress" })).await;

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/complaints/stats/home/overview", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["resolved"], 1);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["inProgress"], 1);
    assert_eq!(body["resolutionRate"], 33);
    assert_eq!(body["avgDaysToResolve"], 0.0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_recent_public_is_limited_and_reduced(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let student = create_test_student(&pool).await;

    for i in 0..16 {
        create_complaint(&app, &student, &format!("Complaint {i}")).await;
    }

    let (status, body) = send(
        &app,
        json_request(Method::GET, "/api/complaints/recent/public", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 14);
    assert_eq!(items[0]["title"], "Complaint 15");

    let keys: Vec<&str> = items[0].as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 4);
    for key in ["title", "category", "status", "createdAt"] {
        assert!(keys.contains(&key), "missing {key}");
    }
}
