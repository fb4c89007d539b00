//! Worker and task workflow tests
//!
//! Admin manages workers and assigns tasks; workers see and progress only
//! their own tasks.

use axum::http::StatusCode;
use chrono::{Duration, Utc};

mod common;
use common::{TestApp, WORKER_PASSWORD};

fn deadline_in(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format("%Y-%m-%dT%H:%M")
        .to_string()
}

async fn assign_task(app: &mut TestApp, worker_id: i64, title: &str, deadline: &str) -> i64 {
    let worker = worker_id.to_string();
    app.submit(
        "/tasks/create/",
        &[
            ("title", title),
            ("description", "Morning and evening milking"),
            ("assigned_to", &worker),
            ("deadline", deadline),
            ("status", "pending"),
        ],
        "/tasks/",
    )
    .await;
    app.id_of("SELECT id FROM tasks WHERE title = ?", title).await
}

async fn completed_at(app: &TestApp, task_id: i64) -> Option<String> {
    sqlx::query_scalar("SELECT completed_at FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_worker_completes_assigned_task() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    let worker_id = app.create_worker("ravi", "W100").await;
    let task_id = assign_task(&mut app, worker_id, "Milk cows", &deadline_in(1)).await;
    app.logout().await;

    app.login("ravi", WORKER_PASSWORD).await.assert_redirect("/dashboard/");
    let dashboard = app.get("/dashboard/").await;
    assert_eq!(dashboard.view(), "dashboard/worker");
    assert_eq!(dashboard.context()["pending_tasks"], 1);
    assert_eq!(dashboard.context()["completed_tasks"], 0);

    let list = app.get("/tasks/").await;
    let tasks = list.context()["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["status"], "pending");
    assert_eq!(tasks[0]["is_overdue"], false);

    let form = app.get(&format!("/tasks/{}/update/", task_id)).await;
    assert_eq!(form.view(), "tasks/status_form");

    let detail_path = format!("/tasks/{}/", task_id);
    let detail = app
        .submit(
            &format!("/tasks/{}/update/", task_id),
            &[("status", "completed")],
            &detail_path,
        )
        .await;
    assert_eq!(detail.view(), "tasks/detail");
    assert_eq!(detail.messages(), vec!["Status updated!"]);
    assert_eq!(detail.context()["task"]["status"], "completed");
    assert!(!detail.context()["task"]["completed_at"].is_null());

    // Re-submitting completed keeps the first timestamp
    let stamped = completed_at(&app, task_id).await;
    assert!(stamped.is_some());
    app.submit(
        &format!("/tasks/{}/update/", task_id),
        &[("status", "completed")],
        &detail_path,
    )
    .await;
    assert_eq!(completed_at(&app, task_id).await, stamped);

    // Leaving completed clears it
    app.submit(
        &format!("/tasks/{}/update/", task_id),
        &[("status", "in_progress")],
        &detail_path,
    )
    .await;
    assert_eq!(completed_at(&app, task_id).await, None);
}

#[tokio::test]
async fn test_worker_status_update_ignores_other_fields() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    let worker_id = app.create_worker("ravi", "W100").await;
    let task_id = assign_task(&mut app, worker_id, "Clean shed", &deadline_in(2)).await;
    app.logout().await;
    app.login("ravi", WORKER_PASSWORD).await;

    app.post_form(
        &format!("/tasks/{}/update/", task_id),
        &[("title", "Renamed"), ("status", "in_progress")],
    )
    .await
    .assert_redirect(&format!("/tasks/{}/", task_id));

    let (title, status): (String, String) =
        sqlx::query_as("SELECT title, status FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(title, "Clean shed");
    assert_eq!(status, "in_progress");

    let invalid = app
        .post_form(&format!("/tasks/{}/update/", task_id), &[("status", "done")])
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(invalid.view(), "tasks/status_form");
    assert_eq!(invalid.field_errors("status"), vec!["Select a valid choice."]);
}

#[tokio::test]
async fn test_blank_status_keeps_completed_task() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    let worker_id = app.create_worker("ravi", "W100").await;
    let task_id = assign_task(&mut app, worker_id, "Milk cows", &deadline_in(1)).await;
    app.logout().await;
    app.login("ravi", WORKER_PASSWORD).await;

    let update_path = format!("/tasks/{}/update/", task_id);
    app.submit(&update_path, &[("status", "completed")], &format!("/tasks/{}/", task_id))
        .await;
    let stamped = completed_at(&app, task_id).await;

    for fields in [&[("status", "")][..], &[][..]] {
        let response = app.post_form(&update_path, fields).await;
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.view(), "tasks/status_form");
        assert_eq!(response.field_errors("status"), vec!["This field is required."]);
    }

    let status: String = sqlx::query_scalar("SELECT status FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status, "completed");
    assert_eq!(completed_at(&app, task_id).await, stamped);
}

#[tokio::test]
async fn test_worker_cannot_touch_another_workers_task() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    app.create_worker("ravi", "W100").await;
    let sita = app.create_worker("sita", "W101").await;
    let task_id = assign_task(&mut app, sita, "Feed calves", &deadline_in(1)).await;
    app.logout().await;
    app.login("ravi", WORKER_PASSWORD).await;

    assert!(app.get("/tasks/").await.context()["tasks"]
        .as_array()
        .unwrap()
        .is_empty());

    app.get(&format!("/tasks/{}/", task_id))
        .await
        .assert_redirect("/dashboard/");
    app.post_form(&format!("/tasks/{}/update/", task_id), &[("status", "completed")])
        .await
        .assert_redirect("/dashboard/");

    let dashboard = app.get("/dashboard/").await;
    assert!(dashboard.messages().contains(&"Access denied!".to_string()));

    let status: String = sqlx::query_scalar("SELECT status FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status, "pending");
}

#[tokio::test]
async fn test_workers_cannot_use_admin_pages() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    let worker_id = app.create_worker("ravi", "W100").await;
    let task_id = assign_task(&mut app, worker_id, "Milk cows", &deadline_in(1)).await;
    app.logout().await;
    app.login("ravi", WORKER_PASSWORD).await;

    for path in ["/workers/", "/workers/create/", "/tasks/create/"] {
        app.get(path).await.assert_redirect("/dashboard/");
    }

    app.post_form(
        "/workers/create/",
        &[("username", "intruder"), ("employee_id", "W999")],
    )
    .await
    .assert_redirect("/dashboard/");
    app.post_form(&format!("/workers/{}/delete/", worker_id), &[])
        .await
        .assert_redirect("/dashboard/");
    app.post_form(&format!("/tasks/{}/delete/", task_id), &[])
        .await
        .assert_redirect("/dashboard/");

    assert_eq!(app.count("workers").await, 1);
    assert_eq!(app.count("tasks").await, 1);
}

#[tokio::test]
async fn test_admin_manages_workers() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    let worker_id = app.create_worker("ravi", "W100").await;

    let list = app.get("/workers/").await;
    assert_eq!(list.context()["workers"].as_array().unwrap().len(), 1);

    let duplicate = app
        .post_form(
            "/workers/create/",
            &[
                ("username", "ravi"),
                ("first_name", "Ravi"),
                ("last_name", "Kale"),
                ("email", "kale@farm.test"),
                ("employee_id", "W100"),
                ("date_of_joining", "2024-05-01"),
                ("password1", WORKER_PASSWORD),
                ("password2", WORKER_PASSWORD),
            ],
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!duplicate.field_errors("username").is_empty());
    assert!(!duplicate.field_errors("employee_id").is_empty());

    let confirm = app.get(&format!("/workers/{}/delete/", worker_id)).await;
    assert_eq!(confirm.view(), "workers/confirm_delete");

    let list = app
        .submit(&format!("/workers/{}/delete/", worker_id), &[], "/workers/")
        .await;
    assert_eq!(list.messages(), vec!["Worker deactivated!"]);
    assert!(list.context()["workers"].as_array().unwrap().is_empty());

    // Soft delete keeps the row
    assert_eq!(app.count("workers").await, 1);
}

#[tokio::test]
async fn test_admin_task_lifecycle() {
    let mut app = TestApp::spawn().await;
    app.login_as_admin().await;
    let worker_id = app.create_worker("ravi", "W100").await;

    let empty = app.post_form("/tasks/create/", &[("title", "No worker")]).await;
    assert_eq!(empty.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(empty.field_errors("assigned_to"), vec!["This field is required."]);
    assert!(!empty.context()["workers"].as_array().unwrap().is_empty());

    let overdue_deadline = deadline_in(-1);
    let task_id = assign_task(&mut app, worker_id, "Repair fence", &overdue_deadline).await;

    let detail = app.get(&format!("/tasks/{}/", task_id)).await;
    assert_eq!(detail.context()["task"]["is_overdue"], true);
    assert_eq!(detail.context()["task"]["status"], "pending");
    assert_eq!(detail.context()["task"]["assigned_by_username"], "admin");

    let worker = worker_id.to_string();
    let updated = app
        .submit(
            &format!("/tasks/{}/update/", task_id),
            &[
                ("title", "Repair north fence"),
                ("description", "Replace two posts"),
                ("assigned_to", &worker),
                ("deadline", &overdue_deadline),
                ("status", "completed"),
            ],
            &format!("/tasks/{}/", task_id),
        )
        .await;
    assert_eq!(updated.messages(), vec!["Task updated!"]);
    assert_eq!(updated.context()["task"]["title"], "Repair north fence");
    assert_eq!(updated.context()["task"]["is_overdue"], false);
    assert!(completed_at(&app, task_id).await.is_some());

    let list = app
        .submit(&format!("/tasks/{}/delete/", task_id), &[], "/tasks/")
        .await;
    assert_eq!(list.messages(), vec!["Task deleted!"]);
    assert_eq!(app.count("tasks").await, 0);

    assert_eq!(
        app.get(&format!("/tasks/{}/", task_id)).await.status,
        StatusCode::NOT_FOUND
    );
}
