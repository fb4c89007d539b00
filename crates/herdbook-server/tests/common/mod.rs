//! Common test utilities for Herdbook server integration tests
//!
//! [`TestApp`] drives the full router (session layer included) against a
//! fresh in-memory SQLite database, carrying the session cookie between
//! requests the way a browser would.
//!
//! # Example
//!
//! ```ignore
//! mod common;
//! use common::TestApp;
//!
//! #[tokio::test]
//! async fn test_dashboard() {
//!     let mut app = TestApp::spawn().await;
//!     app.login_as_admin().await;
//!     let page = app.get("/dashboard/").await;
//!     assert_eq!(page.view(), "dashboard/admin");
//! }
//! ```

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use herdbook_server::{
    api::{create_router, AppState},
    config::Config,
    db::{self, DbConfig},
    features::accounts::commands::{bootstrap_admin, BootstrapAdminCommand},
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const WORKER_PASSWORD: &str = "gaushala-2024";

/// The router plus a one-cookie jar
pub struct TestApp {
    pub pool: SqlitePool,
    router: Router,
    cookie: Option<String>,
}

/// Status, redirect target and JSON body of one response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn view(&self) -> &str {
        self.body["view"].as_str().unwrap_or_default()
    }

    pub fn context(&self) -> &Value {
        &self.body["context"]
    }

    /// Flash texts rendered on this page
    pub fn messages(&self) -> Vec<String> {
        self.body["messages"]
            .as_array()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m["text"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn field_errors(&self, field: &str) -> Vec<String> {
        self.context()["errors"][field]
            .as_array()
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[track_caller]
    pub fn assert_redirect(&self, location: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(location));
    }
}

impl TestApp {
    /// Fresh database with migrations applied and the admin account created
    pub async fn spawn() -> Self {
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 5,
        };
        let pool = db::create_pool(&db_config).await.expect("in-memory database");
        db::migrate(&pool).await.expect("migrations apply");

        bootstrap_admin::handle(
            &pool,
            BootstrapAdminCommand {
                username: ADMIN_USERNAME.to_string(),
                password: ADMIN_PASSWORD.to_string(),
                bcrypt_cost: 4,
            },
        )
        .await
        .expect("admin bootstrap");

        let mut config = Config::default();
        config.auth.bcrypt_cost = 4;
        let router = create_router(AppState::new(pool.clone(), &config));

        Self {
            pool,
            router,
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap();
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// GET with a `Referer` header
    pub async fn get_from(&mut self, uri: &str, referer: &str) -> TestResponse {
        let request = self
            .request("GET", uri)
            .header(header::REFERER, referer)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.post_form("/", &[("username", username), ("password", password)])
            .await
    }

    pub async fn login_as_admin(&mut self) {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .assert_redirect("/dashboard/");
    }

    /// Log out and land on the login page
    pub async fn logout(&mut self) -> TestResponse {
        let response = self.post_form("/logout/", &[]).await;
        response.assert_redirect("/");
        self.follow(&response).await
    }

    /// GET the redirect target, as a browser would
    pub async fn follow(&mut self, response: &TestResponse) -> TestResponse {
        let location = response.location.clone().expect("redirect location");
        self.get(&location).await
    }

    /// Create a worker account through the admin form and follow the
    /// redirect; returns the worker id
    pub async fn create_worker(&mut self, username: &str, employee_id: &str) -> i64 {
        let fields = [
            ("username", username),
            ("first_name", "Ravi"),
            ("last_name", "Patil"),
            ("email", "ravi@farm.test"),
            ("employee_id", employee_id),
            ("date_of_joining", "2024-04-01"),
            ("password1", WORKER_PASSWORD),
            ("password2", WORKER_PASSWORD),
        ];
        self.submit("/workers/create/", &fields, "/workers/").await;
        self.id_of("SELECT id FROM workers WHERE employee_id = ?", employee_id)
            .await
    }

    /// Add a cow through the admin form; returns its id
    pub async fn create_cow(&mut self, cow_number: &str, cow_name: &str) -> i64 {
        let fields = [
            ("cow_number", cow_number),
            ("cow_name", cow_name),
            ("breed", "Gir"),
            ("age", "4"),
            ("color", "Red"),
            ("identification_mark", "White patch on forehead"),
            ("health_status", "Healthy"),
            ("is_active", "on"),
        ];
        self.submit("/cows/create/", &fields, "/cows/").await;
        self.id_of("SELECT id FROM cows WHERE cow_number = ?", cow_number).await
    }

    /// Add a doctor through the admin form; returns its id
    pub async fn create_doctor(&mut self, name: &str, license_number: &str) -> i64 {
        let fields = [
            ("name", name),
            ("qualification", "BVSc & AH"),
            ("license_number", license_number),
            ("phone_number", "9822012345"),
        ];
        self.submit("/veterinary/doctors/create/", &fields, "/veterinary/doctors/")
            .await;
        self.id_of("SELECT id FROM doctors WHERE license_number = ?", license_number)
            .await
    }

    /// POST a form, expect a redirect to `location` and follow it
    pub async fn submit(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
        location: &str,
    ) -> TestResponse {
        let response = self.post_form(uri, fields).await;
        response.assert_redirect(location);
        self.follow(&response).await
    }

    pub async fn id_of(&self, sql: &str, key: &str) -> i64 {
        sqlx::query_scalar(sql)
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            body,
        }
    }
}
