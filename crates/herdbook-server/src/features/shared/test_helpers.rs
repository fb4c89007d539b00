//! Test helpers and fixtures for database tests
//!
//! ```rust,ignore
//! let pool = test_pool().await;
//! let admin = TestUser::admin("boss").insert(&pool).await?;
//! let user = TestUser::worker("ravi").named("Ravi", "Patil").insert(&pool).await?;
//! let worker = TestWorker::new(&user, "W100").insert(&pool).await?;
//! let task = TestTask::new(&worker, "Milk cows").assigned_by(&admin).insert(&pool).await?;
//! let cow = TestCow::new("C-101").named("Gauri").insert(&pool).await?;
//! let ai = TestAiRecord::new(&cow).on(date(2024, 3, 2)).insert(&pool).await?;
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use herdbook_common::{Role, TaskStatus};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

use crate::{
    auth::Actor,
    models::{ArtificialInsemination, Cow, Doctor, Task, User, VeterinaryVisit, Worker},
};

/// Password every fixture user is created with
pub const TEST_PASSWORD: &str = "farm-pass-123";

/// Fresh in-memory database with migrations applied
///
/// A single connection that never expires, so every query sees the same
/// database.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid in-memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory database");
    crate::db::migrate(&pool).await.expect("migrations apply");
    pool
}

/// Actor for a fixture user
pub async fn actor(pool: &SqlitePool, user: &User) -> Actor {
    Actor::load(pool, user.id)
        .await
        .expect("actor query")
        .expect("fixture user is active")
}

/// Builder for creating test users
#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

impl TestUser {
    pub fn admin(username: &str) -> Self {
        Self::new(username, Role::Admin)
    }

    pub fn worker(username: &str) -> Self {
        Self::new(username, Role::Worker)
    }

    fn new(username: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: TEST_PASSWORD.to_string(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            is_active: true,
        }
    }

    pub fn named(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<User> {
        let hash = bcrypt::hash(&self.password, 4).expect("bcrypt hash");
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, first_name, last_name, email, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&self.username)
        .bind(hash)
        .bind(self.role)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(format!("{}@farm.test", self.username))
        .bind(self.is_active)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}

/// Builder for creating worker profiles
#[derive(Debug, Clone)]
pub struct TestWorker {
    pub user_id: i64,
    pub employee_id: String,
    pub date_of_joining: NaiveDate,
    pub is_active: bool,
}

impl TestWorker {
    pub fn new(user: &User, employee_id: &str) -> Self {
        Self {
            user_id: user.id,
            employee_id: employee_id.to_string(),
            date_of_joining: Utc::now().date_naive(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Worker> {
        sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers (user_id, employee_id, date_of_joining, is_active)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(self.user_id)
        .bind(&self.employee_id)
        .bind(self.date_of_joining)
        .bind(self.is_active)
        .fetch_one(pool)
        .await
    }
}

/// Builder for creating tasks
#[derive(Debug, Clone)]
pub struct TestTask {
    pub title: String,
    pub assigned_to: i64,
    pub assigned_by: Option<i64>,
    pub deadline: DateTime<Utc>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl TestTask {
    pub fn new(worker: &Worker, title: &str) -> Self {
        Self {
            title: title.to_string(),
            assigned_to: worker.id,
            assigned_by: None,
            deadline: Utc::now() + Duration::days(1),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn assigned_by(mut self, user: &User) -> Self {
        self.assigned_by = Some(user.id);
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Task> {
        let completed_at = self.status.is_completed().then(Utc::now);
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, assigned_to, assigned_by, deadline, status,
                               created_at, updated_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&self.title)
        .bind(format!("{} description", self.title))
        .bind(self.assigned_to)
        .bind(self.assigned_by)
        .bind(self.deadline)
        .bind(self.status)
        .bind(self.created_at)
        .bind(self.created_at)
        .bind(completed_at)
        .fetch_one(pool)
        .await
    }
}

/// Builder for creating cows
#[derive(Debug, Clone)]
pub struct TestCow {
    pub cow_number: String,
    pub cow_name: Option<String>,
    pub breed: String,
    pub is_active: bool,
}

impl TestCow {
    pub fn new(cow_number: &str) -> Self {
        Self {
            cow_number: cow_number.to_string(),
            cow_name: None,
            breed: "Gir".to_string(),
            is_active: true,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.cow_name = Some(name.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Cow> {
        let now = Utc::now();
        sqlx::query_as::<_, Cow>(
            r#"
            INSERT INTO cows (cow_number, cow_name, breed, age, color, identification_mark,
                              health_status, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 4, 'Brown', 'White patch on forehead', 'Healthy', ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&self.cow_number)
        .bind(&self.cow_name)
        .bind(&self.breed)
        .bind(self.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}

/// Builder for creating doctors
#[derive(Debug, Clone)]
pub struct TestDoctor {
    pub name: String,
    pub license_number: String,
    pub is_active: bool,
}

impl TestDoctor {
    pub fn new(name: &str, license_number: &str) -> Self {
        Self {
            name: name.to_string(),
            license_number: license_number.to_string(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Doctor> {
        sqlx::query_as::<_, Doctor>(
            r#"
            INSERT INTO doctors (name, qualification, license_number, phone_number, is_active, created_at)
            VALUES (?, 'BVSc & AH', ?, '9822000000', ?, ?)
            RETURNING *
            "#,
        )
        .bind(&self.name)
        .bind(&self.license_number)
        .bind(self.is_active)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}

/// `NaiveDate` shorthand for fixtures
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Builder for creating veterinary visits
#[derive(Debug, Clone)]
pub struct TestVisit {
    pub cow_id: i64,
    pub doctor_id: Option<i64>,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
}

impl TestVisit {
    pub fn new(cow: &Cow) -> Self {
        Self {
            cow_id: cow.id,
            doctor_id: None,
            visit_date: Utc::now().date_naive(),
            visit_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid fixture time"),
        }
    }

    pub fn by(mut self, doctor: &Doctor) -> Self {
        self.doctor_id = Some(doctor.id);
        self
    }

    pub fn on(mut self, visit_date: NaiveDate, hour: u32) -> Self {
        self.visit_date = visit_date;
        self.visit_time = NaiveTime::from_hms_opt(hour, 0, 0).expect("valid fixture time");
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<VeterinaryVisit> {
        let now = Utc::now();
        sqlx::query_as::<_, VeterinaryVisit>(
            r#"
            INSERT INTO veterinary_visits (cow_id, doctor_id, visit_date, visit_time, visit_type,
                                           reason_for_visit, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'routine', 'Routine checkup', ?, ?)
            RETURNING *
            "#,
        )
        .bind(self.cow_id)
        .bind(self.doctor_id)
        .bind(self.visit_date)
        .bind(self.visit_time)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }
}

/// Builder for creating AI records
#[derive(Debug, Clone)]
pub struct TestAiRecord {
    pub cow_id: i64,
    pub ai_date: NaiveDate,
    pub success_status: String,
}

impl TestAiRecord {
    pub fn new(cow: &Cow) -> Self {
        Self {
            cow_id: cow.id,
            ai_date: Utc::now().date_naive(),
            success_status: "Pending".to_string(),
        }
    }

    pub fn on(mut self, ai_date: NaiveDate) -> Self {
        self.ai_date = ai_date;
        self
    }

    pub fn status(mut self, success_status: &str) -> Self {
        self.success_status = success_status.to_string();
        self
    }

    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<ArtificialInsemination> {
        sqlx::query_as::<_, ArtificialInsemination>(
            r#"
            INSERT INTO artificial_inseminations (cow_id, ai_date, ai_time, bull_breed,
                                                  heat_detection_date, success_status, created_at)
            VALUES (?, ?, '10:30:00', 'HF', ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(self.cow_id)
        .bind(self.ai_date)
        .bind(self.ai_date)
        .bind(&self.success_status)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }
}
