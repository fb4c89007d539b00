//! Create a worker account
//!
//! The login account and the worker profile are written in one transaction.

use chrono::{NaiveDate, Utc};
use herdbook_common::Role;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    auth::{hash_password, PasswordError},
    features::shared::{
        error_helpers::map_unique_violation, validation::is_valid_username, FieldError,
        FieldErrors, Validator,
    },
    models::Worker,
};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateWorkerCommand {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub employee_id: String,
    pub date_of_joining: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ValidWorker {
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: Option<String>,
    address: Option<String>,
    employee_id: String,
    date_of_joining: NaiveDate,
    password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateWorkerError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateWorkerCommand {
    fn validate(&self) -> Result<ValidWorker, FieldErrors> {
        let mut v = Validator::new();
        let username = v.required_text("username", &self.username, 150);
        if !username.is_empty() && !is_valid_username(&username) {
            v.add("username", FieldError::InvalidUsername);
        }

        let worker = ValidWorker {
            username,
            first_name: v.required_text("first_name", &self.first_name, 30),
            last_name: v.required_text("last_name", &self.last_name, 30),
            email: v.required_email("email", &self.email),
            phone_number: v.optional_text("phone_number", &self.phone_number, Some(15)),
            address: v.optional_text("address", &self.address, None),
            employee_id: v.required_text("employee_id", &self.employee_id, 50),
            date_of_joining: v.required_date("date_of_joining", &self.date_of_joining),
            password: self.password1.clone(),
        };

        if self.password1.is_empty() {
            v.add("password1", FieldError::Required);
        } else {
            for error in password_problems(&self.password1) {
                v.add("password1", error);
            }
        }
        if self.password2.is_empty() {
            v.add("password2", FieldError::Required);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            v.add("password2", FieldError::PasswordMismatch);
        }

        v.finish(worker)
    }
}

fn password_problems(password: &str) -> Vec<FieldError> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(FieldError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        problems.push(FieldError::PasswordNumeric);
    }
    problems
}

async fn taken_fields(pool: &SqlitePool, worker: &ValidWorker) -> Result<FieldErrors, sqlx::Error> {
    let mut errors = FieldErrors::new();

    let username_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
            .bind(&worker.username)
            .fetch_one(pool)
            .await?;
    if username_taken {
        errors.add("username", FieldError::Duplicate);
    }

    let employee_id_taken: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM workers WHERE employee_id = ?)")
            .bind(&worker.employee_id)
            .fetch_one(pool)
            .await?;
    if employee_id_taken {
        errors.add("employee_id", FieldError::Duplicate);
    }

    Ok(errors)
}

#[tracing::instrument(skip(pool, command), fields(username = %command.username, employee_id = %command.employee_id))]
pub async fn handle(
    pool: &SqlitePool,
    bcrypt_cost: u32,
    command: CreateWorkerCommand,
) -> Result<Worker, CreateWorkerError> {
    let valid = command.validate().map_err(CreateWorkerError::Validation)?;

    let taken = taken_fields(pool, &valid).await?;
    if !taken.is_empty() {
        return Err(CreateWorkerError::Validation(taken));
    }

    let password_hash = hash_password(valid.password.clone(), bcrypt_cost).await?;

    let mut tx = pool.begin().await?;

    let user_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, password_hash, role, first_name, last_name, email,
                           phone_number, address, is_active, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
        RETURNING id
        "#,
    )
    .bind(&valid.username)
    .bind(&password_hash)
    .bind(Role::Worker)
    .bind(&valid.first_name)
    .bind(&valid.last_name)
    .bind(&valid.email)
    .bind(&valid.phone_number)
    .bind(&valid.address)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(e, "username", CreateWorkerError::Validation, CreateWorkerError::Database)
    })?;

    let worker = sqlx::query_as::<_, Worker>(
        r#"
        INSERT INTO workers (user_id, employee_id, date_of_joining, is_active)
        VALUES (?, ?, ?, 1)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&valid.employee_id)
    .bind(valid.date_of_joining)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(e, "employee_id", CreateWorkerError::Validation, CreateWorkerError::Database)
    })?;

    tx.commit().await?;

    tracing::info!(user_id, worker_id = worker.id, "Worker created");
    Ok(worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_pool, TestUser, TestWorker};

    fn command(username: &str, employee_id: &str) -> CreateWorkerCommand {
        CreateWorkerCommand {
            username: username.to_string(),
            first_name: "Ravi".to_string(),
            last_name: "Patil".to_string(),
            email: "ravi@farm.test".to_string(),
            phone_number: "9822012345".to_string(),
            address: String::new(),
            employee_id: employee_id.to_string(),
            date_of_joining: "2024-04-01".to_string(),
            password1: "gaushala-2024".to_string(),
            password2: "gaushala-2024".to_string(),
        }
    }

    #[tokio::test]
    async fn test_creates_user_and_profile() {
        let pool = test_pool().await;
        let worker = handle(&pool, 4, command("ravi", "W100")).await.unwrap();
        assert_eq!(worker.employee_id, "W100");
        assert!(worker.is_active);

        let (role, first_name, hash): (Role, String, String) =
            sqlx::query_as("SELECT role, first_name, password_hash FROM users WHERE id = ?")
                .bind(worker.user_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(role, Role::Worker);
        assert_eq!(first_name, "Ravi");
        assert!(bcrypt::verify("gaushala-2024", &hash).unwrap());
    }

    #[test]
    fn test_password_rules() {
        let mut short = command("ravi", "W100");
        short.password1 = "1234567".to_string();
        short.password2 = "1234567".to_string();
        let errors = short.validate().unwrap_err();
        assert!(errors.has("password1", FieldError::PasswordTooShort { min: 8 }));
        assert!(errors.has("password1", FieldError::PasswordNumeric));

        let mut mismatch = command("ravi", "W100");
        mismatch.password2 = "something-else".to_string();
        assert!(mismatch
            .validate()
            .unwrap_err()
            .has("password2", FieldError::PasswordMismatch));
    }

    #[test]
    fn test_required_fields_and_username_charset() {
        let mut bad = command("ravi patil", "");
        bad.first_name = String::new();
        bad.email = "not-an-email".to_string();
        bad.date_of_joining = "01/04/2024".to_string();
        let errors = bad.validate().unwrap_err();
        assert!(errors.has("username", FieldError::InvalidUsername));
        assert!(errors.has("first_name", FieldError::Required));
        assert!(errors.has("employee_id", FieldError::Required));
        assert!(errors.has("email", FieldError::InvalidEmail));
        assert!(errors.has("date_of_joining", FieldError::InvalidDate));
    }

    #[tokio::test]
    async fn test_duplicate_username_and_employee_id_leave_nothing_behind() {
        let pool = test_pool().await;
        let existing = TestUser::worker("ravi").insert(&pool).await.unwrap();
        TestWorker::new(&existing, "W100").insert(&pool).await.unwrap();

        match handle(&pool, 4, command("ravi", "W100")).await {
            Err(CreateWorkerError::Validation(errors)) => {
                assert!(errors.has("username", FieldError::Duplicate));
                assert!(errors.has("employee_id", FieldError::Duplicate));
            },
            other => panic!("expected validation error, got {:?}", other),
        }

        match handle(&pool, 4, command("sita", "W100")).await {
            Err(CreateWorkerError::Validation(errors)) => {
                assert!(errors.has("employee_id", FieldError::Duplicate))
            },
            other => panic!("expected validation error, got {:?}", other),
        }

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }
}
