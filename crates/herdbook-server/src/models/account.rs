use chrono::{DateTime, NaiveDate, Utc};
use herdbook_common::Role;
use serde::Serialize;
use sqlx::FromRow;

/// Login account. The role is fixed when the row is created.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// "First Last", falling back to the username when both are blank
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name, &self.username)
    }
}

pub(crate) fn full_name(first: &str, last: &str, username: &str) -> String {
    let name = format!("{} {}", first.trim(), last.trim());
    let name = name.trim();
    if name.is_empty() {
        username.to_string()
    } else {
        name.to_string()
    }
}

/// Worker profile attached 1:1 to a worker-role user
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Worker {
    pub id: i64,
    pub user_id: i64,
    pub employee_id: String,
    pub date_of_joining: NaiveDate,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_falls_back_to_username() {
        assert_eq!(full_name("Ravi", "Patil", "w100"), "Ravi Patil");
        assert_eq!(full_name("", " ", "w100"), "w100");
        assert_eq!(full_name("Ravi", "", "w100"), "Ravi");
    }
}
