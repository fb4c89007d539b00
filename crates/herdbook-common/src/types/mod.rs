//! Domain choice types shared across Herdbook
//!
//! Every enum here is stored as its lowercase code (`"in_progress"`,
//! `"pregnancy_check"`, ...) and parsed back with [`std::str::FromStr`] or
//! `TryFrom<String>`. With the `sqlx` feature the enums also bind to and
//! decode from SQLite `TEXT` columns directly.

use serde::{Deserialize, Serialize};

use crate::error::HerdbookError;

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every choice, in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored code for this choice
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Human-readable label
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = HerdbookError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    other => Err(HerdbookError::invalid_choice($kind, other)),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = HerdbookError;

            fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        #[cfg(feature = "sqlx")]
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <str as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <str as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
            ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
                let code = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
                Ok(code.parse::<$name>()?)
            }
        }

        #[cfg(feature = "sqlx")]
        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
            ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <&str as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.as_str(), buf)
            }
        }
    };
}

choice_enum! {
    /// Account role. Fixed when the user is created.
    Role, "role" {
        Admin => ("admin", "Admin"),
        Worker => ("worker", "Worker"),
    }
}

choice_enum! {
    /// Stored task status
    ///
    /// `Overdue` can be chosen explicitly by an admin, but whether a task is
    /// overdue for display purposes is computed from its deadline.
    TaskStatus, "task status" {
        Pending => ("pending", "Pending"),
        InProgress => ("in_progress", "In Progress"),
        Completed => ("completed", "Completed"),
        Overdue => ("overdue", "Overdue"),
    }
}

choice_enum! {
    VisitType, "visit type" {
        Routine => ("routine", "Routine Checkup"),
        Emergency => ("emergency", "Emergency"),
        Vaccination => ("vaccination", "Vaccination"),
        Ai => ("ai", "Artificial Insemination"),
        PregnancyCheck => ("pregnancy_check", "Pregnancy Check"),
        Treatment => ("treatment", "Treatment"),
        Other => ("other", "Other"),
    }
}

choice_enum! {
    /// Pregnancy status. Free-running: any status may follow any other.
    PregnancyStatus, "pregnancy status" {
        Suspected => ("suspected", "Suspected"),
        Confirmed => ("confirmed", "Confirmed"),
        Failed => ("failed", "Failed"),
        Aborted => ("aborted", "Aborted"),
        Delivered => ("delivered", "Delivered"),
    }
}

choice_enum! {
    CalfGender, "calf gender" {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl Default for VisitType {
    fn default() -> Self {
        VisitType::Routine
    }
}

impl Default for PregnancyStatus {
    fn default() -> Self {
        PregnancyStatus::Suspected
    }
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        self == TaskStatus::Completed
    }
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}
