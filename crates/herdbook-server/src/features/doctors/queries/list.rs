use sqlx::SqlitePool;

use crate::models::Doctor;

#[derive(Debug, thiserror::Error)]
pub enum ListDoctorsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum GetDoctorError {
    #[error("Doctor {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Active doctors by name
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool) -> Result<Vec<Doctor>, ListDoctorsError> {
    let doctors = sqlx::query_as::<_, Doctor>(
        "SELECT * FROM doctors WHERE is_active = 1 ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(doctors)
}

#[tracing::instrument(skip(pool))]
pub async fn get(pool: &SqlitePool, doctor_id: i64) -> Result<Doctor, GetDoctorError> {
    sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = ?")
        .bind(doctor_id)
        .fetch_optional(pool)
        .await?
        .ok_or(GetDoctorError::NotFound(doctor_id))
}
