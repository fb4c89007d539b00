use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum DeactivateDoctorError {
    #[error("Doctor {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Soft delete; visits and records keep pointing at the doctor
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: &SqlitePool, doctor_id: i64) -> Result<(), DeactivateDoctorError> {
    let result = sqlx::query("UPDATE doctors SET is_active = 0 WHERE id = ?")
        .bind(doctor_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeactivateDoctorError::NotFound(doctor_id));
    }

    tracing::info!("Doctor deactivated");
    Ok(())
}
