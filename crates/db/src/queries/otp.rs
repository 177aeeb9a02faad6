use crate::models::OtpRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Invalidates any earlier unexpired challenge for the phone before issuing
/// a new one, so only the most recently sent code can ever verify.
pub async fn create(
    pool: &PgPool,
    phone: &str,
    code_hash: &str,
    max_attempts: i32,
    expires_at: DateTime<Utc>,
) -> Result<OtpRecord> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE otp_records SET used_at = NOW() WHERE phone = $1 AND used_at IS NULL",
    )
    .bind(phone)
    .execute(&mut *tx)
    .await?;

    let record = sqlx::query_as::<_, OtpRecord>(
        r#"
        INSERT INTO otp_records (phone, code_hash, attempts, max_attempts, expires_at)
        VALUES ($1, $2, 0, $3, $4)
        RETURNING *
        "#,
    )
    .bind(phone)
    .bind(code_hash)
    .bind(max_attempts)
    .bind(expires_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(record)
}

pub async fn find_latest_unused(pool: &PgPool, phone: &str) -> Result<Option<OtpRecord>> {
    let record = sqlx::query_as::<_, OtpRecord>(
        r#"
        SELECT * FROM otp_records
        WHERE phone = $1 AND used_at IS NULL
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Atomically bumps the attempt counter; returns the post-increment row so
/// the caller can check `attempts_exhausted()` without a second query.
pub async fn increment_attempts(pool: &PgPool, id: Uuid) -> Result<OtpRecord> {
    let record = sqlx::query_as::<_, OtpRecord>(
        r#"
        UPDATE otp_records SET attempts = attempts + 1
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

/// Conditional on still-unused so a verified code can never be consumed twice.
pub async fn mark_used(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE otp_records SET used_at = NOW() WHERE id = $1 AND used_at IS NULL",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
