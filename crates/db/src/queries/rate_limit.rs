use crate::models::RateLimitRecord;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Non-mutating read of the current window's count — a stale row whose
/// window has already rolled over reads as a fresh (zero-count) window
/// without writing anything, since only `increment_window` may start one.
pub async fn peek_window(
    pool: &PgPool,
    dimension: &str,
    key: &str,
    window_start_floor: DateTime<Utc>,
) -> Result<i64> {
    let existing = sqlx::query_as::<_, RateLimitRecord>(
        "SELECT * FROM rate_limit_records WHERE dimension = $1 AND key = $2",
    )
    .bind(dimension)
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(match existing {
        Some(row) if row.window_start >= window_start_floor => row.count,
        _ => 0,
    })
}

/// Sliding-window counter keyed by (dimension, key). Starts a fresh window
/// when the previous one has expired, otherwise increments in place.
pub async fn increment_window(
    pool: &PgPool,
    dimension: &str,
    key: &str,
    window_start_floor: DateTime<Utc>,
) -> Result<RateLimitRecord> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, RateLimitRecord>(
        "SELECT * FROM rate_limit_records WHERE dimension = $1 AND key = $2 FOR UPDATE",
    )
    .bind(dimension)
    .bind(key)
    .fetch_optional(&mut *tx)
    .await?;

    let record = match existing {
        Some(row) if row.window_start >= window_start_floor => {
            sqlx::query_as::<_, RateLimitRecord>(
                "UPDATE rate_limit_records SET count = count + 1 WHERE id = $1 RETURNING *",
            )
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await?
        }
        Some(row) => {
            sqlx::query_as::<_, RateLimitRecord>(
                r#"
                UPDATE rate_limit_records
                SET count = 1, window_start = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_as::<_, RateLimitRecord>(
                r#"
                INSERT INTO rate_limit_records (dimension, key, window_start, count)
                VALUES ($1, $2, NOW(), 1)
                RETURNING *
                "#,
            )
            .bind(dimension)
            .bind(key)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    tx.commit().await?;
    Ok(record)
}
