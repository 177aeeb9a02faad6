use crate::models::User;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
        .bind(phone)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// Creates the user on first successful OTP verification for their phone.
pub async fn find_or_create_by_phone(pool: &PgPool, phone: &str) -> Result<User> {
    if let Some(user) = find_by_phone(pool, phone).await? {
        return Ok(user);
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (phone, role)
        VALUES ($1, 'passenger')
        ON CONFLICT (phone) DO UPDATE SET phone = EXCLUDED.phone
        RETURNING *
        "#,
    )
    .bind(phone)
    .fetch_one(pool)
    .await?;

    Ok(user)
}
