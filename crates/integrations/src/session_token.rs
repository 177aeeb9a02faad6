//! Session tokens issued after OTP verification.
//!
//! Unlike the OAuth/JWKS flow this is adapted from, there's no external
//! identity provider: we mint and verify our own HS256 JWT with a shared
//! server secret.

use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Clone)]
pub struct SessionTokenIssuer {
    secret: String,
    ttl_hours: i64,
}

impl SessionTokenIssuer {
    pub fn new(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::hours(self.ttl_hours)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| anyhow!("failed to issue session token: {}", e))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| anyhow!("invalid session token: {}", e))?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_back_to_same_user() {
        let issuer = SessionTokenIssuer::new("test-secret".into(), 24);
        let user_id = Uuid::new_v4();
        let token = issuer.issue(user_id, "passenger").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "passenger");
    }

    #[test]
    fn verify_rejects_token_from_different_secret() {
        let issuer_a = SessionTokenIssuer::new("secret-a".into(), 24);
        let issuer_b = SessionTokenIssuer::new("secret-b".into(), 24);
        let token = issuer_a.issue(Uuid::new_v4(), "passenger").unwrap();
        assert!(issuer_b.verify(&token).is_err());
    }
}
