//! OTP + Rate-Limit subsystem: issues and verifies phone OTP challenges,
//! minting a session token once a code checks out.
//!
//! Codes are never stored in plaintext — only a SHA-256 digest, compared at
//! verify time the same way the teacher's webhook signature check compares
//! a recomputed digest rather than trusting the caller's claim.

use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};

use transit_db::queries::{otp as otp_queries, users as user_queries};
use transit_db::Pool;
use transit_integrations::{SessionTokenIssuer, SmsTransport};
use transit_types::api::auth::{RequestOtpResponse, VerifyOtpResponse};
use transit_types::validation::validate_otp_code;
use transit_types::{AppError, Config};

use crate::codes::generate_otp_code;

pub struct OtpService {
    pool: Pool,
    config: Config,
    sms: Arc<dyn SmsTransport>,
    token_issuer: SessionTokenIssuer,
}

fn hash_code(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

impl OtpService {
    pub fn new(
        pool: Pool,
        config: Config,
        sms: Arc<dyn SmsTransport>,
        token_issuer: SessionTokenIssuer,
    ) -> Self {
        Self {
            pool,
            config,
            sms,
            token_issuer,
        }
    }

    pub async fn request_otp(&self, phone: &str) -> Result<RequestOtpResponse, AppError> {
        let code = generate_otp_code(self.config.otp.length);
        let expires_at = Utc::now() + chrono::Duration::minutes(self.config.otp.expiry_minutes);

        otp_queries::create(
            &self.pool,
            phone,
            &hash_code(&code),
            self.config.otp.max_attempts,
            expires_at,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

        self.sms
            .send_otp(phone, &code)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(RequestOtpResponse { expires_at })
    }

    pub async fn verify_otp(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<VerifyOtpResponse, AppError> {
        validate_otp_code(code, self.config.otp.length).map_err(AppError::Validation)?;

        let record = otp_queries::find_latest_unused(&self.pool, phone)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .ok_or(AppError::OtpNotFound)?;

        let now = Utc::now();
        if record.is_used() {
            return Err(AppError::OtpAlreadyUsed);
        }
        if record.is_expired(now) {
            return Err(AppError::OtpExpired);
        }
        if record.attempts_exhausted() {
            return Err(AppError::OtpMaxAttemptsExceeded);
        }

        let updated = otp_queries::increment_attempts(&self.pool, record.id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if updated.attempts_exhausted() && hash_code(code) != updated.code_hash {
            return Err(AppError::OtpMaxAttemptsExceeded);
        }
        if hash_code(code) != updated.code_hash {
            return Err(AppError::OtpInvalid);
        }

        let marked = otp_queries::mark_used(&self.pool, updated.id)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        if !marked {
            return Err(AppError::OtpAlreadyUsed);
        }

        let user = user_queries::find_or_create_by_phone(&self.pool, phone)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let session_token = self
            .token_issuer
            .issue(user.id, &user.role)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(VerifyOtpResponse {
            session_token,
            user_id: user.id,
            role: user.role(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_code_is_deterministic_and_case_sensitive_to_input() {
        assert_eq!(hash_code("048213"), hash_code("048213"));
        assert_ne!(hash_code("048213"), hash_code("048214"));
    }
}
