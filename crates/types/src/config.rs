//! Runtime configuration, loaded from the environment (spec §6).
//!
//! Kept as a flat struct rather than a dedicated crate since the option set
//! is small; every field has the default spec.md names.

use crate::enums::PaymentEnvironment;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Life of a held intent before the Reaper expires it.
    pub intent_ttl: Duration,
    /// Outer time budget for payment completion after InitiatePayment.
    pub payment_timeout: Duration,
    /// Horizon for the Trip Generator's materialization window.
    pub trip_generation_days_ahead: i64,
    /// Driver/conductor assignment cutoff before departure.
    pub assignment_deadline_hours: i64,
    pub otp: OtpConfig,
    pub rate_limit: RateLimitConfig,
    pub payment_environment: PaymentEnvironment,
}

#[derive(Debug, Clone, Copy)]
pub struct OtpConfig {
    pub length: u32,
    pub expiry_minutes: i64,
    pub max_attempts: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub phone_max: i64,
    pub phone_window: Duration,
    pub ip_max: i64,
    pub ip_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            intent_ttl: Duration::from_secs(10 * 60),
            payment_timeout: Duration::from_secs(15 * 60),
            trip_generation_days_ahead: 7,
            assignment_deadline_hours: 2,
            otp: OtpConfig {
                length: 6,
                expiry_minutes: 5,
                max_attempts: 3,
            },
            rate_limit: RateLimitConfig {
                phone_max: 3,
                phone_window: Duration::from_secs(10 * 60),
                ip_max: 10,
                ip_window: Duration::from_secs(60 * 60),
            },
            payment_environment: PaymentEnvironment::Dev,
        }
    }
}

impl Config {
    /// Load from environment, falling back to spec defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let env_secs = |key: &str, default: Duration| -> Duration {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        let env_i64 = |key: &str, default: i64| -> i64 {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(default)
        };

        let env_i32 = |key: &str, default: i32| -> i32 {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse::<i32>().ok())
                .unwrap_or(default)
        };

        let payment_environment = std::env::var("PAYMENT_ENVIRONMENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.payment_environment);

        Self {
            intent_ttl: env_secs("INTENT_TTL_SECONDS", defaults.intent_ttl),
            payment_timeout: env_secs("PAYMENT_TIMEOUT_SECONDS", defaults.payment_timeout),
            trip_generation_days_ahead: env_i64(
                "TRIP_GENERATION_DAYS_AHEAD",
                defaults.trip_generation_days_ahead,
            ),
            assignment_deadline_hours: env_i64(
                "ASSIGNMENT_DEADLINE_HOURS",
                defaults.assignment_deadline_hours,
            ),
            otp: OtpConfig {
                length: env_i32("OTP_LENGTH", defaults.otp.length as i32).max(1) as u32,
                expiry_minutes: env_i64("OTP_EXPIRY_MINUTES", defaults.otp.expiry_minutes),
                max_attempts: env_i32("OTP_MAX_ATTEMPTS", defaults.otp.max_attempts),
            },
            rate_limit: RateLimitConfig {
                phone_max: env_i64("RATE_LIMIT_PHONE_MAX", defaults.rate_limit.phone_max),
                phone_window: env_secs(
                    "RATE_LIMIT_PHONE_WINDOW_SECONDS",
                    defaults.rate_limit.phone_window,
                ),
                ip_max: env_i64("RATE_LIMIT_IP_MAX", defaults.rate_limit.ip_max),
                ip_window: env_secs(
                    "RATE_LIMIT_IP_WINDOW_SECONDS",
                    defaults.rate_limit.ip_window,
                ),
            },
            payment_environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let c = Config::default();
        assert_eq!(c.intent_ttl, Duration::from_secs(600));
        assert_eq!(c.trip_generation_days_ahead, 7);
        assert_eq!(c.assignment_deadline_hours, 2);
        assert_eq!(c.otp.length, 6);
        assert_eq!(c.otp.expiry_minutes, 5);
        assert_eq!(c.otp.max_attempts, 3);
        assert_eq!(c.rate_limit.phone_max, 3);
        assert_eq!(c.rate_limit.ip_max, 10);
    }
}
