//! Sliding-window rate limiting for OTP requests, keyed independently by
//! phone number and by caller IP (spec rate-limit dimensions). Each
//! dimension has its own ceiling and window length from `Config`.
//!
//! `check` and `record` are deliberately separate: a caller probes `check`
//! before doing the expensive/side-effecting work (sending an OTP) and only
//! calls `record` once that work actually succeeded, so a request that fails
//! downstream doesn't consume the caller's quota.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};

use transit_db::queries::rate_limit as rate_limit_queries;
use transit_db::Pool;
use transit_types::enums::RateLimitDimension;
use transit_types::{AppError, Config};

pub struct RateLimiter {
    pool: Pool,
    config: Config,
}

impl RateLimiter {
    pub fn new(pool: Pool, config: Config) -> Self {
        Self { pool, config }
    }

    fn limits(&self, dimension: RateLimitDimension) -> (i64, StdDuration) {
        match dimension {
            RateLimitDimension::Phone => {
                (self.config.rate_limit.phone_max, self.config.rate_limit.phone_window)
            }
            RateLimitDimension::Ip => {
                (self.config.rate_limit.ip_max, self.config.rate_limit.ip_window)
            }
        }
    }

    /// Non-mutating: errors if the caller is already at the ceiling, but
    /// never itself counts as a request.
    pub async fn check(&self, dimension: RateLimitDimension, key: &str) -> Result<(), AppError> {
        let (max, window) = self.limits(dimension);
        let window_start_floor = Utc::now() - to_chrono_duration(window);

        let count = rate_limit_queries::peek_window(&self.pool, dimension.as_str(), key, window_start_floor)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if count >= max {
            let retry_after = window_end(window_start_floor, window);
            return Err(AppError::RateLimited {
                dimension,
                retry_after,
            });
        }

        Ok(())
    }

    /// Mutating: call only after the rate-limited action has actually been
    /// issued, so a downstream failure doesn't burn the caller's quota.
    pub async fn record(&self, dimension: RateLimitDimension, key: &str) -> Result<(), AppError> {
        let (_, window) = self.limits(dimension);
        let window_start_floor = Utc::now() - to_chrono_duration(window);

        rate_limit_queries::increment_window(&self.pool, dimension.as_str(), key, window_start_floor)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(())
    }
}

fn to_chrono_duration(d: StdDuration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero())
}

fn window_end(window_start: DateTime<Utc>, window: StdDuration) -> DateTime<Utc> {
    window_start + to_chrono_duration(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_end_adds_window_length() {
        let start = Utc::now();
        let end = window_end(start, StdDuration::from_secs(600));
        assert_eq!((end - start).num_seconds(), 600);
    }
}
