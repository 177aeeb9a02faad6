//! Validation helpers shared by request DTOs.
//!
//! These are plain functions rather than `validator` custom validators at
//! the field level in a few cases, because the rule spans multiple fields
//! (e.g. a lounge window's start must precede its end).

use chrono::{DateTime, Utc};

/// E.164-ish phone check: `+`, country code, 8-15 digits total. We don't
/// attempt full E.164 parsing here — that belongs to the SMS transport.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if !phone.starts_with('+') {
        return Err("phone must start with '+'".to_string());
    }
    let digits = &phone[1..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("phone must contain only digits after '+'".to_string());
    }
    if digits.len() < 8 || digits.len() > 15 {
        return Err("phone must be 8-15 digits".to_string());
    }
    Ok(())
}

/// A BookingIntent must request at least one seat when it carries a bus leg.
pub fn validate_seat_ids(seat_ids: &[uuid::Uuid]) -> Result<(), String> {
    if seat_ids.is_empty() {
        return Err("at least one seat must be selected".to_string());
    }
    let mut sorted = seat_ids.to_vec();
    sorted.sort();
    sorted.dedup();
    if sorted.len() != seat_ids.len() {
        return Err("duplicate seat ids in selection".to_string());
    }
    Ok(())
}

/// Lounge time window: start must be strictly before end, and the caller
/// must always supply one explicitly — there is no default window (spec
/// open question resolved this way, see DESIGN.md).
pub fn validate_lounge_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), String> {
    if start >= end {
        return Err("lounge window start must be before end".to_string());
    }
    Ok(())
}

/// OTP codes are fixed-width numeric strings; width comes from config but
/// callers validating inbound requests only need to know it's all digits.
pub fn validate_otp_code(code: &str, expected_length: u32) -> Result<(), String> {
    if code.len() != expected_length as usize {
        return Err(format!("OTP code must be {} digits", expected_length));
    }
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err("OTP code must be numeric".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn phone_accepts_valid_e164() {
        assert!(validate_phone("+94771234567").is_ok());
    }

    #[test]
    fn phone_rejects_missing_plus() {
        assert!(validate_phone("94771234567").is_err());
    }

    #[test]
    fn phone_rejects_non_digits() {
        assert!(validate_phone("+9477abc4567").is_err());
    }

    #[test]
    fn seat_ids_reject_empty() {
        assert!(validate_seat_ids(&[]).is_err());
    }

    #[test]
    fn seat_ids_reject_duplicates() {
        let id = uuid::Uuid::new_v4();
        assert!(validate_seat_ids(&[id, id]).is_err());
    }

    #[test]
    fn lounge_window_rejects_inverted_range() {
        let now = Utc::now();
        assert!(validate_lounge_window(now, now - Duration::hours(1)).is_err());
    }

    #[test]
    fn otp_code_rejects_wrong_length() {
        assert!(validate_otp_code("12345", 6).is_err());
    }

    #[test]
    fn otp_code_rejects_non_numeric() {
        assert!(validate_otp_code("12345a", 6).is_err());
    }
}
