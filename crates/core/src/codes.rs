use rand::{distributions::Alphanumeric, Rng};

/// Generate a bus booking reference (BT-XXXXX).
pub fn generate_bus_booking_code() -> String {
    generate_code("BT")
}

/// Generate a lounge booking reference (LG-XXXXX).
pub fn generate_lounge_booking_code() -> String {
    generate_code("LG")
}

fn generate_code(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("{}-{}", prefix, suffix.to_uppercase())
}

/// Generate a fixed-width numeric OTP code, e.g. "048213" for length 6.
pub fn generate_otp_code(length: u32) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.gen_range(0..10).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_booking_code_has_expected_prefix_and_length() {
        let code = generate_bus_booking_code();
        assert!(code.starts_with("BT-"));
        assert_eq!(code.len(), 9);
    }

    #[test]
    fn otp_code_has_requested_length_and_is_numeric() {
        let code = generate_otp_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
