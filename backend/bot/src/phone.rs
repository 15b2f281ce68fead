//! Phone number canonicalization for the registration handshake.

/// Normalize a phone number to the canonical `+<digits>` form used for
/// directory lookups. Transports deliver numbers with or without the
/// leading `+` and with arbitrary spacing and punctuation.
pub fn normalize_phone_number(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("+{digits}")
}
