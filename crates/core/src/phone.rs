//! Brazilian phone (celular) masking and validation.
//!
//! Numbers carry a two-digit area code (DDD) followed by either an
//! eight-digit landline or a nine-digit mobile number. [`format`] applies
//! the display mask progressively as the user types; full numbers render as
//! `(00) 0000-0000` (10 digits) or `(00) 00000-0000` (11 digits).

/// Minimum digit count for a valid number (DDD + landline).
pub const PHONE_MIN_DIGITS: usize = 10;

/// Maximum digit count for a valid number (DDD + mobile).
pub const PHONE_MAX_DIGITS: usize = 11;

/// Errors that can occur when validating a phone number.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    /// The input does not contain 10 or 11 digits.
    #[error("phone must contain 10 or 11 digits including the area code")]
    InvalidLength,
}

/// Apply the phone display mask progressively.
///
/// Shapes by digit count:
/// - 1-2 digits: `(0`, `(00`
/// - 3-6 digits: `(00) 0000`
/// - 7-10 digits: `(00) 0000-0000` (landline grouping)
/// - 11 digits: `(00) 00000-0000` (mobile grouping)
///
/// Digits past eleven are discarded.
#[must_use]
pub fn format(input: &str) -> String {
    let cleaned = crate::cpf::digits(input);
    let len = cleaned.len().min(PHONE_MAX_DIGITS);
    let d = &cleaned[..len];

    match len {
        0 => String::new(),
        1..=2 => format!("({d}"),
        3..=6 => format!("({}) {}", &d[..2], &d[2..]),
        7..=10 => format!("({}) {}-{}", &d[..2], &d[2..6], &d[6..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
    }
}

/// Validate a phone number's digit count (10 or 11 digits with DDD).
///
/// # Errors
///
/// Returns [`PhoneError::InvalidLength`] otherwise.
pub fn validate(input: &str) -> Result<(), PhoneError> {
    let len = crate::cpf::digits(input).len();
    if (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&len) {
        Ok(())
    } else {
        Err(PhoneError::InvalidLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty() {
        assert_eq!(format(""), "");
        assert_eq!(format("abc"), "");
    }

    #[test]
    fn test_format_area_code_boundary() {
        assert_eq!(format("1"), "(1");
        assert_eq!(format("11"), "(11");
        assert_eq!(format("119"), "(11) 9");
    }

    #[test]
    fn test_format_partial_number() {
        assert_eq!(format("119876"), "(11) 9876");
        // The dash locks into the landline position until an 11th digit arrives
        assert_eq!(format("1198765"), "(11) 9876-5");
    }

    #[test]
    fn test_format_landline_boundary() {
        // 10 digits: 4-4 grouping after the DDD
        assert_eq!(format("1133334444"), "(11) 3333-4444");
    }

    #[test]
    fn test_format_mobile_boundary() {
        // 11 digits: 5-4 grouping after the DDD
        assert_eq!(format("11987654321"), "(11) 98765-4321");
    }

    #[test]
    fn test_format_truncates_excess() {
        assert_eq!(format("119876543210000"), "(11) 98765-4321");
    }

    #[test]
    fn test_format_strips_existing_mask() {
        assert_eq!(format("(11) 98765-4321"), "(11) 98765-4321");
    }

    #[test]
    fn test_validate_lengths() {
        assert_eq!(validate("1133334444"), Ok(()));
        assert_eq!(validate("11987654321"), Ok(()));
        assert_eq!(validate("(11) 98765-4321"), Ok(()));
        assert_eq!(validate("119876543"), Err(PhoneError::InvalidLength));
        assert_eq!(validate("119876543210"), Err(PhoneError::InvalidLength));
        assert_eq!(validate(""), Err(PhoneError::InvalidLength));
    }
}
