//! CPF masking and validation.
//!
//! The CPF (Cadastro de Pessoas Físicas) is the Brazilian taxpayer number:
//! eleven digits, the last two being check digits. [`format`] applies the
//! display mask progressively as the user types; [`validate`] implements the
//! standard two-check-digit algorithm.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Length of a bare CPF (digits only).
pub const CPF_DIGITS: usize = 11;

/// Length of a fully masked CPF (`000.000.000-00`).
pub const CPF_MASKED_LEN: usize = 14;

/// Errors that can occur when validating a CPF.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpfError {
    /// The input does not contain exactly eleven digits.
    #[error("CPF must contain exactly 11 digits")]
    InvalidLength,
    /// All eleven digits are identical (e.g. `111.111.111-11`). These pass
    /// the checksum but are not valid CPFs.
    #[error("CPF digits cannot all be identical")]
    RepeatedDigits,
    /// One of the two check digits does not match the computed value.
    #[error("CPF check digits do not match")]
    CheckDigitMismatch,
}

/// A validated CPF, stored as its eleven digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Parse and validate a CPF from arbitrary user input.
    ///
    /// Non-digit characters (mask punctuation, whitespace) are stripped
    /// before validation, so both `529.982.247-25` and `52998224725` parse.
    ///
    /// # Errors
    ///
    /// Returns [`CpfError`] if the digit count, repetition rule, or either
    /// check digit fails.
    pub fn parse(input: &str) -> Result<Self, CpfError> {
        let cleaned = digits(input);
        validate(&cleaned)?;
        Ok(Self(cleaned))
    }

    /// The bare eleven digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The masked display form (`000.000.000-00`).
    #[must_use]
    pub fn masked(&self) -> String {
        format(&self.0)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip everything but ASCII digits from the input.
#[must_use]
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Apply the CPF display mask progressively.
///
/// Mirrors the as-you-type behavior of the registration form: up to three
/// digits pass through unchanged, a dot appears after the third and sixth
/// digit, a dash before the check digits, and the result is truncated at the
/// full mask length.
///
/// ```
/// use wheels_core::cpf::format;
///
/// assert_eq!(format("529"), "529");
/// assert_eq!(format("5299822"), "529.982.2");
/// assert_eq!(format("52998224725"), "529.982.247-25");
/// ```
#[must_use]
pub fn format(input: &str) -> String {
    let cleaned = digits(input);
    let mut formatted = String::with_capacity(CPF_MASKED_LEN);

    for (i, c) in cleaned.chars().take(CPF_DIGITS).enumerate() {
        match i {
            3 | 6 => formatted.push('.'),
            9 => formatted.push('-'),
            _ => {}
        }
        formatted.push(c);
    }

    formatted
}

/// Validate a digit-only CPF against the standard checksum algorithm.
///
/// Each check digit is a weighted digit sum modulo 11, with remainders of
/// 10 and 11 normalized to 0. All-repeated-digit sequences are rejected
/// up front regardless of checksum.
///
/// # Errors
///
/// Returns [`CpfError`] describing the first rule that failed.
pub fn validate(cpf: &str) -> Result<(), CpfError> {
    let cleaned = digits(cpf);
    if cleaned.len() != CPF_DIGITS {
        return Err(CpfError::InvalidLength);
    }

    let nums: Vec<u32> = cleaned
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();

    let first = nums[0];
    if nums.iter().all(|&d| d == first) {
        return Err(CpfError::RepeatedDigits);
    }

    if check_digit(&nums[..9]) != nums[9] || check_digit(&nums[..10]) != nums[10] {
        return Err(CpfError::CheckDigitMismatch);
    }

    Ok(())
}

/// Compute a check digit over a digit prefix.
///
/// Weights run from `len + 1` down to 2; the digit is `11 - (sum mod 11)`,
/// normalized to 0 when the remainder is below 2.
fn check_digit(prefix: &[u32]) -> u32 {
    let len = u32::try_from(prefix.len()).unwrap_or(0);
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (len + 1 - u32::try_from(i).unwrap_or(0)))
        .sum();

    let rem = sum % 11;
    if rem < 2 { 0 } else { 11 - rem }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progressive_boundaries() {
        assert_eq!(format(""), "");
        assert_eq!(format("5"), "5");
        assert_eq!(format("529"), "529");
        assert_eq!(format("5299"), "529.9");
        assert_eq!(format("529982"), "529.982");
        assert_eq!(format("5299822"), "529.982.2");
        assert_eq!(format("529982247"), "529.982.247");
        assert_eq!(format("5299822472"), "529.982.247-2");
        assert_eq!(format("52998224725"), "529.982.247-25");
    }

    #[test]
    fn test_format_strips_punctuation_and_truncates() {
        assert_eq!(format("529.982.247-25"), "529.982.247-25");
        // Extra digits beyond eleven are discarded
        assert_eq!(format("529982247259999"), "529.982.247-25");
        assert_eq!(format("abc529"), "529");
    }

    #[test]
    fn test_validate_known_good() {
        assert_eq!(validate("52998224725"), Ok(()));
        assert_eq!(validate("11144477735"), Ok(()));
        // Masked input is accepted
        assert_eq!(validate("529.982.247-25"), Ok(()));
    }

    #[test]
    fn test_validate_zero_check_digit() {
        // First check digit computes to a remainder of 1, normalized to 0
        assert_eq!(validate("12345678909"), Ok(()));
    }

    #[test]
    fn test_validate_wrong_length() {
        assert_eq!(validate(""), Err(CpfError::InvalidLength));
        assert_eq!(validate("5299822472"), Err(CpfError::InvalidLength));
        assert_eq!(validate("529982247255"), Err(CpfError::InvalidLength));
    }

    #[test]
    fn test_validate_repeated_digits_rejected() {
        for d in 0..=9 {
            let cpf: String = std::iter::repeat_n(char::from(b'0' + d), 11).collect();
            assert_eq!(validate(&cpf), Err(CpfError::RepeatedDigits), "{cpf}");
        }
    }

    #[test]
    fn test_validate_check_digit_mismatch() {
        assert_eq!(validate("52998224724"), Err(CpfError::CheckDigitMismatch));
        assert_eq!(validate("52998224735"), Err(CpfError::CheckDigitMismatch));
    }

    #[test]
    fn test_cpf_parse_and_mask() {
        let cpf = Cpf::parse("529.982.247-25").unwrap();
        assert_eq!(cpf.as_str(), "52998224725");
        assert_eq!(cpf.masked(), "529.982.247-25");
        assert!(Cpf::parse("111.111.111-11").is_err());
    }
}
