//! Brazilian identifier validation: CPF (person) and CNJ (court case).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// `NNNNNNN-DD.AAAA.J.TR.OOOO`
static CNJ_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{7}-\d{2}\.(\d{4})\.(\d)\.\d{2}\.\d{4}$").expect("valid CNJ regex")
});

/// Earliest accepted CNJ / budget year (1988 Constitution).
pub const MIN_CASE_YEAR: i32 = 1988;
/// Latest accepted CNJ / budget year.
pub const MAX_CASE_YEAR: i32 = 2050;

/// Normalize a CPF to its 11 digits.
///
/// Formatting characters (dots, dashes, spaces) are stripped. The result
/// must have exactly 11 digits and must not be all zeros.
pub fn normalize_cpf(raw: &str) -> Result<String, CoreError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(CoreError::Validation("CPF is required".into()));
    }
    if digits.len() != 11 {
        return Err(CoreError::Validation(
            "CPF must have exactly 11 digits".into(),
        ));
    }
    if digits.bytes().all(|b| b == b'0') {
        return Err(CoreError::Validation("Invalid CPF".into()));
    }
    Ok(digits)
}

/// Render an 11-digit CPF as `000.000.000-00`.
pub fn format_cpf(cpf: &str) -> String {
    if cpf.len() != 11 || !cpf.bytes().all(|b| b.is_ascii_digit()) {
        return cpf.to_string();
    }
    format!("{}.{}.{}-{}", &cpf[0..3], &cpf[3..6], &cpf[6..9], &cpf[9..11])
}

/// Validate a CNJ case number, returning it with spaces removed.
pub fn validate_cnj(raw: &str) -> Result<String, CoreError> {
    let cnj: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let caps = CNJ_PATTERN.captures(&cnj).ok_or_else(|| {
        CoreError::Validation(
            "CNJ must match NNNNNNN-DD.AAAA.J.TR.OOOO (e.g. 1234567-89.2023.8.26.0100)".into(),
        )
    })?;

    let year: i32 = caps[1]
        .parse()
        .map_err(|_| CoreError::Validation("Invalid CNJ year".into()))?;
    if !(MIN_CASE_YEAR..=MAX_CASE_YEAR).contains(&year) {
        return Err(CoreError::Validation(format!(
            "CNJ year must be between {MIN_CASE_YEAR} and {MAX_CASE_YEAR}"
        )));
    }

    if &caps[2] == "0" {
        return Err(CoreError::Validation(
            "CNJ judicial segment (J) must be a digit from 1 to 9".into(),
        ));
    }

    Ok(cnj)
}
