//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Formats a money amount as Brazilian reais.
///
/// Usage in templates: `{{ bike.valor_hora|brl }}`
#[askama::filter_fn]
pub fn brl(value: &Decimal, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_brl(*value))
}

/// Formats a date as `dd/mm/aaaa`.
///
/// Usage in templates: `{{ sale.date_details.data|date_br }}`
#[askama::filter_fn]
pub fn date_br(value: &NaiveDate, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(value.format("%d/%m/%Y").to_string())
}

/// Formats a date and time as `dd/mm/aaaa hh:mm`.
///
/// Usage in templates: `{{ rental.rental_start|datetime_br }}`
#[askama::filter_fn]
pub fn datetime_br(value: &NaiveDateTime, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_datetime_br(*value))
}

/// Applies the CPF display mask to a digit string.
///
/// Usage in templates: `{{ customer.cpf|cpf_mask }}`
#[askama::filter_fn]
pub fn cpf_mask(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(wheels_core::cpf::format(&value.to_string()))
}

/// Applies the phone display mask to a digit string.
///
/// Usage in templates: `{{ customer.celular|celular_mask }}`
#[askama::filter_fn]
pub fn celular_mask(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(wheels_core::phone::format(&value.to_string()))
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Render a date and time as `dd/mm/aaaa hh:mm`, outside template context.
#[must_use]
pub fn format_datetime_br(value: NaiveDateTime) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Render a `Decimal` as `R$ 1.234,56`.
#[must_use]
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    // Group the integer part in threes with '.' separators
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let cents = format!("{frac_part:0<2}");
    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents}")
}
