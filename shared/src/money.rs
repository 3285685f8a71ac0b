//! Money formatting and arithmetic for Vietnamese dong
//!
//! The backend sends amounts as JSON numbers (`f64`). All arithmetic is
//! done with `Decimal` and rounded to whole dong, then converted back to
//! `f64` for the wire. Formatting follows the vi-VN locale: `.` groups
//! thousands and the symbol trails after a no-break space.

use rust_decimal::prelude::*;
use std::str::FromStr;

/// Suffix appended by [`format_currency`] (no-break space + dong sign)
pub const CURRENCY_SUFFIX: &str = "\u{a0}₫";

#[inline]
fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Round to whole dong, half away from zero.
fn round_dong(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `1234567.4` → `"1.234.567"`, `-1500` → `"-1.500"`.
///
/// Non-finite input formats as `"0"`.
pub fn format_amount(amount: f64) -> String {
    let rounded = round_dong(to_decimal(amount));
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_thousands(&digits);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// `1234567` → `"1.234.567 ₫"` (with a no-break space).
pub fn format_currency(amount: f64) -> String {
    format!("{}{}", format_amount(amount), CURRENCY_SUFFIX)
}

/// Inverse of [`format_amount`] and [`format_currency`].
///
/// Accepts an optional leading `-`, digits with `.` group separators and
/// an optional trailing `₫`, `đ` or `VND`. Returns `None` for anything else.
pub fn parse_amount(text: &str) -> Option<f64> {
    let mut s = text.trim();
    for suffix in ["₫", "đ", "VND"] {
        if let Some(rest) = s.strip_suffix(suffix) {
            s = rest;
            break;
        }
    }
    let s = s.trim_end_matches(|c: char| c.is_whitespace());
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if body.is_empty() || body.starts_with('.') || body.ends_with('.') {
        return None;
    }
    let mut digits = String::with_capacity(body.len());
    for ch in body.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            '.' => {}
            _ => return None,
        }
    }
    let value = Decimal::from_str(&digits).ok()?;
    Some(to_f64(if negative { -value } else { value }))
}

/// `percent`% of `amount`, rounded to whole dong.
pub fn percent_of(amount: f64, percent: f64) -> f64 {
    let value = to_decimal(amount) * to_decimal(percent) / Decimal::ONE_HUNDRED;
    to_f64(round_dong(value))
}

/// `price × quantity`, rounded to whole dong.
pub fn line_total(price: f64, quantity: i32) -> f64 {
    to_f64(round_dong(to_decimal(price) * Decimal::from(quantity)))
}

/// Exact sum of amounts.
pub fn sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    let total: Decimal = amounts.into_iter().map(to_decimal).sum();
    to_f64(round_dong(total))
}
