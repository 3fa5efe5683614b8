//! Lenient numeric text handling
//!
//! Text headed for a numeric type is first reduced to its *numeric core*:
//! only digits and (when fractions are allowed) a single decimal separator
//! survive, and the result is negative only when the text itself starts
//! with `-`. `"$1,234.50"` therefore becomes `"1.23450"` with fractions and
//! `"1"` without. Empty input yields `"0"`.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Reduce `text` to its numeric core
///
/// With `fractions` disabled the core ends at the first `.` or `,`. With
/// `fractions` enabled the first separator is kept (as `.`) and later
/// separators are skipped.
pub fn numeric_core(text: &str, fractions: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut seen_separator = false;
    for c in text.chars() {
        match c {
            '0'..='9' => out.push(c),
            '.' | ',' => {
                if !fractions {
                    break;
                }
                if !seen_separator {
                    seen_separator = true;
                    out.push('.');
                }
            }
            _ => {}
        }
    }

    if out.ends_with('.') {
        out.pop();
    }
    if out.starts_with('.') {
        out.insert(0, '0');
    }
    if out.is_empty() || out == "0" {
        return "0".to_string();
    }
    if text.starts_with('-') {
        out.insert(0, '-');
    }
    out
}

/// Interpret text as a boolean through its numeric value
///
/// False when the numeric core is `0` or `0.0` or negative, true otherwise.
/// The test is on the text of the core, so `"0.00"` and `"00"` are true.
pub fn number_text_to_bool(text: &str) -> bool {
    let core = numeric_core(text, true);
    !(core.is_empty() || core == "0" || core == "0.0" || core.contains('-'))
}

/// Parse the integral numeric core of `text`
pub fn parse_integral(text: &str) -> Option<i64> {
    numeric_core(text, false).parse::<i64>().ok()
}

/// Parse the integral numeric core of `text` without range limits
pub fn parse_big_integer(text: &str) -> Option<BigInt> {
    BigInt::from_str(&numeric_core(text, false)).ok()
}

/// Parse the fractional numeric core of `text`
pub fn parse_fractional(text: &str) -> Option<f64> {
    numeric_core(text, true).parse::<f64>().ok()
}

/// Parse the fractional numeric core of `text` as an exact decimal
pub fn parse_big_decimal(text: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(&numeric_core(text, true)).ok()
}

/// Lowest 64 bits of an integer, two's complement, as a signed value
///
/// Mirrors a narrowing cast: values that fit are returned unchanged,
/// larger ones wrap.
pub fn bigint_low_i64(value: &BigInt) -> i64 {
    if let Some(v) = value.to_i64() {
        return v;
    }
    let bytes = value.to_signed_bytes_le();
    let fill = if value.sign() == num_bigint::Sign::Minus {
        0xFF
    } else {
        0x00
    };
    let mut buf = [fill; 8];
    for (slot, byte) in buf.iter_mut().zip(bytes.iter()) {
        *slot = *byte;
    }
    i64::from_le_bytes(buf)
}

/// Integer part of a decimal, truncated toward zero
pub fn decimal_to_integer(value: &BigDecimal) -> BigInt {
    let (digits, scale) = value.with_scale(0).into_bigint_and_exponent();
    debug_assert_eq!(scale, 0);
    digits
}
