//! Tick label text.
//!
//! Tick values are `index × mantissa × 10^exponent`, so they are formatted
//! straight from integers and never pass through floating point.

use crate::core::interval::GridInterval;

/// Typographic minus sign used in place of ASCII `-`.
pub const MINUS_SIGN: char = '\u{2212}';

/// Label text for the `index`-th multiple of `interval`.
pub fn format_tick(index: i128, interval: &GridInterval, exponential_at: i32) -> String {
    let coefficient = index * i128::from(interval.mantissa());
    format_scaled(coefficient, interval.exponent(), exponential_at)
}

/// Formats `coefficient × 10^exponent`.
///
/// Plain notation is used while the leading digit's decimal exponent stays
/// strictly between `-exponential_at` and `exponential_at`; beyond that the
/// value is written as `d.ddde+N`.
pub fn format_scaled(coefficient: i128, exponent: i32, exponential_at: i32) -> String {
    if coefficient == 0 {
        return "0".to_string();
    }

    let mut magnitude = coefficient.unsigned_abs();
    let mut exponent = exponent;
    while magnitude % 10 == 0 {
        magnitude /= 10;
        exponent += 1;
    }
    let digits = magnitude.to_string();
    let leading = exponent + digits.len() as i32 - 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if coefficient < 0 {
        out.push('-');
    }
    if leading >= exponential_at || leading <= -exponential_at {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if leading < 0 { '-' } else { '+' });
        out.push_str(&leading.unsigned_abs().to_string());
    } else if exponent >= 0 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take(exponent as usize));
    } else {
        let whole = digits.len() as i32 + exponent;
        if whole > 0 {
            let (int_part, frac_part) = digits.split_at(whole as usize);
            out.push_str(int_part);
            out.push('.');
            out.push_str(frac_part);
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(whole.unsigned_abs() as usize));
            out.push_str(&digits);
        }
    }

    out.replace('-', &MINUS_SIGN.to_string())
}
