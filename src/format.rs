//! Display formatting for signal fields

use chrono::{DateTime, TimeZone, Utc};

/// Default pattern for the "Generated" row, e.g. `3:04:05 PM`
pub const DEFAULT_TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Enough fraction digits to print any finite f64 exactly
const EXACT_DIGITS: usize = 1100;

/// 0.8234 -> "82.3%"
pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", to_fixed(confidence * 100.0, 1))
}

/// Prices are shown to five decimal places (pipette precision)
pub fn format_price(price: f64) -> String {
    to_fixed(price, 5)
}

/// 2.5 -> "1:2.50"
pub fn format_risk_reward(ratio: f64) -> String {
    format!("1:{}", to_fixed(ratio, 2))
}

/// Fixed-point text rounded half away from zero on the exact binary value,
/// so 2.125 -> "2.13" where `{:.2}` would give "2.12".
pub fn to_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let (kept, dropped) = frac_part.split_at(digits.min(frac_part.len()));

    let mut out: Vec<u8> = int_part.bytes().chain(kept.bytes()).collect();
    if dropped.as_bytes().first().is_some_and(|d| *d >= b'5') {
        // Carry through trailing nines
        let mut i = out.len();
        loop {
            if i == 0 {
                out.insert(0, b'1');
                break;
            }
            i -= 1;
            if out[i] == b'9' {
                out[i] = b'0';
            } else {
                out[i] += 1;
                break;
            }
        }
    }

    let split = out.len() - kept.len();
    let mut text = String::with_capacity(out.len() + 2);
    if value < 0.0 {
        text.push('-');
    }
    text.push_str(&String::from_utf8_lossy(&out[..split]));
    if digits > 0 {
        text.push('.');
        text.push_str(&String::from_utf8_lossy(&out[split..]));
    }
    text
}

pub fn format_status(status: &str) -> String {
    status.to_uppercase()
}

/// Time of day of `ts` as seen in `tz`
pub fn format_time<Tz>(ts: &DateTime<Utc>, tz: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(pattern).to_string()
}
