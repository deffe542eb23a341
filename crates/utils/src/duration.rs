//! Duration literals such as `500ms`, `30s`, `10m`, `2h`, `1d`

use merchant_core::{Error, Result};
use std::time::Duration;

const UNITS: &[(&str, u64)] = &[
    ("ms", 1),
    ("s", 1_000),
    ("m", 60_000),
    ("h", 3_600_000),
    ("d", 86_400_000),
];

/// Parse `<integer><unit>` where unit is one of `ms`, `s`, `m`, `h`, `d`
pub fn parse_duration(literal: &str) -> Result<Duration> {
    let trimmed = literal.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| Error::invalid_duration(literal, "missing unit (ms, s, m, h, d)"))?;
    let (digits, unit) = trimmed.split_at(split);

    if digits.is_empty() {
        return Err(Error::invalid_duration(literal, "missing amount"));
    }
    let amount: u64 = digits
        .parse()
        .map_err(|_| Error::invalid_duration(literal, "amount out of range"))?;

    let millis_per_unit = UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, millis)| *millis)
        .ok_or_else(|| Error::invalid_duration(literal, format!("unknown unit '{unit}'")))?;

    amount
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| Error::invalid_duration(literal, "amount out of range"))
}

/// Render a duration using the largest unit that divides it exactly
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }
    for (name, unit) in UNITS.iter().rev() {
        let unit = u128::from(*unit);
        if millis % unit == 0 {
            return format!("{}{name}", millis / unit);
        }
    }
    format!("{millis}ms")
}
