//! Duration expressions for token and session lifetimes.
//!
//! Lifetimes are configured as a number followed by a unit: `m` (minutes),
//! `h` (hours), or `d` (days). `"15m"`, `"12h"`, `"7d"`.

use chrono::{DateTime, Duration, Utc};

use crate::error::AppError;

/// Parse a duration expression into a [`chrono::Duration`].
///
/// Fails with a validation error on an unrecognized unit or a malformed
/// amount.
pub fn parse_duration(expr: &str) -> Result<Duration, AppError> {
    let expr = expr.trim();
    let split = expr
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| bad_format(expr))?;

    let (amount, unit) = expr.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| bad_format(expr))?;

    match unit {
        "m" => Ok(Duration::minutes(amount)),
        "h" => Ok(Duration::hours(amount)),
        "d" => Ok(Duration::days(amount)),
        _ => Err(AppError::validation(format!(
            "Unrecognized duration unit '{unit}' in '{expr}'. Expected m, h, or d"
        ))),
    }
}

/// Compute an absolute expiry timestamp: now plus the given expression.
pub fn compute_expiry(expr: &str) -> Result<DateTime<Utc>, AppError> {
    Ok(Utc::now() + parse_duration(expr)?)
}

fn bad_format(expr: &str) -> AppError {
    AppError::validation(format!(
        "Invalid duration expression '{expr}'. Expected <amount><unit>, e.g. 15m, 12h, 7d"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes_hours_days() {
        assert_eq!(parse_duration("15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_duration("12h").unwrap(), Duration::hours(12));
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
    }

    #[test]
    fn test_parse_rejects_unknown_unit() {
        let err = parse_duration("10w").unwrap_err();
        assert!(err.message.contains("Unrecognized duration unit"));
    }

    #[test]
    fn test_parse_rejects_missing_amount_or_unit() {
        assert!(parse_duration("m").is_err());
        assert!(parse_duration("15").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
    }

    #[test]
    fn test_compute_expiry_is_in_the_future() {
        let expiry = compute_expiry("1h").unwrap();
        let delta = expiry - Utc::now();
        assert!(delta > Duration::minutes(59));
        assert!(delta <= Duration::hours(1));
    }
}
