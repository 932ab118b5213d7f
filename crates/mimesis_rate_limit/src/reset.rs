//! Rate-limit reset hints.
//!
//! Providers report when a limit window resets as a duration string in a
//! response header. Observed forms:
//! - `2000ms`, `20ms`
//! - `2s`, `1.5s`
//! - `1.5` (bare seconds)
//! - `6m0s`, `1h2m3.5s`

use reqwest::header::HeaderMap;
use std::time::Duration;

/// Headers consulted for a reset hint, in order of preference.
pub const RESET_HEADERS: [&str; 3] = [
    "x-ratelimit-reset-requests",
    "x-ratelimit-reset-tokens",
    "retry-after",
];

/// Parse a reset hint into a duration.
///
/// Returns `None` for empty, negative or unrecognised input.
///
/// # Examples
///
/// ```
/// use mimesis_rate_limit::parse_reset_hint;
/// use std::time::Duration;
///
/// assert_eq!(parse_reset_hint("2000ms"), Some(Duration::from_millis(2000)));
/// assert_eq!(parse_reset_hint("2s"), Some(Duration::from_secs(2)));
/// assert_eq!(parse_reset_hint("1.5"), Some(Duration::from_millis(1500)));
/// assert_eq!(parse_reset_hint("6m0s"), Some(Duration::from_secs(360)));
/// assert_eq!(parse_reset_hint("soon"), None);
/// ```
pub fn parse_reset_hint(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(seconds) = raw.parse::<f64>() {
        return millis_to_duration(seconds * 1000.0);
    }

    let mut total_ms = 0.0_f64;
    let mut rest = raw;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3_600_000.0,
            "m" => 60_000.0,
            "s" => 1000.0,
            "ms" => 1.0,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total_ms += value * scale;
    }

    millis_to_duration(total_ms)
}

/// The first parseable reset hint among [`RESET_HEADERS`].
pub fn reset_hint_from_headers(headers: &HeaderMap) -> Option<Duration> {
    RESET_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name)?.to_str().ok())
        .find_map(parse_reset_hint)
}

fn millis_to_duration(millis: f64) -> Option<Duration> {
    if millis.is_finite() && millis >= 0.0 {
        Some(Duration::from_micros((millis * 1000.0).round() as u64))
    } else {
        None
    }
}
