//! Text helpers for addresses, signatures and block times.

use chrono::DateTime;
use chrono::Local;
use chrono::TimeZone;
use chrono::Utc;
use std::fmt::Display;

/// Shown in place of a block time the node did not report.
pub const NOT_AVAILABLE: &str = "N/A";

const ABBREVIATION_EDGE: usize = 4;

/// Shortens `text` to its first and last four characters, e.g. `9xQe...VFin`.
///
/// Counts characters, not bytes. Texts shorter than eight characters keep
/// overlapping head and tail.
pub fn abbreviate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let head: String = chars.iter().take(ABBREVIATION_EDGE).collect();
    let tail: String = chars[chars.len().saturating_sub(ABBREVIATION_EDGE)..]
        .iter()
        .collect();
    format!("{head}...{tail}")
}

/// Formats a block time (seconds since the epoch) in local time.
pub fn format_block_time(block_time: Option<i64>) -> String {
    format_block_time_in(block_time, &Local)
}

/// Formats a block time in `tz`, like `11/14/2023, 10:13:20 PM`.
pub fn format_block_time_in<Tz: TimeZone>(block_time: Option<i64>, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    let Some(seconds) = block_time else {
        return NOT_AVAILABLE.to_string();
    };

    seconds
        .checked_mul(1000)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|utc| {
            utc.with_timezone(tz)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        })
        .unwrap_or_else(|| "Invalid Date".to_string())
}
