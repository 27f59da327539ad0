//! Date header parsing across the formats mail servers actually send

use chrono::{DateTime, FixedOffset};

use crate::error::{CodecError, Result};

/// Named zone abbreviations seen in the wild, as offsets from UTC in hours.
/// Unknown abbreviations parse as UTC.
const NAMED_ZONES: &[(&str, i32)] = &[
    ("UT", 0),
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("EST", -5),
    ("EDT", -4),
    ("CST", -6),
    ("CDT", -5),
    ("MST", -7),
    ("MDT", -6),
    ("PST", -8),
    ("PDT", -7),
    ("CET", 1),
    ("CEST", 2),
    ("BST", 1),
    ("IST", 5),
    ("JST", 9),
];

type Strategy = fn(&str) -> Option<DateTime<FixedOffset>>;

const STRATEGIES: [Strategy; 4] = [rfc2822_numeric, rfc2822_named_zone, loose_day, rfc3339];

/// Parse a date header, trying each supported format in order.
///
/// Formats: RFC 2822 with numeric zone, RFC 2822 with a named zone,
/// a variant with an unpadded day and optional weekday, and RFC 3339.
pub fn parse_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    let cleaned = strip_zone_comment(raw.trim());
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(cleaned))
        .ok_or_else(|| CodecError::DateFormat(raw.to_string()))
}

/// Drop a trailing `(CEST)`-style comment.
fn strip_zone_comment(s: &str) -> &str {
    match s.rfind('(') {
        Some(open) if s.ends_with(')') => s[..open].trim_end(),
        _ => s,
    }
}

fn rfc2822_numeric(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(s).ok()
}

fn rfc2822_named_zone(s: &str) -> Option<DateTime<FixedOffset>> {
    let (rest, zone) = s.rsplit_once(' ')?;
    if zone.is_empty() || !zone.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let hours = NAMED_ZONES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(zone))
        .map_or(0, |(_, hours)| *hours);
    let sign = if hours < 0 { '-' } else { '+' };
    let numeric = format!("{rest} {sign}{:02}00", hours.abs());
    DateTime::parse_from_rfc2822(&numeric).ok()
}

fn loose_day(s: &str) -> Option<DateTime<FixedOffset>> {
    const FORMATS: [&str; 4] = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M:%S %z",
        "%a, %d %b %Y %H:%M %z",
        "%d %b %Y %H:%M %z",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
}

fn rfc3339(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
