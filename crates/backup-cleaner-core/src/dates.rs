use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

/// Position of the year within a matched pattern.
#[derive(Clone, Copy)]
enum FieldOrder {
    YearFirst,
    DayFirst,
}

lazy_static! {
    /// Recognized date shapes, in priority order. The first pattern that
    /// matches AND yields a calendar-valid date wins.
    static ref DATE_PATTERNS: [(Regex, FieldOrder); 4] = [
        // 2024-01-15
        (Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap(), FieldOrder::YearFirst),
        // 20240115
        (Regex::new(r"(\d{4})(\d{2})(\d{2})").unwrap(), FieldOrder::YearFirst),
        // 15-01-2024
        (Regex::new(r"(\d{2})-(\d{2})-(\d{4})").unwrap(), FieldOrder::DayFirst),
        // 15012024
        (Regex::new(r"(\d{2})(\d{2})(\d{4})").unwrap(), FieldOrder::DayFirst),
    ];
}

/// Infer the logical backup date of a file from its name, falling back to
/// `fallback` (normally the file's mtime truncated to a day) when the name
/// carries no usable date. Never fails.
pub fn extract_date(file_name: &str, fallback: NaiveDate) -> NaiveDate {
    for (pattern, order) in DATE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(file_name) else {
            continue;
        };

        let a: u32 = caps[1].parse().unwrap_or(0);
        let b: u32 = caps[2].parse().unwrap_or(0);
        let c: u32 = caps[3].parse().unwrap_or(0);

        let candidate = match order {
            FieldOrder::YearFirst => valid_date(a as i32, b, c),
            FieldOrder::DayFirst => valid_date(c as i32, b, a),
        };

        // A syntactic match with an impossible date falls through to the
        // next pattern.
        if let Some(date) = candidate {
            return date;
        }
    }

    fallback
}

/// A candidate is valid iff the year is in [2000, 2100] and month/day form a
/// real calendar date (leap years included).
fn valid_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !(2000..=2100).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}
