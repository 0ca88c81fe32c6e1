//! Conversion of a single labor duration cell into decimal hours.
//!
//! Exports encode durations inconsistently: true elapsed-time cells, Excel
//! time-of-day serials, day fractions, free text. A cell is first classified
//! into a [`DurationInput`] and each variant has exactly one conversion, tried
//! in this order:
//!
//! 1. missing → `0.0`
//! 2. duration → total seconds / 3600
//! 3. timestamp → hour of day (`h + m/60 + s/3600`)
//! 4. clock time → hour of day
//! 5. numeric → `v * 24` when `0 <= v <= 1`, otherwise `v`
//! 6. text → duration string, then date-time string, then bare number
//! 7. anything else → `0.0`
//!
//! Timestamps and clock times resolve to the hour of day, not an elapsed
//! duration: a cell reading `14:00` on a date counts as 14 hours.
//!
//! [`normalize`] never fails; negative or non-finite results become `0.0`.

use crate::domain::model::CellValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use regex::Regex;
use std::sync::LazyLock;

const SECONDS_PER_HOUR: f64 = 3600.0;
const HOURS_PER_DAY: f64 = 24.0;

static CLOCK_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<days>\d+)\s*days?,?\s*)?(?P<h>\d+):(?P<m>\d{1,2})(?::(?P<s>\d{1,2}(?:\.\d+)?))?$",
    )
    .expect("clock duration pattern is valid")
});

static UNIT_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s*\d+(?:\.\d+)?\s*[A-Za-z]+\s*)+$").expect("unit duration pattern is valid")
});

static UNIT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<value>\d+(?:\.\d+)?)\s*(?P<unit>[A-Za-z]+)").expect("unit token pattern is valid")
});

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^P(?:(?P<d>\d+(?:\.\d+)?)D)?(?:T(?:(?P<h>\d+(?:\.\d+)?)H)?(?:(?P<m>\d+(?:\.\d+)?)M)?(?:(?P<s>\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("ISO duration pattern is valid")
});

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

const CLOCK_FORMATS: [&str; 2] = ["%I:%M %p", "%I:%M:%S %p"];

/// A duration cell after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationInput<'a> {
    Missing,
    Duration(TimeDelta),
    Timestamp(NaiveDateTime),
    ClockTime(NaiveTime),
    Numeric(f64),
    Text(&'a str),
    Unrecognized,
}

pub fn classify(value: &CellValue) -> DurationInput<'_> {
    if value.is_null() {
        return DurationInput::Missing;
    }
    match value {
        CellValue::Duration(d) => DurationInput::Duration(*d),
        CellValue::DateTime(dt) => DurationInput::Timestamp(*dt),
        CellValue::Time(t) => DurationInput::ClockTime(*t),
        CellValue::Number(v) => DurationInput::Numeric(*v),
        CellValue::Text(s) => DurationInput::Text(s.as_str()),
        CellValue::Bool(_) | CellValue::Empty => DurationInput::Unrecognized,
    }
}

/// Decimal hours for one raw duration cell. Always finite and `>= 0`.
pub fn normalize(value: &CellValue) -> f64 {
    let hours = match classify(value) {
        DurationInput::Missing | DurationInput::Unrecognized => 0.0,
        DurationInput::Duration(d) => duration_hours(d),
        DurationInput::Timestamp(dt) => hour_of_day(dt.time()),
        DurationInput::ClockTime(t) => hour_of_day(t),
        DurationInput::Numeric(v) => numeric_hours(v),
        DurationInput::Text(s) => text_hours(s).unwrap_or(0.0),
    };
    sanitize(hours)
}

fn sanitize(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

fn duration_hours(d: TimeDelta) -> f64 {
    d.num_milliseconds() as f64 / 1000.0 / SECONDS_PER_HOUR
}

fn hour_of_day(t: NaiveTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / SECONDS_PER_HOUR
}

fn numeric_hours(v: f64) -> f64 {
    // [0, 1] is read as a fraction of a day (Excel time serial)
    if (0.0..=1.0).contains(&v) {
        v * HOURS_PER_DAY
    } else {
        v
    }
}

fn text_hours(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(d) = parse_duration_text(text) {
        return Some(duration_hours(d));
    }
    if let Some(t) = parse_datetime_text(text) {
        return Some(hour_of_day(t));
    }
    text.parse::<f64>().ok()
}

/// Parses `H:MM[:SS]` (optionally prefixed by `N days`), unit sequences such as
/// `1h30m` or `2 hours 15 min`, and ISO-8601 durations like `PT1H30M`.
pub fn parse_duration_text(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };

    let seconds = parse_clock_duration(body)
        .or_else(|| parse_iso_duration(body))
        .or_else(|| parse_unit_duration(body))?;

    let millis = (seconds * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(millis as i64)?;
    Some(if negative { -delta } else { delta })
}

fn parse_clock_duration(text: &str) -> Option<f64> {
    let caps = CLOCK_DURATION.captures(text)?;
    let days: f64 = match caps.name("days") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let hours: f64 = caps["h"].parse().ok()?;
    let minutes: f64 = caps["m"].parse().ok()?;
    let seconds: f64 = match caps.name("s") {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }
    Some(days * 86_400.0 + hours * SECONDS_PER_HOUR + minutes * 60.0 + seconds)
}

fn parse_iso_duration(text: &str) -> Option<f64> {
    let caps = ISO_DURATION.captures(text)?;
    let mut total = 0.0;
    let mut matched = false;
    for (name, scale) in [("d", 86_400.0), ("h", SECONDS_PER_HOUR), ("m", 60.0), ("s", 1.0)] {
        if let Some(m) = caps.name(name) {
            total += m.as_str().parse::<f64>().ok()? * scale;
            matched = true;
        }
    }
    matched.then_some(total)
}

fn parse_unit_duration(text: &str) -> Option<f64> {
    if !UNIT_DURATION.is_match(text) {
        return None;
    }
    let mut total = 0.0;
    for caps in UNIT_TOKEN.captures_iter(text) {
        let value: f64 = caps["value"].parse().ok()?;
        total += value * unit_seconds(&caps["unit"])?;
    }
    Some(total)
}

fn unit_seconds(unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "w" | "wk" | "wks" | "week" | "weeks" => Some(7.0 * 86_400.0),
        "d" | "day" | "days" => Some(86_400.0),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(SECONDS_PER_HOUR),
        "m" | "min" | "mins" | "minute" | "minutes" | "t" => Some(60.0),
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => Some(0.001),
        _ => None,
    }
}

/// Time-of-day component of a date-time or clock string.
pub fn parse_datetime_text(text: &str) -> Option<NaiveTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local().time());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.time());
        }
    }
    for fmt in DATE_FORMATS {
        if NaiveDate::parse_from_str(text, fmt).is_ok() {
            return Some(NaiveTime::MIN);
        }
    }
    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}
