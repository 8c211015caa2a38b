//! Linear time normalization.
//!
//! Layout only ever compares plain `f64` coordinates. Hosts supply a [`TimeNormalizer`] that maps
//! whatever a dataset stores (numbers, calendar dates, geological ages) onto one linear axis.
//! [`CalendarNormalizer`] is the default: it measures time in decimal years using astronomical
//! year numbering (1 BCE is year 0), so cosmological ages and sub-second timestamps share a
//! single axis.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Reference year for "years before present" units (radiocarbon convention).
pub const BEFORE_PRESENT_EPOCH: f64 = 1950.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    #[error("unparseable time value: {input:?}")]
    Unparseable { input: String },
}

/// A raw time value as stored in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Number(n) => write!(f, "{n}"),
            TimeValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for TimeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for TimeValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for TimeValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<&str> for TimeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Maps dataset time values onto the linear layout axis.
///
/// Implementations must be deterministic: the same value always yields the same coordinate,
/// and coordinates must order the way the underlying times do.
pub trait TimeNormalizer {
    fn normalize(&self, value: &TimeValue) -> Result<f64, TimeError>;

    /// Coordinate used for the end of ongoing periods.
    fn now(&self) -> f64;

    fn normalize_end(&self, value: Option<&TimeValue>) -> Result<f64, TimeError> {
        match value {
            Some(v) => self.normalize(v),
            None => Ok(self.now()),
        }
    }
}

/// Decimal-year normalizer for numbers, calendar years, ISO dates and geological ages.
///
/// Accepted text forms (case-insensitive, surrounding whitespace ignored):
/// - `"now"`, `"present"`, `"today"`
/// - plain numbers: `"1950"`, `"-500"`, `"1950.25"`
/// - era suffixes: `"500 BCE"`, `"44 BC"`, `"800 CE"`, `"1066 AD"`
/// - ages before 1950: `"12 ka"`, `"66 Ma"`, `"13.8 Ga"` (also `kya`, `mya`, `bya`)
/// - ISO 8601: `"2001-09-11"`, `"2001-09"`, `"2001-09-11T08:46:40.123Z"`, naive date-times
///
/// "Now" is read from the system clock once, when the normalizer is built, so every value it
/// normalizes (and every layout that reuses it) sees the same instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarNormalizer {
    now: f64,
}

impl Default for CalendarNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarNormalizer {
    pub fn new() -> Self {
        Self::with_now(current_year())
    }

    /// Pins "now" to a fixed decimal year, for reproducible layouts.
    pub fn with_now(now: f64) -> Self {
        Self { now }
    }

    fn parse_text(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();

        if matches!(lower.as_str(), "now" | "present" | "today") {
            return Some(self.now());
        }

        if let Ok(v) = lower.parse::<f64>() {
            return v.is_finite().then_some(v);
        }

        if let Some(v) = parse_with_unit(&lower) {
            return Some(v);
        }

        parse_iso(trimmed)
    }
}

impl TimeNormalizer for CalendarNormalizer {
    fn normalize(&self, value: &TimeValue) -> Result<f64, TimeError> {
        let parsed = match value {
            TimeValue::Number(n) => n.is_finite().then_some(*n),
            TimeValue::Text(s) => self.parse_text(s),
        };
        parsed.ok_or_else(|| TimeError::Unparseable {
            input: value.to_string(),
        })
    }

    fn now(&self) -> f64 {
        self.now
    }
}

fn current_year() -> f64 {
    decimal_year(Utc::now().naive_utc()).unwrap_or(BEFORE_PRESENT_EPOCH)
}

fn unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?\d+(?:\.\d+)?)\s*(bce|bc|ce|ad|ka|kya|ma|mya|ga|bya)$")
            .expect("valid regex")
    })
}

fn parse_with_unit(lower: &str) -> Option<f64> {
    let caps = unit_re().captures(lower)?;
    let n: f64 = caps.get(1)?.as_str().parse().ok()?;
    let v = match caps.get(2)?.as_str() {
        "bce" | "bc" => 1.0 - n,
        "ce" | "ad" => n,
        "ka" | "kya" => BEFORE_PRESENT_EPOCH - n * 1e3,
        "ma" | "mya" => BEFORE_PRESENT_EPOCH - n * 1e6,
        "ga" | "bya" => BEFORE_PRESENT_EPOCH - n * 1e9,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn parse_iso(s: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return decimal_year(dt.with_timezone(&Utc).naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return decimal_year(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return decimal_year(date.and_hms_opt(0, 0, 0)?);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return decimal_year(date.and_hms_opt(0, 0, 0)?);
    }
    None
}

/// Converts a UTC wall-clock instant into `year + elapsed fraction of that year`.
pub fn decimal_year(naive: NaiveDateTime) -> Option<f64> {
    let year = naive.year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let elapsed = (naive - start).num_nanoseconds()? as f64;
    let total = (end - start).num_nanoseconds()? as f64;
    Some(f64::from(year) + elapsed / total)
}
