//! Lenient date parsing and rendering
//!
//! [`DateCoercion`] turns arbitrary text into an instant by trying, in
//! order: the literal `now`, a cache of earlier results, epoch milliseconds
//! (text of digits and dots), a fixed list of common date-time layouts, the
//! time-of-day tails of those layouts (dated 1970-01-01), and finally the
//! numeric core of the text as epoch milliseconds.
//!
//! Layouts without an explicit offset are read in the configured zone.
//! Rendering uses the configured format and zone, or epoch milliseconds when
//! timestamps are disabled. Both directions are memoized in bounded caches.

use crate::numeric::parse_integral;
use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use doctree_core::config::{self, Config, ZoneSetting};
use doctree_core::{Cache, ConversionError, ValueType};
use once_cell::sync::Lazy;
use tracing::{debug, trace};

/// Layouts tried in order, as strftime-style patterns
///
/// `%#z` accepts `Z`, `+hh`, `+hhmm` and `+hh:mm`. Zone names such as `GMT`
/// or `CET` are rewritten to offsets before matching (see [`ZONE_NAMES`]),
/// so the space-separated `%#z` layouts cover them. `%Z` skips an unknown
/// zone name, which then reads as the configured zone.
const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%a %b %d %H:%M:%S %#z %Y",
    "%a %b %d %H:%M:%S %Z %Y",
    "%b %d, %Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M %#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S %#z",
    "%Y-%m-%d %H:%M:%S%#z",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f %#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M %#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S %#z",
    "%Y-%m-%dT%H:%M:%S%#z",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f %#z",
    "%Y-%m-%d",
    "%Y-%m-%d %#z",
    "%Y-%m-%d%#z",
];

/// Zone abbreviations and their offsets from UTC, in minutes
const ZONE_NAMES: &[(&str, i32)] = &[
    ("UTC", 0),
    ("UT", 0),
    ("GMT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", 60),
    ("BST", 60),
    ("CET", 60),
    ("MET", 60),
    ("CEST", 120),
    ("MEST", 120),
    ("EET", 120),
    ("EEST", 180),
    ("MSK", 180),
    ("PKT", 300),
    ("IST", 330),
    ("ICT", 420),
    ("HKT", 480),
    ("SGT", 480),
    ("AWST", 480),
    ("JST", 540),
    ("KST", 540),
    ("ACST", 570),
    ("AEST", 600),
    ("AEDT", 660),
    ("NZST", 720),
    ("NZDT", 780),
    ("HST", -600),
    ("AKST", -540),
    ("AKDT", -480),
    ("PST", -480),
    ("PDT", -420),
    ("MST", -420),
    ("MDT", -360),
    ("CST", -360),
    ("CDT", -300),
    ("EST", -300),
    ("EDT", -240),
    ("AST", -240),
    ("ADT", -180),
    ("BRT", -180),
    ("ART", -180),
    ("NST", -210),
    ("NDT", -150),
];

static TIME_PATTERNS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut tails: Vec<&'static str> = Vec::new();
    for pattern in DATE_PATTERNS {
        if let Some(pos) = pattern.find("%H") {
            let tail = &pattern[pos..];
            if !tails.contains(&tail) {
                tails.push(tail);
            }
        }
    }
    tails
});

static GLOBAL: Lazy<DateCoercion> = Lazy::new(|| DateCoercion::from_config(config::global()));

/// Cache key for text-to-date lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DateKey {
    Text(String),
    Millis(i64),
}

/// Date parser and renderer bound to one configuration
pub struct DateCoercion {
    zone: ZoneSetting,
    timestamp_format: String,
    use_timestamps: bool,
    to_date: Cache<DateKey, DateTime<Utc>>,
    to_text: Cache<i64, String>,
}

impl DateCoercion {
    /// The instance configured from the process-wide configuration
    pub fn global() -> &'static DateCoercion {
        &GLOBAL
    }

    /// Build an instance from an explicit configuration
    ///
    /// An unparseable zone falls back to UTC.
    pub fn from_config(config: &Config) -> Self {
        let zone = config
            .zone()
            .unwrap_or(ZoneSetting::Fixed(Utc.fix()));
        DateCoercion {
            zone,
            timestamp_format: config.timestamp_format.clone(),
            use_timestamps: config.use_timestamps,
            to_date: Cache::new(config.cache_size),
            to_text: Cache::new(config.cache_size),
        }
    }

    /// Whether dates render as formatted text rather than epoch milliseconds
    pub fn use_timestamps(&self) -> bool {
        self.use_timestamps
    }

    /// Instant at `millis` milliseconds after the epoch
    pub fn from_millis(&self, millis: i64) -> Result<DateTime<Utc>, ConversionError> {
        let key = DateKey::Millis(millis);
        if let Some(hit) = self.to_date.get(&key) {
            return Ok(hit);
        }
        let date = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            ConversionError::invalid(ValueType::Long, ValueType::Date, "instant out of range")
        })?;
        self.to_date.put(key, date);
        Ok(date)
    }

    /// Parse text into an instant
    ///
    /// # Errors
    ///
    /// Fails only when no layout matches and the numeric core of the text
    /// does not fit an epoch-millisecond value.
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>, ConversionError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("now") {
            return Ok(Utc::now());
        }

        let key = DateKey::Text(text.to_string());
        if let Some(hit) = self.to_date.get(&key) {
            return Ok(hit);
        }

        let parsed = if text.chars().all(|c| c.is_ascii_digit() || c == '.') {
            self.millis_text(text)?
        } else if let Some(date) = self.parse_layouts(text) {
            date
        } else {
            debug!(target: "doctree::convert", text, "no date layout matched, reading as epoch millis");
            self.millis_text(text)?
        };

        self.to_date.put(key, parsed);
        Ok(parsed)
    }

    /// Render an instant as text
    ///
    /// With timestamps enabled this uses the configured format and zone,
    /// otherwise the epoch-millisecond count.
    pub fn format(&self, date: &DateTime<Utc>) -> String {
        let millis = date.timestamp_millis();
        if !self.use_timestamps {
            return millis.to_string();
        }
        if let Some(hit) = self.to_text.get(&millis) {
            return hit;
        }
        let text = self
            .zone
            .format(date, &self.timestamp_format)
            .unwrap_or_else(|| date.to_rfc3339());
        self.to_text.put(millis, text.clone());
        text
    }

    fn millis_text(&self, text: &str) -> Result<DateTime<Utc>, ConversionError> {
        let millis = parse_integral(text).ok_or_else(|| {
            ConversionError::invalid(ValueType::String, ValueType::Date, "not a date or number")
        })?;
        self.from_millis(millis)
    }

    fn parse_layouts(&self, text: &str) -> Option<DateTime<Utc>> {
        let normalized;
        let text = match text.strip_suffix('Z') {
            Some(head) if head.ends_with(|c: char| c.is_ascii_digit()) => {
                normalized = format!("{}+00:00", head);
                normalized.as_str()
            }
            _ => text,
        };
        let zoned = with_numeric_zones(text);
        let text = zoned.as_deref().unwrap_or(text);

        for pattern in DATE_PATTERNS {
            if let Some(date) = self.try_pattern(text, pattern) {
                trace!(target: "doctree::convert", pattern, "date layout matched");
                return Some(date);
            }
        }
        TIME_PATTERNS
            .iter()
            .find_map(|pattern| self.try_pattern(text, pattern))
    }

    fn try_pattern(&self, text: &str, pattern: &str) -> Option<DateTime<Utc>> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text, StrftimeItems::new(pattern)).ok()?;

        let has_date = pattern.contains("%d");
        let has_time = pattern.contains("%H") || pattern.contains("%I");

        let date = if has_date {
            parsed.to_naive_date().ok()?
        } else {
            NaiveDate::from_ymd_opt(1970, 1, 1)?
        };
        let time = if has_time {
            parsed.to_naive_time().ok()?
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)?
        };
        let naive = date.and_time(time);

        match parsed.to_fixed_offset() {
            Ok(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|d| d.with_timezone(&Utc)),
            Err(_) => self.zone.localize(&naive),
        }
    }
}

/// Offset text (`+hh:mm`) for a zone name, or for `GMT+hh:mm` style names
fn zone_offset(token: &str) -> Option<String> {
    let upper = token.to_ascii_uppercase();
    for prefix in ["GMT", "UTC", "UT"] {
        if let Some(rest) = upper.strip_prefix(prefix) {
            if rest.starts_with('+') || rest.starts_with('-') {
                return Some(rest.to_string());
            }
        }
    }
    let (_, minutes) = ZONE_NAMES.iter().find(|(name, _)| *name == upper)?;
    let sign = if *minutes < 0 { '-' } else { '+' };
    let minutes = minutes.abs();
    Some(format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60))
}

/// `text` with every space-separated zone name replaced by its offset
///
/// `None` when the text names no known zone.
fn with_numeric_zones(text: &str) -> Option<String> {
    let mut changed = false;
    let tokens: Vec<String> = text
        .split(' ')
        .map(|token| match zone_offset(token) {
            Some(offset) => {
                changed = true;
                offset
            }
            None => token.to_string(),
        })
        .collect();
    changed.then(|| tokens.join(" "))
}
