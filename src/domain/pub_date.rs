//! Publication date normalization.
//!
//! RSS `<pubDate>` values are RFC 1123 style strings whose trailing token is
//! either a numeric offset (`+0000`, `-0500`) or a zone abbreviation (`EDT`).
//! Abbreviations are resolved through a [`TimezoneTable`] rather than a
//! process-wide map so callers can extend it from configuration.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;

use crate::errors::{ArchiveError, ArchiveResult};

// Both layouts start after the `Ddd, ` weekday prefix, which is checked
// for shape only. Feeds often carry a weekday that does not match the date.

/// Layout used when the designator is a numeric offset
const NUMERIC_OFFSET_LAYOUT: &str = "%d %b %Y %H:%M:%S %z";

/// Layout used for the part before a zone abbreviation
const LOCAL_LAYOUT: &str = "%d %b %Y %H:%M:%S";

static NUMERIC_OFFSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-][0-9]{4}$").expect("numeric offset pattern is valid"));

static ZONE_ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+$").expect("abbreviation pattern is valid"));

/// Maps zone abbreviations found in feeds to IANA zones.
#[derive(Debug, Clone, PartialEq)]
pub struct TimezoneTable {
    zones: HashMap<String, Tz>,
}

impl TimezoneTable {
    pub fn empty() -> Self {
        Self {
            zones: HashMap::new(),
        }
    }

    /// Register (or replace) an abbreviation, resolving `zone` as an IANA name
    pub fn insert(&mut self, abbreviation: &str, zone: &str) -> ArchiveResult<()> {
        let tz: Tz = zone
            .parse()
            .map_err(|_| ArchiveError::Config(format!("Unknown IANA time zone: {}", zone)))?;
        self.zones.insert(abbreviation.to_string(), tz);
        Ok(())
    }

    pub fn lookup(&self, abbreviation: &str) -> Option<Tz> {
        self.zones.get(abbreviation).copied()
    }
}

impl Default for TimezoneTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .zones
            .insert("EDT".to_string(), chrono_tz::America::New_York);
        table
    }
}

/// A parsed publication date and the UTC calendar day it falls on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubDate {
    pub timestamp: DateTime<FixedOffset>,
    pub day: String,
}

impl PubDate {
    pub fn parse(raw: &str, zones: &TimezoneTable) -> ArchiveResult<Self> {
        let timestamp = parse_timestamp(raw, zones)?;
        let day = utc_day(&timestamp);
        Ok(Self { timestamp, day })
    }
}

/// Parse a feed-supplied date, keeping the offset it was published with
pub fn parse_timestamp(raw: &str, zones: &TimezoneTable) -> ArchiveResult<DateTime<FixedOffset>> {
    let dated = strip_weekday(raw).ok_or_else(|| ArchiveError::DateFormat(raw.to_string()))?;
    let split = dated
        .rfind(char::is_whitespace)
        .ok_or_else(|| ArchiveError::DateFormat(raw.to_string()))?;
    let (local, designator) = dated.split_at(split);
    let designator = designator.trim_start();

    if designator.is_empty() {
        return Err(ArchiveError::DateFormat(raw.to_string()));
    }

    if NUMERIC_OFFSET.is_match(designator) {
        return DateTime::parse_from_str(dated, NUMERIC_OFFSET_LAYOUT)
            .map_err(|_| ArchiveError::DateFormat(raw.to_string()));
    }

    if !ZONE_ABBREVIATION.is_match(designator) {
        return Err(ArchiveError::DateFormat(raw.to_string()));
    }

    let tz = zones
        .lookup(designator)
        .ok_or_else(|| ArchiveError::UnknownTimezone(designator.to_string()))?;

    let naive = NaiveDateTime::parse_from_str(local.trim_end(), LOCAL_LAYOUT)
        .map_err(|_| ArchiveError::DateFormat(raw.to_string()))?;

    let zoned = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ArchiveError::DateFormat(raw.to_string()))?;

    let offset = zoned.offset().fix();
    Ok(zoned.with_timezone(&offset))
}

/// Drop a leading `Ddd, ` when `Ddd` is a weekday abbreviation
fn strip_weekday(raw: &str) -> Option<&str> {
    let (weekday, rest) = raw.split_once(", ")?;
    if weekday.len() != 3 || weekday.parse::<Weekday>().is_err() {
        return None;
    }
    Some(rest)
}

/// Canonical bucket name: UTC `year-month-day`, no zero padding
pub fn utc_day<Z: TimeZone>(timestamp: &DateTime<Z>) -> String {
    let utc = timestamp.with_timezone(&Utc);
    format!("{}-{}-{}", utc.year(), utc.month(), utc.day())
}
