//! Display formatting for earthquake rows.
//!
//! Turns [`Earthquake`] records into the strings a list row shows: the
//! location split into an offset and a primary place, the date and time,
//! the magnitude, and the color of the magnitude badge.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::model::Earthquake;

/// Offset label used when a location has no distance prefix.
pub const NEAR_THE: &str = "Near the";

/// Date pattern, e.g. "Mar 03, 1984".
const DATE_FORMAT: &str = "%b %d, %Y";

/// Time pattern, e.g. "4:30 PM".
const TIME_FORMAT: &str = "%-I:%M %p";

/// A location string split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationParts<'a> {
    /// Distance and direction, e.g. "5km N of".
    pub offset: &'a str,
    /// Place name, e.g. "Cairo, Egypt".
    pub primary: &'a str,
}

/// Split a USGS place string into offset and primary location.
///
/// A place starting with a digit is treated as `"<offset> of <primary>"`:
/// the offset runs up to and including the first `f`, and the primary
/// location starts after the character following it. Any other place gets
/// the [`NEAR_THE`] offset and is kept whole.
pub fn split_location(location: &str) -> LocationParts<'_> {
    if location.starts_with(|c: char| c.is_ascii_digit()) {
        if let Some(index) = location.find('f') {
            let rest = &location[index + 1..];
            let primary = rest
                .char_indices()
                .nth(1)
                .map_or("", |(skip, _)| &rest[skip..]);
            return LocationParts {
                offset: &location[..=index],
                primary,
            };
        }
    }

    LocationParts {
        offset: NEAR_THE,
        primary: location,
    }
}

fn to_zone<Tz: TimeZone>(time_in_millis: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp_millis(time_in_millis).map(|utc| utc.with_timezone(tz))
}

/// Format an epoch-millisecond time as a date ("Mar 03, 1984") in `tz`.
///
/// Returns an empty string for times chrono cannot represent.
pub fn format_date<Tz>(time_in_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_zone(time_in_millis, tz)
        .map(|dt| dt.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Format an epoch-millisecond time as a clock time ("4:30 PM") in `tz`.
pub fn format_time<Tz>(time_in_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_zone(time_in_millis, tz)
        .map(|dt| dt.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Format a magnitude with one decimal place.
pub fn format_magnitude(magnitude: f64) -> String {
    format!("{:.1}", magnitude)
}

/// Color bucket for the magnitude badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeBucket {
    /// Below 2, including negative magnitudes.
    Magnitude1,
    Magnitude2,
    Magnitude3,
    Magnitude4,
    Magnitude5,
    Magnitude6,
    Magnitude7,
    Magnitude8,
    Magnitude9,
    /// 10 and above.
    Magnitude10Plus,
}

impl MagnitudeBucket {
    /// Pick the bucket by truncating the magnitude toward zero.
    ///
    /// Truncation, not rounding: 9.95 lands in [`MagnitudeBucket::Magnitude9`].
    pub fn from_magnitude(magnitude: f64) -> Self {
        // NaN casts to 0.
        match magnitude.trunc() as i64 {
            i64::MIN..=1 => MagnitudeBucket::Magnitude1,
            2 => MagnitudeBucket::Magnitude2,
            3 => MagnitudeBucket::Magnitude3,
            4 => MagnitudeBucket::Magnitude4,
            5 => MagnitudeBucket::Magnitude5,
            6 => MagnitudeBucket::Magnitude6,
            7 => MagnitudeBucket::Magnitude7,
            8 => MagnitudeBucket::Magnitude8,
            9 => MagnitudeBucket::Magnitude9,
            _ => MagnitudeBucket::Magnitude10Plus,
        }
    }

    /// Badge color as `#RRGGBB`.
    pub fn color(&self) -> &'static str {
        match self {
            MagnitudeBucket::Magnitude1 => "#4A7BA7",
            MagnitudeBucket::Magnitude2 => "#04B4B3",
            MagnitudeBucket::Magnitude3 => "#10CAC9",
            MagnitudeBucket::Magnitude4 => "#F5A623",
            MagnitudeBucket::Magnitude5 => "#FF7D50",
            MagnitudeBucket::Magnitude6 => "#FC6644",
            MagnitudeBucket::Magnitude7 => "#E75F40",
            MagnitudeBucket::Magnitude8 => "#E13A20",
            MagnitudeBucket::Magnitude9 => "#D93218",
            MagnitudeBucket::Magnitude10Plus => "#C03823",
        }
    }
}

/// One display row of the earthquake list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeRow {
    pub primary_location: String,
    pub offset: String,
    pub date: String,
    pub time: String,
    pub magnitude: String,
    pub magnitude_bucket: MagnitudeBucket,
    pub magnitude_color: &'static str,
    /// Target of the row's "open details" action.
    pub detail_url: String,
}

impl EarthquakeRow {
    /// Build the row for `earthquake`, rendering times in `tz`.
    pub fn new<Tz>(earthquake: &Earthquake, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let parts = split_location(&earthquake.location);
        let bucket = MagnitudeBucket::from_magnitude(earthquake.magnitude);

        Self {
            primary_location: parts.primary.to_string(),
            offset: parts.offset.to_string(),
            date: format_date(earthquake.time_in_millis, tz),
            time: format_time(earthquake.time_in_millis, tz),
            magnitude: format_magnitude(earthquake.magnitude),
            magnitude_bucket: bucket,
            magnitude_color: bucket.color(),
            detail_url: earthquake.url.clone(),
        }
    }
}

/// Project earthquakes into rows, keeping their order.
pub fn present<Tz>(earthquakes: &[Earthquake], tz: &Tz) -> Vec<EarthquakeRow>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    earthquakes
        .iter()
        .map(|earthquake| EarthquakeRow::new(earthquake, tz))
        .collect()
}
