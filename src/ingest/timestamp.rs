use chrono::{DateTime, NaiveDateTime, Utc};

use crate::prelude::*;

/// Minute-precision UTC format used by the Carbon Intensity API.
const FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Render the timestamp the way the upstream API does.
#[must_use]
pub fn render(timestamp: DateTime<Utc>) -> String {
    timestamp.format(FORMAT).to_string()
}

/// Parse either RFC 3339 or the API's minute-precision format.
pub fn parse(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.to_utc())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(text, FORMAT).map(|timestamp| timestamp.and_utc())
        })
        .with_context(|| format!("invalid timestamp `{text}`"))
}
