//! Display formatting helpers

use chrono::{DateTime, Days, TimeZone, Utc};

/// Split a comma-joined feature string, e.g. `"CCTV, Well Lit"`
#[must_use]
pub fn parse_features(features: &str) -> Vec<String> {
    features
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a date-time relative to `now` in the display timezone:
/// `"Today at 14:24"`, `"Tomorrow at 09:00"` or `"23 Oct at 18:24"`.
#[must_use]
pub fn format_display_datetime<Tz: TimeZone>(
    date_time: DateTime<Utc>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let local = date_time.with_timezone(tz);
    let today = now.with_timezone(tz).date_naive();
    let date = local.date_naive();
    let time = local.format("%H:%M");

    if date == today {
        format!("Today at {time}")
    } else if today.checked_add_days(Days::new(1)) == Some(date) {
        format!("Tomorrow at {time}")
    } else {
        format!("{} at {time}", local.format("%-d %b"))
    }
}

/// Price label as shown on map markers and cards
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("£{price:.2}")
}
