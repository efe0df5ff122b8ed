// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar-day string for a date, e.g. `"Mon Oct 19 2026"`.
///
/// This is the shape stored in calorie entries' `date` field and used for
/// same-day equality checks.
pub fn calendar_day_string(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Calendar day of an instant in the given timezone.
pub fn local_day<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Parse a stored ISO-8601 timestamp.
///
/// Accepts full RFC3339 as well as the bare `YYYY-MM-DDTHH:MM:SS` form (read as
/// UTC). Returns `None` for anything else; such records never match a day.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Source of the current instant and the device's UTC offset.
///
/// Controllers read "now" through this so tests can pin the date.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Wall clock, in the device's current offset
    #[default]
    System,
    /// A fixed instant, viewed at a fixed offset
    Fixed {
        at: DateTime<Utc>,
        offset: FixedOffset,
    },
}

impl Clock {
    pub fn fixed(at: DateTime<Utc>, offset: FixedOffset) -> Self {
        Clock::Fixed { at, offset }
    }

    /// Current local time.
    pub fn now(&self) -> DateTime<FixedOffset> {
        match self {
            Clock::System => Local::now().fixed_offset(),
            Clock::Fixed { at, offset } => at.with_timezone(offset),
        }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    /// Today's calendar-day string in local time.
    pub fn today_string(&self) -> String {
        calendar_day_string(self.now().date_naive())
    }
}
