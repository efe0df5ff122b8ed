// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day logging streak.

use crate::models::VitalsRecord;
use crate::time_utils::{local_day, parse_timestamp};
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use std::collections::HashSet;

/// How many days back the streak walk looks, today included.
pub const STREAK_WINDOW_DAYS: u32 = 100;

/// Count consecutive days, ending today, with at least one vitals record.
///
/// Records are matched by calendar day in `now`'s timezone, so several records
/// on one day count once. Without a record today the streak is 0, even if
/// yesterday had one. Records with unparseable timestamps never match.
pub fn streak<Tz: TimeZone>(records: &[VitalsRecord], now: &DateTime<Tz>) -> u32 {
    let days = logged_days(records.iter().map(|r| r.timestamp.as_str()), &now.timezone());
    streak_from_days(&days, now.date_naive())
}

/// Calendar days (in `tz`) on which any of `timestamps` falls.
pub fn logged_days<'a, Tz, I>(timestamps: I, tz: &Tz) -> HashSet<NaiveDate>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a str>,
{
    timestamps
        .into_iter()
        .filter_map(parse_timestamp)
        .map(|instant| local_day(instant, tz))
        .collect()
}

/// Walk back from `today` while each day is in `days`.
pub fn streak_from_days(days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    for offset in 0..STREAK_WINDOW_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !days.contains(&day) {
            break;
        }
        count += 1;
    }
    count
}
