//! Fixed-anchor rounding helpers and relative-time generators.
//!
//! Small pure functions over a timestamp: floor to the hour, snap to the
//! morning/evening/midnight anchors, and the "later today" / "tonight" /
//! "this weekend" style generators a quick-compose menu offers.

use chrono::{Datelike, Duration, Months, NaiveDateTime, Timelike, Weekday};

/// Hour used to anchor "morning".
pub const MORNING_HOUR: u32 = 9;
/// Hour used to anchor "afternoon".
pub const AFTERNOON_HOUR: u32 = 15;
/// Hour used to anchor "evening" and "tonight".
pub const EVENING_HOUR: u32 = 20;
/// Hour used to anchor "midnight"; 24 rolls to the start of the next day.
pub const MIDNIGHT_HOUR: u32 = 24;

/// Current wall-clock time in the environment-default timezone.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn at_hour(dt: NaiveDateTime, hour: u32) -> NaiveDateTime {
    match dt.date().and_hms_opt(0, 0, 0) {
        Some(start_of_day) => start_of_day + Duration::hours(hour as i64),
        None => dt,
    }
}

/// Floor minutes and seconds to zero.
pub fn oclock(dt: NaiveDateTime) -> NaiveDateTime {
    at_hour(dt, dt.hour())
}

/// Snap to the morning anchor, on the hour.
pub fn morning(dt: NaiveDateTime) -> NaiveDateTime {
    at_hour(dt, MORNING_HOUR)
}

/// Snap to the evening anchor, on the hour.
pub fn evening(dt: NaiveDateTime) -> NaiveDateTime {
    at_hour(dt, EVENING_HOUR)
}

/// Snap to midnight at the end of the day, i.e. 00:00 of the next day.
pub fn midnight(dt: NaiveDateTime) -> NaiveDateTime {
    at_hour(dt, MIDNIGHT_HOUR)
}

pub fn minutes_from_now(minutes: i64, now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::minutes(minutes)
}

pub fn hours_from_now(hours: i64, now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::hours(hours)
}

pub fn in_one_hour() -> NaiveDateTime {
    minutes_from_now(60, local_now())
}

pub fn in_two_hours() -> NaiveDateTime {
    minutes_from_now(120, local_now())
}

/// Three hours from `now`, on the hour.
pub fn later_today(now: NaiveDateTime) -> NaiveDateTime {
    oclock(now + Duration::hours(3))
}

/// The evening anchor today, or end-of-day midnight once the evening
/// anchor has already passed.
pub fn tonight(now: NaiveDateTime) -> NaiveDateTime {
    if now.hour() >= EVENING_HOUR {
        midnight(now)
    } else {
        evening(now)
    }
}

pub fn tomorrow(now: NaiveDateTime) -> NaiveDateTime {
    morning(now + Duration::days(1))
}

pub fn tomorrow_evening(now: NaiveDateTime) -> NaiveDateTime {
    evening(now + Duration::days(1))
}

/// Set the day of week within the Sunday-start week containing `dt`.
/// 0 selects Sunday, 6 Saturday; values outside 0..=6 reach into the
/// neighboring weeks (8 is Monday next week).
fn day_of_week(dt: NaiveDateTime, day: i64) -> NaiveDateTime {
    let current = dt.weekday().num_days_from_sunday() as i64;
    dt + Duration::days(day - current)
}

/// Saturday morning of this week, or one week later when `now` is already
/// a Saturday.
pub fn this_weekend(now: NaiveDateTime) -> NaiveDateTime {
    let day = if now.weekday() == Weekday::Sat { 13 } else { 6 };
    morning(day_of_week(now, day))
}

pub fn weeks_from_now(weeks: i64, now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::weeks(weeks)
}

/// The coming Monday morning, which is tomorrow when `now` is a Sunday.
pub fn next_week(now: NaiveDateTime) -> NaiveDateTime {
    let day = if now.weekday() == Weekday::Sun { 1 } else { 8 };
    morning(day_of_week(now, day))
}

pub fn months_from_now(months: u32, now: NaiveDateTime) -> NaiveDateTime {
    now.checked_add_months(Months::new(months)).unwrap_or(now)
}

/// Morning of the first day of next month.
pub fn next_month(now: NaiveDateTime) -> NaiveDateTime {
    let shifted = months_from_now(1, now);
    morning(shifted - Duration::days(shifted.day() as i64 - 1))
}
