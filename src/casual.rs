//! Casual English date/time grammar.
//!
//! A regex-driven [`Parser`] adapter covering the phrases a quick-compose
//! box sees: weekday phrases ("next Monday at 2pm"), relative days
//! ("tomorrow morning"), month/day mentions ("June 5 2099", "the 5th"),
//! clock times ("3pm", "14:00", "noon"), time ranges ("3pm to 5pm"), bare
//! durations ("2 hours", "in 45 minutes"), and relative periods
//! ("next month").
//!
//! Matches are collected per pattern family with their byte ranges, then
//! filtered to a non-overlapping list ordered by position in the input.
//! On overlap the earliest match wins, then the longest.
//!
//! Implied components default from the reference timestamp, with noon as
//! the implied hour for date-only mentions. A plain weekday resolves to
//! its occurrence within the current Sunday-start week, which may be in
//! the past; forcing it onto one side of the reference is the direction
//! refiners' job, not the grammar's.

use chrono::{Datelike, Duration, Months, NaiveDateTime, Timelike, Weekday};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::components::{Component, ComponentSet};
use crate::config::ResolverConfig;
use crate::parse::{CandidateSpan, Parser};

/// Date-only mentions default to noon.
const IMPLIED_HOUR: i64 = 12;

const WEEKDAYS: &str = "sunday|sun|monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat";
const MONTHS: &str = "january|jan|february|feb|march|mar|april|apr|may|june|jun|july|jul|august|aug|september|sept|sep|october|oct|november|nov|december|dec";

// Optional clock tail shared by the weekday and relative-day patterns.
// Requires a colon or a meridiem so a bare trailing number is not eaten.
const CLOCK_TAIL: &str = r"(?:\s+(?:at\s+)?(?:(?P<h1>\d{1,2}):(?P<min1>\d{2})\s*(?P<ap1>am|pm)?|(?P<h2>\d{1,2})\s*(?P<ap2>am|pm)))?";

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:(?P<modifier>next|last|this)\s+)?(?P<wd>{})\b{}",
        WEEKDAYS, CLOCK_TAIL
    ))
    .expect("weekday regex")
});

static RELATIVE_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<word>today|tonight|tomorrow|yesterday)\b(?:\s+(?P<part>morning|afternoon|evening|night)\b)?{}",
        CLOCK_TAIL
    ))
    .expect("relative day regex")
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<month>{})\.?\s+(?P<day>\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(?P<year>\d{{4}}))?\b",
        MONTHS
    ))
    .expect("month-day regex")
});

static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?P<month>{})\b(?:,?\s+(?P<year>\d{{4}}))?",
        MONTHS
    ))
    .expect("day-month regex")
});

// Full names only: the short forms ("mar", "jun") and the word "may" are
// too ambiguous outside a month-day context.
static BARE_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?P<month>january|february|march|april|june|july|august|september|october|november|december)\b(?:\s+(?P<year>\d{4}))?",
    )
    .expect("bare month regex")
});

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bthe\s+(?P<day>\d{1,2})(?:st|nd|rd|th)\b").expect("ordinal regex")
});

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:from\s+)?(?P<h1>\d{1,2})(?::(?P<min1>\d{2}))?\s*(?P<ap1>am|pm)?\s*(?:-|–|to|until)\s*(?P<h2>\d{1,2})(?::(?P<min2>\d{2}))?\s*(?P<ap2>am|pm)\b",
    )
    .expect("time range regex")
});

static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:at\s+)?(?:(?P<h1>\d{1,2}):(?P<min1>\d{2})\s*(?P<ap1>am|pm)?|(?P<h2>\d{1,2})\s*(?P<ap2>am|pm)|(?P<word>noon|midnight))\b",
    )
    .expect("time regex")
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:in\s+)?(?P<n>\d+)\s+(?P<unit>minutes?|mins?|hours?|hrs?|days?|weeks?|months?)\b")
        .expect("duration regex")
});

static RELATIVE_PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<modifier>next|last)\s+(?P<unit>week|month|year)\b")
        .expect("relative period regex")
});

/// A clock time pulled out of a capture set.
struct Clock {
    hour: i64,
    /// `Some` when minutes were written out, `None` for bare hours.
    minute: Option<i64>,
}

fn meridiem_hour(hour: i64, meridiem: &str) -> Option<i64> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    Some(match (meridiem, hour) {
        ("pm", 12) => 12,
        ("pm", h) => h + 12,
        ("am", 12) => 0,
        (_, h) => h,
    })
}

/// Extract a clock from the shared `h1`/`min1`/`ap1`/`h2`/`ap2` groups.
fn clock_from(caps: &Captures) -> Option<Clock> {
    if let Some(h) = caps.name("h1") {
        let hour: i64 = h.as_str().parse().ok()?;
        let minute: i64 = caps.name("min1")?.as_str().parse().ok()?;
        if minute > 59 {
            return None;
        }
        let hour = match caps.name("ap1") {
            Some(ap) => meridiem_hour(hour, &ap.as_str().to_lowercase())?,
            None if hour <= 23 => hour,
            None => return None,
        };
        return Some(Clock {
            hour,
            minute: Some(minute),
        });
    }
    if let Some(h) = caps.name("h2") {
        let hour: i64 = h.as_str().parse().ok()?;
        let meridiem = caps.name("ap2")?.as_str().to_lowercase();
        return Some(Clock {
            hour: meridiem_hour(hour, &meridiem)?,
            minute: None,
        });
    }
    None
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    let target = match name.to_lowercase().as_str() {
        "sunday" | "sun" => Weekday::Sun,
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tues" | "tue" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thurs" | "thur" | "thu" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        _ => return None,
    };
    Some(target)
}

fn parse_month(name: &str) -> Option<i64> {
    let lower = name.to_lowercase();
    match lower.as_str() {
        s if s.starts_with("jan") => Some(1),
        s if s.starts_with("feb") => Some(2),
        s if s.starts_with("mar") => Some(3),
        s if s.starts_with("apr") => Some(4),
        "may" => Some(5),
        s if s.starts_with("jun") => Some(6),
        s if s.starts_with("jul") => Some(7),
        s if s.starts_with("aug") => Some(8),
        s if s.starts_with("sep") => Some(9),
        s if s.starts_with("oct") => Some(10),
        s if s.starts_with("nov") => Some(11),
        s if s.starts_with("dec") => Some(12),
        _ => None,
    }
}

/// Regex-driven parser for casual English date/time mentions.
#[derive(Debug, Clone)]
pub struct CasualParser {
    config: ResolverConfig,
}

impl CasualParser {
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Implied components for a fresh mention: the reference date, noon.
    fn base_components(&self, reference: NaiveDateTime) -> ComponentSet {
        let mut set = ComponentSet::new();
        set.imply(Component::Year, reference.year() as i64);
        set.imply(Component::Month, reference.month() as i64);
        set.imply(Component::Day, reference.day() as i64);
        set.imply(
            Component::Weekday,
            reference.weekday().num_days_from_sunday() as i64,
        );
        set.imply(Component::Hour, IMPLIED_HOUR);
        set.imply(Component::Minute, 0);
        set
    }

    fn apply_clock(set: &mut ComponentSet, clock: &Clock) {
        set.know(Component::Hour, clock.hour);
        match clock.minute {
            Some(minute) => set.know(Component::Minute, minute),
            None => set.imply(Component::Minute, 0),
        }
    }

    fn part_of_day_hour(&self, part: &str) -> i64 {
        match part {
            "morning" => self.config.morning_hour as i64,
            "afternoon" => self.config.afternoon_hour as i64,
            _ => self.config.evening_hour as i64,
        }
    }

    fn weekday_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let target = parse_weekday(caps.name("wd")?.as_str())?;
        let dow = target.num_days_from_sunday() as i64;
        let current = reference.weekday().num_days_from_sunday() as i64;
        let mut date = reference.date() + Duration::days(dow - current);
        match caps
            .name("modifier")
            .map(|m| m.as_str().to_lowercase())
            .as_deref()
        {
            Some("next") => date += Duration::days(7),
            Some("last") => date -= Duration::days(7),
            _ => {}
        }

        let mut set = self.base_components(reference);
        set.know(Component::Weekday, dow);
        set.imply(Component::Year, date.year() as i64);
        set.imply(Component::Month, date.month() as i64);
        set.imply(Component::Day, date.day() as i64);
        if let Some(clock) = clock_from(caps) {
            Self::apply_clock(&mut set, &clock);
        }
        Some(set)
    }

    fn relative_day_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let word = caps.name("word")?.as_str().to_lowercase();
        let offset = match word.as_str() {
            "tomorrow" => 1,
            "yesterday" => -1,
            _ => 0,
        };
        let date = reference.date() + Duration::days(offset);

        let mut set = self.base_components(reference);
        set.know(Component::Year, date.year() as i64);
        set.know(Component::Month, date.month() as i64);
        set.know(Component::Day, date.day() as i64);
        set.imply(
            Component::Weekday,
            date.weekday().num_days_from_sunday() as i64,
        );
        if word == "tonight" {
            set.imply(Component::Hour, self.config.evening_hour as i64);
        }
        if let Some(part) = caps.name("part") {
            let hour = self.part_of_day_hour(&part.as_str().to_lowercase());
            set.imply(Component::Hour, hour);
        }
        if let Some(clock) = clock_from(caps) {
            Self::apply_clock(&mut set, &clock);
        }
        Some(set)
    }

    fn month_day_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let month = parse_month(caps.name("month")?.as_str())?;
        let day: i64 = caps.name("day")?.as_str().parse().ok()?;
        if !(1..=31).contains(&day) {
            return None;
        }

        let mut set = self.base_components(reference);
        set.know(Component::Month, month);
        set.know(Component::Day, day);
        if let Some(year) = caps.name("year") {
            set.know(Component::Year, year.as_str().parse().ok()?);
        }
        Some(set)
    }

    fn bare_month_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let month = parse_month(caps.name("month")?.as_str())?;
        let mut set = self.base_components(reference);
        set.know(Component::Month, month);
        set.imply(Component::Day, 1);
        if let Some(year) = caps.name("year") {
            set.know(Component::Year, year.as_str().parse().ok()?);
        }
        Some(set)
    }

    fn ordinal_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let day: i64 = caps.name("day")?.as_str().parse().ok()?;
        if !(1..=31).contains(&day) {
            return None;
        }
        let mut set = self.base_components(reference);
        set.know(Component::Day, day);
        Some(set)
    }

    fn time_range_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<(ComponentSet, ComponentSet)> {
        let end_hour: i64 = caps.name("h2")?.as_str().parse().ok()?;
        let end_meridiem = caps.name("ap2")?.as_str().to_lowercase();
        let end_hour = meridiem_hour(end_hour, &end_meridiem)?;
        let end_minute: Option<i64> = match caps.name("min2") {
            Some(m) => {
                let minute = m.as_str().parse().ok()?;
                if minute > 59 {
                    return None;
                }
                Some(minute)
            }
            None => None,
        };

        let start_hour: i64 = caps.name("h1")?.as_str().parse().ok()?;
        let start_minute: Option<i64> = match caps.name("min1") {
            Some(m) => {
                let minute = m.as_str().parse().ok()?;
                if minute > 59 {
                    return None;
                }
                Some(minute)
            }
            None => None,
        };
        let start_hour = match caps.name("ap1") {
            Some(ap) => meridiem_hour(start_hour, &ap.as_str().to_lowercase())?,
            // "14:00 to 5pm" reads as 24-hour; "3 to 5pm" inherits pm.
            None if start_minute.is_some() && start_hour <= 23 => start_hour,
            None => meridiem_hour(start_hour, &end_meridiem)?,
        };

        let mut start = self.base_components(reference);
        Self::apply_clock(
            &mut start,
            &Clock {
                hour: start_hour,
                minute: start_minute,
            },
        );
        let mut end = self.base_components(reference);
        Self::apply_clock(
            &mut end,
            &Clock {
                hour: end_hour,
                minute: end_minute,
            },
        );
        Some((start, end))
    }

    fn time_candidate(&self, caps: &Captures, reference: NaiveDateTime) -> Option<ComponentSet> {
        let mut set = self.base_components(reference);
        if let Some(word) = caps.name("word") {
            let hour = match word.as_str().to_lowercase().as_str() {
                "noon" => 12,
                _ => 0,
            };
            set.know(Component::Hour, hour);
            return Some(set);
        }
        let clock = clock_from(caps)?;
        Self::apply_clock(&mut set, &clock);
        Some(set)
    }

    fn duration_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let n: i64 = caps.name("n")?.as_str().parse().ok()?;
        let unit = caps.name("unit")?.as_str().to_lowercase();

        let mut set = self.base_components(reference);
        if unit.starts_with("min") || unit.starts_with("h") {
            let offset = if unit.starts_with("min") {
                Duration::minutes(n)
            } else {
                Duration::hours(n)
            };
            let target = reference.checked_add_signed(offset)?;
            set.imply(Component::Year, target.year() as i64);
            set.imply(Component::Month, target.month() as i64);
            set.imply(Component::Day, target.day() as i64);
            set.know(Component::Hour, target.hour() as i64);
            set.know(Component::Minute, target.minute() as i64);
        } else if unit.starts_with("day") || unit.starts_with("week") {
            let days = if unit.starts_with("week") { n * 7 } else { n };
            let target = reference.checked_add_signed(Duration::days(days))?;
            set.know(Component::Day, target.day() as i64);
            set.imply(Component::Year, target.year() as i64);
            set.imply(Component::Month, target.month() as i64);
            set.imply(Component::Hour, target.hour() as i64);
            set.imply(Component::Minute, target.minute() as i64);
        } else {
            let target = reference.checked_add_months(Months::new(u32::try_from(n).ok()?))?;
            set.know(Component::Month, target.month() as i64);
            set.imply(Component::Year, target.year() as i64);
            set.imply(Component::Day, target.day() as i64);
            set.imply(Component::Hour, target.hour() as i64);
            set.imply(Component::Minute, target.minute() as i64);
        }
        Some(set)
    }

    fn relative_period_candidate(
        &self,
        caps: &Captures,
        reference: NaiveDateTime,
    ) -> Option<ComponentSet> {
        let step: i64 = match caps.name("modifier")?.as_str().to_lowercase().as_str() {
            "next" => 1,
            _ => -1,
        };
        let mut set = self.base_components(reference);
        match caps.name("unit")?.as_str().to_lowercase().as_str() {
            "week" => {
                let target = reference.checked_add_signed(Duration::days(7 * step))?;
                set.know(Component::Day, target.day() as i64);
                set.imply(Component::Year, target.year() as i64);
                set.imply(Component::Month, target.month() as i64);
            }
            "month" => {
                let target = if step > 0 {
                    reference.checked_add_months(Months::new(1))?
                } else {
                    reference.checked_sub_months(Months::new(1))?
                };
                set.know(Component::Month, target.month() as i64);
                set.imply(Component::Year, target.year() as i64);
                set.imply(Component::Day, target.day() as i64);
            }
            _ => {
                set.know(Component::Year, reference.year() as i64 + step);
            }
        }
        Some(set)
    }

    fn scan<'t>(
        &self,
        regex: &Regex,
        text: &'t str,
        reference: NaiveDateTime,
        found: &mut Vec<(usize, usize, CandidateSpan)>,
        build: impl Fn(&Captures<'t>) -> Option<ComponentSet>,
    ) {
        for caps in regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if let Some(start) = build(&caps) {
                found.push((
                    whole.start(),
                    whole.end(),
                    CandidateSpan::new(whole.as_str(), reference, start),
                ));
            }
        }
    }
}

impl Default for CasualParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CasualParser {
    fn parse(&self, text: &str, reference: NaiveDateTime) -> Vec<CandidateSpan> {
        let mut found: Vec<(usize, usize, CandidateSpan)> = Vec::new();

        for caps in TIME_RANGE_RE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if let Some((start, end)) = self.time_range_candidate(&caps, reference) {
                found.push((
                    whole.start(),
                    whole.end(),
                    CandidateSpan::new(whole.as_str(), reference, start).with_end(end),
                ));
            }
        }
        self.scan(&WEEKDAY_RE, text, reference, &mut found, |caps| {
            self.weekday_candidate(caps, reference)
        });
        self.scan(&RELATIVE_DAY_RE, text, reference, &mut found, |caps| {
            self.relative_day_candidate(caps, reference)
        });
        self.scan(&MONTH_DAY_RE, text, reference, &mut found, |caps| {
            self.month_day_candidate(caps, reference)
        });
        self.scan(&DAY_MONTH_RE, text, reference, &mut found, |caps| {
            self.month_day_candidate(caps, reference)
        });
        self.scan(&ORDINAL_RE, text, reference, &mut found, |caps| {
            self.ordinal_candidate(caps, reference)
        });
        self.scan(&BARE_MONTH_RE, text, reference, &mut found, |caps| {
            self.bare_month_candidate(caps, reference)
        });
        self.scan(&DURATION_RE, text, reference, &mut found, |caps| {
            self.duration_candidate(caps, reference)
        });
        self.scan(&RELATIVE_PERIOD_RE, text, reference, &mut found, |caps| {
            self.relative_period_candidate(caps, reference)
        });
        self.scan(&TIME_RE, text, reference, &mut found, |caps| {
            self.time_candidate(caps, reference)
        });

        let candidates = select_non_overlapping(found);
        debug!("extracted {} candidate(s) from {:?}", candidates.len(), text);
        candidates
    }
}

/// Keep the earliest match at each position, preferring longer matches,
/// and drop anything overlapping an already-kept match. The surviving
/// list is ordered by position in the input.
fn select_non_overlapping(mut found: Vec<(usize, usize, CandidateSpan)>) -> Vec<CandidateSpan> {
    found.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    let mut kept: Vec<(usize, usize, CandidateSpan)> = Vec::new();
    for (start, end, candidate) in found {
        if kept
            .iter()
            .any(|(kept_start, kept_end, _)| start < *kept_end && *kept_start < end)
        {
            continue;
        }
        kept.push((start, end, candidate));
    }
    kept.into_iter().map(|(_, _, candidate)| candidate).collect()
}
