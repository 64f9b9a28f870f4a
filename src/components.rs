//! Date/time component mappings with known/implied layering.
//!
//! A mention like "next Monday at 2pm" carries two kinds of information:
//! components the text states outright (weekday, hour) and components a
//! parser fills in from the reference timestamp (day, month, year, minute).
//! [`ComponentSet`] keeps the two layers separate so downstream passes can
//! tell what the author actually wrote, and [`assemble`] turns a merged
//! mapping back into a timestamp.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

/// A single date/time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    Year,
    /// Calendar month, 1-indexed.
    Month,
    /// Day of month.
    Day,
    /// Day of week, 0 = Sunday through 6 = Saturday.
    Weekday,
    Hour,
    Minute,
}

/// Component values for one side of a mention, split into a **known** layer
/// (explicitly present in the text) and an **implied** layer (defaulted from
/// the reference timestamp). Known wins over implied per component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSet {
    known: BTreeMap<Component, i64>,
    implied: BTreeMap<Component, i64>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a component explicitly stated in the text.
    pub fn know(&mut self, component: Component, value: i64) {
        self.known.insert(component, value);
    }

    /// Record a defaulted component. Overwrites a previous implied value but
    /// never shadows a known one.
    pub fn imply(&mut self, component: Component, value: i64) {
        self.implied.insert(component, value);
    }

    pub fn is_known(&self, component: Component) -> bool {
        self.known.contains_key(&component)
    }

    pub fn known_value(&self, component: Component) -> Option<i64> {
        self.known.get(&component).copied()
    }

    pub fn implied_value(&self, component: Component) -> Option<i64> {
        self.implied.get(&component).copied()
    }

    /// Known value if present, implied otherwise.
    pub fn get(&self, component: Component) -> Option<i64> {
        self.known_value(component)
            .or_else(|| self.implied_value(component))
    }

    /// Merge the two layers into one mapping, known overriding implied field
    /// by field.
    pub fn effective(&self) -> BTreeMap<Component, i64> {
        let mut merged = self.implied.clone();
        for (component, value) in &self.known {
            merged.insert(*component, *value);
        }
        merged
    }
}

/// Build a timestamp from an effective component mapping.
///
/// Out-of-range values roll over arithmetically: day 35 of a 30-day month
/// lands in the next month, month 13 in the next year, hour 24 at midnight
/// of the next day. Refiner adjustments rely on this. Returns `None` when
/// the year is absent or outside chrono's representable range.
pub fn assemble(fields: &BTreeMap<Component, i64>) -> Option<NaiveDateTime> {
    let year = fields.get(&Component::Year).copied()?;
    let month = fields.get(&Component::Month).copied().unwrap_or(1);
    let day = fields.get(&Component::Day).copied().unwrap_or(1);
    let hour = fields.get(&Component::Hour).copied().unwrap_or(0);
    let minute = fields.get(&Component::Minute).copied().unwrap_or(0);

    let months_past_january = month - 1;
    let year = i32::try_from(year + months_past_january.div_euclid(12)).ok()?;
    let month = months_past_january.rem_euclid(12) as u32 + 1;

    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(
        first.and_hms_opt(0, 0, 0)?
            + Duration::days(day - 1)
            + Duration::hours(hour)
            + Duration::minutes(minute),
    )
}

/// Replace the time-of-day fields of `dt`, keeping its date and seconds.
/// Hour values past 23 roll into the following day.
pub(crate) fn with_time(dt: NaiveDateTime, hour: i64, minute: i64) -> NaiveDateTime {
    match dt.date().and_hms_opt(0, 0, 0) {
        Some(start_of_day) => {
            start_of_day
                + Duration::hours(hour)
                + Duration::minutes(minute)
                + Duration::seconds(dt.time().second() as i64)
        }
        None => dt,
    }
}

/// Replace the calendar-date fields of `dt`, keeping its time of day.
/// Month and day overflow roll over like [`assemble`].
pub(crate) fn with_date(dt: NaiveDateTime, year: i64, month: i64, day: i64) -> NaiveDateTime {
    let months_past_january = month - 1;
    let month = months_past_january.rem_euclid(12) as u32 + 1;
    let Ok(year) = i32::try_from(year + months_past_january.div_euclid(12)) else {
        return dt;
    };
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(first) => (first + Duration::days(day - 1)).and_time(dt.time()),
        None => dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn known_takes_precedence_over_implied() {
        let mut set = ComponentSet::new();
        set.imply(Component::Hour, 12);
        set.know(Component::Hour, 15);
        set.imply(Component::Minute, 30);

        assert_eq!(set.get(Component::Hour), Some(15));
        assert_eq!(set.get(Component::Minute), Some(30));

        let merged = set.effective();
        assert_eq!(merged.get(&Component::Hour), Some(&15));
        assert_eq!(merged.get(&Component::Minute), Some(&30));
    }

    #[test]
    fn imply_does_not_shadow_known() {
        let mut set = ComponentSet::new();
        set.know(Component::Day, 5);
        set.imply(Component::Day, 11);
        assert_eq!(set.get(Component::Day), Some(5));
        assert_eq!(set.implied_value(Component::Day), Some(11));
    }

    #[test]
    fn assemble_plain_fields() {
        let mut set = ComponentSet::new();
        set.know(Component::Year, 2025);
        set.know(Component::Month, 6);
        set.know(Component::Day, 11);
        set.know(Component::Hour, 14);
        set.know(Component::Minute, 30);
        assert_eq!(assemble(&set.effective()), Some(dt(2025, 6, 11, 14, 30)));
    }

    #[test]
    fn assemble_rolls_day_overflow_into_next_month() {
        let mut fields = BTreeMap::new();
        fields.insert(Component::Year, 2025);
        fields.insert(Component::Month, 6);
        fields.insert(Component::Day, 35);
        assert_eq!(assemble(&fields), Some(dt(2025, 7, 5, 0, 0)));
    }

    #[test]
    fn assemble_rolls_month_overflow_into_next_year() {
        let mut fields = BTreeMap::new();
        fields.insert(Component::Year, 2025);
        fields.insert(Component::Month, 13);
        fields.insert(Component::Day, 2);
        assert_eq!(assemble(&fields), Some(dt(2026, 1, 2, 0, 0)));
    }

    #[test]
    fn assemble_rolls_hour_24_into_next_day() {
        let mut fields = BTreeMap::new();
        fields.insert(Component::Year, 2025);
        fields.insert(Component::Month, 6);
        fields.insert(Component::Day, 11);
        fields.insert(Component::Hour, 24);
        assert_eq!(assemble(&fields), Some(dt(2025, 6, 12, 0, 0)));
    }

    #[test]
    fn assemble_requires_a_year() {
        let mut fields = BTreeMap::new();
        fields.insert(Component::Month, 6);
        assert_eq!(assemble(&fields), None);
    }

    #[test]
    fn with_time_keeps_date_and_seconds() {
        let base = NaiveDate::from_ymd_opt(2025, 6, 11)
            .unwrap()
            .and_hms_opt(8, 45, 17)
            .unwrap();
        let adjusted = with_time(base, 15, 0);
        assert_eq!(
            adjusted,
            NaiveDate::from_ymd_opt(2025, 6, 11)
                .unwrap()
                .and_hms_opt(15, 0, 17)
                .unwrap()
        );
    }

    #[test]
    fn with_date_keeps_time_and_rolls_overflow() {
        let base = dt(2025, 6, 11, 9, 30);
        assert_eq!(with_date(base, 2025, 6, 16), dt(2025, 6, 16, 9, 30));
        assert_eq!(with_date(base, 2025, 6, 35), dt(2025, 7, 5, 9, 30));
        assert_eq!(with_date(base, 2025, 0, 15), dt(2024, 12, 15, 9, 30));
    }
}
