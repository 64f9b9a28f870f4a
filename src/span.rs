//! Merging ordered candidate mentions into one start/end span.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::components::{with_date, with_time, Component};
use crate::config::ResolverConfig;
use crate::parse::{CandidateSpan, Side};

/// The canonical output of span resolution.
///
/// `end` is always strictly after `start`; when the input supplies no
/// usable end, it defaults to one span length past `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// The input with every consumed mention removed.
    pub leftover_text: String,
}

#[derive(Debug, Default, Clone, Copy)]
struct SideFlags {
    start: bool,
    end: bool,
}

impl SideFlags {
    fn get(&self, side: Side) -> bool {
        match side {
            Side::Start => self.start,
            Side::End => self.end,
        }
    }

    fn set(&mut self, side: Side) {
        match side {
            Side::Start => self.start = true,
            Side::End => self.end = true,
        }
    }
}

/// Merge candidate mentions into a single span.
///
/// Start and end both begin at `now`. Candidates apply in emission order;
/// per side, a candidate with a known hour claims the time-of-day
/// dimension, otherwise a known day or weekday claims the calendar-date
/// dimension. The first claim also carries the other dimension along when
/// that one is still unclaimed. A claimed (side, dimension) pair is never
/// revisited, so the first mention wins and later ones are ignored even
/// when more specific. Each applied mention's matched substring is removed
/// from the leftover text.
pub(crate) fn merge_candidates(
    text: &str,
    now: NaiveDateTime,
    candidates: &[CandidateSpan],
    config: &ResolverConfig,
) -> ResolvedSpan {
    let mut start = now;
    let mut end = now;
    let mut leftover = text.to_string();
    let mut fixed_time = SideFlags::default();
    let mut fixed_date = SideFlags::default();

    for candidate in candidates {
        for side in [Side::Start, Side::End] {
            let Some(components) = candidate.side(side) else {
                continue;
            };
            let fields = components.effective();
            let value = |component: Component| fields.get(&component).copied();

            let slot = match side {
                Side::Start => &mut start,
                Side::End => &mut end,
            };

            if components.is_known(Component::Hour) && !fixed_time.get(side) {
                let hour = value(Component::Hour).unwrap_or(0);
                let minute = value(Component::Minute).unwrap_or(0);
                *slot = with_time(*slot, hour, minute);
                if !fixed_date.get(side) {
                    if let (Some(year), Some(month), Some(day)) = (
                        value(Component::Year),
                        value(Component::Month),
                        value(Component::Day),
                    ) {
                        *slot = with_date(*slot, year, month, day);
                    }
                }
                fixed_time.set(side);
                leftover = leftover.replacen(&candidate.text, "", 1);
            } else if (components.is_known(Component::Day)
                || components.is_known(Component::Weekday))
                && !fixed_date.get(side)
            {
                if let (Some(year), Some(month), Some(day)) = (
                    value(Component::Year),
                    value(Component::Month),
                    value(Component::Day),
                ) {
                    *slot = with_date(*slot, year, month, day);
                }
                if !fixed_time.get(side) {
                    let hour = value(Component::Hour).unwrap_or(0);
                    let minute = value(Component::Minute).unwrap_or(0);
                    *slot = with_time(*slot, hour, minute);
                }
                fixed_date.set(side);
                leftover = leftover.replacen(&candidate.text, "", 1);
            }
        }
    }

    // The end looks unassigned when it never moved off `now`; an explicit
    // end equal to `now` is indistinguishable and gets the same treatment.
    if end == now || end <= start {
        end = start + Duration::minutes(config.default_duration_minutes);
    }

    ResolvedSpan {
        start,
        end,
        leftover_text: leftover,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentSet;
    use chrono::{Duration, NaiveDate};

    // Wednesday.
    fn wednesday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 11)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn time_mention(text: &str, reference: NaiveDateTime, hour: i64) -> CandidateSpan {
        let mut start = ComponentSet::new();
        start.imply(Component::Year, 2025);
        start.imply(Component::Month, 6);
        start.imply(Component::Day, 11);
        start.know(Component::Hour, hour);
        start.imply(Component::Minute, 0);
        CandidateSpan::new(text, reference, start)
    }

    fn date_mention(text: &str, reference: NaiveDateTime, day: i64) -> CandidateSpan {
        let mut start = ComponentSet::new();
        start.know(Component::Day, day);
        start.imply(Component::Year, 2025);
        start.imply(Component::Month, 6);
        start.imply(Component::Hour, 12);
        start.imply(Component::Minute, 0);
        CandidateSpan::new(text, reference, start)
    }

    #[test]
    fn no_candidates_yields_default_span() {
        let now = wednesday_noon();
        let span = merge_candidates("status update", now, &[], &ResolverConfig::default());
        assert_eq!(span.start, now);
        assert_eq!(span.end, now + Duration::hours(1));
        assert_eq!(span.leftover_text, "status update");
    }

    #[test]
    fn time_mention_sets_clock_and_carries_date() {
        let now = wednesday_noon();
        let candidates = vec![time_mention("at 3pm", now, 15)];
        let span = merge_candidates("meet at 3pm", now, &candidates, &ResolverConfig::default());
        assert_eq!(span.start, dt(2025, 6, 11, 15, 0));
        assert_eq!(span.end, dt(2025, 6, 11, 16, 0));
        assert_eq!(span.leftover_text, "meet ");
    }

    #[test]
    fn first_time_mention_wins_per_side() {
        let now = wednesday_noon();
        let candidates = vec![
            time_mention("4pm", now, 16),
            time_mention("6pm", now, 18),
        ];
        let span = merge_candidates("4pm or 6pm", now, &candidates, &ResolverConfig::default());
        assert_eq!(span.start, dt(2025, 6, 11, 16, 0));
        // The second mention is ignored outright, so its text stays.
        assert_eq!(span.leftover_text, " or 6pm");
    }

    #[test]
    fn time_and_date_mentions_combine_across_candidates() {
        let now = wednesday_noon();
        let candidates = vec![
            time_mention("at 9am", now, 9),
            date_mention("the 20th", now, 20),
        ];
        let span = merge_candidates(
            "at 9am the 20th",
            now,
            &candidates,
            &ResolverConfig::default(),
        );
        // Time from the first mention, date from the second.
        assert_eq!(span.start, dt(2025, 6, 20, 9, 0));
        assert_eq!(span.leftover_text, " ");
    }

    #[test]
    fn range_sets_both_sides() {
        let now = wednesday_noon();
        let mut end_set = ComponentSet::new();
        end_set.imply(Component::Year, 2025);
        end_set.imply(Component::Month, 6);
        end_set.imply(Component::Day, 11);
        end_set.know(Component::Hour, 17);
        end_set.imply(Component::Minute, 0);
        let candidate = time_mention("3pm to 5pm", now, 15).with_end(end_set);
        let span =
            merge_candidates("3pm to 5pm", now, &[candidate], &ResolverConfig::default());
        assert_eq!(span.start, dt(2025, 6, 11, 15, 0));
        assert_eq!(span.end, dt(2025, 6, 11, 17, 0));
        assert_eq!(span.leftover_text, "");
    }

    #[test]
    fn inverted_range_falls_back_to_default_duration() {
        let now = wednesday_noon();
        let mut end_set = ComponentSet::new();
        end_set.imply(Component::Year, 2025);
        end_set.imply(Component::Month, 6);
        end_set.imply(Component::Day, 11);
        end_set.know(Component::Hour, 10);
        end_set.imply(Component::Minute, 0);
        let candidate = time_mention("5pm to 10am", now, 17).with_end(end_set);
        let span =
            merge_candidates("5pm to 10am", now, &[candidate], &ResolverConfig::default());
        assert_eq!(span.start, dt(2025, 6, 11, 17, 0));
        assert_eq!(span.end, dt(2025, 6, 11, 18, 0));
    }

    #[test]
    fn default_duration_is_configurable() {
        let now = wednesday_noon();
        let config = ResolverConfig {
            default_duration_minutes: 30,
            ..ResolverConfig::default()
        };
        let span = merge_candidates("nothing here", now, &[], &config);
        assert_eq!(span.end, now + Duration::minutes(30));
    }

    #[test]
    fn leftover_removes_only_first_occurrence() {
        let now = wednesday_noon();
        let candidates = vec![time_mention("3pm", now, 15)];
        let span = merge_candidates("3pm 3pm", now, &candidates, &ResolverConfig::default());
        assert_eq!(span.leftover_text, " 3pm");
    }
}
