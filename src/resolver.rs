//! The resolution service: shorthand expansion, parsing, direction
//! refinement, and span merging behind one entry point.

use chrono::NaiveDateTime;
use log::{debug, warn};

use crate::casual::CasualParser;
use crate::components::assemble;
use crate::config::{ConfigError, ResolverConfig};
use crate::direction::DirectionRefiner;
use crate::parse::RefinedParser;
use crate::rounding::local_now;
use crate::shorthand::expand_shorthand;
use crate::span::{merge_candidates, ResolvedSpan};

/// Resolves free-form date/time text into calendar spans.
///
/// Holds three parser pipelines over the same grammar: a plain one for
/// span resolution and a future-forcing and past-forcing pair for the
/// one-shot date lookups. Construct once at application startup and share
/// by reference; all methods take `&self` and the instance keeps no
/// per-call state.
pub struct DateResolver {
    config: ResolverConfig,
    timezone: Option<String>,
    plain: RefinedParser,
    future: RefinedParser,
    past: RefinedParser,
}

impl DateResolver {
    /// Build a resolver with the default anchors.
    pub fn new() -> Self {
        Self::build(ResolverConfig::default())
    }

    /// Build a resolver with custom anchors.
    pub fn with_config(config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ResolverConfig) -> Self {
        let plain = RefinedParser::new(CasualParser::with_config(config.clone()));
        let future = RefinedParser::new(CasualParser::with_config(config.clone()))
            .with_refiner(DirectionRefiner::future());
        let past = RefinedParser::new(CasualParser::with_config(config.clone()))
            .with_refiner(DirectionRefiner::past());
        Self {
            config,
            timezone: detect_timezone(),
            plain,
            future,
            past,
        }
    }

    /// The detected IANA timezone name, when detection succeeded.
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// Resolve `text` against the current local time.
    pub fn resolve_span(&self, text: &str) -> ResolvedSpan {
        self.resolve_span_at(text, local_now())
    }

    /// Resolve `text` against an explicit reference timestamp.
    ///
    /// Always returns a structurally valid span: with no recognizable
    /// mention, start is `now` and end is the default duration later.
    pub fn resolve_span_at(&self, text: &str, now: NaiveDateTime) -> ResolvedSpan {
        let candidates = self.plain.parse(text, now);
        merge_candidates(text, now, &candidates, &self.config)
    }

    /// Parse `text` (shorthand allowed), forcing ambiguous mentions into
    /// the future. `None` when nothing parses or the result is not
    /// strictly after the current time.
    pub fn future_date_from_string(&self, text: &str) -> Option<NaiveDateTime> {
        self.future_date_at(text, local_now())
    }

    /// As [`DateResolver::future_date_from_string`], against an explicit
    /// "now".
    pub fn future_date_at(&self, text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = self.first_date(&self.future, text, now)?;
        (date > now).then_some(date)
    }

    /// Parse `text` (shorthand allowed), forcing ambiguous mentions into
    /// the past. `None` when nothing parses or the result is not strictly
    /// before the current time.
    pub fn past_date_from_string(&self, text: &str) -> Option<NaiveDateTime> {
        self.past_date_at(text, local_now())
    }

    /// As [`DateResolver::past_date_from_string`], against an explicit
    /// "now".
    pub fn past_date_at(&self, text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let date = self.first_date(&self.past, text, now)?;
        (date < now).then_some(date)
    }

    fn first_date(
        &self,
        parser: &RefinedParser,
        text: &str,
        now: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let expanded = expand_shorthand(text);
        let candidates = parser.parse(&expanded, now);
        let first = candidates.first()?;
        assemble(&first.start.effective())
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn detect_timezone() -> Option<String> {
    match iana_time_zone::get_timezone() {
        Ok(tz) => {
            debug!("local timezone detected as {}", tz);
            Some(tz)
        }
        Err(err) => {
            warn!(
                "local timezone could not be determined ({}); continuing with the environment default",
                err
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    // Wednesday.
    fn wednesday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 11)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    // The Monday of the same week.
    fn monday_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 9)
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

    #[test]
    fn next_monday_at_2pm_resolves_to_upcoming_monday() {
        let resolver = DateResolver::new();
        let span = resolver.resolve_span_at("next Monday at 2pm", wednesday_noon());
        assert_eq!(span.start, dt(2025, 6, 16, 14, 0));
        assert_eq!(span.end, dt(2025, 6, 16, 15, 0));
    }

    #[test]
    fn time_without_date_stays_on_todays_date() {
        let resolver = DateResolver::new();
        let span = resolver.resolve_span_at("meet at 3pm", wednesday_noon());
        assert_eq!(span.start, dt(2025, 6, 11, 15, 0));
        assert_eq!(span.end, dt(2025, 6, 11, 16, 0));
        assert_eq!(span.leftover_text, "meet ");
    }

    #[test]
    fn no_mention_yields_now_plus_default_duration() {
        let resolver = DateResolver::new();
        let now = wednesday_noon();
        let span = resolver.resolve_span_at("release checklist", now);
        assert_eq!(span.start, now);
        assert_eq!(span.end, now + Duration::hours(1));
        assert_eq!(span.leftover_text, "release checklist");
    }

    #[test]
    fn range_resolves_start_and_end() {
        let resolver = DateResolver::new();
        let span = resolver.resolve_span_at("busy 3pm to 5pm", wednesday_noon());
        assert_eq!(span.start, dt(2025, 6, 11, 15, 0));
        assert_eq!(span.end, dt(2025, 6, 11, 17, 0));
        assert_eq!(span.leftover_text, "busy ");
    }

    #[test]
    fn future_date_skips_over_today_for_next_weekday() {
        let resolver = DateResolver::new();
        let date = resolver.future_date_at("next Monday", monday_noon());
        assert_eq!(date, Some(dt(2025, 6, 16, 12, 0)));
    }

    #[test]
    fn future_date_pushes_plain_weekday_forward() {
        let resolver = DateResolver::new();
        // This week's Monday is two days in the past.
        let date = resolver.future_date_at("Monday", wednesday_noon());
        assert_eq!(date, Some(dt(2025, 6, 16, 12, 0)));
    }

    #[test]
    fn past_date_pulls_plain_weekday_backward() {
        let resolver = DateResolver::new();
        // This week's Friday is two days ahead.
        let date = resolver.past_date_at("Friday", wednesday_noon());
        assert_eq!(date, Some(dt(2025, 6, 6, 12, 0)));
    }

    #[test]
    fn future_date_expands_shorthand_first() {
        let resolver = DateResolver::new();
        let now = wednesday_noon();
        assert_eq!(
            resolver.future_date_at("2h", now),
            Some(now + Duration::hours(2))
        );
        assert_eq!(
            resolver.future_date_at("tom 3pm", now),
            Some(dt(2025, 6, 12, 15, 0))
        );
        assert_eq!(resolver.future_date_at("t", now), Some(dt(2025, 6, 12, 9, 0)));
    }

    #[test]
    fn future_date_is_none_for_unparseable_input() {
        let resolver = DateResolver::new();
        assert_eq!(resolver.future_date_at("whenever works", wednesday_noon()), None);
        assert_eq!(resolver.past_date_at("whenever works", wednesday_noon()), None);
    }

    #[test]
    fn future_date_is_none_for_unrecoverable_past() {
        let resolver = DateResolver::new();
        // All components known, so nothing is adjustable.
        assert_eq!(resolver.future_date_at("yesterday", wednesday_noon()), None);
        assert_eq!(resolver.past_date_at("tomorrow", wednesday_noon()), None);
    }

    #[test]
    fn explicit_year_survives_both_directions() {
        let resolver = DateResolver::new();
        let now = wednesday_noon();
        assert_eq!(
            resolver.future_date_at("June 5 2099", now),
            Some(dt(2099, 6, 5, 12, 0))
        );
        // 2099 is in the future, so the past lookup rejects it rather
        // than rewriting the stated year.
        assert_eq!(resolver.past_date_at("June 5 2099", now), None);
    }

    #[test]
    fn direction_guarantee_holds_across_inputs() {
        let resolver = DateResolver::new();
        let now = wednesday_noon();
        let inputs = [
            "Monday", "next Friday", "tomorrow", "yesterday", "the 5th", "June 5", "3pm",
            "2h", "nw", "not a date",
        ];
        for input in inputs {
            if let Some(date) = resolver.future_date_at(input, now) {
                assert!(date > now, "future resolution of {:?} not after now", input);
            }
            if let Some(date) = resolver.past_date_at(input, now) {
                assert!(date < now, "past resolution of {:?} not before now", input);
            }
        }
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = ResolverConfig {
            morning_hour: 30,
            ..ResolverConfig::default()
        };
        assert!(DateResolver::with_config(config).is_err());
    }

    #[test]
    fn snapshot_cross_candidate_merge() {
        let resolver = DateResolver::new();
        let span = resolver.resolve_span_at("standup at 9:30am tomorrow", wednesday_noon());
        let rendered = format!(
            "{} -> {} [{}]",
            span.start.format("%Y-%m-%d %H:%M"),
            span.end.format("%Y-%m-%d %H:%M"),
            span.leftover_text
        );
        insta::assert_snapshot!(rendered, @"2025-06-12 09:30 -> 2025-06-12 10:30 [standup  ]");
    }
}
