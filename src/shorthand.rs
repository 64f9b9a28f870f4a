//! Compact-token expansion applied before parsing.
//!
//! Quick-compose inputs lean on shorthand: "2h", "tom 3pm", "nw". These
//! rewrite into phrases the parser grammar recognizes. Expansion is a pure
//! text-to-text pass and is idempotent: an expanded phrase matches none of
//! the rules a second time around.

use once_cell::sync::Lazy;
use regex::Regex;

static BARE_CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").expect("bare clock regex"));
static UNIT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(h|d|w|mo?)$").expect("unit suffix regex"));

const TOMORROW_ALIASES: &[&str] = &["t", "to", "tom", "tom "];
const NEXT_WEEK_ALIASES: &[&str] = &["nw", "next week"];

/// Rewrite compact date/time shorthand into a parser-friendly phrase.
///
/// Rules are tried in order and the first match wins; anything
/// unrecognized passes through unchanged.
///
/// - `"123"` → `"1:23"`, `"1234"` → `"12:34"`
/// - `"2h"` → `"2 hours"`, `"3d"` → `"3 days"`, `"2w"` → `"2 weeks"`,
///   `"2m"` / `"2mo"` → `"2 months"`
/// - `"t"`, `"to"`, `"tom"` → `"tomorrow morning"`
/// - `"nw"`, `"next week"` → `"next Monday"`
/// - `"tom <rest>"` → `"tomorrow <rest>"`
pub fn expand_shorthand(text: &str) -> String {
    if BARE_CLOCK.is_match(text) {
        let split = text.len() - 2;
        return format!("{}:{}", &text[..split], &text[split..]);
    }

    if let Some(caps) = UNIT_SUFFIX.captures(text) {
        let unit = match &caps[2] {
            "h" => "hours",
            "d" => "days",
            "w" => "weeks",
            _ => "months",
        };
        return format!("{} {}", &caps[1], unit);
    }

    if TOMORROW_ALIASES.contains(&text) {
        return "tomorrow morning".to_string();
    }

    if NEXT_WEEK_ALIASES.contains(&text) {
        return "next Monday".to_string();
    }

    if let Some(rest) = text.strip_prefix("tom ") {
        return format!("tomorrow {}", rest);
    }

    text.to_string()
}
