//! Natural-language date/time span resolution.
//!
//! Turns quick-compose strings like "next Monday at 2pm", "tom 3pm", or
//! "2h" into a concrete calendar span. The hard part is not tokenization
//! but disambiguation: deciding *which* Monday an ambiguous mention means,
//! and merging several independent mentions in one string into a single
//! consistent start/end pair.
//!
//! ## Pipeline
//!
//! raw text → [`expand_shorthand`] → a [`Parser`] (optionally wrapped in a
//! [`RefinedParser`] with [`DirectionRefiner`] passes) → ordered
//! [`CandidateSpan`]s → span merge → [`ResolvedSpan`].
//!
//! [`DateResolver`] wires the pipeline up with the built-in
//! [`CasualParser`] grammar. Construct it once at startup and share it;
//! any other grammar can be slotted in through the [`Parser`] trait.
//!
//! ## Example
//!
//! ```
//! use datespan::DateResolver;
//! use chrono::NaiveDate;
//!
//! let resolver = DateResolver::new();
//! let now = NaiveDate::from_ymd_opt(2025, 6, 11)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//!
//! let span = resolver.resolve_span_at("meet at 3pm", now);
//! assert_eq!(span.start.to_string(), "2025-06-11 15:00:00");
//! assert_eq!(span.end.to_string(), "2025-06-11 16:00:00");
//! assert_eq!(span.leftover_text, "meet ");
//! ```

mod casual;
mod components;
mod config;
mod direction;
mod parse;
mod resolver;
pub mod rounding;
mod shorthand;
mod span;

pub use casual::CasualParser;
pub use components::{assemble, Component, ComponentSet};
pub use config::{ConfigError, ResolverConfig};
pub use direction::{Direction, DirectionRefiner};
pub use parse::{CandidateSpan, Parser, RefinedParser, Refiner, Side};
pub use resolver::DateResolver;
pub use shorthand::expand_shorthand;
pub use span::ResolvedSpan;
