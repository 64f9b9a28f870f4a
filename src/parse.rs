//! The parser and refiner seams the resolution pipeline is built on.
//!
//! Extraction itself (grammar, tokenization) lives behind [`Parser`];
//! post-processing passes live behind [`Refiner`]. [`RefinedParser`]
//! composes one concrete parser with an ordered list of refiner passes,
//! so direction forcing is an explicit transform over the candidate list
//! rather than hidden state on a shared parser instance.

use chrono::NaiveDateTime;

use crate::components::ComponentSet;

/// Which side of a span a component mapping describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

/// One date/time mention extracted from an input string.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSpan {
    /// The exact substring that matched.
    pub text: String,
    /// "Now" at parse time; implied components default from this.
    pub reference: NaiveDateTime,
    pub start: ComponentSet,
    /// Present only for range mentions like "3pm to 5pm".
    pub end: Option<ComponentSet>,
}

impl CandidateSpan {
    pub fn new(text: impl Into<String>, reference: NaiveDateTime, start: ComponentSet) -> Self {
        Self {
            text: text.into(),
            reference,
            start,
            end: None,
        }
    }

    pub fn with_end(mut self, end: ComponentSet) -> Self {
        self.end = Some(end);
        self
    }

    pub fn side(&self, side: Side) -> Option<&ComponentSet> {
        match side {
            Side::Start => Some(&self.start),
            Side::End => self.end.as_ref(),
        }
    }
}

/// Text-to-mention extraction.
///
/// Implementations own the grammar; everything downstream depends only on
/// the ordered candidate list. Implementations must be stateless with
/// respect to call arguments so a shared instance can serve concurrent
/// callers.
pub trait Parser {
    /// Extract candidate mentions from `text`, in order of appearance.
    fn parse(&self, text: &str, reference: NaiveDateTime) -> Vec<CandidateSpan>;
}

/// A post-processing pass over extracted mentions.
pub trait Refiner {
    /// Transform the candidate list; invoked once per parse, after
    /// extraction.
    fn refine(&self, text: &str, spans: Vec<CandidateSpan>) -> Vec<CandidateSpan>;
}

/// A parser plus an ordered list of refiner passes.
pub struct RefinedParser {
    parser: Box<dyn Parser + Send + Sync>,
    refiners: Vec<Box<dyn Refiner + Send + Sync>>,
}

impl RefinedParser {
    pub fn new(parser: impl Parser + Send + Sync + 'static) -> Self {
        Self {
            parser: Box::new(parser),
            refiners: Vec::new(),
        }
    }

    /// Append a refiner pass. Passes run in registration order.
    pub fn with_refiner(mut self, refiner: impl Refiner + Send + Sync + 'static) -> Self {
        self.refiners.push(Box::new(refiner));
        self
    }

    pub fn parse(&self, text: &str, reference: NaiveDateTime) -> Vec<CandidateSpan> {
        let mut spans = self.parser.parse(text, reference);
        for refiner in &self.refiners {
            spans = refiner.refine(text, spans);
        }
        spans
    }
}
