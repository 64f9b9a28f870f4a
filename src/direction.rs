//! Temporal direction refinement.
//!
//! "Monday" or "the 5th" name a calendar point without saying which one.
//! A direction refiner pushes such mentions strictly into the future or
//! past by adjusting only components the parser implied; anything the text
//! states outright is never altered, and a mention with no implied
//! component left to adjust stays where it is.

use chrono::NaiveDateTime;

use crate::components::{assemble, Component, ComponentSet};
use crate::parse::{CandidateSpan, Refiner};

/// Which side of the reference timestamp ambiguous mentions resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Future,
    Past,
}

/// Refiner pass that forces ambiguous mentions onto one side of their
/// reference timestamp.
///
/// Per candidate side, three checks run against the effective mapping,
/// each independent of the others: weekday known without day shifts the
/// implied day a week, day known without month shifts the implied month,
/// month known without year shifts the implied year. Future mode steps
/// forward and fires when the mention falls strictly before the
/// reference; past mode steps backward and fires when it does not.
#[derive(Debug, Clone, Copy)]
pub struct DirectionRefiner {
    direction: Direction,
}

impl DirectionRefiner {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn future() -> Self {
        Self::new(Direction::Future)
    }

    pub fn past() -> Self {
        Self::new(Direction::Past)
    }

    fn needs_adjustment(&self, candidate: NaiveDateTime, reference: NaiveDateTime) -> bool {
        match self.direction {
            Direction::Future => candidate < reference,
            Direction::Past => candidate >= reference,
        }
    }

    fn step(&self) -> i64 {
        match self.direction {
            Direction::Future => 1,
            Direction::Past => -1,
        }
    }

    fn refine_side(&self, reference: NaiveDateTime, side: &mut ComponentSet) {
        let Some(effective) = assemble(&side.effective()) else {
            return;
        };
        if !self.needs_adjustment(effective, reference) {
            return;
        }

        let step = self.step();
        if side.is_known(Component::Weekday) && !side.is_known(Component::Day) {
            if let Some(day) = side.implied_value(Component::Day) {
                side.imply(Component::Day, day + 7 * step);
            }
        }
        if side.is_known(Component::Day) && !side.is_known(Component::Month) {
            if let Some(month) = side.implied_value(Component::Month) {
                side.imply(Component::Month, month + step);
            }
        }
        if side.is_known(Component::Month) && !side.is_known(Component::Year) {
            if let Some(year) = side.implied_value(Component::Year) {
                side.imply(Component::Year, year + step);
            }
        }
    }
}

impl Refiner for DirectionRefiner {
    fn refine(&self, _text: &str, mut spans: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
        for span in &mut spans {
            let reference = span.reference;
            self.refine_side(reference, &mut span.start);
            if let Some(end) = span.end.as_mut() {
                self.refine_side(reference, end);
            }
        }
        spans
    }
}
