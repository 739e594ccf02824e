//! This module keeps track of how many events pass each selection cut

use crate::numeric::Float;
use std::fmt::{self, Display};
use tracing::debug;

/// Event counters of one named cut
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutCounter {
    /// Human-readable cut description
    name: String,

    /// Number of events which reached this cut
    seen: usize,

    /// Number of events which passed this cut
    passed: usize,
}
//
impl CutCounter {
    /// Set up a counter which has not seen any event yet
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            seen: 0,
            passed: 0,
        }
    }

    /// Description of the cut
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of events which reached this cut
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Number of events which passed this cut
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Fraction of the events reaching this cut which passed it, in percent
    pub fn efficiency(&self) -> Float {
        percentage(self.passed, self.seen)
    }
}

/// Named cut counters, in the order where the cuts were first applied
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CutFlow {
    cuts: Vec<CutCounter>,
}
//
impl CutFlow {
    /// Start with no cut recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of applying a cut to one event
    pub fn record(&mut self, name: &str, passed: bool) {
        let counter = self.counter_mut(name);
        counter.seen += 1;
        counter.passed += passed as usize;
    }

    /// Record the outcome of a cut, log rejections, and forward the outcome
    pub fn check(&mut self, name: &str, passed: bool) -> bool {
        self.record(name, passed);
        if !passed {
            debug!(cut = name, "Event rejected");
        }
        passed
    }

    /// Integrate the counters of another cut flow, e.g. from another worker
    #[allow(clippy::needless_pass_by_value)]
    pub fn merge(&mut self, other: Self) {
        for cut in other.cuts {
            let counter = self.counter_mut(&cut.name);
            counter.seen += cut.seen;
            counter.passed += cut.passed;
        }
    }

    /// Counters of a given cut, if it was ever applied
    pub fn get(&self, name: &str) -> Option<&CutCounter> {
        self.cuts.iter().find(|cut| cut.name == name)
    }

    /// Iterate over the cut counters in application order
    pub fn iter(&self) -> impl Iterator<Item = &CutCounter> {
        self.cuts.iter()
    }

    /// Number of distinct cuts recorded so far
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    /// Truth that no cut was recorded yet
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Access a cut's counter, creating it on first use
    fn counter_mut(&mut self, name: &str) -> &mut CutCounter {
        let pos = match self.cuts.iter().position(|cut| cut.name == name) {
            Some(pos) => pos,
            None => {
                self.cuts.push(CutCounter::new(name));
                self.cuts.len() - 1
            }
        };
        &mut self.cuts[pos]
    }
}

/// Ratio of two event counts in percent, zero if nothing was seen
fn percentage(passed: usize, seen: usize) -> Float {
    if seen == 0 {
        0.
    } else {
        100. * (passed as Float) / (seen as Float)
    }
}

impl Display for CutFlow {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cumulative efficiencies are relative to the events entering the
        // first cut
        let total = self.cuts.first().map_or(0, |cut| cut.seen);
        for cut in &self.cuts {
            writeln!(
                fmt,
                "{:<40}: pass={:<10} all={:<10} -- eff={:.2} % cumulative eff={:.2} %",
                cut.name,
                cut.passed,
                cut.seen,
                cut.efficiency(),
                percentage(cut.passed, total)
            )?;
        }
        Ok(())
    }
}
