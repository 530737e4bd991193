//! Coalesced set of received byte ranges
//!
//! Used by the coverage completion strategy: a message only completes once
//! the union of received chunk ranges spans the whole buffer, so duplicated
//! or overlapping chunks can no longer fake completion.

use std::cmp;
use std::collections::BTreeMap;
use std::ops::{
    Bound::{Excluded, Included},
    Range,
};

/// Disjoint, non-adjacent ranges keyed by start, valued by end
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoverageSet(BTreeMap<usize, usize>);

impl CoverageSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a range, merging it with every range it touches
    ///
    /// Returns false if the range was empty or already wholly covered.
    pub fn insert(&mut self, mut range: Range<usize>) -> bool {
        if range.is_empty() {
            return false;
        }
        if let Some((start, end)) = self.pred(range.start) {
            if end >= range.end {
                // Wholly contained
                return false;
            } else if end >= range.start {
                // Extend overlapping or adjacent predecessor
                self.0.remove(&start);
                range.start = start;
            }
        }
        while let Some((next_start, next_end)) = self.succ(range.start) {
            if next_start > range.end {
                break;
            }
            self.0.remove(&next_start);
            range.end = cmp::max(next_end, range.end);
        }
        self.0.insert(range.start, range.end);
        true
    }

    /// True if every byte of `range` has been received
    pub fn covers(&self, range: Range<usize>) -> bool {
        if range.is_empty() {
            return true;
        }
        self.pred(range.start)
            .is_some_and(|(_, end)| end >= range.end)
    }

    /// Total number of distinct bytes covered
    pub fn covered_len(&self) -> usize {
        self.0.iter().map(|(start, end)| end - start).sum()
    }

    /// Number of disjoint ranges (gaps + 1 when non-empty)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Find closest range to `x` that begins at or before it
    fn pred(&self, x: usize) -> Option<(usize, usize)> {
        self.0
            .range((Included(0), Included(x)))
            .next_back()
            .map(|(&start, &end)| (start, end))
    }

    /// Find the closest range to `x` that begins after it
    fn succ(&self, x: usize) -> Option<(usize, usize)> {
        self.0
            .range((Excluded(x), Included(usize::MAX)))
            .next()
            .map(|(&start, &end)| (start, end))
    }
}
