// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! MultiSpan - Normalized Set of Spans
//!
//! Keeps its members pairwise disjoint: every insertion merges into an
//! existing span when they overlap and then re-stabilizes the set, because one
//! merge may bring two previously separate spans into contact. Members that
//! only sit next to each other (`[0,1]`, `[2,3]`) stay separate.
//!
//! Revision range sets are small (tens to hundreds of spans), so the
//! stabilization pass is a plain fixed-point loop over a `Vec`.

use super::span::{Span, SpanError};
use std::fmt;
use std::str::FromStr;

/// Self-normalizing set of disjoint spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSpan {
    spans: Vec<Span>,
}

impl MultiSpan {
    /// Create an empty set
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Insert a span, coalescing it with any overlapping member.
    ///
    /// Always succeeds; returns true to mirror set insertion.
    pub fn add(&mut self, span: Span) -> bool {
        // `any` stops at the first member that absorbs the span
        let merged = self.spans.iter_mut().any(|current| current.merge(&span));
        if merged {
            self.reduce();
        } else {
            self.spans.push(span);
        }
        true
    }

    /// Rebuild the set by re-inserting every member until a pass no longer
    /// shrinks it.
    fn reduce(&mut self) {
        loop {
            let mut rebuilt = MultiSpan::new();
            for span in &self.spans {
                rebuilt.add(*span);
            }
            if rebuilt.spans.len() < self.spans.len() {
                self.spans = rebuilt.spans;
            } else {
                return;
            }
        }
    }

    /// True if any member contains `value`
    pub fn contains(&self, value: i64) -> bool {
        self.spans.iter().any(|s| s.contains(value))
    }

    /// Truncate the set to the portion at or below `value`.
    ///
    /// Members entirely above `value` are dropped, the rest are clipped. On
    /// error the set is left unchanged.
    pub fn cutoff(&mut self, value: i64) -> Result<(), SpanError> {
        let mut clipped: Vec<Span> = self
            .spans
            .iter()
            .copied()
            .filter(|s| s.low() <= value)
            .collect();
        for span in clipped.iter_mut() {
            span.cutoff(value)?;
        }
        self.spans = clipped;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Span> {
        self.spans.iter()
    }

    /// Members in insertion order (not sorted)
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Members sorted by lower bound
    pub fn sorted(&self) -> Vec<Span> {
        let mut spans = self.spans.clone();
        spans.sort_by_key(|s| s.low());
        spans
    }
}

impl<'a> IntoIterator for &'a MultiSpan {
    type Item = &'a Span;
    type IntoIter = std::slice::Iter<'a, Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl IntoIterator for MultiSpan {
    type Item = Span;
    type IntoIter = std::vec::IntoIter<Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}

impl Extend<Span> for MultiSpan {
    fn extend<T: IntoIterator<Item = Span>>(&mut self, iter: T) {
        for span in iter {
            self.add(span);
        }
    }
}

impl FromIterator<Span> for MultiSpan {
    fn from_iter<T: IntoIterator<Item = Span>>(iter: T) -> Self {
        let mut multi = MultiSpan::new();
        multi.extend(iter);
        multi
    }
}

impl fmt::Display for MultiSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.sorted().iter().map(Span::to_string).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Parses a comma-separated list of span expressions, e.g. `1-3,7,10-`.
impl FromStr for MultiSpan {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<Span>)
            .collect()
    }
}
