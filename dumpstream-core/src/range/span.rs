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

//! Span - Closed Integer Interval
//!
//! A single `[low, high]` interval over revision numbers. Either end may be
//! unbounded, expressed with the [`NEGATIVE_INFINITY`] / [`POSITIVE_INFINITY`]
//! sentinels.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel for an unbounded lower end
pub const NEGATIVE_INFINITY: i64 = i64::MIN;

/// Sentinel for an unbounded upper end
pub const POSITIVE_INFINITY: i64 = i64::MAX;

/// Interval errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    #[error("Invalid span bounds: low {low} is not <= high {high}")]
    InvalidBounds { low: i64, high: i64 },

    #[error("Cannot cut off span at {cutoff}: below its lower bound {low}")]
    CutoffBelowLow { cutoff: i64, low: i64 },

    #[error("Invalid span expression: {0}")]
    Parse(String),
}

/// Closed interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    low: i64,
    high: i64,
}

impl Span {
    /// Create a span, rejecting inverted bounds and a span whose ends are the
    /// same infinite sentinel.
    pub fn new(low: i64, high: i64) -> Result<Self, SpanError> {
        let same_sentinel =
            low == high && (low == NEGATIVE_INFINITY || low == POSITIVE_INFINITY);
        if low > high || same_sentinel {
            return Err(SpanError::InvalidBounds { low, high });
        }
        Ok(Self { low, high })
    }

    /// Span holding a single value
    pub fn single(value: i64) -> Result<Self, SpanError> {
        Self::new(value, value)
    }

    /// Span covering every value
    pub fn all() -> Self {
        Self {
            low: NEGATIVE_INFINITY,
            high: POSITIVE_INFINITY,
        }
    }

    pub fn low(&self) -> i64 {
        self.low
    }

    pub fn high(&self) -> i64 {
        self.high
    }

    pub fn is_low_unbounded(&self) -> bool {
        self.low == NEGATIVE_INFINITY
    }

    pub fn is_high_unbounded(&self) -> bool {
        self.high == POSITIVE_INFINITY
    }

    /// `low <= value <= high`
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.low <= value && value <= self.high
    }

    /// True if the intervals share at least one value (touching counts)
    pub fn overlaps(&self, other: &Span) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// Extend this span to the union with `other` if they overlap.
    ///
    /// Spans that merely sit next to each other (`[0,1]` and `[2,3]`) do not
    /// merge. Returns false and leaves `self` untouched otherwise.
    pub fn merge(&mut self, other: &Span) -> bool {
        if !self.overlaps(other) {
            return false;
        }
        self.low = self.low.min(other.low);
        self.high = self.high.max(other.high);
        true
    }

    /// Clip the upper bound to `min(high, value)`.
    pub fn cutoff(&mut self, value: i64) -> Result<(), SpanError> {
        if value < self.low || value == NEGATIVE_INFINITY {
            return Err(SpanError::CutoffBelowLow {
                cutoff: value,
                low: self.low,
            });
        }
        self.high = self.high.min(value);
        Ok(())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.is_low_unbounded(), self.is_high_unbounded()) {
            (true, true) => write!(f, "*"),
            (true, false) => write!(f, "-{}", self.high),
            (false, true) => write!(f, "{}-", self.low),
            (false, false) if self.low == self.high => write!(f, "{}", self.low),
            (false, false) => write!(f, "{}-{}", self.low, self.high),
        }
    }
}

/// Parses the [`Display`](fmt::Display) form: `5`, `3-7`, `10-`, `-4` or `*`.
impl FromStr for Span {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text == "*" {
            return Ok(Span::all());
        }

        let parse = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| SpanError::Parse(s.to_string()))
        };

        match text.split_once('-') {
            None => Span::single(parse(text)?),
            Some(("", "")) => Err(SpanError::Parse(s.to_string())),
            Some(("", high)) => Span::new(NEGATIVE_INFINITY, parse(high)?),
            Some((low, "")) => Span::new(parse(low)?, POSITIVE_INFINITY),
            Some((low, high)) => Span::new(parse(low)?, parse(high)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(low: i64, high: i64) -> Span {
        Span::new(low, high).unwrap()
    }

    #[test]
    fn test_single_value_span() {
        let s = span(1, 1);
        assert!(!s.contains(0));
        assert!(s.contains(1));
        assert!(!s.contains(2));
    }

    #[test]
    fn test_unbounded_ends() {
        let lower = span(NEGATIVE_INFINITY, 10);
        assert!(lower.contains(-1_234_565));
        assert!(lower.contains(10));
        assert!(!lower.contains(11));

        let upper = span(2, POSITIVE_INFINITY);
        assert!(!upper.contains(1));
        assert!(upper.contains(2));
        assert!(upper.contains(1234));

        let all = Span::all();
        assert!(all.contains(0));
        assert!(all.contains(-999_999));
        assert!(all.contains(1_000_000));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(Span::new(1, 0).is_err());
        assert!(Span::new(POSITIVE_INFINITY, 0).is_err());
        assert!(Span::new(POSITIVE_INFINITY, NEGATIVE_INFINITY).is_err());
        assert!(Span::new(-10_000_000, NEGATIVE_INFINITY).is_err());
        assert!(Span::new(NEGATIVE_INFINITY, NEGATIVE_INFINITY).is_err());
        assert!(Span::new(POSITIVE_INFINITY, POSITIVE_INFINITY).is_err());
    }

    #[test]
    fn test_overlaps() {
        let s = span(0, 1);
        assert!(s.overlaps(&s));

        let cases = [
            (span(0, 1), span(0, 1), true),
            (span(0, 1), span(1, 2), true),
            (span(0, 1), span(2, 3), false),
            (span(0, POSITIVE_INFINITY), span(1, 2), true),
            (span(0, POSITIVE_INFINITY), span(NEGATIVE_INFINITY, -1), false),
            (Span::all(), span(1, 2), true),
            (Span::all(), Span::all(), true),
        ];
        for (a, b, expected) in cases {
            assert_eq!(a.overlaps(&b), expected, "{} vs {}", a, b);
            assert_eq!(b.overlaps(&a), expected, "{} vs {}", b, a);
        }
    }

    #[test]
    fn test_merge() {
        let mut s = span(0, 2);
        assert!(s.merge(&span(1, 5)));
        assert_eq!(s, span(0, 5));

        let mut s = span(0, 1);
        assert!(s.merge(&span(1, 2)));
        assert_eq!(s, span(0, 2));

        let mut s = span(0, 1);
        assert!(!s.merge(&span(2, 3)));
        assert_eq!(s, span(0, 1));

        let mut s = span(5, POSITIVE_INFINITY);
        assert!(s.merge(&span(NEGATIVE_INFINITY, 5)));
        assert_eq!(s, Span::all());
    }

    #[test]
    fn test_cutoff() {
        let mut s = span(3, 20);
        s.cutoff(15).unwrap();
        assert_eq!(s.high(), 15);

        let mut s = span(3, 10);
        s.cutoff(40).unwrap();
        assert_eq!(s.high(), 10);

        let mut s = span(10, 20);
        assert_eq!(
            s.cutoff(5),
            Err(SpanError::CutoffBelowLow { cutoff: 5, low: 10 })
        );
        assert_eq!(s, span(10, 20));
    }

    #[test]
    fn test_parse_and_display() {
        for text in ["5", "3-7", "10-", "-4", "*"] {
            let parsed: Span = text.parse().unwrap();
            assert_eq!(parsed.to_string(), text);
        }
        assert_eq!("10-".parse::<Span>().unwrap().high(), POSITIVE_INFINITY);
        assert!("7-3".parse::<Span>().is_err());
        assert!("x".parse::<Span>().is_err());
        assert!("-".parse::<Span>().is_err());
    }
}
