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

//! Structured merge info

use super::parser::{self, MergeInfoError};
use crate::range::{MultiSpan, Span, SpanError};
use std::fmt;
use std::str::FromStr;

/// One revision range of a merge source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInfoRange {
    pub from: u64,
    /// Upper bound; `None` for a single-revision entry
    pub to: Option<u64>,
    /// Marked with a trailing `*`
    pub non_inheritable: bool,
}

impl MergeInfoRange {
    pub fn single(revision: u64) -> Self {
        Self {
            from: revision,
            to: None,
            non_inheritable: false,
        }
    }

    pub fn between(from: u64, to: u64) -> Self {
        Self {
            from,
            to: Some(to),
            non_inheritable: false,
        }
    }

    pub fn to_span(&self) -> Result<Span, SpanError> {
        let low = to_revision(self.from)?;
        let high = to_revision(self.to.unwrap_or(self.from))?;
        Span::new(low, high)
    }
}

fn to_revision(value: u64) -> Result<i64, SpanError> {
    i64::try_from(value).map_err(|_| SpanError::Parse(value.to_string()))
}

impl fmt::Display for MergeInfoRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.from)?;
        if let Some(to) = self.to {
            write!(f, "-{}", to)?;
        }
        if self.non_inheritable {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// A merge source path with the ranges merged from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInfoPath {
    path: String,
    ranges: Vec<MergeInfoRange>,
}

impl MergeInfoPath {
    pub fn new(path: impl Into<String>, ranges: Vec<MergeInfoRange>) -> Self {
        Self {
            path: path.into(),
            ranges,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn ranges(&self) -> &[MergeInfoRange] {
        &self.ranges
    }

    pub fn ranges_mut(&mut self) -> &mut Vec<MergeInfoRange> {
        &mut self.ranges
    }

    /// Merged revisions as a normalized span set
    pub fn to_multi_span(&self) -> Result<MultiSpan, SpanError> {
        let mut multi = MultiSpan::new();
        for range in &self.ranges {
            multi.add(range.to_span()?);
        }
        Ok(multi)
    }
}

impl fmt::Display for MergeInfoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.path)?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}

/// Parsed value of an `svn:mergeinfo` property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeInfoData {
    paths: Vec<MergeInfoPath>,
}

impl MergeInfoData {
    pub fn new(paths: Vec<MergeInfoPath>) -> Self {
        Self { paths }
    }

    pub fn parse(input: &str) -> Result<Self, MergeInfoError> {
        parser::parse(input)
    }

    pub fn paths(&self) -> &[MergeInfoPath] {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut Vec<MergeInfoPath> {
        &mut self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Canonical text: one `path:ranges` line per entry, `\n`-joined
impl fmt::Display for MergeInfoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", path)?;
        }
        Ok(())
    }
}

impl FromStr for MergeInfoData {
    type Err = MergeInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}
