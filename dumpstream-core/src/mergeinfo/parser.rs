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

//! Merge info parser
//!
//! ```text
//! mergeinfo := line ("\n" line)* "\n"?
//! line      := path ":" range ("," range)*
//! range     := number ("-" number)? "*"?
//! ```
//!
//! The path runs up to the first `:` on its line. Characters that cannot
//! start or continue a range token are reported as token faults, with
//! 1-based line and column.

use super::data::{MergeInfoData, MergeInfoPath, MergeInfoRange};
use thiserror::Error;

/// Merge info errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeInfoError {
    #[error("Unexpected character {found:?} at line {line}, column {column}")]
    Token { line: usize, column: usize, found: char },

    #[error("Malformed merge info at line {line}: {reason}")]
    Syntax { line: usize, reason: String },
}

/// Parse merge info text. Empty input yields no paths.
pub fn parse(input: &str) -> Result<MergeInfoData, MergeInfoError> {
    let mut paths = Vec::new();
    for (index, line) in input.split('\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        paths.push(parse_line(index + 1, line)?);
    }
    Ok(MergeInfoData::new(paths))
}

fn parse_line(line_no: usize, line: &str) -> Result<MergeInfoPath, MergeInfoError> {
    let colon = line.find(':').ok_or_else(|| MergeInfoError::Syntax {
        line: line_no,
        reason: "missing ':' after path".to_string(),
    })?;
    let path = &line[..colon];
    if path.is_empty() {
        return Err(MergeInfoError::Syntax {
            line: line_no,
            reason: "empty path".to_string(),
        });
    }

    let first_column = path.chars().count() + 2;
    let mut cursor = RangeCursor {
        chars: line[colon + 1..].chars().collect(),
        pos: 0,
        line: line_no,
        first_column,
    };
    let ranges = cursor.ranges()?;
    Ok(MergeInfoPath::new(path, ranges))
}

struct RangeCursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    first_column: usize,
}

impl RangeCursor {
    fn ranges(&mut self) -> Result<Vec<MergeInfoRange>, MergeInfoError> {
        let mut ranges = vec![self.range()?];
        while let Some(c) = self.peek() {
            match c {
                ',' => {
                    self.pos += 1;
                    ranges.push(self.range()?);
                }
                _ => return Err(self.unexpected(c)),
            }
        }
        Ok(ranges)
    }

    fn range(&mut self) -> Result<MergeInfoRange, MergeInfoError> {
        let from = self.number()?;
        let to = if self.peek() == Some('-') {
            self.pos += 1;
            Some(self.number()?)
        } else {
            None
        };
        let non_inheritable = self.peek() == Some('*');
        if non_inheritable {
            self.pos += 1;
        }
        Ok(MergeInfoRange {
            from,
            to,
            non_inheritable,
        })
    }

    fn number(&mut self) -> Result<u64, MergeInfoError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return match self.peek() {
                Some(c) if !is_range_char(c) => Err(self.unexpected(c)),
                Some(c) => Err(self.syntax(format!("expected revision number, found {:?}", c))),
                None => Err(self.syntax("expected revision number, found end of line".to_string())),
            };
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse::<u64>()
            .map_err(|_| self.syntax(format!("revision number out of range: {}", digits)))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn unexpected(&self, found: char) -> MergeInfoError {
        if is_range_char(found) {
            return self.syntax(format!("unexpected {:?}", found));
        }
        MergeInfoError::Token {
            line: self.line,
            column: self.first_column + self.pos,
            found,
        }
    }

    fn syntax(&self, reason: String) -> MergeInfoError {
        MergeInfoError::Syntax {
            line: self.line,
            reason,
        }
    }
}

fn is_range_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ',' | '-' | '*')
}
