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

//! Node header kinds and the parsed values of ACTION / KIND.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Header errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Unknown node header: {0}")]
    UnknownHeader(String),

    #[error("Invalid value for {header}: {value:?}")]
    InvalidValue { header: NodeHeader, value: String },
}

/// Closed set of node header kinds
///
/// The string forms are the dump format's header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeHeader {
    Path,
    Kind,
    Action,
    CopyFromRev,
    CopyFromPath,
    PropDelta,
    TextDelta,
    TextDeltaBaseMd5,
    TextDeltaBaseSha1,
    SourceMd5,
    SourceSha1,
    Md5,
    Sha1,
    PropContentLength,
    TextContentLength,
    ContentLength,
}

impl NodeHeader {
    /// Every header, in canonical dump order
    pub const ALL: [NodeHeader; 16] = [
        NodeHeader::Path,
        NodeHeader::Kind,
        NodeHeader::Action,
        NodeHeader::CopyFromRev,
        NodeHeader::CopyFromPath,
        NodeHeader::PropDelta,
        NodeHeader::TextDelta,
        NodeHeader::TextDeltaBaseMd5,
        NodeHeader::TextDeltaBaseSha1,
        NodeHeader::SourceMd5,
        NodeHeader::SourceSha1,
        NodeHeader::Md5,
        NodeHeader::Sha1,
        NodeHeader::PropContentLength,
        NodeHeader::TextContentLength,
        NodeHeader::ContentLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeHeader::Path => "Node-path",
            NodeHeader::Kind => "Node-kind",
            NodeHeader::Action => "Node-action",
            NodeHeader::CopyFromRev => "Node-copyfrom-rev",
            NodeHeader::CopyFromPath => "Node-copyfrom-path",
            NodeHeader::PropDelta => "Prop-delta",
            NodeHeader::TextDelta => "Text-delta",
            NodeHeader::TextDeltaBaseMd5 => "Text-delta-base-md5",
            NodeHeader::TextDeltaBaseSha1 => "Text-delta-base-sha1",
            NodeHeader::SourceMd5 => "Text-copy-source-md5",
            NodeHeader::SourceSha1 => "Text-copy-source-sha1",
            NodeHeader::Md5 => "Text-content-md5",
            NodeHeader::Sha1 => "Text-content-sha1",
            NodeHeader::PropContentLength => "Prop-content-length",
            NodeHeader::TextContentLength => "Text-content-length",
            NodeHeader::ContentLength => "Content-length",
        }
    }
}

impl fmt::Display for NodeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeHeader {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeHeader::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| HeaderError::UnknownHeader(s.to_string()))
    }
}

/// Value of the ACTION header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAction {
    Add,
    Change,
    Delete,
    Replace,
}

impl NodeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeAction::Add => "add",
            NodeAction::Change => "change",
            NodeAction::Delete => "delete",
            NodeAction::Replace => "replace",
        }
    }
}

impl fmt::Display for NodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeAction {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(NodeAction::Add),
            "change" => Ok(NodeAction::Change),
            "delete" => Ok(NodeAction::Delete),
            "replace" => Ok(NodeAction::Replace),
            other => Err(HeaderError::InvalidValue {
                header: NodeHeader::Action,
                value: other.to_string(),
            }),
        }
    }
}

/// Value of the KIND header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Dir,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Dir => "dir",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(NodeKind::File),
            "dir" => Ok(NodeKind::Dir),
            other => Err(HeaderError::InvalidValue {
                header: NodeHeader::Kind,
                value: other.to_string(),
            }),
        }
    }
}
