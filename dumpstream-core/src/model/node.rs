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

//! Node - one path-level change within a revision
//!
//! A node carries its headers, an optional property block, and the content
//! chunks seen for it so far. The owning revision is kept as a number only.

use super::chunk::ContentChunk;
use super::header::{HeaderError, NodeAction, NodeHeader, NodeKind};
use super::property::NodeProperties;
use std::collections::BTreeMap;
use std::fmt;

/// Header map. Ordered by [`NodeHeader`] so iteration follows dump order.
pub type NodeHeaders = BTreeMap<NodeHeader, String>;

/// Where a copied node came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySource<'a> {
    pub revision: u64,
    pub path: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    revision: Option<u64>,
    headers: NodeHeaders,
    properties: Option<NodeProperties>,
    content: Vec<ContentChunk>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node owned by `revision`
    pub fn for_revision(revision: u64) -> Self {
        Self {
            revision: Some(revision),
            ..Self::default()
        }
    }

    /// Builder-style header setter
    pub fn with_header(mut self, header: NodeHeader, value: impl Into<String>) -> Self {
        self.set(header, value);
        self
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .get_or_insert_with(NodeProperties::new)
            .insert(name.into(), Some(value.into()));
        self
    }

    /// Owning revision number, if the node has been attached to one
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    pub fn set_revision(&mut self, revision: u64) {
        self.revision = Some(revision);
    }

    pub fn get(&self, header: NodeHeader) -> Option<&str> {
        self.headers.get(&header).map(String::as_str)
    }

    pub fn set(&mut self, header: NodeHeader, value: impl Into<String>) -> Option<String> {
        self.headers.insert(header, value.into())
    }

    pub fn remove(&mut self, header: NodeHeader) -> Option<String> {
        self.headers.remove(&header)
    }

    pub fn contains(&self, header: NodeHeader) -> bool {
        self.headers.contains_key(&header)
    }

    pub fn headers(&self) -> &NodeHeaders {
        &self.headers
    }

    /// Replace the whole header set at once
    pub fn set_headers(&mut self, headers: NodeHeaders) {
        self.headers = headers;
    }

    /// PATH header, or the empty string for a node that has none yet
    pub fn path(&self) -> &str {
        self.get(NodeHeader::Path).unwrap_or_default()
    }

    pub fn action(&self) -> Result<Option<NodeAction>, HeaderError> {
        self.get(NodeHeader::Action).map(str::parse).transpose()
    }

    pub fn kind(&self) -> Result<Option<NodeKind>, HeaderError> {
        self.get(NodeHeader::Kind).map(str::parse).transpose()
    }

    /// True for nodes whose KIND header says `file`
    pub fn is_file(&self) -> bool {
        self.get(NodeHeader::Kind) == Some(NodeKind::File.as_str())
    }

    pub fn is_dir(&self) -> bool {
        self.get(NodeHeader::Kind) == Some(NodeKind::Dir.as_str())
    }

    /// COPY_FROM_REV / COPY_FROM_PATH, if the node is a copy.
    ///
    /// Both headers travel together; a node carrying only one of them, or a
    /// non-numeric revision, is malformed.
    pub fn copy_source(&self) -> Result<Option<CopySource<'_>>, HeaderError> {
        match (self.get(NodeHeader::CopyFromRev), self.get(NodeHeader::CopyFromPath)) {
            (None, None) => Ok(None),
            (Some(rev), Some(path)) => {
                let revision = rev.trim().parse::<u64>().map_err(|_| HeaderError::InvalidValue {
                    header: NodeHeader::CopyFromRev,
                    value: rev.to_string(),
                })?;
                Ok(Some(CopySource { revision, path }))
            }
            (Some(rev), None) => Err(HeaderError::InvalidValue {
                header: NodeHeader::CopyFromRev,
                value: rev.to_string(),
            }),
            (None, Some(path)) => Err(HeaderError::InvalidValue {
                header: NodeHeader::CopyFromPath,
                value: path.to_string(),
            }),
        }
    }

    /// Numeric value of a length header; absent headers count as zero
    pub fn length(&self, header: NodeHeader) -> Result<u64, HeaderError> {
        match self.get(header) {
            None => Ok(0),
            Some(value) => value.trim().parse::<u64>().map_err(|_| HeaderError::InvalidValue {
                header,
                value: value.to_string(),
            }),
        }
    }

    pub fn properties(&self) -> Option<&NodeProperties> {
        self.properties.as_ref()
    }

    pub fn properties_mut(&mut self) -> Option<&mut NodeProperties> {
        self.properties.as_mut()
    }

    pub fn set_properties(&mut self, properties: Option<NodeProperties>) {
        self.properties = properties;
    }

    /// Value of a property that is set (not removed) on this node
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.get(name))
            .and_then(|value| value.as_deref())
    }

    pub fn content(&self) -> &[ContentChunk] {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Vec<ContentChunk> {
        &mut self.content
    }

    pub fn add_chunk(&mut self, chunk: ContentChunk) {
        self.content.push(chunk);
    }

    pub fn set_content(&mut self, content: Vec<ContentChunk>) {
        self.content = content;
    }

    /// Total size of the stored content in bytes
    pub fn content_len(&self) -> usize {
        self.content.iter().map(ContentChunk::len).sum()
    }

    /// Content chunks joined into one buffer
    pub fn content_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.content_len());
        for chunk in &self.content {
            bytes.extend_from_slice(chunk.as_bytes());
        }
        bytes
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get(NodeHeader::Action).unwrap_or_default())?;
        if let Some(kind) = self.get(NodeHeader::Kind) {
            write!(f, " {}", kind)?;
        }
        write!(f, " {}", self.path())?;

        if let Some(delta) = self.get(NodeHeader::TextDelta) {
            write!(f, " Delta: is {}", delta)?;
        }
        if let Some(md5) = self.get(NodeHeader::Md5) {
            write!(f, " {}", md5)?;
        }
        if let Some(copy_path) = self.get(NodeHeader::CopyFromPath) {
            write!(
                f,
                " -- copied from: {}@{}",
                copy_path,
                self.get(NodeHeader::CopyFromRev).unwrap_or_default()
            )?;
            if let Some(source_md5) = self.get(NodeHeader::SourceMd5) {
                write!(f, " {}", source_md5)?;
            }
        }
        if let Some(size) = self.get(NodeHeader::TextContentLength) {
            write!(f, " Size: {} bytes", size)?;
        }
        Ok(())
    }
}
