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

//! Content chunks
//!
//! A file's content travels through the pipeline as a sequence of chunks so
//! that large files never have to be held in memory at once. Logically the
//! content is the concatenation of the chunks in order.

/// Owned, mutable slice of a file node's content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentChunk {
    content: Vec<u8>,
}

impl ContentChunk {
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn set_content(&mut self, content: Vec<u8>) {
        self.content = content;
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }
}

impl From<Vec<u8>> for ContentChunk {
    fn from(content: Vec<u8>) -> Self {
        Self::new(content)
    }
}

impl From<&[u8]> for ContentChunk {
    fn from(content: &[u8]) -> Self {
        Self::new(content.to_vec())
    }
}

impl From<&str> for ContentChunk {
    fn from(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }
}
