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

//! Content digests
//!
//! Dumps describe file text with lowercase hex MD5 and SHA-1 digests. The
//! digests are computed incrementally over content chunks.

use crate::model::{ContentChunk, NodeHeader};
use md5::Md5;
use sha1::{Digest, Sha1};

/// Digest algorithms that appear in node headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestKind {
    Md5,
    Sha1,
}

impl DigestKind {
    pub const ALL: [DigestKind; 2] = [DigestKind::Md5, DigestKind::Sha1];

    /// Header holding the digest of the node's own content
    pub fn content_header(&self) -> NodeHeader {
        match self {
            DigestKind::Md5 => NodeHeader::Md5,
            DigestKind::Sha1 => NodeHeader::Sha1,
        }
    }

    /// Header holding the digest of a copy source's content
    pub fn source_header(&self) -> NodeHeader {
        match self {
            DigestKind::Md5 => NodeHeader::SourceMd5,
            DigestKind::Sha1 => NodeHeader::SourceSha1,
        }
    }

    pub fn hex(&self, bytes: &[u8]) -> String {
        match self {
            DigestKind::Md5 => md5_hex(bytes),
            DigestKind::Sha1 => sha1_hex(bytes),
        }
    }

    /// Digest over the concatenation of `chunks`
    pub fn hex_chunks(&self, chunks: &[ContentChunk]) -> String {
        match self {
            DigestKind::Md5 => digest_chunks::<Md5>(chunks),
            DigestKind::Sha1 => digest_chunks::<Sha1>(chunks),
        }
    }
}

fn digest_chunks<D: Digest>(chunks: &[ContentChunk]) -> String {
    let mut hasher = D::new();
    for chunk in chunks {
        hasher.update(chunk.as_bytes());
    }
    hex::encode(hasher.finalize())
}

pub fn md5_hex(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        assert_eq!(md5_hex(b"Hello\n"), "09f7e02f1290be211da707a266f153b3");
        assert_eq!(sha1_hex(b"Hello\n"), "1d229271928d3f9e2bb0375bd6ce5db6c6d348d9");
        assert_eq!(md5_hex(b""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_chunked_matches_whole() {
        let chunks = vec![ContentChunk::from("No con"), ContentChunk::from("tent.\n")];
        for kind in DigestKind::ALL {
            assert_eq!(kind.hex_chunks(&chunks), kind.hex(b"No content.\n"));
        }
    }
}
