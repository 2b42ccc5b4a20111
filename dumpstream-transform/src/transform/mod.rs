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

//! Mutating stages
//!
//! Each stage rewrites the events that match it and forwards everything
//! else untouched.

pub mod clear_revisions;
pub mod content_replace;
pub mod path_change;

pub use clear_revisions::ClearRevisions;
pub use content_replace::{
    chunk_from_str, ContentGenerator, FileContentReplace, NodePredicate, MAX_COPY_CHAIN_DEPTH,
};
pub use path_change::PathChange;

use dumpstream_core::HeaderError;
use thiserror::Error;

/// Transform errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("r{revision} {path} copied from untracked node r{copy_from_rev}: {copy_from_path}")]
    UntrackedCopySource {
        revision: u64,
        path: String,
        copy_from_rev: u64,
        copy_from_path: String,
    },

    #[error("No replacement content generated for r{revision} {path}")]
    MissingContent { revision: u64, path: String },

    #[error("Invalid header: {0}")]
    InvalidHeader(#[from] HeaderError),

    #[error("Copy chain of r{revision} {path} exceeds {depth} hops")]
    CopyChainTooDeep { revision: u64, path: String, depth: usize },
}
