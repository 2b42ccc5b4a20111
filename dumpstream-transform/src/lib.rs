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

//! Dumpstream Transform
//!
//! Streaming transformations over repository dump events. An event source
//! drives a chain of [`RepositoryConsumer`] stages; each stage may rewrite,
//! drop, or add events before passing them on. A [`TreeOfKnowledge`] keeps
//! the path history that copy-aware stages need.

pub mod consumer;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod transform;
pub mod tree_of_knowledge;
pub mod validate;

pub use consumer::{Chain, PassThrough, RepositoryConsumer};
pub use error::{DumpError, Result};
pub use pipeline::{build_pipeline, Pipeline};
pub use sink::{DumpSummary, Repository, RepositoryInMemory, SharedRepository};
pub use transform::{
    chunk_from_str, ClearRevisions, ContentGenerator, FileContentReplace, NodePredicate, PathChange,
    TransformError, MAX_COPY_CHAIN_DEPTH,
};
pub use tree_of_knowledge::{
    HistoryError, PathState, SharedKnowledge, TreeOfKnowledge, TreeOfKnowledgeRecorder,
};
pub use validate::{
    PathCollisionValidator, RepositoryValidator, SharedFindings, TerminatingValidator,
    ValidationError,
};
