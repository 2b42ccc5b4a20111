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

//! Consumer chain protocol
//!
//! An event source pushes one dump through a linked chain of stages. For
//! each node the sequence is:
//!
//! ```text
//! begin_revision
//!   consume_node  consume_chunk*  end_chunks  end_node     (per node)
//! end_revision
//! ...
//! finish
//! ```
//!
//! The same `Node` value is handed to `consume_node` and `end_node`, so a
//! mutation made in one is visible in the other. Content travels only as
//! chunk events; sources hand over nodes with an empty content list.
//!
//! Every callback forwards to the next stage by default. A stage that
//! overrides a callback and does not forward it drops that event for every
//! stage after it.

use crate::error::Result;
use dumpstream_core::{ContentChunk, Node, Revision};

/// Link to the next stage
#[derive(Default)]
pub struct Chain {
    next: Option<Box<dyn RepositoryConsumer>>,
}

impl Chain {
    pub fn new() -> Self {
        Self { next: None }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn next_mut(&mut self) -> Option<&mut (dyn RepositoryConsumer + 'static)> {
        self.next.as_deref_mut()
    }

    /// Wire `stage` after the last stage of this chain
    pub fn append(&mut self, stage: Box<dyn RepositoryConsumer>) {
        if let Some(next) = self.next.as_deref_mut() {
            next.continue_to(stage);
            return;
        }
        self.next = Some(stage);
    }

    pub fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.begin_revision(revision),
            None => Ok(()),
        }
    }

    pub fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.consume_node(node),
            None => Ok(()),
        }
    }

    pub fn consume_chunk(&mut self, chunk: &mut ContentChunk) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.consume_chunk(chunk),
            None => Ok(()),
        }
    }

    pub fn end_chunks(&mut self) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.end_chunks(),
            None => Ok(()),
        }
    }

    pub fn end_node(&mut self, node: &mut Node) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.end_node(node),
            None => Ok(()),
        }
    }

    pub fn end_revision(&mut self, revision: &mut Revision) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.end_revision(revision),
            None => Ok(()),
        }
    }

    pub fn finish(&mut self) -> Result<()> {
        match self.next_mut() {
            Some(next) => next.finish(),
            None => Ok(()),
        }
    }
}

/// A stage of the consumer chain
///
/// Implementors only provide [`chain`](RepositoryConsumer::chain) and
/// override the callbacks they care about.
pub trait RepositoryConsumer {
    /// Link to the next stage
    fn chain(&mut self) -> &mut Chain;

    /// Append `next` to the end of this chain
    fn continue_to(&mut self, next: Box<dyn RepositoryConsumer>) {
        self.chain().append(next);
    }

    /// A revision starts; its nodes follow
    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.chain().begin_revision(revision)
    }

    /// Headers and properties of a node, before its content
    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        self.chain().consume_node(node)
    }

    /// One slice of the current node's content
    fn consume_chunk(&mut self, chunk: &mut ContentChunk) -> Result<()> {
        self.chain().consume_chunk(chunk)
    }

    /// The current node has no more content
    fn end_chunks(&mut self) -> Result<()> {
        self.chain().end_chunks()
    }

    /// The current node is complete
    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        self.chain().end_node(node)
    }

    /// All nodes of the revision have been delivered
    fn end_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.chain().end_revision(revision)
    }

    /// End of stream
    fn finish(&mut self) -> Result<()> {
        self.chain().finish()
    }
}

/// Stage that forwards every event unchanged
#[derive(Default)]
pub struct PassThrough {
    chain: Chain,
}

impl PassThrough {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryConsumer for PassThrough {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }
}
