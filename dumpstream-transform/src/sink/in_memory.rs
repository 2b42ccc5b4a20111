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

//! In-memory repository
//!
//! [`RepositoryInMemory`] collects the stream it sees into a [`Repository`];
//! [`Repository::replay`] pushes a stored repository back through a chain.
//! Together they act as source and sink for tests and small dumps.

use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{ContentChunk, Node, Revision};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Handle to a repository filled by a sink further down a chain
pub type SharedRepository = Rc<RefCell<Repository>>;

/// Revisions with their final nodes and content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    revisions: Vec<Revision>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, revision: Revision) {
        self.revisions.push(revision);
    }

    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn revisions_mut(&mut self) -> &mut Vec<Revision> {
        &mut self.revisions
    }

    /// Revision by number
    pub fn revision(&self, number: u64) -> Option<&Revision> {
        self.revisions.iter().find(|r| r.number() == number)
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Emit the whole repository as events, one chunk event per stored chunk,
    /// then `finish`.
    pub fn replay(&self, consumer: &mut dyn RepositoryConsumer) -> Result<()> {
        for stored in &self.revisions {
            let mut revision = stored.header_only();
            consumer.begin_revision(&mut revision)?;

            for stored_node in stored.nodes() {
                let mut node = stored_node.clone();
                let chunks = std::mem::take(node.content_mut());

                consumer.consume_node(&mut node)?;
                for mut chunk in chunks {
                    consumer.consume_chunk(&mut chunk)?;
                }
                consumer.end_chunks()?;
                consumer.end_node(&mut node)?;
            }

            consumer.end_revision(&mut revision)?;
        }
        consumer.finish()
    }
}

/// Sink that materializes the stream into a [`Repository`]
///
/// Stores what arrives through events: the node as of `end_node` with the
/// chunks delivered for it. Events are forwarded, so the sink may sit in the
/// middle of a chain.
#[derive(Default)]
pub struct RepositoryInMemory {
    chain: Chain,
    repository: SharedRepository,
    nodes: Vec<Node>,
    chunks: Vec<ContentChunk>,
}

impl RepositoryInMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect into an existing repository handle
    pub fn with_repository(repository: SharedRepository) -> Self {
        Self {
            repository,
            ..Self::default()
        }
    }

    pub fn repository(&self) -> SharedRepository {
        Rc::clone(&self.repository)
    }
}

impl RepositoryConsumer for RepositoryInMemory {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.nodes.clear();
        self.chain.begin_revision(revision)
    }

    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        self.chunks.clear();
        self.chain.consume_node(node)
    }

    fn consume_chunk(&mut self, chunk: &mut ContentChunk) -> Result<()> {
        self.chunks.push(chunk.clone());
        self.chain.consume_chunk(chunk)
    }

    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        let mut stored = node.clone();
        stored.set_content(std::mem::take(&mut self.chunks));
        self.nodes.push(stored);
        self.chain.end_node(node)
    }

    fn end_revision(&mut self, revision: &mut Revision) -> Result<()> {
        let mut stored = revision.header_only();
        for node in self.nodes.drain(..) {
            stored.add_node(node);
        }
        self.repository.borrow_mut().push(stored);
        self.chain.end_revision(revision)
    }

    fn finish(&mut self) -> Result<()> {
        info!(revisions = self.repository.borrow().len(), "In-memory repository complete");
        self.chain.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dumpstream_core::{property, NodeHeader};

    fn sample() -> Repository {
        let mut repository = Repository::new();
        repository.push(Revision::new(0).with_property(property::DATE, "2015-01-01T00:00:00.000000Z"));

        let mut first = Revision::new(1).with_property(property::LOG, "add readme");
        let mut readme = Node::new()
            .with_header(NodeHeader::Path, "README.txt")
            .with_header(NodeHeader::Kind, "file")
            .with_header(NodeHeader::Action, "add");
        readme.add_chunk(ContentChunk::from("Hel"));
        readme.add_chunk(ContentChunk::from("lo\n"));
        first.add_node(readme);
        first.add_node(
            Node::new()
                .with_header(NodeHeader::Path, "docs")
                .with_header(NodeHeader::Kind, "dir")
                .with_header(NodeHeader::Action, "add"),
        );
        repository.push(first);
        repository
    }

    #[test]
    fn test_replay_into_sink_reproduces_repository() {
        let source = sample();
        let mut sink = RepositoryInMemory::new();
        source.replay(&mut sink).unwrap();

        assert_eq!(*sink.repository().borrow(), source);
    }

    #[test]
    fn test_revision_lookup() {
        let source = sample();
        assert_eq!(source.len(), 2);
        assert_eq!(source.revision(1).unwrap().log(), Some("add readme"));
        assert!(source.revision(7).is_none());
    }

    #[test]
    fn test_sink_forwards_events() {
        let source = sample();
        let mut first = RepositoryInMemory::new();
        let second = RepositoryInMemory::new();
        let copy = second.repository();
        first.continue_to(Box::new(second));
        source.replay(&mut first).unwrap();

        assert_eq!(*copy.borrow(), source);
    }
}
