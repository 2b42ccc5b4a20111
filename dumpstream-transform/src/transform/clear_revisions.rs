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

//! ClearRevisions - empty out a set of revisions
//!
//! Nodes of the selected revisions are dropped with all their events. The
//! revisions themselves still pass through with their properties, so
//! revision numbering downstream is unchanged.

use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{ContentChunk, MultiSpan, Node, Revision};

pub struct ClearRevisions {
    chain: Chain,
    revisions: MultiSpan,
    clearing: bool,
}

impl ClearRevisions {
    pub fn new(revisions: MultiSpan) -> Self {
        Self {
            chain: Chain::new(),
            revisions,
            clearing: false,
        }
    }

    pub fn revisions(&self) -> &MultiSpan {
        &self.revisions
    }
}

impl RepositoryConsumer for ClearRevisions {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.clearing = i64::try_from(revision.number())
            .map(|number| self.revisions.contains(number))
            .unwrap_or(false);
        self.chain.begin_revision(revision)
    }

    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        if self.clearing {
            return Ok(());
        }
        self.chain.consume_node(node)
    }

    fn consume_chunk(&mut self, chunk: &mut ContentChunk) -> Result<()> {
        if self.clearing {
            return Ok(());
        }
        self.chain.consume_chunk(chunk)
    }

    fn end_chunks(&mut self) -> Result<()> {
        if self.clearing {
            return Ok(());
        }
        self.chain.end_chunks()
    }

    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        if self.clearing {
            return Ok(());
        }
        self.chain.end_node(node)
    }

    fn end_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.clearing = false;
        self.chain.end_revision(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Repository, RepositoryInMemory};
    use dumpstream_core::NodeHeader;

    fn repository_with_nodes(revisions: u64) -> Repository {
        let mut repository = Repository::new();
        repository.push(Revision::new(0));
        for number in 1..=revisions {
            let mut revision = Revision::new(number).with_property("svn:log", format!("commit {}", number));
            revision.add_node(
                Node::new()
                    .with_header(NodeHeader::Action, "add")
                    .with_header(NodeHeader::Kind, "file")
                    .with_header(NodeHeader::Path, format!("file{}.txt", number)),
            );
            repository.push(revision);
        }
        repository
    }

    #[test]
    fn test_selected_revisions_lose_their_nodes() {
        let source = repository_with_nodes(5);
        let sink = RepositoryInMemory::new();
        let output = sink.repository();

        let mut stage = ClearRevisions::new("2-3,5".parse().unwrap());
        stage.continue_to(Box::new(sink));
        source.replay(&mut stage).unwrap();

        let output = output.borrow();
        let node_counts: Vec<usize> = output.revisions().iter().map(|r| r.nodes().len()).collect();
        assert_eq!(node_counts, vec![0, 1, 0, 0, 1, 0]);
        assert_eq!(output.revisions()[3].log(), Some("commit 3"));
    }
}
