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

//! TerminatingValidator - halt the stream on the first validation fault

use super::{RepositoryValidator, SharedFindings, ValidationError};
use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{ContentChunk, Node, Revision};
use tracing::error;

/// Turns the first fault of the wrapped validator into an error
///
/// The wrapped validator sees every event first and has no next stage of
/// its own. Once it reports a fault the event is not forwarded and the
/// error travels back to the event source.
pub struct TerminatingValidator<V: RepositoryValidator> {
    chain: Chain,
    inner: V,
}

impl<V: RepositoryValidator> TerminatingValidator<V> {
    pub fn new(inner: V) -> Self {
        Self {
            chain: Chain::new(),
            inner,
        }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    fn check(&self) -> Result<()> {
        match self.inner.error() {
            Some(fault) => {
                error!(%fault, "Validation fault, halting stream");
                Err(ValidationError::Terminated {
                    fault: Box::new(fault),
                }
                .into())
            }
            None => Ok(()),
        }
    }
}

impl<V: RepositoryValidator> RepositoryConsumer for TerminatingValidator<V> {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.inner.begin_revision(revision)?;
        self.check()?;
        self.chain.begin_revision(revision)
    }

    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        self.inner.consume_node(node)?;
        self.check()?;
        self.chain.consume_node(node)
    }

    fn consume_chunk(&mut self, chunk: &mut ContentChunk) -> Result<()> {
        self.inner.consume_chunk(chunk)?;
        self.check()?;
        self.chain.consume_chunk(chunk)
    }

    fn end_chunks(&mut self) -> Result<()> {
        self.inner.end_chunks()?;
        self.check()?;
        self.chain.end_chunks()
    }

    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        self.inner.end_node(node)?;
        self.check()?;
        self.chain.end_node(node)
    }

    fn end_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.inner.end_revision(revision)?;
        self.check()?;
        self.chain.end_revision(revision)
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.finish()?;
        self.check()?;
        self.chain.finish()
    }
}

impl<V: RepositoryValidator> RepositoryValidator for TerminatingValidator<V> {
    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    fn error(&self) -> Option<ValidationError> {
        self.inner.error()
    }

    fn findings(&self) -> SharedFindings {
        self.inner.findings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Repository, RepositoryInMemory};
    use crate::validate::PathCollisionValidator;
    use crate::DumpError;
    use dumpstream_core::NodeHeader;

    fn add(path: &str) -> Node {
        Node::new()
            .with_header(NodeHeader::Action, "add")
            .with_header(NodeHeader::Kind, "file")
            .with_header(NodeHeader::Path, path)
    }

    #[test]
    fn test_fault_halts_before_downstream() {
        let mut source = Repository::new();
        let mut first = Revision::new(1);
        first.add_node(add("a"));
        first.add_node(add("a"));
        source.push(first);
        let mut second = Revision::new(2);
        second.add_node(add("b"));
        source.push(second);

        let sink = RepositoryInMemory::new();
        let output = sink.repository();
        let mut validator = TerminatingValidator::new(PathCollisionValidator::new());
        validator.continue_to(Box::new(sink));

        let result = source.replay(&mut validator);
        match result {
            Err(DumpError::Validation(ValidationError::Terminated { fault })) => {
                assert_eq!(
                    *fault,
                    ValidationError::PathCollision {
                        revision: 1,
                        path: "a".to_string()
                    }
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }

        // the colliding revision never completed downstream
        assert!(output.borrow().is_empty());
        assert!(!validator.is_valid());
    }

    #[test]
    fn test_clean_stream_passes() {
        let mut source = Repository::new();
        let mut first = Revision::new(1);
        first.add_node(add("a"));
        first.add_node(add("b"));
        source.push(first);

        let sink = RepositoryInMemory::new();
        let output = sink.repository();
        let mut validator = TerminatingValidator::new(PathCollisionValidator::new());
        validator.continue_to(Box::new(sink));

        source.replay(&mut validator).unwrap();
        assert_eq!(output.borrow().revisions()[0].nodes().len(), 2);
        assert!(validator.inner().is_valid());
    }
}
