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

//! FileContentReplace - swap the text of matching file nodes
//!
//! A matched node's events are held back until `end_node`. The stage then
//! forwards the node with recomputed length and digest headers, the
//! generated chunk, `end_chunks` and `end_node`. The original chunks never
//! leave the stage.
//!
//! Later copies of a replaced file still carry the source digests of the old
//! text. For every copied file node the stage walks the copy chain back
//! through a [`TreeOfKnowledge`] and re-points `Text-copy-source-*` at the
//! digests of the nearest ancestor that carries its own text.

use super::TransformError;
use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use crate::tree_of_knowledge::{record_node, SharedKnowledge, TreeOfKnowledge};
use dumpstream_core::{ContentChunk, DigestKind, HeaderError, Node, NodeAction, NodeHeader, Revision};
use std::rc::Rc;
use tracing::debug;

/// Copy chains longer than this are treated as corrupt
pub const MAX_COPY_CHAIN_DEPTH: usize = 1024;

/// Selects the nodes whose content is replaced
pub type NodePredicate = Box<dyn Fn(&Node) -> bool>;

/// Produces the new content for a matched node
pub type ContentGenerator = Box<dyn Fn(&Node) -> Option<ContentChunk>>;

/// Generator that always yields `content`
pub fn chunk_from_str(content: &str) -> ContentGenerator {
    let content = content.to_string();
    Box::new(move |_| Some(ContentChunk::from(content.as_str())))
}

pub struct FileContentReplace {
    chain: Chain,
    matcher: NodePredicate,
    generator: ContentGenerator,
    knowledge: SharedKnowledge,
    /// True when this stage owns the index and must feed it
    records_knowledge: bool,
    current_revision: Option<u64>,
    /// Replacement for the node in flight, if it matched
    generated: Option<ContentChunk>,
}

impl FileContentReplace {
    /// Replace with a private history index fed by this stage
    pub fn new(matcher: NodePredicate, generator: ContentGenerator) -> Self {
        let mut stage = Self::with_shared_knowledge(matcher, generator, TreeOfKnowledge::shared());
        stage.records_knowledge = true;
        stage
    }

    /// Replace using an index that another stage keeps up to date
    pub fn with_shared_knowledge(
        matcher: NodePredicate,
        generator: ContentGenerator,
        knowledge: SharedKnowledge,
    ) -> Self {
        Self {
            chain: Chain::new(),
            matcher,
            generator,
            knowledge,
            records_knowledge: false,
            current_revision: None,
            generated: None,
        }
    }

    /// Match the node at `path` with `action` in `revision`
    pub fn node_match(revision: u64, action: NodeAction, path: &str) -> NodePredicate {
        let path = path.to_string();
        Box::new(move |node| {
            node.revision() == Some(revision)
                && node.get(NodeHeader::Action) == Some(action.as_str())
                && node.path() == path
        })
    }

    /// [`node_match`](Self::node_match) combined with `generator`
    pub fn create(revision: u64, action: NodeAction, path: &str, generator: ContentGenerator) -> Self {
        Self::new(Self::node_match(revision, action, path), generator)
    }

    pub fn knowledge(&self) -> SharedKnowledge {
        Rc::clone(&self.knowledge)
    }

    fn revision_of(&self, node: &Node) -> u64 {
        node.revision().or(self.current_revision).unwrap_or_default()
    }

    fn replace_headers(&self, node: &mut Node, chunk: &ContentChunk) -> std::result::Result<(), TransformError> {
        let text_len = chunk.len() as u64;
        let prop_len = node.length(NodeHeader::PropContentLength)?;
        node.set(NodeHeader::TextContentLength, text_len.to_string());
        let content_len = prop_len
            .checked_add(text_len)
            .ok_or_else(|| HeaderError::InvalidValue {
                header: NodeHeader::PropContentLength,
                value: prop_len.to_string(),
            })?;
        node.set(NodeHeader::ContentLength, content_len.to_string());

        for kind in DigestKind::ALL {
            let header = kind.content_header();
            if node.contains(header) {
                node.set(header, kind.hex(chunk.as_bytes()));
            }
        }
        Ok(())
    }

    /// Digests of the nearest ancestor of a copied node that carries its own
    /// text. Pure copies along the way are walked through.
    fn ancestor_digests(&self, node: &Node) -> std::result::Result<Vec<(DigestKind, String)>, TransformError> {
        let source = match node.copy_source()? {
            Some(source) => source,
            None => return Ok(Vec::new()),
        };

        let knowledge = self.knowledge.borrow();
        let untracked = |revision: u64, path: &str, from_rev: u64, from_path: &str| {
            TransformError::UntrackedCopySource {
                revision,
                path: path.to_string(),
                copy_from_rev: from_rev,
                copy_from_path: from_path.to_string(),
            }
        };

        let revision = self.revision_of(node);
        let mut current = knowledge
            .tell_me_about(source.revision, source.path)
            .ok_or_else(|| untracked(revision, node.path(), source.revision, source.path))?;
        let mut depth = 1;

        while !has_own_text(current) {
            let next = match current.copy_source()? {
                Some(next) => next,
                None => break,
            };
            if depth >= MAX_COPY_CHAIN_DEPTH {
                return Err(TransformError::CopyChainTooDeep {
                    revision,
                    path: node.path().to_string(),
                    depth,
                });
            }
            current = knowledge.tell_me_about(next.revision, next.path).ok_or_else(|| {
                untracked(
                    current.revision().unwrap_or_default(),
                    current.path(),
                    next.revision,
                    next.path,
                )
            })?;
            depth += 1;
        }

        Ok(DigestKind::ALL
            .iter()
            .filter_map(|kind| {
                current
                    .get(kind.content_header())
                    .map(|digest| (*kind, digest.to_string()))
            })
            .collect())
    }

    fn repoint_copy_source(&self, node: &mut Node) -> std::result::Result<(), TransformError> {
        for (kind, digest) in self.ancestor_digests(node)? {
            let header = kind.source_header();
            if node.get(header) != Some(digest.as_str()) {
                debug!(
                    revision = self.revision_of(node),
                    path = node.path(),
                    header = header.as_str(),
                    digest = digest.as_str(),
                    "Copy source digest re-pointed"
                );
                node.set(header, digest);
            }
        }
        Ok(())
    }

    fn record(&self, node: &Node) -> Result<()> {
        if self.records_knowledge {
            record_node(&self.knowledge, self.current_revision, node)?;
        }
        Ok(())
    }
}

fn has_own_text(node: &Node) -> bool {
    DigestKind::ALL
        .iter()
        .any(|kind| node.contains(kind.content_header()))
}

impl RepositoryConsumer for FileContentReplace {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.current_revision = Some(revision.number());
        self.chain.begin_revision(revision)
    }

    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        if node.revision().is_none() {
            if let Some(revision) = self.current_revision {
                node.set_revision(revision);
            }
        }

        if node.is_file() {
            if (self.matcher)(&*node) {
                let chunk = (self.generator)(&*node).ok_or_else(|| TransformError::MissingContent {
                    revision: self.revision_of(node),
                    path: node.path().to_string(),
                })?;
                self.generated = Some(chunk);
                return Ok(());
            }
            self.repoint_copy_source(node)?;
        }
        self.chain.consume_node(node)
    }

    fn consume_chunk(&mut self, chunk: &mut ContentChunk) -> Result<()> {
        if self.generated.is_some() {
            return Ok(());
        }
        self.chain.consume_chunk(chunk)
    }

    fn end_chunks(&mut self) -> Result<()> {
        if self.generated.is_some() {
            return Ok(());
        }
        self.chain.end_chunks()
    }

    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        let mut chunk = match self.generated.take() {
            Some(chunk) => chunk,
            None => {
                self.record(node)?;
                return self.chain.end_node(node);
            }
        };

        self.replace_headers(node, &chunk)?;
        node.set_content(vec![chunk.clone()]);
        self.record(node)?;
        debug!(
            revision = self.revision_of(node),
            path = node.path(),
            bytes = chunk.len(),
            "Node content replaced"
        );

        self.chain.consume_node(node)?;
        self.chain.consume_chunk(&mut chunk)?;
        self.chain.end_chunks()?;
        self.chain.end_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RepositoryInMemory;
    use dumpstream_core::{md5_hex, sha1_hex};

    fn readme_add() -> Node {
        Node::for_revision(1)
            .with_header(NodeHeader::Path, "README.txt")
            .with_header(NodeHeader::Kind, "file")
            .with_header(NodeHeader::Action, "add")
            .with_header(NodeHeader::PropContentLength, "10")
            .with_header(NodeHeader::TextContentLength, "6")
            .with_header(NodeHeader::ContentLength, "16")
            .with_header(NodeHeader::Md5, md5_hex(b"Hello\n"))
    }

    fn no_content() -> ContentGenerator {
        Box::new(|_: &Node| -> Option<ContentChunk> { None })
    }

    fn run_node(stage: &mut FileContentReplace, revision: u64, node: &mut Node, chunks: &[&str]) -> Result<()> {
        let mut rev = Revision::new(revision);
        stage.begin_revision(&mut rev)?;
        stage.consume_node(node)?;
        for chunk in chunks {
            stage.consume_chunk(&mut ContentChunk::from(*chunk))?;
        }
        stage.end_chunks()?;
        stage.end_node(node)?;
        stage.end_revision(&mut rev)
    }

    #[test]
    fn test_matched_node_gets_new_content_and_headers() {
        let sink = RepositoryInMemory::new();
        let repository = sink.repository();
        let mut stage = FileContentReplace::create(1, NodeAction::Add, "README.txt", chunk_from_str("No content.\n"));
        stage.continue_to(Box::new(sink));

        let mut node = readme_add();
        run_node(&mut stage, 1, &mut node, &["Hel", "lo\n"]).unwrap();

        let repository = repository.borrow();
        let stored = &repository.revisions()[0].nodes()[0];
        assert_eq!(stored.content_bytes(), b"No content.\n".to_vec());
        assert_eq!(stored.get(NodeHeader::TextContentLength), Some("12"));
        assert_eq!(stored.get(NodeHeader::ContentLength), Some("22"));
        assert_eq!(stored.get(NodeHeader::Md5), Some(md5_hex(b"No content.\n").as_str()));
        assert_eq!(stored.get(NodeHeader::Sha1), None);
    }

    #[test]
    fn test_sha1_recomputed_only_when_present() {
        let mut stage = FileContentReplace::create(1, NodeAction::Add, "README.txt", chunk_from_str("x"));
        let mut node = readme_add().with_header(NodeHeader::Sha1, sha1_hex(b"Hello\n"));
        run_node(&mut stage, 1, &mut node, &["Hello\n"]).unwrap();
        assert_eq!(node.get(NodeHeader::Sha1), Some(sha1_hex(b"x").as_str()));
        assert_eq!(node.get(NodeHeader::ContentLength), Some("11"));
    }

    #[test]
    fn test_content_length_overflow_is_error() {
        let mut stage = FileContentReplace::create(1, NodeAction::Add, "README.txt", chunk_from_str("x"));
        let mut node = readme_add().with_header(NodeHeader::PropContentLength, u64::MAX.to_string());
        let result = run_node(&mut stage, 1, &mut node, &["Hello\n"]);
        assert!(matches!(
            result,
            Err(crate::DumpError::Transform(TransformError::InvalidHeader(HeaderError::InvalidValue {
                header: NodeHeader::PropContentLength,
                ..
            })))
        ));
    }

    #[test]
    fn test_unmatched_node_streams_through() {
        let sink = RepositoryInMemory::new();
        let repository = sink.repository();
        let mut stage = FileContentReplace::create(2, NodeAction::Add, "README.txt", chunk_from_str("x"));
        stage.continue_to(Box::new(sink));

        let mut node = readme_add();
        run_node(&mut stage, 1, &mut node, &["Hel", "lo\n"]).unwrap();

        let repository = repository.borrow();
        let stored = &repository.revisions()[0].nodes()[0];
        assert_eq!(stored.content().len(), 2);
        assert_eq!(stored.get(NodeHeader::TextContentLength), Some("6"));
    }

    #[test]
    fn test_missing_generated_content_is_error() {
        let mut stage = FileContentReplace::create(1, NodeAction::Add, "README.txt", no_content());
        let mut node = readme_add();
        let result = run_node(&mut stage, 1, &mut node, &["Hello\n"]);
        assert!(matches!(
            result,
            Err(crate::DumpError::Transform(TransformError::MissingContent { revision: 1, .. }))
        ));
    }

    #[test]
    fn test_copy_of_untracked_node_is_error() {
        let mut stage = FileContentReplace::create(9, NodeAction::Add, "nothing", chunk_from_str("x"));
        let mut copy = Node::for_revision(2)
            .with_header(NodeHeader::Path, "docs/README.txt")
            .with_header(NodeHeader::Kind, "file")
            .with_header(NodeHeader::Action, "add")
            .with_header(NodeHeader::CopyFromRev, "1")
            .with_header(NodeHeader::CopyFromPath, "README.txt");
        let result = run_node(&mut stage, 2, &mut copy, &[]);
        match result {
            Err(crate::DumpError::Transform(TransformError::UntrackedCopySource {
                revision,
                path,
                copy_from_rev,
                copy_from_path,
            })) => {
                assert_eq!(revision, 2);
                assert_eq!(path, "docs/README.txt");
                assert_eq!(copy_from_rev, 1);
                assert_eq!(copy_from_path, "README.txt");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_directories_are_never_matched() {
        let mut stage = FileContentReplace::new(Box::new(|_: &Node| true), no_content());
        let mut dir = Node::for_revision(1)
            .with_header(NodeHeader::Path, "trunk")
            .with_header(NodeHeader::Kind, "dir")
            .with_header(NodeHeader::Action, "add");
        run_node(&mut stage, 1, &mut dir, &[]).unwrap();
        assert!(stage.knowledge().borrow().tell_me_about(1, "trunk").is_some());
    }
}
