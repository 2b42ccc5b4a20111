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

//! TreeOfKnowledge - path history index
//!
//! Answers "what did `path` look like as of revision `r`?" for every path
//! observed so far. History is append-only: a delete leaves a tombstone so
//! the earlier states stay queryable.
//!
//! Snapshots keep headers and properties only. Content is never retained.

use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{HeaderError, Node, NodeAction, NodeHeader, Revision};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// History errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("Revision {revision} recorded after revision {last}")]
    OutOfOrder { revision: u64, last: u64 },

    #[error("Node {path} has no owning revision")]
    MissingRevision { path: String },

    #[error("Invalid node header: {0}")]
    Header(#[from] HeaderError),
}

/// State of a path at some revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathState {
    Present(Node),
    Deleted,
}

impl PathState {
    pub fn node(&self) -> Option<&Node> {
        match self {
            PathState::Present(node) => Some(node),
            PathState::Deleted => None,
        }
    }
}

/// Index handle shared between stages
pub type SharedKnowledge = Rc<RefCell<TreeOfKnowledge>>;

#[derive(Debug, Default)]
pub struct TreeOfKnowledge {
    /// Per path, states in ascending revision order
    history: BTreeMap<String, Vec<(u64, PathState)>>,
    last_revision: Option<u64>,
}

impl TreeOfKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedKnowledge {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Highest revision recorded so far
    pub fn last_revision(&self) -> Option<u64> {
        self.last_revision
    }

    /// Number of distinct paths ever observed
    pub fn path_count(&self) -> usize {
        self.history.len()
    }

    /// Record `node` as the state of its path in `revision`
    pub fn record(&mut self, revision: u64, node: &Node) -> std::result::Result<(), HistoryError> {
        if let Some(last) = self.last_revision {
            if revision < last {
                return Err(HistoryError::OutOfOrder { revision, last });
            }
        }
        self.last_revision = Some(revision);

        let path = node.path().to_string();
        match node.action()? {
            Some(NodeAction::Delete) => {
                self.tombstone_subtree(revision, &path);
            }
            Some(NodeAction::Change) => {
                let merged = match self.tell_me_about(revision, &path) {
                    Some(previous) => overlay(previous, node),
                    None => snapshot(node),
                };
                self.store(revision, &path, PathState::Present(stamped(merged, revision)));
            }
            Some(NodeAction::Replace) => {
                self.tombstone_subtree(revision, &path);
                self.add(revision, &path, node)?;
            }
            Some(NodeAction::Add) | None => {
                self.add(revision, &path, node)?;
            }
        }
        Ok(())
    }

    /// Most recent present state of `path` at or before `revision`
    pub fn tell_me_about(&self, revision: u64, path: &str) -> Option<&Node> {
        self.state_at(revision, path).and_then(PathState::node)
    }

    /// Most recent state of `path` at or before `revision`, tombstones included
    pub fn state_at(&self, revision: u64, path: &str) -> Option<&PathState> {
        let states = self.history.get(path)?;
        let idx = states.partition_point(|(r, _)| *r <= revision);
        if idx == 0 {
            return None;
        }
        Some(&states[idx - 1].1)
    }

    /// Descendants of `dir` that are present as of `revision`
    pub fn live_descendants(&self, revision: u64, dir: &str) -> Vec<(&str, &Node)> {
        self.history
            .range::<str, _>((Bound::Included(dir), Bound::Unbounded))
            .take_while(|(path, _)| path.starts_with(dir))
            .filter(|(path, _)| is_descendant(path, dir))
            .filter_map(|(path, _)| {
                self.tell_me_about(revision, path)
                    .map(|node| (path.as_str(), node))
            })
            .collect()
    }

    fn add(&mut self, revision: u64, path: &str, node: &Node) -> std::result::Result<(), HistoryError> {
        self.store(revision, path, PathState::Present(stamped(snapshot(node), revision)));

        if !node.is_dir() {
            return Ok(());
        }
        let source = match node.copy_source()? {
            Some(source) => source,
            None => return Ok(()),
        };

        let copied: Vec<(String, Node)> = self
            .live_descendants(source.revision, source.path)
            .into_iter()
            .map(|(child, child_node)| {
                let relocated = format!("{}{}", path, &child[source.path.len()..]);
                let mut copy = child_node.clone();
                copy.set(NodeHeader::Path, relocated.clone());
                (relocated, stamped(copy, revision))
            })
            .collect();

        debug!(
            revision,
            path,
            from = source.path,
            descendants = copied.len(),
            "Directory copy propagated"
        );
        for (child, copy) in copied {
            self.store(revision, &child, PathState::Present(copy));
        }
        Ok(())
    }

    fn tombstone_subtree(&mut self, revision: u64, path: &str) {
        let doomed: Vec<String> = self
            .live_descendants(revision, path)
            .into_iter()
            .map(|(child, _)| child.to_string())
            .collect();
        for child in doomed {
            self.store(revision, &child, PathState::Deleted);
        }
        self.store(revision, path, PathState::Deleted);
    }

    /// A later state in the same revision replaces the earlier one
    fn store(&mut self, revision: u64, path: &str, state: PathState) {
        let states = self.history.entry(path.to_string()).or_default();
        match states.last_mut() {
            Some((r, current)) if *r == revision => *current = state,
            _ => states.push((revision, state)),
        }
    }
}

fn is_descendant(candidate: &str, dir: &str) -> bool {
    if dir.is_empty() {
        return !candidate.is_empty();
    }
    candidate.len() > dir.len() && candidate.starts_with(dir) && candidate.as_bytes()[dir.len()] == b'/'
}

fn snapshot(node: &Node) -> Node {
    let mut copy = node.clone();
    copy.set_content(Vec::new());
    copy
}

fn stamped(mut node: Node, revision: u64) -> Node {
    node.set_revision(revision);
    node
}

/// Apply a "change" node on top of the previous state of its path
fn overlay(previous: &Node, change: &Node) -> Node {
    let mut merged = snapshot(previous);

    // new text means the content no longer comes from the copy source
    let has_text = [NodeHeader::Md5, NodeHeader::Sha1, NodeHeader::TextContentLength]
        .iter()
        .any(|h| change.contains(*h));
    if has_text {
        for header in [
            NodeHeader::CopyFromRev,
            NodeHeader::CopyFromPath,
            NodeHeader::SourceMd5,
            NodeHeader::SourceSha1,
        ] {
            merged.remove(header);
        }
    }

    for (header, value) in change.headers() {
        merged.set(*header, value.clone());
    }

    if let Some(props) = change.properties() {
        let is_delta = change.get(NodeHeader::PropDelta) == Some("true");
        match merged.properties_mut() {
            Some(existing) if is_delta => {
                for (name, value) in props {
                    match value {
                        Some(_) => {
                            existing.insert(name.clone(), value.clone());
                        }
                        None => {
                            existing.shift_remove(name);
                        }
                    }
                }
            }
            _ => merged.set_properties(Some(props.clone())),
        }
    }
    merged
}

/// Chain stage that feeds a shared [`TreeOfKnowledge`]
///
/// Records each node at `end_node`, so it must sit after every stage whose
/// changes later copies should see.
pub struct TreeOfKnowledgeRecorder {
    chain: Chain,
    knowledge: SharedKnowledge,
    current_revision: Option<u64>,
}

impl TreeOfKnowledgeRecorder {
    pub fn new(knowledge: SharedKnowledge) -> Self {
        Self {
            chain: Chain::new(),
            knowledge,
            current_revision: None,
        }
    }

    pub fn knowledge(&self) -> SharedKnowledge {
        Rc::clone(&self.knowledge)
    }
}

impl RepositoryConsumer for TreeOfKnowledgeRecorder {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.current_revision = Some(revision.number());
        self.chain.begin_revision(revision)
    }

    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        record_node(&self.knowledge, self.current_revision, node)?;
        self.chain.end_node(node)
    }
}

/// Record `node` under its own revision, falling back to the revision in flight
pub(crate) fn record_node(
    knowledge: &SharedKnowledge,
    current_revision: Option<u64>,
    node: &Node,
) -> std::result::Result<(), HistoryError> {
    let revision = node
        .revision()
        .or(current_revision)
        .ok_or_else(|| HistoryError::MissingRevision {
            path: node.path().to_string(),
        })?;
    knowledge.borrow_mut().record(revision, node)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(action: &str, kind: Option<&str>, path: &str) -> Node {
        let mut node = Node::new()
            .with_header(NodeHeader::Action, action)
            .with_header(NodeHeader::Path, path);
        if let Some(kind) = kind {
            node.set(NodeHeader::Kind, kind);
        }
        node
    }

    fn copy(kind: &str, path: &str, from_rev: u64, from_path: &str) -> Node {
        node("add", Some(kind), path)
            .with_header(NodeHeader::CopyFromRev, from_rev.to_string())
            .with_header(NodeHeader::CopyFromPath, from_path)
    }

    #[test]
    fn test_unknown_path_is_absent() {
        let tree = TreeOfKnowledge::new();
        assert!(tree.tell_me_about(5, "README.txt").is_none());
    }

    #[test]
    fn test_lookup_at_or_before_revision() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(3, &node("add", Some("file"), "a.txt").with_header(NodeHeader::Md5, "m3"))
            .unwrap();
        tree.record(6, &node("change", Some("file"), "a.txt").with_header(NodeHeader::Md5, "m6"))
            .unwrap();

        assert!(tree.tell_me_about(2, "a.txt").is_none());
        assert_eq!(tree.tell_me_about(3, "a.txt").unwrap().get(NodeHeader::Md5), Some("m3"));
        assert_eq!(tree.tell_me_about(5, "a.txt").unwrap().get(NodeHeader::Md5), Some("m3"));
        assert_eq!(tree.tell_me_about(6, "a.txt").unwrap().get(NodeHeader::Md5), Some("m6"));
        assert_eq!(tree.tell_me_about(6, "a.txt").unwrap().revision(), Some(6));
    }

    #[test]
    fn test_delete_leaves_tombstone() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("file"), "a.txt")).unwrap();
        tree.record(2, &node("delete", None, "a.txt")).unwrap();

        assert!(tree.tell_me_about(1, "a.txt").is_some());
        assert!(tree.tell_me_about(2, "a.txt").is_none());
        assert_eq!(tree.state_at(2, "a.txt"), Some(&PathState::Deleted));
        assert_eq!(tree.state_at(0, "a.txt"), None);
    }

    #[test]
    fn test_change_inherits_untouched_headers() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(
            1,
            &node("add", Some("file"), "a.txt")
                .with_header(NodeHeader::Md5, "m1")
                .with_property("svn:eol-style", "native"),
        )
        .unwrap();
        tree.record(
            2,
            &node("change", Some("file"), "a.txt").with_property("svn:mime-type", "text/plain"),
        )
        .unwrap();

        let state = tree.tell_me_about(2, "a.txt").unwrap();
        assert_eq!(state.get(NodeHeader::Md5), Some("m1"));
        assert_eq!(state.get(NodeHeader::Action), Some("change"));
        assert_eq!(state.property("svn:mime-type"), Some("text/plain"));
        assert_eq!(state.property("svn:eol-style"), None);
    }

    #[test]
    fn test_change_with_new_text_drops_copy_origin() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("file"), "a.txt").with_header(NodeHeader::Md5, "m1"))
            .unwrap();
        tree.record(2, &copy("file", "b.txt", 1, "a.txt")).unwrap();
        tree.record(3, &node("change", Some("file"), "b.txt").with_header(NodeHeader::Md5, "m3"))
            .unwrap();

        let state = tree.tell_me_about(3, "b.txt").unwrap();
        assert_eq!(state.get(NodeHeader::CopyFromPath), None);
        assert_eq!(state.get(NodeHeader::Md5), Some("m3"));
        assert!(tree.tell_me_about(2, "b.txt").unwrap().contains(NodeHeader::CopyFromPath));
    }

    #[test]
    fn test_directory_copy_propagates_descendants() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("dir"), "trunk")).unwrap();
        tree.record(1, &node("add", Some("file"), "trunk/a.txt").with_header(NodeHeader::Md5, "ma"))
            .unwrap();
        tree.record(1, &node("add", Some("file"), "trunk-other.txt")).unwrap();
        tree.record(2, &node("add", Some("file"), "trunk/late.txt")).unwrap();
        tree.record(3, &copy("dir", "branches/b1", 1, "trunk")).unwrap();

        let copied = tree.tell_me_about(3, "branches/b1/a.txt").unwrap();
        assert_eq!(copied.get(NodeHeader::Md5), Some("ma"));
        assert_eq!(copied.path(), "branches/b1/a.txt");
        assert_eq!(copied.revision(), Some(3));
        assert!(tree.tell_me_about(3, "branches/b1/late.txt").is_none());
        assert!(tree.tell_me_about(3, "branches/b1-other.txt").is_none());
        assert!(tree.tell_me_about(2, "branches/b1/a.txt").is_none());
    }

    #[test]
    fn test_directory_delete_tombstones_descendants() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("dir"), "docs")).unwrap();
        tree.record(1, &node("add", Some("file"), "docs/a.txt")).unwrap();
        tree.record(1, &node("add", Some("file"), "docs2.txt")).unwrap();
        tree.record(4, &node("delete", None, "docs")).unwrap();

        assert_eq!(tree.state_at(4, "docs/a.txt"), Some(&PathState::Deleted));
        assert!(tree.tell_me_about(4, "docs2.txt").is_some());
        assert!(tree.tell_me_about(3, "docs/a.txt").is_some());
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(5, &node("add", Some("file"), "a.txt")).unwrap();
        assert_eq!(
            tree.record(4, &node("add", Some("file"), "b.txt")),
            Err(HistoryError::OutOfOrder { revision: 4, last: 5 })
        );
    }

    #[test]
    fn test_recorder_stage_uses_revision_in_flight() {
        let knowledge = TreeOfKnowledge::shared();
        let mut recorder = TreeOfKnowledgeRecorder::new(Rc::clone(&knowledge));

        let mut revision = Revision::new(2);
        let mut added = node("add", Some("file"), "a.txt");
        recorder.begin_revision(&mut revision).unwrap();
        recorder.consume_node(&mut added).unwrap();
        recorder.end_chunks().unwrap();
        recorder.end_node(&mut added).unwrap();

        assert!(knowledge.borrow().tell_me_about(2, "a.txt").is_some());
        assert_eq!(knowledge.borrow().last_revision(), Some(2));
    }

    #[test]
    fn test_recorder_without_revision_fails() {
        let mut recorder = TreeOfKnowledgeRecorder::new(TreeOfKnowledge::shared());
        let mut orphan = node("add", Some("file"), "a.txt");
        assert!(recorder.end_node(&mut orphan).is_err());
    }

    #[test]
    fn test_file_replace_keeps_earlier_state() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("file"), "a.txt").with_header(NodeHeader::Md5, "m1"))
            .unwrap();
        tree.record(2, &node("replace", Some("file"), "a.txt").with_header(NodeHeader::Md5, "m2"))
            .unwrap();

        assert_eq!(tree.tell_me_about(1, "a.txt").unwrap().get(NodeHeader::Md5), Some("m1"));
        assert_eq!(tree.tell_me_about(2, "a.txt").unwrap().get(NodeHeader::Md5), Some("m2"));
        assert_eq!(tree.tell_me_about(2, "a.txt").unwrap().get(NodeHeader::Action), Some("replace"));
    }

    #[test]
    fn test_directory_replace_tombstones_children() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("dir"), "docs")).unwrap();
        tree.record(1, &node("add", Some("file"), "docs/a.txt")).unwrap();
        tree.record(3, &node("replace", Some("dir"), "docs")).unwrap();

        assert!(tree.tell_me_about(3, "docs").is_some());
        assert_eq!(tree.state_at(3, "docs/a.txt"), Some(&PathState::Deleted));
        assert!(tree.tell_me_about(2, "docs/a.txt").is_some());
    }

    #[test]
    fn test_directory_replaced_by_older_self() {
        let mut tree = TreeOfKnowledge::new();
        tree.record(1, &node("add", Some("dir"), "trunk")).unwrap();
        tree.record(1, &node("add", Some("file"), "trunk/a.txt").with_header(NodeHeader::Md5, "ma"))
            .unwrap();
        tree.record(2, &node("add", Some("file"), "trunk/b.txt")).unwrap();
        tree.record(3, &node("delete", None, "trunk/a.txt")).unwrap();

        let revert = node("replace", Some("dir"), "trunk")
            .with_header(NodeHeader::CopyFromRev, "1")
            .with_header(NodeHeader::CopyFromPath, "trunk");
        tree.record(4, &revert).unwrap();

        let restored = tree.tell_me_about(4, "trunk/a.txt").unwrap();
        assert_eq!(restored.get(NodeHeader::Md5), Some("ma"));
        assert_eq!(restored.revision(), Some(4));
        assert_eq!(tree.state_at(4, "trunk/b.txt"), Some(&PathState::Deleted));
        assert_eq!(tree.state_at(3, "trunk/a.txt"), Some(&PathState::Deleted));
        assert!(tree.tell_me_about(3, "trunk/b.txt").is_some());
    }
}
