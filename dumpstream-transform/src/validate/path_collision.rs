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

//! PathCollisionValidator - flag a path added twice in one revision

use super::{RepositoryValidator, SharedFindings, ValidationError};
use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{Node, NodeAction, NodeHeader, Revision};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::warn;

/// Reports a revision that adds the same path twice
#[derive(Default)]
pub struct PathCollisionValidator {
    chain: Chain,
    current_revision: u64,
    added: HashSet<String>,
    findings: SharedFindings,
}

impl PathCollisionValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryConsumer for PathCollisionValidator {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.current_revision = revision.number();
        self.added.clear();
        self.chain.begin_revision(revision)
    }

    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        let is_add = node.get(NodeHeader::Action) == Some(NodeAction::Add.as_str());
        if is_add && !self.added.insert(node.path().to_string()) {
            let revision = node.revision().unwrap_or(self.current_revision);
            warn!(revision, path = node.path(), "Path added twice in one revision");
            self.findings.borrow_mut().push(ValidationError::PathCollision {
                revision,
                path: node.path().to_string(),
            });
        }
        self.chain.consume_node(node)
    }
}

impl RepositoryValidator for PathCollisionValidator {
    fn is_valid(&self) -> bool {
        self.findings.borrow().is_empty()
    }

    fn error(&self) -> Option<ValidationError> {
        self.findings.borrow().first().cloned()
    }

    fn findings(&self) -> SharedFindings {
        Rc::clone(&self.findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(path: &str) -> Node {
        Node::new()
            .with_header(NodeHeader::Action, "add")
            .with_header(NodeHeader::Path, path)
    }

    fn feed(validator: &mut PathCollisionValidator, number: u64, nodes: Vec<Node>) {
        let mut revision = Revision::new(number);
        validator.begin_revision(&mut revision).unwrap();
        for mut node in nodes {
            validator.consume_node(&mut node).unwrap();
            validator.end_chunks().unwrap();
            validator.end_node(&mut node).unwrap();
        }
        validator.end_revision(&mut revision).unwrap();
    }

    #[test]
    fn test_distinct_adds_are_valid() {
        let mut validator = PathCollisionValidator::new();
        feed(&mut validator, 1, vec![add("a"), add("b")]);
        feed(&mut validator, 2, vec![add("a")]);
        assert!(validator.is_valid());
        assert_eq!(validator.error(), None);
    }

    #[test]
    fn test_duplicate_add_reported() {
        let mut validator = PathCollisionValidator::new();
        let change = Node::new()
            .with_header(NodeHeader::Action, "change")
            .with_header(NodeHeader::Path, "a");
        feed(&mut validator, 3, vec![add("a"), change, add("a")]);

        assert!(!validator.is_valid());
        assert_eq!(
            validator.error(),
            Some(ValidationError::PathCollision {
                revision: 3,
                path: "a".to_string()
            })
        );
        assert_eq!(validator.findings().borrow().len(), 1);
    }
}
