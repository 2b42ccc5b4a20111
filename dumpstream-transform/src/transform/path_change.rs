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

//! PathChange - move a subtree by rewriting path prefixes
//!
//! Rewrites `Node-path` and `Node-copyfrom-path` values that start with the
//! old prefix, and the matching source paths inside `svn:mergeinfo` on both
//! revisions and nodes. Merge info paths are absolute (`/trunk/...`) while
//! node paths are not. Merge info is only re-serialized when one of its
//! paths actually changed.

use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{property, MergeInfoData, MergeInfoError, Node, NodeHeader, Revision};

pub struct PathChange {
    chain: Chain,
    old_path: String,
    new_path: String,
}

impl PathChange {
    pub fn new(old_path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            chain: Chain::new(),
            old_path: old_path.into(),
            new_path: new_path.into(),
        }
    }

    fn rewrite(&self, path: &str) -> Option<String> {
        path.strip_prefix(self.old_path.as_str())
            .map(|rest| format!("{}{}", self.new_path, rest))
    }

    fn rewrite_header(&self, node: &mut Node, header: NodeHeader) {
        if let Some(changed) = node.get(header).and_then(|value| self.rewrite(value)) {
            node.set(header, changed);
        }
    }

    /// Rewritten merge info text, or `None` when no path changed
    fn rewrite_merge_info(&self, current: &str) -> std::result::Result<Option<String>, MergeInfoError> {
        let mut data = MergeInfoData::parse(current)?;
        let old_prefix = format!("/{}", self.old_path);

        let mut changed = false;
        for path in data.paths_mut() {
            if let Some(rest) = path.path().strip_prefix(old_prefix.as_str()) {
                let renamed = format!("/{}{}", self.new_path, rest);
                path.set_path(renamed);
                changed = true;
            }
        }

        Ok(changed.then(|| data.to_string()))
    }
}

impl RepositoryConsumer for PathChange {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        if let Some(current) = revision.get(property::MERGEINFO) {
            if let Some(updated) = self.rewrite_merge_info(current)? {
                revision.set(property::MERGEINFO, updated);
            }
        }
        self.chain.begin_revision(revision)
    }

    fn consume_node(&mut self, node: &mut Node) -> Result<()> {
        self.rewrite_header(node, NodeHeader::Path);
        self.rewrite_header(node, NodeHeader::CopyFromPath);

        if let Some(current) = node.property(property::MERGEINFO) {
            if let Some(updated) = self.rewrite_merge_info(current)? {
                if let Some(props) = node.properties_mut() {
                    props.insert(property::MERGEINFO.to_string(), Some(updated));
                }
            }
        }
        self.chain.consume_node(node)
    }
}
