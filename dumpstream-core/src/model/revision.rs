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

//! Revision - one commit with its properties and nodes

use super::node::Node;
use super::property::{self, RevisionProperties};

/// One unit of change: a property set plus the nodes it touched.
///
/// While streaming, stages see the revision bracket the node events and
/// `nodes` stays empty; sinks that materialize history fill it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revision {
    number: u64,
    properties: RevisionProperties,
    nodes: Vec<Node>,
}

impl Revision {
    pub fn new(number: u64) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.properties.insert(name.into(), value.into())
    }

    pub fn properties(&self) -> &RevisionProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut RevisionProperties {
        &mut self.properties
    }

    pub fn log(&self) -> Option<&str> {
        self.get(property::LOG)
    }

    pub fn author(&self) -> Option<&str> {
        self.get(property::AUTHOR)
    }

    pub fn date(&self) -> Option<&str> {
        self.get(property::DATE)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.nodes
    }

    /// Attach a node, stamping it with this revision's number
    pub fn add_node(&mut self, mut node: Node) {
        node.set_revision(self.number);
        self.nodes.push(node);
    }

    /// Copy of the revision without its nodes
    pub fn header_only(&self) -> Revision {
        Revision {
            number: self.number,
            properties: self.properties.clone(),
            nodes: Vec::new(),
        }
    }
}
