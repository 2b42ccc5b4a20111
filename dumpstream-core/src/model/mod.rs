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

//! Event Model
//!
//! The values that flow through a consumer chain. Stages own and mutate them
//! in place while an event is being delivered.

pub mod chunk;
pub mod header;
pub mod node;
pub mod property;
pub mod revision;

pub use chunk::ContentChunk;
pub use header::{HeaderError, NodeAction, NodeHeader, NodeKind};
pub use node::{CopySource, Node, NodeHeaders};
pub use property::{NodeProperties, RevisionProperties};
pub use revision::Revision;
