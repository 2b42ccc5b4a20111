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

//! Property names and maps
//!
//! Properties keep insertion order so that re-serialized dumps stay byte for
//! byte identical when nothing was changed.

use indexmap::IndexMap;

/// Revision log message
pub const LOG: &str = "svn:log";

/// Revision author
pub const AUTHOR: &str = "svn:author";

/// Revision date (ISO-8601)
pub const DATE: &str = "svn:date";

/// Merge info mini-language, see [`crate::mergeinfo`]
pub const MERGEINFO: &str = "svn:mergeinfo";

/// Revision properties
pub type RevisionProperties = IndexMap<String, String>;

/// Node properties. A `None` value marks a property removed by a property delta.
pub type NodeProperties = IndexMap<String, Option<String>>;
