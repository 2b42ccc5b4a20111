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

//! Dumpstream Core
//!
//! Value types shared by every stage of a dump transformation pipeline:
//! revisions, nodes and content chunks, revision span sets, merge info,
//! content digests, and the pipeline configuration.

pub mod config;
pub mod digest;
pub mod error;
pub mod mergeinfo;
pub mod model;
pub mod range;
pub mod telemetry;

pub use config::{
    ConfigError, ContentReplaceRule, LoggingConfig, PathChangeRule, PipelineConfig,
    ValidationConfig, DEFAULT_LOG_LEVEL,
};
pub use digest::{md5_hex, sha1_hex, DigestKind};
pub use error::{DumpError, Result};
pub use mergeinfo::{MergeInfoData, MergeInfoError, MergeInfoPath, MergeInfoRange};
pub use model::{
    property, ContentChunk, CopySource, HeaderError, Node, NodeAction, NodeHeader, NodeHeaders,
    NodeKind, NodeProperties, Revision, RevisionProperties,
};
pub use range::{MultiSpan, Span, SpanError, NEGATIVE_INFINITY, POSITIVE_INFINITY};
pub use telemetry::{init_logging, TelemetryError};
