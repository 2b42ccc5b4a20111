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

//! Crate-level error

use crate::config::ConfigError;
use crate::mergeinfo::MergeInfoError;
use crate::model::HeaderError;
use crate::range::SpanError;
use crate::telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Span error: {0}")]
    Span(#[from] SpanError),

    #[error("Header error: {0}")]
    Header(#[from] HeaderError),

    #[error("Merge info error: {0}")]
    MergeInfo(#[from] MergeInfoError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

/// Result type for dumpstream-core operations.
pub type Result<T> = std::result::Result<T, DumpError>;
