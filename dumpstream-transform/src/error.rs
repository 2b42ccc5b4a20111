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
//!
//! Any stage may fail an event; the error travels back up the chain to the
//! event source, which stops the run.

use crate::transform::TransformError;
use crate::tree_of_knowledge::HistoryError;
use crate::validate::ValidationError;
use dumpstream_core::{ConfigError, HeaderError, MergeInfoError, SpanError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Header error: {0}")]
    Header(#[from] HeaderError),

    #[error("Merge info error: {0}")]
    MergeInfo(#[from] MergeInfoError),

    #[error("Span error: {0}")]
    Span(#[from] SpanError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for chain callbacks.
pub type Result<T> = std::result::Result<T, DumpError>;
