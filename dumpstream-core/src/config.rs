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

//! Pipeline configuration
//!
//! Describes which transforms and validators a pipeline runs, in a form that
//! can be written by hand as TOML:
//!
//! ```toml
//! clear_revisions = ["5-7", "12"]
//!
//! [[path_changes]]
//! from = "trunk/old"
//! to = "trunk/new"
//!
//! [[content_replacements]]
//! revision = 1
//! action = "add"
//! path = "README.txt"
//! content = "No content.\n"
//!
//! [validation]
//! path_collisions = true
//! terminate_on_fault = true
//!
//! [logging]
//! level = "debug"
//! json = false
//! ```

use crate::model::NodeAction;
use crate::range::{MultiSpan, SpanError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}

/// Rewrite every path under `from` to live under `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathChangeRule {
    pub from: String,
    pub to: String,
}

/// Replace the text of one file node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReplaceRule {
    /// Revision holding the node
    pub revision: u64,
    /// Node action to match
    pub action: NodeAction,
    /// Node path to match
    pub path: String,
    /// Replacement text
    pub content: String,
}

/// Validators to attach at the end of the chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report a path added twice within one revision
    pub path_collisions: bool,
    /// Halt the stream at the first validation fault instead of logging it
    pub terminate_on_fault: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

/// Complete pipeline description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path prefix rewrites, applied in order
    pub path_changes: Vec<PathChangeRule>,

    /// Content replacements
    pub content_replacements: Vec<ContentReplaceRule>,

    /// Span expressions (`"5"`, `"3-7"`, `"10-"`) naming revisions whose
    /// nodes are dropped
    pub clear_revisions: Vec<String>,

    pub validation: ValidationConfig,

    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Forward every event untouched
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Check path collisions and halt on the first one
    pub fn strict() -> Self {
        Self {
            validation: ValidationConfig {
                path_collisions: true,
                terminate_on_fault: true,
            },
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&input)?;
        debug!(
            path = %path.display(),
            path_changes = config.path_changes.len(),
            content_replacements = config.content_replacements.len(),
            "Loaded pipeline config"
        );
        Ok(config)
    }

    /// Reject rules that cannot be applied
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in &self.path_changes {
            if rule.from.is_empty() {
                return Err(ConfigError::InvalidRule(format!(
                    "path change to {:?} has an empty source prefix",
                    rule.to
                )));
            }
        }
        for rule in &self.content_replacements {
            if rule.path.is_empty() {
                return Err(ConfigError::InvalidRule(format!(
                    "content replacement in r{} has an empty path",
                    rule.revision
                )));
            }
        }
        self.clear_revision_spans()?;
        Ok(())
    }

    /// `clear_revisions` as one span set
    pub fn clear_revision_spans(&self) -> Result<MultiSpan, ConfigError> {
        let mut spans = MultiSpan::new();
        for expr in &self.clear_revisions {
            let parsed: MultiSpan = expr
                .parse()
                .map_err(|e: SpanError| ConfigError::InvalidRule(format!("clear_revisions {:?}: {}", expr, e)))?;
            spans.extend(parsed);
        }
        Ok(spans)
    }
}
