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

//! Validating stages
//!
//! A validator watches the stream and collects faults. On its own it only
//! reports them and keeps forwarding; wrapped in a
//! [`TerminatingValidator`] the first fault stops the run.

pub mod path_collision;
pub mod terminating;

pub use path_collision::PathCollisionValidator;
pub use terminating::TerminatingValidator;

use crate::consumer::RepositoryConsumer;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Validation faults
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("r{revision}: path {path} added more than once")]
    PathCollision { revision: u64, path: String },

    #[error("Stream terminated by validation fault: {fault}")]
    Terminated { fault: Box<ValidationError> },
}

/// Faults collected by a validator, readable after the run
pub type SharedFindings = Rc<RefCell<Vec<ValidationError>>>;

/// A stage that checks structural consistency of the stream
pub trait RepositoryValidator: RepositoryConsumer {
    /// No fault seen so far
    fn is_valid(&self) -> bool;

    /// First fault seen, if any
    fn error(&self) -> Option<ValidationError>;

    /// Handle to every fault seen
    fn findings(&self) -> SharedFindings;
}
