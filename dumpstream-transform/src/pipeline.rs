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

//! Pipeline assembly from configuration
//!
//! Stage order is fixed:
//!
//! 1. ClearRevisions
//! 2. PathChange, one per rule in listed order
//! 3. FileContentReplace, one per rule, all reading one shared index
//! 4. TreeOfKnowledgeRecorder feeding that index
//! 5. validators
//!
//! Content replacement rules therefore name paths as they look after the
//! path changes. The caller attaches the sink with `continue_to`.

use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use crate::transform::{chunk_from_str, ClearRevisions, FileContentReplace, PathChange};
use crate::tree_of_knowledge::{SharedKnowledge, TreeOfKnowledge, TreeOfKnowledgeRecorder};
use crate::validate::{PathCollisionValidator, RepositoryValidator, SharedFindings, TerminatingValidator};
use dumpstream_core::PipelineConfig;
use std::rc::Rc;
use tracing::info;

/// Head of an assembled chain
#[derive(Default)]
pub struct Pipeline {
    chain: Chain,
    stages: usize,
    knowledge: Option<SharedKnowledge>,
    findings: Option<SharedFindings>,
}

impl Pipeline {
    /// Number of stages built from the configuration
    pub fn stage_count(&self) -> usize {
        self.stages
    }

    /// History index shared by the content replacements
    pub fn knowledge(&self) -> Option<SharedKnowledge> {
        self.knowledge.clone()
    }

    /// Faults reported by the collision validator
    pub fn findings(&self) -> Option<SharedFindings> {
        self.findings.clone()
    }

    fn push(&mut self, stage: Box<dyn RepositoryConsumer>) {
        self.chain.append(stage);
        self.stages += 1;
    }
}

impl RepositoryConsumer for Pipeline {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn finish(&mut self) -> Result<()> {
        self.chain.finish()?;
        info!(stages = self.stages, "Pipeline finished");
        Ok(())
    }
}

pub fn build_pipeline(config: &PipelineConfig) -> Result<Pipeline> {
    config.validate()?;
    let mut pipeline = Pipeline::default();

    let cleared = config.clear_revision_spans()?;
    if !cleared.is_empty() {
        pipeline.push(Box::new(ClearRevisions::new(cleared)));
    }

    for rule in &config.path_changes {
        pipeline.push(Box::new(PathChange::new(rule.from.as_str(), rule.to.as_str())));
    }

    if !config.content_replacements.is_empty() {
        let knowledge = TreeOfKnowledge::shared();
        for rule in &config.content_replacements {
            pipeline.push(Box::new(FileContentReplace::with_shared_knowledge(
                FileContentReplace::node_match(rule.revision, rule.action, &rule.path),
                chunk_from_str(&rule.content),
                Rc::clone(&knowledge),
            )));
        }
        pipeline.push(Box::new(TreeOfKnowledgeRecorder::new(Rc::clone(&knowledge))));
        pipeline.knowledge = Some(knowledge);
    }

    if config.validation.path_collisions {
        let validator = PathCollisionValidator::new();
        pipeline.findings = Some(validator.findings());
        if config.validation.terminate_on_fault {
            pipeline.push(Box::new(TerminatingValidator::new(validator)));
        } else {
            pipeline.push(Box::new(validator));
        }
    }

    info!(stages = pipeline.stages, "Pipeline assembled");
    Ok(pipeline)
}
