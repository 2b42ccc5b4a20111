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

//! Human readable revision summary
//!
//! ```text
//! r1: add readme - alice 2015-01-01
//!
//! 	add file README.txt 09f7e02f1290be211da707a266f153b3 Size: 6 bytes
//!
//! r2-4: **empty**
//!
//! ```
//!
//! Runs of revisions without nodes collapse into one line, written when the
//! next non-empty revision arrives or at `finish`.

use crate::consumer::{Chain, RepositoryConsumer};
use crate::error::Result;
use dumpstream_core::{Node, Revision};
use std::io::Write;
use tracing::info;

pub struct DumpSummary<W: Write> {
    chain: Chain,
    out: W,
    /// First and last revision of the pending empty run
    empty_run: Option<(u64, u64)>,
    /// Display lines of the nodes in the current revision
    lines: Vec<String>,
    revisions: u64,
}

impl<W: Write> DumpSummary<W> {
    pub fn new(out: W) -> Self {
        Self {
            chain: Chain::new(),
            out,
            empty_run: None,
            lines: Vec::new(),
            revisions: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_empty_run(&mut self) -> std::io::Result<()> {
        match self.empty_run.take() {
            Some((first, last)) if first != last => writeln!(self.out, "r{}-{}: **empty**\n", first, last),
            Some((first, _)) => writeln!(self.out, "r{}: **empty**\n", first),
            None => Ok(()),
        }
    }

    fn write_revision(&mut self, revision: &Revision) -> std::io::Result<()> {
        let date: String = revision.date().unwrap_or_default().chars().take(10).collect();
        writeln!(
            self.out,
            "r{}: {} - {} {}",
            revision.number(),
            revision.log().unwrap_or_default().trim(),
            revision.author().unwrap_or_default(),
            date
        )?;
        writeln!(self.out)?;
        for line in self.lines.drain(..) {
            writeln!(self.out, "\t{}", line)?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> RepositoryConsumer for DumpSummary<W> {
    fn chain(&mut self) -> &mut Chain {
        &mut self.chain
    }

    fn begin_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.lines.clear();
        self.chain.begin_revision(revision)
    }

    fn end_node(&mut self, node: &mut Node) -> Result<()> {
        self.lines.push(node.to_string());
        self.chain.end_node(node)
    }

    fn end_revision(&mut self, revision: &mut Revision) -> Result<()> {
        self.revisions += 1;
        if self.lines.is_empty() {
            let number = revision.number();
            self.empty_run = match self.empty_run {
                Some((first, _)) => Some((first, number)),
                None => Some((number, number)),
            };
        } else {
            self.flush_empty_run()?;
            self.write_revision(revision)?;
        }
        self.chain.end_revision(revision)
    }

    fn finish(&mut self) -> Result<()> {
        self.flush_empty_run()?;
        self.out.flush()?;
        info!(revisions = self.revisions, "Summary written");
        self.chain.finish()
    }
}
