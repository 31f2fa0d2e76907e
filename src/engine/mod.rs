mod builder;
pub mod incremental;
mod recipe;

use crate::clean::{clean_target_outputs, CleanMode};
use crate::domain::{BuildGraph, Target, TargetId, ALL_TARGET, CLEAN_TARGET};
use anyhow::Result;
use builder::build_target;
use incremental::{run_incrementally, IncrementalRunResult};
use std::collections::HashSet;

pub struct Engine {
    graph: BuildGraph,
    /// Targets built (or found up to date) during this run.
    built: HashSet<TargetId>,
}

impl Engine {
    pub fn new(graph: BuildGraph) -> Self {
        Self {
            graph,
            built: HashSet::new(),
        }
    }

    /// Runs the requested targets in order, stopping at the first failure.
    ///
    /// Every name is checked before anything runs.
    pub fn run(&mut self, requested_targets: &[String]) -> Result<()> {
        self.graph.validate_requested_targets(requested_targets)?;

        for target_name in requested_targets {
            match target_name.as_str() {
                ALL_TARGET => self.build_all()?,
                CLEAN_TARGET => self.clean()?,
                _ => self.build(target_name)?,
            }
        }

        Ok(())
    }

    /// Builds a target after its dependencies, unless its output is up to date.
    pub fn build(&mut self, target_name: &str) -> Result<()> {
        let target_id = self.graph.get_target(target_name)?.id;
        self.build_with_dependencies(target_id)
    }

    /// Builds the default targets in declaration order.
    pub fn build_all(&mut self) -> Result<()> {
        for target_id in self.graph.default_targets.clone() {
            self.build_with_dependencies(target_id)?;
        }

        Ok(())
    }

    /// Removes the outputs of the default targets. A missing output is an error.
    pub fn clean(&mut self) -> Result<()> {
        clean_target_outputs(self.graph.default_targets(), CleanMode::Strict)?;
        self.built
            .retain(|target_id| !self.graph.default_targets.contains(target_id));
        Ok(())
    }

    /// Removes the outputs of the requested targets, ignoring those already missing.
    ///
    /// A requested `clean` is left to `run`, which removes the default outputs strictly.
    pub fn clean_requested(&mut self, requested_targets: &[String]) -> Result<()> {
        self.graph.validate_requested_targets(requested_targets)?;

        let mut targets: Vec<&Target> = Vec::new();
        for target_name in requested_targets {
            match target_name.as_str() {
                CLEAN_TARGET => {}
                ALL_TARGET => targets.extend(self.graph.default_targets()),
                _ => targets.push(self.graph.get_target(target_name)?),
            }
        }

        clean_target_outputs(targets, CleanMode::Tolerant)
    }

    fn build_with_dependencies(&mut self, target_id: TargetId) -> Result<()> {
        if self.built.contains(&target_id) {
            return Ok(());
        }

        for dependency_id in self.graph.targets[target_id].dependencies.clone() {
            self.build_with_dependencies(dependency_id)?;
        }

        let target = &self.graph.targets[target_id];
        match run_incrementally(target, || build_target(target))? {
            IncrementalRunResult::Skipped => {
                log::info!("{} - Build skipped (Not Modified)", target)
            }
            IncrementalRunResult::Run(result) => result?,
        }

        self.built.insert(target_id);
        Ok(())
    }
}
