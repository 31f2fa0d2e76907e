use crate::error::BuildError;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub type TargetId = usize;

/// Name of the phony target building every default target.
pub const ALL_TARGET: &str = "all";
/// Name of the phony target removing the default artifacts.
pub const CLEAN_TARGET: &str = "clean";

#[derive(Clone, Debug)]
pub struct Target {
    pub id: TargetId,
    pub name: String,
    /// Directory the recipe runs in. Relative paths of the target resolve against it.
    pub project_dir: PathBuf,
    pub dependencies: Vec<TargetId>,
    pub input_paths: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub recipe: Recipe,
}

impl Target {
    pub fn resolved_output_path(&self) -> PathBuf {
        self.project_dir.join(&self.output_path)
    }

    pub fn resolved_input_paths(&self) -> Vec<PathBuf> {
        self.input_paths
            .iter()
            .map(|path| self.project_dir.join(path))
            .collect()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.name)
    }
}

/// The action producing the output artifact of a target.
///
/// Paths are kept as written in the build description: commands run from
/// the project directory, so that archives store relative entries.
#[derive(Clone, Debug, PartialEq)]
pub enum Recipe {
    Zip {
        source: PathBuf,
    },
    TarGz {
        source: PathBuf,
        verbose: bool,
    },
    Squashfs {
        requirements: PathBuf,
        staging_dir: PathBuf,
        wipe: Vec<PathBuf>,
    },
    Script(String),
}

impl Recipe {
    /// Paths read by the recipe, used as inputs when a target declares none.
    pub fn source_paths(&self) -> Vec<PathBuf> {
        match self {
            Recipe::Zip { source } | Recipe::TarGz { source, .. } => vec![source.clone()],
            Recipe::Squashfs { requirements, .. } => vec![requirements.clone()],
            Recipe::Script(_) => vec![],
        }
    }
}

#[derive(Debug)]
pub struct BuildGraph {
    /// Sorted so that every target comes after its dependencies.
    pub targets: Vec<Target>,
    pub default_targets: Vec<TargetId>,
    names: HashMap<String, TargetId>,
}

impl BuildGraph {
    pub fn new(targets: Vec<Target>, default_targets: Vec<TargetId>) -> Self {
        let names = targets
            .iter()
            .map(|target| (target.name.clone(), target.id))
            .collect();

        Self {
            targets,
            default_targets,
            names,
        }
    }

    pub fn get_target(&self, name: &str) -> Result<&Target, BuildError> {
        self.names
            .get(name)
            .map(|&target_id| &self.targets[target_id])
            .ok_or_else(|| BuildError::MissingTarget {
                name: name.to_string(),
            })
    }

    pub fn default_targets(&self) -> impl Iterator<Item = &Target> {
        self.default_targets
            .iter()
            .map(move |&target_id| &self.targets[target_id])
    }

    /// Checks that every requested name is either a target or a phony target.
    pub fn validate_requested_targets(
        &self,
        requested_targets: &[String],
    ) -> Result<(), BuildError> {
        match requested_targets.iter().find(|&name| {
            name != ALL_TARGET && name != CLEAN_TARGET && !self.names.contains_key(name)
        }) {
            Some(name) => Err(BuildError::MissingTarget { name: name.clone() }),
            None => Ok(()),
        }
    }

    /// Target names, default targets first.
    pub fn target_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .default_targets()
            .map(|target| target.name.as_str())
            .collect();
        let mut others: Vec<&str> = self
            .targets
            .iter()
            .filter(|target| !self.default_targets.contains(&target.id))
            .map(|target| target.name.as_str())
            .collect();
        others.sort_unstable();
        names.append(&mut others);
        names
    }
}
