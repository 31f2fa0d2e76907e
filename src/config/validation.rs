use super::{Project, Target};
use crate::domain::{ALL_TARGET, CLEAN_TARGET};
use crate::error::BuildError;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

pub fn validate_project(project_dir: &Path, project: &Project) -> Result<()> {
    for default_target in &project.default {
        if !project.targets.contains_key(default_target) {
            return Err(BuildError::MissingTarget {
                name: default_target.clone(),
            })
            .with_context(|| "Invalid default targets");
        }
    }

    let mut target_names: Vec<&String> = project.targets.keys().collect();
    target_names.sort_unstable();

    for &target_name in &target_names {
        if !is_valid_target_name(target_name) {
            return Err(BuildError::InvalidTargetName {
                name: target_name.clone(),
            }
            .into());
        }

        validate_recipe(&project.targets[target_name])
            .and_then(|_| {
                validate_target(target_name, &[], &project.targets).map_err(anyhow::Error::from)
            })
            .with_context(|| format!("Target {} is invalid", target_name))?;
    }

    validate_unique_outputs(project_dir, &target_names, &project.targets)
}

pub fn is_valid_target_name(target_name: &str) -> bool {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\w[-.\w]*$").unwrap();
    }
    RE.is_match(target_name) && target_name != ALL_TARGET && target_name != CLEAN_TARGET
}

fn validate_recipe(target: &Target) -> Result<()> {
    let recipe_count = [
        target.zip.is_some(),
        target.tar_gz.is_some(),
        target.squashfs.is_some(),
        target.build.is_some(),
    ]
    .iter()
    .filter(|&&is_set| is_set)
    .count();

    match recipe_count {
        1 => Ok(()),
        0 => Err(anyhow::anyhow!(
            "A recipe is required (zip, tar_gz, squashfs or build)"
        )),
        _ => Err(anyhow::anyhow!(
            "Only one recipe can be set (zip, tar_gz, squashfs or build)"
        )),
    }
}

/// Checks the validity of the provided target.
///
/// Ensures that all target dependencies (both direct and transitive) exist,
/// and that the dependency graph has no circular dependency.
fn validate_target(
    target_name: &str,
    parent_targets: &[&str],
    targets: &HashMap<String, Target>,
) -> Result<(), BuildError> {
    let target = targets
        .get(target_name)
        .ok_or_else(|| BuildError::MissingTarget {
            name: target_name.to_string(),
        })?;

    if parent_targets.contains(&target_name) {
        let chain = parent_targets
            .iter()
            .chain(std::iter::once(&target_name))
            .map(|name| name.to_string())
            .collect();
        return Err(BuildError::CircularDependency { chain });
    }

    let targets_chain = [parent_targets, &[target_name]].concat();
    for dependency in &target.dependencies {
        validate_target(dependency, &targets_chain, targets)?;
    }

    Ok(())
}

/// Rejects targets whose outputs resolve to the same file, such as `out.txt` and `./out.txt`.
fn validate_unique_outputs(
    project_dir: &Path,
    target_names: &[&String],
    targets: &HashMap<String, Target>,
) -> Result<()> {
    let mut outputs: HashMap<PathBuf, &str> = HashMap::with_capacity(target_names.len());

    for &target_name in target_names {
        let output = &targets[target_name].output;
        let resolved_output = normalize_path(&project_dir.join(output));
        if let Some(first) = outputs.insert(resolved_output, target_name.as_str()) {
            return Err(BuildError::DuplicateOutput {
                first: first.to_string(),
                second: target_name.clone(),
                path: PathBuf::from(output),
            }
            .into());
        }
    }

    Ok(())
}

/// Lexically drops `.` components and collapses `..` ones.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            component => normalized.push(component),
        }
    }
    normalized
}
