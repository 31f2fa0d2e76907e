use crate::config;
use crate::domain::{self, BuildGraph, Recipe, TargetId};
use crate::error::BuildError;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Converts a validated project into a build graph.
///
/// Target ids follow a depth-first order over the default targets, then the
/// remaining targets by name, so that dependencies always precede their dependents.
pub fn into_build_graph(project_dir: &Path, project: config::Project) -> Result<BuildGraph> {
    let config::Project {
        default,
        targets: mut parsed_targets,
    } = project;

    let mut remaining_names: Vec<String> = parsed_targets
        .keys()
        .filter(|&name| !default.contains(name))
        .cloned()
        .collect();
    remaining_names.sort_unstable();

    let mut targets = Vec::with_capacity(parsed_targets.len());
    let mut mapping = HashMap::with_capacity(parsed_targets.len());

    fn add_target(
        targets: &mut Vec<domain::Target>,
        mapping: &mut HashMap<String, TargetId>,
        project_dir: &Path,
        parsed_targets: &mut HashMap<String, config::Target>,
        target_name: &str,
    ) -> Result<TargetId, BuildError> {
        if let Some(&target_id) = mapping.get(target_name) {
            return Ok(target_id);
        }

        let config::Target {
            dependencies,
            input_paths,
            output,
            zip,
            tar_gz,
            squashfs,
            build,
        } = parsed_targets
            .remove(target_name)
            .ok_or_else(|| BuildError::MissingTarget {
                name: target_name.to_string(),
            })?;

        let dependencies = dependencies
            .iter()
            .map(|dependency| add_target(targets, mapping, project_dir, parsed_targets, dependency))
            .collect::<Result<Vec<_>, _>>()?;

        let recipe = if let Some(zip) = zip {
            Recipe::Zip {
                source: zip.source.into(),
            }
        } else if let Some(tar_gz) = tar_gz {
            Recipe::TarGz {
                source: tar_gz.source.into(),
                verbose: tar_gz.verbose,
            }
        } else if let Some(squashfs) = squashfs {
            Recipe::Squashfs {
                requirements: squashfs.requirements.into(),
                staging_dir: squashfs.staging_dir.into(),
                wipe: squashfs.wipe.into_iter().map(PathBuf::from).collect(),
            }
        } else {
            Recipe::Script(build.unwrap_or_default())
        };

        let input_paths = match input_paths {
            Some(input_paths) => input_paths.into_iter().map(PathBuf::from).collect(),
            None => recipe.source_paths(),
        };

        let target_id = targets.len();
        mapping.insert(target_name.to_string(), target_id);
        targets.push(domain::Target {
            id: target_id,
            name: target_name.to_string(),
            project_dir: project_dir.to_path_buf(),
            dependencies,
            input_paths,
            output_path: output.into(),
            recipe,
        });

        Ok(target_id)
    }

    for target_name in default.iter().chain(remaining_names.iter()) {
        add_target(
            &mut targets,
            &mut mapping,
            project_dir,
            &mut parsed_targets,
            target_name,
        )?;
    }

    let default_targets = default.iter().map(|name| mapping[name]).collect();

    Ok(BuildGraph::new(targets, default_targets))
}
