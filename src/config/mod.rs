mod builtin;
mod conversion;
mod schema;
mod validation;

use crate::domain::BuildGraph;
use anyhow::{Context, Error, Result};
pub use schema::{Project, SquashfsRecipe, TarGzRecipe, Target, ZipRecipe};
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use validation::validate_project;

/// Name of the build description file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "bale.yml";

#[derive(Debug)]
pub struct Config {
    pub project_dir: PathBuf,
    pub project: Project,
}

impl Config {
    /// Loads `bale.yml` from `project_dir`, or the built-in recipe when the file is absent.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let project_dir = project_dir.canonicalize().map_err(|e| {
            let context = if e.kind() == ErrorKind::NotFound {
                format!("Directory {} does not exist", project_dir.display())
            } else {
                format!("Invalid directory: {}", project_dir.display())
            };
            Error::new(e).context(context)
        })?;

        let config_file_path = project_dir.join(CONFIG_FILE_NAME);
        let project = match File::open(&config_file_path) {
            Ok(config_file) => serde_yaml::from_reader(config_file)
                .with_context(|| format!("Invalid format for {}", config_file_path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "{} not found, using the built-in recipe",
                    config_file_path.display()
                );
                builtin::project()
            }
            Err(e) => {
                return Err(Error::new(e).context(format!(
                    "Failed to open config file {}",
                    config_file_path.display()
                )))
            }
        };

        validate_project(&project_dir, &project).with_context(|| {
            format!(
                "Invalid configuration found in project {}",
                project_dir.display()
            )
        })?;

        Ok(Self {
            project_dir,
            project,
        })
    }

    pub fn into_build_graph(self) -> Result<BuildGraph> {
        conversion::into_build_graph(&self.project_dir, self.project)
    }
}
