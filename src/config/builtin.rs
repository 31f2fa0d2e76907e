use super::{Project, SquashfsRecipe, TarGzRecipe, Target, ZipRecipe};

/// The recipe used when a project has no `bale.yml`.
pub fn project() -> Project {
    let targets = vec![
        (
            "example_fastapi_2.zip",
            Target {
                output: "example_fastapi_2.zip".to_string(),
                zip: Some(ZipRecipe {
                    source: "example_fastapi_2".to_string(),
                }),
                ..Default::default()
            },
        ),
        (
            "data.tgz",
            Target {
                output: "data.tgz".to_string(),
                tar_gz: Some(TarGzRecipe {
                    source: "data".to_string(),
                    verbose: true,
                }),
                ..Default::default()
            },
        ),
        (
            "example_pip.squashfs",
            Target {
                output: "requirements.squashfs".to_string(),
                squashfs: Some(SquashfsRecipe {
                    requirements: "example_pip/requirements.txt".to_string(),
                    staging_dir: "/opt/requirements".to_string(),
                    wipe: vec!["/opt/python".to_string()],
                }),
                ..Default::default()
            },
        ),
    ];

    Project {
        default: vec!["example_fastapi_2.zip".to_string(), "data.tgz".to_string()],
        targets: targets
            .into_iter()
            .map(|(name, target)| (name.to_string(), target))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::project;
    use crate::config::validation::validate_project;
    use std::path::Path;

    #[test]
    fn test_builtin_project_is_valid() {
        validate_project(Path::new("/project"), &project())
            .expect("The built-in recipe should be valid");
    }
}
