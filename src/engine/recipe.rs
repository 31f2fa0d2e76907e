use crate::domain::{Recipe, Target};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// A single action performed while building a target.
#[derive(Debug, PartialEq)]
pub enum Step {
    /// Recursively removes a directory. A missing directory is not an error.
    RemoveDir(PathBuf),
    /// Removes a file. A missing file is not an error.
    RemoveFile(PathBuf),
    Command {
        program: OsString,
        args: Vec<OsString>,
    },
}

impl Step {
    fn command<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Step::Command {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::RemoveDir(path) => write!(fmt, "rm -rf {}", path.display()),
            Step::RemoveFile(path) => write!(fmt, "rm -f {}", path.display()),
            Step::Command { program, args } => {
                write!(fmt, "{}", program.to_string_lossy())?;
                for arg in args {
                    write!(fmt, " {}", arg.to_string_lossy())?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the steps producing the output of `target`.
///
/// Archive recipes start by removing the previous artifact: `zip` updates an
/// existing archive in place and `mksquashfs` appends to an existing image.
pub fn steps(target: &Target) -> Vec<Step> {
    match &target.recipe {
        Recipe::Script(script) => vec![script_step(script)],
        recipe => std::iter::once(Step::RemoveFile(target.resolved_output_path()))
            .chain(archive_steps(target, recipe))
            .collect(),
    }
}

fn archive_steps(target: &Target, recipe: &Recipe) -> Vec<Step> {
    let output = target.output_path.clone().into_os_string();

    match recipe {
        Recipe::Zip { source } => vec![Step::command(
            "zip",
            vec![OsString::from("-r"), output, source.into()],
        )],
        Recipe::TarGz { source, verbose } => {
            let flags = if *verbose { "-czvf" } else { "-czf" };
            vec![Step::command(
                "tar",
                vec![OsString::from(flags), output, source.into()],
            )]
        }
        Recipe::Squashfs {
            requirements,
            staging_dir,
            wipe,
        } => wipe
            .iter()
            .map(|dir| Step::RemoveDir(target.project_dir.join(dir)))
            .chain(vec![
                Step::command(
                    "pip3",
                    vec![
                        OsString::from("install"),
                        OsString::from("-t"),
                        staging_dir.into(),
                        OsString::from("-r"),
                        requirements.into(),
                    ],
                ),
                Step::command("mksquashfs", vec![OsString::from(staging_dir), output]),
            ])
            .collect(),
        Recipe::Script(script) => vec![script_step(script)],
    }
}

fn script_step(script: &str) -> Step {
    if cfg!(windows) {
        let comspec = std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string());
        Step::command(&comspec, vec!["/C", script])
    } else {
        Step::command("/bin/sh", vec!["-ce", script])
    }
}

#[cfg(test)]
mod tests {
    use super::{steps, Step};
    use crate::domain::tests::build_script_target;
    use crate::domain::{Recipe, Target};
    use std::path::{Path, PathBuf};

    fn build_target(name: &str, output: &str, recipe: Recipe) -> Target {
        Target {
            output_path: PathBuf::from(output),
            recipe,
            ..build_script_target(0, name, Path::new("/project"), "")
        }
    }

    fn rendered(target: &Target) -> Vec<String> {
        steps(target).iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_zip_steps() {
        let target = build_target(
            "example_fastapi_2.zip",
            "example_fastapi_2.zip",
            Recipe::Zip {
                source: PathBuf::from("example_fastapi_2"),
            },
        );

        assert_eq!(
            rendered(&target),
            vec![
                "rm -f /project/example_fastapi_2.zip",
                "zip -r example_fastapi_2.zip example_fastapi_2"
            ]
        );
    }

    #[test]
    fn test_tar_gz_steps() {
        let verbose = build_target(
            "data.tgz",
            "data.tgz",
            Recipe::TarGz {
                source: PathBuf::from("data"),
                verbose: true,
            },
        );
        assert_eq!(
            rendered(&verbose),
            vec!["rm -f /project/data.tgz", "tar -czvf data.tgz data"]
        );

        let quiet = build_target(
            "data.tgz",
            "data.tgz",
            Recipe::TarGz {
                source: PathBuf::from("data"),
                verbose: false,
            },
        );
        assert_eq!(
            rendered(&quiet),
            vec!["rm -f /project/data.tgz", "tar -czf data.tgz data"]
        );
    }

    #[test]
    fn test_squashfs_steps_wipe_before_installing() {
        let target = build_target(
            "example_pip.squashfs",
            "requirements.squashfs",
            Recipe::Squashfs {
                requirements: PathBuf::from("example_pip/requirements.txt"),
                staging_dir: PathBuf::from("/opt/requirements"),
                wipe: vec![PathBuf::from("/opt/python")],
            },
        );

        let steps = steps(&target);
        assert_eq!(
            steps[0],
            Step::RemoveFile(PathBuf::from("/project/requirements.squashfs"))
        );
        assert_eq!(steps[1], Step::RemoveDir(PathBuf::from("/opt/python")));
        assert_eq!(
            steps[2..].iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec![
                "pip3 install -t /opt/requirements -r example_pip/requirements.txt",
                "mksquashfs /opt/requirements requirements.squashfs",
            ]
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_script_steps() {
        let target = build_script_target(0, "out", Path::new("/project"), "echo hi > out");

        assert_eq!(rendered(&target), vec!["/bin/sh -ce echo hi > out"]);
    }
}
