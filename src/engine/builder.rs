use crate::domain::Target;
use crate::error::BuildError;
use super::recipe::{self, Step};
use anyhow::{Context, Error, Result};
use std::io::ErrorKind;
use std::process::ExitStatus;
use std::time::Instant;

/// Exit code reported when the tool of a step cannot be found, as a shell would.
const COMMAND_NOT_FOUND_EXIT_CODE: i32 = 127;

pub fn build_target(target: &Target) -> Result<()> {
    let target_start = Instant::now();
    log::info!("{} - Building", target);

    for step in recipe::steps(target) {
        log::debug!("{} - Running {}", target, step);
        run_step(target, &step)?;
    }

    log::info!(
        "{} - Built (took: {}ms)",
        target,
        target_start.elapsed().as_millis()
    );

    Ok(())
}

fn run_step(target: &Target, step: &Step) -> Result<()> {
    match step {
        Step::RemoveDir(path) => match std::fs::remove_dir_all(path) {
            Ok(_) => {
                log::debug!("{} - Removed {}", target, path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::new(e)
                .context(format!("{} - Failed to remove {}", target, path.display()))),
        },
        Step::RemoveFile(path) => match std::fs::remove_file(path) {
            Ok(_) => {
                log::debug!("{} - Removed stale {}", target, path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::new(e)
                .context(format!("{} - Failed to remove {}", target, path.display()))),
        },
        Step::Command { program, args } => {
            let output = match duct::cmd(program, args)
                .dir(&target.project_dir)
                .unchecked()
                .run()
            {
                Ok(output) => output,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::error!(
                        "{} - Command not found: {}",
                        target,
                        program.to_string_lossy()
                    );
                    return Err(BuildError::CommandFailed {
                        target: target.name.clone(),
                        code: COMMAND_NOT_FOUND_EXIT_CODE,
                    }
                    .into());
                }
                Err(e) => {
                    return Err(Error::new(e)
                        .context(format!("{} - Failed to run {}", target, step)))
                }
            };

            if output.status.success() {
                Ok(())
            } else {
                Err(BuildError::CommandFailed {
                    target: target.name.clone(),
                    code: exit_code(output.status),
                })
                .with_context(|| format!("{} - {} failed", target, step))
            }
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::build_target;
    use crate::domain::tests::build_script_target;
    use crate::domain::{Recipe, Target};
    use crate::error::BuildError;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_build_target_runs_script_in_project_dir() {
        let project_dir = tempfile::tempdir().unwrap();
        let target = build_script_target(0, "out.txt", project_dir.path(), "echo built > out.txt");

        build_target(&target).expect("Script should succeed");

        assert_eq!(
            fs::read_to_string(project_dir.path().join("out.txt")).unwrap(),
            "built\n"
        );
    }

    #[test]
    fn test_build_target_reports_exit_code() {
        let project_dir = tempfile::tempdir().unwrap();
        let target = build_script_target(0, "out.txt", project_dir.path(), "exit 3");

        let error = build_target(&target).expect_err("Failing script should fail the build");

        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::CommandFailed { target, code: 3 }) if target == "out.txt"
        ));
    }

    #[test]
    fn test_build_target_stops_at_first_failing_step() {
        let project_dir = tempfile::tempdir().unwrap();
        let target = build_script_target(
            0,
            "out.txt",
            project_dir.path(),
            "false\necho built > out.txt",
        );

        build_target(&target).expect_err("Script should stop at the first error");

        assert!(!project_dir.path().join("out.txt").exists());
    }

    #[test]
    fn test_squashfs_wipe_removes_directory_even_when_install_fails() {
        let project_dir = tempfile::tempdir().unwrap();
        let wiped = project_dir.path().join("python");
        fs::create_dir_all(wiped.join("lib")).unwrap();
        fs::write(wiped.join("lib/module.py"), "").unwrap();

        let target = Target {
            output_path: PathBuf::from("requirements.squashfs"),
            recipe: Recipe::Squashfs {
                requirements: PathBuf::from("missing/requirements.txt"),
                staging_dir: PathBuf::from("staging"),
                wipe: vec![PathBuf::from("python")],
            },
            ..build_script_target(0, "example_pip.squashfs", project_dir.path(), "")
        };

        build_target(&target).expect_err("Installing missing requirements should fail");

        assert!(!wiped.exists());
    }
}
