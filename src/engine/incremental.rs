use crate::domain::Target;
use anyhow::{Context, Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

#[derive(Debug, PartialEq)]
pub enum IncrementalRunResult<T> {
    Skipped,
    Run(T),
}

/// Runs `function` unless the output of `target` is up to date.
pub fn run_incrementally<T, F>(target: &Target, function: F) -> Result<IncrementalRunResult<T>>
where
    F: FnOnce() -> T,
{
    if is_up_to_date(target)? {
        return Ok(IncrementalRunResult::Skipped);
    }

    Ok(IncrementalRunResult::Run(function()))
}

/// A target is up to date when its output exists and no input was modified after it.
pub fn is_up_to_date(target: &Target) -> Result<bool> {
    let output_path = target.resolved_output_path();
    let output_modified = match modified(&output_path)? {
        Some(output_modified) => output_modified,
        None => {
            log::debug!("{} - Output {} not found", target, output_path.display());
            return Ok(false);
        }
    };

    for input_path in target.resolved_input_paths() {
        match newest_modification(&input_path, &output_path)? {
            None => {
                log::debug!("{} - Input {} not found", target, input_path.display());
                return Ok(false);
            }
            Some(input_modified) if input_modified > output_modified => {
                log::debug!("{} - Input {} changed", target, input_path.display());
                return Ok(false);
            }
            Some(_) => {}
        }
    }

    Ok(true)
}

fn modified(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(metadata) => metadata
            .modified()
            .map(Some)
            .with_context(|| format!("Failed to read modification time of {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::new(e).context(format!("Failed to read {}", path.display()))),
    }
}

/// Latest modification time found under `path`, walked recursively.
///
/// `output_path` is left out: an artifact written inside its own input does not invalidate itself.
fn newest_modification(path: &Path, output_path: &Path) -> Result<Option<SystemTime>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut newest = None;
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_entry(|entry| entry.path() != output_path)
    {
        let entry = entry.with_context(|| format!("Failed to traverse {}", path.display()))?;
        let entry_modified = entry
            .metadata()
            .with_context(|| format!("Failed to read {}", entry.path().display()))?
            .modified()
            .with_context(|| {
                format!(
                    "Failed to read modification time of {}",
                    entry.path().display()
                )
            })?;

        newest = newest.max(Some(entry_modified));
    }

    Ok(newest)
}

#[cfg(test)]
mod tests {
    use super::{is_up_to_date, run_incrementally, IncrementalRunResult};
    use crate::domain::tests::build_script_target;
    use crate::domain::Target;
    use std::fs::{self, File};
    use std::path::{Path, PathBuf};
    use std::time::{Duration, SystemTime};

    fn set_modified(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    fn build_target(project_dir: &Path) -> Target {
        Target {
            input_paths: vec![PathBuf::from("src")],
            ..build_script_target(0, "out.zip", project_dir, "true")
        }
    }

    #[test]
    fn test_missing_output_is_not_up_to_date() {
        let project_dir = tempfile::tempdir().unwrap();
        fs::create_dir(project_dir.path().join("src")).unwrap();

        assert!(!is_up_to_date(&build_target(project_dir.path())).unwrap());
    }

    #[test]
    fn test_output_newer_than_inputs_is_up_to_date() {
        let project_dir = tempfile::tempdir().unwrap();
        let source = project_dir.path().join("src/nested");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("main.py"), "print('hello')").unwrap();
        fs::write(project_dir.path().join("out.zip"), "archive").unwrap();

        let past = SystemTime::now() - Duration::from_secs(60);
        set_modified(&source.join("main.py"), past);

        assert!(is_up_to_date(&build_target(project_dir.path())).unwrap());
    }

    #[test]
    fn test_nested_input_newer_than_output_is_not_up_to_date() {
        let project_dir = tempfile::tempdir().unwrap();
        let source = project_dir.path().join("src/nested");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("main.py"), "print('hello')").unwrap();
        fs::write(project_dir.path().join("out.zip"), "archive").unwrap();

        let future = SystemTime::now() + Duration::from_secs(60);
        set_modified(&source.join("main.py"), future);

        assert!(!is_up_to_date(&build_target(project_dir.path())).unwrap());
    }

    #[test]
    fn test_missing_input_is_not_up_to_date() {
        let project_dir = tempfile::tempdir().unwrap();
        fs::write(project_dir.path().join("out.zip"), "archive").unwrap();

        assert!(!is_up_to_date(&build_target(project_dir.path())).unwrap());
    }

    #[test]
    fn test_output_without_inputs_is_up_to_date() {
        let project_dir = tempfile::tempdir().unwrap();
        fs::write(project_dir.path().join("out.zip"), "archive").unwrap();
        let target = build_script_target(0, "out.zip", project_dir.path(), "true");

        assert!(is_up_to_date(&target).unwrap());
    }

    #[test]
    fn test_run_incrementally_skips_up_to_date_target() {
        let project_dir = tempfile::tempdir().unwrap();
        let target = build_script_target(0, "out.zip", project_dir.path(), "true");

        let result = run_incrementally(&target, || {
            fs::write(project_dir.path().join("out.zip"), "archive").unwrap()
        })
        .unwrap();
        assert_eq!(result, IncrementalRunResult::Run(()));

        let result = run_incrementally(&target, || panic!("Should not run")).unwrap();
        assert_eq!(result, IncrementalRunResult::<()>::Skipped);
    }
}
