use crate::domain::Target;
use crate::error::BuildError;
use anyhow::{Context, Result};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CleanMode {
    /// A missing output is an error.
    Strict,
    /// A missing output is ignored.
    Tolerant,
}

/// Removes the output of every target, then reports the first failure.
pub fn clean_target_outputs<'a, I>(targets: I, mode: CleanMode) -> Result<()>
where
    I: IntoIterator<Item = &'a Target>,
{
    let mut first_error = None;
    for target in targets {
        if let Err(e) = clean_path(&target.resolved_output_path(), mode) {
            let e = e.context(format!("{} - Clean failed", target));
            if first_error.is_none() {
                first_error = Some(e);
            } else {
                log::error!("{:?}", e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn clean_path(path: &Path, mode: CleanMode) -> Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory {}", path.display()))?;
    } else if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove file {}", path.display()))?;
    } else if mode == CleanMode::Strict {
        return Err(BuildError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    } else {
        return Ok(());
    }

    log::info!("{} - Removed", path.display());
    Ok(())
}
