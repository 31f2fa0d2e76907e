use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{target} - Command failed with exit code {code}")]
    CommandFailed { target: String, code: i32 },

    #[error("Target {name} not found")]
    MissingTarget { name: String },

    #[error("Cannot remove {}: file not found", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Circular dependency: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    #[error("Targets {first} and {second} share the output path {}", path.display())]
    DuplicateOutput {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("{name} is not a valid target name")]
    InvalidTargetName { name: String },
}

impl BuildError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::CommandFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}
