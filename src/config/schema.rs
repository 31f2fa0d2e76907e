use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// To package a project with bale, create a file named `bale.yml` in its root directory.
///
/// This struct describes the schema expected for this file.
///
/// __Example__
///
/// ```yaml
/// default: [example_fastapi_2.zip, data.tgz]
///
/// targets:
///   example_fastapi_2.zip:
///     output: example_fastapi_2.zip
///     zip:
///       source: example_fastapi_2
///
///   data.tgz:
///     output: data.tgz
///     tar_gz:
///       source: data
///       verbose: true
///
///   example_pip.squashfs:
///     output: requirements.squashfs
///     squashfs:
///       requirements: example_pip/requirements.txt
///       staging_dir: /opt/requirements
///       wipe: [/opt/python]
/// ```
///
/// In this example:
///
/// - `bale` builds both default archives.
/// - `bale example_pip.squashfs` builds the squashfs image.
/// - `bale clean` removes both default archives.
///
/// When no `bale.yml` exists, this exact recipe is used.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Targets built by `bale all`, or by `bale` with no argument, in this order.
    ///
    /// `bale clean` removes the outputs of these targets.
    #[serde(default)]
    pub default: Vec<String>,

    /// Targets of this project.
    ///
    /// The target name must start with an alphanumeric character or `_` and contain only
    /// alphanumeric characters, `-`, `_` or `.`. The names `all` and `clean` are reserved.
    #[serde(default)]
    pub targets: HashMap<String, Target>,
}

/// A unit of work producing a single output artifact.
///
/// Exactly one recipe (`zip`, `tar_gz`, `squashfs` or `build`) must be set.
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Target {
    /// Targets to build before this one.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Files and directories whose modification time is compared to the output.
    ///
    /// Directories are walked recursively.
    /// Defaults to the source paths of the recipe.
    #[serde(default)]
    pub input_paths: Option<Vec<String>>,

    /// Path of the artifact produced by this target.
    ///
    /// It must be unique across all targets.
    pub output: String,

    /// Zips a directory recursively: `zip -r <output> <source>`.
    #[serde(default)]
    pub zip: Option<ZipRecipe>,

    /// Creates a gzip-compressed tar archive: `tar -czf <output> <source>`.
    #[serde(default)]
    pub tar_gz: Option<TarGzRecipe>,

    /// Installs Python requirements into a staging directory and packs it with `mksquashfs`.
    #[serde(default)]
    pub squashfs: Option<SquashfsRecipe>,

    /// A shell script producing the output, run with `/bin/sh -ce`.
    #[serde(default)]
    pub build: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ZipRecipe {
    /// Directory to archive.
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TarGzRecipe {
    /// Directory to archive.
    pub source: String,

    /// Lists archived files as they are added.
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SquashfsRecipe {
    /// A pip requirements file.
    pub requirements: String,

    /// Directory the requirements are installed into, then packed.
    pub staging_dir: String,

    /// Directories removed before installing. Missing directories are ignored.
    #[serde(default)]
    pub wipe: Vec<String>,
}
