mod config_schema;
mod shell_completion;

use std::env;
use std::fs;
use std::process;

fn main() {
    // Completion scripts and the config schema land next to the other build artifacts.
    let outdir = match env::var_os("OUT_DIR") {
        Some(outdir) => outdir,
        None => {
            eprintln!("OUT_DIR environment variable not defined.");
            process::exit(1);
        }
    };
    fs::create_dir_all(&outdir).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/config/schema.rs");

    shell_completion::generate_shell_completion_scripts(&outdir);
    config_schema::generate_config_json_schema(&outdir);
}
