include!("../src/cli.rs");

use clap_complete::{generate_to, shells};
use std::ffi::OsString;

pub fn generate_shell_completion_scripts(outdir: &OsString) {
    let mut app = get_app();
    generate_to(shells::Bash, &mut app, "bale", outdir).unwrap();
    generate_to(shells::Zsh, &mut app, "bale", outdir).unwrap();
    generate_to(shells::Fish, &mut app, "bale", outdir).unwrap();
    generate_to(shells::PowerShell, &mut app, "bale", outdir).unwrap();
}
