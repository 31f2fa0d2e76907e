use clap::{crate_version, Arg, ArgAction, Command};

pub mod arg {
    pub static PROJECT_DIR: &str = "project_dir";
    pub static VERBOSITY: &str = "verbosity";
    pub static CLEAN: &str = "clean";
    pub static LIST: &str = "list";
    pub static TARGETS: &str = "targets";
}

pub fn get_app() -> Command {
    Command::new("bale")
        .version(crate_version!())
        .about("Incremental archive packager")
        .arg(
            Arg::new(arg::PROJECT_DIR)
                .short('p')
                .long("project")
                .value_name("PROJECT_DIR")
                .default_value(".")
                .hide_default_value(true)
                .help("Directory of the project to package (in which 'bale.yml' is located)"),
        )
        .arg(
            Arg::new(arg::VERBOSITY)
                .short('v')
                .action(ArgAction::Count)
                .help("Increases message verbosity"),
        )
        .arg(
            Arg::new(arg::CLEAN)
                .long("clean")
                .action(ArgAction::SetTrue)
                .help("Start by removing the outputs of the requested targets"),
        )
        .arg(
            Arg::new(arg::LIST)
                .long("list")
                .action(ArgAction::SetTrue)
                .help("List the targets of the project and exit"),
        )
        .arg(
            Arg::new(arg::TARGETS)
                .value_name("TARGETS")
                .num_args(0..)
                .help("Targets to build ('all' when omitted, 'clean' removes the default outputs)"),
        )
}
