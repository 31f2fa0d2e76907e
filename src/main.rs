mod clean;
mod cli;
mod config;
mod domain;
mod engine;
mod error;

use anyhow::Result;
use cli::{arg, get_app};
use config::Config;
use domain::ALL_TARGET;
use engine::Engine;
use error::BuildError;
use std::path::Path;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(exit_code(&e));
    }
}

fn run() -> Result<()> {
    let arg_matches = get_app().get_matches();

    init_logger(arg_matches.get_count(arg::VERBOSITY));

    let project_dir = arg_matches
        .get_one::<String>(arg::PROJECT_DIR)
        .map(String::as_str)
        .unwrap_or(".");
    let graph = Config::load(Path::new(project_dir))?.into_build_graph()?;

    if arg_matches.get_flag(arg::LIST) {
        for target_name in graph.target_names() {
            println!("{}", target_name);
        }
        return Ok(());
    }

    let requested_targets: Vec<String> = match arg_matches.get_many::<String>(arg::TARGETS) {
        Some(targets) => targets.cloned().collect(),
        None => vec![ALL_TARGET.to_string()],
    };

    let mut engine = Engine::new(graph);

    if arg_matches.get_flag(arg::CLEAN) {
        engine.clean_requested(&requested_targets)?;
    }

    engine.run(&requested_targets)
}

fn init_logger(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// The exit code of the failing tool when there is one, 1 otherwise.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<BuildError>())
        .map(BuildError::exit_code)
        .unwrap_or(1)
}
