use calc::{repl, runner};
use clap::{Arg, ArgAction, Command};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Command::new("calc")
        .about("An interactive expression calculator with named variables and constants")
        .arg(
            Arg::new("file")
                .help("A file of statements to evaluate")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("expr")
                .short('e')
                .long("expr")
                .help("Evaluate the given statements and exit")
                .value_name("TEXT")
                .conflicts_with("file"),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Do not print the welcome banner")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug information to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let failures = if let Some(text) = matches.get_one::<String>("expr") {
        Some(runner::run(text, Some("<expr>")))
    } else {
        matches.get_one::<String>("file").map(|file_path| run_file(file_path))
    };

    if matches.get_flag("interactive") || failures.is_none() {
        repl::start(!matches.get_flag("quiet"));
    } else if failures.is_some_and(|count| count > 0) {
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs a script file and returns how many of its statements failed.
fn run_file(path: &str) -> usize {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            runner::run(&source, Some(&filename))
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
