//! TTY Typeset
//!
//! Wraps text to the width of the current terminal, measuring each character
//! the way that terminal renders it. Reads from a file or stdin.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use tty_typesetter::app::Config;
use tty_typesetter::terminal_size;
use tty_typesetter::{Catalog, Environment, Typesetter};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = Config::load_or_default();
    let mut columns: Option<usize> = None;
    let mut input_file: Option<String> = None;
    let mut mode = Mode::Typeset;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--columns" => {
                i += 1;
                match args.get(i).and_then(|value| value.parse().ok()) {
                    Some(value) => columns = Some(value),
                    None => {
                        eprintln!("--columns needs a number");
                        return ExitCode::FAILURE;
                    },
                }
            },
            "--tab-size" => {
                i += 1;
                match args.get(i).and_then(|value| value.parse().ok()) {
                    Some(0) => config.typeset.tab_size = None,
                    Some(value) => config.typeset.tab_size = Some(value),
                    None => {
                        eprintln!("--tab-size needs a number");
                        return ExitCode::FAILURE;
                    },
                }
            },
            "--profile" => {
                i += 1;
                match args.get(i) {
                    Some(name) => config.profile = Some(name.clone()),
                    None => {
                        eprintln!("--profile needs a name");
                        return ExitCode::FAILURE;
                    },
                }
            },
            "--no-nice-wrap" => config.typeset.nice_wrap = false,
            "--measure" => mode = Mode::Measure,
            "--list-profiles" => mode = Mode::ListProfiles,
            "-h" | "--help" => mode = Mode::Help,
            arg => {
                if input_file.is_none() && !arg.starts_with('-') {
                    input_file = Some(arg.to_string());
                } else {
                    eprintln!("Unknown argument '{}'", arg);
                    return ExitCode::FAILURE;
                }
            },
        }
        i += 1;
    }

    if mode == Mode::Help {
        print_help();
        return ExitCode::SUCCESS;
    }

    let catalog = Catalog::builtin();
    let env = Environment::capture();

    if mode == Mode::ListProfiles {
        let selected = catalog.registry().select(&env).name();
        for profile in catalog.registry().iter() {
            let marker = if profile.name() == selected { "*" } else { " " };
            println!("{} {}", marker, profile.name());
        }
        return ExitCode::SUCCESS;
    }

    let typesetter = match &config.profile {
        Some(name) => Typesetter::with_profile(&catalog, name),
        None => Typesetter::new(&catalog, &env),
    };
    let typesetter = match typesetter {
        Ok(typesetter) => typesetter,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };
    tracing::debug!("using profile {}", typesetter.profile_name());

    let input = match &input_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut data = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        },
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match mode {
        Mode::Measure => {
            let options = config.typeset.state_options();
            input.lines().try_for_each(|line| {
                writeln!(out, "{}\t{}", typesetter.measure_str(line, &options), line)
            })
        },
        _ => {
            let mut options = config.typeset;
            if columns.is_some() {
                options.column_limit = columns;
            } else if options.column_limit.is_none() {
                options.column_limit = terminal_size::ambient_columns();
            }
            typesetter
                .typeset(&input, &options)
                .try_for_each(|fragment| out.write_all(fragment.as_bytes()))
        },
    };

    match result.and_then(|()| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            ExitCode::FAILURE
        },
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Typeset,
    Measure,
    ListProfiles,
    Help,
}

fn print_help() {
    println!("TTY Typeset");
    println!();
    println!("Usage: tty-typeset [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --columns <N>   Wrap at N columns (default: terminal width)");
    println!("      --tab-size <N>  Tab stop interval, 0 passes tabs through (default: 8)");
    println!("      --no-nice-wrap  Break exactly at the limit instead of at spaces");
    println!("      --profile <NAME> Measure for the named terminal profile");
    println!("      --measure       Print the width of each input line");
    println!("      --list-profiles List profiles, marking the detected one");
    println!("  -h, --help          Show this help message");
    println!();
    println!("If no input file is specified, reads from stdin.");
    println!("Defaults are read from ~/.config/tty-typesetter/config.json.");
    println!();
    println!("Examples:");
    println!("  fortune | tty-typeset -c 40");
    println!("  tty-typeset --profile vscode --measure notes.txt");
}
