//! Thin binary entry point - all real logic lives in the library crate,
//! same split as `faxc-drv`'s `main.rs`/`lib.rs`.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use tg_drv::{Config, Session};

/// Runs a `tg` template and writes the text it produces.
#[derive(Parser, Debug)]
#[command(name = "tg", version, about = "Runs a tg template", long_about = None)]
struct Cli {
    /// Source files to run; stdin is read when none are given.
    files: Vec<PathBuf>,

    /// Write output to PATH instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Additional directory scanned non-recursively for `*.tg` files,
    /// parsed before evaluation (may be given more than once).
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Print diagnostic trace output.
    #[arg(short, long)]
    verbose: bool,

    /// Everything after `--` is exposed to the running program as `argv`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new().filter_level(level).init();

    let config = Config {
        input_files: cli.files,
        output_file: cli.output,
        include_dirs: cli.include,
        verbose: cli.verbose,
        program_args: cli.args,
    };

    let mut session = Session::new(config);

    let output = match session.run() {
        Ok(output) => output,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(-1);
        }
    };

    if session.has_errors() {
        eprint!("{}", session.render_diagnostics());
        std::process::exit(-1);
    }

    match &session.config.output_file {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &output) {
                eprintln!("error: {}: {e}", path.display());
                std::process::exit(-1);
            }
        }
        None => {
            let _ = std::io::stdout().write_all(output.as_bytes());
        }
    }
}
