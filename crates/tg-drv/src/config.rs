//! Driver configuration and session state, named and shaped after
//! `faxc-drv::{Config, Session}` - narrowed to the much smaller surface
//! spec.md §6 actually asks for (no optimization levels, no emit-kind
//! selection, no cross-compilation target).

use std::collections::HashSet;
use std::io::Read;
use std::path::PathBuf;

use tg_util::{Arena, Handler, SourceMap};

use crate::error::DriverError;
use crate::includes;

/// Everything a run needs, built once from parsed CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub input_files: Vec<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    pub verbose: bool,
    /// Trailing arguments after the CLI's `--` separator, exposed to the
    /// running program as `argv[1..]` (spec §6).
    pub program_args: Vec<String>,
}

/// One run's state: the arena and diagnostic handler every phase shares,
/// plus the source map diagnostics render against.
pub struct Session {
    pub config: Config,
    pub arena: Arena,
    pub handler: Handler,
    pub source_map: SourceMap,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, arena: Arena::new(), handler: Handler::new(), source_map: SourceMap::new() }
    }

    pub fn has_errors(&self) -> bool {
        self.handler.has_errors()
    }

    pub fn render_diagnostics(&self) -> String {
        self.handler.render_all(&self.source_map)
    }

    /// Runs the whole pipeline - read/parse/flatten-includes, resolve,
    /// match, evaluate - and returns the text the program produced.
    /// Errors reported along the way land in `self.handler`; the caller
    /// decides the exit code from [`Session::has_errors`].
    pub fn run(&mut self) -> Result<String, DriverError> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();

        for dir in self.config.include_dirs.clone() {
            items.extend(includes::scan_include_dir(&dir, &mut self.arena, &mut self.handler, &mut self.source_map, &mut seen)?);
        }

        let argv0 = if self.config.input_files.is_empty() {
            let mut stdin_text = String::new();
            std::io::stdin().read_to_string(&mut stdin_text).map_err(|e| DriverError::Io(PathBuf::from("<stdin>"), e))?;
            items.extend(includes::parse_stdin(&stdin_text, &mut self.arena, &mut self.handler, &mut self.source_map)?);
            "piped".to_string()
        } else {
            for path in self.config.input_files.clone() {
                items.extend(includes::parse_file(&path, &mut self.arena, &mut self.handler, &mut self.source_map, &mut seen)?);
            }
            self.config.input_files[0].display().to_string()
        };

        if self.handler.has_errors() {
            return Ok(String::new());
        }

        let ast_program = tg_par::ast::Program { items };
        let analysis = tg_sem::analyze(ast_program, &mut self.arena, &mut self.handler);

        if self.handler.has_errors() {
            return Ok(String::new());
        }

        let mut argv = vec![argv0];
        argv.extend(self.config.program_args.clone());

        let output = tg_eval::run(&analysis.program, &analysis.defs, &self.arena, &mut self.handler, argv);
        Ok(output)
    }
}
