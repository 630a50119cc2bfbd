//! Reads and parses source files, flattening `include` directives in so
//! `tg-sem` never has to touch the filesystem (see `tg_sem::analyze`'s
//! doc comment). Grounded on `faxc-drv::Session::read_sources`, adapted
//! for `tg`'s single-pass-per-file parser rather than a separate
//! lex/parse step.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tg_par::ast;
use tg_par::Parser;
use tg_util::{Arena, FileId, Handler, SourceMap};

use crate::error::DriverError;

/// Parses `path` and recursively flattens every `include` it reaches,
/// in depth-first order, guarding against cycles.
pub fn parse_file(
    path: &Path,
    arena: &mut Arena,
    handler: &mut Handler,
    source_map: &mut SourceMap,
    seen: &mut HashSet<PathBuf>,
) -> Result<Vec<ast::Item>, DriverError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !seen.insert(canonical) {
        return Err(DriverError::IncludeCycle(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| DriverError::Io(path.to_path_buf(), e))?;
    let items = parse_source(&contents, &path.display().to_string(), arena, handler, source_map)?;

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    resolve_includes(items, &base_dir, arena, handler, source_map, seen)
}

/// Parses already-in-memory source text (stdin) under the given display
/// name, with no base directory to resolve its own `include`s against
/// other than the current directory.
pub fn parse_stdin(contents: &str, arena: &mut Arena, handler: &mut Handler, source_map: &mut SourceMap) -> Result<Vec<ast::Item>, DriverError> {
    let items = parse_source(contents, "<stdin>", arena, handler, source_map)?;
    let mut seen = HashSet::new();
    resolve_includes(items, Path::new("."), arena, handler, source_map, &mut seen)
}

fn parse_source(
    contents: &str,
    name: &str,
    arena: &mut Arena,
    handler: &mut Handler,
    source_map: &mut SourceMap,
) -> Result<Vec<ast::Item>, DriverError> {
    let file_id: FileId = source_map.add_file(name, contents);
    let text = source_map.file(file_id).contents.clone();
    let mut parser = Parser::new(&text, file_id, arena, handler);
    Ok(parser.parse_program().items)
}

fn resolve_includes(
    items: Vec<ast::Item>,
    base_dir: &Path,
    arena: &mut Arena,
    handler: &mut Handler,
    source_map: &mut SourceMap,
    seen: &mut HashSet<PathBuf>,
) -> Result<Vec<ast::Item>, DriverError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            ast::Item::Include(inc) => {
                let rel = arena.resolve(inc.path).to_string();
                let full = base_dir.join(rel);
                let nested = parse_file(&full, arena, handler, source_map, seen)?;
                out.extend(nested);
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Non-recursively scans `dir` for `*.tg` files, in directory-listing
/// order, and parses each (spec §6's `-I`).
pub fn scan_include_dir(
    dir: &Path,
    arena: &mut Arena,
    handler: &mut Handler,
    source_map: &mut SourceMap,
    seen: &mut HashSet<PathBuf>,
) -> Result<Vec<ast::Item>, DriverError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| DriverError::Io(dir.to_path_buf(), e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("tg"))
        .collect();
    paths.sort();

    let mut out = Vec::new();
    for path in paths {
        out.extend(parse_file(&path, arena, handler, source_map, seen)?);
    }
    Ok(out)
}
