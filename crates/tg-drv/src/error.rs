use std::path::PathBuf;

use thiserror::Error;

/// Failures that can stop a run before evaluation even gets a chance to
/// report its own diagnostics through the [`tg_util::Handler`] - reading
/// files and resolving `include`s both touch the filesystem, which
/// `tg-sem` deliberately has no access to (see `tg-sem::analyze`'s doc
/// comment).
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("include cycle detected: {0}")]
    IncludeCycle(PathBuf),
    #[error("no input files given and stdin is not piped")]
    NoInput,
}
