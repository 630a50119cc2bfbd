//! tg-drv - the command-line driver (spec §4.9/§6): reads source files
//! (or stdin), flattens `include`s, then runs the lexer → parser →
//! resolver → evaluator pipeline and reports diagnostics through one
//! shared [`tg_util::Handler`].

pub mod config;
pub mod error;
mod includes;

pub use config::{Config, Session};
pub use error::DriverError;
