//! Diagnostic rendering.
//!
//! Every phase (`tg-lex`, `tg-par`, `tg-sem`, `tg-match`, `tg-eval`) has its
//! own `thiserror` error enum for the errors specific to that phase, but
//! they all funnel into this one [`Diagnostic`]/[`Handler`] pair for
//! reporting, so the CLI only needs one rendering path.
//!
//! The wire format is lifted from the original implementation's
//! `error_printing.h`: a one-line `file(line:col): message` header, the
//! offending source line (cropped to 50 characters on either side of the
//! span with `...` markers when truncated), and a caret-and-tilde
//! underline beneath it. A diagnostic may carry a secondary span - used
//! when a pattern-match failure should also point back at the pattern's
//! definition site - rendered as a second, shorter block introduced by
//! "See ... for context.".

mod level;

pub use level::Level;

use crate::span::{SourceMap, Span};

const CROP_CONTEXT: usize = 50;

/// A single reported error, warning, or note.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub secondary: Option<(Span, String)>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Error, message: message.into(), span, secondary: None }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Warning, message: message.into(), span, secondary: None }
    }

    pub fn note(message: impl Into<String>, span: Span) -> Self {
        Self { level: Level::Note, message: message.into(), span, secondary: None }
    }

    /// Attaches a secondary "see also" location, e.g. the definition site a
    /// failed match is being compared against.
    pub fn with_secondary(mut self, span: Span, message: impl Into<String>) -> Self {
        self.secondary = Some((span, message.into()));
        self
    }

    /// Renders this diagnostic against `source_map` in the `file(line:col):
    /// message` format, including cropped source context.
    pub fn render(&self, source_map: &SourceMap) -> String {
        let mut out = String::new();
        render_block(&mut out, source_map, self.span, self.level.as_str(), &self.message);
        if let Some((span, msg)) = &self.secondary {
            render_block(&mut out, source_map, *span, "note", &format!("see {msg} for context."));
        }
        out
    }
}

fn render_block(out: &mut String, source_map: &SourceMap, span: Span, kind: &str, message: &str) {
    let file = source_map.file(span.file);
    out.push_str(&format!("{}({}:{}): {}: {}\n", file.name, span.line, span.column, kind, message));

    let (line_start, line_end) = file.line_span(span.start);
    let line = &file.contents[line_start as usize..line_end as usize];

    let col = span.column.saturating_sub(1) as usize;
    let crop_start = col.saturating_sub(CROP_CONTEXT);
    let crop_end = (col + CROP_CONTEXT).min(line.len());
    let prefix_cropped = crop_start > 0;
    let suffix_cropped = crop_end < line.len();

    let cropped = &line[crop_start..crop_end];
    out.push(' ');
    if prefix_cropped {
        out.push_str("...");
    }
    out.push_str(cropped);
    if suffix_cropped {
        out.push_str("...");
    }
    out.push('\n');

    let caret_col = col - crop_start + if prefix_cropped { 3 } else { 0 } + 1;
    let underline_len = (span.len() as usize).max(1);
    out.push(' ');
    out.push_str(&" ".repeat(caret_col - 1));
    out.push('^');
    if underline_len > 1 {
        out.push_str(&"~".repeat(underline_len - 1));
    }
    out.push('\n');
}

/// Accumulates diagnostics for one run and decides the process exit code.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == Level::Error {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Renders every accumulated diagnostic, in emission order.
    pub fn render_all(&self, source_map: &SourceMap) -> String {
        self.diagnostics.iter().map(|d| d.render(source_map)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> SourceMap {
        let mut sm = SourceMap::new();
        sm.add_file("t.tg", "let x = 1 + ;\n");
        sm
    }

    #[test]
    fn render_includes_location_and_caret() {
        let sm = sample_map();
        let file = sm.file(sm.find_by_name("t.tg").unwrap());
        let (line, column) = file.line_col(12);
        let span = Span::new(12, 13, line, column, sm.find_by_name("t.tg").unwrap());
        let diag = Diagnostic::error("expected expression", span);
        let rendered = diag.render(&sm);
        assert!(rendered.contains("t.tg(1:13): error: expected expression"));
        assert!(rendered.contains("let x = 1 + ;"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn handler_counts_errors_only() {
        let mut h = Handler::new();
        h.emit(Diagnostic::warning("unused include", Span::DUMMY));
        assert!(!h.has_errors());
        h.emit(Diagnostic::error("parse failure", Span::DUMMY));
        assert!(h.has_errors());
        assert_eq!(h.error_count(), 1);
    }
}
