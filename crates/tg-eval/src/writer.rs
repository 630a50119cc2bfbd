//! Output buffering with exact whitespace placement (spec §4.6), ported
//! from `invoke.cpp`'s `output_preceding`/`output_newlines`/
//! `output_indentation`/`output_spaces`: whitespace a segment or a
//! statement owes the output is accumulated as a "pending" count rather
//! than written immediately, and only actually emitted right before the
//! next non-empty write - so a segment that produces no output (an `if`
//! whose condition was false, a declaration) contributes no blank lines.

use tg_par::ast::SegmentWhitespace;

const INDENT_WIDTH: usize = 4;

#[derive(Debug, Default)]
pub struct Writer {
    buf: String,
    pending_newlines: u32,
    pending_indentation: u32,
    pending_spaces: u32,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_segment_whitespace(&mut self, ws: SegmentWhitespace) {
        self.pending_newlines += ws.preceding_newlines;
        self.pending_indentation += ws.indentation;
        // Unlike newlines/indentation, a segment's own leading spaces don't
        // stack with whatever's already pending from an enclosing segment
        // entered on the same line - the nearer one wins.
        self.pending_spaces = self.pending_spaces.max(ws.spaces);
    }

    pub fn add_pending_spaces(&mut self, n: u32) {
        self.pending_spaces += n;
    }

    /// Cancels `n` pending spaces - used around a nested generator call so
    /// the spaces a comma/format owes apply once, after the call's own
    /// output, rather than before it (`invoke.cpp`'s pending-spaces trick).
    pub fn take_pending_spaces(&mut self, n: u32) -> u32 {
        let taken = self.pending_spaces.min(n);
        self.pending_spaces -= taken;
        taken
    }

    fn flush(&mut self) {
        if self.pending_newlines > 0 {
            for _ in 0..self.pending_newlines {
                self.buf.push('\n');
            }
            self.pending_newlines = 0;
        }
        if self.pending_indentation > 0 {
            for _ in 0..self.pending_indentation {
                self.buf.push_str(&" ".repeat(INDENT_WIDTH));
            }
            self.pending_indentation = 0;
        }
        if self.pending_spaces > 0 {
            for _ in 0..self.pending_spaces {
                self.buf.push(' ');
            }
            self.pending_spaces = 0;
        }
    }

    pub fn write_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.flush();
        self.buf.push_str(s);
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
