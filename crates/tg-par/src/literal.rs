//! Literal-block parsing: the raw-character scanner for `{ ... }` bodies
//! (the bodies of `if`/`for`/`generator`). Grounded on
//! `original_source/src/parsing.h`'s `parse_literal_block` /
//! `add_literal_statement` / `determine_whether_to_skip_next_newline`.
//!
//! Unlike `stmt.rs`/`expr.rs`, this module drives [`tg_lex::Lexer`]'s raw
//! character-access methods directly instead of its token stream - `tg`
//! source is literal text by default, with `$` switching into code for
//! one statement (or a `${ ... }` block of several). The switch back to
//! token-based parsing for `${...}`/`$stmt` content is safe exactly when
//! the parser's lookahead buffer is empty, which holds here because
//! nothing calls `peek`/`peek_n` while scanning raw text.
//!
//! Simplification from the original (recorded in DESIGN.md): indentation
//! is measured per segment as an absolute count rather than split into
//! "ambient portion stripped, excess preserved as literal spaces" - the
//! ambient baseline is not threaded through nested block parses.

use tg_lex::Token;
use tg_util::Span;

use crate::ast::{Block, Item, Segment, SegmentWhitespace, Stmt};
use crate::Parser;

enum RunEnd {
    Dollar,
    OpenBrace,
    CloseBrace,
    Newline,
    Eof,
}

impl<'a> Parser<'a> {
    /// Parses a `{ ... }` literal block, starting at the opening `{`.
    pub(crate) fn parse_block(&mut self) -> Block {
        let brace_span = self.expect(&Token::LBrace, "'{'");

        let mut nesting_level: i32 = 1;
        let mut whitespace = self.measure_and_skip_whitespace_raw();
        if whitespace.preceding_newlines > 0 {
            whitespace.preceding_newlines -= 1;
        }

        let mut segments = Vec::new();
        let mut current_ws = whitespace;
        let mut current_items: Vec<Item> = Vec::new();
        let mut current_text = String::new();
        let mut segment_start = self.lexer_position_span();

        loop {
            let run_start = self.lexer_position_span();
            let (chunk, end) = self.scan_literal_run();
            current_text.push_str(&chunk);

            match end {
                RunEnd::OpenBrace => {
                    current_text.push('{');
                    self.advance_raw();
                    nesting_level += 1;
                }
                RunEnd::CloseBrace => {
                    nesting_level -= 1;
                    self.advance_raw();
                    if nesting_level > 0 {
                        current_text.push('}');
                    } else {
                        self.flush_literal(&mut current_items, &current_text, run_start);
                        current_text.clear();
                        let span = segment_start.to(run_start);
                        segments.push(Segment { whitespace: current_ws, items: current_items, span });
                        break;
                    }
                }
                RunEnd::Newline => {
                    let trimmed = current_text.trim_end_matches([' ', '\t']).to_string();
                    self.flush_literal(&mut current_items, &trimmed, run_start);
                    current_text.clear();
                    let span = segment_start.to(run_start);
                    segments.push(Segment {
                        whitespace: current_ws,
                        items: std::mem::take(&mut current_items),
                        span,
                    });

                    let mut next_ws = self.measure_and_skip_whitespace_raw();
                    next_ws.preceding_newlines =
                        next_ws.preceding_newlines.saturating_sub(self.skip_next_newlines);
                    self.skip_next_newlines = 0;
                    current_ws = next_ws;
                    segment_start = self.lexer_position_span();
                }
                RunEnd::Dollar => {
                    self.flush_literal(&mut current_items, &current_text, run_start);
                    current_text.clear();
                    self.advance_raw(); // consume '$'
                    if self.peek_raw_char() == '{' {
                        self.advance_raw(); // consume '{'
                        let inner = self.parse_item_sequence(false);
                        current_items.extend(inner);
                        self.expect(&Token::RBrace, "'}'");
                    } else {
                        // A standalone `$stmt` (no braces) always parses
                        // with `first = false`, same as `parsing.h`'s
                        // public `parse_single_statement` wrapper always
                        // passing `first = false` to the `_impl` - a bare
                        // `$,` has no enclosing `${...}` to be the sole
                        // statement of, so it's never recognized as a
                        // comma statement here.
                        current_items.push(self.parse_single_item(false));
                    }
                }
                RunEnd::Eof => {
                    self.error("end of file reached before encountering '}'".to_string(), brace_span);
                    let span = segment_start.to(run_start);
                    segments.push(Segment { whitespace: current_ws, items: current_items, span });
                    break;
                }
            }
        }

        let end_span = self.lexer_position_span();
        self.maybe_skip_next_newline(segments.len());
        Block { segments, span: brace_span.to(end_span) }
    }

    fn flush_literal(&mut self, items: &mut Vec<Item>, text: &str, span: Span) {
        if text.is_empty() {
            return;
        }
        let sym = self.intern(text);
        items.push(Item::Stmt(Stmt::Literal { text: sym, span }));
    }

    /// Scans raw text up to (but not including) the next unescaped `$`,
    /// `{`, `}`, or `\n`. `\r` is dropped; `$$` collapses to a single
    /// literal `$` without ending the run.
    fn scan_literal_run(&mut self) -> (String, RunEnd) {
        let mut text = String::new();
        loop {
            if self.is_at_end() {
                return (text, RunEnd::Eof);
            }
            match self.peek_raw_char() {
                '\r' => self.advance_raw(),
                '\n' => return (text, RunEnd::Newline),
                '{' => return (text, RunEnd::OpenBrace),
                '}' => return (text, RunEnd::CloseBrace),
                '$' => {
                    if self.peek_raw_n(1) == '$' {
                        text.push('$');
                        self.advance_raw();
                        self.advance_raw();
                    } else {
                        return (text, RunEnd::Dollar);
                    }
                }
                c => {
                    text.push(c);
                    self.advance_raw();
                }
            }
        }
    }

    /// `(preceding_newlines, indentation_units, trailing_spaces)` measured
    /// directly off the raw character stream, the same algorithm
    /// `tg_lex::Lexer` uses between tokens (see SPEC_FULL.md §4.2),
    /// applied here because literal-block whitespace must be measured
    /// mid-scan rather than between two already-lexed tokens.
    fn measure_and_skip_whitespace_raw(&mut self) -> SegmentWhitespace {
        let mut preceding_newlines = 0u32;
        let mut indentation = 0u32;
        let mut spaces = 0u32;
        loop {
            match self.peek_raw_char() {
                '\n' => {
                    preceding_newlines += 1;
                    indentation = 0;
                    spaces = 0;
                    self.advance_raw();
                }
                '\r' => self.advance_raw(),
                '\t' => {
                    indentation += 1;
                    spaces = 0;
                    self.advance_raw();
                }
                ' ' => {
                    let mut run = 0u32;
                    while run < 4 && self.peek_raw_n(run as usize) == ' ' {
                        run += 1;
                    }
                    if run == 4 {
                        indentation += 1;
                        for _ in 0..4 {
                            self.advance_raw();
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        while self.peek_raw_char() == ' ' {
            spaces += 1;
            self.advance_raw();
        }
        SegmentWhitespace { preceding_newlines, indentation, spaces }
    }

    /// Consumes the one trailing newline after a block whose content
    /// spanned more than one line, so a `}` alone on a line doesn't
    /// produce a blank line in the output (spec §4.3).
    fn maybe_skip_next_newline(&mut self, segment_count: usize) {
        if segment_count <= 1 {
            return;
        }
        let mut offset = 0usize;
        loop {
            match self.peek_raw_n(offset) {
                ' ' | '\t' | '\r' => offset += 1,
                '\n' => {
                    self.skip_next_newlines += 1;
                    return;
                }
                _ => return,
            }
        }
    }
}
