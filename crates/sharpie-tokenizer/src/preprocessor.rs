//! Preprocessor directives and conditional compilation.
//!
//! Every directive line becomes a single `PREPROCESSOR_DIRECTIVE` trivia
//! piece. Lines excluded by a false condition become `DISABLED_TEXT`.

use rustc_hash::FxHashSet;
use sharpie_errors::{Diagnostic, ErrorCode};
use sharpie_syntax::TriviaPieceKind;
use text_size::{TextRange, TextSize};

use crate::Tokenizer;
use crate::cursor::{is_newline, is_whitespace};
use crate::literals::{is_identifier_continue, is_identifier_start};

#[derive(Debug, Clone, Copy)]
enum Frame {
    If { branch_taken: bool, seen_else: bool },
    Region,
}

#[derive(Debug, Default)]
pub(crate) struct Preprocessor {
    symbols: FxHashSet<Box<str>>,
    frames: Vec<Frame>,
}

impl Preprocessor {
    pub(crate) fn new<S: AsRef<str>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            symbols: symbols.into_iter().map(|symbol| symbol.as_ref().into()).collect(),
            frames: Vec::new(),
        }
    }

    fn top(&self) -> Option<Frame> {
        self.frames.last().copied()
    }

    fn replace_top(&mut self, frame: Frame) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }

    /// Reports every conditional or region left open at the end of the input.
    pub(crate) fn end_of_file(&mut self, range: TextRange, diagnostics: &mut Vec<Diagnostic>) {
        for frame in self.frames.drain(..).rev() {
            let code = match frame {
                Frame::If { .. } => ErrorCode::EndifDirectiveExpected,
                Frame::Region => ErrorCode::EndRegionDirectiveExpected,
            };
            diagnostics.push(Diagnostic::new(code, range));
        }
    }
}

impl Tokenizer<'_> {
    /// Scans a directive line starting at `#` and, when it opens an inactive
    /// branch, the disabled text after it.
    pub(crate) fn directive(&mut self) {
        let start = self.cursor.offset();
        let at_line_start = self.at_line_start;
        self.cursor.advance_line();
        self.push_trivia(TriviaPieceKind::PreprocessorDirective);
        self.at_line_start = false;

        if !at_line_start {
            self.error(ErrorCode::BadDirectivePlacement, TextRange::at(start, TextSize::new(1)));
        }
        let text = self.text;
        let line = &text[TextRange::new(start, self.cursor.offset())];
        if !self.process_directive(line, start) {
            return;
        }

        if !self.cursor.is_eof() {
            self.newline();
        }
        self.disabled_text();
        self.at_line_start = true;
    }

    /// Applies one directive and returns whether the text after it is
    /// disabled.
    fn process_directive(&mut self, line: &str, start: TextSize) -> bool {
        let mut line = DirectiveLine::new(line, start);
        line.eat_hash();
        let (name, name_range) = line.name();
        let directive_range = TextRange::new(start, name_range.end());

        match name {
            "define" | "undef" => {
                if self.seen_token {
                    self.error(ErrorCode::PPDefFollowsToken, directive_range);
                }
                match line.next() {
                    (PpToken::Ident(symbol), _) => {
                        if name == "define" {
                            self.preprocessor.symbols.insert(symbol.into());
                        } else {
                            self.preprocessor.symbols.remove(symbol);
                        }
                        line.expect_end();
                    }
                    (_, range) => line.error(ErrorCode::IdentifierExpected, range),
                }
            }
            "if" => {
                let value = line.condition(&self.preprocessor.symbols);
                self.preprocessor.frames.push(Frame::If { branch_taken: value, seen_else: false });
                self.diagnostics.append(&mut line.diagnostics);
                return !value;
            }
            "elif" => {
                let value = line.condition(&self.preprocessor.symbols);
                self.diagnostics.append(&mut line.diagnostics);
                let Some(Frame::If { branch_taken, seen_else }) = self.preprocessor.top() else {
                    self.error(ErrorCode::UnexpectedDirective, directive_range);
                    return false;
                };
                if seen_else {
                    self.error(ErrorCode::UnexpectedDirective, directive_range);
                }
                self.preprocessor.replace_top(Frame::If { branch_taken: branch_taken || value, seen_else });
                return branch_taken || !value;
            }
            "else" => {
                line.expect_end();
                self.diagnostics.append(&mut line.diagnostics);
                let Some(Frame::If { branch_taken, seen_else }) = self.preprocessor.top() else {
                    self.error(ErrorCode::UnexpectedDirective, directive_range);
                    return false;
                };
                if seen_else {
                    self.error(ErrorCode::UnexpectedDirective, directive_range);
                }
                self.preprocessor.replace_top(Frame::If { branch_taken: true, seen_else: true });
                return branch_taken;
            }
            "endif" => {
                line.expect_end();
                match self.preprocessor.top() {
                    Some(Frame::If { .. }) => {
                        self.preprocessor.frames.pop();
                    }
                    Some(Frame::Region) => {
                        self.error(ErrorCode::EndRegionDirectiveExpected, directive_range);
                    }
                    None => self.error(ErrorCode::UnexpectedDirective, directive_range),
                }
            }
            "region" => self.preprocessor.frames.push(Frame::Region),
            "endregion" => match self.preprocessor.top() {
                Some(Frame::Region) => {
                    self.preprocessor.frames.pop();
                }
                Some(Frame::If { .. }) => {
                    self.error(ErrorCode::EndifDirectiveExpected, directive_range);
                }
                None => self.error(ErrorCode::UnexpectedDirective, directive_range),
            },
            "error" | "warning" => {
                let code = if name == "error" {
                    ErrorCode::ErrorDirective
                } else {
                    ErrorCode::WarningDirective
                };
                let message = line.rest().trim();
                self.error_with(code, directive_range, message);
            }
            "line" | "pragma" | "nullable" => {}
            _ => self.error(ErrorCode::PPDirectiveExpected, directive_range),
        }
        self.diagnostics.append(&mut line.diagnostics);
        false
    }

    /// Consumes whole lines until the directive that ends the inactive branch.
    fn disabled_text(&mut self) {
        let mut depth = 0u32;
        while !self.cursor.is_eof() {
            let trimmed = self.cursor.rest().trim_start_matches(is_whitespace);
            if let Some(directive) = trimmed.strip_prefix('#') {
                match directive_name(directive) {
                    "if" => depth += 1,
                    "endif" if depth > 0 => depth -= 1,
                    "elif" | "else" | "endif" => break,
                    _ => {}
                }
            }
            self.cursor.advance_line();
            if !self.cursor.is_eof() && self.cursor.advance() == '\r' {
                self.cursor.eat('\n');
            }
        }
        self.push_trivia(TriviaPieceKind::DisabledText);
    }
}

fn directive_name(text: &str) -> &str {
    let text = text.trim_start_matches(is_whitespace);
    let end = text.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(text.len());
    &text[..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PpToken<'a> {
    Ident(&'a str),
    True,
    False,
    Bang,
    EqEq,
    BangEq,
    AmpAmp,
    PipePipe,
    LeftParen,
    RightParen,
    Unknown,
    End,
}

/// Cursor over the text of a single directive line.
struct DirectiveLine<'a> {
    text: &'a str,
    position: usize,
    base: TextSize,
    failed: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DirectiveLine<'a> {
    fn new(text: &'a str, base: TextSize) -> Self {
        Self { text, position: 0, base, failed: false, diagnostics: Vec::new() }
    }

    fn offset(&self, position: usize) -> TextSize {
        self.base + TextSize::new(position as u32)
    }

    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start_matches(is_whitespace).len();
    }

    fn eat_hash(&mut self) {
        if self.rest().starts_with('#') {
            self.position += 1;
        }
    }

    fn name(&mut self) -> (&'a str, TextRange) {
        self.skip_whitespace();
        let rest = self.rest();
        let name = directive_name(rest);
        let start = self.position;
        self.position += name.len();
        (name, TextRange::new(self.offset(start), self.offset(self.position)))
    }

    fn error(&mut self, code: ErrorCode, range: TextRange) {
        if !self.failed {
            self.failed = true;
            self.diagnostics.push(Diagnostic::new(code, range));
        }
    }

    fn peek(&self) -> (PpToken<'a>, TextRange) {
        let mut peek = DirectiveLine::new(self.text, self.base);
        peek.position = self.position;
        peek.next()
    }

    fn next(&mut self) -> (PpToken<'a>, TextRange) {
        self.skip_whitespace();
        let start = self.position;
        let rest = self.rest();
        let mut chars = rest.chars();
        let first = chars.next();
        let (token, len) = match first {
            None => (PpToken::End, 0),
            Some(c) if is_newline(c) => (PpToken::End, 0),
            Some('/') if rest.starts_with("//") => (PpToken::End, 0),
            Some('(') => (PpToken::LeftParen, 1),
            Some(')') => (PpToken::RightParen, 1),
            Some('!') if rest.starts_with("!=") => (PpToken::BangEq, 2),
            Some('!') => (PpToken::Bang, 1),
            Some('=') if rest.starts_with("==") => (PpToken::EqEq, 2),
            Some('&') if rest.starts_with("&&") => (PpToken::AmpAmp, 2),
            Some('|') if rest.starts_with("||") => (PpToken::PipePipe, 2),
            Some(c) if is_identifier_start(c) => {
                let len = rest.find(|c: char| !is_identifier_continue(c)).unwrap_or(rest.len());
                let token = match &rest[..len] {
                    "true" => PpToken::True,
                    "false" => PpToken::False,
                    ident => PpToken::Ident(ident),
                };
                (token, len)
            }
            Some(c) => {
                let len = rest.find(|c: char| is_whitespace(c)).unwrap_or(rest.len()).max(c.len_utf8());
                (PpToken::Unknown, len)
            }
        };
        self.position += len;
        (token, TextRange::new(self.offset(start), self.offset(self.position)))
    }

    fn expect_end(&mut self) {
        let (token, range) = self.next();
        if token != PpToken::End {
            self.error(ErrorCode::EndOfPPLineExpected, range);
        }
    }

    /// Evaluates the condition of `#if`/`#elif`; invalid expressions are
    /// false.
    fn condition(&mut self, symbols: &FxHashSet<Box<str>>) -> bool {
        let value = self.or_expr(symbols);
        if self.failed {
            return false;
        }
        self.expect_end();
        value
    }

    fn or_expr(&mut self, symbols: &FxHashSet<Box<str>>) -> bool {
        let mut value = self.and_expr(symbols);
        while self.peek().0 == PpToken::PipePipe {
            self.next();
            value |= self.and_expr(symbols);
        }
        value
    }

    fn and_expr(&mut self, symbols: &FxHashSet<Box<str>>) -> bool {
        let mut value = self.equality_expr(symbols);
        while self.peek().0 == PpToken::AmpAmp {
            self.next();
            value &= self.equality_expr(symbols);
        }
        value
    }

    fn equality_expr(&mut self, symbols: &FxHashSet<Box<str>>) -> bool {
        let mut value = self.unary_expr(symbols);
        loop {
            match self.peek().0 {
                PpToken::EqEq => {
                    self.next();
                    value = value == self.unary_expr(symbols);
                }
                PpToken::BangEq => {
                    self.next();
                    value = value != self.unary_expr(symbols);
                }
                _ => return value,
            }
        }
    }

    fn unary_expr(&mut self, symbols: &FxHashSet<Box<str>>) -> bool {
        if self.peek().0 == PpToken::Bang {
            self.next();
            return !self.unary_expr(symbols);
        }
        self.primary_expr(symbols)
    }

    fn primary_expr(&mut self, symbols: &FxHashSet<Box<str>>) -> bool {
        match self.next() {
            (PpToken::True, _) => true,
            (PpToken::False, _) => false,
            (PpToken::Ident(symbol), _) => symbols.contains(symbol),
            (PpToken::LeftParen, _) => {
                let value = self.or_expr(symbols);
                match self.next() {
                    (PpToken::RightParen, _) => value,
                    (_, range) => {
                        self.error(ErrorCode::CloseParenExpected, range);
                        false
                    }
                }
            }
            (_, range) => {
                self.error(ErrorCode::InvalidPreprocExpr, range);
                false
            }
        }
    }
}
