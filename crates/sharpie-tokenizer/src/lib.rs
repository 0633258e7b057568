//! Lazy C# scanner.
//!
//! The tokenizer produces tokens on demand and keeps every token it has
//! produced, so the parser can look ahead by index. Each token owns
//! the trivia around it and the lexical diagnostics found while scanning it.

mod cursor;
mod literals;
mod preprocessor;

use std::ops::Range;

use cursor::{Cursor, EOF_CHAR, is_newline, is_whitespace};
use preprocessor::Preprocessor;
use sharpie_errors::{Diagnostic, ErrorCode};
pub use sharpie_syntax::SyntaxKind;
use sharpie_syntax::SyntaxKind::*;
use sharpie_syntax::{TokenValue, TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

/// Index of a token inside the tokenizer buffer.
pub type TokenIndex = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: SyntaxKind,
    /// Keyword kind of an identifier that spells a contextual keyword,
    /// `IDENT` otherwise.
    pub contextual_kind: SyntaxKind,
    pub range: TextRange,
    pub value: Option<TokenValue>,
    leading: Range<u32>,
    trailing: Range<u32>,
    diagnostics: Range<u32>,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Literal text of an interpolated string.
    Text { verbatim: bool },
    /// Expression inside `{...}`; `depth` counts nested brackets.
    Hole { verbatim: bool, depth: u32 },
    /// Format specifier after `:` in a hole.
    Format { verbatim: bool },
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    trivia: Vec<TriviaPiece>,
    diagnostics: Vec<Diagnostic>,
    modes: Vec<Mode>,
    preprocessor: Preprocessor,
    at_line_start: bool,
    seen_token: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_symbols(text, std::iter::empty::<&str>())
    }

    /// Creates a tokenizer with preprocessor symbols defined up front.
    pub fn with_symbols<S: AsRef<str>>(text: &'a str, symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            text,
            cursor: Cursor::new(text),
            tokens: Vec::with_capacity(text.len() / 4 + 1),
            trivia: Vec::with_capacity(text.len() / 4 + 1),
            diagnostics: Vec::new(),
            modes: Vec::new(),
            preprocessor: Preprocessor::new(symbols),
            at_line_start: true,
            seen_token: false,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Scans the next token and returns its index. Once the end of the input
    /// is reached the `EOF` token is returned again.
    pub fn next_token_index(&mut self) -> TokenIndex {
        if let Some(last) = self.tokens.last()
            && last.kind == EOF
        {
            return self.tokens.len() as u32 - 1;
        }
        let token = self.scan();
        self.tokens.push(token);
        self.tokens.len() as u32 - 1
    }

    /// Returns a token already produced by [`Tokenizer::next_token_index`].
    pub fn token(&self, index: TokenIndex) -> &Token {
        &self.tokens[index as usize]
    }

    pub fn token_text(&self, index: TokenIndex) -> &'a str {
        &self.text[self.token(index).range]
    }

    pub fn leading_trivia(&self, index: TokenIndex) -> &[TriviaPiece] {
        let range = &self.token(index).leading;
        &self.trivia[range.start as usize..range.end as usize]
    }

    pub fn trailing_trivia(&self, index: TokenIndex) -> &[TriviaPiece] {
        let range = &self.token(index).trailing;
        &self.trivia[range.start as usize..range.end as usize]
    }

    /// Lexical diagnostics found in the token and its trivia.
    pub fn diagnostics(&self, index: TokenIndex) -> &[Diagnostic] {
        let range = &self.token(index).diagnostics;
        &self.diagnostics[range.start as usize..range.end as usize]
    }

    /// Range of the token including its trivia.
    pub fn full_range(&self, index: TokenIndex) -> TextRange {
        let token = self.token(index);
        let leading = self.leading_trivia(index).iter().map(|piece| piece.len).sum::<TextSize>();
        let trailing = self.trailing_trivia(index).iter().map(|piece| piece.len).sum::<TextSize>();
        TextRange::new(token.range.start() - leading, token.range.end() + trailing)
    }

    fn in_string_text(&self) -> bool {
        matches!(self.modes.last(), Some(Mode::Text { .. } | Mode::Format { .. }))
    }

    fn error(&mut self, code: ErrorCode, range: TextRange) {
        self.diagnostics.push(Diagnostic::new(code, range));
    }

    fn error_with(&mut self, code: ErrorCode, range: TextRange, argument: &str) {
        self.diagnostics.push(Diagnostic::with_argument(code, range, argument));
    }

    fn scan(&mut self) -> Token {
        let diagnostics_start = self.diagnostics.len() as u32;
        let leading_start = self.trivia.len() as u32;
        if !self.in_string_text() {
            self.scan_leading_trivia();
        }
        let leading = leading_start..self.trivia.len() as u32;

        self.cursor.reset_pos_within_token();
        let (kind, value) =
            if self.in_string_text() { self.string_text_token() } else { self.token_kind() };
        let range = self.cursor.token_range();
        self.cursor.reset_pos_within_token();
        let contextual_kind = match kind {
            IDENT if value.is_none() => {
                SyntaxKind::from_contextual_keyword(&self.text[range]).unwrap_or(IDENT)
            }
            _ => IDENT,
        };

        let trailing_start = self.trivia.len() as u32;
        if kind == EOF {
            self.preprocessor.end_of_file(range, &mut self.diagnostics);
        } else {
            self.seen_token = true;
            self.at_line_start = false;
            if !self.in_string_text() {
                self.scan_trailing_trivia();
            }
        }
        let trailing = trailing_start..self.trivia.len() as u32;

        Token {
            kind,
            contextual_kind,
            range,
            value,
            leading,
            trailing,
            diagnostics: diagnostics_start..self.diagnostics.len() as u32,
        }
    }

    fn push_trivia(&mut self, kind: TriviaPieceKind) {
        let len = self.cursor.pos_within_token();
        if len > TextSize::new(0) {
            self.trivia.push(TriviaPiece::new(kind, len));
        }
        self.cursor.reset_pos_within_token();
    }

    fn newline(&mut self) {
        if self.cursor.advance() == '\r' {
            self.cursor.eat('\n');
        }
        self.push_trivia(TriviaPieceKind::Newline);
    }

    fn scan_leading_trivia(&mut self) {
        self.cursor.reset_pos_within_token();
        while !self.cursor.is_eof() {
            match self.cursor.peek() {
                c if is_newline(c) => {
                    self.newline();
                    self.at_line_start = true;
                }
                c if is_whitespace(c) => {
                    self.cursor.advance_while(is_whitespace);
                    self.push_trivia(TriviaPieceKind::Whitespace);
                }
                '/' if matches!(self.cursor.second(), '/' | '*') => {
                    self.comment();
                    self.at_line_start = false;
                }
                '#' => self.directive(),
                c if !self.can_start_token(c) => self.skipped_character(),
                _ => break,
            }
        }
    }

    fn scan_trailing_trivia(&mut self) {
        while !self.cursor.is_eof() {
            match self.cursor.peek() {
                c if is_newline(c) => {
                    self.newline();
                    self.at_line_start = true;
                    break;
                }
                c if is_whitespace(c) => {
                    self.cursor.advance_while(is_whitespace);
                    self.push_trivia(TriviaPieceKind::Whitespace);
                }
                '/' if matches!(self.cursor.second(), '/' | '*') => self.comment(),
                _ => break,
            }
        }
    }

    fn comment(&mut self) {
        self.cursor.advance();
        if self.cursor.eat('/') {
            let doc = self.cursor.matches('/') && self.cursor.second() != '/';
            self.cursor.advance_line();
            let kind =
                if doc { TriviaPieceKind::DocComment } else { TriviaPieceKind::SingleLineComment };
            self.push_trivia(kind);
            return;
        }

        self.cursor.advance();
        let doc = self.cursor.matches('*') && self.cursor.second() != '/';
        loop {
            if self.cursor.is_eof() {
                let range = self.cursor.token_range();
                self.error(ErrorCode::OpenEndedComment, range);
                break;
            }
            if self.cursor.advance() == '*' && self.cursor.eat('/') {
                break;
            }
        }
        let kind =
            if doc { TriviaPieceKind::MultiLineDocComment } else { TriviaPieceKind::MultiLineComment };
        self.push_trivia(kind);
    }

    fn can_start_token(&self, c: char) -> bool {
        match c {
            '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '.' | ':' | '?' | '~' | '!' | '='
            | '<' | '>' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '"' | '\'' => true,
            '0'..='9' => true,
            '$' => {
                self.cursor.second() == '"'
                    || (self.cursor.second() == '@' && self.cursor.third() == '"')
            }
            '@' => {
                let next = self.cursor.second();
                next == '"'
                    || (next == '$' && self.cursor.third() == '"')
                    || literals::is_identifier_start(next)
                    || (next == '\\' && matches!(self.cursor.third(), 'u' | 'U'))
            }
            '\\' => matches!(self.cursor.second(), 'u' | 'U'),
            c => literals::is_identifier_start(c),
        }
    }

    fn skipped_character(&mut self) {
        let c = self.cursor.advance();
        let range = self.cursor.token_range();
        if c == '@' {
            self.error(ErrorCode::ExpectedVerbatimLiteral, range);
        } else {
            self.error_with(ErrorCode::UnexpectedCharacter, range, &c.to_string());
        }
        self.push_trivia(TriviaPieceKind::SkippedTokens);
    }

    fn token_kind(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let first = self.cursor.advance();
        let kind = match first {
            EOF_CHAR if self.cursor.pos_within_token() == TextSize::new(0) => EOF,
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '[' => LEFT_BRACKET,
            ']' => RIGHT_BRACKET,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ';' => SEMICOLON,
            ',' => COMMA,
            '~' => TILDE,
            '.' if self.cursor.peek().is_ascii_digit() => return self.number(first),
            '.' if self.cursor.eat('.') => DOT_DOT,
            '.' => DOT,
            ':' if self.cursor.eat(':') => COLON_COLON,
            ':' => COLON,
            '?' if self.cursor.eat('?') => {
                if self.cursor.eat('=') {
                    QUESTION_QUESTION_EQ
                } else {
                    QUESTION_QUESTION
                }
            }
            '?' => QUESTION,
            '!' if self.cursor.eat('=') => BANG_EQ,
            '!' => BANG,
            '=' if self.cursor.eat('=') => EQ_EQ,
            '=' if self.cursor.eat('>') => FAT_ARROW,
            '=' => EQ,
            '<' if self.cursor.eat('<') => {
                if self.cursor.eat('=') {
                    SHL_EQ
                } else {
                    SHL
                }
            }
            '<' if self.cursor.eat('=') => LT_EQ,
            '<' => LT,
            '>' if self.cursor.eat('=') => GT_EQ,
            '>' => GT,
            '+' if self.cursor.eat('+') => PLUS_PLUS,
            '+' if self.cursor.eat('=') => PLUS_EQ,
            '+' => PLUS,
            '-' if self.cursor.eat('-') => MINUS_MINUS,
            '-' if self.cursor.eat('=') => MINUS_EQ,
            '-' if self.cursor.eat('>') => ARROW,
            '-' => MINUS,
            '*' if self.cursor.eat('=') => STAR_EQ,
            '*' => STAR,
            '/' if self.cursor.eat('=') => SLASH_EQ,
            '/' => SLASH,
            '%' if self.cursor.eat('=') => PERCENT_EQ,
            '%' => PERCENT,
            '&' if self.cursor.eat('&') => AMP_AMP,
            '&' if self.cursor.eat('=') => AMP_EQ,
            '&' => AMP,
            '|' if self.cursor.eat('|') => PIPE_PIPE,
            '|' if self.cursor.eat('=') => PIPE_EQ,
            '|' => PIPE,
            '^' if self.cursor.eat('=') => CARET_EQ,
            '^' => CARET,
            '0'..='9' => return self.number(first),
            '"' => return self.string(false),
            '\'' => return self.character(),
            '$' => return self.interpolated_start(false),
            '@' if self.cursor.matches('"') => {
                self.cursor.advance();
                return self.string(true);
            }
            '@' if self.cursor.matches('$') => {
                self.cursor.advance();
                return self.interpolated_start(true);
            }
            _ => return self.identifier(first),
        };
        self.track_hole(kind);
        (kind, None)
    }

    /// Keeps the interpolation mode stack in sync with brackets in a hole.
    fn track_hole(&mut self, kind: SyntaxKind) {
        let Some(&Mode::Hole { verbatim, depth }) = self.modes.last() else { return };
        let next = match kind {
            LEFT_PAREN | LEFT_BRACKET | LEFT_BRACE => Some(Mode::Hole { verbatim, depth: depth + 1 }),
            RIGHT_PAREN | RIGHT_BRACKET => {
                Some(Mode::Hole { verbatim, depth: depth.saturating_sub(1) })
            }
            RIGHT_BRACE if depth == 0 => None,
            RIGHT_BRACE => Some(Mode::Hole { verbatim, depth: depth - 1 }),
            COLON if depth == 0 => Some(Mode::Format { verbatim }),
            _ => return,
        };
        self.modes.pop();
        self.modes.extend(next);
    }

    /// `$"`, `$@"` or `@$"`; everything before the optional `@` and the quote
    /// is already consumed.
    fn interpolated_start(&mut self, verbatim_prefix: bool) -> (SyntaxKind, Option<TokenValue>) {
        let verbatim = verbatim_prefix || self.cursor.eat('@');
        self.cursor.advance();
        self.modes.push(Mode::Text { verbatim });
        let kind = if verbatim { INTERPOLATED_VERBATIM_STRING_START } else { INTERPOLATED_STRING_START };
        (kind, None)
    }

    /// Scans inside the literal part of an interpolated string.
    fn string_text_token(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let (verbatim, format) = match self.modes.last() {
            Some(&Mode::Text { verbatim }) => (verbatim, false),
            Some(&Mode::Format { verbatim }) => (verbatim, true),
            _ => unreachable!("not inside an interpolated string"),
        };

        if format && self.cursor.matches('}') {
            self.cursor.advance();
            self.modes.pop();
            return (RIGHT_BRACE, None);
        }
        if !format {
            if self.cursor.is_eof() {
                self.modes.pop();
                let range = self.cursor.token_range();
                self.error(ErrorCode::UnterminatedStringLit, range);
                return (INTERPOLATED_STRING_END, None);
            }
            if !verbatim && is_newline(self.cursor.peek()) {
                self.modes.pop();
                let range = self.cursor.token_range();
                self.error(ErrorCode::NewlineInConst, range);
                return (INTERPOLATED_STRING_END, None);
            }
            if self.cursor.matches('"') && !(verbatim && self.cursor.second() == '"') {
                self.cursor.advance();
                self.modes.pop();
                return (INTERPOLATED_STRING_END, None);
            }
            if self.cursor.matches('{') && self.cursor.second() != '{' {
                self.cursor.advance();
                self.modes.push(Mode::Hole { verbatim, depth: 0 });
                return (LEFT_BRACE, None);
            }
        }

        let value = self.interpolated_text(verbatim, format);
        if format && self.cursor.pos_within_token() == TextSize::new(0) {
            // The format ended without `}`; let the string text mode finish it.
            self.modes.pop();
            return self.string_text_token();
        }
        (INTERPOLATED_STRING_TEXT, Some(TokenValue::Text(value.into())))
    }
}

#[cfg(test)]
mod tests;
