use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::{self, *};
use sharpie_syntax::TokenValue;
use text_size::{TextRange, TextSize};

use crate::Tokenizer;
use crate::cursor::{EOF_CHAR, is_newline};

/// Largest magnitude representable by `decimal` (2^96 - 1).
const DECIMAL_MAX: f64 = 79_228_162_514_264_337_593_543_950_335.0;

pub(crate) fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub(crate) fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric() || matches!(c, '\u{200c}' | '\u{200d}')
}

fn is_digit(c: char, radix: u32) -> bool {
    c.is_digit(radix)
}

impl Tokenizer<'_> {
    pub(crate) fn number(&mut self, first: char) -> (SyntaxKind, Option<TokenValue>) {
        let start = self.cursor.token_range().start();
        let radix = match (first, self.cursor.peek()) {
            ('0', 'x' | 'X') => 16,
            ('0', 'b' | 'B') => 2,
            _ => 10,
        };

        let mut valid = true;
        let mut real = first == '.';
        if radix != 10 {
            self.cursor.advance();
            valid &= self.digits(radix, false, true);
        } else if first == '.' {
            valid &= self.digits(10, false, false);
        } else {
            valid &= self.digits(10, true, false);
            if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
                self.cursor.advance();
                real = true;
                valid &= self.digits(10, false, false);
            }
        }

        if radix == 10 && matches!(self.cursor.peek(), 'e' | 'E') {
            real = true;
            self.cursor.advance();
            if matches!(self.cursor.peek(), '+' | '-') {
                self.cursor.advance();
            }
            valid &= self.digits(10, false, false);
        }

        let digits_end = self.cursor.offset();
        let mut real_suffix = None;
        match self.cursor.peek() {
            'f' | 'F' | 'd' | 'D' | 'm' | 'M' if radix == 10 => {
                real_suffix = Some(self.cursor.advance().to_ascii_lowercase());
                real = true;
            }
            'u' | 'U' | 'l' | 'L' if !real => {
                let other = match self.cursor.advance().to_ascii_lowercase() {
                    'u' => 'l',
                    _ => 'u',
                };
                if self.cursor.peek().to_ascii_lowercase() == other {
                    self.cursor.advance();
                }
            }
            _ => {}
        }

        let range = self.cursor.token_range();
        if !valid {
            self.error(ErrorCode::InvalidNumber, range);
            let value = if real { TokenValue::Real(0.0) } else { TokenValue::Integer(0) };
            return (NUMERIC_LITERAL, Some(value));
        }

        let digits: String = self.text[TextRange::new(start, digits_end)]
            .chars()
            .filter(|&c| c != '_')
            .collect();
        let value = if real {
            let value = digits.parse::<f64>().unwrap_or(f64::INFINITY);
            let (overflow, type_name) = match real_suffix {
                Some('f') => (value.abs() > f64::from(f32::MAX), "float"),
                Some('m') => (value.abs() > DECIMAL_MAX, "decimal"),
                _ => (value.is_infinite(), "double"),
            };
            if overflow {
                self.error_with(ErrorCode::FloatOverflow, range, type_name);
            }
            TokenValue::Real(value)
        } else {
            let body = if radix == 10 { &digits[..] } else { &digits[2..] };
            match u64::from_str_radix(body, radix) {
                Ok(value) => TokenValue::Integer(value),
                Err(_) => {
                    self.error(ErrorCode::IntOverflow, range);
                    TokenValue::Integer(0)
                }
            }
        };
        (NUMERIC_LITERAL, Some(value))
    }

    /// Consumes digits and `_` separators; `seen_digit` is set when the first
    /// digit was consumed by the caller. Returns `false` when there are no
    /// digits or the run ends with a separator.
    fn digits(&mut self, radix: u32, mut seen_digit: bool, allow_leading_separator: bool) -> bool {
        let mut last = EOF_CHAR;
        loop {
            let c = self.cursor.peek();
            if c == '_' && (seen_digit || allow_leading_separator) {
                self.cursor.advance();
            } else if is_digit(c, radix) {
                self.cursor.advance();
                seen_digit = true;
            } else {
                break;
            }
            last = c;
        }
        seen_digit && last != '_'
    }

    /// Scans a regular (`"`) or verbatim (`@"`) string; the opening quote is
    /// already consumed.
    pub(crate) fn string(&mut self, verbatim: bool) -> (SyntaxKind, Option<TokenValue>) {
        let mut value = String::new();
        loop {
            if self.cursor.is_eof() {
                let code = if verbatim {
                    ErrorCode::UnterminatedStringLit
                } else {
                    ErrorCode::NewlineInConst
                };
                let range = self.cursor.token_range();
                self.error(code, range);
                break;
            }
            match self.cursor.peek() {
                '"' if verbatim && self.cursor.second() == '"' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    value.push('"');
                }
                '"' => {
                    self.cursor.advance();
                    break;
                }
                c if !verbatim && is_newline(c) => {
                    let range = self.cursor.token_range();
                    self.error(ErrorCode::NewlineInConst, range);
                    break;
                }
                '\\' if !verbatim => self.escape(&mut value),
                _ => value.push(self.cursor.advance()),
            }
        }
        (STRING_LITERAL, Some(TokenValue::Text(value.into())))
    }

    pub(crate) fn character(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let mut value = String::new();
        if self.cursor.eat('\'') {
            let range = self.cursor.token_range();
            self.error(ErrorCode::EmptyCharConst, range);
            return (CHARACTER_LITERAL, Some(TokenValue::Char('\0')));
        }

        loop {
            let c = self.cursor.peek();
            if self.cursor.is_eof() || is_newline(c) {
                let range = self.cursor.token_range();
                self.error(ErrorCode::NewlineInConst, range);
                break;
            }
            match c {
                '\'' => {
                    self.cursor.advance();
                    if value.chars().count() > 1 {
                        let range = self.cursor.token_range();
                        self.error(ErrorCode::TooManyCharsInConst, range);
                    }
                    break;
                }
                '\\' => self.escape(&mut value),
                _ => value.push(self.cursor.advance()),
            }
        }
        let value = value.chars().next().unwrap_or('\0');
        (CHARACTER_LITERAL, Some(TokenValue::Char(value)))
    }

    /// Decodes one escape sequence starting at `\`.
    fn escape(&mut self, out: &mut String) {
        let start = self.cursor.offset();
        self.cursor.advance();
        let c = self.cursor.peek();
        if self.cursor.is_eof() || is_newline(c) {
            self.error(ErrorCode::IllegalEscape, TextRange::at(start, TextSize::new(1)));
            return;
        }
        self.cursor.advance();
        let decoded = match c {
            '\'' => Some('\''),
            '"' => Some('"'),
            '\\' => Some('\\'),
            '0' => Some('\0'),
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{b}'),
            'x' => self.hex_escape(1, 4),
            'u' => self.hex_escape(4, 4),
            'U' => self.hex_escape(8, 8),
            _ => None,
        };
        match decoded {
            Some(c) => out.push(c),
            None => {
                let range = TextRange::new(start, self.cursor.offset());
                self.error(ErrorCode::IllegalEscape, range);
            }
        }
    }

    fn hex_escape(&mut self, min: usize, max: usize) -> Option<char> {
        let mut code = 0u32;
        let mut len = 0;
        while len < max && self.cursor.peek().is_ascii_hexdigit() {
            code = code * 16 + self.cursor.advance().to_digit(16)?;
            len += 1;
        }
        if len < min {
            return None;
        }
        char::from_u32(code)
    }

    /// Scans an identifier, a verbatim identifier or a keyword. `first` is
    /// already consumed.
    pub(crate) fn identifier(&mut self, first: char) -> (SyntaxKind, Option<TokenValue>) {
        let verbatim = first == '@';
        let mut escaped = false;
        let mut name = String::new();
        match first {
            '@' => {}
            '\\' => {
                escaped = true;
                self.identifier_escape(&mut name);
            }
            c => name.push(c),
        }

        loop {
            let c = self.cursor.peek();
            if is_identifier_continue(c) && !self.cursor.is_eof() {
                name.push(self.cursor.advance());
            } else if c == '\\' && matches!(self.cursor.second(), 'u' | 'U') {
                self.cursor.advance();
                escaped = true;
                self.identifier_escape(&mut name);
            } else {
                break;
            }
        }

        if verbatim || escaped {
            return (IDENT, Some(TokenValue::Text(name.into())));
        }
        (SyntaxKind::from_keyword(&name).unwrap_or(IDENT), None)
    }

    /// Decodes `\uXXXX` or `\UXXXXXXXX` after the backslash.
    fn identifier_escape(&mut self, out: &mut String) {
        let start = self.cursor.offset() - TextSize::new(1);
        let decoded = match self.cursor.advance() {
            'u' => self.hex_escape(4, 4),
            'U' => self.hex_escape(8, 8),
            _ => None,
        };
        match decoded {
            Some(c) => out.push(c),
            None => {
                let range = TextRange::new(start, self.cursor.offset());
                self.error(ErrorCode::IllegalEscape, range);
            }
        }
    }

    /// Literal text of an interpolated string or of a format specifier,
    /// with escapes and doubled braces decoded.
    pub(crate) fn interpolated_text(&mut self, verbatim: bool, format: bool) -> String {
        let mut value = String::new();
        while !self.cursor.is_eof() {
            let c = self.cursor.peek();
            match c {
                '"' if verbatim && !format && self.cursor.second() == '"' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    value.push('"');
                }
                '"' => break,
                '}' if format => break,
                '{' | '}' if !format && self.cursor.second() == c => {
                    self.cursor.advance();
                    self.cursor.advance();
                    value.push(c);
                }
                '{' => break,
                c if !verbatim && is_newline(c) => break,
                '\\' if !verbatim => self.escape(&mut value),
                _ => value.push(self.cursor.advance()),
            }
        }
        value
    }
}
