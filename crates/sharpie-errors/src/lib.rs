//! Diagnostics produced while scanning and parsing.
//!
//! A diagnostic is plain data: a catalog code, a span into the source text
//! and up to two message arguments. Nothing here is ever raised as a Rust
//! error; callers collect diagnostics from the syntax tree.

mod code;

use std::fmt;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use code::ErrorCode;
pub use text_size::{TextRange, TextSize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    code: ErrorCode,
    range: TextRange,
    arguments: Box<[Box<str>]>,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, range: TextRange) -> Self {
        Self { code, range, arguments: Box::default() }
    }

    pub fn with_argument(code: ErrorCode, range: TextRange, argument: impl Into<Box<str>>) -> Self {
        Self { code, range, arguments: Box::new([argument.into()]) }
    }

    pub fn with_arguments<const N: usize>(
        code: ErrorCode,
        range: TextRange,
        arguments: [&str; N],
    ) -> Self {
        Self { code, range, arguments: arguments.iter().map(|&it| it.into()).collect() }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn arguments(&self) -> &[Box<str>] {
        &self.arguments
    }

    pub fn message(&self) -> String {
        let mut message = self.code.template().to_owned();
        for (index, argument) in self.arguments.iter().enumerate() {
            message = message.replace(&format!("{{{index}}}"), argument);
        }
        message
    }

    /// Renders the diagnostic against its source text with a caret label.
    pub fn render(&self, renderer: &Renderer, path: &str, text: &str) -> String {
        let level = match self.severity() {
            Severity::Error => Level::Error,
            Severity::Warning => Level::Warning,
        };
        let message = self.message();
        let id = self.code.to_string();
        let snippet = level.title(&message).id(&id).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(snippet).to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity() {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{severity} {}@{:?}: {}", self.code, self.range, self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_substitutes_arguments() {
        let range = TextRange::empty(TextSize::new(3));
        let diagnostic = Diagnostic::with_argument(ErrorCode::SyntaxError, range, "alias");
        assert_eq!(diagnostic.message(), "Syntax error, 'alias' expected");
        assert_eq!(diagnostic.to_string(), "error CS1003@3..3: Syntax error, 'alias' expected");

        let diagnostic = Diagnostic::with_arguments(
            ErrorCode::FeatureNotAvailableInVersion7_3,
            range,
            ["coalescing assignment", "8.0"],
        );
        assert_eq!(
            diagnostic.message(),
            "Feature 'coalescing assignment' is not available in C# 7.3. Please use language version 8.0 or greater."
        );
    }

    #[test]
    fn warning_directive_is_a_warning() {
        let range = TextRange::new(TextSize::new(0), TextSize::new(8));
        let diagnostic = Diagnostic::with_argument(ErrorCode::WarningDirective, range, "careful");
        assert!(!diagnostic.is_error());
        assert!(diagnostic.to_string().starts_with("warning CS1030@0..8"));
    }

    #[test]
    fn render_mentions_the_code_and_origin() {
        let text = "class C { int x }";
        let range = TextRange::empty(TextSize::new(15));
        let rendered = Diagnostic::new(ErrorCode::SemicolonExpected, range).render(
            &Renderer::plain(),
            "test.cs",
            text,
        );
        assert!(rendered.contains("CS1002"), "{rendered}");
        assert!(rendered.contains("test.cs"), "{rendered}");
    }
}
