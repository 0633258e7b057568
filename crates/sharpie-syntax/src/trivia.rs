//! Trivia pieces attached to tokens.

use text_size::TextSize;

use crate::SyntaxKind;

/// Kinds of trivia stored alongside tokens.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TriviaPieceKind {
    Whitespace,
    Newline,
    SingleLineComment,
    MultiLineComment,
    DocComment,
    MultiLineDocComment,
    PreprocessorDirective,
    DisabledText,
    SkippedTokens,
}

impl TriviaPieceKind {
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            Self::Whitespace => SyntaxKind::WHITESPACE,
            Self::Newline => SyntaxKind::NEWLINE,
            Self::SingleLineComment => SyntaxKind::LINE_COMMENT,
            Self::MultiLineComment => SyntaxKind::BLOCK_COMMENT,
            Self::DocComment => SyntaxKind::DOC_COMMENT,
            Self::MultiLineDocComment => SyntaxKind::BLOCK_DOC_COMMENT,
            Self::PreprocessorDirective => SyntaxKind::PREPROCESSOR_DIRECTIVE,
            Self::DisabledText => SyntaxKind::DISABLED_TEXT,
            Self::SkippedTokens => SyntaxKind::SKIPPED_TOKENS,
        }
    }
}

/// A trivia fragment with its kind and length.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TriviaPiece {
    pub kind: TriviaPieceKind,
    pub len: TextSize,
}

impl TriviaPiece {
    pub fn new(kind: TriviaPieceKind, len: TextSize) -> Self {
        Self { kind, len }
    }
}
