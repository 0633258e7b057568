//! Token storage and trivia attachment helpers.

use std::ops::Range;

use text_size::{TextRange, TextSize};

use super::tree::TreeInner;
use crate::SyntaxKind;

/// Raw token stored in the tree arena.
///
/// Trivia pieces are stored as tokens too, right before (leading) or right
/// after (trailing) the token that owns them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: SyntaxKind,
    pub(crate) attached_trivia: AttachedTrivia,
    pub(crate) end: TextSize,
    pub(crate) parent: u32,
}

/// Compact encoding for trivia attachment metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AttachedTrivia {
    /// Layout:
    /// - bit 0: has leading trivia
    /// - bit 1: has trailing trivia
    /// - bit 2: zero-width token synthesized by the parser
    /// - bits 3..: trivia length (leading for real tokens, trailing for the
    ///   first trailing trivia token)
    raw: u32,
}

impl AttachedTrivia {
    const MAX_TRIVIA_LEN: usize = (1 << (u32::BITS - 3)) - 1;

    pub(crate) const NONE: Self = Self { raw: 0 };
    pub(crate) const MISSING: Self = Self { raw: 0b100 };

    #[inline]
    pub(crate) fn new(
        has_leading_trivia: bool,
        has_trailing_trivia: bool,
        trivia_len: usize,
    ) -> Self {
        assert!(trivia_len <= Self::MAX_TRIVIA_LEN);
        Self {
            raw: ((trivia_len << 3)
                | (usize::from(has_trailing_trivia) << 1)
                | usize::from(has_leading_trivia)) as u32,
        }
    }

    #[inline]
    pub(crate) fn has_leading_trivia(self) -> bool {
        (self.raw & 0b001) != 0
    }

    #[inline]
    pub(crate) fn has_trailing_trivia(self) -> bool {
        (self.raw & 0b010) != 0
    }

    #[inline]
    pub(crate) fn is_missing(self) -> bool {
        (self.raw & 0b100) != 0
    }

    #[inline]
    pub(crate) fn trivia_len(self) -> usize {
        (self.raw >> 3) as usize
    }
}

impl TreeInner {
    #[inline]
    pub(crate) fn token(&self, index: u32) -> &Token {
        &self.tokens[index as usize]
    }

    /// Range of the token text alone. Index 0 is the sentinel, so every real
    /// token has a predecessor.
    #[inline]
    pub(crate) fn token_range(&self, index: u32) -> TextRange {
        let start = self.tokens[index as usize - 1].end;
        TextRange::new(start, self.tokens[index as usize].end)
    }

    pub(crate) fn leading_trivia(&self, index: u32) -> Range<u32> {
        let attached = self.token(index).attached_trivia;
        if !attached.has_leading_trivia() {
            return index..index;
        }
        index - attached.trivia_len() as u32..index
    }

    pub(crate) fn trailing_trivia(&self, index: u32) -> Range<u32> {
        if !self.token(index).attached_trivia.has_trailing_trivia() {
            return index + 1..index + 1;
        }
        let len = self.token(index + 1).attached_trivia.trivia_len() as u32;
        index + 1..index + 1 + len
    }

    /// Range including the attached trivia.
    pub(crate) fn token_full_range(&self, index: u32) -> TextRange {
        let leading = self.leading_trivia(index);
        let trailing = self.trailing_trivia(index);
        let start = self.tokens[leading.start as usize - 1].end;
        let end = self.tokens[trailing.end as usize - 1].end;
        TextRange::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::AttachedTrivia;

    #[test]
    fn attached_trivia_bits() {
        let attached = AttachedTrivia::new(true, false, 5);
        assert!(attached.has_leading_trivia());
        assert!(!attached.has_trailing_trivia());
        assert!(!attached.is_missing());
        assert_eq!(attached.trivia_len(), 5);

        assert!(AttachedTrivia::MISSING.is_missing());
        assert_eq!(AttachedTrivia::MISSING.trivia_len(), 0);
    }
}
