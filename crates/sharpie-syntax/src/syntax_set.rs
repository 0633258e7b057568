use std::fmt;

use crate::SyntaxKind;

const WORDS: usize = SyntaxKind::__LAST as usize / 64 + 1;

/// Constant bit set of kinds, used for first/follow sets in the parser.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxSet {
    words: [u64; WORDS],
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { words: [0; WORDS] };

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < N {
            set = set.with(kinds[i]);
            i += 1;
        }
        set
    }

    pub const fn with(mut self, kind: SyntaxKind) -> Self {
        let (word, mask) = Self::locate(kind);
        self.words[word] |= mask;
        self
    }

    pub const fn union(mut self, other: Self) -> Self {
        let mut i = 0;
        while i < WORDS {
            self.words[i] |= other.words[i];
            i += 1;
        }
        self
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let (word, mask) = Self::locate(kind);
        self.words[word] & mask != 0
    }

    const fn locate(kind: SyntaxKind) -> (usize, u64) {
        let raw = kind as u16 as usize;
        (raw / 64, 1 << (raw % 64))
    }
}

impl fmt::Debug for SyntaxSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = self.words.iter().map(|word| word.count_ones()).sum::<u32>();
        f.debug_struct("SyntaxSet").field("len", &bits).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn membership_spans_words() {
        const SET: SyntaxSet = SyntaxSet::new([WHITESPACE, SEMICOLON, QUERY_CONTINUATION]);
        assert!(SET.contains(WHITESPACE));
        assert!(SET.contains(SEMICOLON));
        assert!(SET.contains(QUERY_CONTINUATION));
        assert!(!SET.contains(COMMA));

        let union = SET.union(SyntaxSet::new([COMMA]));
        assert!(union.contains(COMMA));
        assert!(!SET.contains(COMMA));
    }
}
