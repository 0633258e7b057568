use std::fmt;

/// Semantic value of a literal or identifier token.
///
/// Identifiers only get a value when their semantic text differs from the
/// source text (`@class`, `a`).
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    Text(Box<str>),
    Char(char),
    Integer(u64),
    Real(f64),
}

impl TokenValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match *self {
            Self::Integer(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Char(ch) => write!(f, "{ch:?}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value:?}"),
        }
    }
}
