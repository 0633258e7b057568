//! Lossless, immutable syntax tree for C# sources.
//!
//! Tokens and trivia live in one flat array, nodes in a preorder arena. The
//! tree is built once by [`Builder`] and then navigated through cheap `Copy`
//! handles borrowed from a [`SyntaxTree`].

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod nodes;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;
mod value;

pub use builder::Builder;
pub use sharpie_errors::{Diagnostic, ErrorCode, TextRange, TextSize};
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, Slots, SyntaxElement,
    SyntaxList, SyntaxNode, SyntaxSlot, SyntaxToken, SyntaxTree, TriviaIter,
    WalkEvent, WalkEventWithTokens,
};
pub use syntax_kind::SyntaxKind;
pub use syntax_set::SyntaxSet;
pub use trivia::{TriviaPiece, TriviaPieceKind};
pub use value::TokenValue;
