use sharpie_errors::Diagnostic;

use super::token::Token;
use crate::TokenValue;
use crate::nodes::Nodes;

#[derive(Debug, PartialEq)]
pub(crate) struct TreeInner {
    pub(crate) text: Box<str>,
    /// Always starts with a fake token.
    pub(crate) tokens: Box<[Token]>,
    pub(crate) nodes: Nodes,
    /// Sorted by token index.
    pub(crate) values: Box<[(u32, TokenValue)]>,
    /// Sorted by owning node index; stable within a node.
    pub(crate) diagnostics: Box<[(u32, Diagnostic)]>,
}

impl TreeInner {
    pub(crate) fn value(&self, token: u32) -> Option<&TokenValue> {
        let index = self.values.binary_search_by_key(&token, |&(token, _)| token).ok()?;
        Some(&self.values[index].1)
    }

    /// Diagnostics owned by nodes in `nodes`.
    pub(crate) fn diagnostics_in(&self, nodes: std::ops::Range<u32>) -> &[(u32, Diagnostic)] {
        let start = self.diagnostics.partition_point(|&(owner, _)| owner < nodes.start);
        let end = self.diagnostics.partition_point(|&(owner, _)| owner < nodes.end);
        &self.diagnostics[start..end]
    }
}
