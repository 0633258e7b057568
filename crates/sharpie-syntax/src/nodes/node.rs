//! Node storage and child slots.

use text_size::TextRange;

use crate::nodes::TreeInner;
use crate::SyntaxKind;

/// Owning storage for all nodes, lists and child arrays.
#[derive(Debug, PartialEq)]
pub(crate) struct Nodes {
    pub(crate) nodes: Box<[Node]>,
    pub(crate) node_children: Box<[Child]>,
    pub(crate) lists: Box<[List]>,
    pub(crate) list_children: Box<[Child]>,
}

/// Raw node stored in the tree arena.
///
/// Nodes are numbered in preorder, so the subtree of node `i` is exactly
/// `i..subtree_end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Node {
    pub(crate) parent: u32,
    pub(crate) kind: SyntaxKind,
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
    /// Token span including trivia; `first_token > last_token` for a node
    /// without tokens.
    pub(crate) first_token: u32,
    pub(crate) last_token: u32,
    pub(crate) subtree_end: u32,
}

impl Node {
    pub(crate) const NO_PARENT: u32 = u32::MAX;
}

/// One grammar slot of a node or one element of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Child {
    Token(u32),
    Node(u32),
    List(u32),
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct List {
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
}

impl TreeInner {
    #[inline]
    pub(crate) fn node(&self, index: u32) -> &Node {
        &self.nodes.nodes[index as usize]
    }

    #[inline]
    pub(crate) fn node_children(&self, index: u32) -> &[Child] {
        let node = self.node(index);
        let start = node.children_start as usize;
        &self.nodes.node_children[start..start + node.children_len as usize]
    }

    #[inline]
    pub(crate) fn list_children(&self, index: u32) -> &[Child] {
        let list = &self.nodes.lists[index as usize];
        let start = list.children_start as usize;
        &self.nodes.list_children[start..start + list.children_len as usize]
    }

    pub(crate) fn node_range(&self, index: u32) -> TextRange {
        let node = self.node(index);
        let start = self.tokens[node.first_token as usize - 1].end;
        TextRange::new(start, self.tokens[node.last_token as usize].end)
    }

    /// Range without the outermost leading and trailing trivia.
    pub(crate) fn node_trimmed_range(&self, index: u32) -> TextRange {
        match (self.first_significant(index), self.last_significant(index)) {
            (Some(first), Some(last)) => {
                TextRange::new(self.token_range(first).start(), self.token_range(last).end())
            }
            _ => TextRange::empty(self.node_range(index).start()),
        }
    }

    pub(crate) fn first_significant(&self, index: u32) -> Option<u32> {
        let node = self.node(index);
        (node.first_token..=node.last_token).find(|&token| !self.token(token).kind.is_trivia())
    }

    pub(crate) fn last_significant(&self, index: u32) -> Option<u32> {
        let node = self.node(index);
        (node.first_token..=node.last_token).rev().find(|&token| !self.token(token).kind.is_trivia())
    }
}
