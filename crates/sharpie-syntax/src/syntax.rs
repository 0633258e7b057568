//! Public syntax tree API over the immutable arena.

use std::fmt::{self, Write as _};
use std::ops::Range;
use std::sync::Arc;

use sharpie_errors::Diagnostic;
use text_size::TextRange;

use crate::nodes::{Child, Node, TreeInner};
use crate::{SyntaxKind, TokenValue};

/// Owned syntax tree for a single source text.
///
/// Cloning is cheap; the storage is shared.
#[derive(Clone, PartialEq)]
pub struct SyntaxTree {
    pub(crate) tree: Arc<TreeInner>,
}

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: &self.tree, index: 0 }
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.tree.text
    }

    /// Every diagnostic in the tree, in source order.
    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.root().all_diagnostics()
    }

    pub fn token_count(&self) -> usize {
        self.tree.tokens.iter().filter(|token| !token.kind.is_trivia()).count() - 1
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("text_len", &self.text().len())
            .field("nodes", &self.tree.nodes.nodes.len())
            .finish_non_exhaustive()
    }
}

unsafe impl salsa::Update for SyntaxTree {
    unsafe fn maybe_update(old_pointer: *mut Self, new_value: Self) -> bool {
        let old_value = unsafe { &mut *old_pointer };
        if *old_value == new_value {
            false
        } else {
            *old_value = new_value;
            true
        }
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.token(self.index).kind
    }

    /// Returns `true` if this token is trivia.
    #[inline]
    pub fn is_trivia(self) -> bool {
        self.kind().is_trivia()
    }

    /// Returns `true` for a zero-width token synthesized during recovery.
    #[inline]
    pub fn is_missing(self) -> bool {
        self.tree.token(self.index).attached_trivia.is_missing()
    }

    /// Returns the token text range including attached trivia.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.token_full_range(self.index)
    }

    /// Returns the token text range excluding trivia.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        self.tree.token_range(self.index)
    }

    /// Returns the token text including trivia.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the token text excluding trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Semantic value of a literal, or of an identifier whose meaning differs
    /// from its source text.
    #[inline]
    pub fn value(self) -> Option<&'a TokenValue> {
        self.tree.value(self.index)
    }

    /// Identifier text with `@` escapes and unicode escapes resolved.
    pub fn value_text(self) -> &'a str {
        self.value().and_then(TokenValue::as_text).unwrap_or_else(|| self.text_trimmed())
    }

    /// Iterates over leading trivia tokens.
    #[inline]
    pub fn leading_trivia(self) -> TriviaIter<'a> {
        TriviaIter { tree: self.tree, tokens: self.tree.leading_trivia(self.index) }
    }

    /// Iterates over trailing trivia tokens.
    #[inline]
    pub fn trailing_trivia(self) -> TriviaIter<'a> {
        TriviaIter { tree: self.tree, tokens: self.tree.trailing_trivia(self.index) }
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, index: self.tree.token(self.index).parent }
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxToken<'_> {}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.trimmed_range())?;
        if self.is_missing() {
            f.write_str(" missing")
        } else {
            write!(f, " {:?}", self.text_trimmed())
        }
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Iterator over trivia tokens.
#[derive(Clone)]
pub struct TriviaIter<'a> {
    tree: &'a TreeInner,
    tokens: Range<u32>,
}

impl<'a> Iterator for TriviaIter<'a> {
    type Item = SyntaxToken<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(SyntaxToken { tree: self.tree, index: self.tokens.next()? })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

impl DoubleEndedIterator for TriviaIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        Some(SyntaxToken { tree: self.tree, index: self.tokens.next_back()? })
    }
}

impl ExactSizeIterator for TriviaIter<'_> {}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxNode<'a> {
    #[inline]
    fn raw(self) -> &'a Node {
        self.tree.node(self.index)
    }

    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.raw().kind
    }

    /// Returns the text range covered by this node, trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.node_range(self.index)
    }

    /// Returns the range with the outermost leading/trailing trivia trimmed
    /// away.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        self.tree.node_trimmed_range(self.index)
    }

    /// Returns the full text of this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the printed text: the node text without outer trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Returns the first significant (non-trivia) token of the subtree.
    #[inline]
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        let index = self.tree.first_significant(self.index)?;
        Some(SyntaxToken { tree: self.tree, index })
    }

    /// Returns the last significant (non-trivia) token of the subtree.
    #[inline]
    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        let index = self.tree.last_significant(self.index)?;
        Some(SyntaxToken { tree: self.tree, index })
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        let parent = self.raw().parent;
        (parent != Node::NO_PARENT).then_some(Self { tree: self.tree, index: parent })
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Iterates the grammar slots of this node, in order.
    #[inline]
    pub fn slots(self) -> Slots<'a> {
        Slots { tree: self.tree, children: self.tree.node_children(self.index).iter() }
    }

    /// Returns the slot at `index`.
    #[inline]
    pub fn slot(self, index: usize) -> Option<SyntaxSlot<'a>> {
        self.tree.node_children(self.index).get(index).map(|&child| slot(self.tree, child))
    }

    /// Iterates children including tokens, flattening lists.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { active_list: None, slots: self.slots() }
    }

    /// Iterates child nodes, flattening lists and skipping tokens.
    #[inline]
    pub fn children(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// Iterates child tokens, flattening lists.
    #[inline]
    pub fn child_tokens(self) -> impl Iterator<Item = SyntaxToken<'a>> + Clone {
        self.children_with_tokens().filter_map(SyntaxElement::into_token)
    }

    /// Diagnostics attached directly to this node.
    pub fn diagnostics(self) -> impl ExactSizeIterator<Item = &'a Diagnostic> + Clone {
        self.tree.diagnostics_in(self.index..self.index + 1).iter().map(|(_, diagnostic)| diagnostic)
    }

    /// Diagnostics attached to this node and all of its descendants, in source
    /// order.
    pub fn all_diagnostics(self) -> Vec<&'a Diagnostic> {
        let mut diagnostics = self
            .tree
            .diagnostics_in(self.index..self.raw().subtree_end)
            .iter()
            .map(|(_, diagnostic)| diagnostic)
            .collect::<Vec<_>>();
        diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
        diagnostics
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }

    /// Indented dump of the subtree, one node or token per line.
    pub fn debug_dump(self) -> String {
        self.dump(false)
    }

    /// Like [`SyntaxNode::debug_dump`], with trivia lines around tokens.
    pub fn debug_dump_with_trivia(self) -> String {
        self.dump(true)
    }

    fn dump(self, with_trivia: bool) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    _ = writeln!(out, "{:indent$}{node:?}", "", indent = depth * 2);
                    depth += 1;
                }
                WalkEventWithTokens::LeaveNode(_) => depth -= 1,
                WalkEventWithTokens::Token(token) => {
                    let indent = depth * 2;
                    if with_trivia {
                        for trivia in token.leading_trivia() {
                            _ = writeln!(out, "{:indent$}{trivia:?} (leading)", "");
                        }
                    }
                    _ = writeln!(out, "{:indent$}{token:?}", "");
                    if with_trivia {
                        for trivia in token.trailing_trivia() {
                            _ = writeln!(out, "{:indent$}{trivia:?} (trailing)", "");
                        }
                    }
                }
            }
        }
        out
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.trimmed_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

/// Contents of a grammar slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxSlot<'a> {
    Node(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
    List(SyntaxList<'a>),
    /// An optional slot that the input left out.
    Empty,
}

impl<'a> SyntaxSlot<'a> {
    pub fn into_node(self) -> Option<SyntaxNode<'a>> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_token(self) -> Option<SyntaxToken<'a>> {
        match self {
            Self::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<SyntaxList<'a>> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

fn slot(tree: &TreeInner, child: Child) -> SyntaxSlot<'_> {
    match child {
        Child::Token(index) => SyntaxSlot::Token(SyntaxToken { tree, index }),
        Child::Node(index) => SyntaxSlot::Node(SyntaxNode { tree, index }),
        Child::List(index) => SyntaxSlot::List(SyntaxList { tree, index }),
        Child::Empty => SyntaxSlot::Empty,
    }
}

/// Iterator over the slots of a node or the elements of a list.
#[derive(Clone)]
pub struct Slots<'a> {
    tree: &'a TreeInner,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> Iterator for Slots<'a> {
    type Item = SyntaxSlot<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.children.next().map(|&child| slot(self.tree, child))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for Slots<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.children.next_back().map(|&child| slot(self.tree, child))
    }
}

impl ExactSizeIterator for Slots<'_> {}

/// Ordered sequence slot: nodes, interleaved with separator tokens for
/// separated lists.
#[derive(Clone, Copy)]
pub struct SyntaxList<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxList<'a> {
    /// Returns the number of elements, separators included.
    #[inline]
    pub fn len(self) -> usize {
        self.tree.list_children(self.index).len()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(self, index: usize) -> Option<SyntaxSlot<'a>> {
        self.tree.list_children(self.index).get(index).map(|&child| slot(self.tree, child))
    }

    /// Iterates all elements, separators and empty elements included.
    #[inline]
    pub fn iter(self) -> Slots<'a> {
        Slots { tree: self.tree, children: self.tree.list_children(self.index).iter() }
    }

    /// Iterates the node elements.
    #[inline]
    pub fn nodes(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.iter().filter_map(SyntaxSlot::into_node)
    }

    /// Iterates the separator tokens.
    #[inline]
    pub fn separators(self) -> impl DoubleEndedIterator<Item = SyntaxToken<'a>> + Clone {
        self.iter().filter_map(SyntaxSlot::into_token)
    }
}

impl PartialEq for SyntaxList<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxList<'_> {}

impl fmt::Debug for SyntaxList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over children including tokens, flattening lists and skipping
/// empty slots.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    active_list: Option<Slots<'a>>,
    slots: Slots<'a>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(list) = &mut self.active_list {
                match list.next() {
                    Some(SyntaxSlot::Node(it)) => return Some(NodeOrToken::Node(it)),
                    Some(SyntaxSlot::Token(it)) => return Some(NodeOrToken::Token(it)),
                    Some(SyntaxSlot::List(_) | SyntaxSlot::Empty) => continue,
                    None => self.active_list = None,
                }
            }

            match self.slots.next()? {
                SyntaxSlot::Node(it) => return Some(NodeOrToken::Node(it)),
                SyntaxSlot::Token(it) => return Some(NodeOrToken::Token(it)),
                SyntaxSlot::List(it) => self.active_list = Some(it.iter()),
                SyntaxSlot::Empty => {}
            }
        }
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl<'a> Preorder<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { inner: PreorderWithTokens::new(start) }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens with an explicit stack.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { stack: Vec::with_capacity(64), root: Some(start) }
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

impl<N: fmt::Display, T: fmt::Display> fmt::Display for NodeOrToken<N, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeOrToken::Node(node) => fmt::Display::fmt(node, f),
            NodeOrToken::Token(token) => fmt::Display::fmt(token, f),
        }
    }
}
