//! Incremental builder for the immutable syntax tree.

use std::sync::Arc;

use sharpie_errors::Diagnostic;
use text_size::TextSize;

use crate::nodes::{AttachedTrivia, Child, List, Node, Nodes, Token, TreeInner};
use crate::{SyntaxKind, SyntaxTree, TokenValue, TriviaPiece, TriviaPieceKind};

struct PendingNode {
    node: usize,
    children: Vec<Child>,
}

struct PendingList {
    list: usize,
    children: Vec<Child>,
}

enum Opened {
    Node(PendingNode),
    List(PendingList),
}

/// Builds a `SyntaxTree` from parser events.
///
/// Nodes are started and finished in document order; tokens and their trivia
/// are appended to a flat array, and every token belongs to the innermost
/// opened node.
pub struct Builder {
    text: Box<str>,
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    node_children: Vec<Child>,
    lists: Vec<List>,
    list_children: Vec<Child>,
    values: Vec<(u32, TokenValue)>,
    diagnostics: Vec<(u32, Diagnostic)>,

    children_pool: Vec<Vec<Child>>,
    opened: Vec<Opened>,
    /// Skipped text waiting to become leading trivia of the next token.
    pending_trivia: Vec<TriviaPiece>,
    text_len: TextSize,
    last_token: Option<u32>,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_CHILDREN_LEN: usize = 8;

impl Builder {
    /// Creates a new builder for `text`.
    ///
    /// The token buffer is seeded with a fake token at index 0 so every token
    /// can read its start from its predecessor.
    pub fn new(text: &str) -> Self {
        let capacity = text.len() / 4 + 16;
        let mut tokens = Vec::with_capacity(capacity);
        tokens.push(Token {
            kind: SyntaxKind::TOMBSTONE,
            attached_trivia: AttachedTrivia::NONE,
            end: TextSize::new(0),
            parent: 0,
        });
        Self {
            text: text.into(),
            tokens,
            nodes: Vec::with_capacity(capacity / 2),
            node_children: Vec::with_capacity(capacity),
            lists: Vec::new(),
            list_children: Vec::new(),
            values: Vec::new(),
            diagnostics: Vec::new(),

            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            pending_trivia: Vec::new(),
            text_len: TextSize::new(0),
            last_token: None,
        }
    }

    fn new_children_vec(&mut self) -> Vec<Child> {
        self.children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    fn recycle_children_vec(&mut self, mut vec: Vec<Child>) {
        vec.clear();
        self.children_pool.push(vec);
    }

    /// Index of the innermost opened node, skipping lists.
    fn current_node(&self) -> u32 {
        self.opened
            .iter()
            .rev()
            .find_map(|opened| match opened {
                Opened::Node(node) => Some(node.node as u32),
                Opened::List(_) => None,
            })
            .unwrap_or(0)
    }

    fn push_child(&mut self, child: Child) {
        match self.opened.last_mut() {
            Some(Opened::Node(node)) => node.children.push(child),
            Some(Opened::List(list)) => list.children.push(child),
            None => panic!("no opened node"),
        }
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        debug_assert!(kind.is_node(), "{kind:?} is not a node kind");
        let parent = if self.opened.is_empty() {
            assert!(self.nodes.is_empty(), "a tree has a single root");
            Node::NO_PARENT
        } else {
            self.current_node()
        };
        let node = self.nodes.len();
        self.nodes.push(Node {
            parent,
            kind,
            children_start: 0,
            children_len: 0,
            first_token: self.tokens.len() as u32,
            last_token: 0,
            subtree_end: 0,
        });
        if !self.opened.is_empty() {
            self.push_child(Child::Node(node as u32));
        }
        let children = self.new_children_vec();
        self.opened.push(Opened::Node(PendingNode { node, children }));
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let Some(Opened::Node(PendingNode { node, children })) = self.opened.pop() else {
            panic!("expected an opened node");
        };
        let subtree_end = self.nodes.len() as u32;
        let last_token = self.tokens.len() as u32 - 1;
        let children_start = self.node_children.len() as u32;
        self.node_children.extend_from_slice(&children);
        let node = &mut self.nodes[node];
        node.children_start = children_start;
        node.children_len = children.len() as u32;
        node.last_token = last_token;
        node.subtree_end = subtree_end;
        self.recycle_children_vec(children);
    }

    /// Starts a list in the current node's next slot.
    pub fn start_list(&mut self) {
        assert!(
            matches!(self.opened.last(), Some(Opened::Node(_))),
            "lists can only be nested directly in nodes"
        );
        let list = self.lists.len();
        self.lists.push(List { children_start: 0, children_len: 0 });
        self.push_child(Child::List(list as u32));
        let children = self.new_children_vec();
        self.opened.push(Opened::List(PendingList { list, children }));
    }

    /// Finishes the most recently started list.
    pub fn finish_list(&mut self) {
        let Some(Opened::List(PendingList { list, children })) = self.opened.pop() else {
            panic!("expected an opened list");
        };
        let children_start = self.list_children.len() as u32;
        self.list_children.extend_from_slice(&children);
        self.lists[list] =
            List { children_start, children_len: children.len() as u32 };
        self.recycle_children_vec(children);
    }

    /// Fills the next slot with an explicit absence.
    pub fn empty(&mut self) {
        self.push_child(Child::Empty);
    }

    fn push_text_len(&mut self, len: TextSize) -> TextSize {
        self.text_len += len;
        assert!(self.text.is_char_boundary(usize::from(self.text_len)));
        self.text_len
    }

    fn push_trivia(&mut self, piece: TriviaPiece, attached_trivia: AttachedTrivia, parent: u32) {
        let end = self.push_text_len(piece.len);
        self.tokens.push(Token { kind: piece.kind.to_syntax_kind(), attached_trivia, end, parent });
    }

    /// Adds a token with its leading and trailing trivia.
    pub fn token(
        &mut self,
        leading_trivia: &[TriviaPiece],
        kind: SyntaxKind,
        text_len: TextSize,
        trailing_trivia: &[TriviaPiece],
    ) {
        debug_assert!(kind.is_token() && !kind.is_trivia(), "{kind:?} is not a token kind");
        let parent = self.current_node();
        let pending = std::mem::take(&mut self.pending_trivia);
        let leading_len = pending.len() + leading_trivia.len();
        for &piece in pending.iter().chain(leading_trivia) {
            self.push_trivia(piece, AttachedTrivia::NONE, parent);
        }
        self.pending_trivia = pending;
        self.pending_trivia.clear();

        let token = self.tokens.len() as u32;
        let end = self.push_text_len(text_len);
        self.tokens.push(Token {
            kind,
            attached_trivia: AttachedTrivia::new(
                leading_len != 0,
                !trailing_trivia.is_empty(),
                leading_len,
            ),
            end,
            parent,
        });
        self.push_child(Child::Token(token));
        for (index, &piece) in trailing_trivia.iter().enumerate() {
            let attached = if index == 0 {
                AttachedTrivia::new(false, false, trailing_trivia.len())
            } else {
                AttachedTrivia::NONE
            };
            self.push_trivia(piece, attached, parent);
        }
        self.last_token = Some(token);
    }

    /// Adds a zero-width token that the input lacked.
    pub fn missing(&mut self, kind: SyntaxKind) {
        let parent = self.current_node();
        let token = self.tokens.len() as u32;
        self.tokens.push(Token {
            kind,
            attached_trivia: AttachedTrivia::MISSING,
            end: self.text_len,
            parent,
        });
        self.push_child(Child::Token(token));
        self.last_token = Some(token);
    }

    /// Turns a token the parser could not use into leading trivia of the next
    /// token.
    pub fn skipped(
        &mut self,
        leading_trivia: &[TriviaPiece],
        text_len: TextSize,
        trailing_trivia: &[TriviaPiece],
    ) {
        self.pending_trivia.extend_from_slice(leading_trivia);
        self.pending_trivia.push(TriviaPiece::new(TriviaPieceKind::SkippedTokens, text_len));
        self.pending_trivia.extend_from_slice(trailing_trivia);
    }

    /// Attaches a value to the most recent token.
    pub fn value(&mut self, value: TokenValue) {
        let token = self.last_token.expect("value without a token");
        self.values.push((token, value));
    }

    /// Attaches a diagnostic to the innermost opened node.
    pub fn error(&mut self, diagnostic: Diagnostic) {
        let owner = self.current_node();
        self.diagnostics.push((owner, diagnostic));
    }

    /// Finishes building and returns the immutable `SyntaxTree`.
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes");
        assert!(!self.nodes.is_empty(), "empty tree");
        assert!(self.pending_trivia.is_empty(), "skipped text after the last token");
        assert_eq!(usize::from(self.text_len), self.text.len(), "text was not fully consumed");

        self.diagnostics.sort_by_key(|&(owner, _)| owner);
        let tree = TreeInner {
            text: std::mem::take(&mut self.text),
            tokens: std::mem::take(&mut self.tokens).into_boxed_slice(),
            nodes: Nodes {
                nodes: std::mem::take(&mut self.nodes).into_boxed_slice(),
                node_children: std::mem::take(&mut self.node_children).into_boxed_slice(),
                lists: std::mem::take(&mut self.lists).into_boxed_slice(),
                list_children: std::mem::take(&mut self.list_children).into_boxed_slice(),
            },
            values: std::mem::take(&mut self.values).into_boxed_slice(),
            diagnostics: std::mem::take(&mut self.diagnostics).into_boxed_slice(),
        };
        SyntaxTree { tree: Arc::new(tree) }
    }
}

#[cfg(test)]
mod tests {
    use sharpie_errors::{ErrorCode, TextRange};

    use super::*;
    use crate::SyntaxKind::*;

    fn ws(len: u32) -> TriviaPiece {
        TriviaPiece::new(TriviaPieceKind::Whitespace, TextSize::new(len))
    }

    #[test]
    fn builds_nodes_with_missing_and_skipped_tokens() {
        let text = "extern ) a;";
        let mut builder = Builder::new(text);
        builder.start_node(COMPILATION_UNIT);
        builder.start_list();
        builder.start_node(EXTERN_ALIAS_DIRECTIVE);
        builder.token(&[], EXTERN_KW, TextSize::new(6), &[ws(1)]);
        builder.missing(ALIAS_KW);
        builder.error(Diagnostic::with_argument(
            ErrorCode::SyntaxError,
            TextRange::empty(TextSize::new(6)),
            "alias",
        ));
        builder.skipped(&[], TextSize::new(1), &[ws(1)]);
        builder.token(&[], IDENT, TextSize::new(1), &[]);
        builder.token(&[], SEMICOLON, TextSize::new(1), &[]);
        builder.finish_node();
        builder.finish_list();
        builder.token(&[], EOF, TextSize::new(0), &[]);
        builder.finish_node();
        let tree = builder.finish();

        let root = tree.root();
        assert_eq!(root.text(), text);
        let directive = root.children().next().unwrap();
        assert_eq!(directive.kind(), EXTERN_ALIAS_DIRECTIVE);
        assert_eq!(directive.diagnostics().len(), 1);
        assert_eq!(root.all_diagnostics().len(), 1);
        assert_eq!(root.diagnostics().len(), 0);

        let tokens = directive.children_with_tokens().filter_map(|it| it.into_token());
        let tokens = tokens.collect::<Vec<_>>();
        assert!(tokens[1].is_missing());
        assert_eq!(tokens[1].text_range(), TextRange::empty(TextSize::new(7)));
        assert_eq!(tokens[2].text(), ") a");
        assert_eq!(tokens[2].leading_trivia().map(|it| it.kind()).collect::<Vec<_>>(), [
            SKIPPED_TOKENS,
            WHITESPACE
        ]);
    }
}
