//! Recursive-descent parser for C# source text.
//!
//! Every parse produces a full-fidelity [`SyntaxTree`]: concatenating its
//! tokens and trivia reproduces the input byte for byte, whatever errors the
//! text contains. Problems are reported as [`Diagnostic`]s attached to the
//! tree instead of aborting the parse.

use std::sync::Arc;

pub use sharpie_syntax::{Diagnostic, SyntaxKind, SyntaxNode, SyntaxTree};
use sharpie_tokenizer::Tokenizer;

mod grammar;
mod options;
mod parser;
#[cfg(test)]
mod tests;

pub use options::{Feature, LanguageVersion, OptionsError, ParseOptions, SourceKind};

/// Result of parsing one text: the tree and its diagnostics.
#[derive(Clone)]
pub struct Parse {
    tree: Arc<SyntaxTree>,
    diagnostics: Arc<[Diagnostic]>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The root node. For expression and statement parses this is the
    /// wrapper holding the parsed element and the end-of-file token.
    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    /// The parsed element itself: the compilation unit, expression or
    /// statement.
    pub fn syntax(&self) -> SyntaxNode<'_> {
        let root = self.root();
        match root.kind() {
            SyntaxKind::EXPRESSION_ROOT | SyntaxKind::STATEMENT_ROOT => {
                root.children().next().unwrap_or(root)
            }
            _ => root,
        }
    }

    pub fn text(&self) -> &str {
        self.tree.text()
    }

    /// All diagnostics, ordered by position.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|diagnostic| diagnostic.is_error())
    }

    pub fn debug_dump(&self) -> String {
        self.root().debug_dump()
    }
}

impl std::fmt::Debug for Parse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parse")
            .field("tree", &self.tree)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

// SAFETY: the old value is only replaced, never read through an aliased pointer.
unsafe impl salsa::Update for Parse {
    unsafe fn maybe_update(old_pointer: *mut Self, new_value: Self) -> bool {
        let old_value = unsafe { &mut *old_pointer };
        if old_value.tree == new_value.tree {
            false
        } else {
            *old_value = new_value;
            true
        }
    }
}

pub fn parse(text: &str, options: &ParseOptions) -> Parse {
    let _span = tracing::debug_span!("parse", kind = ?options.kind, len = text.len()).entered();
    let tokenizer = Tokenizer::with_symbols(text, &options.preprocessor_symbols);
    let mut p = parser::Parser::new(tokenizer, options.language_version);
    let root = match options.kind {
        SourceKind::CompilationUnit => {
            grammar::compilation_unit(&mut p);
            SyntaxKind::COMPILATION_UNIT
        }
        SourceKind::Expression => {
            grammar::expression_root(&mut p);
            SyntaxKind::EXPRESSION_ROOT
        }
        SourceKind::Statement => {
            grammar::statement_root(&mut p);
            SyntaxKind::STATEMENT_ROOT
        }
    };
    let tree = p.build_tree(root);

    let mut diagnostics: Vec<Diagnostic> = tree.diagnostics().into_iter().cloned().collect();
    diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());
    tracing::debug!(diagnostics = diagnostics.len(), tokens = tree.token_count(), "parsed");

    Parse { tree: Arc::new(tree), diagnostics: diagnostics.into() }
}

pub fn parse_compilation_unit(text: &str) -> Parse {
    parse(text, &ParseOptions::default())
}

pub fn parse_expression(text: &str) -> Parse {
    parse(text, &ParseOptions::default().with_kind(SourceKind::Expression))
}

pub fn parse_statement(text: &str) -> Parse {
    parse(text, &ParseOptions::default().with_kind(SourceKind::Statement))
}
