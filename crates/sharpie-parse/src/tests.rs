mod ast;
mod exprs;
mod items;
mod recovery;
mod stmts;

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

use sharpie_syntax::{NodeOrToken, SyntaxKind, SyntaxNode};

use crate::{Parse, parse_compilation_unit};

/// One-line rendering of a subtree: `(KIND children...)` for nodes, the
/// token text for tokens and `<KIND>` for missing tokens. Empty slots and
/// the end-of-file token are left out.
pub(super) fn sexp(node: SyntaxNode<'_>) -> String {
    let mut out = String::new();
    write_sexp(&mut out, node);
    out
}

fn write_sexp(out: &mut String, node: SyntaxNode<'_>) {
    _ = write!(out, "({:?}", node.kind());
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(node) => {
                out.push(' ');
                write_sexp(out, node);
            }
            NodeOrToken::Token(token) if token.kind() == SyntaxKind::EOF => {}
            NodeOrToken::Token(token) if token.is_missing() => {
                _ = write!(out, " <{:?}>", token.kind());
            }
            NodeOrToken::Token(token) => {
                out.push(' ');
                out.push_str(token.text_trimmed());
            }
        }
    }
    out.push(')');
}

/// Diagnostic codes in source order, space separated.
pub(super) fn codes(parse: &Parse) -> String {
    parse.diagnostics().iter().map(|d| d.code().to_string()).collect::<Vec<_>>().join(" ")
}

/// Properties every parse must have, whatever the input.
pub(super) fn check_invariants(text: &str, parse: &Parse) {
    let root = parse.root();
    assert_eq!(root.text(), text, "tree does not reproduce its input");

    let len = text.len() as u32;
    for diagnostic in parse.diagnostics() {
        assert!(u32::from(diagnostic.range().end()) <= len, "{diagnostic:?} is out of bounds");
    }
    let starts = parse.diagnostics().iter().map(|d| d.range().start()).collect::<Vec<_>>();
    assert!(starts.is_sorted(), "diagnostics are not in source order");

    let printed = root.text_trimmed();
    let reparsed = parse_compilation_unit(printed);
    if root.kind() == SyntaxKind::COMPILATION_UNIT {
        assert_eq!(reparsed.root().text_trimmed(), printed, "printed text does not reprint");
    }
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    text: String,
}

impl TestCase {
    fn list(dir: &str) -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data").join(dir);

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "cs" {
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

#[test]
fn valid_sources_parse_cleanly() {
    let cases = TestCase::list("ok");
    assert!(!cases.is_empty());

    for case in cases {
        let parse = parse_compilation_unit(&case.text);
        check_invariants(&case.text, &parse);
        let errors = parse.errors().map(|d| format!("  {d:?}")).collect::<Vec<_>>();
        assert!(errors.is_empty(), "{}:\n{}", case.input.display(), errors.join("\n"));
    }
}

#[test]
fn malformed_sources_keep_their_text() {
    let cases = TestCase::list("err");
    assert!(!cases.is_empty());

    for case in cases {
        let parse = parse_compilation_unit(&case.text);
        check_invariants(&case.text, &parse);
        assert!(parse.errors().next().is_some(), "{}: expected errors", case.input.display());
    }
}

#[test]
fn every_prefix_round_trips() {
    let text = r#"
using System;
namespace N {
    class C<T> : B where T : new() {
        int x = 1 << 2;
        public T M(int a, params object[] b) { return a > 0 ? (T)b[0] : default(T); }
    }
}
"#;
    for end in (0..=text.len()).filter(|&end| text.is_char_boundary(end)) {
        let prefix = &text[..end];
        let parse = parse_compilation_unit(prefix);
        assert_eq!(parse.root().text(), prefix);
    }
}

#[test]
fn debug_dump_marks_missing_tokens() {
    let parse = crate::parse_statement("return");
    let dump = parse.debug_dump();
    expect_test::expect![[r#"
        STATEMENT_ROOT@0..6
          RETURN_STATEMENT@0..6
            RETURN_KW@0..6 "return"
            SEMICOLON@6..6 missing
          EOF@6..6 ""
    "#]]
    .assert_eq(&dump);
}

#[test]
fn debug_dump_with_trivia_shows_where_trivia_attaches() {
    let parse = crate::parse_statement(" return; // done\n");
    let dump = parse.root().debug_dump_with_trivia();
    expect_test::expect![[r#"
        STATEMENT_ROOT@1..17
          RETURN_STATEMENT@1..8
            WHITESPACE@0..1 " " (leading)
            RETURN_KW@1..7 "return"
            SEMICOLON@7..8 ";"
            WHITESPACE@8..9 " " (trailing)
            LINE_COMMENT@9..16 "// done" (trailing)
            NEWLINE@16..17 "\n" (trailing)
          EOF@17..17 ""
    "#]]
    .assert_eq(&dump);
}
