use expect_test::expect;
use sharpie_syntax::{SyntaxKind, WalkEvent};

use super::{check_invariants, codes, sexp};
use crate::{Parse, parse_compilation_unit, parse_expression, parse_statement};

fn check_codes(text: &str, expected: &str) {
    let parse = parse_compilation_unit(text);
    check_invariants(text, &parse);
    assert_eq!(codes(&parse), expected, "{text}");
}

#[test]
fn missing_expression_terms() {
    check_codes("class C { void M() { int x = ; } }", "CS1525");
    check_codes("class C { void M() { f(a, ); } }", "CS1733");
}

#[test]
fn missing_semicolon() {
    check_codes("class C { void M() { x = 1 } }", "CS1002");
}

#[test]
fn missing_tokens_at_one_offset_are_reported_once() {
    check_codes("class C {", "CS1513");
    check_codes("class C { void M() {", "CS1513");
    check_codes("class C { void M() { int x = 1", "CS1002");
    check_codes("namespace N { class C {", "CS1513");
}

#[test]
fn invalid_member_tokens() {
    check_codes("class C { int }", "CS1519");
    check_codes("class C { void M() { } ; }", "CS1597");
}

#[test]
fn unexpected_characters_are_trivia() {
    check_codes("class C { void M() { x = 1 ` 2; } }", "CS1002 CS1056");
}

#[test]
fn deep_nesting_overflows_into_skipped_text() {
    let depth = 300;
    let text = format!("class C {{ void M() {{ {}{} }} }}", "{".repeat(depth), "}".repeat(depth));
    let parse = parse_compilation_unit(&text);
    assert_eq!(parse.root().text(), text);
    assert_eq!(parse.root().kind(), SyntaxKind::COMPILATION_UNIT);
    assert_eq!(codes(&parse), "CS8078");

    let text = "{".repeat(depth);
    let parse = parse_statement(&text);
    assert_eq!(parse.root().text(), text);
    assert_eq!(
        sexp(parse.root()),
        "(STATEMENT_ROOT (EXPRESSION_STATEMENT (IDENTIFIER_NAME <IDENT>) <SEMICOLON>))"
    );
    assert_eq!(parse.syntax().kind(), SyntaxKind::EXPRESSION_STATEMENT);
    assert_eq!(codes(&parse), "CS8078");

    let text = format!("{}x{}", "f(".repeat(depth), ")".repeat(depth));
    let parse = parse_expression(&text);
    assert_eq!(parse.root().text(), text);
    assert_eq!(sexp(parse.root()), "(EXPRESSION_ROOT (IDENTIFIER_NAME <IDENT>))");
    assert_eq!(parse.syntax().kind(), SyntaxKind::IDENTIFIER_NAME);
    assert_eq!(codes(&parse), "CS8078");
}

#[test]
fn nested_type_arguments_share_the_nesting_limit() {
    let nested = |n: usize| format!("{}int{} x;", "List<".repeat(n), ">".repeat(n));

    let text = nested(90);
    let parse = parse_statement(&text);
    check_invariants(&text, &parse);
    assert_eq!(parse.syntax().kind(), SyntaxKind::LOCAL_DECLARATION_STATEMENT);
    assert_eq!(codes(&parse), "");

    let text = nested(300);
    let parse = parse_statement(&text);
    assert_eq!(parse.root().text(), text);
    assert_eq!(parse.root().kind(), SyntaxKind::STATEMENT_ROOT);
    assert_eq!(codes(&parse), "CS8078");
}

/// Parses `{ var added = ImmutableDictionary<ARGUMENTS, IImmutableDictionary<X, Y>>
/// ProjectChange = projectChange; }` and returns the initializer's kind and the
/// block's statements.
fn initializer_before_missing_semicolon(arguments: &str) -> (SyntaxKind, Vec<SyntaxKind>, Parse) {
    let text = format!(
        "{{ var added = ImmutableDictionary<{arguments}, IImmutableDictionary<X, Y>>\n\n    ProjectChange = projectChange; }}"
    );
    let parse = parse_statement(&text);
    check_invariants(&text, &parse);
    let block = parse.syntax();
    assert_eq!(block.kind(), SyntaxKind::BLOCK);
    let value = block
        .preorder()
        .find_map(|event| match event {
            WalkEvent::Enter(node) if node.kind() == SyntaxKind::EQUALS_VALUE_CLAUSE => {
                node.children().next()
            }
            _ => None,
        })
        .map_or(SyntaxKind::TOMBSTONE, |value| value.kind());
    let statements = block.children().map(|statement| statement.kind()).collect();
    (value, statements, parse)
}

#[test]
fn type_only_arguments_make_a_generic_name() {
    for arguments in ["string", "X[]", "int*", "A?", "T<S>"] {
        let (value, statements, parse) = initializer_before_missing_semicolon(arguments);
        assert_eq!(value, SyntaxKind::GENERIC_NAME, "{arguments}");
        assert_eq!(
            statements,
            [SyntaxKind::LOCAL_DECLARATION_STATEMENT, SyntaxKind::EXPRESSION_STATEMENT],
            "{arguments}"
        );
        assert_eq!(codes(&parse), "CS1002", "{arguments}");
    }
}

#[test]
fn ambiguous_arguments_stay_relational() {
    for arguments in ["X*", "(int, string)", "(A)"] {
        let (value, _, parse) = initializer_before_missing_semicolon(arguments);
        assert_eq!(value, SyntaxKind::LESS_THAN_EXPRESSION, "{arguments}");
        assert!(parse.errors().next().is_some(), "{arguments}");
    }
}

#[test]
fn local_declarators_end_at_a_missing_comma() {
    let parse = parse_statement("{ int x = 1 y = 2; }");
    check_invariants("{ int x = 1 y = 2; }", &parse);
    expect![[r#"(BLOCK { (LOCAL_DECLARATION_STATEMENT (VARIABLE_DECLARATION (PREDEFINED_TYPE int) (VARIABLE_DECLARATOR x (EQUALS_VALUE_CLAUSE = (NUMERIC_LITERAL_EXPRESSION 1)))) <SEMICOLON>) (EXPRESSION_STATEMENT (SIMPLE_ASSIGNMENT_EXPRESSION (IDENTIFIER_NAME y) = (NUMERIC_LITERAL_EXPRESSION 2)) ;) })"#]]
        .assert_eq(&sexp(parse.syntax()));
    assert_eq!(codes(&parse), "CS1002");

    check_codes("class C { int x = 1 y = 2; }", "CS1003");
}

#[test]
fn every_token_is_kept_after_errors() {
    for text in [
        "class { void } int ) ] namespace",
        "using ; extern ; [assembly:",
        "class C { void M() { if ( while ) for (;; } }",
        "class C<,> : where { operator }",
        "enum E { A = , , B }",
        "class C { int this[] { get } }",
        "x => => y",
        "$\"{\" + \"}\"",
    ] {
        let parse = parse_compilation_unit(text);
        check_invariants(text, &parse);
        assert!(parse.errors().next().is_some(), "{text}");
    }
}
