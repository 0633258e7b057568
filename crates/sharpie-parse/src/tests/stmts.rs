use expect_test::expect;
use sharpie_syntax::SyntaxKind;

use super::{check_invariants, codes, sexp};
use crate::{LanguageVersion, ParseOptions, SourceKind, parse, parse_statement};

fn check_kind(text: &str, kind: SyntaxKind) {
    let parse = parse_statement(text);
    check_invariants(text, &parse);
    assert_eq!(parse.syntax().kind(), kind, "{text}");
    assert_eq!(codes(&parse), "", "{text}");
}

#[test]
fn statement_forms_parse_cleanly() {
    for (text, kind) in [
        ("{ }", SyntaxKind::BLOCK),
        (";", SyntaxKind::EMPTY_STATEMENT),
        ("int x = 1, y;", SyntaxKind::LOCAL_DECLARATION_STATEMENT),
        ("var (a, b) = t;", SyntaxKind::EXPRESSION_STATEMENT),
        ("const int x = 1;", SyntaxKind::LOCAL_DECLARATION_STATEMENT),
        ("ref int r = ref a[0];", SyntaxKind::LOCAL_DECLARATION_STATEMENT),
        ("List<int> xs = null;", SyntaxKind::LOCAL_DECLARATION_STATEMENT),
        ("int F(int x) => x;", SyntaxKind::LOCAL_FUNCTION_STATEMENT),
        ("static void G() { }", SyntaxKind::LOCAL_FUNCTION_STATEMENT),
        ("x = y;", SyntaxKind::EXPRESSION_STATEMENT),
        ("a < b;", SyntaxKind::EXPRESSION_STATEMENT),
        ("if (a) b(); else { c(); }", SyntaxKind::IF_STATEMENT),
        ("while (true) break;", SyntaxKind::WHILE_STATEMENT),
        ("do x++; while (x < 10);", SyntaxKind::DO_STATEMENT),
        ("for (int i = 0, j = 1; i < n; i++, j--) { continue; }", SyntaxKind::FOR_STATEMENT),
        ("for (;;) { }", SyntaxKind::FOR_STATEMENT),
        ("foreach (var x in xs) { }", SyntaxKind::FOREACH_STATEMENT),
        ("foreach (var (a, b) in xs) { }", SyntaxKind::FOREACH_VARIABLE_STATEMENT),
        ("using (var f = Open()) { }", SyntaxKind::USING_STATEMENT),
        ("using (f) g();", SyntaxKind::USING_STATEMENT),
        ("using var f = Open();", SyntaxKind::LOCAL_DECLARATION_STATEMENT),
        ("lock (o) { }", SyntaxKind::LOCK_STATEMENT),
        ("checked { }", SyntaxKind::CHECKED_STATEMENT),
        ("unsafe { }", SyntaxKind::UNSAFE_STATEMENT),
        ("fixed (int* p = &a) { }", SyntaxKind::FIXED_STATEMENT),
        ("label: x();", SyntaxKind::LABELED_STATEMENT),
        ("goto label;", SyntaxKind::GOTO_STATEMENT),
        ("return;", SyntaxKind::RETURN_STATEMENT),
        ("throw new E();", SyntaxKind::THROW_STATEMENT),
        ("yield return 1;", SyntaxKind::YIELD_RETURN_STATEMENT),
        ("yield break;", SyntaxKind::YIELD_BREAK_STATEMENT),
        ("try { } catch (E e) when (e != null) { } finally { }", SyntaxKind::TRY_STATEMENT),
        ("try { } catch { }", SyntaxKind::TRY_STATEMENT),
        (
            "switch (x) { case 1: case 2: break; case int y when y > 0: goto case 1; default: goto default; }",
            SyntaxKind::SWITCH_STATEMENT,
        ),
        ("var q = from c in cs select c;", SyntaxKind::LOCAL_DECLARATION_STATEMENT),
    ] {
        check_kind(text, kind);
    }
}

#[test]
fn await_is_an_identifier_outside_async_code() {
    check_kind("Task.await Task;", SyntaxKind::LOCAL_DECLARATION_STATEMENT);
    check_kind("await(x);", SyntaxKind::EXPRESSION_STATEMENT);
}

#[test]
fn await_in_async_local_function() {
    let text = "async Task F() { await t; }";
    let parse = parse_statement(text);
    check_invariants(text, &parse);
    assert_eq!(codes(&parse), "");
    let await_expression = parse
        .syntax()
        .preorder()
        .filter_map(|event| match event {
            sharpie_syntax::WalkEvent::Enter(node) => Some(node),
            sharpie_syntax::WalkEvent::Leave(_) => None,
        })
        .find(|node| node.kind() == SyntaxKind::AWAIT_EXPRESSION);
    assert!(await_expression.is_some());
}

#[test]
fn await_as_identifier_inside_async_code() {
    let text = "async Task F() { Task.await Task; }";
    let parse = parse_statement(text);
    check_invariants(text, &parse);
    assert_eq!(codes(&parse), "CS4003");
    let kinds = parse
        .syntax()
        .preorder()
        .filter_map(|event| match event {
            sharpie_syntax::WalkEvent::Enter(node) => Some(node.kind()),
            sharpie_syntax::WalkEvent::Leave(_) => None,
        })
        .collect::<Vec<_>>();
    assert!(kinds.contains(&SyntaxKind::LOCAL_DECLARATION_STATEMENT));
    assert!(!kinds.contains(&SyntaxKind::AWAIT_EXPRESSION));
}

#[test]
fn if_statement_shape() {
    let parse = parse_statement("if (a) b; else c;");
    expect![[r#"(IF_STATEMENT if ( (IDENTIFIER_NAME a) ) (EXPRESSION_STATEMENT (IDENTIFIER_NAME b) ;) (ELSE_CLAUSE else (EXPRESSION_STATEMENT (IDENTIFIER_NAME c) ;)))"#]]
    .assert_eq(&sexp(parse.syntax()));
}

#[test]
fn declarations_are_not_embedded_statements() {
    let parse = parse_statement("if (a) int x = 1;");
    check_invariants("if (a) int x = 1;", &parse);
    assert_eq!(codes(&parse), "CS1023");
}

#[test]
fn missing_semicolon_is_reported_after_previous_token() {
    let parse = parse_statement("x = 1");
    assert_eq!(codes(&parse), "CS1002");
    let range = parse.diagnostics()[0].range();
    assert_eq!((u32::from(range.start()), u32::from(range.end())), (5, 5));
}

#[test]
fn newer_statements_are_gated() {
    for (version, text, expected) in [
        (LanguageVersion::CSharp6, "int F() => 1;", "CS8059"),
        (LanguageVersion::CSharp7_3, "static int F() => 1;", "CS8370"),
        (LanguageVersion::CSharp7_3, "using var f = g;", "CS8370"),
        (LanguageVersion::CSharp5, "try { } catch when (e) { }", "CS8026"),
    ] {
        let options =
            ParseOptions::default().with_kind(SourceKind::Statement).with_language_version(version);
        let parse = parse(text, &options);
        check_invariants(text, &parse);
        assert_eq!(codes(&parse), expected, "{text}");
    }
}
