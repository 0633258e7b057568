use expect_test::{Expect, expect};
use sharpie_syntax::SyntaxKind;

use super::{check_invariants, codes, sexp};
use crate::{LanguageVersion, ParseOptions, SourceKind, parse, parse_expression};

fn check(text: &str, expected: Expect) {
    let parse = parse_expression(text);
    check_invariants(text, &parse);
    let actual = format!("{}\n{}", sexp(parse.syntax()), codes(&parse));
    expected.assert_eq(actual.trim_end());
}

fn check_codes_at(version: LanguageVersion, text: &str, expected: &str) {
    let options = ParseOptions::default()
        .with_kind(SourceKind::Expression)
        .with_language_version(version);
    let parse = parse(text, &options);
    check_invariants(text, &parse);
    assert_eq!(codes(&parse), expected, "{text}");
}

#[test]
fn shift_is_left_associative() {
    check(
        "1 << 2 << 3",
        expect![[r#"(LEFT_SHIFT_EXPRESSION (LEFT_SHIFT_EXPRESSION (NUMERIC_LITERAL_EXPRESSION 1) << (NUMERIC_LITERAL_EXPRESSION 2)) << (NUMERIC_LITERAL_EXPRESSION 3))"#]],
    );
}

#[test]
fn precedence_ladder() {
    check(
        "a + b * c",
        expect![[r#"(ADD_EXPRESSION (IDENTIFIER_NAME a) + (MULTIPLY_EXPRESSION (IDENTIFIER_NAME b) * (IDENTIFIER_NAME c)))"#]],
    );
    check(
        "a = b = c",
        expect![[r#"(SIMPLE_ASSIGNMENT_EXPRESSION (IDENTIFIER_NAME a) = (SIMPLE_ASSIGNMENT_EXPRESSION (IDENTIFIER_NAME b) = (IDENTIFIER_NAME c)))"#]],
    );
    check(
        "a ?? b ?? c",
        expect![[r#"(COALESCE_EXPRESSION (IDENTIFIER_NAME a) ?? (COALESCE_EXPRESSION (IDENTIFIER_NAME b) ?? (IDENTIFIER_NAME c)))"#]],
    );
    check(
        "a || b && c",
        expect![[r#"(LOGICAL_OR_EXPRESSION (IDENTIFIER_NAME a) || (LOGICAL_AND_EXPRESSION (IDENTIFIER_NAME b) && (IDENTIFIER_NAME c)))"#]],
    );
    check(
        "-a * b",
        expect![[r#"(MULTIPLY_EXPRESSION (UNARY_MINUS_EXPRESSION - (IDENTIFIER_NAME a)) * (IDENTIFIER_NAME b))"#]],
    );
}

#[test]
fn conditional_is_right_associative() {
    check(
        "a ? b : c ? d : e",
        expect![[r#"(CONDITIONAL_EXPRESSION (IDENTIFIER_NAME a) ? (IDENTIFIER_NAME b) : (CONDITIONAL_EXPRESSION (IDENTIFIER_NAME c) ? (IDENTIFIER_NAME d) : (IDENTIFIER_NAME e)))"#]],
    );
}

#[test]
fn less_than_before_shift() {
    check(
        "a < i >> 2",
        expect![[r#"(LESS_THAN_EXPRESSION (IDENTIFIER_NAME a) < (RIGHT_SHIFT_EXPRESSION (IDENTIFIER_NAME i) >> (NUMERIC_LITERAL_EXPRESSION 2)))"#]],
    );
}

#[test]
fn generic_name_after_is_closes_with_first_greater_than() {
    check(
        "e is a < i >> 2",
        expect![[r#"(GREATER_THAN_EXPRESSION (IS_EXPRESSION (IDENTIFIER_NAME e) is (GENERIC_NAME a (TYPE_ARGUMENT_LIST < (IDENTIFIER_NAME i) >))) > (NUMERIC_LITERAL_EXPRESSION 2))"#]],
    );
}

#[test]
fn separated_greater_thans_do_not_shift() {
    check(
        "a > > b",
        expect![[r#"
            (GREATER_THAN_EXPRESSION (GREATER_THAN_EXPRESSION (IDENTIFIER_NAME a) > (IDENTIFIER_NAME <IDENT>)) > (IDENTIFIER_NAME b))
            CS1525"#]],
    );
}

#[test]
fn generic_invocation() {
    check(
        "f<int>(x)",
        expect![[r#"(INVOCATION_EXPRESSION (GENERIC_NAME f (TYPE_ARGUMENT_LIST < (PREDEFINED_TYPE int) >)) (ARGUMENT_LIST ( (ARGUMENT (IDENTIFIER_NAME x)) )))"#]],
    );
}

#[test]
fn relational_arguments_are_not_declarations() {
    check(
        "f(a < b, c > d)",
        expect![[r#"(INVOCATION_EXPRESSION (IDENTIFIER_NAME f) (ARGUMENT_LIST ( (ARGUMENT (LESS_THAN_EXPRESSION (IDENTIFIER_NAME a) < (IDENTIFIER_NAME b))) , (ARGUMENT (GREATER_THAN_EXPRESSION (IDENTIFIER_NAME c) > (IDENTIFIER_NAME d))) )))"#]],
    );
    check(
        "f(int x)",
        expect![[r#"
            (INVOCATION_EXPRESSION (IDENTIFIER_NAME f) (ARGUMENT_LIST ( (ARGUMENT (PREDEFINED_TYPE int)) <COMMA> (ARGUMENT (IDENTIFIER_NAME x)) )))
            CS1003"#]],
    );
}

#[test]
fn out_arguments_and_tuple_elements_declare() {
    check(
        "f(out int x)",
        expect![[r#"(INVOCATION_EXPRESSION (IDENTIFIER_NAME f) (ARGUMENT_LIST ( (ARGUMENT out (DECLARATION_EXPRESSION (PREDEFINED_TYPE int) (SINGLE_VARIABLE_DESIGNATION x))) )))"#]],
    );
    let parse = parse_expression("(int x, string y)");
    check_invariants("(int x, string y)", &parse);
    assert_eq!(parse.syntax().kind(), SyntaxKind::TUPLE_EXPRESSION);
    assert_eq!(sexp(parse.syntax()).matches("DECLARATION_EXPRESSION").count(), 2);
    assert_eq!(codes(&parse), "");

    check_codes_at(LanguageVersion::CSharp6, "f(out int x)", "CS8059");
}

#[test]
fn range_operands_are_optional() {
    for text in ["..", "a..", "..b", "a..b", "^1..^0"] {
        let parse = parse_expression(text);
        check_invariants(text, &parse);
        assert_eq!(parse.syntax().kind(), SyntaxKind::RANGE_EXPRESSION, "{text}");
        assert_eq!(codes(&parse), "", "{text}");
    }
}

#[test]
fn deep_parentheses_do_not_recurse() {
    let depth = 2000;
    let text = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let parse = parse_expression(&text);
    assert_eq!(parse.root().text(), text);
    assert_eq!(parse.syntax().kind(), SyntaxKind::PARENTHESIZED_EXPRESSION);
    assert_eq!(codes(&parse), "");

    let text = format!("{}x", "- ".repeat(depth));
    let parse = parse_expression(&text);
    assert_eq!(parse.syntax().kind(), SyntaxKind::UNARY_MINUS_EXPRESSION);
    assert_eq!(codes(&parse), "");

    let text = vec!["x"; depth].join(" + ");
    let parse = parse_expression(&text);
    assert_eq!(parse.syntax().kind(), SyntaxKind::ADD_EXPRESSION);
    assert_eq!(codes(&parse), "");
}

#[test]
fn expression_forms_parse_cleanly() {
    for (text, kind) in [
        ("x => x + 1", SyntaxKind::SIMPLE_LAMBDA_EXPRESSION),
        ("(a, b) => a", SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION),
        ("async () => await t", SyntaxKind::PARENTHESIZED_LAMBDA_EXPRESSION),
        ("delegate (int a) { return a; }", SyntaxKind::ANONYMOUS_METHOD_EXPRESSION),
        ("(int)x", SyntaxKind::CAST_EXPRESSION),
        ("(a, b)", SyntaxKind::TUPLE_EXPRESSION),
        ("new List<int> { 1, 2 }", SyntaxKind::OBJECT_CREATION_EXPRESSION),
        ("new int[3]", SyntaxKind::ARRAY_CREATION_EXPRESSION),
        ("new[] { 1, 2 }", SyntaxKind::IMPLICIT_ARRAY_CREATION_EXPRESSION),
        ("new { A = 1, b }", SyntaxKind::ANONYMOUS_OBJECT_CREATION_EXPRESSION),
        ("typeof(List<>)", SyntaxKind::TYPE_OF_EXPRESSION),
        ("default", SyntaxKind::DEFAULT_LITERAL_EXPRESSION),
        ("a?.b?[0]", SyntaxKind::CONDITIONAL_ACCESS_EXPRESSION),
        ("x is int y", SyntaxKind::IS_PATTERN_EXPRESSION),
        ("x as string", SyntaxKind::AS_EXPRESSION),
        ("x switch { 1 => a, _ => b }", SyntaxKind::SWITCH_EXPRESSION),
        ("$\"a{b,3:x2}c\"", SyntaxKind::INTERPOLATED_STRING_EXPRESSION),
        ("from c in cs where c > 1 orderby c descending select c", SyntaxKind::QUERY_EXPRESSION),
        ("from int c in cs group c by c into g select g", SyntaxKind::QUERY_EXPRESSION),
        ("f(out var v, ref r, in i, name: 1)", SyntaxKind::INVOCATION_EXPRESSION),
        ("a.b.c[1](2)", SyntaxKind::INVOCATION_EXPRESSION),
        ("x++", SyntaxKind::POST_INCREMENT_EXPRESSION),
        ("global::System.Int32.MaxValue", SyntaxKind::SIMPLE_MEMBER_ACCESS_EXPRESSION),
    ] {
        let parse = parse_expression(text);
        check_invariants(text, &parse);
        assert_eq!(parse.syntax().kind(), kind, "{text}");
        assert_eq!(codes(&parse), "", "{text}");
    }
}

#[test]
fn missing_operands() {
    check(
        "a +",
        expect![[r#"
            (ADD_EXPRESSION (IDENTIFIER_NAME a) + (IDENTIFIER_NAME <IDENT>))
            CS1733"#]],
    );
    check(
        "f(1 2)",
        expect![[r#"
            (INVOCATION_EXPRESSION (IDENTIFIER_NAME f) (ARGUMENT_LIST ( (ARGUMENT (NUMERIC_LITERAL_EXPRESSION 1)) <COMMA> (ARGUMENT (NUMERIC_LITERAL_EXPRESSION 2)) )))
            CS1003"#]],
    );
}

#[test]
fn trailing_tokens_are_reported_once() {
    let parse = parse_expression("a b c");
    check_invariants("a b c", &parse);
    assert_eq!(sexp(parse.syntax()), "(IDENTIFIER_NAME a)");
    assert_eq!(codes(&parse), "CS1022");
}

#[test]
fn feature_gates() {
    check_codes_at(LanguageVersion::CSharp5, "a?.b", "CS8026");
    check_codes_at(LanguageVersion::CSharp6, "a?.b", "");
    check_codes_at(LanguageVersion::CSharp7_3, "x ??= y", "CS8370");
    check_codes_at(LanguageVersion::CSharp6, "1_000", "CS8059");
    check_codes_at(LanguageVersion::CSharp1, "a ?? b", "CS8022");
    check_codes_at(LanguageVersion::Latest, "x ??= y ?? z", "");
}
