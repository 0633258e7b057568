use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::*;
use sharpie_syntax::{TokenValue, TriviaPieceKind};

use super::*;

fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
    &text[token.range]
}

fn tokens(text: &str) -> Vec<(SyntaxKind, &str)> {
    let mut tokenizer = Tokenizer::new(text);
    let mut tokens = Vec::new();
    loop {
        let index = tokenizer.next_token_index();
        let token = tokenizer.token(index);
        if token.kind == EOF {
            return tokens;
        }
        tokens.push((token.kind, token_text(token, text)));
    }
}

fn kinds(text: &str) -> Vec<SyntaxKind> {
    tokens(text).into_iter().map(|(kind, _)| kind).collect()
}

/// Scans the whole input and returns the codes of every diagnostic.
fn codes(tokenizer: &mut Tokenizer<'_>) -> Vec<ErrorCode> {
    let mut codes = Vec::new();
    loop {
        let index = tokenizer.next_token_index();
        codes.extend(tokenizer.diagnostics(index).iter().map(|diagnostic| diagnostic.code()));
        if tokenizer.token(index).kind == EOF {
            return codes;
        }
    }
}

fn trivia_kinds(pieces: &[TriviaPiece]) -> Vec<TriviaPieceKind> {
    pieces.iter().map(|piece| piece.kind).collect()
}

fn single_value(text: &str) -> TokenValue {
    let mut tokenizer = Tokenizer::new(text);
    let index = tokenizer.next_token_index();
    let eof = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(eof).kind, EOF, "Input: '{text}'");
    tokenizer.token(index).value.clone().unwrap_or_else(|| panic!("no value for '{text}'"))
}

#[test]
fn test_integer_literals() {
    let inputs = vec![
        ("123", 123),
        ("0", 0),
        ("0x1F", 31),
        ("0X_ff", 255),
        ("0b1010", 10),
        ("1_000_000", 1_000_000),
        ("10UL", 10),
        ("10lu", 10),
        ("0xFFu", 255),
        ("18446744073709551615", u64::MAX),
    ];

    for (input, expected) in inputs {
        assert_eq!(tokens(input), vec![(NUMERIC_LITERAL, input)], "Input: '{input}'");
        assert_eq!(single_value(input), TokenValue::Integer(expected), "Input: '{input}'");
    }
}

#[test]
fn test_real_literals() {
    let inputs = vec![
        ("1.5", 1.5),
        (".5", 0.5),
        ("1e10", 1e10),
        ("1.0e-5", 1.0e-5),
        ("2f", 2.0),
        ("3.25m", 3.25),
        ("1_0.0_1D", 10.01),
    ];

    for (input, expected) in inputs {
        assert_eq!(tokens(input), vec![(NUMERIC_LITERAL, input)], "Input: '{input}'");
        assert_eq!(single_value(input), TokenValue::Real(expected), "Input: '{input}'");
    }
}

#[test]
fn test_dot_after_number() {
    assert_eq!(kinds("1..2"), vec![NUMERIC_LITERAL, DOT_DOT, NUMERIC_LITERAL]);
    assert_eq!(kinds("1.ToString"), vec![NUMERIC_LITERAL, DOT, IDENT]);
    assert_eq!(kinds("a...b"), vec![IDENT, DOT_DOT, DOT, IDENT]);
}

#[test]
fn test_invalid_numbers() {
    for input in ["1_", "0x", "0b", "1e", "1.5e+"] {
        let mut tokenizer = Tokenizer::new(input);
        assert_eq!(codes(&mut tokenizer), vec![ErrorCode::InvalidNumber], "Input: '{input}'");
        assert_eq!(tokenizer.token(0).range, TextRange::up_to(TextSize::of(input)));
    }
}

#[test]
fn test_numeric_overflow() {
    let mut tokenizer = Tokenizer::new("18446744073709551616");
    assert_eq!(codes(&mut tokenizer), vec![ErrorCode::IntOverflow]);

    for (input, type_name) in [("1e400", "double"), ("1e39f", "float"), ("1e30m", "decimal")] {
        let mut tokenizer = Tokenizer::new(input);
        let index = tokenizer.next_token_index();
        let diagnostics = tokenizer.diagnostics(index);
        assert_eq!(diagnostics.len(), 1, "Input: '{input}'");
        assert_eq!(diagnostics[0].code(), ErrorCode::FloatOverflow);
        assert_eq!(&*diagnostics[0].arguments()[0], type_name);
    }
}

#[test]
fn test_operators() {
    let inputs = vec![
        ("??=", vec![QUESTION_QUESTION_EQ]),
        ("??", vec![QUESTION_QUESTION]),
        ("=>", vec![FAT_ARROW]),
        ("->", vec![ARROW]),
        ("::", vec![COLON_COLON]),
        ("<<=", vec![SHL_EQ]),
        ("<=", vec![LT_EQ]),
        (">>", vec![GT, GT]),
        (">>=", vec![GT, GT_EQ]),
        (">>>", vec![GT, GT, GT]),
        ("a!=b", vec![IDENT, BANG_EQ, IDENT]),
        ("x++ + --y", vec![IDENT, PLUS_PLUS, PLUS, MINUS_MINUS, IDENT]),
        ("&&&", vec![AMP_AMP, AMP]),
        ("|=^=%=", vec![PIPE_EQ, CARET_EQ, PERCENT_EQ]),
    ];

    for (input, expected) in inputs {
        assert_eq!(kinds(input), expected, "Input: '{input}'");
    }
}

#[test]
fn test_eq_operator() {
    let text = "x = y";
    let mut tokenizer = Tokenizer::new(text);

    let token = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(token).kind, IDENT);
    assert_eq!(tokenizer.token_text(token), "x");

    let token = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(token).kind, EQ);
    assert_eq!(tokenizer.token_text(token), "=");

    let token = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(token).kind, IDENT);
    assert_eq!(tokenizer.token_text(token), "y");

    let eof = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(eof).kind, EOF);
    assert_eq!(tokenizer.next_token_index(), eof);
}

#[test]
fn test_keywords_and_identifiers() {
    let text = "class async @class \\u0061bc _x1";
    let mut tokenizer = Tokenizer::new(text);

    let class = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(class).kind, CLASS_KW);

    let async_ = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(async_).kind, IDENT);
    assert_eq!(tokenizer.token(async_).contextual_kind, ASYNC_KW);

    let verbatim = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(verbatim).kind, IDENT);
    assert_eq!(tokenizer.token(verbatim).contextual_kind, IDENT);
    assert_eq!(tokenizer.token(verbatim).value, Some(TokenValue::Text("class".into())));

    let escaped = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(escaped).kind, IDENT);
    assert_eq!(tokenizer.token_text(escaped), "\\u0061bc");
    assert_eq!(tokenizer.token(escaped).value, Some(TokenValue::Text("abc".into())));

    let plain = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(plain).kind, IDENT);
    assert_eq!(tokenizer.token(plain).value, None);
}

#[test]
fn test_string_literals() {
    let inputs = vec![
        (r#""a\tb""#, "a\tb"),
        (r#""\x41\U00000043B""#, "ACB"),
        (r#"@"a""b\n""#, "a\"b\\n"),
        ("@\"line\nbreak\"", "line\nbreak"),
    ];

    for (input, expected) in inputs {
        assert_eq!(kinds(input), vec![STRING_LITERAL], "Input: '{input}'");
        assert_eq!(single_value(input), TokenValue::Text(expected.into()), "Input: '{input}'");
    }
}

#[test]
fn test_string_errors() {
    let inputs = vec![
        ("\"abc\nx", vec![ErrorCode::NewlineInConst]),
        ("\"abc", vec![ErrorCode::NewlineInConst]),
        ("@\"abc", vec![ErrorCode::UnterminatedStringLit]),
        (r#""\q""#, vec![ErrorCode::IllegalEscape]),
        (r#""\x""#, vec![ErrorCode::IllegalEscape]),
    ];

    for (input, expected) in inputs {
        let mut tokenizer = Tokenizer::new(input);
        assert_eq!(codes(&mut tokenizer), expected, "Input: '{input}'");
    }
}

#[test]
fn test_character_literals() {
    assert_eq!(single_value("'a'"), TokenValue::Char('a'));
    assert_eq!(single_value(r"'\n'"), TokenValue::Char('\n'));
    assert_eq!(single_value(r"'A'"), TokenValue::Char('A'));

    let inputs = vec![
        ("''", vec![ErrorCode::EmptyCharConst]),
        ("'ab'", vec![ErrorCode::TooManyCharsInConst]),
        ("'a", vec![ErrorCode::NewlineInConst]),
    ];
    for (input, expected) in inputs {
        let mut tokenizer = Tokenizer::new(input);
        assert_eq!(codes(&mut tokenizer), expected, "Input: '{input}'");
    }
}

#[test]
fn test_trivia_attachment() {
    let text = "  a // c\n b";
    let mut tokenizer = Tokenizer::new(text);

    let a = tokenizer.next_token_index();
    assert_eq!(trivia_kinds(tokenizer.leading_trivia(a)), vec![TriviaPieceKind::Whitespace]);
    assert_eq!(
        trivia_kinds(tokenizer.trailing_trivia(a)),
        vec![
            TriviaPieceKind::Whitespace,
            TriviaPieceKind::SingleLineComment,
            TriviaPieceKind::Newline
        ]
    );
    assert_eq!(tokenizer.full_range(a), TextRange::new(0.into(), 9.into()));

    let b = tokenizer.next_token_index();
    assert_eq!(trivia_kinds(tokenizer.leading_trivia(b)), vec![TriviaPieceKind::Whitespace]);
    assert!(tokenizer.trailing_trivia(b).is_empty());
}

#[test]
fn test_comments() {
    let text = "/// doc\n/** block */ /* plain */ a";
    let mut tokenizer = Tokenizer::new(text);
    let a = tokenizer.next_token_index();
    assert_eq!(
        trivia_kinds(tokenizer.leading_trivia(a)),
        vec![
            TriviaPieceKind::DocComment,
            TriviaPieceKind::Newline,
            TriviaPieceKind::MultiLineDocComment,
            TriviaPieceKind::Whitespace,
            TriviaPieceKind::MultiLineComment,
            TriviaPieceKind::Whitespace,
        ]
    );

    let mut tokenizer = Tokenizer::new("a /* open");
    assert_eq!(codes(&mut tokenizer), vec![ErrorCode::OpenEndedComment]);
}

#[test]
fn test_unexpected_character_is_skipped() {
    let text = "a $ b";
    let mut tokenizer = Tokenizer::new(text);
    let a = tokenizer.next_token_index();
    let b = tokenizer.next_token_index();
    assert!(tokenizer.diagnostics(a).is_empty());
    assert_eq!(tokenizer.token_text(b), "b");
    assert_eq!(
        trivia_kinds(tokenizer.leading_trivia(b)),
        vec![TriviaPieceKind::SkippedTokens, TriviaPieceKind::Whitespace]
    );
    let diagnostics = tokenizer.diagnostics(b);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), ErrorCode::UnexpectedCharacter);
    assert_eq!(diagnostics[0].range(), TextRange::new(2.into(), 3.into()));

    let mut tokenizer = Tokenizer::new("@ x");
    assert_eq!(codes(&mut tokenizer), vec![ErrorCode::ExpectedVerbatimLiteral]);
}

#[test]
fn test_interpolated_string() {
    let text = r#"$"a{b,5:x2}c""#;
    assert_eq!(
        tokens(text),
        vec![
            (INTERPOLATED_STRING_START, "$\""),
            (INTERPOLATED_STRING_TEXT, "a"),
            (LEFT_BRACE, "{"),
            (IDENT, "b"),
            (COMMA, ","),
            (NUMERIC_LITERAL, "5"),
            (COLON, ":"),
            (INTERPOLATED_STRING_TEXT, "x2"),
            (RIGHT_BRACE, "}"),
            (INTERPOLATED_STRING_TEXT, "c"),
            (INTERPOLATED_STRING_END, "\""),
        ]
    );
}

#[test]
fn test_interpolated_string_nesting() {
    assert_eq!(
        kinds(r#"$"{(a ? b : c)}""#),
        vec![
            INTERPOLATED_STRING_START,
            LEFT_BRACE,
            LEFT_PAREN,
            IDENT,
            QUESTION,
            IDENT,
            COLON,
            IDENT,
            RIGHT_PAREN,
            RIGHT_BRACE,
            INTERPOLATED_STRING_END,
        ]
    );
    assert_eq!(
        kinds(r#"@$"{$"{x}"}""#),
        vec![
            INTERPOLATED_VERBATIM_STRING_START,
            LEFT_BRACE,
            INTERPOLATED_STRING_START,
            LEFT_BRACE,
            IDENT,
            RIGHT_BRACE,
            INTERPOLATED_STRING_END,
            RIGHT_BRACE,
            INTERPOLATED_STRING_END,
        ]
    );

    let mut tokenizer = Tokenizer::new(r#"$"{{x}}""#);
    tokenizer.next_token_index();
    let text = tokenizer.next_token_index();
    assert_eq!(tokenizer.token(text).kind, INTERPOLATED_STRING_TEXT);
    assert_eq!(tokenizer.token(text).value, Some(TokenValue::Text("{x}".into())));
}

#[test]
fn test_unterminated_interpolated_string() {
    let text = "$\"abc\nx";
    assert_eq!(
        kinds(text),
        vec![INTERPOLATED_STRING_START, INTERPOLATED_STRING_TEXT, INTERPOLATED_STRING_END, IDENT]
    );
    let mut tokenizer = Tokenizer::new(text);
    assert_eq!(codes(&mut tokenizer), vec![ErrorCode::NewlineInConst]);

    let mut tokenizer = Tokenizer::new("@$\"abc");
    assert_eq!(codes(&mut tokenizer), vec![ErrorCode::UnterminatedStringLit]);
}

#[test]
fn test_conditional_compilation() {
    let text = "#define A\n#if A\nx\n#else\ny\n#endif\n";
    assert_eq!(tokens(text), vec![(IDENT, "x")]);

    let mut tokenizer = Tokenizer::new(text);
    let x = tokenizer.next_token_index();
    let eof = tokenizer.next_token_index();
    assert!(tokenizer.diagnostics(x).is_empty());
    assert_eq!(
        trivia_kinds(tokenizer.leading_trivia(eof)),
        vec![
            TriviaPieceKind::PreprocessorDirective,
            TriviaPieceKind::Newline,
            TriviaPieceKind::DisabledText,
            TriviaPieceKind::PreprocessorDirective,
            TriviaPieceKind::Newline,
        ]
    );
}

#[test]
fn test_nested_disabled_regions() {
    let text = "#if A\n#if B\na\n#endif\nb\n#elif C || !D\nc\n#endif\n";
    assert_eq!(tokens(text), vec![(IDENT, "c")]);

    let text = "#if (A || B) && !C\na\n#endif\nb";
    let mut tokenizer = Tokenizer::with_symbols(text, ["B"]);
    let a = tokenizer.next_token_index();
    assert_eq!(tokenizer.token_text(a), "a");
    let mut tokenizer = Tokenizer::with_symbols(text, ["B", "C"]);
    let b = tokenizer.next_token_index();
    assert_eq!(tokenizer.token_text(b), "b");
}

#[test]
fn test_directive_errors() {
    let inputs = vec![
        ("#if A\n", vec![ErrorCode::EndifDirectiveExpected]),
        ("#region\n", vec![ErrorCode::EndRegionDirectiveExpected]),
        ("#endif\n", vec![ErrorCode::UnexpectedDirective]),
        ("#region\n#endif\n#endregion\n", vec![ErrorCode::EndRegionDirectiveExpected]),
        ("#foo\n", vec![ErrorCode::PPDirectiveExpected]),
        ("#if A B\n#endif\n", vec![ErrorCode::EndOfPPLineExpected]),
        ("#if A &&\n#endif\n", vec![ErrorCode::InvalidPreprocExpr]),
        ("#else\n", vec![ErrorCode::UnexpectedDirective]),
        ("a\n#define B\n", vec![ErrorCode::PPDefFollowsToken]),
        ("a #region\n#endregion\n", vec![ErrorCode::BadDirectivePlacement]),
        ("#pragma warning disable 168\n#line default\n#nullable enable\n", vec![]),
    ];

    for (input, expected) in inputs {
        let mut tokenizer = Tokenizer::new(input);
        assert_eq!(codes(&mut tokenizer), expected, "Input: '{input}'");
    }
}

#[test]
fn test_error_and_warning_directives() {
    let mut tokenizer = Tokenizer::new("#error oops here\n#warning careful\n");
    let eof = tokenizer.next_token_index();
    let diagnostics = tokenizer.diagnostics(eof);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].code(), ErrorCode::ErrorDirective);
    assert_eq!(diagnostics[0].message(), "#error: 'oops here'");
    assert_eq!(diagnostics[1].code(), ErrorCode::WarningDirective);
    assert!(!diagnostics[1].is_error());
}

#[test]
fn test_full_ranges_cover_text() {
    let text = "#if X\nskipped\n#endif\nclass C { int x = $\"{a}\"; } // end\n @ $ ";
    let mut tokenizer = Tokenizer::new(text);
    let mut end = TextSize::new(0);
    loop {
        let index = tokenizer.next_token_index();
        let range = tokenizer.full_range(index);
        assert_eq!(range.start(), end, "gap before token {index}");
        end = range.end();
        if tokenizer.token(index).kind == EOF {
            break;
        }
    }
    assert_eq!(end, TextSize::of(text));
}
