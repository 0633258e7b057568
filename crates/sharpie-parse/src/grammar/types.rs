use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::*;
use sharpie_syntax::TextRange;

use super::{exprs, identifier, is_identifier};
use crate::options::Feature;
use crate::parser::{CompletedMarker, Parser};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TypeMode {
    /// Declarations, type arguments, casts: only a type can appear.
    Normal,
    /// After `is` and `as`, where a `?` may start a conditional instead.
    Expression,
    /// After `new` and `stackalloc`; rank specifiers are left to the caller
    /// since they may carry sizes.
    Creation,
}

/// What a successful lookahead scan found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScannedType {
    /// A plain or generic name, which could equally be an expression.
    Name,
    /// A predefined, array, pointer, nullable or tuple type.
    Definite,
}

pub(crate) fn at_type_start(p: &mut Parser<'_>) -> bool {
    let kind = p.current();
    kind == IDENT || kind == LEFT_PAREN || kind.is_predefined_type()
}

pub(crate) fn type_(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    p.nested(|p| {
        let mut ty = non_array_type(p, mode);
        loop {
            match p.current() {
                QUESTION if mode != TypeMode::Expression || !exprs::nth_expression_start(p, 1) => {
                    let range = p.current_range();
                    let m = ty.precede(p);
                    p.bump();
                    p.feature(Feature::NullableTypes, range);
                    ty = m.complete(p, NULLABLE_TYPE);
                }
                STAR if mode != TypeMode::Expression => {
                    let m = ty.precede(p);
                    p.bump();
                    ty = m.complete(p, POINTER_TYPE);
                }
                LEFT_BRACKET
                    if mode == TypeMode::Normal
                        || (mode == TypeMode::Expression && scan_rank(p, 0).is_some()) =>
                {
                    let m = ty.precede(p);
                    let ranks = p.start();
                    while p.at(LEFT_BRACKET) {
                        rank_specifier(p, false);
                    }
                    ranks.complete(p, LIST);
                    ty = m.complete(p, ARRAY_TYPE);
                }
                _ => break,
            }
        }
        ty
    })
}

/// Return and local types, which may be `ref` or `ref readonly`.
pub(crate) fn return_type(p: &mut Parser<'_>) -> CompletedMarker {
    if !p.at(REF_KW) {
        return type_(p, TypeMode::Normal);
    }
    let m = p.start();
    let range = p.current_range();
    p.bump();
    p.feature(Feature::RefLocalsAndReturns, range);
    if !p.eat(READONLY_KW) {
        p.empty();
    }
    type_(p, TypeMode::Normal);
    m.complete(p, REF_TYPE)
}

fn non_array_type(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    match p.current() {
        kind if kind.is_predefined_type() => {
            let m = p.start();
            p.bump();
            m.complete(p, PREDEFINED_TYPE)
        }
        LEFT_PAREN => tuple_type(p),
        IDENT => qualified_name(p, mode),
        _ => {
            p.error_missing(ErrorCode::TypeExpected);
            let m = p.start();
            p.missing_silent(IDENT);
            m.complete(p, IDENTIFIER_NAME)
        }
    }
}

/// Namespace, using and attribute names.
pub(crate) fn name(p: &mut Parser<'_>) -> CompletedMarker {
    qualified_name(p, TypeMode::Normal)
}

fn qualified_name(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    let mut lhs = if p.at(IDENT) && p.nth(1) == COLON_COLON {
        alias_qualified_name(p, mode)
    } else {
        simple_name(p, mode)
    };
    while p.at(DOT) && (mode != TypeMode::Expression || p.nth(1) == IDENT) {
        let m = lhs.precede(p);
        p.bump();
        simple_name(p, mode);
        lhs = m.complete(p, QUALIFIED_NAME);
    }
    lhs
}

/// Parses the first `segments` parts of a dotted name and leaves the
/// following `.` alone. Explicit interface names end this way.
pub(crate) fn name_prefix(p: &mut Parser<'_>, segments: u32) -> CompletedMarker {
    let mut lhs = if p.at(IDENT) && p.nth(1) == COLON_COLON {
        alias_qualified_name(p, TypeMode::Normal)
    } else {
        simple_name(p, TypeMode::Normal)
    };
    for _ in 1..segments {
        let m = lhs.precede(p);
        p.bump();
        simple_name(p, TypeMode::Normal);
        lhs = m.complete(p, QUALIFIED_NAME);
    }
    lhs
}

/// Scans `A.B<T>.` at the `n`th token, where the token after the final dot
/// names a member. Returns the number of name segments before that dot.
pub(crate) fn scan_explicit_interface(p: &mut Parser<'_>, n: u32) -> Option<u32> {
    if p.nth(n) != IDENT {
        return None;
    }
    let mut k = if p.nth(n + 1) == COLON_COLON && p.nth(n + 2) == IDENT { n + 2 } else { n };
    let mut segments = 0;
    let budget = p.scan_budget();
    loop {
        k = scan_simple_name(p, k, budget)?;
        segments += 1;
        if p.nth(k) != DOT {
            return None;
        }
        match p.nth(k + 1) {
            THIS_KW | OPERATOR_KW => return Some(segments),
            IDENT => {
                let after = scan_simple_name(p, k + 1, budget)?;
                if p.nth(after) != DOT {
                    return Some(segments);
                }
                k += 1;
            }
            _ => return None,
        }
    }
}

/// `alias::Name`, with `global` as the keyword form of the alias.
pub(crate) fn alias_qualified_name(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    let m = p.start();
    let alias = p.start();
    if p.at(GLOBAL_KW) {
        p.bump_as(GLOBAL_KW);
    } else {
        identifier(p);
    }
    alias.complete(p, IDENTIFIER_NAME);
    let range = p.current_range();
    p.bump();
    p.feature(Feature::AliasQualifier, range);
    match mode {
        TypeMode::Expression => exprs::simple_name(p),
        _ => simple_name(p, mode),
    };
    m.complete(p, ALIAS_QUALIFIED_NAME)
}

fn simple_name(p: &mut Parser<'_>, mode: TypeMode) -> CompletedMarker {
    let m = p.start();
    identifier(p);
    let generic = p.at(LT)
        && match mode {
            TypeMode::Expression => scan_type_argument_list(p, 0).is_some(),
            TypeMode::Normal | TypeMode::Creation => true,
        };
    if generic {
        type_argument_list(p);
        m.complete(p, GENERIC_NAME)
    } else {
        m.complete(p, IDENTIFIER_NAME)
    }
}

pub(crate) fn type_argument_list(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LT));

    let m = p.start();
    let range = p.current_range();
    p.bump();
    p.feature(Feature::Generics, range);
    let list = p.start();
    loop {
        if p.at(COMMA) || p.at(GT) {
            p.empty();
        } else {
            type_(p, TypeMode::Normal);
        }
        if !p.eat(COMMA) {
            break;
        }
    }
    list.complete(p, LIST);
    p.expect(GT);
    m.complete(p, TYPE_ARGUMENT_LIST)
}

fn tuple_type(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LEFT_PAREN));

    let m = p.start();
    let open = p.current_range();
    p.bump();
    p.feature(Feature::Tuples, open);
    let list = p.start();
    let mut count = 0;
    loop {
        let element = p.start();
        type_(p, TypeMode::Normal);
        if is_identifier(p, 0) {
            identifier(p);
        } else {
            p.empty();
        }
        element.complete(p, TUPLE_ELEMENT);
        count += 1;
        if !p.eat(COMMA) {
            break;
        }
    }
    list.complete(p, LIST);
    p.expect(RIGHT_PAREN);
    if count < 2 {
        let range = TextRange::new(open.start(), p.prev_end());
        p.error(ErrorCode::TupleTooFewElements, range);
    }
    m.complete(p, TUPLE_TYPE)
}

/// Parses `[e, e, ...]`; returns whether any size was given. Sizes are only
/// valid where `sizes_allowed`.
pub(crate) fn rank_specifier(p: &mut Parser<'_>, sizes_allowed: bool) -> bool {
    debug_assert!(p.at(LEFT_BRACKET));

    let m = p.start();
    p.bump();
    let list = p.start();
    let mut sized = false;
    loop {
        if p.at(COMMA) || p.at(RIGHT_BRACKET) || p.at(EOF) {
            p.empty();
        } else {
            if !sizes_allowed && !sized {
                let range = p.current_range();
                p.error(ErrorCode::ArraySizeInDeclaration, range);
            }
            sized = true;
            exprs::expr(p);
        }
        if !p.eat(COMMA) {
            break;
        }
    }
    list.complete(p, LIST);
    p.expect(RIGHT_BRACKET);
    m.complete(p, ARRAY_RANK_SPECIFIER);
    sized
}

/// Scans a type starting at the `n`th token without consuming anything.
/// Returns the index just past it. A type nested deeper than the parser's
/// nesting limit abandons the parse.
pub(crate) fn scan_type(p: &mut Parser<'_>, n: u32) -> Option<(u32, ScannedType)> {
    let budget = p.scan_budget();
    scan(p, n, budget, true)
}

/// Like [`scan_type`], but `?` and `*` never extend the type. Used where a
/// pattern designation may follow.
pub(crate) fn scan_pattern_type(p: &mut Parser<'_>, n: u32) -> Option<(u32, ScannedType)> {
    let budget = p.scan_budget();
    scan(p, n, budget, false)
}

/// Scans `<...>` at the `n`th token. Returns the index past the closing `>`,
/// and [`ScannedType::Definite`] when some argument can only be a type.
pub(crate) fn scan_type_argument_list(p: &mut Parser<'_>, n: u32) -> Option<(u32, ScannedType)> {
    let budget = p.scan_budget();
    scan_arguments(p, n, budget)
}

fn scan(p: &mut Parser<'_>, n: u32, budget: u32, suffixes: bool) -> Option<(u32, ScannedType)> {
    let Some(budget) = budget.checked_sub(1) else {
        p.scan_overflowed(n);
        return None;
    };
    let (mut n, mut shape) = match p.nth(n) {
        kind if kind.is_predefined_type() => (n + 1, ScannedType::Definite),
        IDENT => (scan_name(p, n, budget)?, ScannedType::Name),
        LEFT_PAREN => (scan_tuple(p, n, budget)?, ScannedType::Definite),
        _ => return None,
    };
    loop {
        match p.nth(n) {
            QUESTION | STAR if suffixes => n += 1,
            LEFT_BRACKET => match scan_rank(p, n) {
                Some(after) => n = after,
                None => break,
            },
            _ => break,
        }
        shape = ScannedType::Definite;
    }
    Some((n, shape))
}

fn scan_name(p: &mut Parser<'_>, mut n: u32, budget: u32) -> Option<u32> {
    if p.nth(n + 1) == COLON_COLON {
        if p.nth(n + 2) != IDENT {
            return None;
        }
        n += 2;
    }
    n = scan_simple_name(p, n, budget)?;
    while p.nth(n) == DOT && p.nth(n + 1) == IDENT {
        n = scan_simple_name(p, n + 1, budget)?;
    }
    Some(n)
}

fn scan_simple_name(p: &mut Parser<'_>, n: u32, budget: u32) -> Option<u32> {
    debug_assert_eq!(p.nth(n), IDENT);
    if p.nth(n + 1) == LT {
        if let Some((after, _)) = scan_arguments(p, n + 1, budget) {
            return Some(after);
        }
    }
    Some(n + 1)
}

fn scan_arguments(p: &mut Parser<'_>, n: u32, budget: u32) -> Option<(u32, ScannedType)> {
    debug_assert_eq!(p.nth(n), LT);
    let mut k = n + 1;
    let mut shape = ScannedType::Name;
    loop {
        if !matches!(p.nth(k), COMMA | GT) {
            let start = k;
            k = scan(p, k, budget, true)?.0;
            if is_definite_argument(p, start, k) {
                shape = ScannedType::Definite;
            }
        }
        match p.nth(k) {
            COMMA => k += 1,
            GT => return Some((k + 1, shape)),
            _ => return None,
        }
    }
}

/// A type argument no relational operand could spell: a predefined type
/// (`int*` included), an array or nullable type, or a generic name followed
/// by a comma. Tuples and `X*` stay ambiguous.
fn is_definite_argument(p: &mut Parser<'_>, start: u32, end: u32) -> bool {
    p.nth(start).is_predefined_type()
        || matches!(p.nth(end - 1), RIGHT_BRACKET | QUESTION)
        || (p.nth(end - 1) == GT && p.nth(end) == COMMA)
}

fn scan_tuple(p: &mut Parser<'_>, n: u32, budget: u32) -> Option<u32> {
    let mut k = n + 1;
    let mut count = 0;
    loop {
        k = scan(p, k, budget, true)?.0;
        if p.nth(k) == IDENT {
            k += 1;
        }
        count += 1;
        match p.nth(k) {
            COMMA => k += 1,
            RIGHT_PAREN => break,
            _ => return None,
        }
    }
    (count >= 2).then_some(k + 1)
}

/// `[` `,`* `]` with no sizes.
fn scan_rank(p: &mut Parser<'_>, n: u32) -> Option<u32> {
    if p.nth(n) != LEFT_BRACKET {
        return None;
    }
    let mut k = n + 1;
    while p.nth(k) == COMMA {
        k += 1;
    }
    (p.nth(k) == RIGHT_BRACKET).then_some(k + 1)
}
