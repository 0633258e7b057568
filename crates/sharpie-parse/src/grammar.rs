use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::{self, *};
use sharpie_syntax::{SyntaxSet, TextRange};

use crate::options::Feature;
use crate::parser::{CompletedMarker, Parser};

mod attributes;
mod exprs;
pub(crate) mod items;
mod members;
mod query;
mod stmts;
mod types;

/// Contextual keywords that cannot name range variables inside a query.
const QUERY_KEYWORDS: SyntaxSet = SyntaxSet::new([
    FROM_KW,
    WHERE_KW,
    SELECT_KW,
    GROUP_KW,
    INTO_KW,
    ORDERBY_KW,
    JOIN_KW,
    LET_KW,
    ON_KW,
    EQUALS_KW,
    BY_KW,
    ASCENDING_KW,
    DESCENDING_KW,
]);

const MODIFIER_KEYWORDS: SyntaxSet = SyntaxSet::new([
    ABSTRACT_KW,
    CONST_KW,
    EXTERN_KW,
    FIXED_KW,
    INTERNAL_KW,
    NEW_KW,
    OVERRIDE_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    SEALED_KW,
    STATIC_KW,
    UNSAFE_KW,
    VIRTUAL_KW,
    VOLATILE_KW,
]);

pub(crate) fn compilation_unit(p: &mut Parser<'_>) {
    items::compilation_unit(p);
}

pub(crate) fn expression_root(p: &mut Parser<'_>) {
    let m = p.start();
    exprs::expr(p);
    finish_root(p);
    m.complete(p, EXPRESSION_ROOT);
}

pub(crate) fn statement_root(p: &mut Parser<'_>) {
    let m = p.start();
    stmts::statement(p);
    finish_root(p);
    m.complete(p, STATEMENT_ROOT);
}

/// Skips whatever the root production left behind into the end-of-file
/// token, reporting it once.
fn finish_root(p: &mut Parser<'_>) {
    if !p.at(EOF) {
        p.error_at_current(ErrorCode::EOFExpected);
        while !p.at(EOF) {
            p.skip();
        }
    }
    p.bump_eof();
}

/// Whether the `n`th token can name something here. Inside a query the
/// clause keywords are reserved.
pub(crate) fn is_identifier(p: &mut Parser<'_>, n: u32) -> bool {
    p.nth(n) == IDENT && !(p.context().in_query && QUERY_KEYWORDS.contains(p.nth_contextual(n)))
}

pub(crate) fn identifier(p: &mut Parser<'_>) {
    match p.current() {
        IDENT => {
            if p.context().is_async && p.at(AWAIT_KW) {
                p.error_at_current(ErrorCode::BadAwaitAsIdentifier);
            }
            p.bump_as(IDENT);
        }
        kind if kind.is_keyword() => {
            p.error_at_current(ErrorCode::IdentifierExpectedKW);
            if p.nth(1) == IDENT {
                p.skip();
                p.bump_as(IDENT);
            } else {
                p.missing_silent(IDENT);
            }
        }
        _ => p.missing(IDENT),
    }
}

pub(crate) fn identifier_name(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    identifier(p);
    m.complete(p, IDENTIFIER_NAME)
}

pub(crate) fn empty_list(p: &mut Parser<'_>) {
    let m = p.start();
    m.complete(p, LIST);
}

/// Parses `item (, item)*` into a `LIST`, stopping before `ket`.
///
/// A missing comma is inserted only when the next token can start another
/// item; otherwise the list ends and the caller deals with the token.
pub(crate) fn separated(
    p: &mut Parser<'_>,
    ket: SyntaxKind,
    allow_trailing: bool,
    mut at_item: impl FnMut(&mut Parser<'_>) -> bool,
    mut item: impl FnMut(&mut Parser<'_>),
) -> usize {
    let list = p.start();
    let mut count = 0;
    if !p.at(ket) && !p.at(EOF) {
        loop {
            let before = p.position();
            item(p);
            count += 1;
            if p.eat(COMMA) {
                if allow_trailing && p.at(ket) {
                    break;
                }
                continue;
            }
            if p.at(ket) || p.at(EOF) || p.position() == before || !at_item(p) {
                break;
            }
            p.missing(COMMA);
        }
    }
    list.complete(p, LIST);
    count
}

/// Modifiers seen on one declaration, in source order.
#[derive(Debug, Default)]
pub(crate) struct Modifiers {
    seen: Vec<(SyntaxKind, TextRange)>,
}

impl Modifiers {
    pub(crate) fn contains(&self, kind: SyntaxKind) -> bool {
        self.seen.iter().any(|&(seen, _)| seen == kind)
    }

    pub(crate) fn range(&self, kind: SyntaxKind) -> Option<TextRange> {
        self.seen.iter().find(|&&(seen, _)| seen == kind).map(|&(_, range)| range)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (SyntaxKind, TextRange)> + '_ {
        self.seen.iter().copied()
    }
}

/// Modifier the `n`th token acts as, if any.
pub(crate) fn nth_modifier(p: &mut Parser<'_>, n: u32) -> Option<SyntaxKind> {
    let kind = p.nth(n);
    if MODIFIER_KEYWORDS.contains(kind) {
        return Some(kind);
    }
    match kind {
        REF_KW if p.nth(n + 1) == STRUCT_KW
            || (p.nth_at(n + 1, PARTIAL_KW) && p.nth(n + 2) == STRUCT_KW) =>
        {
            Some(REF_KW)
        }
        IDENT => match p.nth_contextual(n) {
            PARTIAL_KW if is_partial_modifier(p, n) => Some(PARTIAL_KW),
            ASYNC_KW if is_async_modifier(p, n) => Some(ASYNC_KW),
            _ => None,
        },
        _ => None,
    }
}

fn is_partial_modifier(p: &mut Parser<'_>, n: u32) -> bool {
    let next = p.nth(n + 1);
    matches!(next, CLASS_KW | STRUCT_KW | INTERFACE_KW | ENUM_KW | VOID_KW)
        || MODIFIER_KEYWORDS.contains(next)
}

fn is_async_modifier(p: &mut Parser<'_>, n: u32) -> bool {
    let next = p.nth(n + 1);
    if MODIFIER_KEYWORDS.contains(next) || (next == IDENT && p.nth_at(n + 1, PARTIAL_KW)) {
        return true;
    }
    match types::scan_type(p, n + 1) {
        Some((after, _)) => {
            p.nth(after) == IDENT || matches!(p.nth(after), THIS_KW | OPERATOR_KW)
        }
        None => false,
    }
}

/// Parses a (possibly empty) modifier list.
pub(crate) fn modifiers(p: &mut Parser<'_>) -> Modifiers {
    let list = p.start();
    let mut mods = Modifiers::default();
    while let Some(kind) = nth_modifier(p, 0) {
        let range = p.current_range();
        if mods.contains(kind) {
            p.error_at_current(ErrorCode::DuplicateModifier);
        }
        match kind {
            PARTIAL_KW => p.feature(Feature::PartialTypes, range),
            ASYNC_KW => p.feature(Feature::Async, range),
            _ => {}
        }
        mods.seen.push((kind, range));
        p.bump_as(kind);
    }
    if mods.contains(PRIVATE_KW) && mods.contains(PROTECTED_KW) {
        let range = mods.range(PROTECTED_KW).unwrap_or_default();
        p.feature(Feature::PrivateProtected, range);
    }
    list.complete(p, LIST);
    mods
}

/// Reports every modifier outside `allowed`.
pub(crate) fn check_modifiers(p: &mut Parser<'_>, mods: &Modifiers, allowed: SyntaxSet) {
    for (kind, range) in mods.iter() {
        if !allowed.contains(kind) {
            let text = kind.text().unwrap_or_default();
            p.error_with(ErrorCode::BadMemberFlag, range, text);
        }
    }
}
