use sharpie_syntax::SyntaxKind::*;

use super::{exprs, identifier_name, separated, types};
use crate::parser::{CompletedMarker, Parser};

/// Parses a (possibly empty) sequence of `[...]` sections.
pub(crate) fn attribute_lists(p: &mut Parser<'_>) {
    let list = p.start();
    while p.at(LEFT_BRACKET) {
        attribute_list(p);
    }
    list.complete(p, LIST);
}

/// `[assembly: ...]` or `[module: ...]`.
pub(crate) fn at_global_attribute(p: &mut Parser<'_>) -> bool {
    p.at(LEFT_BRACKET)
        && p.nth(1) == IDENT
        && matches!(p.nth_text(1), "assembly" | "module")
        && p.nth(2) == COLON
}

pub(crate) fn attribute_list(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LEFT_BRACKET));

    let m = p.start();
    p.bump();
    if p.nth(1) == COLON && (p.at(IDENT) || p.current().is_keyword()) {
        let target = p.start();
        p.bump();
        p.bump();
        target.complete(p, ATTRIBUTE_TARGET_SPECIFIER);
    } else {
        p.empty();
    }
    separated(p, RIGHT_BRACKET, true, |p| p.at(IDENT), attribute);
    p.expect(RIGHT_BRACKET);
    m.complete(p, ATTRIBUTE_LIST)
}

fn attribute(p: &mut Parser<'_>) {
    let m = p.start();
    types::name(p);
    if p.at(LEFT_PAREN) {
        let args = p.start();
        p.bump();
        separated(p, RIGHT_PAREN, false, exprs::at_expression_start, attribute_argument);
        p.expect(RIGHT_PAREN);
        args.complete(p, ATTRIBUTE_ARGUMENT_LIST);
    } else {
        p.empty();
    }
    m.complete(p, ATTRIBUTE);
}

fn attribute_argument(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(IDENT) && p.nth(1) == EQ {
        name_equals(p);
        p.empty();
    } else if p.at(IDENT) && p.nth(1) == COLON {
        p.empty();
        name_colon(p);
    } else {
        p.empty();
        p.empty();
    }
    exprs::expr(p);
    m.complete(p, ATTRIBUTE_ARGUMENT);
}

pub(crate) fn name_equals(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    identifier_name(p);
    p.expect(EQ);
    m.complete(p, NAME_EQUALS)
}

pub(crate) fn name_colon(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    identifier_name(p);
    p.expect(COLON);
    m.complete(p, NAME_COLON)
}
