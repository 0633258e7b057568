use sharpie_syntax::SyntaxKind::*;

use super::types::{self, TypeMode};
use super::{exprs, identifier, is_identifier, separated};
use crate::options::Feature;
use crate::parser::{CompletedMarker, Context, Parser};

/// `from x in` or `from T x in`.
pub(crate) fn at_query_start(p: &mut Parser<'_>) -> bool {
    if !p.at(FROM_KW) {
        return false;
    }
    if p.nth(1) == IDENT && p.nth_at(2, IN_KW) {
        return true;
    }
    match types::scan_type(p, 1) {
        Some((n, _)) => p.nth(n) == IDENT && p.nth_at(n + 1, IN_KW),
        None => false,
    }
}

pub(crate) fn query_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let range = p.current_range();
    p.feature(Feature::QueryExpressions, range);
    let context = Context { in_query: true, ..p.context() };
    p.with_context(context, |p| {
        from_clause(p);
        query_body(p);
    });
    m.complete(p, QUERY_EXPRESSION)
}

fn from_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(FROM_KW);
    range_variable(p);
    p.expect(IN_KW);
    exprs::expr(p);
    m.complete(p, FROM_CLAUSE);
}

/// Optional type, then the variable name.
fn range_variable(p: &mut Parser<'_>) {
    if is_identifier(p, 0) && p.nth_at(1, IN_KW) {
        p.empty();
    } else {
        types::type_(p, TypeMode::Normal);
    }
    identifier(p);
}

fn query_body(p: &mut Parser<'_>) {
    let m = p.start();
    let clauses = p.start();
    loop {
        match p.nth_contextual(0) {
            FROM_KW if p.at(FROM_KW) => from_clause(p),
            LET_KW if p.at(LET_KW) => let_clause(p),
            WHERE_KW if p.at(WHERE_KW) => where_clause(p),
            JOIN_KW if p.at(JOIN_KW) => join_clause(p),
            ORDERBY_KW if p.at(ORDERBY_KW) => order_by_clause(p),
            _ => break,
        }
    }
    clauses.complete(p, LIST);

    if p.at(SELECT_KW) {
        select_clause(p);
    } else if p.at(GROUP_KW) {
        group_clause(p);
    } else {
        let select = p.start();
        p.missing(SELECT_KW);
        let expr = p.start();
        p.missing_silent(IDENT);
        expr.complete(p, IDENTIFIER_NAME);
        select.complete(p, SELECT_CLAUSE);
    }

    if p.at(INTO_KW) {
        let continuation = p.start();
        p.bump_as(INTO_KW);
        identifier(p);
        p.nested(query_body);
        continuation.complete(p, QUERY_CONTINUATION);
    } else {
        p.empty();
    }
    m.complete(p, QUERY_BODY);
}

fn let_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(LET_KW);
    identifier(p);
    p.expect(EQ);
    exprs::expr(p);
    m.complete(p, LET_CLAUSE);
}

fn where_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(WHERE_KW);
    exprs::expr(p);
    m.complete(p, WHERE_CLAUSE);
}

fn join_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(JOIN_KW);
    range_variable(p);
    p.expect(IN_KW);
    exprs::expr(p);
    p.expect(ON_KW);
    exprs::expr(p);
    p.expect(EQUALS_KW);
    exprs::expr(p);
    if p.at(INTO_KW) {
        let into = p.start();
        p.bump_as(INTO_KW);
        identifier(p);
        into.complete(p, JOIN_INTO_CLAUSE);
    } else {
        p.empty();
    }
    m.complete(p, JOIN_CLAUSE);
}

fn order_by_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(ORDERBY_KW);
    separated(p, EOF, false, at_ordering_start, ordering);
    m.complete(p, ORDER_BY_CLAUSE);
}

fn at_ordering_start(p: &mut Parser<'_>) -> bool {
    exprs::at_expression_start(p) && (!p.at(IDENT) || is_identifier(p, 0))
}

fn ordering(p: &mut Parser<'_>) {
    let m = p.start();
    exprs::expr(p);
    let kind = if p.at(DESCENDING_KW) {
        p.bump_as(DESCENDING_KW);
        DESCENDING_ORDERING
    } else {
        if !p.eat(ASCENDING_KW) {
            p.empty();
        }
        ASCENDING_ORDERING
    };
    m.complete(p, kind);
}

fn select_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(SELECT_KW);
    exprs::expr(p);
    m.complete(p, SELECT_CLAUSE);
}

fn group_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(GROUP_KW);
    exprs::expr(p);
    p.expect(BY_KW);
    exprs::expr(p);
    m.complete(p, GROUP_CLAUSE);
}
