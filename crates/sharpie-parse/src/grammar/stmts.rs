use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::{self, *};
use sharpie_syntax::{SyntaxSet, TextRange};

use super::exprs::{self, PatternContext};
use super::members::{self, DeclaratorContext};
use super::types::{self, ScannedType, TypeMode};
use super::{check_modifiers, empty_list, identifier, identifier_name, is_identifier, items, modifiers};
use crate::options::Feature;
use crate::parser::{CompletedMarker, Context, Marker, Parser};

/// Keywords that only start type members; a block ends before them.
const MEMBER_START: SyntaxSet = SyntaxSet::new([
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    CLASS_KW,
    STRUCT_KW,
    INTERFACE_KW,
    ENUM_KW,
    NAMESPACE_KW,
    OVERRIDE_KW,
    VIRTUAL_KW,
    ABSTRACT_KW,
    SEALED_KW,
    EVENT_KW,
    OPERATOR_KW,
    IMPLICIT_KW,
    EXPLICIT_KW,
]);

const STATEMENT_KEYWORDS: SyntaxSet = SyntaxSet::new([
    LEFT_BRACE,
    SEMICOLON,
    IF_KW,
    WHILE_KW,
    DO_KW,
    FOR_KW,
    FOREACH_KW,
    SWITCH_KW,
    BREAK_KW,
    CONTINUE_KW,
    GOTO_KW,
    RETURN_KW,
    TRY_KW,
    LOCK_KW,
    FIXED_KW,
    USING_KW,
    UNSAFE_KW,
    CONST_KW,
    STATIC_KW,
    EXTERN_KW,
    VOID_KW,
]);

/// Modifiers a local declaration or local function may start with.
const LOCAL_MODIFIERS: SyntaxSet = SyntaxSet::new([CONST_KW, STATIC_KW, UNSAFE_KW, EXTERN_KW]);

const LOCAL_FUNCTION_MODIFIERS: SyntaxSet =
    SyntaxSet::new([STATIC_KW, ASYNC_KW, UNSAFE_KW, EXTERN_KW]);

fn at_statement_start(p: &mut Parser<'_>) -> bool {
    STATEMENT_KEYWORDS.contains(p.current()) || exprs::at_expression_start(p)
}

pub(crate) fn statement(p: &mut Parser<'_>) {
    p.nested(|p| statement_in(p, false));
}

/// Body of `if`, `while` and the like, where declarations and labels are
/// not allowed.
fn embedded_statement(p: &mut Parser<'_>) {
    p.nested(|p| statement_in(p, true));
}

fn statement_in(p: &mut Parser<'_>, embedded: bool) {
    match p.current() {
        LEFT_BRACE => {
            block(p);
        }
        SEMICOLON => {
            let m = p.start();
            p.bump();
            m.complete(p, EMPTY_STATEMENT);
        }
        IF_KW => if_statement(p),
        WHILE_KW => while_statement(p),
        DO_KW => do_statement(p),
        FOR_KW => for_statement(p),
        FOREACH_KW => foreach_statement(p, None),
        SWITCH_KW => switch_statement(p),
        BREAK_KW => keyword_statement(p, BREAK_STATEMENT),
        CONTINUE_KW => keyword_statement(p, CONTINUE_STATEMENT),
        GOTO_KW => goto_statement(p),
        RETURN_KW => optional_expression_statement(p, RETURN_STATEMENT),
        THROW_KW => optional_expression_statement(p, THROW_STATEMENT),
        TRY_KW => try_statement(p),
        LOCK_KW => lock_statement(p),
        FIXED_KW => fixed_statement(p),
        USING_KW => using_statement(p, None, embedded),
        CHECKED_KW | UNCHECKED_KW if p.nth(1) == LEFT_BRACE => {
            let kind = if p.at(CHECKED_KW) { CHECKED_STATEMENT } else { UNCHECKED_STATEMENT };
            block_statement(p, kind);
        }
        UNSAFE_KW if p.nth(1) == LEFT_BRACE => block_statement(p, UNSAFE_STATEMENT),
        IDENT if p.nth(1) == COLON && is_identifier(p, 0) => labeled_statement(p, embedded),
        IDENT if p.at(YIELD_KW) && matches!(p.nth(1), RETURN_KW | BREAK_KW) => yield_statement(p),
        IDENT if p.context().is_async && p.at(AWAIT_KW) && matches!(p.nth(1), FOREACH_KW | USING_KW) => {
            let m = p.start();
            let range = p.current_range();
            p.bump_as(AWAIT_KW);
            p.feature(Feature::AsyncStreams, range);
            match p.current() {
                FOREACH_KW => foreach_statement(p, Some(m)),
                _ => using_statement(p, Some(m), embedded),
            }
        }
        _ => declaration_or_expression(p, embedded),
    }
}

pub(crate) fn block(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if !p.expect(LEFT_BRACE) {
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
        return m.complete(p, BLOCK);
    }
    statement_list(p, |p| p.at(RIGHT_BRACE));
    p.expect(RIGHT_BRACE);
    m.complete(p, BLOCK)
}

/// Statements up to `at_end`. Tokens that cannot start a statement are
/// skipped with one diagnostic per run; member keywords end the list so the
/// enclosing type can resume.
fn statement_list(p: &mut Parser<'_>, at_end: impl Fn(&mut Parser<'_>) -> bool) {
    let list = p.start();
    let mut skipping = false;
    while !p.at(EOF) && !at_end(p) {
        if p.at_ts(MEMBER_START) {
            break;
        }
        if !at_statement_start(p) {
            if !skipping {
                p.error_at_current(ErrorCode::InvalidExprTerm);
                skipping = true;
            }
            p.skip();
            continue;
        }
        skipping = false;
        let before = p.position();
        statement(p);
        if p.position() == before {
            p.skip();
        }
    }
    list.complete(p, LIST);
}

fn block_statement(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump();
    block(p);
    m.complete(p, kind);
}

fn keyword_statement(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump();
    p.expect(SEMICOLON);
    m.complete(p, kind);
}

/// `return` and `throw`.
fn optional_expression_statement(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.bump();
    if exprs::at_expression_start(p) {
        exprs::expr(p);
    } else {
        p.empty();
    }
    p.expect(SEMICOLON);
    m.complete(p, kind);
}

fn expression_statement(p: &mut Parser<'_>) {
    let m = p.start();
    exprs::expr(p);
    p.expect(SEMICOLON);
    m.complete(p, EXPRESSION_STATEMENT);
}

/// `( expr )` as found after `if`, `while`, `lock` and `switch`.
fn parenthesized_condition(p: &mut Parser<'_>) {
    p.expect(LEFT_PAREN);
    exprs::expr(p);
    p.expect(RIGHT_PAREN);
}

fn if_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p);
    if p.at(ELSE_KW) {
        let clause = p.start();
        p.bump();
        embedded_statement(p);
        clause.complete(p, ELSE_CLAUSE);
    } else {
        p.empty();
    }
    m.complete(p, IF_STATEMENT);
}

fn while_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p);
    m.complete(p, WHILE_STATEMENT);
}

fn do_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    embedded_statement(p);
    p.expect(WHILE_KW);
    parenthesized_condition(p);
    p.expect(SEMICOLON);
    m.complete(p, DO_STATEMENT);
}

fn lock_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    embedded_statement(p);
    m.complete(p, LOCK_STATEMENT);
}

fn for_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    p.expect(LEFT_PAREN);
    if local_shape(p) == Some(Local::Variable) {
        let ty = types::return_type(p);
        members::variable_declaration(p, ty, DeclaratorContext::LOCAL);
        empty_list(p);
    } else {
        p.empty();
        expression_list(p, SEMICOLON);
    }
    p.expect(SEMICOLON);
    if p.at(SEMICOLON) {
        p.empty();
    } else {
        exprs::expr(p);
    }
    p.expect(SEMICOLON);
    expression_list(p, RIGHT_PAREN);
    p.expect(RIGHT_PAREN);
    embedded_statement(p);
    m.complete(p, FOR_STATEMENT);
}

fn expression_list(p: &mut Parser<'_>, ket: SyntaxKind) {
    super::separated(p, ket, false, exprs::at_expression_start, |p| {
        exprs::expr(p);
    });
}

/// `foreach`, optionally preceded by an already consumed `await`.
fn foreach_statement(p: &mut Parser<'_>, awaited: Option<Marker>) {
    let m = match awaited {
        Some(m) => m,
        None => {
            let m = p.start();
            p.empty();
            m
        }
    };
    p.bump();
    p.expect(LEFT_PAREN);
    let typed = match types::scan_type(p, 0) {
        Some((after, _)) => is_identifier(p, after) || p.nth(after) == IN_KW,
        None => false,
    };
    let kind = if typed {
        types::return_type(p);
        identifier(p);
        FOREACH_STATEMENT
    } else {
        exprs::expr(p);
        FOREACH_VARIABLE_STATEMENT
    };
    p.expect(IN_KW);
    exprs::expr(p);
    p.expect(RIGHT_PAREN);
    embedded_statement(p);
    m.complete(p, kind);
}

/// `using (resource) stmt`, or a `using` local declaration.
fn using_statement(p: &mut Parser<'_>, awaited: Option<Marker>, embedded: bool) {
    let m = match awaited {
        Some(m) => m,
        None => {
            let m = p.start();
            p.empty();
            m
        }
    };
    if p.nth(1) != LEFT_PAREN {
        let range = p.current_range();
        if embedded {
            p.error(ErrorCode::BadEmbeddedStmt, range);
        }
        p.bump();
        p.feature(Feature::UsingDeclarations, range);
        let mods = modifiers(p);
        check_modifiers(p, &mods, SyntaxSet::EMPTY);
        let ty = types::return_type(p);
        members::variable_declaration(p, ty, DeclaratorContext::LOCAL);
        p.expect(SEMICOLON);
        m.complete(p, LOCAL_DECLARATION_STATEMENT);
        return;
    }

    p.bump();
    p.bump();
    if local_shape(p) == Some(Local::Variable) {
        let ty = types::return_type(p);
        members::variable_declaration(p, ty, DeclaratorContext::LOCAL);
        p.empty();
    } else {
        p.empty();
        exprs::expr(p);
    }
    p.expect(RIGHT_PAREN);
    embedded_statement(p);
    m.complete(p, USING_STATEMENT);
}

fn fixed_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    p.expect(LEFT_PAREN);
    let ty = types::type_(p, TypeMode::Normal);
    members::variable_declaration(p, ty, DeclaratorContext::LOCAL);
    p.expect(RIGHT_PAREN);
    embedded_statement(p);
    m.complete(p, FIXED_STATEMENT);
}

fn goto_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    let kind = match p.current() {
        CASE_KW => {
            p.bump();
            exprs::expr(p);
            GOTO_CASE_STATEMENT
        }
        DEFAULT_KW => {
            p.bump();
            GOTO_DEFAULT_STATEMENT
        }
        _ => {
            identifier_name(p);
            GOTO_STATEMENT
        }
    };
    p.expect(SEMICOLON);
    m.complete(p, kind);
}

fn yield_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(YIELD_KW);
    let kind = if p.eat(RETURN_KW) {
        exprs::expr(p);
        YIELD_RETURN_STATEMENT
    } else {
        p.bump();
        YIELD_BREAK_STATEMENT
    };
    p.expect(SEMICOLON);
    m.complete(p, kind);
}

fn labeled_statement(p: &mut Parser<'_>, embedded: bool) {
    let m = p.start();
    if embedded {
        let range = p.current_range();
        p.error(ErrorCode::BadEmbeddedStmt, range);
    }
    identifier(p);
    p.bump();
    statement(p);
    m.complete(p, LABELED_STATEMENT);
}

fn switch_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    parenthesized_condition(p);
    if !p.expect(LEFT_BRACE) {
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
        m.complete(p, SWITCH_STATEMENT);
        return;
    }
    let sections = p.start();
    let mut skipping = false;
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        if at_switch_label(p) {
            skipping = false;
            switch_section(p);
        } else if p.at_ts(MEMBER_START) {
            break;
        } else {
            if !skipping {
                p.error_at_current(ErrorCode::InvalidExprTerm);
                skipping = true;
            }
            p.skip();
        }
    }
    sections.complete(p, LIST);
    p.expect(RIGHT_BRACE);
    m.complete(p, SWITCH_STATEMENT);
}

fn at_switch_label(p: &mut Parser<'_>) -> bool {
    p.at(CASE_KW) || (p.at(DEFAULT_KW) && p.nth(1) == COLON)
}

fn switch_section(p: &mut Parser<'_>) {
    let m = p.start();
    let labels = p.start();
    while at_switch_label(p) {
        switch_label(p);
    }
    labels.complete(p, LIST);
    statement_list(p, |p| p.at(RIGHT_BRACE) || at_switch_label(p));
    m.complete(p, SWITCH_SECTION);
}

fn switch_label(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(DEFAULT_KW) {
        p.bump();
        p.expect(COLON);
        m.complete(p, DEFAULT_SWITCH_LABEL);
        return;
    }

    p.bump();
    let range = p.current_range();
    if exprs::at_pattern(p) {
        exprs::pattern(p, PatternContext::Case);
        p.feature(Feature::PatternMatching, range);
        when_or_empty(p);
        p.expect(COLON);
        m.complete(p, CASE_PATTERN_SWITCH_LABEL);
        return;
    }

    let value = exprs::expr(p);
    if p.at(WHEN_KW) {
        value.precede(p).complete(p, CONSTANT_PATTERN);
        p.feature(Feature::PatternMatching, range);
        exprs::when_clause(p);
        p.expect(COLON);
        m.complete(p, CASE_PATTERN_SWITCH_LABEL);
    } else {
        p.expect(COLON);
        m.complete(p, CASE_SWITCH_LABEL);
    }
}

fn when_or_empty(p: &mut Parser<'_>) {
    if p.at(WHEN_KW) {
        exprs::when_clause(p);
    } else {
        p.empty();
    }
}

fn try_statement(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    block(p);
    let catches = p.start();
    let mut handlers = 0;
    while p.at(CATCH_KW) {
        catch_clause(p);
        handlers += 1;
    }
    catches.complete(p, LIST);
    if p.at(FINALLY_KW) {
        let clause = p.start();
        p.bump();
        block(p);
        clause.complete(p, FINALLY_CLAUSE);
        handlers += 1;
    } else {
        p.empty();
    }
    if handlers == 0 {
        p.error_missing(ErrorCode::ExpectedEndTry);
    }
    m.complete(p, TRY_STATEMENT);
}

fn catch_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if p.at(LEFT_PAREN) {
        let declaration = p.start();
        p.bump();
        types::type_(p, TypeMode::Normal);
        if is_identifier(p, 0) {
            identifier(p);
        } else {
            p.empty();
        }
        p.expect(RIGHT_PAREN);
        declaration.complete(p, CATCH_DECLARATION);
    } else {
        p.empty();
    }
    if p.at(WHEN_KW) {
        let filter = p.start();
        let range = p.current_range();
        p.bump_as(WHEN_KW);
        p.feature(Feature::ExceptionFilters, range);
        parenthesized_condition(p);
        filter.complete(p, CATCH_FILTER_CLAUSE);
    } else {
        p.empty();
    }
    block(p);
    m.complete(p, CATCH_CLAUSE);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Local {
    Variable,
    Function,
}

/// Decides whether the statement starting here declares a local variable or
/// a local function, without consuming anything.
fn local_shape(p: &mut Parser<'_>) -> Option<Local> {
    if p.context().is_async && p.at(AWAIT_KW) {
        return None;
    }
    let mut n = 0;
    loop {
        if LOCAL_MODIFIERS.contains(p.nth(n)) {
            n += 1;
        } else if p.nth_at(n, ASYNC_KW) && matches!(types::scan_type(p, n + 1), Some((after, _)) if p.nth(after) == IDENT) {
            n += 1;
        } else {
            break;
        }
    }
    let has_modifiers = n > 0;
    if p.nth(n) == REF_KW {
        n += 1;
        if p.nth(n) == READONLY_KW {
            n += 1;
        }
    }
    let Some((after, shape)) = types::scan_type(p, n) else {
        return has_modifiers.then_some(Local::Variable);
    };
    if !is_identifier(p, after) {
        return has_modifiers.then_some(Local::Variable);
    }

    let suffixed = matches!(p.nth(after - 1), QUESTION | STAR);
    let local = match p.nth(after + 1) {
        EQ | SEMICOLON | COMMA | LEFT_BRACKET | RIGHT_PAREN | IN_KW => Some(Local::Variable),
        LT => Some(Local::Function),
        // `a ? b(c) : d` reads like a nullable return type.
        LEFT_PAREN if suffixed && p.nth(n) != QUESTION && !p.nth(n).is_predefined_type() => {
            is_function_body_after_parameters(p, after + 1).then_some(Local::Function)
        }
        LEFT_PAREN => Some(Local::Function),
        _ if has_modifiers || !suffixed || shape == ScannedType::Name => Some(Local::Variable),
        _ => None,
    };
    tracing::trace!(?local, "local declaration lookahead");
    local
}

/// Whether the parenthesized list at `n` is followed by a body.
fn is_function_body_after_parameters(p: &mut Parser<'_>, n: u32) -> bool {
    let mut depth = 0u32;
    for k in n..n.saturating_add(256) {
        match p.nth(k) {
            LEFT_PAREN => depth += 1,
            RIGHT_PAREN => {
                depth -= 1;
                if depth == 0 {
                    return matches!(p.nth(k + 1), LEFT_BRACE | FAT_ARROW) || p.nth_at(k + 1, WHERE_KW);
                }
            }
            EOF | SEMICOLON | LEFT_BRACE | RIGHT_BRACE | COLON => return false,
            _ => {}
        }
    }
    false
}

fn declaration_or_expression(p: &mut Parser<'_>, embedded: bool) {
    let Some(local) = local_shape(p) else {
        expression_statement(p);
        return;
    };
    if embedded {
        let range = p.current_range();
        p.error(ErrorCode::BadEmbeddedStmt, range);
    }

    let m = p.start();
    let start = p.current_range();
    if local == Local::Variable {
        p.empty();
        p.empty();
    }
    let mods = modifiers(p);
    let void = p.at(VOID_KW).then(|| p.current_range());
    let ty = types::return_type(p);
    match local {
        Local::Variable => {
            check_modifiers(p, &mods, SyntaxSet::new([CONST_KW]));
            if let Some(range) = void {
                p.error(ErrorCode::NoVoidHere, range);
            }
            let context = DeclaratorContext { is_const: mods.contains(CONST_KW), ..DeclaratorContext::LOCAL };
            members::variable_declaration(p, ty, context);
            p.expect(SEMICOLON);
            m.complete(p, LOCAL_DECLARATION_STATEMENT);
        }
        Local::Function => {
            check_modifiers(p, &mods, LOCAL_FUNCTION_MODIFIERS);
            p.feature(Feature::LocalFunctions, TextRange::new(start.start(), p.prev_end()));
            if let Some(range) = mods.range(STATIC_KW) {
                p.feature(Feature::StaticLocalFunctions, range);
            }
            identifier(p);
            let generic = items::optional_type_parameter_list(p, false);
            members::parameter_list(p, members::ParameterContext::Method);
            items::constraint_clauses(p, generic);
            let context = Context { is_async: mods.contains(ASYNC_KW), in_query: false };
            p.with_context(context, |p| members::body(p, Feature::ExpressionBodiedMembers));
            m.complete(p, LOCAL_FUNCTION_STATEMENT);
        }
    }
}
