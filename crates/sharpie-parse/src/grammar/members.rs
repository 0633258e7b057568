use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::{self, *};
use sharpie_syntax::TextRange;

use super::attributes::attribute_lists;
use super::types::{self, TypeMode};
use super::{Modifiers, empty_list, exprs, identifier, items, separated};
use crate::options::Feature;
use crate::parser::{CompletedMarker, Context, Marker, Parser};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParameterContext {
    Method,
    Indexer,
    Lambda,
    AnonymousMethod,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DeclaratorContext {
    pub(crate) is_const: bool,
    /// Fixed-size buffers may size their declarators: `fixed int b[4];`.
    pub(crate) is_fixed: bool,
    /// Local declarators end at the first token that is not a comma. Field
    /// declarators read on past a missing one.
    pub(crate) is_local: bool,
}

impl DeclaratorContext {
    pub(crate) const LOCAL: Self = Self { is_const: false, is_fixed: false, is_local: true };
    const EVENT: Self = Self { is_const: false, is_fixed: false, is_local: false };

    fn for_field(mods: &Modifiers) -> Self {
        Self { is_const: mods.contains(CONST_KW), is_fixed: mods.contains(FIXED_KW), is_local: false }
    }
}

/// Parses the rest of a type member whose attributes and modifiers are
/// already consumed under `m`.
pub(crate) fn member(p: &mut Parser<'_>, m: Marker, mods: &Modifiers) -> CompletedMarker {
    match p.current() {
        TILDE => return destructor(p, m),
        IDENT if p.nth(1) == LEFT_PAREN => return constructor(p, m),
        EVENT_KW => return event(p, m),
        IMPLICIT_KW | EXPLICIT_KW => return conversion_operator(p, m),
        _ => {}
    }

    if !types::at_type_start(p) && !p.at(REF_KW) {
        p.empty();
        return incomplete_member(p, m);
    }

    let void = p.at(VOID_KW).then(|| p.current_range());
    let ty = types::return_type(p);
    match p.current() {
        OPERATOR_KW => operator(p, m),
        THIS_KW => {
            p.empty();
            indexer(p, m)
        }
        IDENT => {
            match types::scan_explicit_interface(p, 0) {
                Some(segments) => {
                    explicit_interface(p, segments);
                    if p.at(THIS_KW) {
                        return indexer(p, m);
                    }
                    identifier(p);
                    if matches!(p.current(), LEFT_BRACE | FAT_ARROW) {
                        return property(p, m);
                    }
                    method(p, m, mods)
                }
                None => match p.nth(1) {
                    LEFT_PAREN | LT => {
                        p.empty();
                        identifier(p);
                        method(p, m, mods)
                    }
                    LEFT_BRACE | FAT_ARROW => {
                        p.empty();
                        identifier(p);
                        property(p, m)
                    }
                    _ => {
                        if let Some(range) = void {
                            p.error(ErrorCode::NoVoidHere, range);
                        }
                        variable_declaration(p, ty, DeclaratorContext::for_field(mods));
                        p.expect(SEMICOLON);
                        m.complete(p, FIELD_DECLARATION)
                    }
                },
            }
        }
        _ => incomplete_member(p, m),
    }
}

fn incomplete_member(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.error_at_current(ErrorCode::InvalidMemberDecl);
    m.complete(p, INCOMPLETE_MEMBER)
}

fn explicit_interface(p: &mut Parser<'_>, segments: u32) -> CompletedMarker {
    let m = p.start();
    types::name_prefix(p, segments);
    p.expect(DOT);
    m.complete(p, EXPLICIT_INTERFACE_SPECIFIER)
}

fn method(p: &mut Parser<'_>, m: Marker, mods: &Modifiers) -> CompletedMarker {
    let generic = items::optional_type_parameter_list(p, false);
    parameter_list(p, ParameterContext::Method);
    items::constraint_clauses(p, generic);
    let context = Context { is_async: mods.contains(ASYNC_KW), in_query: false };
    p.with_context(context, |p| body(p, Feature::ExpressionBodiedMembers));
    m.complete(p, METHOD_DECLARATION)
}

fn constructor(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    identifier(p);
    parameter_list(p, ParameterContext::Method);
    if p.at(COLON) {
        constructor_initializer(p);
    } else {
        p.empty();
    }
    body(p, Feature::ExpressionBodiedAccessors);
    m.complete(p, CONSTRUCTOR_DECLARATION)
}

fn constructor_initializer(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    let kind = match p.current() {
        BASE_KW => {
            p.bump();
            BASE_CONSTRUCTOR_INITIALIZER
        }
        THIS_KW => {
            p.bump();
            THIS_CONSTRUCTOR_INITIALIZER
        }
        _ => {
            p.missing(THIS_KW);
            THIS_CONSTRUCTOR_INITIALIZER
        }
    };
    if p.at(LEFT_PAREN) {
        exprs::argument_list(p);
    } else {
        let list = p.start();
        p.missing(LEFT_PAREN);
        empty_list(p);
        p.missing_silent(RIGHT_PAREN);
        list.complete(p, ARGUMENT_LIST);
    }
    m.complete(p, kind);
}

fn destructor(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    identifier(p);
    parameter_list(p, ParameterContext::Method);
    body(p, Feature::ExpressionBodiedAccessors);
    m.complete(p, DESTRUCTOR_DECLARATION)
}

/// The `{ ... }`, `=> expr;` or `;` ending a method-like member. Fills the
/// block, arrow and semicolon slots.
pub(crate) fn body(p: &mut Parser<'_>, arrow: Feature) {
    match p.current() {
        LEFT_BRACE => {
            super::stmts::block(p);
            p.empty();
            if p.at(SEMICOLON) {
                p.error_at_current(ErrorCode::UnexpectedSemicolon);
                p.bump();
            } else {
                p.empty();
            }
        }
        FAT_ARROW => {
            p.empty();
            arrow_clause(p, arrow);
            p.expect(SEMICOLON);
        }
        _ => {
            p.empty();
            p.empty();
            p.expect(SEMICOLON);
        }
    }
}

fn arrow_clause(p: &mut Parser<'_>, feature: Feature) -> CompletedMarker {
    let m = p.start();
    let range = p.current_range();
    p.bump();
    p.feature(feature, range);
    exprs::expr(p);
    m.complete(p, ARROW_EXPRESSION_CLAUSE)
}

fn property(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    if p.at(LEFT_BRACE) {
        accessor_list(p, false);
        p.empty();
        if p.at(EQ) {
            let initializer = p.start();
            let range = p.current_range();
            p.bump();
            p.feature(Feature::AutoPropertyInitializers, range);
            exprs::variable_initializer(p);
            initializer.complete(p, EQUALS_VALUE_CLAUSE);
            p.expect(SEMICOLON);
        } else {
            p.empty();
            p.empty();
        }
    } else {
        p.empty();
        arrow_clause(p, Feature::ExpressionBodiedMembers);
        p.empty();
        p.expect(SEMICOLON);
    }
    m.complete(p, PROPERTY_DECLARATION)
}

fn indexer(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    parameter_list(p, ParameterContext::Indexer);
    match p.current() {
        FAT_ARROW => {
            p.empty();
            arrow_clause(p, Feature::ExpressionBodiedMembers);
            p.expect(SEMICOLON);
        }
        _ => {
            accessor_list(p, false);
            p.empty();
            p.empty();
        }
    }
    m.complete(p, INDEXER_DECLARATION)
}

fn event(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    let ty = types::type_(p, TypeMode::Normal);
    let explicit = types::scan_explicit_interface(p, 0);
    if explicit.is_none() && !(p.at(IDENT) && p.nth(1) == LEFT_BRACE) {
        variable_declaration(p, ty, DeclaratorContext::EVENT);
        p.expect(SEMICOLON);
        return m.complete(p, EVENT_FIELD_DECLARATION);
    }
    match explicit {
        Some(segments) => {
            explicit_interface(p, segments);
        }
        None => p.empty(),
    }
    identifier(p);
    accessor_list(p, true);
    m.complete(p, EVENT_DECLARATION)
}

fn accessor_list(p: &mut Parser<'_>, event: bool) -> CompletedMarker {
    let m = p.start();
    if !p.expect(LEFT_BRACE) {
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
        return m.complete(p, ACCESSOR_LIST);
    }
    let list = p.start();
    while !p.at(RIGHT_BRACE) && !p.at(EOF) {
        let before = p.position();
        accessor(p, event);
        if p.position() == before {
            break;
        }
    }
    list.complete(p, LIST);
    p.expect(RIGHT_BRACE);
    m.complete(p, ACCESSOR_LIST)
}

fn accessor(p: &mut Parser<'_>, event: bool) {
    let m = p.start();
    attribute_lists(p);
    super::modifiers(p);
    let kind = match p.nth_contextual(0) {
        GET_KW if !event => Some(GET_ACCESSOR_DECLARATION),
        SET_KW if !event => Some(SET_ACCESSOR_DECLARATION),
        ADD_KW if event => Some(ADD_ACCESSOR_DECLARATION),
        REMOVE_KW if event => Some(REMOVE_ACCESSOR_DECLARATION),
        _ => None,
    };
    let kind = match kind {
        Some(kind) => {
            let keyword = p.nth_contextual(0);
            p.bump_as(keyword);
            kind
        }
        None => {
            let code = if event { ErrorCode::AddOrRemoveExpected } else { ErrorCode::GetOrSetExpected };
            p.error_at_current(code);
            if p.at(IDENT) {
                p.bump();
            } else {
                p.missing_silent(IDENT);
            }
            UNKNOWN_ACCESSOR_DECLARATION
        }
    };
    if event && p.at(SEMICOLON) {
        let range = p.current_range();
        p.error(ErrorCode::AddRemoveMustHaveBody, range);
    }
    if matches!(p.current(), LEFT_BRACE | FAT_ARROW | SEMICOLON) {
        body(p, Feature::ExpressionBodiedAccessors);
    } else {
        p.empty();
        p.empty();
        if kind == UNKNOWN_ACCESSOR_DECLARATION {
            p.missing_silent(SEMICOLON);
        } else {
            p.expect(SEMICOLON);
        }
    }
    m.complete(p, kind);
}

const UNARY_ONLY: [SyntaxKind; 6] = [BANG, TILDE, PLUS_PLUS, MINUS_MINUS, TRUE_KW, FALSE_KW];

fn operator(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    let range = p.current_range();
    let token = overloadable_operator(p);
    if token.is_none() {
        if p.at(LEFT_PAREN) {
            p.error_missing(ErrorCode::OvlOperatorExpected);
            p.missing_silent(PLUS);
        } else {
            p.error_at_current(ErrorCode::OvlOperatorExpected);
            p.bump();
        }
    }
    let count = parameter_list(p, ParameterContext::Method);
    if let Some(token) = token {
        let code = match token {
            PLUS | MINUS => (!matches!(count, 1 | 2)).then_some(ErrorCode::OvlOperatorExpected),
            _ if UNARY_ONLY.contains(&token) => (count != 1).then_some(ErrorCode::OvlUnaryOperatorExpected),
            _ => (count != 2).then_some(ErrorCode::OvlBinaryOperatorExpected),
        };
        if let Some(code) = code {
            p.error(code, range);
        }
    }
    body(p, Feature::ExpressionBodiedMembers);
    m.complete(p, OPERATOR_DECLARATION)
}

/// Consumes an overloadable operator token, merging `>>` from two `>`.
fn overloadable_operator(p: &mut Parser<'_>) -> Option<SyntaxKind> {
    let kind = p.current();
    if kind == GT && p.nth(1) == GT && p.nth_joined(0) {
        p.bump_joined(SHR, 2);
        return Some(SHR);
    }
    let overloadable = matches!(
        kind,
        PLUS | MINUS
            | BANG
            | TILDE
            | PLUS_PLUS
            | MINUS_MINUS
            | STAR
            | SLASH
            | PERCENT
            | AMP
            | PIPE
            | CARET
            | SHL
            | EQ_EQ
            | BANG_EQ
            | GT
            | LT
            | GT_EQ
            | LT_EQ
            | TRUE_KW
            | FALSE_KW
    );
    if !overloadable {
        return None;
    }
    p.bump();
    Some(kind)
}

fn conversion_operator(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    p.expect(OPERATOR_KW);
    types::type_(p, TypeMode::Normal);
    parameter_list(p, ParameterContext::Method);
    body(p, Feature::ExpressionBodiedMembers);
    m.complete(p, CONVERSION_OPERATOR_DECLARATION)
}

fn at_parameter_start(p: &mut Parser<'_>) -> bool {
    matches!(
        p.current(),
        LEFT_BRACKET | REF_KW | OUT_KW | IN_KW | PARAMS_KW | THIS_KW | ARGLIST_KW
    ) || types::at_type_start(p)
}

/// Parses a parenthesized (or, for indexers, bracketed) parameter list and
/// returns the number of parameters.
pub(crate) fn parameter_list(p: &mut Parser<'_>, context: ParameterContext) -> usize {
    let (bra, ket, kind) = match context {
        ParameterContext::Indexer => (LEFT_BRACKET, RIGHT_BRACKET, BRACKETED_PARAMETER_LIST),
        _ => (LEFT_PAREN, RIGHT_PAREN, PARAMETER_LIST),
    };
    let m = p.start();
    if !p.expect(bra) {
        empty_list(p);
        p.missing_silent(ket);
        m.complete(p, kind);
        return 0;
    }

    // Ranges of a `params` or `__arglist` parameter that must be last.
    let mut must_be_last: Option<(ErrorCode, TextRange)> = None;
    let count = separated(p, ket, false, at_parameter_start, |p| {
        if let Some((code, range)) = must_be_last.take() {
            p.error(code, range);
        }
        must_be_last = parameter(p, context);
    });
    p.expect(ket);
    m.complete(p, kind);
    count
}

fn parameter(p: &mut Parser<'_>, context: ParameterContext) -> Option<(ErrorCode, TextRange)> {
    let m = p.start();
    let mut must_be_last = None;
    attribute_lists(p);

    let list = p.start();
    let mut seen: Vec<SyntaxKind> = Vec::new();
    while matches!(p.current(), REF_KW | OUT_KW | IN_KW | PARAMS_KW | THIS_KW) {
        let kind = p.current();
        let range = p.current_range();
        if seen.contains(&kind) {
            p.error_at_current(ErrorCode::DupParamMod);
        }
        match kind {
            IN_KW => p.feature(Feature::InParameters, range),
            PARAMS_KW => must_be_last = Some((ErrorCode::ParamsLast, range)),
            _ => {}
        }
        seen.push(kind);
        p.bump();
    }
    list.complete(p, LIST);

    if p.at(ARGLIST_KW) {
        let range = p.current_range();
        p.empty();
        p.bump();
        p.empty();
        m.complete(p, PARAMETER);
        return Some((ErrorCode::VarargsLast, range));
    }

    let implicit = context == ParameterContext::Lambda
        && p.at(IDENT)
        && matches!(p.nth(1), COMMA | RIGHT_PAREN);
    if implicit {
        p.empty();
    } else {
        if p.at(VOID_KW) {
            let range = p.current_range();
            p.error(ErrorCode::NoVoidHere, range);
        }
        types::type_(p, TypeMode::Normal);
    }
    identifier(p);

    if p.at(EQ) {
        let range = p.current_range();
        equals_value_clause(p);
        match context {
            ParameterContext::Lambda | ParameterContext::AnonymousMethod => {
                p.error(ErrorCode::DefaultValueNotAllowed, range);
            }
            ParameterContext::Method | ParameterContext::Indexer => {
                p.feature(Feature::OptionalParameters, range);
            }
        }
    } else {
        p.empty();
    }
    m.complete(p, PARAMETER);
    must_be_last
}

fn equals_value_clause(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    exprs::variable_initializer(p);
    m.complete(p, EQUALS_VALUE_CLAUSE)
}

/// Wraps an already parsed type and the declarators after it.
pub(crate) fn variable_declaration(
    p: &mut Parser<'_>,
    ty: CompletedMarker,
    context: DeclaratorContext,
) -> CompletedMarker {
    let m = ty.precede(p);
    separated(
        p,
        SEMICOLON,
        false,
        |p| !context.is_local && p.at(IDENT),
        |p| variable_declarator(p, context),
    );
    m.complete(p, VARIABLE_DECLARATION)
}

fn variable_declarator(p: &mut Parser<'_>, context: DeclaratorContext) {
    let m = p.start();
    identifier(p);
    if p.at(LEFT_BRACKET) {
        let start = p.current_range().start();
        exprs::bracketed_argument_list(p);
        if !context.is_fixed {
            p.error(ErrorCode::CStyleArray, TextRange::new(start, p.prev_end()));
        }
    } else {
        p.empty();
    }
    if p.at(EQ) {
        equals_value_clause(p);
    } else {
        p.empty();
        if context.is_const {
            p.error_missing(ErrorCode::ConstValueRequired);
        }
    }
    m.complete(p, VARIABLE_DECLARATOR);
}
