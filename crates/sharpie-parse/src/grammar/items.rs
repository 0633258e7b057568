use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::*;
use sharpie_syntax::{SyntaxSet, TextRange};

use super::attributes::{at_global_attribute, attribute_list, attribute_lists, name_equals};
use super::types::{self, TypeMode};
use super::{
    Modifiers, check_modifiers, empty_list, exprs, identifier, identifier_name, members, modifiers,
    nth_modifier, separated,
};
use crate::options::Feature;
use crate::parser::{CompletedMarker, Marker, Parser};

pub(crate) fn compilation_unit(p: &mut Parser<'_>) {
    let m = p.start();
    declarations(p, true);
    p.bump_eof();
    m.complete(p, COMPILATION_UNIT);
}

fn at_extern_directive(p: &mut Parser<'_>) -> bool {
    p.at(EXTERN_KW) && (p.nth_at(1, ALIAS_KW) || (p.nth(1) == IDENT && p.nth(2) == SEMICOLON))
}

fn at_using_directive(p: &mut Parser<'_>) -> bool {
    p.at(USING_KW) && p.nth(1) != LEFT_PAREN
}

/// Extern directives, using directives, global attributes (at the root
/// only) and members, in that order. Directives found out of order are
/// reported and kept as skipped text.
fn declarations(p: &mut Parser<'_>, root: bool) {
    let externs = p.start();
    while at_extern_directive(p) {
        extern_directive(p);
    }
    externs.complete(p, LIST);

    let usings = p.start();
    loop {
        if at_using_directive(p) {
            using_directive(p);
        } else if at_extern_directive(p) {
            misplaced(p, ErrorCode::ExternAfterElements, extern_directive);
        } else {
            break;
        }
    }
    usings.complete(p, LIST);

    if root {
        let attributes = p.start();
        loop {
            if at_global_attribute(p) {
                attribute_list(p);
            } else if at_using_directive(p) {
                misplaced(p, ErrorCode::UsingAfterElements, using_directive);
            } else if at_extern_directive(p) {
                misplaced(p, ErrorCode::ExternAfterElements, extern_directive);
            } else {
                break;
            }
        }
        attributes.complete(p, LIST);
    }

    let list = p.start();
    let mut skipping = false;
    loop {
        if p.at(EOF) || (!root && p.at(RIGHT_BRACE)) {
            break;
        }
        let before = p.position();
        if at_extern_directive(p) {
            misplaced(p, ErrorCode::ExternAfterElements, extern_directive);
        } else if at_using_directive(p) {
            misplaced(p, ErrorCode::UsingAfterElements, using_directive);
        } else if at_global_attribute(p) {
            misplaced(p, ErrorCode::GlobalAttributesNotFirst, |p| {
                attribute_list(p);
            });
        } else if p.at(NAMESPACE_KW) {
            namespace_declaration(p);
        } else if at_member_start(p) {
            member_or_type(p, true);
        } else {
            if !skipping {
                p.error_at_current(ErrorCode::EOFExpected);
            }
            p.skip();
            skipping = true;
            continue;
        }
        skipping = false;
        if p.position() == before {
            p.skip();
        }
    }
    list.complete(p, LIST);
}

/// Parses a directive with `parse`, reports `code` on its first token and
/// demotes the whole directive to skipped text.
fn misplaced(p: &mut Parser<'_>, code: ErrorCode, parse: impl FnOnce(&mut Parser<'_>)) {
    tracing::trace!(?code, "directive out of order");
    let m = p.start();
    let range = p.current_range();
    p.error(code, range);
    parse(p);
    m.complete_skipped(p);
}

fn extern_directive(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if p.at(ALIAS_KW) {
        p.bump_as(ALIAS_KW);
    } else {
        p.missing(ALIAS_KW);
    }
    identifier(p);
    p.expect(SEMICOLON);
    m.complete(p, EXTERN_ALIAS_DIRECTIVE);
}

fn using_directive(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if p.at(STATIC_KW) {
        let range = p.current_range();
        p.bump();
        p.feature(Feature::UsingStatic, range);
    } else {
        p.empty();
    }
    if p.at(IDENT) && p.nth(1) == EQ {
        name_equals(p);
    } else {
        p.empty();
    }
    types::name(p);
    p.expect(SEMICOLON);
    m.complete(p, USING_DIRECTIVE);
}

fn namespace_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    namespace_name(p);
    if !p.expect(LEFT_BRACE) {
        empty_list(p);
        empty_list(p);
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
        p.empty();
        m.complete(p, NAMESPACE_DECLARATION);
        return;
    }
    p.nested(|p| declarations(p, false));
    p.expect(RIGHT_BRACE);
    if !p.eat(SEMICOLON) {
        p.empty();
    }
    m.complete(p, NAMESPACE_DECLARATION);
}

/// Dotted namespace name. Aliases and type arguments are parsed so the
/// tree stays faithful, then reported.
fn namespace_name(p: &mut Parser<'_>) -> CompletedMarker {
    let mut lhs = if p.at(IDENT) && p.nth(1) == COLON_COLON {
        let range = TextRange::new(p.current_range().start(), p.nth_range(1).end());
        p.error(ErrorCode::UnexpectedAliasedName, range);
        types::alias_qualified_name(p, TypeMode::Normal)
    } else {
        namespace_segment(p)
    };
    while p.at(DOT) {
        let m = lhs.precede(p);
        p.bump();
        namespace_segment(p);
        lhs = m.complete(p, QUALIFIED_NAME);
    }
    lhs
}

fn namespace_segment(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    identifier(p);
    if !p.at(LT) {
        return m.complete(p, IDENTIFIER_NAME);
    }
    let start = p.current_range().start();
    types::type_argument_list(p);
    p.error(ErrorCode::UnexpectedGenericName, TextRange::new(start, p.prev_end()));
    m.complete(p, GENERIC_NAME)
}

fn at_member_start(p: &mut Parser<'_>) -> bool {
    matches!(
        p.current(),
        LEFT_BRACKET
            | TILDE
            | EVENT_KW
            | IMPLICIT_KW
            | EXPLICIT_KW
            | CLASS_KW
            | STRUCT_KW
            | INTERFACE_KW
            | ENUM_KW
            | DELEGATE_KW
            | REF_KW
    ) || nth_modifier(p, 0).is_some()
        || types::at_type_start(p)
}

/// A type declaration or member, starting at its attributes.
fn member_or_type(p: &mut Parser<'_>, in_namespace: bool) {
    let m = p.start();
    let start = p.current_range().start();
    attribute_lists(p);
    let mods = modifiers(p);
    match p.current() {
        CLASS_KW | STRUCT_KW | INTERFACE_KW => {
            type_declaration(p, m, &mods);
        }
        ENUM_KW => {
            enum_declaration(p, m);
        }
        DELEGATE_KW => {
            delegate_declaration(p, m);
        }
        USING_KW | NAMESPACE_KW if in_namespace => {
            check_modifiers(p, &mods, SyntaxSet::EMPTY);
            m.complete_skipped(p);
            if p.at(USING_KW) {
                using_directive(p);
            } else {
                namespace_declaration(p);
            }
        }
        _ => {
            let member = members::member(p, m, &mods);
            if in_namespace && member.kind() != INCOMPLETE_MEMBER {
                p.error(ErrorCode::NamespaceUnexpected, TextRange::new(start, p.prev_end()));
            }
        }
    }
}

fn type_declaration(p: &mut Parser<'_>, m: Marker, mods: &Modifiers) -> CompletedMarker {
    let keyword = p.current();
    let kind = match keyword {
        CLASS_KW => CLASS_DECLARATION,
        STRUCT_KW => STRUCT_DECLARATION,
        _ => INTERFACE_DECLARATION,
    };
    if keyword == CLASS_KW
        && let Some(range) = mods.range(STATIC_KW)
    {
        p.feature(Feature::StaticClasses, range);
    }
    if keyword == STRUCT_KW {
        if let Some(range) = mods.range(READONLY_KW) {
            p.feature(Feature::ReadOnlyStructs, range);
        }
        if let Some(range) = mods.range(REF_KW) {
            p.feature(Feature::RefStructs, range);
        }
    }
    p.bump();
    identifier(p);
    let generic = optional_type_parameter_list(p, keyword == INTERFACE_KW);
    if p.at(COLON) {
        base_list(p);
    } else {
        p.empty();
    }
    constraint_clauses(p, generic);
    type_body(p);
    if !p.eat(SEMICOLON) {
        p.empty();
    }
    m.complete(p, kind)
}

fn type_body(p: &mut Parser<'_>) {
    if !p.expect(LEFT_BRACE) {
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
        return;
    }
    p.nested(|p| {
        let list = p.start();
        let mut skipping = false;
        while !p.at(RIGHT_BRACE) && !p.at(EOF) {
            if !at_member_start(p) {
                if !skipping {
                    p.error_at_current(ErrorCode::InvalidMemberDecl);
                    skipping = true;
                }
                p.skip();
                continue;
            }
            skipping = false;
            let before = p.position();
            member_or_type(p, false);
            if p.position() == before {
                p.skip();
            }
        }
        list.complete(p, LIST);
    });
    p.expect(RIGHT_BRACE);
}

fn enum_declaration(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    identifier(p);
    if p.at(COLON) {
        base_list(p);
    } else {
        p.empty();
    }
    if p.expect(LEFT_BRACE) {
        separated(p, RIGHT_BRACE, true, |p| p.at(IDENT) || p.at(LEFT_BRACKET), enum_member);
        p.expect(RIGHT_BRACE);
    } else {
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
    }
    if !p.eat(SEMICOLON) {
        p.empty();
    }
    m.complete(p, ENUM_DECLARATION)
}

fn enum_member(p: &mut Parser<'_>) {
    let m = p.start();
    attribute_lists(p);
    identifier(p);
    if p.at(EQ) {
        let value = p.start();
        p.bump();
        exprs::expr(p);
        value.complete(p, EQUALS_VALUE_CLAUSE);
    } else {
        p.empty();
    }
    m.complete(p, ENUM_MEMBER_DECLARATION);
}

fn delegate_declaration(p: &mut Parser<'_>, m: Marker) -> CompletedMarker {
    p.bump();
    types::return_type(p);
    identifier(p);
    let generic = optional_type_parameter_list(p, true);
    members::parameter_list(p, members::ParameterContext::Method);
    constraint_clauses(p, generic);
    p.expect(SEMICOLON);
    m.complete(p, DELEGATE_DECLARATION)
}

fn base_list(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    separated(p, LEFT_BRACE, false, at_constraint_type, |p| {
        let base = p.start();
        types::type_(p, TypeMode::Normal);
        base.complete(p, SIMPLE_BASE_TYPE);
    });
    m.complete(p, BASE_LIST);
}

/// A type in a base list or constraint; `where` starts the next clause.
fn at_constraint_type(p: &mut Parser<'_>) -> bool {
    types::at_type_start(p) && !p.at(WHERE_KW)
}

/// `<T, in U>`, or an empty slot. Returns whether a list was present.
/// Variance annotations are only allowed on interfaces and delegates.
pub(crate) fn optional_type_parameter_list(p: &mut Parser<'_>, variance_allowed: bool) -> bool {
    if !p.at(LT) {
        p.empty();
        return false;
    }
    let m = p.start();
    let range = p.current_range();
    p.bump();
    p.feature(Feature::Generics, range);
    separated(
        p,
        GT,
        false,
        |p| matches!(p.current(), IDENT | LEFT_BRACKET | IN_KW | OUT_KW),
        |p| type_parameter(p, variance_allowed),
    );
    p.expect(GT);
    m.complete(p, TYPE_PARAMETER_LIST);
    true
}

fn type_parameter(p: &mut Parser<'_>, variance_allowed: bool) {
    let m = p.start();
    attribute_lists(p);
    if matches!(p.current(), IN_KW | OUT_KW) {
        let range = p.current_range();
        if variance_allowed {
            p.feature(Feature::Variance, range);
        } else {
            p.error(ErrorCode::IllegalVarianceSyntax, range);
        }
        p.bump();
    } else {
        p.empty();
    }
    identifier(p);
    m.complete(p, TYPE_PARAMETER);
}

/// Zero or more `where T : ...` clauses.
pub(crate) fn constraint_clauses(p: &mut Parser<'_>, generic: bool) {
    let list = p.start();
    while p.at(WHERE_KW) {
        if !generic {
            let range = p.current_range();
            p.error(ErrorCode::ConstraintOnlyAllowedOnGenericDecl, range);
        }
        constraint_clause(p);
    }
    list.complete(p, LIST);
}

fn constraint_clause(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump_as(WHERE_KW);
    identifier_name(p);
    p.expect(COLON);
    separated(
        p,
        LEFT_BRACE,
        false,
        |p| matches!(p.current(), CLASS_KW | STRUCT_KW | NEW_KW) || at_constraint_type(p),
        constraint,
    );
    m.complete(p, TYPE_PARAMETER_CONSTRAINT_CLAUSE);
}

fn constraint(p: &mut Parser<'_>) {
    let m = p.start();
    let kind = match p.current() {
        CLASS_KW => {
            p.bump();
            if !p.eat(QUESTION) {
                p.empty();
            }
            CLASS_CONSTRAINT
        }
        STRUCT_KW => {
            p.bump();
            STRUCT_CONSTRAINT
        }
        NEW_KW => {
            p.bump();
            p.expect(LEFT_PAREN);
            p.expect(RIGHT_PAREN);
            CONSTRUCTOR_CONSTRAINT
        }
        _ => {
            types::type_(p, TypeMode::Normal);
            TYPE_CONSTRAINT
        }
    };
    m.complete(p, kind);
}
