use sharpie_errors::ErrorCode;
use sharpie_syntax::SyntaxKind::{self, *};
use sharpie_syntax::{SyntaxSet, TextRange};

use super::attributes::{name_colon, name_equals};
use super::members::{self, ParameterContext};
use super::types::{self, ScannedType, TypeMode};
use super::{empty_list, identifier, identifier_name, is_identifier, query, separated, stmts};
use crate::options::Feature;
use crate::parser::{CompletedMarker, Context, Marker, Parser};

const EXPRESSION_START: SyntaxSet = SyntaxSet::new([
    IDENT,
    NUMERIC_LITERAL,
    CHARACTER_LITERAL,
    STRING_LITERAL,
    INTERPOLATED_STRING_START,
    INTERPOLATED_VERBATIM_STRING_START,
    LEFT_PAREN,
    BANG,
    TILDE,
    PLUS,
    MINUS,
    PLUS_PLUS,
    MINUS_MINUS,
    AMP,
    STAR,
    CARET,
    DOT_DOT,
    THIS_KW,
    BASE_KW,
    NEW_KW,
    TYPEOF_KW,
    SIZEOF_KW,
    DEFAULT_KW,
    CHECKED_KW,
    UNCHECKED_KW,
    DELEGATE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    STACKALLOC_KW,
    THROW_KW,
    REF_KW,
    ARGLIST_KW,
    MAKEREF_KW,
    REFTYPE_KW,
    REFVALUE_KW,
    BOOL_KW,
    BYTE_KW,
    CHAR_KW,
    DECIMAL_KW,
    DOUBLE_KW,
    FLOAT_KW,
    INT_KW,
    LONG_KW,
    OBJECT_KW,
    SBYTE_KW,
    SHORT_KW,
    STRING_KW,
    UINT_KW,
    ULONG_KW,
    USHORT_KW,
]);

/// Tokens that confirm a scanned `<...>` in an expression is a type-argument
/// list rather than a pair of relational operators.
const TYPE_ARGUMENT_FOLLOW: SyntaxSet = SyntaxSet::new([
    LEFT_PAREN,
    RIGHT_PAREN,
    RIGHT_BRACKET,
    RIGHT_BRACE,
    COLON,
    SEMICOLON,
    COMMA,
    DOT,
    QUESTION,
    EQ_EQ,
    BANG_EQ,
    PIPE,
    CARET,
    AMP_AMP,
    PIPE_PIPE,
    AMP,
    LEFT_BRACKET,
    EOF,
]);

/// Keywords that turn a parenthesized plain name into a cast.
const CAST_FOLLOW_KEYWORDS: SyntaxSet = SyntaxSet::new([
    THIS_KW,
    BASE_KW,
    NEW_KW,
    TYPEOF_KW,
    SIZEOF_KW,
    DEFAULT_KW,
    CHECKED_KW,
    UNCHECKED_KW,
    DELEGATE_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    ARGLIST_KW,
    MAKEREF_KW,
    REFTYPE_KW,
    REFVALUE_KW,
    BOOL_KW,
    BYTE_KW,
    CHAR_KW,
    DECIMAL_KW,
    DOUBLE_KW,
    FLOAT_KW,
    INT_KW,
    LONG_KW,
    OBJECT_KW,
    SBYTE_KW,
    SHORT_KW,
    STRING_KW,
    UINT_KW,
    ULONG_KW,
    USHORT_KW,
]);

pub(crate) fn at_expression_start(p: &mut Parser<'_>) -> bool {
    nth_expression_start(p, 0)
}

pub(crate) fn nth_expression_start(p: &mut Parser<'_>, n: u32) -> bool {
    EXPRESSION_START.contains(p.nth(n))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Expression,
    Assignment,
    Conditional,
    Coalescing,
    ConditionalOr,
    ConditionalAnd,
    LogicalOr,
    LogicalXor,
    LogicalAnd,
    Equality,
    Relational,
    Shift,
    Range,
    Additive,
    Multiplicative,
    Switch,
}

#[derive(Clone, Copy, Debug)]
struct Operator {
    node: SyntaxKind,
    token: SyntaxKind,
    n_raw: u8,
    precedence: Precedence,
    right_assoc: bool,
}

impl Operator {
    const fn new(node: SyntaxKind, token: SyntaxKind, precedence: Precedence) -> Self {
        Self { node, token, n_raw: 1, precedence, right_assoc: false }
    }

    const fn right(mut self) -> Self {
        self.right_assoc = true;
        self
    }

    const fn joined(mut self, n_raw: u8) -> Self {
        self.n_raw = n_raw;
        self
    }

    /// Whether this operator continues the right operand of `bound`.
    fn binds(self, bound: Precedence) -> bool {
        self.precedence > bound || (self.precedence == bound && self.right_assoc)
    }
}

const RANGE: Operator = Operator::new(RANGE_EXPRESSION, DOT_DOT, Precedence::Range).right();

fn binary_operator(p: &mut Parser<'_>) -> Option<Operator> {
    use Precedence::*;

    let kind = p.current();
    let op = match kind {
        EQ => Operator::new(SIMPLE_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        PLUS_EQ => Operator::new(ADD_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        MINUS_EQ => Operator::new(SUBTRACT_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        STAR_EQ => Operator::new(MULTIPLY_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        SLASH_EQ => Operator::new(DIVIDE_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        PERCENT_EQ => Operator::new(MODULO_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        AMP_EQ => Operator::new(AND_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        CARET_EQ => Operator::new(EXCLUSIVE_OR_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        PIPE_EQ => Operator::new(OR_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        SHL_EQ => Operator::new(LEFT_SHIFT_ASSIGNMENT_EXPRESSION, kind, Assignment).right(),
        QUESTION_QUESTION_EQ => {
            Operator::new(COALESCE_ASSIGNMENT_EXPRESSION, kind, Assignment).right()
        }
        QUESTION => Operator::new(CONDITIONAL_EXPRESSION, kind, Conditional).right(),
        QUESTION_QUESTION => Operator::new(COALESCE_EXPRESSION, kind, Coalescing).right(),
        PIPE_PIPE => Operator::new(LOGICAL_OR_EXPRESSION, kind, ConditionalOr),
        AMP_AMP => Operator::new(LOGICAL_AND_EXPRESSION, kind, ConditionalAnd),
        PIPE => Operator::new(BITWISE_OR_EXPRESSION, kind, LogicalOr),
        CARET => Operator::new(EXCLUSIVE_OR_EXPRESSION, kind, LogicalXor),
        AMP => Operator::new(BITWISE_AND_EXPRESSION, kind, LogicalAnd),
        EQ_EQ => Operator::new(EQUALS_EXPRESSION, kind, Equality),
        BANG_EQ => Operator::new(NOT_EQUALS_EXPRESSION, kind, Equality),
        LT => Operator::new(LESS_THAN_EXPRESSION, kind, Relational),
        LT_EQ => Operator::new(LESS_THAN_OR_EQUAL_EXPRESSION, kind, Relational),
        GT_EQ => Operator::new(GREATER_THAN_OR_EQUAL_EXPRESSION, kind, Relational),
        GT => greater_than(p),
        IS_KW => Operator::new(IS_EXPRESSION, kind, Relational),
        AS_KW => Operator::new(AS_EXPRESSION, kind, Relational),
        SHL => Operator::new(LEFT_SHIFT_EXPRESSION, kind, Shift),
        DOT_DOT => RANGE,
        PLUS => Operator::new(ADD_EXPRESSION, kind, Additive),
        MINUS => Operator::new(SUBTRACT_EXPRESSION, kind, Additive),
        STAR => Operator::new(MULTIPLY_EXPRESSION, kind, Multiplicative),
        SLASH => Operator::new(DIVIDE_EXPRESSION, kind, Multiplicative),
        PERCENT => Operator::new(MODULO_EXPRESSION, kind, Multiplicative),
        SWITCH_KW => Operator::new(SWITCH_EXPRESSION, kind, Switch),
        _ => return None,
    };
    Some(op)
}

/// `>` starts a shift operator when the following `>`/`>=` tokens touch it.
fn greater_than(p: &mut Parser<'_>) -> Operator {
    use Precedence::*;

    if p.nth_joined(0) {
        let second = p.nth(1);
        if second == GT && p.nth_joined(1) {
            match p.nth(2) {
                GT => return Operator::new(UNSIGNED_RIGHT_SHIFT_EXPRESSION, USHR, Shift).joined(3),
                GT_EQ => {
                    return Operator::new(UNSIGNED_RIGHT_SHIFT_ASSIGNMENT_EXPRESSION, USHR_EQ, Assignment)
                        .right()
                        .joined(3);
                }
                _ => {}
            }
        }
        match second {
            GT => return Operator::new(RIGHT_SHIFT_EXPRESSION, SHR, Shift).joined(2),
            GT_EQ => {
                return Operator::new(RIGHT_SHIFT_ASSIGNMENT_EXPRESSION, SHR_EQ, Assignment)
                    .right()
                    .joined(2);
            }
            _ => {}
        }
    }
    Operator::new(GREATER_THAN_EXPRESSION, GT, Relational)
}

fn operator_feature(p: &mut Parser<'_>, op: Operator, range: TextRange) {
    let feature = match op.node {
        COALESCE_EXPRESSION => Feature::CoalesceOperator,
        COALESCE_ASSIGNMENT_EXPRESSION => Feature::CoalesceAssignment,
        RANGE_EXPRESSION => Feature::RangeOperator,
        _ => return,
    };
    p.feature(feature, range);
}

fn prefix_operator(kind: SyntaxKind) -> Option<SyntaxKind> {
    let node = match kind {
        PLUS => UNARY_PLUS_EXPRESSION,
        MINUS => UNARY_MINUS_EXPRESSION,
        TILDE => BITWISE_NOT_EXPRESSION,
        BANG => LOGICAL_NOT_EXPRESSION,
        PLUS_PLUS => PRE_INCREMENT_EXPRESSION,
        MINUS_MINUS => PRE_DECREMENT_EXPRESSION,
        AMP => ADDRESS_OF_EXPRESSION,
        STAR => POINTER_INDIRECTION_EXPRESSION,
        CARET => INDEX_EXPRESSION,
        _ => return None,
    };
    Some(node)
}

/// Partially parsed expression waiting for its next operand.
enum Frame {
    /// Prefix operator, cast or `await`; reduced as soon as its operand is.
    Prefix { m: Marker, node: SyntaxKind },
    /// Left operand and operator consumed.
    Binary { m: Marker, op: Operator },
    /// Condition and `?` consumed, then also the `:` once `when_false`.
    Conditional { m: Marker, when_false: bool },
    /// `(` consumed. `list` becomes the element list if a `,` turns the
    /// parentheses into a tuple.
    Paren { m: Marker, list: Marker },
}

fn bound(stack: &[Frame], min: Precedence) -> Precedence {
    match stack.last() {
        Some(Frame::Binary { op, .. }) => op.precedence,
        Some(Frame::Conditional { .. } | Frame::Paren { .. }) => Precedence::Expression,
        Some(Frame::Prefix { .. }) => unreachable!("prefix frames are reduced first"),
        None => min,
    }
}

pub(crate) fn expr(p: &mut Parser<'_>) -> CompletedMarker {
    expr_bp(p, Precedence::Expression)
}

fn expr_bp(p: &mut Parser<'_>, min: Precedence) -> CompletedMarker {
    p.nested(|p| expression_machine(p, min))
}

/// Operator-precedence parsing over an explicit frame stack, so operator
/// chains and parentheses do not grow the native stack.
fn expression_machine(p: &mut Parser<'_>, min: Precedence) -> CompletedMarker {
    let mut stack = Vec::new();
    loop {
        let Some(mut lhs) = operand(p, &mut stack) else {
            continue;
        };
        loop {
            while let Some(Frame::Prefix { .. }) = stack.last() {
                if let Some(Frame::Prefix { m, node }) = stack.pop() {
                    lhs = m.complete(p, node);
                }
            }

            if let Some(op) = binary_operator(p)
                && op.binds(bound(&stack, min))
            {
                match op.node {
                    CONDITIONAL_EXPRESSION => {
                        let m = lhs.precede(p);
                        p.bump();
                        stack.push(Frame::Conditional { m, when_false: false });
                        break;
                    }
                    IS_EXPRESSION => {
                        lhs = is_expression(p, lhs);
                        continue;
                    }
                    AS_EXPRESSION => {
                        let m = lhs.precede(p);
                        p.bump();
                        types::type_(p, TypeMode::Expression);
                        lhs = m.complete(p, AS_EXPRESSION);
                        continue;
                    }
                    SWITCH_EXPRESSION => {
                        lhs = switch_expression(p, lhs);
                        continue;
                    }
                    _ => {
                        let range = p.current_range();
                        let m = lhs.precede(p);
                        p.bump_joined(op.token, op.n_raw);
                        operator_feature(p, op, range);
                        stack.push(Frame::Binary { m, op });
                        break;
                    }
                }
            }

            match stack.pop() {
                None => return lhs,
                Some(Frame::Binary { m, op }) => lhs = m.complete(p, op.node),
                Some(Frame::Conditional { m, when_false: false }) => {
                    p.expect(COLON);
                    stack.push(Frame::Conditional { m, when_false: true });
                    break;
                }
                Some(Frame::Conditional { m, when_false: true }) => {
                    lhs = m.complete(p, CONDITIONAL_EXPRESSION);
                }
                Some(Frame::Paren { m, list }) => {
                    lhs = close_paren(p, m, list, lhs);
                    lhs = postfix(p, lhs);
                }
                Some(Frame::Prefix { .. }) => unreachable!(),
            }
        }
    }
}

/// Starts the next operand. Returns it when complete, or `None` after
/// pushing a frame that still needs an operand.
fn operand(p: &mut Parser<'_>, stack: &mut Vec<Frame>) -> Option<CompletedMarker> {
    if let Some(Frame::Binary { op, .. }) = stack.last()
        && op.node == RANGE_EXPRESSION
        && !at_expression_start(p)
    {
        let Some(Frame::Binary { m, .. }) = stack.pop() else { unreachable!() };
        p.empty();
        return Some(m.complete(p, RANGE_EXPRESSION));
    }

    let kind = p.current();
    if let Some(node) = prefix_operator(kind) {
        let range = p.current_range();
        let m = p.start();
        p.bump();
        if kind == CARET {
            p.feature(Feature::IndexOperator, range);
        }
        stack.push(Frame::Prefix { m, node });
        return None;
    }

    match kind {
        DOT_DOT => {
            let range = p.current_range();
            let m = p.start();
            p.empty();
            p.bump();
            p.feature(Feature::RangeOperator, range);
            stack.push(Frame::Binary { m, op: RANGE });
            None
        }
        IDENT if p.context().is_async && p.at(AWAIT_KW) => {
            let m = p.start();
            p.bump_as(AWAIT_KW);
            stack.push(Frame::Prefix { m, node: AWAIT_EXPRESSION });
            None
        }
        LEFT_PAREN => paren_operand(p, stack),
        _ => Some(term(p)),
    }
}

fn paren_operand(p: &mut Parser<'_>, stack: &mut Vec<Frame>) -> Option<CompletedMarker> {
    if scan_parenthesized_lambda(p, 0) {
        tracing::trace!("parenthesized lambda");
        return Some(lambda(p, false));
    }
    if is_cast(p) {
        tracing::trace!("cast");
        let m = p.start();
        p.bump();
        types::type_(p, TypeMode::Normal);
        p.expect(RIGHT_PAREN);
        stack.push(Frame::Prefix { m, node: CAST_EXPRESSION });
        return None;
    }
    if (p.nth(1) == IDENT && p.nth(2) == COLON) || is_declaration_expression(p, 1) {
        tracing::trace!("tuple with a named or declared first element");
        let tuple = tuple_expression(p);
        return Some(postfix(p, tuple));
    }
    let m = p.start();
    p.bump();
    let list = p.start();
    stack.push(Frame::Paren { m, list });
    None
}

fn close_paren(p: &mut Parser<'_>, m: Marker, list: Marker, lhs: CompletedMarker) -> CompletedMarker {
    if !p.at(COMMA) {
        list.abandon(p);
        p.expect(RIGHT_PAREN);
        return m.complete(p, PARENTHESIZED_EXPRESSION);
    }

    tracing::trace!("tuple");
    let range = p.current_range();
    lhs.precede_after_empty(p, 2).complete(p, ARGUMENT);
    while p.eat(COMMA) {
        tuple_element(p);
    }
    list.complete(p, LIST);
    p.expect(RIGHT_PAREN);
    p.feature(Feature::Tuples, range);
    m.complete(p, TUPLE_EXPRESSION)
}

fn is_cast(p: &mut Parser<'_>) -> bool {
    let Some((after, shape)) = types::scan_type(p, 1) else {
        return false;
    };
    if p.nth(after) != RIGHT_PAREN {
        return false;
    }
    let next = after + 1;
    match shape {
        ScannedType::Definite => nth_expression_start(p, next),
        ScannedType::Name => {
            let kind = p.nth(next);
            matches!(
                kind,
                TILDE
                    | BANG
                    | LEFT_PAREN
                    | NUMERIC_LITERAL
                    | CHARACTER_LITERAL
                    | STRING_LITERAL
                    | INTERPOLATED_STRING_START
                    | INTERPOLATED_VERBATIM_STRING_START
            ) || is_identifier(p, next)
                || CAST_FOLLOW_KEYWORDS.contains(kind)
        }
    }
}

/// `( params ) =>` starting at the `n`th token.
pub(crate) fn scan_parenthesized_lambda(p: &mut Parser<'_>, n: u32) -> bool {
    debug_assert_eq!(p.nth(n), LEFT_PAREN);

    let mut k = n + 1;
    if p.nth(k) == RIGHT_PAREN {
        return p.nth(k + 1) == FAT_ARROW;
    }
    loop {
        while matches!(p.nth(k), REF_KW | OUT_KW | IN_KW | PARAMS_KW) {
            k += 1;
        }
        if p.nth(k) == IDENT && matches!(p.nth(k + 1), COMMA | RIGHT_PAREN) {
            k += 1;
        } else {
            let Some((after, _)) = types::scan_type(p, k) else {
                return false;
            };
            if p.nth(after) != IDENT {
                return false;
            }
            k = after + 1;
        }
        match p.nth(k) {
            COMMA => k += 1,
            RIGHT_PAREN => return p.nth(k + 1) == FAT_ARROW,
            _ => return false,
        }
    }
}

/// `Type name` or `var (a, b)` at the `n`th token, in a position where a
/// declaration expression can appear.
fn is_declaration_expression(p: &mut Parser<'_>, n: u32) -> bool {
    if p.nth(n) == IDENT && p.nth_text(n) == "var" && p.nth(n + 1) == LEFT_PAREN {
        let budget = p.scan_budget();
        return match scan_designation(p, n + 1, budget) {
            Some(after) => matches!(p.nth(after), COMMA | RIGHT_PAREN | EQ | IN_KW),
            None => false,
        };
    }
    match types::scan_type(p, n) {
        Some((after, _)) => {
            is_identifier(p, after) && matches!(p.nth(after + 1), COMMA | RIGHT_PAREN | RIGHT_BRACKET)
        }
        None => false,
    }
}

fn scan_designation(p: &mut Parser<'_>, n: u32, budget: u32) -> Option<u32> {
    let Some(budget) = budget.checked_sub(1) else {
        p.scan_overflowed(n);
        return None;
    };
    let mut k = n + 1;
    loop {
        match p.nth(k) {
            IDENT => k += 1,
            LEFT_PAREN => k = scan_designation(p, k, budget)?,
            _ => return None,
        }
        match p.nth(k) {
            COMMA => k += 1,
            RIGHT_PAREN => return Some(k + 1),
            _ => return None,
        }
    }
}

fn term(p: &mut Parser<'_>) -> CompletedMarker {
    match p.current() {
        IDENT => {
            if let Some(is_async) = lambda_start(p) {
                return lambda(p, is_async);
            }
            if p.at(ASYNC_KW) && p.nth(1) == DELEGATE_KW {
                return anonymous_method(p);
            }
            if query::at_query_start(p) {
                return query::query_expression(p);
            }
        }
        DELEGATE_KW => return anonymous_method(p),
        THROW_KW => return throw_expression(p),
        REF_KW => return ref_expression(p),
        _ => {}
    }
    let lhs = primary(p);
    postfix(p, lhs)
}

fn primary(p: &mut Parser<'_>) -> CompletedMarker {
    match p.current() {
        IDENT if p.nth(1) == LEFT_PAREN && is_declaration_expression(p, 0) => {
            declaration_expression(p)
        }
        IDENT if p.nth(1) == COLON_COLON => types::alias_qualified_name(p, TypeMode::Expression),
        IDENT => simple_name(p),
        NUMERIC_LITERAL => numeric_literal(p),
        STRING_LITERAL => token_expression(p, STRING_LITERAL_EXPRESSION),
        CHARACTER_LITERAL => token_expression(p, CHARACTER_LITERAL_EXPRESSION),
        TRUE_KW => token_expression(p, TRUE_LITERAL_EXPRESSION),
        FALSE_KW => token_expression(p, FALSE_LITERAL_EXPRESSION),
        NULL_KW => token_expression(p, NULL_LITERAL_EXPRESSION),
        THIS_KW => token_expression(p, THIS_EXPRESSION),
        BASE_KW => token_expression(p, BASE_EXPRESSION),
        ARGLIST_KW => token_expression(p, ARGLIST_EXPRESSION),
        INTERPOLATED_STRING_START | INTERPOLATED_VERBATIM_STRING_START => interpolated_string(p),
        NEW_KW => new_expression(p),
        STACKALLOC_KW => stackalloc_expression(p),
        TYPEOF_KW => type_operator(p, TYPE_OF_EXPRESSION),
        SIZEOF_KW => type_operator(p, SIZE_OF_EXPRESSION),
        DEFAULT_KW if p.nth(1) == LEFT_PAREN => type_operator(p, DEFAULT_EXPRESSION),
        DEFAULT_KW => {
            let range = p.current_range();
            p.feature(Feature::DefaultLiteral, range);
            token_expression(p, DEFAULT_LITERAL_EXPRESSION)
        }
        CHECKED_KW => parenthesized_operator(p, CHECKED_EXPRESSION),
        UNCHECKED_KW => parenthesized_operator(p, UNCHECKED_EXPRESSION),
        MAKEREF_KW => parenthesized_operator(p, MAKE_REF_EXPRESSION),
        REFTYPE_KW => parenthesized_operator(p, REF_TYPE_EXPRESSION),
        REFVALUE_KW => refvalue_expression(p),
        kind if kind.is_predefined_type() && kind != VOID_KW => token_expression(p, PREDEFINED_TYPE),
        _ => missing_term(p),
    }
}

fn missing_term(p: &mut Parser<'_>) -> CompletedMarker {
    match p.current() {
        EOF | RIGHT_PAREN | RIGHT_BRACKET | RIGHT_BRACE => {
            p.error_missing(ErrorCode::ExpressionExpected);
        }
        _ => p.error_at_current(ErrorCode::InvalidExprTerm),
    }
    let m = p.start();
    p.missing_silent(IDENT);
    m.complete(p, IDENTIFIER_NAME)
}

fn token_expression(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    m.complete(p, kind)
}

fn numeric_literal(p: &mut Parser<'_>) -> CompletedMarker {
    let text = p.nth_text(0);
    let range = p.current_range();
    let bytes = text.as_bytes();
    let radix_prefix =
        bytes.len() > 1 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'b' | b'B');
    if radix_prefix && matches!(bytes[1], b'b' | b'B') {
        p.feature(Feature::BinaryLiterals, range);
    }
    if text.contains('_') {
        p.feature(Feature::DigitSeparators, range);
        if radix_prefix && bytes.get(2) == Some(&b'_') {
            p.feature(Feature::LeadingDigitSeparator, range);
        }
    }
    token_expression(p, NUMERIC_LITERAL_EXPRESSION)
}

/// Identifier or generic name in an expression. A `<...>` is taken as
/// type arguments when one of them can only be a type, or when the token
/// after it confirms the reading.
pub(crate) fn simple_name(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    identifier(p);
    if p.at(LT) && is_type_argument_list(p) {
        types::type_argument_list(p);
        m.complete(p, GENERIC_NAME)
    } else {
        m.complete(p, IDENTIFIER_NAME)
    }
}

fn is_type_argument_list(p: &mut Parser<'_>) -> bool {
    let Some((after, shape)) = types::scan_type_argument_list(p, 0) else {
        return false;
    };
    let follow = p.nth(after);
    let generic = shape == ScannedType::Definite || TYPE_ARGUMENT_FOLLOW.contains(follow);
    tracing::trace!(?follow, ?shape, generic, "type argument list in expression");
    generic
}

fn postfix(p: &mut Parser<'_>, mut lhs: CompletedMarker) -> CompletedMarker {
    loop {
        lhs = match p.current() {
            DOT | ARROW => {
                let kind = match p.current() {
                    DOT => SIMPLE_MEMBER_ACCESS_EXPRESSION,
                    _ => POINTER_MEMBER_ACCESS_EXPRESSION,
                };
                let m = lhs.precede(p);
                p.bump();
                simple_name(p);
                m.complete(p, kind)
            }
            LEFT_PAREN => {
                let m = lhs.precede(p);
                argument_list(p);
                m.complete(p, INVOCATION_EXPRESSION)
            }
            LEFT_BRACKET => {
                let m = lhs.precede(p);
                bracketed_argument_list(p);
                m.complete(p, ELEMENT_ACCESS_EXPRESSION)
            }
            PLUS_PLUS | MINUS_MINUS => {
                let kind = match p.current() {
                    PLUS_PLUS => POST_INCREMENT_EXPRESSION,
                    _ => POST_DECREMENT_EXPRESSION,
                };
                let m = lhs.precede(p);
                p.bump();
                m.complete(p, kind)
            }
            BANG => {
                let m = lhs.precede(p);
                p.bump();
                m.complete(p, SUPPRESS_NULLABLE_WARNING_EXPRESSION)
            }
            QUESTION if matches!(p.nth(1), DOT | LEFT_BRACKET) => conditional_access(p, lhs),
            _ => return lhs,
        };
    }
}

fn conditional_access(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    let range = p.current_range();
    p.bump();
    p.feature(Feature::NullPropagation, range);
    p.nested(|p| {
        let binding = p.start();
        let binding = if p.at(DOT) {
            p.bump();
            simple_name(p);
            binding.complete(p, MEMBER_BINDING_EXPRESSION)
        } else {
            bracketed_argument_list(p);
            binding.complete(p, ELEMENT_BINDING_EXPRESSION)
        };
        postfix(p, binding)
    });
    m.complete(p, CONDITIONAL_ACCESS_EXPRESSION)
}

pub(crate) fn argument_list(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LEFT_PAREN));

    let m = p.start();
    p.bump();
    separated(p, RIGHT_PAREN, false, at_argument_start, argument);
    p.expect(RIGHT_PAREN);
    m.complete(p, ARGUMENT_LIST)
}

pub(crate) fn bracketed_argument_list(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LEFT_BRACKET));

    let m = p.start();
    p.bump();
    separated(p, RIGHT_BRACKET, false, at_argument_start, argument);
    p.expect(RIGHT_BRACKET);
    m.complete(p, BRACKETED_ARGUMENT_LIST)
}

fn at_argument_start(p: &mut Parser<'_>) -> bool {
    at_expression_start(p) || matches!(p.current(), OUT_KW | IN_KW)
}

fn argument(p: &mut Parser<'_>) {
    argument_or_declaration(p, false);
}

/// Tuple elements may declare: `(int x, var y) = t`.
fn tuple_element(p: &mut Parser<'_>) {
    argument_or_declaration(p, true);
}

/// Outside tuples only `out` arguments declare, so `f(a < b, c > d)` keeps
/// its two relational arguments.
fn argument_or_declaration(p: &mut Parser<'_>, allow_declaration: bool) {
    let m = p.start();
    let mut is_out = false;
    if p.at(IDENT) && p.nth(1) == COLON {
        let range = p.current_range();
        name_colon(p);
        p.feature(Feature::NamedArguments, range);
    } else {
        p.empty();
    }
    match p.current() {
        kind @ (REF_KW | OUT_KW | IN_KW) => {
            let range = p.current_range();
            p.bump();
            if kind == IN_KW {
                p.feature(Feature::InParameters, range);
            }
            is_out = kind == OUT_KW;
        }
        _ => p.empty(),
    }
    if (allow_declaration || is_out) && is_declaration_expression(p, 0) {
        let range = p.current_range();
        declaration_expression(p);
        if is_out {
            p.feature(Feature::OutVar, range);
        }
    } else {
        expr(p);
    }
    m.complete(p, ARGUMENT);
}

fn tuple_expression(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LEFT_PAREN));

    let m = p.start();
    let open = p.current_range();
    p.bump();
    p.feature(Feature::Tuples, open);
    let count = separated(p, RIGHT_PAREN, false, at_argument_start, tuple_element);
    p.expect(RIGHT_PAREN);
    if count < 2 {
        let range = TextRange::new(open.start(), p.prev_end());
        p.error(ErrorCode::TupleTooFewElements, range);
    }
    m.complete(p, TUPLE_EXPRESSION)
}

fn declaration_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    types::type_(p, TypeMode::Normal);
    designation(p);
    m.complete(p, DECLARATION_EXPRESSION)
}

pub(crate) fn designation(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.at(LEFT_PAREN) {
        p.bump();
        p.nested(|p| {
            separated(
                p,
                RIGHT_PAREN,
                false,
                |p| p.at(IDENT) || p.at(LEFT_PAREN),
                |p| {
                    designation(p);
                },
            )
        });
        p.expect(RIGHT_PAREN);
        m.complete(p, PARENTHESIZED_VARIABLE_DESIGNATION)
    } else if p.at(IDENT) && p.nth_text(0) == "_" {
        p.bump();
        m.complete(p, DISCARD_DESIGNATION)
    } else {
        identifier(p);
        m.complete(p, SINGLE_VARIABLE_DESIGNATION)
    }
}

fn lambda_start(p: &mut Parser<'_>) -> Option<bool> {
    if p.nth(1) == FAT_ARROW {
        return Some(false);
    }
    if p.at(ASYNC_KW) {
        if p.nth(1) == IDENT && p.nth(2) == FAT_ARROW {
            return Some(true);
        }
        if p.nth(1) == LEFT_PAREN && scan_parenthesized_lambda(p, 1) {
            return Some(true);
        }
    }
    None
}

fn lambda(p: &mut Parser<'_>, is_async: bool) -> CompletedMarker {
    let m = p.start();
    let range = p.current_range();
    if is_async {
        p.bump_as(ASYNC_KW);
        p.feature(Feature::Async, range);
    } else {
        p.empty();
    }
    p.feature(Feature::Lambdas, range);

    let kind = if p.at(LEFT_PAREN) {
        members::parameter_list(p, ParameterContext::Lambda);
        PARENTHESIZED_LAMBDA_EXPRESSION
    } else {
        let parameter = p.start();
        empty_list(p);
        empty_list(p);
        p.empty();
        identifier(p);
        p.empty();
        parameter.complete(p, PARAMETER);
        SIMPLE_LAMBDA_EXPRESSION
    };
    p.expect(FAT_ARROW);
    p.with_context(Context { is_async, in_query: false }, |p| {
        if p.at(LEFT_BRACE) {
            stmts::block(p);
        } else {
            expr(p);
        }
    });
    m.complete(p, kind)
}

fn anonymous_method(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let is_async = p.at(ASYNC_KW);
    if is_async {
        let range = p.current_range();
        p.bump_as(ASYNC_KW);
        p.feature(Feature::Async, range);
    } else {
        p.empty();
    }
    let range = p.current_range();
    p.bump();
    p.feature(Feature::AnonymousMethods, range);
    if p.at(LEFT_PAREN) {
        members::parameter_list(p, ParameterContext::AnonymousMethod);
    } else {
        p.empty();
    }
    p.with_context(Context { is_async, in_query: false }, |p| {
        stmts::block(p);
    });
    m.complete(p, ANONYMOUS_METHOD_EXPRESSION)
}

fn throw_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let range = p.current_range();
    p.bump();
    p.feature(Feature::ThrowExpressions, range);
    expr_bp(p, Precedence::Coalescing);
    m.complete(p, THROW_EXPRESSION)
}

fn ref_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let range = p.current_range();
    p.bump();
    p.feature(Feature::RefLocalsAndReturns, range);
    expr(p);
    m.complete(p, REF_EXPRESSION)
}

fn is_expression(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    p.bump();
    let is_type = types::at_type_start(p)
        && !at_pattern(p)
        && (!p.at(LEFT_PAREN) || types::scan_type(p, 0).is_some());
    if is_type {
        types::type_(p, TypeMode::Expression);
        m.complete(p, IS_EXPRESSION)
    } else {
        let range = p.current_range();
        pattern(p, PatternContext::Is);
        p.feature(Feature::PatternMatching, range);
        m.complete(p, IS_PATTERN_EXPRESSION)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PatternContext {
    Is,
    Case,
    SwitchArm,
}

fn is_var_pattern(p: &mut Parser<'_>) -> bool {
    if !(p.at(IDENT) && p.nth_text(0) == "var") {
        return false;
    }
    if is_identifier(p, 1) && !p.nth_at(1, WHEN_KW) {
        return true;
    }
    let budget = p.scan_budget();
    p.nth(1) == LEFT_PAREN && scan_designation(p, 1, budget).is_some()
}

/// Whether a declaration or `var` pattern starts here.
pub(crate) fn at_pattern(p: &mut Parser<'_>) -> bool {
    if is_var_pattern(p) {
        return true;
    }
    match types::scan_pattern_type(p, 0) {
        Some((after, _)) => is_identifier(p, after) && !p.nth_at(after, WHEN_KW),
        None => false,
    }
}

pub(crate) fn pattern(p: &mut Parser<'_>, context: PatternContext) -> CompletedMarker {
    let m = p.start();
    if context == PatternContext::SwitchArm && p.at(IDENT) {
        if p.nth_text(0) == "_"
            && (matches!(p.nth(1), FAT_ARROW | COMMA | RIGHT_BRACE) || p.nth_at(1, WHEN_KW))
        {
            p.bump();
            return m.complete(p, DISCARD_PATTERN);
        }
        if p.nth(1) == FAT_ARROW {
            simple_name(p);
            return m.complete(p, CONSTANT_PATTERN);
        }
    }
    if is_var_pattern(p) {
        p.bump();
        designation(p);
        return m.complete(p, VAR_PATTERN);
    }
    if at_pattern(p) {
        types::type_(p, TypeMode::Normal);
        designation(p);
        return m.complete(p, DECLARATION_PATTERN);
    }
    match context {
        PatternContext::Is => expr_bp(p, Precedence::Relational),
        PatternContext::Case | PatternContext::SwitchArm => expr(p),
    };
    m.complete(p, CONSTANT_PATTERN)
}

pub(crate) fn when_clause(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump_as(WHEN_KW);
    expr(p);
    m.complete(p, WHEN_CLAUSE)
}

fn switch_expression(p: &mut Parser<'_>, lhs: CompletedMarker) -> CompletedMarker {
    let m = lhs.precede(p);
    let range = p.current_range();
    p.bump();
    p.feature(Feature::SwitchExpressions, range);
    if p.expect(LEFT_BRACE) {
        p.nested(|p| separated(p, RIGHT_BRACE, true, at_expression_start, switch_arm));
    } else {
        empty_list(p);
    }
    p.expect(RIGHT_BRACE);
    m.complete(p, SWITCH_EXPRESSION)
}

fn switch_arm(p: &mut Parser<'_>) {
    let m = p.start();
    pattern(p, PatternContext::SwitchArm);
    if p.at(WHEN_KW) {
        when_clause(p);
    } else {
        p.empty();
    }
    p.expect(FAT_ARROW);
    expr(p);
    m.complete(p, SWITCH_EXPRESSION_ARM);
}

fn interpolated_string(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let range = p.current_range();
    p.feature(Feature::InterpolatedStrings, range);
    if p.at(INTERPOLATED_VERBATIM_STRING_START) && p.nth_text(0).starts_with('@') {
        p.feature(Feature::AltInterpolatedVerbatimStrings, range);
    }
    p.bump();
    let contents = p.start();
    loop {
        match p.current() {
            INTERPOLATED_STRING_TEXT => {
                let text = p.start();
                p.bump();
                text.complete(p, INTERPOLATED_STRING_TEXT_PART);
            }
            LEFT_BRACE => interpolation(p),
            _ => break,
        }
    }
    contents.complete(p, LIST);
    p.expect(INTERPOLATED_STRING_END);
    m.complete(p, INTERPOLATED_STRING_EXPRESSION)
}

fn interpolation(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    expr(p);
    if p.at(COMMA) {
        let alignment = p.start();
        p.bump();
        expr(p);
        alignment.complete(p, INTERPOLATION_ALIGNMENT_CLAUSE);
    } else {
        p.empty();
    }
    if p.at(COLON) {
        let format = p.start();
        p.bump();
        if !p.eat(INTERPOLATED_STRING_TEXT) {
            p.empty();
        }
        format.complete(p, INTERPOLATION_FORMAT_CLAUSE);
    } else {
        p.empty();
    }
    p.expect(RIGHT_BRACE);
    m.complete(p, INTERPOLATION);
}

fn new_expression(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(NEW_KW));

    let m = p.start();
    p.bump();
    match p.current() {
        LEFT_BRACKET => {
            let range = p.current_range();
            p.bump();
            p.feature(Feature::ImplicitArrays, range);
            let commas = p.start();
            while p.at(COMMA) {
                p.bump();
            }
            commas.complete(p, LIST);
            p.expect(RIGHT_BRACKET);
            array_initializer(p);
            m.complete(p, IMPLICIT_ARRAY_CREATION_EXPRESSION)
        }
        LEFT_BRACE => {
            let range = p.current_range();
            p.bump();
            p.feature(Feature::AnonymousTypes, range);
            p.nested(|p| separated(p, RIGHT_BRACE, true, at_expression_start, anonymous_member));
            p.expect(RIGHT_BRACE);
            m.complete(p, ANONYMOUS_OBJECT_CREATION_EXPRESSION)
        }
        _ => {
            let ty = types::type_(p, TypeMode::Creation);
            if p.at(LEFT_BRACKET) {
                let sized = array_type_with_sizes(p, ty);
                if p.at(LEFT_BRACE) {
                    array_initializer(p);
                } else {
                    p.empty();
                    if !sized {
                        p.error_missing(ErrorCode::MissingArraySize);
                    }
                }
                return m.complete(p, ARRAY_CREATION_EXPRESSION);
            }

            let arguments = p.at(LEFT_PAREN);
            if arguments {
                argument_list(p);
            } else {
                p.empty();
            }
            let initializer = p.at(LEFT_BRACE);
            if initializer {
                object_or_collection_initializer(p);
            } else {
                p.empty();
            }
            if !arguments && !initializer {
                p.error_missing(ErrorCode::BadNewExpr);
            }
            m.complete(p, OBJECT_CREATION_EXPRESSION)
        }
    }
}

/// Wraps `element` and the rank specifiers that follow into an array type.
/// Only the first rank may carry sizes.
fn array_type_with_sizes(p: &mut Parser<'_>, element: CompletedMarker) -> bool {
    let array = element.precede(p);
    let ranks = p.start();
    let sized = types::rank_specifier(p, true);
    while p.at(LEFT_BRACKET) {
        types::rank_specifier(p, false);
    }
    ranks.complete(p, LIST);
    array.complete(p, ARRAY_TYPE);
    sized
}

fn anonymous_member(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(IDENT) && p.nth(1) == EQ {
        name_equals(p);
    } else {
        p.empty();
    }
    expr(p);
    m.complete(p, ANONYMOUS_OBJECT_MEMBER_DECLARATOR);
}

fn stackalloc_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    let ty = types::type_(p, TypeMode::Creation);
    if p.at(LEFT_BRACKET) {
        array_type_with_sizes(p, ty);
    }
    if p.at(LEFT_BRACE) {
        array_initializer(p);
    } else {
        p.empty();
    }
    m.complete(p, STACK_ALLOC_ARRAY_CREATION_EXPRESSION)
}

fn at_initializer_start(p: &mut Parser<'_>) -> bool {
    p.at(LEFT_BRACE) || at_expression_start(p)
}

/// Expression or `{ ... }` array initializer, as found after `=` in a
/// declarator.
pub(crate) fn variable_initializer(p: &mut Parser<'_>) -> CompletedMarker {
    if p.at(LEFT_BRACE) { array_initializer(p) } else { expr(p) }
}

pub(crate) fn array_initializer(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if !p.expect(LEFT_BRACE) {
        empty_list(p);
        p.missing_silent(RIGHT_BRACE);
        return m.complete(p, ARRAY_INITIALIZER_EXPRESSION);
    }
    p.nested(|p| {
        separated(p, RIGHT_BRACE, true, at_initializer_start, |p| {
            variable_initializer(p);
        })
    });
    p.expect(RIGHT_BRACE);
    m.complete(p, ARRAY_INITIALIZER_EXPRESSION)
}

fn object_or_collection_initializer(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(p.at(LEFT_BRACE));

    let object = p.nth(1) == RIGHT_BRACE || (p.nth(1) == IDENT && p.nth(2) == EQ);
    let m = p.start();
    let range = p.current_range();
    p.bump();
    if object {
        p.feature(Feature::ObjectInitializers, range);
        p.nested(|p| separated(p, RIGHT_BRACE, true, at_expression_start, member_initializer));
    } else {
        p.feature(Feature::CollectionInitializers, range);
        p.nested(|p| separated(p, RIGHT_BRACE, true, at_initializer_start, element_initializer));
    }
    p.expect(RIGHT_BRACE);
    let kind = if object { OBJECT_INITIALIZER_EXPRESSION } else { COLLECTION_INITIALIZER_EXPRESSION };
    m.complete(p, kind)
}

fn member_initializer(p: &mut Parser<'_>) {
    if p.at(IDENT) && p.nth(1) == EQ && p.nth(2) == LEFT_BRACE {
        let m = p.start();
        identifier_name(p);
        p.bump();
        object_or_collection_initializer(p);
        m.complete(p, SIMPLE_ASSIGNMENT_EXPRESSION);
    } else {
        expr(p);
    }
}

fn element_initializer(p: &mut Parser<'_>) {
    if !p.at(LEFT_BRACE) {
        expr(p);
        return;
    }
    let m = p.start();
    p.bump();
    p.nested(|p| {
        separated(p, RIGHT_BRACE, false, at_expression_start, |p| {
            expr(p);
        })
    });
    p.expect(RIGHT_BRACE);
    m.complete(p, COMPLEX_ELEMENT_INITIALIZER_EXPRESSION);
}

/// `typeof(T)`, `sizeof(T)` and `default(T)`.
fn type_operator(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(LEFT_PAREN);
    types::type_(p, TypeMode::Normal);
    p.expect(RIGHT_PAREN);
    m.complete(p, kind)
}

fn parenthesized_operator(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(LEFT_PAREN);
    expr(p);
    p.expect(RIGHT_PAREN);
    m.complete(p, kind)
}

fn refvalue_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.expect(LEFT_PAREN);
    expr(p);
    p.expect(COMMA);
    types::type_(p, TypeMode::Normal);
    p.expect(RIGHT_PAREN);
    m.complete(p, REF_VALUE_EXPRESSION)
}
