//! Token, trivia and node kinds of the C# grammar.

use self::SyntaxKind::*;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // Trivia.
    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DOC_COMMENT,
    BLOCK_DOC_COMMENT,
    PREPROCESSOR_DIRECTIVE,
    DISABLED_TEXT,
    SKIPPED_TOKENS,

    // Punctuation.
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    SEMICOLON,
    COMMA,
    DOT,
    DOT_DOT,
    COLON,
    COLON_COLON,
    QUESTION,
    QUESTION_QUESTION,
    QUESTION_QUESTION_EQ,
    TILDE,
    BANG,
    BANG_EQ,
    EQ,
    EQ_EQ,
    FAT_ARROW,
    ARROW,
    LT,
    LT_EQ,
    SHL,
    SHL_EQ,
    GT,
    GT_EQ,
    SHR,
    SHR_EQ,
    USHR,
    USHR_EQ,
    PLUS,
    PLUS_PLUS,
    PLUS_EQ,
    MINUS,
    MINUS_MINUS,
    MINUS_EQ,
    STAR,
    STAR_EQ,
    SLASH,
    SLASH_EQ,
    PERCENT,
    PERCENT_EQ,
    AMP,
    AMP_AMP,
    AMP_EQ,
    PIPE,
    PIPE_PIPE,
    PIPE_EQ,
    CARET,
    CARET_EQ,

    // Reserved keywords.
    ABSTRACT_KW,
    AS_KW,
    BASE_KW,
    BOOL_KW,
    BREAK_KW,
    BYTE_KW,
    CASE_KW,
    CATCH_KW,
    CHAR_KW,
    CHECKED_KW,
    CLASS_KW,
    CONST_KW,
    CONTINUE_KW,
    DECIMAL_KW,
    DEFAULT_KW,
    DELEGATE_KW,
    DO_KW,
    DOUBLE_KW,
    ELSE_KW,
    ENUM_KW,
    EVENT_KW,
    EXPLICIT_KW,
    EXTERN_KW,
    FALSE_KW,
    FINALLY_KW,
    FIXED_KW,
    FLOAT_KW,
    FOR_KW,
    FOREACH_KW,
    GOTO_KW,
    IF_KW,
    IMPLICIT_KW,
    IN_KW,
    INT_KW,
    INTERFACE_KW,
    INTERNAL_KW,
    IS_KW,
    LOCK_KW,
    LONG_KW,
    NAMESPACE_KW,
    NEW_KW,
    NULL_KW,
    OBJECT_KW,
    OPERATOR_KW,
    OUT_KW,
    OVERRIDE_KW,
    PARAMS_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    READONLY_KW,
    REF_KW,
    RETURN_KW,
    SBYTE_KW,
    SEALED_KW,
    SHORT_KW,
    SIZEOF_KW,
    STACKALLOC_KW,
    STATIC_KW,
    STRING_KW,
    STRUCT_KW,
    SWITCH_KW,
    THIS_KW,
    THROW_KW,
    TRUE_KW,
    TRY_KW,
    TYPEOF_KW,
    UINT_KW,
    ULONG_KW,
    UNCHECKED_KW,
    UNSAFE_KW,
    USHORT_KW,
    USING_KW,
    VIRTUAL_KW,
    VOID_KW,
    VOLATILE_KW,
    WHILE_KW,
    ARGLIST_KW,
    MAKEREF_KW,
    REFTYPE_KW,
    REFVALUE_KW,

    // Contextual keywords; the scanner always produces `IDENT` for these.
    ADD_KW,
    ALIAS_KW,
    ASCENDING_KW,
    ASYNC_KW,
    AWAIT_KW,
    BY_KW,
    DESCENDING_KW,
    EQUALS_KW,
    FROM_KW,
    GET_KW,
    GLOBAL_KW,
    GROUP_KW,
    INTO_KW,
    JOIN_KW,
    LET_KW,
    ON_KW,
    ORDERBY_KW,
    PARTIAL_KW,
    REMOVE_KW,
    SELECT_KW,
    SET_KW,
    UNMANAGED_KW,
    WHEN_KW,
    WHERE_KW,
    YIELD_KW,

    // Literals and names.
    IDENT,
    NUMERIC_LITERAL,
    CHARACTER_LITERAL,
    STRING_LITERAL,
    INTERPOLATED_STRING_START,
    INTERPOLATED_VERBATIM_STRING_START,
    INTERPOLATED_STRING_TEXT,
    INTERPOLATED_STRING_END,
    EOF,

    LIST,
    TOMBSTONE,

    // Roots and directives.
    COMPILATION_UNIT,
    EXPRESSION_ROOT,
    STATEMENT_ROOT,
    EXTERN_ALIAS_DIRECTIVE,
    USING_DIRECTIVE,
    NAME_EQUALS,
    NAMESPACE_DECLARATION,

    // Attributes.
    ATTRIBUTE_LIST,
    ATTRIBUTE_TARGET_SPECIFIER,
    ATTRIBUTE,
    ATTRIBUTE_ARGUMENT_LIST,
    ATTRIBUTE_ARGUMENT,
    NAME_COLON,

    // Type declarations.
    CLASS_DECLARATION,
    STRUCT_DECLARATION,
    INTERFACE_DECLARATION,
    ENUM_DECLARATION,
    DELEGATE_DECLARATION,
    ENUM_MEMBER_DECLARATION,
    BASE_LIST,
    SIMPLE_BASE_TYPE,
    TYPE_PARAMETER_LIST,
    TYPE_PARAMETER,
    TYPE_PARAMETER_CONSTRAINT_CLAUSE,
    TYPE_CONSTRAINT,
    CLASS_CONSTRAINT,
    STRUCT_CONSTRAINT,
    CONSTRUCTOR_CONSTRAINT,

    // Members.
    FIELD_DECLARATION,
    EVENT_FIELD_DECLARATION,
    VARIABLE_DECLARATION,
    VARIABLE_DECLARATOR,
    EQUALS_VALUE_CLAUSE,
    METHOD_DECLARATION,
    OPERATOR_DECLARATION,
    CONVERSION_OPERATOR_DECLARATION,
    CONSTRUCTOR_DECLARATION,
    BASE_CONSTRUCTOR_INITIALIZER,
    THIS_CONSTRUCTOR_INITIALIZER,
    DESTRUCTOR_DECLARATION,
    PROPERTY_DECLARATION,
    INDEXER_DECLARATION,
    EVENT_DECLARATION,
    ACCESSOR_LIST,
    GET_ACCESSOR_DECLARATION,
    SET_ACCESSOR_DECLARATION,
    ADD_ACCESSOR_DECLARATION,
    REMOVE_ACCESSOR_DECLARATION,
    UNKNOWN_ACCESSOR_DECLARATION,
    EXPLICIT_INTERFACE_SPECIFIER,
    ARROW_EXPRESSION_CLAUSE,
    PARAMETER_LIST,
    BRACKETED_PARAMETER_LIST,
    PARAMETER,
    INCOMPLETE_MEMBER,

    // Types and names.
    PREDEFINED_TYPE,
    IDENTIFIER_NAME,
    GENERIC_NAME,
    TYPE_ARGUMENT_LIST,
    QUALIFIED_NAME,
    ALIAS_QUALIFIED_NAME,
    ARRAY_TYPE,
    ARRAY_RANK_SPECIFIER,
    POINTER_TYPE,
    NULLABLE_TYPE,
    TUPLE_TYPE,
    TUPLE_ELEMENT,
    REF_TYPE,

    // Statements.
    BLOCK,
    LOCAL_DECLARATION_STATEMENT,
    LOCAL_FUNCTION_STATEMENT,
    EXPRESSION_STATEMENT,
    EMPTY_STATEMENT,
    LABELED_STATEMENT,
    GOTO_STATEMENT,
    GOTO_CASE_STATEMENT,
    GOTO_DEFAULT_STATEMENT,
    BREAK_STATEMENT,
    CONTINUE_STATEMENT,
    RETURN_STATEMENT,
    THROW_STATEMENT,
    YIELD_RETURN_STATEMENT,
    YIELD_BREAK_STATEMENT,
    WHILE_STATEMENT,
    DO_STATEMENT,
    FOR_STATEMENT,
    FOREACH_STATEMENT,
    FOREACH_VARIABLE_STATEMENT,
    USING_STATEMENT,
    FIXED_STATEMENT,
    CHECKED_STATEMENT,
    UNCHECKED_STATEMENT,
    UNSAFE_STATEMENT,
    LOCK_STATEMENT,
    IF_STATEMENT,
    ELSE_CLAUSE,
    SWITCH_STATEMENT,
    SWITCH_SECTION,
    CASE_SWITCH_LABEL,
    CASE_PATTERN_SWITCH_LABEL,
    DEFAULT_SWITCH_LABEL,
    WHEN_CLAUSE,
    TRY_STATEMENT,
    CATCH_CLAUSE,
    CATCH_DECLARATION,
    CATCH_FILTER_CLAUSE,
    FINALLY_CLAUSE,

    // Primary expressions.
    PARENTHESIZED_EXPRESSION,
    TUPLE_EXPRESSION,
    ARGUMENT,
    ARGUMENT_LIST,
    BRACKETED_ARGUMENT_LIST,
    NUMERIC_LITERAL_EXPRESSION,
    STRING_LITERAL_EXPRESSION,
    CHARACTER_LITERAL_EXPRESSION,
    TRUE_LITERAL_EXPRESSION,
    FALSE_LITERAL_EXPRESSION,
    NULL_LITERAL_EXPRESSION,
    DEFAULT_LITERAL_EXPRESSION,
    ARGLIST_EXPRESSION,
    THIS_EXPRESSION,
    BASE_EXPRESSION,
    INTERPOLATED_STRING_EXPRESSION,
    INTERPOLATED_STRING_TEXT_PART,
    INTERPOLATION,
    INTERPOLATION_ALIGNMENT_CLAUSE,
    INTERPOLATION_FORMAT_CLAUSE,
    SIMPLE_MEMBER_ACCESS_EXPRESSION,
    POINTER_MEMBER_ACCESS_EXPRESSION,
    INVOCATION_EXPRESSION,
    ELEMENT_ACCESS_EXPRESSION,
    CONDITIONAL_ACCESS_EXPRESSION,
    MEMBER_BINDING_EXPRESSION,
    ELEMENT_BINDING_EXPRESSION,
    POST_INCREMENT_EXPRESSION,
    POST_DECREMENT_EXPRESSION,
    SUPPRESS_NULLABLE_WARNING_EXPRESSION,
    OBJECT_CREATION_EXPRESSION,
    ANONYMOUS_OBJECT_CREATION_EXPRESSION,
    ANONYMOUS_OBJECT_MEMBER_DECLARATOR,
    ARRAY_CREATION_EXPRESSION,
    IMPLICIT_ARRAY_CREATION_EXPRESSION,
    STACK_ALLOC_ARRAY_CREATION_EXPRESSION,
    OBJECT_INITIALIZER_EXPRESSION,
    COLLECTION_INITIALIZER_EXPRESSION,
    ARRAY_INITIALIZER_EXPRESSION,
    COMPLEX_ELEMENT_INITIALIZER_EXPRESSION,
    TYPE_OF_EXPRESSION,
    SIZE_OF_EXPRESSION,
    DEFAULT_EXPRESSION,
    CHECKED_EXPRESSION,
    UNCHECKED_EXPRESSION,
    MAKE_REF_EXPRESSION,
    REF_TYPE_EXPRESSION,
    REF_VALUE_EXPRESSION,
    REF_EXPRESSION,
    THROW_EXPRESSION,
    ANONYMOUS_METHOD_EXPRESSION,
    SIMPLE_LAMBDA_EXPRESSION,
    PARENTHESIZED_LAMBDA_EXPRESSION,
    DECLARATION_EXPRESSION,
    SINGLE_VARIABLE_DESIGNATION,
    PARENTHESIZED_VARIABLE_DESIGNATION,
    DISCARD_DESIGNATION,
    SWITCH_EXPRESSION,
    SWITCH_EXPRESSION_ARM,

    // Patterns.
    DECLARATION_PATTERN,
    CONSTANT_PATTERN,
    VAR_PATTERN,
    DISCARD_PATTERN,

    // Unary operators.
    UNARY_PLUS_EXPRESSION,
    UNARY_MINUS_EXPRESSION,
    BITWISE_NOT_EXPRESSION,
    LOGICAL_NOT_EXPRESSION,
    PRE_INCREMENT_EXPRESSION,
    PRE_DECREMENT_EXPRESSION,
    ADDRESS_OF_EXPRESSION,
    POINTER_INDIRECTION_EXPRESSION,
    INDEX_EXPRESSION,
    AWAIT_EXPRESSION,
    CAST_EXPRESSION,

    // Binary operators.
    ADD_EXPRESSION,
    SUBTRACT_EXPRESSION,
    MULTIPLY_EXPRESSION,
    DIVIDE_EXPRESSION,
    MODULO_EXPRESSION,
    LEFT_SHIFT_EXPRESSION,
    RIGHT_SHIFT_EXPRESSION,
    UNSIGNED_RIGHT_SHIFT_EXPRESSION,
    LOGICAL_OR_EXPRESSION,
    LOGICAL_AND_EXPRESSION,
    BITWISE_OR_EXPRESSION,
    BITWISE_AND_EXPRESSION,
    EXCLUSIVE_OR_EXPRESSION,
    EQUALS_EXPRESSION,
    NOT_EQUALS_EXPRESSION,
    LESS_THAN_EXPRESSION,
    LESS_THAN_OR_EQUAL_EXPRESSION,
    GREATER_THAN_EXPRESSION,
    GREATER_THAN_OR_EQUAL_EXPRESSION,
    IS_EXPRESSION,
    AS_EXPRESSION,
    IS_PATTERN_EXPRESSION,
    COALESCE_EXPRESSION,
    RANGE_EXPRESSION,
    CONDITIONAL_EXPRESSION,

    // Assignments.
    SIMPLE_ASSIGNMENT_EXPRESSION,
    ADD_ASSIGNMENT_EXPRESSION,
    SUBTRACT_ASSIGNMENT_EXPRESSION,
    MULTIPLY_ASSIGNMENT_EXPRESSION,
    DIVIDE_ASSIGNMENT_EXPRESSION,
    MODULO_ASSIGNMENT_EXPRESSION,
    AND_ASSIGNMENT_EXPRESSION,
    EXCLUSIVE_OR_ASSIGNMENT_EXPRESSION,
    OR_ASSIGNMENT_EXPRESSION,
    LEFT_SHIFT_ASSIGNMENT_EXPRESSION,
    RIGHT_SHIFT_ASSIGNMENT_EXPRESSION,
    UNSIGNED_RIGHT_SHIFT_ASSIGNMENT_EXPRESSION,
    COALESCE_ASSIGNMENT_EXPRESSION,

    // Queries.
    QUERY_EXPRESSION,
    FROM_CLAUSE,
    QUERY_BODY,
    LET_CLAUSE,
    JOIN_CLAUSE,
    JOIN_INTO_CLAUSE,
    WHERE_CLAUSE,
    ORDER_BY_CLAUSE,
    ASCENDING_ORDERING,
    DESCENDING_ORDERING,
    SELECT_CLAUSE,
    GROUP_CLAUSE,
    QUERY_CONTINUATION,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        self <= SKIPPED_TOKENS
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, LINE_COMMENT | BLOCK_COMMENT | DOC_COMMENT | BLOCK_DOC_COMMENT)
    }

    #[inline]
    pub fn is_punct(self) -> bool {
        (LEFT_PAREN..=CARET_EQ).contains(&self)
    }

    /// Reserved keywords; these can never be identifiers without `@`.
    #[inline]
    pub fn is_keyword(self) -> bool {
        (ABSTRACT_KW..=REFVALUE_KW).contains(&self)
    }

    #[inline]
    pub fn is_contextual_keyword(self) -> bool {
        (ADD_KW..=YIELD_KW).contains(&self)
    }

    /// Kinds that appear as tokens in a finished tree.
    #[inline]
    pub fn is_token(self) -> bool {
        self <= EOF
    }

    #[inline]
    pub fn is_node(self) -> bool {
        self > TOMBSTONE && self < __LAST
    }

    #[inline]
    pub fn is_literal_token(self) -> bool {
        matches!(self, NUMERIC_LITERAL | CHARACTER_LITERAL | STRING_LITERAL)
    }

    #[inline]
    pub fn is_predefined_type(self) -> bool {
        matches!(
            self,
            BOOL_KW
                | BYTE_KW
                | CHAR_KW
                | DECIMAL_KW
                | DOUBLE_KW
                | FLOAT_KW
                | INT_KW
                | LONG_KW
                | OBJECT_KW
                | SBYTE_KW
                | SHORT_KW
                | STRING_KW
                | UINT_KW
                | ULONG_KW
                | USHORT_KW
                | VOID_KW
        )
    }

    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "abstract" => ABSTRACT_KW,
            "as" => AS_KW,
            "base" => BASE_KW,
            "bool" => BOOL_KW,
            "break" => BREAK_KW,
            "byte" => BYTE_KW,
            "case" => CASE_KW,
            "catch" => CATCH_KW,
            "char" => CHAR_KW,
            "checked" => CHECKED_KW,
            "class" => CLASS_KW,
            "const" => CONST_KW,
            "continue" => CONTINUE_KW,
            "decimal" => DECIMAL_KW,
            "default" => DEFAULT_KW,
            "delegate" => DELEGATE_KW,
            "do" => DO_KW,
            "double" => DOUBLE_KW,
            "else" => ELSE_KW,
            "enum" => ENUM_KW,
            "event" => EVENT_KW,
            "explicit" => EXPLICIT_KW,
            "extern" => EXTERN_KW,
            "false" => FALSE_KW,
            "finally" => FINALLY_KW,
            "fixed" => FIXED_KW,
            "float" => FLOAT_KW,
            "for" => FOR_KW,
            "foreach" => FOREACH_KW,
            "goto" => GOTO_KW,
            "if" => IF_KW,
            "implicit" => IMPLICIT_KW,
            "in" => IN_KW,
            "int" => INT_KW,
            "interface" => INTERFACE_KW,
            "internal" => INTERNAL_KW,
            "is" => IS_KW,
            "lock" => LOCK_KW,
            "long" => LONG_KW,
            "namespace" => NAMESPACE_KW,
            "new" => NEW_KW,
            "null" => NULL_KW,
            "object" => OBJECT_KW,
            "operator" => OPERATOR_KW,
            "out" => OUT_KW,
            "override" => OVERRIDE_KW,
            "params" => PARAMS_KW,
            "private" => PRIVATE_KW,
            "protected" => PROTECTED_KW,
            "public" => PUBLIC_KW,
            "readonly" => READONLY_KW,
            "ref" => REF_KW,
            "return" => RETURN_KW,
            "sbyte" => SBYTE_KW,
            "sealed" => SEALED_KW,
            "short" => SHORT_KW,
            "sizeof" => SIZEOF_KW,
            "stackalloc" => STACKALLOC_KW,
            "static" => STATIC_KW,
            "string" => STRING_KW,
            "struct" => STRUCT_KW,
            "switch" => SWITCH_KW,
            "this" => THIS_KW,
            "throw" => THROW_KW,
            "true" => TRUE_KW,
            "try" => TRY_KW,
            "typeof" => TYPEOF_KW,
            "uint" => UINT_KW,
            "ulong" => ULONG_KW,
            "unchecked" => UNCHECKED_KW,
            "unsafe" => UNSAFE_KW,
            "ushort" => USHORT_KW,
            "using" => USING_KW,
            "virtual" => VIRTUAL_KW,
            "void" => VOID_KW,
            "volatile" => VOLATILE_KW,
            "while" => WHILE_KW,
            "__arglist" => ARGLIST_KW,
            "__makeref" => MAKEREF_KW,
            "__reftype" => REFTYPE_KW,
            "__refvalue" => REFVALUE_KW,
            _ => return None,
        };
        Some(kind)
    }

    pub fn from_contextual_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "add" => ADD_KW,
            "alias" => ALIAS_KW,
            "ascending" => ASCENDING_KW,
            "async" => ASYNC_KW,
            "await" => AWAIT_KW,
            "by" => BY_KW,
            "descending" => DESCENDING_KW,
            "equals" => EQUALS_KW,
            "from" => FROM_KW,
            "get" => GET_KW,
            "global" => GLOBAL_KW,
            "group" => GROUP_KW,
            "into" => INTO_KW,
            "join" => JOIN_KW,
            "let" => LET_KW,
            "on" => ON_KW,
            "orderby" => ORDERBY_KW,
            "partial" => PARTIAL_KW,
            "remove" => REMOVE_KW,
            "select" => SELECT_KW,
            "set" => SET_KW,
            "unmanaged" => UNMANAGED_KW,
            "when" => WHEN_KW,
            "where" => WHERE_KW,
            "yield" => YIELD_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed source text of punctuation and keyword kinds.
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            LEFT_PAREN => "(",
            RIGHT_PAREN => ")",
            LEFT_BRACKET => "[",
            RIGHT_BRACKET => "]",
            LEFT_BRACE => "{",
            RIGHT_BRACE => "}",
            SEMICOLON => ";",
            COMMA => ",",
            DOT => ".",
            DOT_DOT => "..",
            COLON => ":",
            COLON_COLON => "::",
            QUESTION => "?",
            QUESTION_QUESTION => "??",
            QUESTION_QUESTION_EQ => "??=",
            TILDE => "~",
            BANG => "!",
            BANG_EQ => "!=",
            EQ => "=",
            EQ_EQ => "==",
            FAT_ARROW => "=>",
            ARROW => "->",
            LT => "<",
            LT_EQ => "<=",
            SHL => "<<",
            SHL_EQ => "<<=",
            GT => ">",
            GT_EQ => ">=",
            SHR => ">>",
            SHR_EQ => ">>=",
            USHR => ">>>",
            USHR_EQ => ">>>=",
            PLUS => "+",
            PLUS_PLUS => "++",
            PLUS_EQ => "+=",
            MINUS => "-",
            MINUS_MINUS => "--",
            MINUS_EQ => "-=",
            STAR => "*",
            STAR_EQ => "*=",
            SLASH => "/",
            SLASH_EQ => "/=",
            PERCENT => "%",
            PERCENT_EQ => "%=",
            AMP => "&",
            AMP_AMP => "&&",
            AMP_EQ => "&=",
            PIPE => "|",
            PIPE_PIPE => "||",
            PIPE_EQ => "|=",
            CARET => "^",
            CARET_EQ => "^=",
            ABSTRACT_KW => "abstract",
            AS_KW => "as",
            BASE_KW => "base",
            BOOL_KW => "bool",
            BREAK_KW => "break",
            BYTE_KW => "byte",
            CASE_KW => "case",
            CATCH_KW => "catch",
            CHAR_KW => "char",
            CHECKED_KW => "checked",
            CLASS_KW => "class",
            CONST_KW => "const",
            CONTINUE_KW => "continue",
            DECIMAL_KW => "decimal",
            DEFAULT_KW => "default",
            DELEGATE_KW => "delegate",
            DO_KW => "do",
            DOUBLE_KW => "double",
            ELSE_KW => "else",
            ENUM_KW => "enum",
            EVENT_KW => "event",
            EXPLICIT_KW => "explicit",
            EXTERN_KW => "extern",
            FALSE_KW => "false",
            FINALLY_KW => "finally",
            FIXED_KW => "fixed",
            FLOAT_KW => "float",
            FOR_KW => "for",
            FOREACH_KW => "foreach",
            GOTO_KW => "goto",
            IF_KW => "if",
            IMPLICIT_KW => "implicit",
            IN_KW => "in",
            INT_KW => "int",
            INTERFACE_KW => "interface",
            INTERNAL_KW => "internal",
            IS_KW => "is",
            LOCK_KW => "lock",
            LONG_KW => "long",
            NAMESPACE_KW => "namespace",
            NEW_KW => "new",
            NULL_KW => "null",
            OBJECT_KW => "object",
            OPERATOR_KW => "operator",
            OUT_KW => "out",
            OVERRIDE_KW => "override",
            PARAMS_KW => "params",
            PRIVATE_KW => "private",
            PROTECTED_KW => "protected",
            PUBLIC_KW => "public",
            READONLY_KW => "readonly",
            REF_KW => "ref",
            RETURN_KW => "return",
            SBYTE_KW => "sbyte",
            SEALED_KW => "sealed",
            SHORT_KW => "short",
            SIZEOF_KW => "sizeof",
            STACKALLOC_KW => "stackalloc",
            STATIC_KW => "static",
            STRING_KW => "string",
            STRUCT_KW => "struct",
            SWITCH_KW => "switch",
            THIS_KW => "this",
            THROW_KW => "throw",
            TRUE_KW => "true",
            TRY_KW => "try",
            TYPEOF_KW => "typeof",
            UINT_KW => "uint",
            ULONG_KW => "ulong",
            UNCHECKED_KW => "unchecked",
            UNSAFE_KW => "unsafe",
            USHORT_KW => "ushort",
            USING_KW => "using",
            VIRTUAL_KW => "virtual",
            VOID_KW => "void",
            VOLATILE_KW => "volatile",
            WHILE_KW => "while",
            ARGLIST_KW => "__arglist",
            MAKEREF_KW => "__makeref",
            REFTYPE_KW => "__reftype",
            REFVALUE_KW => "__refvalue",
            ADD_KW => "add",
            ALIAS_KW => "alias",
            ASCENDING_KW => "ascending",
            ASYNC_KW => "async",
            AWAIT_KW => "await",
            BY_KW => "by",
            DESCENDING_KW => "descending",
            EQUALS_KW => "equals",
            FROM_KW => "from",
            GET_KW => "get",
            GLOBAL_KW => "global",
            GROUP_KW => "group",
            INTO_KW => "into",
            JOIN_KW => "join",
            LET_KW => "let",
            ON_KW => "on",
            ORDERBY_KW => "orderby",
            PARTIAL_KW => "partial",
            REMOVE_KW => "remove",
            SELECT_KW => "select",
            SET_KW => "set",
            UNMANAGED_KW => "unmanaged",
            WHEN_KW => "when",
            WHERE_KW => "where",
            YIELD_KW => "yield",
            _ => return None,
        };
        Some(text)
    }

    /// Human readable name used in "expected" diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            IDENT => "identifier",
            NUMERIC_LITERAL | CHARACTER_LITERAL | STRING_LITERAL => "literal",
            EOF => "end-of-file",
            _ => self.text().unwrap_or("token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_tables_agree() {
        for raw in ABSTRACT_KW as u16..=YIELD_KW as u16 {
            // SAFETY: the range lies within the contiguous `repr(u16)` discriminants.
            let kind = unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) };
            let text = kind.text().unwrap();
            let back = SyntaxKind::from_keyword(text)
                .or_else(|| SyntaxKind::from_contextual_keyword(text));
            assert_eq!(back, Some(kind), "{text}");
        }
    }

    #[test]
    fn classification() {
        assert!(NEWLINE.is_trivia());
        assert!(!LEFT_PAREN.is_trivia());
        assert!(GT.is_punct());
        assert!(REFVALUE_KW.is_keyword());
        assert!(!AWAIT_KW.is_keyword());
        assert!(AWAIT_KW.is_contextual_keyword());
        assert!(EOF.is_token());
        assert!(COMPILATION_UNIT.is_node());
        assert!(!LIST.is_node());
        assert!(INT_KW.is_predefined_type());
    }
}
