use std::fmt;

use crate::Severity;

macro_rules! error_codes {
    ($($(#[$attr:meta])* $name:ident = $number:literal => $template:literal,)*) => {
        /// Closed catalog of scanner and parser diagnostics.
        ///
        /// Discriminants are the stable numeric codes, so `code as u16` is
        /// what gets printed after the `CS` prefix.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum ErrorCode {
            $($(#[$attr])* $name = $number,)*
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$name,)*];

            /// Message template; `{0}` and `{1}` are replaced by diagnostic arguments.
            pub fn template(self) -> &'static str {
                match self {
                    $(ErrorCode::$name => $template,)*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(ErrorCode::$name => stringify!($name),)*
                }
            }
        }
    };
}

error_codes! {
    // Lexical.
    UnexpectedCharacter = 1056 => "Unexpected character '{0}'",
    NewlineInConst = 1010 => "Newline in constant",
    UnterminatedStringLit = 1039 => "Unterminated string literal",
    OpenEndedComment = 1035 => "End-of-file found, '*/' expected",
    IllegalEscape = 1009 => "Unrecognized escape sequence",
    EmptyCharConst = 1011 => "Empty character literal",
    TooManyCharsInConst = 1012 => "Too many characters in character literal",
    InvalidNumber = 1013 => "Invalid number",
    IntOverflow = 1021 => "Integral constant is too large",
    FloatOverflow = 594 => "Floating-point constant is outside the range of type '{0}'",
    ExpectedVerbatimLiteral = 1646 => "Keyword, identifier, or string expected after verbatim specifier: @",

    // Preprocessor.
    PPDirectiveExpected = 1024 => "Preprocessor directive expected",
    EndOfPPLineExpected = 1025 => "Single-line comment or end-of-line expected",
    EndifDirectiveExpected = 1027 => "#endif directive expected",
    UnexpectedDirective = 1028 => "Unexpected preprocessor directive",
    ErrorDirective = 1029 => "#error: '{0}'",
    WarningDirective = 1030 => "#warning: '{0}'",
    PPDefFollowsToken = 1032 => "Cannot define/undefine preprocessor symbols after first token in file",
    EndRegionDirectiveExpected = 1038 => "#endregion directive expected",
    BadDirectivePlacement = 1040 => "Preprocessor directives must appear as the first non-whitespace character on a line",
    InvalidPreprocExpr = 1517 => "Invalid preprocessor expression",

    // Structural.
    IdentifierExpected = 1001 => "Identifier expected",
    SemicolonExpected = 1002 => "; expected",
    SyntaxError = 1003 => "Syntax error, '{0}' expected",
    GetOrSetExpected = 1014 => "A get or set accessor expected",
    OvlUnaryOperatorExpected = 1019 => "Overloadable unary operator expected",
    OvlBinaryOperatorExpected = 1020 => "Overloadable binary operator expected",
    EOFExpected = 1022 => "Type or namespace definition, or end-of-file expected",
    BadEmbeddedStmt = 1023 => "Embedded statement cannot be a declaration or labeled statement",
    CloseParenExpected = 1026 => ") expected",
    TypeExpected = 1031 => "Type expected",
    OvlOperatorExpected = 1037 => "Overloadable operator expected",
    IdentifierExpectedKW = 1041 => "Identifier expected; '{0}' is a keyword",
    AddOrRemoveExpected = 1055 => "An add or remove accessor expected",
    RbraceExpected = 1513 => "} expected",
    LbraceExpected = 1514 => "{ expected",
    InExpected = 1515 => "'in' expected",
    InvalidMemberDecl = 1519 => "Invalid token '{0}' in class, struct, or interface member declaration",
    MemberNeedsType = 1520 => "Method must have a return type",
    ExpectedEndTry = 1524 => "Expected catch or finally",
    InvalidExprTerm = 1525 => "Invalid expression term '{0}'",
    BadNewExpr = 1526 => "A new expression requires an argument list or (), [], or {} after type",
    MissingArraySize = 1586 => "Array creation must have array size or array initializer",
    UnexpectedSemicolon = 1597 => "Semicolon after method or accessor block is not valid",
    ExpressionExpected = 1733 => "Expected expression",
    ValueExpected = 443 => "Syntax error; value expected",
    InsufficientStack = 8078 => "An expression is too long or complex to compile",

    // Contextual.
    AddRemoveMustHaveBody = 73 => "An add or remove accessor must have a body",
    ConstraintOnlyAllowedOnGenericDecl = 80 => "Constraints are not allowed on non-generic declarations",
    BadMemberFlag = 106 => "The modifier '{0}' is not valid for this item",
    NamespaceUnexpected = 116 => "A namespace cannot directly contain members such as fields or methods",
    ConstValueRequired = 145 => "A const field requires a value to be provided",
    ParamsLast = 231 => "A params parameter must be the last parameter in a formal parameter list",
    VarargsLast = 257 => "An __arglist parameter must be the last parameter in a formal parameter list",
    ArraySizeInDeclaration = 270 => "Array size cannot be specified in a variable declaration (try initializing with a 'new' expression)",
    ExternAfterElements = 439 => "An extern alias declaration must precede all other elements defined in the namespace",
    CStyleArray = 650 => "Bad array declarator: To declare a managed array the rank specifier precedes the variable's identifier",
    DuplicateModifier = 1004 => "Duplicate '{0}' modifier",
    DefaultValueNotAllowed = 1065 => "Default values are not valid in this context.",
    DupParamMod = 1107 => "A parameter can only have one '{0}' modifier",
    UsingAfterElements = 1529 => "A using clause must precede all other elements defined in the namespace except extern alias declarations",
    NoVoidHere = 1547 => "Keyword 'void' cannot be used in this context",
    GlobalAttributesNotFirst = 1730 => "Assembly and module attributes must precede all other elements defined in a file except using clauses and extern alias declarations",
    IllegalVarianceSyntax = 1960 => "Invalid variance modifier. Only interface and delegate type parameters can be specified as variant.",
    BadAwaitAsIdentifier = 4003 => "'await' cannot be used as an identifier within an async method or lambda expression",
    UnexpectedAliasedName = 7000 => "Unexpected use of an aliased name",
    UnexpectedGenericName = 7002 => "Unexpected use of a generic name",
    TupleTooFewElements = 8124 => "Tuple must contain at least two elements.",

    // Language version gates; the code names the version in effect.
    FeatureNotAvailableInVersion1 = 8022 => "Feature '{0}' is not available in C# 1. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion2 = 8023 => "Feature '{0}' is not available in C# 2. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion3 = 8024 => "Feature '{0}' is not available in C# 3. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion4 = 8025 => "Feature '{0}' is not available in C# 4. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion5 = 8026 => "Feature '{0}' is not available in C# 5. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion6 = 8059 => "Feature '{0}' is not available in C# 6. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion7 = 8107 => "Feature '{0}' is not available in C# 7.0. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion7_1 = 8302 => "Feature '{0}' is not available in C# 7.1. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion7_2 = 8320 => "Feature '{0}' is not available in C# 7.2. Please use language version {1} or greater.",
    FeatureNotAvailableInVersion7_3 = 8370 => "Feature '{0}' is not available in C# 7.3. Please use language version {1} or greater.",
}

impl ErrorCode {
    pub fn number(self) -> u16 {
        self as u16
    }

    pub fn severity(self) -> Severity {
        match self {
            ErrorCode::WarningDirective => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn from_number(number: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.number() == number)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CS{:04}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_unique() {
        let mut numbers = ErrorCode::ALL.iter().map(|code| code.number()).collect::<Vec<_>>();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn display_pads_to_four_digits() {
        assert_eq!(ErrorCode::NamespaceUnexpected.to_string(), "CS0116");
        assert_eq!(ErrorCode::IdentifierExpectedKW.to_string(), "CS1041");
        assert_eq!(ErrorCode::from_number(4003), Some(ErrorCode::BadAwaitAsIdentifier));
    }
}
