use std::fmt;
use std::str::FromStr;

use sharpie_errors::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("unknown language version `{0}`")]
    UnknownLanguageVersion(String),
    #[error("unknown source kind `{0}`, expected `compilation-unit`, `expression` or `statement`")]
    UnknownSourceKind(String),
}

/// Language version that gates newer syntax.
///
/// Gated syntax is always parsed; using it below its version only adds a
/// diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageVersion {
    CSharp1,
    CSharp2,
    CSharp3,
    CSharp4,
    CSharp5,
    CSharp6,
    CSharp7,
    CSharp7_1,
    CSharp7_2,
    CSharp7_3,
    CSharp8,
    #[default]
    Latest,
}

impl LanguageVersion {
    /// The concrete version `Latest` stands for.
    pub fn effective(self) -> Self {
        match self {
            Self::Latest => Self::CSharp8,
            version => version,
        }
    }

    fn rank(self) -> u8 {
        self.effective() as u8
    }

    pub fn supports(self, feature: Feature) -> bool {
        self.rank() >= feature.required_version().rank()
    }

    /// Diagnostic used for a feature that is unavailable in this version.
    pub(crate) fn unavailable_code(self) -> ErrorCode {
        match self.effective() {
            Self::CSharp1 => ErrorCode::FeatureNotAvailableInVersion1,
            Self::CSharp2 => ErrorCode::FeatureNotAvailableInVersion2,
            Self::CSharp3 => ErrorCode::FeatureNotAvailableInVersion3,
            Self::CSharp4 => ErrorCode::FeatureNotAvailableInVersion4,
            Self::CSharp5 => ErrorCode::FeatureNotAvailableInVersion5,
            Self::CSharp6 => ErrorCode::FeatureNotAvailableInVersion6,
            Self::CSharp7 => ErrorCode::FeatureNotAvailableInVersion7,
            Self::CSharp7_1 => ErrorCode::FeatureNotAvailableInVersion7_1,
            Self::CSharp7_2 => ErrorCode::FeatureNotAvailableInVersion7_2,
            Self::CSharp7_3 | Self::CSharp8 | Self::Latest => {
                ErrorCode::FeatureNotAvailableInVersion7_3
            }
        }
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::CSharp1 => "1",
            Self::CSharp2 => "2",
            Self::CSharp3 => "3",
            Self::CSharp4 => "4",
            Self::CSharp5 => "5",
            Self::CSharp6 => "6",
            Self::CSharp7 => "7.0",
            Self::CSharp7_1 => "7.1",
            Self::CSharp7_2 => "7.2",
            Self::CSharp7_3 => "7.3",
            Self::CSharp8 => "8.0",
            Self::Latest => "latest",
        };
        f.write_str(text)
    }
}

impl FromStr for LanguageVersion {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = match s.trim().to_ascii_lowercase().as_str() {
            "1" | "1.0" => Self::CSharp1,
            "2" | "2.0" => Self::CSharp2,
            "3" | "3.0" => Self::CSharp3,
            "4" | "4.0" => Self::CSharp4,
            "5" | "5.0" => Self::CSharp5,
            "6" | "6.0" => Self::CSharp6,
            "7" | "7.0" => Self::CSharp7,
            "7.1" => Self::CSharp7_1,
            "7.2" => Self::CSharp7_2,
            "7.3" => Self::CSharp7_3,
            "8" | "8.0" => Self::CSharp8,
            "latest" | "default" => Self::Latest,
            _ => return Err(OptionsError::UnknownLanguageVersion(s.to_owned())),
        };
        Ok(version)
    }
}

/// Root production a parse starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceKind {
    #[default]
    CompilationUnit,
    Expression,
    Statement,
}

impl FromStr for SourceKind {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compilation-unit" | "unit" => Ok(Self::CompilationUnit),
            "expression" | "expr" => Ok(Self::Expression),
            "statement" | "stmt" => Ok(Self::Statement),
            _ => Err(OptionsError::UnknownSourceKind(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
    pub kind: SourceKind,
    pub preprocessor_symbols: Vec<String>,
}

impl ParseOptions {
    pub fn with_language_version(mut self, language_version: LanguageVersion) -> Self {
        self.language_version = language_version;
        self
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_preprocessor_symbols<S: Into<String>>(
        mut self,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        self.preprocessor_symbols.extend(symbols.into_iter().map(Into::into));
        self
    }
}

macro_rules! features {
    ($($name:ident => $text:literal, $version:ident;)*) => {
        /// Syntax introduced after the first language version.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Feature {
            $($name,)*
        }

        impl Feature {
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$name => $text,)*
                }
            }

            pub fn required_version(self) -> LanguageVersion {
                match self {
                    $(Self::$name => LanguageVersion::$version,)*
                }
            }
        }
    };
}

features! {
    Generics => "generics", CSharp2;
    NullableTypes => "nullable types", CSharp2;
    AnonymousMethods => "anonymous methods", CSharp2;
    CoalesceOperator => "null coalescing operator", CSharp2;
    StaticClasses => "static classes", CSharp2;
    AliasQualifier => "namespace alias qualifier", CSharp2;
    PartialTypes => "partial types", CSharp2;
    Lambdas => "lambda expression", CSharp3;
    QueryExpressions => "query expression", CSharp3;
    ObjectInitializers => "object initializer", CSharp3;
    CollectionInitializers => "collection initializer", CSharp3;
    ImplicitArrays => "implicitly typed array", CSharp3;
    AnonymousTypes => "anonymous types", CSharp3;
    NamedArguments => "named argument", CSharp4;
    OptionalParameters => "optional parameter", CSharp4;
    Variance => "generic variance", CSharp4;
    Async => "async function", CSharp5;
    UsingStatic => "using static", CSharp6;
    ExpressionBodiedMembers => "expression-bodied method", CSharp6;
    AutoPropertyInitializers => "auto property initializer", CSharp6;
    NullPropagation => "null propagating operator", CSharp6;
    InterpolatedStrings => "interpolated strings", CSharp6;
    ExceptionFilters => "exception filter", CSharp6;
    Tuples => "tuples", CSharp7;
    DigitSeparators => "digit separators", CSharp7;
    BinaryLiterals => "binary literals", CSharp7;
    OutVar => "out variable declaration", CSharp7;
    PatternMatching => "pattern matching", CSharp7;
    LocalFunctions => "local functions", CSharp7;
    RefLocalsAndReturns => "byref locals and returns", CSharp7;
    ThrowExpressions => "throw expression", CSharp7;
    ExpressionBodiedAccessors => "expression body constructor, destructor and accessor", CSharp7;
    DefaultLiteral => "default literal", CSharp7_1;
    InParameters => "readonly references", CSharp7_2;
    ReadOnlyStructs => "readonly structs", CSharp7_2;
    RefStructs => "ref structs", CSharp7_2;
    LeadingDigitSeparator => "leading digit separator", CSharp7_2;
    PrivateProtected => "private protected", CSharp7_2;
    CoalesceAssignment => "coalescing assignment", CSharp8;
    AltInterpolatedVerbatimStrings => "alternative interpolated verbatim strings", CSharp8;
    IndexOperator => "index operator", CSharp8;
    RangeOperator => "range operator", CSharp8;
    SwitchExpressions => "recursive patterns", CSharp8;
    StaticLocalFunctions => "static local functions", CSharp8;
    UsingDeclarations => "using declarations", CSharp8;
    AsyncStreams => "async streams", CSharp8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_versions_parse_from_strings() {
        for (input, expected) in [
            ("1", LanguageVersion::CSharp1),
            ("7", LanguageVersion::CSharp7),
            ("7.3", LanguageVersion::CSharp7_3),
            ("8.0", LanguageVersion::CSharp8),
            ("latest", LanguageVersion::Latest),
            ("Latest", LanguageVersion::Latest),
        ] {
            assert_eq!(input.parse::<LanguageVersion>(), Ok(expected), "{input}");
        }
        assert_eq!(
            "9".parse::<LanguageVersion>(),
            Err(OptionsError::UnknownLanguageVersion("9".to_owned()))
        );
    }

    #[test]
    fn latest_supports_everything() {
        assert!(LanguageVersion::Latest.supports(Feature::CoalesceAssignment));
        assert!(LanguageVersion::CSharp7_3.supports(Feature::Tuples));
        assert!(!LanguageVersion::CSharp7_3.supports(Feature::RangeOperator));
        assert!(!LanguageVersion::CSharp1.supports(Feature::Generics));
    }

    #[test]
    fn unavailable_code_names_the_version_in_effect() {
        assert_eq!(
            LanguageVersion::CSharp5.unavailable_code(),
            ErrorCode::FeatureNotAvailableInVersion5
        );
        assert_eq!(
            LanguageVersion::CSharp7_2.unavailable_code(),
            ErrorCode::FeatureNotAvailableInVersion7_2
        );
    }

    #[test]
    fn options_builder() {
        let options = ParseOptions::default()
            .with_kind("expression".parse().unwrap())
            .with_language_version(LanguageVersion::CSharp6)
            .with_preprocessor_symbols(["DEBUG", "TRACE"]);
        assert_eq!(options.kind, SourceKind::Expression);
        assert_eq!(options.language_version, LanguageVersion::CSharp6);
        assert_eq!(options.preprocessor_symbols, ["DEBUG", "TRACE"]);
    }
}
