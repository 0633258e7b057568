use crate::SyntaxKind::{self, *};
use crate::{SyntaxList, SyntaxNode, SyntaxSlot, SyntaxToken};

pub trait AstNode<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_node {
    ($(#[$attr:meta])* $name:ident => $($kind:ident)|+) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                matches!(syntax.kind(), $($kind)|+).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    };
}

fn node<'a, N: AstNode<'a>>(syntax: SyntaxNode<'a>, index: usize) -> Option<N> {
    syntax.slot(index).and_then(SyntaxSlot::into_node).and_then(N::cast)
}

/// Present tokens only; missing tokens read as `None`.
fn token(syntax: SyntaxNode<'_>, index: usize) -> Option<SyntaxToken<'_>> {
    syntax.slot(index).and_then(SyntaxSlot::into_token).filter(|token| !token.is_missing())
}

fn list<'a, N: AstNode<'a> + 'a>(
    syntax: SyntaxNode<'a>,
    index: usize,
) -> impl Iterator<Item = N> + 'a {
    syntax
        .slot(index)
        .and_then(SyntaxSlot::into_list)
        .into_iter()
        .flat_map(SyntaxList::nodes)
        .filter_map(N::cast)
}

fn tokens(syntax: SyntaxNode<'_>, index: usize) -> impl Iterator<Item = SyntaxToken<'_>> {
    syntax
        .slot(index)
        .and_then(SyntaxSlot::into_list)
        .into_iter()
        .flat_map(SyntaxList::iter)
        .filter_map(SyntaxSlot::into_token)
}

ast_node!(CompilationUnit => COMPILATION_UNIT);

impl<'a> CompilationUnit<'a> {
    pub fn externs(self) -> impl Iterator<Item = ExternAlias<'a>> + 'a {
        list(self.0, 0)
    }

    pub fn usings(self) -> impl Iterator<Item = UsingDirective<'a>> + 'a {
        list(self.0, 1)
    }

    pub fn attribute_lists(self) -> impl Iterator<Item = AttributeList<'a>> + 'a {
        list(self.0, 2)
    }

    pub fn members(self) -> impl Iterator<Item = Member<'a>> + 'a {
        list(self.0, 3)
    }
}

ast_node!(ExternAlias => EXTERN_ALIAS_DIRECTIVE);

impl<'a> ExternAlias<'a> {
    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 2)
    }
}

ast_node!(UsingDirective => USING_DIRECTIVE);

impl<'a> UsingDirective<'a> {
    pub fn is_static(self) -> bool {
        token(self.0, 1).is_some()
    }

    /// The alias of `using A = B;`.
    pub fn alias(self) -> Option<SyntaxToken<'a>> {
        let equals = self.0.slot(2).and_then(SyntaxSlot::into_node)?;
        let name = equals.slot(0).and_then(SyntaxSlot::into_node)?;
        token(name, 0)
    }

    pub fn name(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(3).and_then(SyntaxSlot::into_node)
    }
}

ast_node!(AttributeList => ATTRIBUTE_LIST);

ast_node!(
    /// `namespace N { ... }`, possibly nested.
    Namespace => NAMESPACE_DECLARATION
);

impl<'a> Namespace<'a> {
    pub fn name(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(1).and_then(SyntaxSlot::into_node)
    }

    pub fn externs(self) -> impl Iterator<Item = ExternAlias<'a>> + 'a {
        list(self.0, 3)
    }

    pub fn usings(self) -> impl Iterator<Item = UsingDirective<'a>> + 'a {
        list(self.0, 4)
    }

    pub fn members(self) -> impl Iterator<Item = Member<'a>> + 'a {
        list(self.0, 5)
    }
}

ast_node!(TypeDeclaration => CLASS_DECLARATION | STRUCT_DECLARATION | INTERFACE_DECLARATION);

impl<'a> TypeDeclaration<'a> {
    pub fn modifiers(self) -> impl Iterator<Item = SyntaxToken<'a>> + 'a {
        tokens(self.0, 1)
    }

    pub fn keyword(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 2)
    }

    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 3)
    }

    pub fn type_parameters(self) -> impl Iterator<Item = TypeParameter<'a>> + 'a {
        self.0
            .slot(4)
            .and_then(SyntaxSlot::into_node)
            .into_iter()
            .flat_map(|parameters| list(parameters, 1))
    }

    pub fn base_types(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        self.0
            .slot(5)
            .and_then(SyntaxSlot::into_node)
            .and_then(|base| base.slot(1))
            .and_then(SyntaxSlot::into_list)
            .into_iter()
            .flat_map(SyntaxList::nodes)
    }

    pub fn members(self) -> impl Iterator<Item = Member<'a>> + 'a {
        list(self.0, 8)
    }
}

ast_node!(TypeParameter => TYPE_PARAMETER);

impl<'a> TypeParameter<'a> {
    /// `in` or `out`.
    pub fn variance(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 1)
    }

    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 2)
    }
}

ast_node!(EnumDeclaration => ENUM_DECLARATION);

impl<'a> EnumDeclaration<'a> {
    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 3)
    }

    pub fn members(self) -> impl Iterator<Item = EnumMember<'a>> + 'a {
        list(self.0, 6)
    }
}

ast_node!(EnumMember => ENUM_MEMBER_DECLARATION);

impl<'a> EnumMember<'a> {
    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 1)
    }

    pub fn value(self) -> Option<Expr<'a>> {
        let clause = self.0.slot(2).and_then(SyntaxSlot::into_node)?;
        node(clause, 1)
    }
}

ast_node!(DelegateDeclaration => DELEGATE_DECLARATION);

impl<'a> DelegateDeclaration<'a> {
    pub fn return_type(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(3).and_then(SyntaxSlot::into_node)
    }

    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 4)
    }

    pub fn parameter_list(self) -> Option<ParameterList<'a>> {
        node(self.0, 6)
    }
}

ast_node!(Method => METHOD_DECLARATION);

impl<'a> Method<'a> {
    pub fn modifiers(self) -> impl Iterator<Item = SyntaxToken<'a>> + 'a {
        tokens(self.0, 1)
    }

    pub fn return_type(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(2).and_then(SyntaxSlot::into_node)
    }

    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 4)
    }

    pub fn parameter_list(self) -> Option<ParameterList<'a>> {
        node(self.0, 6)
    }

    pub fn body(self) -> Option<Block<'a>> {
        node(self.0, 8)
    }

    pub fn expression_body(self) -> Option<Expr<'a>> {
        let arrow = self.0.slot(9).and_then(SyntaxSlot::into_node)?;
        node(arrow, 1)
    }
}

ast_node!(Constructor => CONSTRUCTOR_DECLARATION);

impl<'a> Constructor<'a> {
    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 2)
    }

    pub fn parameter_list(self) -> Option<ParameterList<'a>> {
        node(self.0, 3)
    }
}

ast_node!(Property => PROPERTY_DECLARATION);

impl<'a> Property<'a> {
    pub fn ty(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(2).and_then(SyntaxSlot::into_node)
    }

    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 4)
    }

    pub fn accessors(self) -> impl Iterator<Item = Accessor<'a>> + 'a {
        self.0
            .slot(5)
            .and_then(SyntaxSlot::into_node)
            .into_iter()
            .flat_map(|accessors| list(accessors, 1))
    }
}

ast_node!(
    Accessor => GET_ACCESSOR_DECLARATION
        | SET_ACCESSOR_DECLARATION
        | ADD_ACCESSOR_DECLARATION
        | REMOVE_ACCESSOR_DECLARATION
        | UNKNOWN_ACCESSOR_DECLARATION
);

impl<'a> Accessor<'a> {
    pub fn keyword(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 2)
    }
}

ast_node!(Field => FIELD_DECLARATION | EVENT_FIELD_DECLARATION);

impl<'a> Field<'a> {
    pub fn declaration(self) -> Option<VariableDeclaration<'a>> {
        let index = if self.0.kind() == EVENT_FIELD_DECLARATION { 3 } else { 2 };
        node(self.0, index)
    }
}

ast_node!(VariableDeclaration => VARIABLE_DECLARATION);

impl<'a> VariableDeclaration<'a> {
    pub fn ty(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(0).and_then(SyntaxSlot::into_node)
    }

    pub fn declarators(self) -> impl Iterator<Item = VariableDeclarator<'a>> + 'a {
        list(self.0, 1)
    }
}

ast_node!(VariableDeclarator => VARIABLE_DECLARATOR);

impl<'a> VariableDeclarator<'a> {
    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 0)
    }

    pub fn initializer(self) -> Option<Expr<'a>> {
        let clause = self.0.slot(2).and_then(SyntaxSlot::into_node)?;
        node(clause, 1)
    }
}

ast_node!(ParameterList => PARAMETER_LIST | BRACKETED_PARAMETER_LIST);

impl<'a> ParameterList<'a> {
    pub fn parameters(self) -> impl Iterator<Item = Parameter<'a>> + 'a {
        list(self.0, 1)
    }
}

ast_node!(Parameter => PARAMETER);

impl<'a> Parameter<'a> {
    pub fn modifiers(self) -> impl Iterator<Item = SyntaxToken<'a>> + 'a {
        tokens(self.0, 1)
    }

    pub fn ty(self) -> Option<SyntaxNode<'a>> {
        self.0.slot(2).and_then(SyntaxSlot::into_node)
    }

    pub fn identifier(self) -> Option<SyntaxToken<'a>> {
        token(self.0, 3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member<'a> {
    Namespace(Namespace<'a>),
    Type(TypeDeclaration<'a>),
    Enum(EnumDeclaration<'a>),
    Delegate(DelegateDeclaration<'a>),
    Method(Method<'a>),
    Constructor(Constructor<'a>),
    Property(Property<'a>),
    Field(Field<'a>),
    /// Members without a dedicated wrapper: operators, indexers, events and
    /// destructors, and incomplete members.
    Other(SyntaxNode<'a>),
}

impl<'a> AstNode<'a> for Member<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        let member = match syntax.kind() {
            NAMESPACE_DECLARATION => Member::Namespace(Namespace(syntax)),
            CLASS_DECLARATION | STRUCT_DECLARATION | INTERFACE_DECLARATION => {
                Member::Type(TypeDeclaration(syntax))
            }
            ENUM_DECLARATION => Member::Enum(EnumDeclaration(syntax)),
            DELEGATE_DECLARATION => Member::Delegate(DelegateDeclaration(syntax)),
            METHOD_DECLARATION => Member::Method(Method(syntax)),
            CONSTRUCTOR_DECLARATION => Member::Constructor(Constructor(syntax)),
            PROPERTY_DECLARATION => Member::Property(Property(syntax)),
            FIELD_DECLARATION | EVENT_FIELD_DECLARATION => Member::Field(Field(syntax)),
            DESTRUCTOR_DECLARATION
            | OPERATOR_DECLARATION
            | CONVERSION_OPERATOR_DECLARATION
            | INDEXER_DECLARATION
            | EVENT_DECLARATION
            | INCOMPLETE_MEMBER => Member::Other(syntax),
            _ => return None,
        };
        Some(member)
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Member::Namespace(it) => it.0,
            Member::Type(it) => it.0,
            Member::Enum(it) => it.0,
            Member::Delegate(it) => it.0,
            Member::Method(it) => it.0,
            Member::Constructor(it) => it.0,
            Member::Property(it) => it.0,
            Member::Field(it) => it.0,
            Member::Other(syntax) => syntax,
        }
    }
}

ast_node!(Block => BLOCK);

impl<'a> Block<'a> {
    pub fn statements(self) -> impl Iterator<Item = SyntaxNode<'a>> + 'a {
        self.0
            .slot(1)
            .and_then(SyntaxSlot::into_list)
            .into_iter()
            .flat_map(SyntaxList::nodes)
    }
}

ast_node!(LocalDeclaration => LOCAL_DECLARATION_STATEMENT);

impl<'a> LocalDeclaration<'a> {
    pub fn declaration(self) -> Option<VariableDeclaration<'a>> {
        node(self.0, 3)
    }
}

ast_node!(ReturnStatement => RETURN_STATEMENT);

impl<'a> ReturnStatement<'a> {
    pub fn expr(self) -> Option<Expr<'a>> {
        node(self.0, 1)
    }
}

/// Any expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expr<'a>(SyntaxNode<'a>);

impl<'a> Expr<'a> {
    pub fn kind(self) -> SyntaxKind {
        self.0.kind()
    }

    /// Operands and operator of a binary or assignment expression.
    pub fn binary(self) -> Option<(Expr<'a>, SyntaxToken<'a>, Expr<'a>)> {
        if !is_binary(self.0.kind()) {
            return None;
        }
        let lhs = node(self.0, 0)?;
        let op = self.0.slot(1).and_then(SyntaxSlot::into_token)?;
        let rhs = node(self.0, 2)?;
        Some((lhs, op, rhs))
    }
}

impl<'a> AstNode<'a> for Expr<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        is_expression(syntax.kind()).then_some(Self(syntax))
    }

    fn syntax(self) -> SyntaxNode<'a> {
        self.0
    }
}

fn is_binary(kind: SyntaxKind) -> bool {
    let raw = kind as u16;
    let operator = (ADD_EXPRESSION as u16..=COALESCE_EXPRESSION as u16).contains(&raw)
        && !matches!(kind, IS_EXPRESSION | AS_EXPRESSION | IS_PATTERN_EXPRESSION);
    operator || (SIMPLE_ASSIGNMENT_EXPRESSION as u16..=COALESCE_ASSIGNMENT_EXPRESSION as u16).contains(&raw)
}

fn is_expression(kind: SyntaxKind) -> bool {
    let raw = kind as u16;
    let in_range = (PREDEFINED_TYPE as u16..=ALIAS_QUALIFIED_NAME as u16).contains(&raw)
        || (PARENTHESIZED_EXPRESSION as u16..=QUERY_EXPRESSION as u16).contains(&raw);
    in_range
        && !matches!(
            kind,
            TYPE_ARGUMENT_LIST
                | ARGUMENT
                | ARGUMENT_LIST
                | BRACKETED_ARGUMENT_LIST
                | INTERPOLATED_STRING_TEXT_PART
                | INTERPOLATION
                | INTERPOLATION_ALIGNMENT_CLAUSE
                | INTERPOLATION_FORMAT_CLAUSE
                | ANONYMOUS_OBJECT_MEMBER_DECLARATOR
                | SINGLE_VARIABLE_DESIGNATION
                | PARENTHESIZED_VARIABLE_DESIGNATION
                | DISCARD_DESIGNATION
                | SWITCH_EXPRESSION_ARM
                | DECLARATION_PATTERN
                | CONSTANT_PATTERN
                | VAR_PATTERN
                | DISCARD_PATTERN
        )
}
