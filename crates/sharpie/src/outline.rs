//! Indented list of the declarations in a compilation unit.

use std::fmt::Write as _;

use sharpie_syntax::SyntaxNode;
use sharpie_syntax::ast::{AstNode, CompilationUnit, Member, TypeDeclaration};

pub(crate) fn outline(root: SyntaxNode<'_>) -> String {
    let mut out = String::new();
    if let Some(unit) = CompilationUnit::cast(root) {
        for using in unit.usings() {
            let name = using.name().map_or("", |name| name.text_trimmed());
            match using.alias() {
                Some(alias) => {
                    _ = writeln!(out, "using {} = {name}", alias.value_text());
                }
                None => {
                    _ = writeln!(out, "using {name}");
                }
            }
        }
        for member in unit.members() {
            write_member(&mut out, member, 0);
        }
    }
    out
}

fn write_member(out: &mut String, member: Member<'_>, depth: usize) {
    let indent = "  ".repeat(depth);
    match member {
        Member::Namespace(namespace) => {
            let name = namespace.name().map_or("?", |name| name.text_trimmed());
            _ = writeln!(out, "{indent}namespace {name}");
            for member in namespace.members() {
                write_member(out, member, depth + 1);
            }
        }
        Member::Type(ty) => {
            let keyword = ty.keyword().map_or("type", |keyword| keyword.text_trimmed());
            _ = writeln!(out, "{indent}{keyword} {}", type_name(ty));
            for member in ty.members() {
                write_member(out, member, depth + 1);
            }
        }
        Member::Enum(enumeration) => {
            let name = enumeration.identifier().map_or("?", |it| it.value_text());
            let members = enumeration
                .members()
                .filter_map(|it| it.identifier())
                .map(|it| it.value_text())
                .collect::<Vec<_>>();
            _ = writeln!(out, "{indent}enum {name} {{ {} }}", members.join(", "));
        }
        Member::Delegate(delegate) => {
            let name = delegate.identifier().map_or("?", |it| it.value_text());
            _ = writeln!(out, "{indent}delegate {name}");
        }
        Member::Method(method) => {
            let name = method.identifier().map_or("?", |it| it.value_text());
            let ty = method.return_type().map_or("?", |it| it.text_trimmed());
            let parameters = method
                .parameter_list()
                .into_iter()
                .flat_map(|list| list.parameters())
                .map(|parameter| parameter.ty().map_or("?", |it| it.text_trimmed()))
                .collect::<Vec<_>>();
            _ = writeln!(out, "{indent}method {name}({}) -> {ty}", parameters.join(", "));
        }
        Member::Constructor(constructor) => {
            let name = constructor.identifier().map_or("?", |it| it.value_text());
            _ = writeln!(out, "{indent}constructor {name}");
        }
        Member::Property(property) => {
            let name = property.identifier().map_or("?", |it| it.value_text());
            let ty = property.ty().map_or("?", |it| it.text_trimmed());
            _ = writeln!(out, "{indent}property {name}: {ty}");
        }
        Member::Field(field) => {
            let Some(declaration) = field.declaration() else { return };
            let ty = declaration.ty().map_or("?", |it| it.text_trimmed());
            for declarator in declaration.declarators() {
                let name = declarator.identifier().map_or("?", |it| it.value_text());
                _ = writeln!(out, "{indent}field {name}: {ty}");
            }
        }
        Member::Other(syntax) => {
            _ = writeln!(out, "{indent}{:?}", syntax.kind());
        }
    }
}

fn type_name(ty: TypeDeclaration<'_>) -> String {
    let name = ty.identifier().map_or("?", |it| it.value_text()).to_owned();
    let parameters =
        ty.type_parameters().filter_map(|it| it.identifier()).map(|it| it.value_text());
    let parameters = parameters.collect::<Vec<_>>();
    if parameters.is_empty() { name } else { format!("{name}<{}>", parameters.join(", ")) }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;
    use sharpie_parse::parse_compilation_unit;

    use super::outline;

    #[test]
    fn outline_of_a_namespace() {
        let parse = parse_compilation_unit(
            r#"
using System;
using Map = System.Collections.Generic.Dictionary<string, int>;
namespace Shapes
{
    interface IShape { double Area(); }
    class Circle<T> : IShape
    {
        private double _r, _d;
        public Circle(double r) { _r = r; }
        public double Radius { get => _r; }
        public double Area() => Math.PI * _r * _r;
        public static Circle<T> operator +(Circle<T> a, Circle<T> b) => a;
    }
    enum Color { Red, Green }
    delegate void Draw(IShape shape);
}
"#,
        );
        expect![[r#"
            using System
            using Map = System.Collections.Generic.Dictionary<string, int>
            namespace Shapes
              interface IShape
                method Area() -> double
              class Circle<T>
                field _r: double
                field _d: double
                constructor Circle
                property Radius: double
                method Area() -> double
                OPERATOR_DECLARATION
              enum Color { Red, Green }
              delegate Draw
        "#]]
        .assert_eq(&outline(parse.syntax()));
    }

    #[test]
    fn escaped_identifiers_are_named_by_their_value() {
        let parse = parse_compilation_unit("class @class { int @int; void \\u0061b() { } }");
        expect![[r#"
            class class
              field int: int
              method ab() -> void
        "#]]
        .assert_eq(&outline(parse.syntax()));
    }
}
