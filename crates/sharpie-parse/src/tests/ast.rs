use sharpie_syntax::SyntaxKind;
use sharpie_syntax::ast::{AstNode, CompilationUnit, Expr, Member};

use crate::{parse_compilation_unit, parse_expression};

#[test]
fn compilation_unit_members() {
    let text = r#"
extern alias Lib;
using System;
using static System.Math;
using L = System.Collections.Generic.List<int>;
namespace N
{
    public sealed class C<T> : B, I
    {
        private int a = 1, b;
        public C(int a) { }
        public string Name { get; set; }
        public T Get(int index, string key) { return default; }
        int Twice(int x) => x * 2;
    }
    enum E { A, B = 2 }
    delegate void D(int x);
}
"#;
    let parse = parse_compilation_unit(text);
    assert_eq!(parse.errors().count(), 0);
    let unit = CompilationUnit::cast(parse.syntax()).unwrap();

    let externs = unit.externs().filter_map(|it| it.identifier()).map(|it| it.text_trimmed());
    assert_eq!(externs.collect::<Vec<_>>(), ["Lib"]);

    let usings = unit.usings().collect::<Vec<_>>();
    assert_eq!(usings.len(), 3);
    assert!(!usings[0].is_static());
    assert!(usings[1].is_static());
    assert_eq!(usings[2].alias().map(|it| it.text_trimmed()), Some("L"));
    assert_eq!(usings[0].name().map(|it| it.text_trimmed()), Some("System"));

    let Some(Member::Namespace(namespace)) = unit.members().next() else {
        panic!("expected a namespace");
    };
    assert_eq!(namespace.name().map(|it| it.text_trimmed()), Some("N"));
    let members = namespace.members().collect::<Vec<_>>();
    assert_eq!(members.len(), 3);

    let Member::Type(class) = members[0] else { panic!("expected a class") };
    assert_eq!(class.identifier().map(|it| it.text_trimmed()), Some("C"));
    assert_eq!(class.keyword().map(|it| it.kind()), Some(SyntaxKind::CLASS_KW));
    let modifiers = class.modifiers().map(|it| it.text_trimmed()).collect::<Vec<_>>();
    assert_eq!(modifiers, ["public", "sealed"]);
    let parameters = class.type_parameters().filter_map(|it| it.identifier());
    assert_eq!(parameters.map(|it| it.text_trimmed()).collect::<Vec<_>>(), ["T"]);
    assert_eq!(class.base_types().count(), 2);

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for member in class.members() {
        match member {
            Member::Field(field) => {
                let declaration = field.declaration().unwrap();
                assert_eq!(declaration.ty().map(|it| it.text_trimmed()), Some("int"));
                for declarator in declaration.declarators() {
                    let name = declarator.identifier().unwrap().text_trimmed();
                    let value = declarator.initializer().map(|it| it.syntax().text_trimmed());
                    fields.push((name, value));
                }
            }
            Member::Method(method) => {
                let name = method.identifier().unwrap().text_trimmed();
                let parameters = method
                    .parameter_list()
                    .into_iter()
                    .flat_map(|list| list.parameters())
                    .filter_map(|it| it.identifier())
                    .map(|it| it.text_trimmed())
                    .collect::<Vec<_>>();
                methods.push((name, parameters, method.body().is_some()));
            }
            Member::Constructor(constructor) => {
                assert_eq!(constructor.identifier().map(|it| it.text_trimmed()), Some("C"));
                assert_eq!(constructor.parameter_list().map(|it| it.parameters().count()), Some(1));
            }
            Member::Property(property) => {
                assert_eq!(property.ty().map(|it| it.text_trimmed()), Some("string"));
                let accessors = property.accessors().filter_map(|it| it.keyword());
                assert_eq!(accessors.map(|it| it.text_trimmed()).collect::<Vec<_>>(), ["get", "set"]);
            }
            other => panic!("unexpected member {other:?}"),
        }
    }
    assert_eq!(fields, [("a", Some("1")), ("b", None)]);
    assert_eq!(
        methods,
        [("Get", vec!["index", "key"], true), ("Twice", vec!["x"], false)]
    );

    let Member::Enum(enumeration) = members[1] else { panic!("expected an enum") };
    let values = enumeration
        .members()
        .map(|it| (it.identifier().unwrap().text_trimmed(), it.value().map(|v| v.syntax().text_trimmed())))
        .collect::<Vec<_>>();
    assert_eq!(values, [("A", None), ("B", Some("2"))]);

    let Member::Delegate(delegate) = members[2] else { panic!("expected a delegate") };
    assert_eq!(delegate.identifier().map(|it| it.text_trimmed()), Some("D"));
    assert_eq!(delegate.return_type().map(|it| it.text_trimmed()), Some("void"));
}

#[test]
fn missing_identifiers_read_as_none() {
    let parse = parse_compilation_unit("class { }");
    let unit = CompilationUnit::cast(parse.syntax()).unwrap();
    let Some(Member::Type(class)) = unit.members().next() else { panic!("expected a class") };
    assert!(class.identifier().is_none());
}

#[test]
fn binary_expressions() {
    let parse = parse_expression("a + b * c");
    let expr = Expr::cast(parse.syntax()).unwrap();
    let (lhs, op, rhs) = expr.binary().unwrap();
    assert_eq!(lhs.syntax().text_trimmed(), "a");
    assert_eq!(op.kind(), SyntaxKind::PLUS);
    assert_eq!(rhs.kind(), SyntaxKind::MULTIPLY_EXPRESSION);

    let parse = parse_expression("a ? b : c");
    let expr = Expr::cast(parse.syntax()).unwrap();
    assert!(expr.binary().is_none());

    let parse = parse_expression("x += 1");
    let expr = Expr::cast(parse.syntax()).unwrap();
    assert_eq!(expr.binary().map(|(_, op, _)| op.kind()), Some(SyntaxKind::PLUS_EQ));
}
