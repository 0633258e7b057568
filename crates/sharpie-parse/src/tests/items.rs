use expect_test::expect;
use sharpie_syntax::SyntaxKind;

use super::{check_invariants, codes, sexp};
use crate::{LanguageVersion, ParseOptions, parse, parse_compilation_unit};

fn check_codes(text: &str, expected: &str) {
    let parse = parse_compilation_unit(text);
    check_invariants(text, &parse);
    assert_eq!(codes(&parse), expected, "{text}");
}

#[test]
fn extern_alias_without_alias_keyword() {
    let parse = parse_compilation_unit("extern a;");
    check_invariants("extern a;", &parse);
    expect![[r#"(COMPILATION_UNIT (EXTERN_ALIAS_DIRECTIVE extern <ALIAS_KW> a ;))"#]]
        .assert_eq(&sexp(parse.syntax()));
    assert_eq!(codes(&parse), "CS1003");
    assert_eq!(parse.diagnostics()[0].message(), "Syntax error, 'alias' expected");
}

#[test]
fn using_static_with_repeated_keyword() {
    let parse = parse_compilation_unit("using static static a;");
    check_invariants("using static static a;", &parse);
    assert_eq!(codes(&parse), "CS1041");
    let range = parse.diagnostics()[0].range();
    assert_eq!((u32::from(range.start()), u32::from(range.end())), (13, 19));
}

#[test]
fn using_directive_shapes() {
    let parse = parse_compilation_unit("using A = B.C<int>;");
    expect![[r#"(COMPILATION_UNIT (USING_DIRECTIVE using (NAME_EQUALS (IDENTIFIER_NAME A) =) (QUALIFIED_NAME (IDENTIFIER_NAME B) . (GENERIC_NAME C (TYPE_ARGUMENT_LIST < (PREDEFINED_TYPE int) >))) ;))"#]]
    .assert_eq(&sexp(parse.syntax()));
}

#[test]
fn directive_ordering() {
    check_codes("using A; extern alias B;", "CS0439");
    check_codes("class C { } using A;", "CS1529");
    check_codes("class C { } [assembly: A]", "CS1730");
    check_codes("[assembly: A] using B;", "CS1529");
    check_codes("extern alias A; using B; [assembly: C] class D { }", "");
}

#[test]
fn misplaced_directives_become_skipped_text() {
    let parse = parse_compilation_unit("class C { } using A;");
    expect![[r#"(COMPILATION_UNIT (CLASS_DECLARATION class C { }))"#]]
        .assert_eq(&sexp(parse.syntax()));
}

#[test]
fn namespace_names() {
    check_codes("namespace A.B.C { }", "");
    check_codes("namespace A { namespace B { } }", "");
    check_codes("namespace a::b { }", "CS7000");
    check_codes("namespace A.B<T> { }", "CS7002");
    check_codes("namespace A { using B; class C { } };", "");
}

#[test]
fn members_outside_types() {
    check_codes("int x;", "CS0116");
    check_codes("void M() { }", "CS0116");
    check_codes("namespace N { int P { get; } }", "CS0116");
    check_codes("static using A;", "CS0106");
}

#[test]
fn stray_tokens_at_top_level() {
    check_codes("}", "CS1022");
    check_codes("class C { } } }", "CS1022");
}

#[test]
fn constraints_need_type_parameters() {
    check_codes("class C<T> where T : class, new() { }", "");
    check_codes("class C where T : class { }", "CS0080");
    check_codes("class C { void M<T>() where T : struct { } }", "");
    check_codes("class C { void M() where T : struct { } }", "CS0080");
    check_codes("delegate void D<T>() where T : I, unmanaged;", "");
}

#[test]
fn variance_only_on_interfaces_and_delegates() {
    check_codes("interface I<in T, out U> { }", "");
    check_codes("delegate U D<in T, out U>(T t);", "");
    check_codes("class C<in T> { }", "CS1960");
    check_codes("class C { void M<out T>() { } }", "CS1960");
}

#[test]
fn type_declarations() {
    for (text, kind) in [
        ("public sealed class C : B, I { }", SyntaxKind::CLASS_DECLARATION),
        ("readonly ref struct S { }", SyntaxKind::STRUCT_DECLARATION),
        ("partial interface I { void M(); }", SyntaxKind::INTERFACE_DECLARATION),
        ("enum E : byte { A, B = 2, [X] C, }", SyntaxKind::ENUM_DECLARATION),
        ("delegate int D(int a, params int[] rest);", SyntaxKind::DELEGATE_DECLARATION),
        ("static class C { class Nested { } }", SyntaxKind::CLASS_DECLARATION),
        ("[Serializable, A(1, B = 2)] class C { }", SyntaxKind::CLASS_DECLARATION),
    ] {
        let parse = parse_compilation_unit(text);
        check_invariants(text, &parse);
        assert_eq!(codes(&parse), "", "{text}");
        let member = parse.syntax().children().next();
        assert_eq!(member.map(|it| it.kind()), Some(kind), "{text}");
    }
}

#[test]
fn member_declarations() {
    let text = r#"
class C<T> : IEnumerable<T>
{
    private const int A = 1, B = 2;
    public static readonly string S = "s";
    private int[] _items;
    public event EventHandler Changed;
    public event EventHandler Custom { add { } remove { } }
    public C() : this(0) { }
    public C(int capacity) : base() { _items = new int[capacity]; }
    ~C() { }
    public int Count => _items.Length;
    public int Capacity { get { return _items.Length; } private set { } }
    public T this[int index] { get => default; set { } }
    public string Name { get; set; } = "n";
    public static C operator +(C a, C b) => a;
    public static bool operator true(C c) => true;
    public static bool operator false(C c) => false;
    public static C operator >>(C a, int b) => a;
    public static implicit operator int(C c) => 0;
    IEnumerator<T> IEnumerable<T>.GetEnumerator() => null;
    int System.Collections.ICollection.Count { get; }
    public async Task<int> RunAsync(CancellationToken token = default) { await Task.Delay(1); return 1; }
    public void Generic<U>(ref U u, out int o, in long l, params object[] rest) where U : class { o = 0; }
    protected internal abstract void Abstract();
    private protected virtual void Virtual() { }
    public void M(__arglist) { }
}
"#;
    let parse = parse_compilation_unit(text);
    check_invariants(text, &parse);
    assert_eq!(codes(&parse), "");
}

#[test]
fn old_language_versions() {
    for (version, text, expected) in [
        (LanguageVersion::CSharp1, "class C<T> { }", "CS8022"),
        (LanguageVersion::CSharp1, "static class C { }", "CS8022"),
        (LanguageVersion::CSharp5, "using static System.Math;", "CS8026"),
        (LanguageVersion::CSharp5, "class C { int M() => 1; }", "CS8026"),
        (LanguageVersion::CSharp5, "class C { int P { get; } = 1; }", "CS8026"),
        (LanguageVersion::CSharp7_1, "readonly struct S { }", "CS8302"),
        (LanguageVersion::CSharp3, "interface I<out T> { }", "CS8024"),
    ] {
        let options = ParseOptions::default().with_language_version(version);
        let parse = parse(text, &options);
        check_invariants(text, &parse);
        assert_eq!(codes(&parse), expected, "{text}");
    }
}
