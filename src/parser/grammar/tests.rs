use crate::parser::{FragmentKind, SyntaxKind, SyntaxNode, parse, parse_fragment};
use rstest::rstest;

fn first(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.descendants().find(|n| n.kind() == kind)
}

fn count(node: &SyntaxNode, kind: SyntaxKind) -> usize {
    node.descendants().filter(|n| n.kind() == kind).count()
}

#[rstest]
#[case("using System;")]
#[case("using static System.Math;")]
#[case("using Json = Newtonsoft.Json.JsonConvert;")]
#[case("namespace A.B { }")]
#[case("namespace A;\nclass C { }")]
#[case("[assembly: AssemblyVersion(\"1.0\")]")]
#[case("public sealed class C<T> : Base<T>, IFoo where T : class, new() { }")]
#[case("struct P { public int X, Y; }")]
#[case("interface I { void M(); int P { get; } }")]
#[case("enum E : byte { A = 1, B, C = A | B, }")]
#[case("class C { public C(int x) : base(x) { } }")]
#[case("class C { event EventHandler Changed; }")]
#[case("class C { int P { get; private set; } = 5; }")]
#[case("class C { void M<T>(ref int a, out int b, params int[] c) where T : struct { } }")]
#[case("class C { static int Twice(this int x) => x * 2; }")]
#[case("delegate void Handler(object sender);")]
fn test_declarations_parse_cleanly(#[case] source: &str) {
    let parsed = parse(source);
    assert!(parsed.ok(), "{source}: {:?}", parsed.errors);
    assert_eq!(parsed.syntax().to_string(), source);
}

#[rstest]
#[case("x = 1;")]
#[case("x >>= 2;")]
#[case("var list = new List<int> { 1, 2 };")]
#[case("if (a) b(); else if (c) d(); else { e(); }")]
#[case("while (i < 10) i++;")]
#[case("do { i--; } while (i > 0);")]
#[case("for (int i = 0; i < n; i++) { }")]
#[case("for (;;) break;")]
#[case("foreach (var item in items) Console.WriteLine(item);")]
#[case("try { } catch (IOException ex) when (ex.HResult == 1) { } finally { }")]
#[case("throw new InvalidOperationException(\"no\");")]
#[case("return a ? b : c ?? d;")]
#[case("var f = (int x) => x + 1;")]
#[case("var y = (string)o;")]
#[case("lock (gate) { }")]
fn test_statements_parse_cleanly(#[case] source: &str) {
    let parsed = parse_fragment(FragmentKind::Statement, source);
    assert!(parsed.ok(), "{source}: {:?}", parsed.errors);
    assert_eq!(parsed.syntax().to_string(), source);
}

#[test]
fn test_declaration_owns_leading_trivia() {
    let source = "class C\n{\n    /// Doc\n    public int X;\n}\n";
    let root = parse(source).syntax();
    let field = first(&root, SyntaxKind::FIELD_DECL).unwrap();
    assert!(field.to_string().starts_with("\n    /// Doc\n    public"));
    assert!(field.to_string().ends_with(';'));
}

#[test]
fn test_parameters_do_not_own_trivia() {
    let root = parse("class C { void M(int a,  int b) { } }").syntax();
    let params: Vec<_> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::PARAM)
        .map(|n| n.to_string())
        .collect();
    assert_eq!(params, vec!["int a", "int b"]);
}

#[test]
fn test_modifier_list_always_present() {
    let root = parse("class C { int x; }").syntax();
    let class = first(&root, SyntaxKind::CLASS_DECL).unwrap();
    let modifiers = class
        .children()
        .find(|n| n.kind() == SyntaxKind::MODIFIER_LIST)
        .unwrap();
    assert_eq!(modifiers.to_string(), "");
    assert_eq!(count(&root, SyntaxKind::MODIFIER_LIST), 2);
}

#[test]
fn test_multi_declarator_field() {
    let root = parse("class C { int a = 1, b; }").syntax();
    assert_eq!(count(&root, SyntaxKind::FIELD_DECL), 1);
    assert_eq!(count(&root, SyntaxKind::VARIABLE_DECLARATOR), 2);
}

#[test]
fn test_else_if_nests_if_in_else_clause() {
    let parsed = parse_fragment(FragmentKind::Statement, "if (a) x(); else if (b) y();");
    let root = parsed.syntax();
    let else_clause = first(&root, SyntaxKind::ELSE_CLAUSE).unwrap();
    let nested = else_clause.children().find(|n| n.kind().is_statement()).unwrap();
    assert_eq!(nested.kind(), SyntaxKind::IF_STMT);
}

#[test]
fn test_generic_closing_brackets() {
    let parsed = parse("class C { Dictionary<string, List<int>> map; }");
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let ty = first(&parsed.syntax(), SyntaxKind::TYPE).unwrap();
    assert_eq!(ty.to_string(), "Dictionary<string, List<int>>");
}

#[test]
fn test_shift_is_binary_not_generic() {
    let parsed = parse_fragment(FragmentKind::Expression, "a >> 2");
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let expr = parsed.syntax().first_child().unwrap();
    assert_eq!(expr.kind(), SyntaxKind::BINARY_EXPR);
}

#[test]
fn test_assignment_inside_expression_statement() {
    let parsed = parse_fragment(FragmentKind::Statement, "total += price * count;");
    let stmt = parsed.syntax().first_child().unwrap();
    assert_eq!(stmt.kind(), SyntaxKind::EXPR_STMT);
    let expr = stmt.first_child().unwrap();
    assert_eq!(expr.kind(), SyntaxKind::ASSIGN_EXPR);
}

#[test]
fn test_unmodeled_members_get_dedicated_kinds() {
    let source = "class C { ~C() { } int this[int i] => i; public static C operator +(C a, C b) => a; }";
    let parsed = parse(source);
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let root = parsed.syntax();
    assert_eq!(count(&root, SyntaxKind::DESTRUCTOR_DECL), 1);
    assert_eq!(count(&root, SyntaxKind::INDEXER_DECL), 1);
    assert_eq!(count(&root, SyntaxKind::OPERATOR_DECL), 1);
}

#[test]
fn test_recovery_keeps_following_members() {
    let source = "class C { int x = ; void M() { } }";
    let parsed = parse(source);
    assert!(!parsed.ok());
    assert_eq!(parsed.syntax().to_string(), source);
    assert_eq!(count(&parsed.syntax(), SyntaxKind::METHOD_DECL), 1);
}

#[test]
fn test_file_scoped_namespace_body() {
    let parsed = parse("namespace A.B;\n\nclass C { }\nclass D { }\n");
    assert!(parsed.ok(), "{:?}", parsed.errors);
    let ns = first(&parsed.syntax(), SyntaxKind::NAMESPACE_DECL).unwrap();
    let body = ns.children().find(|n| n.kind() == SyntaxKind::MEMBER_LIST).unwrap();
    assert_eq!(body.children().count(), 2);
}
