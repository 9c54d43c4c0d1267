use super::*;
use crate::parser::{FragmentKind, parse, parse_fragment};

fn first<T: AstNode>(source: &str) -> T {
    let parsed = parse(source);
    assert!(parsed.ok(), "errors: {:?}", parsed.errors);
    parsed
        .syntax()
        .descendants()
        .find_map(T::cast)
        .expect("node of the requested kind")
}

#[test]
fn test_ast_using_directives() {
    let plain: UsingDirective = first("using System.Collections.Generic;");
    assert_eq!(plain.target(), Some("System.Collections.Generic".to_string()));
    assert!(!plain.is_static());
    assert_eq!(plain.alias(), None);

    let alias: UsingDirective = first("using Json = Newtonsoft.Json;");
    assert_eq!(alias.alias(), Some("Json".to_string()));
    assert_eq!(alias.target(), Some("Newtonsoft.Json".to_string()));

    let stat: UsingDirective = first("using static System.Math;");
    assert!(stat.is_static());
}

#[test]
fn test_ast_namespace() {
    let ns: NamespaceDecl = first("namespace Outer.Inner { class C { } }");
    assert_eq!(ns.name(), Some("Outer.Inner".to_string()));
    assert_eq!(ns.qualified_name().unwrap().segments(), vec!["Outer", "Inner"]);
    assert!(!ns.is_file_scoped());
    assert_eq!(ns.body().unwrap().members().count(), 1);
}

#[test]
fn test_ast_type_declaration() {
    let class: TypeDecl =
        first("[Serializable] public abstract class Repo<TKey, TValue> : Base, IRepo where TKey : struct { }");
    assert_eq!(class.name(), Some("Repo".to_string()));
    assert_eq!(class.attribute_lists().count(), 1);
    let modifiers = class.modifier_list().unwrap();
    assert_eq!(modifiers.kinds(), vec![SyntaxKind::PUBLIC_KW, SyntaxKind::ABSTRACT_KW]);
    let params: Vec<_> = class.type_params().iter().filter_map(|p| p.name()).collect();
    assert_eq!(params, vec!["TKey", "TValue"]);
    let bases: Vec<_> = class.base_list().unwrap().types().map(|t| t.text()).collect();
    assert_eq!(bases, vec!["Base", "IRepo"]);
    let clause = class.constraint_clauses().next().unwrap();
    assert_eq!(clause.target(), Some("TKey".to_string()));
    assert_eq!(clause.constraints(), vec!["struct"]);
}

#[test]
fn test_ast_constraint_list() {
    let class: TypeDecl = first("class C<T> where T : class, IDisposable, new() { }");
    let clause = class.constraint_clauses().next().unwrap();
    assert_eq!(clause.constraints(), vec!["class", "IDisposable", "new()"]);
}

#[test]
fn test_ast_attribute_arguments() {
    let attr: Attribute = first("[Obsolete(\"old\", error: true, Url = \"x\")] class C { }");
    assert_eq!(attr.name(), Some("Obsolete".to_string()));
    let args = attr.args();
    assert_eq!(args.len(), 3);
    assert_eq!(args[0].name(), None);
    assert_eq!(args[0].value().unwrap().to_string(), "\"old\"");
    assert_eq!(args[1].name(), Some(("error".to_string(), SyntaxKind::COLON)));
    assert_eq!(args[2].name(), Some(("Url".to_string(), SyntaxKind::EQ)));
}

#[test]
fn test_ast_method() {
    let method: MethodDecl = first("class C { public static T Get<T>(ref int a, int b = 2) { return default; } }");
    assert_eq!(method.name(), Some("Get".to_string()));
    assert_eq!(method.return_type().unwrap().text(), "T");
    assert_eq!(method.type_params().len(), 1);
    let params = method.params();
    assert_eq!(params.len(), 2);
    assert!(params[0].is_ref());
    assert_eq!(params[1].name(), Some("b".to_string()));
    assert_eq!(params[1].default_value().unwrap().to_string(), "2");
    assert_eq!(method.body().unwrap().statements().count(), 1);
}

#[test]
fn test_ast_explicit_interface_method() {
    let method: MethodDecl = first("class C { void IDisposable.Dispose() { } }");
    assert!(method.is_explicit_implementation());
    assert_eq!(method.name(), Some("Dispose".to_string()));
}

#[test]
fn test_ast_property_accessors() {
    let prop: PropertyDecl = first("class C { public int Count { get; private set; } = 3; }");
    assert_eq!(prop.name(), Some("Count".to_string()));
    assert_eq!(prop.ty().unwrap().text(), "int");
    let accessors = prop.accessors();
    assert_eq!(accessors.len(), 2);
    assert_eq!(accessors[0].keyword().unwrap().text(), "get");
    assert!(accessors[1].modifier_list().unwrap().has(SyntaxKind::PRIVATE_KW));
    assert_eq!(prop.initializer().unwrap().to_string(), "3");
}

#[test]
fn test_ast_field_declarators() {
    let field: FieldDecl = first("class C { private readonly int a = 1, b; }");
    let decl = field.declaration().unwrap();
    assert_eq!(decl.ty().unwrap().text(), "int");
    let names: Vec<_> = decl.declarators().filter_map(|d| d.name()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(decl.declarators().nth(1).unwrap().initializer().is_none());
}

#[test]
fn test_ast_constructor_initializer() {
    let ctor: ConstructorDecl = first("class C { C(int x) : base(x, 1) { } }");
    assert_eq!(ctor.name(), Some("C".to_string()));
    assert_eq!(ctor.initializer().unwrap().text(), "base(x, 1)");
}

#[test]
fn test_ast_enum_members() {
    let decl: TypeDecl = first("enum Color : byte { Red = 1, Green }");
    let members: Vec<_> = decl.enum_member_list().unwrap().members().collect();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].value().unwrap().to_string(), "1");
    assert!(members[1].value().is_none());
}

#[test]
fn test_ast_statements() {
    let parsed = parse_fragment(
        FragmentKind::Statement,
        "for (int i = 0; i < 3; i++, j--) { }",
    );
    let stmt = ForStmt::cast(parsed.syntax().first_child().unwrap()).unwrap();
    assert_eq!(stmt.declaration().unwrap().declarators().count(), 1);
    assert_eq!(stmt.condition().unwrap().to_string(), "i < 3");
    assert_eq!(stmt.incrementors().unwrap().expressions().count(), 2);
    assert_eq!(stmt.body().unwrap().kind(), SyntaxKind::BLOCK);
}

#[test]
fn test_ast_try_statement() {
    let parsed = parse_fragment(
        FragmentKind::Statement,
        "try { a(); } catch (Exception e) when (e != null) { } finally { b(); }",
    );
    let stmt = TryStmt::cast(parsed.syntax().first_child().unwrap()).unwrap();
    let catch = stmt.catches().next().unwrap();
    let decl = catch.declaration().unwrap();
    assert_eq!(decl.ty().unwrap().text(), "Exception");
    assert_eq!(decl.name(), Some("e".to_string()));
    assert_eq!(catch.filter().unwrap().condition().unwrap().to_string(), "e != null");
    assert!(stmt.finally_clause().is_some());
}

#[test]
fn test_ast_assignment_operator() {
    let parsed = parse_fragment(FragmentKind::Expression, "x >>= 1");
    let expr = parsed.syntax().first_child().unwrap();
    assert_eq!(assignment_operator(&expr), Some(">>=".to_string()));
    let (left, right) = assignment_operands(&expr);
    assert_eq!(left.unwrap().to_string(), "x");
    assert_eq!(right.unwrap().to_string(), "1");
}

#[test]
fn test_canonical_text_ignores_formatting() {
    assert_eq!(canonical_source("a  +\n  b /* c */"), "a + b");
    let parsed = parse_fragment(FragmentKind::Expression, "Foo( 1,2 )");
    let expr = parsed.syntax().first_child().unwrap();
    assert_eq!(canonical_text(&expr), canonical_source("Foo(1, 2)"));
}

#[test]
fn test_documentation_and_annotations() {
    let method: MethodDecl = first(
        "class C\n{\n    //[[ Kad(Name: \"x\") ]]\n    /// First line\n    /// Second\n    void M() { }\n}",
    );
    assert_eq!(
        documentation(method.syntax()),
        Some("First line\nSecond".to_string())
    );
    let annotations = annotation_comments(method.syntax());
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotation_body(annotations[0].text()), Some("Kad(Name: \"x\")"));
    assert_eq!(indentation(method.syntax()), Some("    ".to_string()));
}

#[test]
fn test_plain_comment_is_not_annotation() {
    assert!(!is_annotation_comment("// just a note"));
    assert!(is_annotation_comment("//[[ Marker ]]"));
}
