use rstest::rstest;

use crate::dom::{Dom, ExpressionData, NodeData, NodeId, NodeKind, Slot};
use crate::error::DomError;
use crate::host::DomHost;
use crate::options::{DomOptions, UnsupportedPolicy};

fn load(text: &str) -> Dom {
    DomHost::new().load(text).unwrap()
}

fn build(dom: &Dom) -> String {
    DomHost::new().build_text(dom).unwrap()
}

fn first_class(dom: &Dom) -> NodeId {
    dom.root_classes()[0]
}

fn method_body(dom: &Dom) -> Vec<NodeId> {
    let class = first_class(dom);
    let method = dom.methods(class)[0];
    dom.children(method, Slot::Statements).to_vec()
}

// ============================================================================
// Rebuilding every node from its raw syntax
// ============================================================================

#[rstest]
#[case("namespace N\n{\n}\n")]
#[case("namespace A.B\n{\n    using System;\n}\n")]
#[case("using System;\nusing IO = System.IO;\n\nnamespace N { class C { } }\n")]
#[case("[Serializable]\npublic class Box<T> where T : class\n{\n}\n")]
#[case("public class C\n{\n    public int Value { get; set; }\n}\n")]
#[case("class C\n{\n    private int a, b = 2;\n    event EventHandler Changed;\n}\n")]
#[case("interface IShape\n{\n    double Area();\n}\n")]
#[case("enum Color\n{\n    Red,\n    Green = 2,\n}\n")]
#[case("struct P\n{\n    public P(int x) : this() { }\n}\n")]
#[case("/* header */\nclass C\n{\n    /** n **/ int n; /* tail */\n}\n")]
#[case("class \u{dc} { int \u{e9}; }\n")]
#[case("class C\n{\n    T Get<T>(T a) => a;\n    int P => 42;\n    int Q { get => q; }\n    C() => Init();\n}\n")]
fn test_touched_declarations_rebuild_to_source(#[case] text: &str) {
    let mut dom = load(text);
    dom.touch_all();
    assert_eq!(build(&dom), text);
}

#[rstest]
#[case("foreach (var item in items)\n        {\n            Use(item);\n        }")]
#[case("try\n        {\n            Run();\n        }\n        catch (Exception ex)\n        {\n            throw;\n        }\n        finally\n        {\n            Done();\n        }")]
#[case("if (a) return 1; else return 2;")]
#[case("for (int i = 0; i < n; i++) { total += i; }")]
#[case("while (busy) { }")]
#[case("int x = 1, y;")]
fn test_touched_statements_rebuild_to_source(#[case] statement: &str) {
    let text = format!("class C\n{{\n    void M()\n    {{\n        {statement}\n    }}\n}}\n");
    let mut dom = load(&text);
    dom.touch_all();
    assert_eq!(build(&dom), text);
}

// ============================================================================
// Edits
// ============================================================================

#[test]
fn test_rename_type() {
    let mut dom = load("namespace N\n{\n    class Foo\n    {\n    }\n}\n");
    let class = first_class(&dom);
    dom.set_name(class, "Bar").unwrap();
    assert_eq!(build(&dom), "namespace N\n{\n    class Bar\n    {\n    }\n}\n");
}

#[test]
fn test_rename_and_revert_restores_text() {
    let text = "public class X<T>\n{\n    public X() { }\n}\n";
    let mut dom = load(text);
    let class = first_class(&dom);
    dom.set_name(class, "Y").unwrap();
    assert_eq!(build(&dom), "public class Y<T>\n{\n    public Y() { }\n}\n");
    dom.set_name(class, "X").unwrap();
    assert_eq!(build(&dom), text);
}

#[test]
fn test_remove_type_parameter() {
    let mut dom = load("class C<T1, T2, T3> { }");
    let class = first_class(&dom);
    let t2 = dom.type_parameters(class)[1];
    assert!(dom.remove(class, Slot::TypeParameters, t2).unwrap());
    assert_eq!(build(&dom), "class C<T1, T3> { }");
}

#[test]
fn test_remove_parameter() {
    let mut dom = load("class C { void M(int a, int b) { } }");
    let method = dom.methods(first_class(&dom))[0];
    let a = dom.parameters(method)[0];
    dom.remove(method, Slot::Parameters, a).unwrap();
    assert_eq!(build(&dom), "class C { void M(int b) { } }");
}

#[test]
fn test_edit_return_expression() {
    let mut dom = load("class C\n{\n    int M()\n    {\n        return 1;\n    }\n}\n");
    let ret = method_body(&dom)[0];
    assert_eq!(dom.kind(ret), Some(NodeKind::Return));
    let value = dom.child(ret, Slot::Expression).unwrap();
    dom.update(value, |data| *data = NodeData::Expression(ExpressionData::new("x + 1")))
        .unwrap();
    assert_eq!(
        build(&dom),
        "class C\n{\n    int M()\n    {\n        return x + 1;\n    }\n}\n"
    );
}

#[test]
fn test_removed_statement_takes_its_line() {
    let mut dom = load("class C\n{\n    void M()\n    {\n        A();\n        B();\n    }\n}\n");
    let method = dom.methods(first_class(&dom))[0];
    let first = method_body(&dom)[0];
    dom.remove(method, Slot::Statements, first).unwrap();
    assert_eq!(build(&dom), "class C\n{\n    void M()\n    {\n        B();\n    }\n}\n");
}

#[test]
fn test_moved_member_leaves_its_source() {
    let mut dom = load("class A\n{\n    int x;\n}\nclass B\n{\n}\n");
    let classes = dom.root_classes();
    let (a, b) = (classes[0], classes[1]);
    let field = dom.fields(a)[0];
    dom.add_or_move(b, Slot::Members, field).unwrap();
    assert!(dom.fields(a).is_empty());
    assert_eq!(dom.fields(b), vec![field]);
    let text = build(&dom);
    assert!(text.starts_with("class A\n{\n}"), "{text}");
    assert!(text.contains("int x;"), "{text}");
}

#[test]
fn test_new_members_take_the_indentation_of_their_siblings() {
    let mut dom = load("namespace N\n{\n    class C\n    {\n        int x;\n    }\n}\n");
    let class = first_class(&dom);
    let method = dom.create(NodeData::method("Stop"));
    dom.add_or_move(class, Slot::Members, method).unwrap();
    assert_eq!(
        build(&dom),
        "namespace N\n{\n    class C\n    {\n        int x;\n        void Stop()\n        { }\n    }\n}\n"
    );
}

// ============================================================================
// Expression bodies
// ============================================================================

const ARROWS: &str = "class C\n{\n    int Twice(int a) => a * 2;\n    int Size => items.Count;\n}\n";

#[test]
fn test_expression_bodied_members_are_modeled() {
    let dom = load(ARROWS);
    assert!(dom.report().unsupported.is_empty());
    let class = first_class(&dom);
    let method = dom.methods(class)[0];
    let property = dom.properties(class)[0];
    assert_eq!(dom.name(method), Some("Twice"));
    assert_eq!(dom.name(property), Some("Size"));
    for member in [method, property] {
        let body = dom.child(member, Slot::Expression).unwrap();
        assert_eq!(dom.kind(body), Some(NodeKind::Expression));
    }
}

#[test]
fn test_edit_expression_body() {
    let mut dom = load(ARROWS);
    let method = dom.methods(first_class(&dom))[0];
    let body = dom.child(method, Slot::Expression).unwrap();
    dom.update(body, |data| *data = NodeData::expression("a + a")).unwrap();
    assert_eq!(build(&dom), ARROWS.replace("a * 2", "a + a"));
}

#[test]
fn test_block_body_becomes_expression_body() {
    let mut dom = load("class C { int M() { return 1; } }");
    let method = dom.methods(first_class(&dom))[0];
    let ret = dom.children(method, Slot::Statements)[0];
    dom.remove(method, Slot::Statements, ret).unwrap();
    let value = dom.create(NodeData::expression("2"));
    dom.set_single(method, Slot::Expression, Some(value)).unwrap();
    assert_eq!(build(&dom), "class C { int M() => 2; }");
}

#[test]
fn test_expression_body_becomes_accessor_list() {
    let mut dom = load("class C { int P => 1; }");
    let property = dom.properties(first_class(&dom))[0];
    dom.set_single(property, Slot::Expression, None).unwrap();
    let getter = dom.create(NodeData::accessor(crate::dom::AccessorKind::Get, "P"));
    dom.add_or_move(property, Slot::Accessors, getter).unwrap();
    assert_eq!(build(&dom), "class C { int P { get; } }");
}

#[test]
fn test_expression_body_beside_statements_is_rejected() {
    let mut dom = load("class C { int M() => 1; }");
    let method = dom.methods(first_class(&dom))[0];
    let other = load("class D { void N() { Go(); } }");
    let statement = {
        let n = other.methods(other.root_classes()[0])[0];
        other.children(n, Slot::Statements)[0]
    };
    let copy = dom.copy_from(&other, statement).unwrap();
    dom.add_or_move(method, Slot::Statements, copy).unwrap();
    assert!(matches!(
        DomHost::new().build_text(&dom),
        Err(DomError::IncompatibleChild { .. })
    ));
}

// ============================================================================
// Unsupported constructs
// ============================================================================

const WITH_LOCK: &str = "class C\n{\n    void M()\n    {\n        lock (gate) { Run(); }\n    }\n}\n";

#[test]
fn test_unmodeled_statement_passes_through() {
    let mut dom = load(WITH_LOCK);
    assert_eq!(dom.report().unsupported.len(), 1);
    let lock = method_body(&dom)[0];
    assert_eq!(dom.kind(lock), Some(NodeKind::Opaque));
    dom.touch_all();
    assert_eq!(build(&dom), WITH_LOCK);
}

#[test]
fn test_unmodeled_statement_fails_when_asked() {
    let host = DomHost::with_options(DomOptions::default().with_unsupported(UnsupportedPolicy::Fail));
    assert!(matches!(
        host.load(WITH_LOCK),
        Err(DomError::UnsupportedConstruct { .. })
    ));
}

#[test]
fn test_missing_operand_is_reported() {
    let mut dom = load("class C { void M() { x = 1; } }");
    let assignment = method_body(&dom)[0];
    assert_eq!(dom.kind(assignment), Some(NodeKind::Assignment));
    dom.set_single(assignment, Slot::Left, None).unwrap();
    assert!(matches!(
        DomHost::new().build_text(&dom),
        Err(DomError::StructuralIncompleteness { .. })
    ));
}
