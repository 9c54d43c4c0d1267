//! Kind-filtered views, root aggregates and qualified names.

use csdom::NodeKind;
use rstest::rstest;

use crate::helpers::dom_helpers::{find_named, load_clean};
use crate::helpers::source_fixtures::*;

#[test]
fn test_root_counts_then_clear() {
    let mut dom = load_clean(FOUR_TYPES);
    let root = dom.root();
    assert_eq!(dom.stem_members(root).len(), 4);
    assert_eq!(dom.root_classes().len(), 1);
    assert_eq!(dom.root_structures().len(), 1);
    assert_eq!(dom.root_enums().len(), 1);
    assert_eq!(dom.root_interfaces().len(), 1);
    assert_eq!(dom.root_types().len(), 4);

    let removed = dom.clear_stem_members(root).unwrap();
    assert_eq!(removed.len(), 4);
    assert_eq!(dom.stem_members(root).len(), 0);
    assert!(removed.iter().all(|id| dom.parent(*id).is_none()));
}

#[rstest]
#[case("Namespace1", "Namespace1")]
#[case("MyClass", "Namespace1.MyClass")]
#[case("MyNestedClass", "Namespace1.MyClass.MyNestedClass")]
#[case("MyNestedNestedClass", "Namespace1.MyClass.MyNestedClass.MyNestedNestedClass")]
fn test_qualified_names(#[case] name: &str, #[case] expected: &str) {
    let dom = load_clean(NESTED_TYPES);
    let id = find_named(&dom, name);
    assert_eq!(dom.qualified_name(id).as_deref(), Some(expected));
}

#[test]
fn test_outer_name_and_namespace() {
    let dom = load_clean(NESTED_TYPES);
    let deepest = find_named(&dom, "MyNestedNestedClass");
    assert_eq!(
        dom.outer_name(deepest).as_deref(),
        Some("MyClass+MyNestedClass+MyNestedNestedClass")
    );
    assert_eq!(dom.namespace(deepest), "Namespace1");
    assert_eq!(
        dom.metadata_qualified_name(deepest).as_deref(),
        Some("Namespace1.MyClass+MyNestedClass+MyNestedNestedClass")
    );
}

#[rstest]
#[case("class MyClass { enum MyEnum { } }", "MyEnum", "MyClass+MyEnum")]
#[case("class MyClass { struct MyStruct { } }", "MyStruct", "MyClass+MyStruct")]
#[case("class MyClass { interface MyInterface { } }", "MyInterface", "MyClass+MyInterface")]
#[case("class MyClass { class MyNestedClass { int myField; } }", "myField", "MyClass+MyNestedClass.myField")]
#[case("namespace N { class MyClass { void myMethod() { } } }", "myMethod", "MyClass.myMethod")]
fn test_outer_name_separators(#[case] source: &str, #[case] name: &str, #[case] expected: &str) {
    let dom = load_clean(source);
    let node = find_named(&dom, name);
    assert_eq!(dom.outer_name(node).as_deref(), Some(expected));
}

#[test]
fn test_type_member_views() {
    let dom = load_clean(MEMBERS);
    let class = find_named(&dom, "OrderLine");
    assert_eq!(dom.fields(class).len(), 2);
    assert_eq!(dom.events(class).len(), 1);
    assert_eq!(dom.constructors(class).len(), 1);
    assert_eq!(dom.properties(class).len(), 1);
    assert_eq!(dom.methods(class).len(), 1);
    assert_eq!(dom.members(class).len(), 6);

    let names: Vec<_> = dom
        .fields(class)
        .iter()
        .map(|f| dom.name(*f).unwrap().to_string())
        .collect();
    assert_eq!(names, ["quantity", "reserved"]);
}

#[test]
fn test_documentation_and_annotations_are_read() {
    let dom = load_clean(MEMBERS);
    let class = find_named(&dom, "OrderLine");
    assert_eq!(dom.documentation(class), Some("An order line"));
    let annotations = dom.annotations(class);
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].name, "Entity");
    assert_eq!(
        annotations[0].value("table"),
        Some(&csdom::dom::AnnotationValue::String("lines".into()))
    );
}

#[test]
fn test_namespace_views() {
    let dom = load_clean("namespace A { namespace B { class C { } } namespace D { } }");
    let root = dom.root();
    assert_eq!(dom.child_namespaces(root).len(), 1);
    assert_eq!(dom.descendant_namespaces(root).len(), 3);
    let non_empty = dom.non_empty_namespaces(root);
    assert_eq!(non_empty.len(), 1);
    assert_eq!(dom.name(non_empty[0]), Some("B"));
    assert_eq!(dom.kind(dom.root_classes()[0]), Some(NodeKind::Class));
}

#[test]
fn test_dotted_namespace_names() {
    let dom = load_clean("namespace testing.Namespace1\n{\n    class C { }\n}\n");
    let ns = dom.child_namespaces(dom.root())[0];
    assert_eq!(dom.name(ns), Some("testing.Namespace1"));
    assert_eq!(dom.simple_name(ns), Some("Namespace1"));
    assert_eq!(dom.namespace(ns), "testing");
    let class = find_named(&dom, "C");
    assert_eq!(dom.simple_name(class), Some("C"));
    assert_eq!(dom.qualified_name(class).as_deref(), Some("testing.Namespace1.C"));
}
