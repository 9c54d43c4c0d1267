//! Copies are independent; same-intent ignores formatting but not content.

use csdom::dom::{AnnotationValue, PublicAnnotation};
use csdom::semantic::Accessibility;
use csdom::{NodeData, NodeKind, Slot, same_intent};
use rstest::rstest;

use crate::helpers::dom_helpers::{build_text, find_kind, find_named, load_clean};
use crate::helpers::source_fixtures::*;

#[rstest]
#[case(NAMESPACE)]
#[case(GENERIC_CLASS_WITH_ATTRIBUTE)]
#[case(PROPERTY_GET_SET)]
#[case(FOREACH_LOOP)]
#[case(TRY_CATCH)]
#[case(MEMBERS)]
fn test_same_intent_is_reflexive_and_holds_for_copies(#[case] source: &str) {
    let mut dom = load_clean(source);
    let node = dom.stem_members(dom.root())[0];
    assert!(dom.same_intent(node, node, false));
    let copy = dom.copy(node).unwrap();
    assert!(dom.same_intent(node, copy, false));
}

#[test]
fn test_copy_is_detached_and_independent() {
    let mut dom = load_clean(GENERIC_TYPE_PARAMETERS);
    let class = find_named(&dom, "Triple");
    let copy = dom.copy(class).unwrap();
    assert_eq!(dom.parent(copy), None);
    assert_eq!(dom.kind(copy), Some(NodeKind::Class));

    dom.set_name(copy, "Other").unwrap();
    assert_eq!(dom.name(class), Some("Triple"));

    let t1 = dom.type_parameters(copy)[0];
    dom.remove(copy, Slot::TypeParameters, t1).unwrap();
    assert_eq!(dom.type_parameters(copy).len(), 2);
    assert_eq!(dom.type_parameters(class).len(), 3);
    assert_eq!(build_text(&dom), GENERIC_TYPE_PARAMETERS);
}

#[test]
fn test_rename_breaks_and_revert_restores_intent() {
    let mut dom = load_clean(MEMBERS);
    let class = find_named(&dom, "OrderLine");
    let copy = dom.copy(class).unwrap();
    let method = dom.methods(copy)[0];

    dom.set_name(method, "Sum").unwrap();
    assert!(!dom.same_intent(class, copy, false));

    dom.set_name(method, "Total").unwrap();
    assert!(dom.same_intent(class, copy, false));
}

#[test]
fn test_formatting_does_not_matter() {
    let left = load_clean("class C { int M(int a) { return a + 1; } }");
    let right = load_clean("class C\n{\n    // doubled\n    int M(int a)\n    {\n        return a+1;\n    }\n}\n");
    let a = left.root_classes()[0];
    let b = right.root_classes()[0];
    assert!(same_intent(&left, a, &right, b, false));
}

#[test]
fn test_block_comments_do_not_matter() {
    let left = load_clean("class C { void M() { x = a + b; } }");
    let right = load_clean("class C { void M() { x = a /* c */ + b; } }");
    let a = left.root_classes()[0];
    let b = right.root_classes()[0];
    assert!(same_intent(&left, a, &right, b, false));
}

#[test]
fn test_member_order_does_not_matter() {
    let left = load_clean("class C { int x; void M() { } }");
    let right = load_clean("class C { void M() { } int x; }");
    assert!(same_intent(
        &left,
        left.root_classes()[0],
        &right,
        right.root_classes()[0],
        false
    ));
}

#[test]
fn test_statement_order_matters() {
    let left = load_clean("class C { void M() { A(); B(); } }");
    let right = load_clean("class C { void M() { B(); A(); } }");
    assert!(!same_intent(
        &left,
        left.root_classes()[0],
        &right,
        right.root_classes()[0],
        false
    ));
}

#[test]
fn test_annotations_can_be_skipped() {
    let mut dom = load_clean(PROPERTY_GET_SET);
    let property = find_kind(&dom, NodeKind::Property);
    let copy = dom.copy(property).unwrap();
    dom.add_annotation(
        copy,
        PublicAnnotation::new("Column").with_value("name", AnnotationValue::String("n".into())),
    )
    .unwrap();
    assert!(!dom.same_intent(property, copy, false));
    assert!(dom.same_intent(property, copy, true));
}

#[test]
fn test_copy_into_another_document_builds_the_same_text() {
    let source = load_clean(FOREACH_LOOP);
    let class = source.root_classes()[0];
    let mut target = load_clean("");
    let copy = target.copy_from(&source, class).unwrap();
    let root = target.root();
    target.add_or_move(root, Slot::StemMembers, copy).unwrap();
    assert_eq!(build_text(&target), FOREACH_LOOP.trim_end());
    assert!(same_intent(&source, class, &target, copy, false));
}

#[test]
fn test_nodes_built_in_code_survive_a_reload() {
    let mut dom = load_clean("");
    let root = dom.root();
    let outer = dom.create(NodeData::class("Outer"));
    let inner = dom.create(NodeData::class("Inner"));
    dom.add_or_move(root, Slot::StemMembers, outer).unwrap();
    dom.add_or_move(outer, Slot::Members, inner).unwrap();
    assert_eq!(dom.access(outer), Some(Accessibility::Internal));
    assert_eq!(dom.access(inner), Some(Accessibility::Private));

    let text = build_text(&dom);
    assert!(!text.contains("private") && !text.contains("internal"), "{text}");
    let reloaded = load_clean(&text);
    let again = find_named(&reloaded, "Outer");
    assert!(same_intent(&dom, outer, &reloaded, again, false));
}
